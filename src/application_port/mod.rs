mod auth_service;
mod feed;
mod session;

pub use auth_service::*;
pub use feed::*;
pub use session::*;
