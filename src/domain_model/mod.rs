mod cursor;
mod entity;
mod http;
mod stance;
mod token;
mod unit;
mod user;

pub use cursor::*;
pub use entity::*;
pub use http::*;
pub use stance::*;
pub use token::*;
pub use unit::*;
pub use user::*;
