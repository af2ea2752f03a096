mod auth_service_impl;
mod entity_feed_impl;
mod paginator;
mod session_impl;
mod stance_feed_impl;
mod token_store;
mod user_feed_impl;

pub use auth_service_impl::*;
pub use entity_feed_impl::*;
pub use paginator::*;
pub use session_impl::*;
pub use stance_feed_impl::*;
pub use token_store::*;
pub use user_feed_impl::*;
