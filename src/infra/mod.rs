mod file_token_storage;
mod memory_token_storage;
mod reqwest_transport;

pub use file_token_storage::*;
pub use memory_token_storage::*;
pub use reqwest_transport::*;
