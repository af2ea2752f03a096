// store

mod token_storage;

pub use token_storage::*;

// transport

mod http_transport;

pub use http_transport::*;
