//! Settings file loading and command line parsing.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
