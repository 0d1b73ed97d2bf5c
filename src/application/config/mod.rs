pub mod cli;
pub mod loader;
pub mod models;
pub mod parser;
pub mod validator;

pub use cli::Cli;
pub use loader::ConfigLoader;
pub use models::{Config, HandlerKind, ListenAddress, ServerConfig};
