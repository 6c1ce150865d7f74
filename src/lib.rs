pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{AppState, Config, Placeholder, PlaceholderSet};
