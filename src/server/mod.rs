pub mod config;
pub mod error;
mod http_layers;
pub mod server;
pub mod state;

pub use config::{ServerConfig, DEFAULT_PAGE_SIZE, DEFAULT_PATH_PREFIX, MAX_PAGE_SIZE};
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
