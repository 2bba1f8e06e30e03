pub mod config;
pub mod error;
pub mod search;

pub use config::Config;
pub use error::ConfigError;
pub use search::SearchConfig;
