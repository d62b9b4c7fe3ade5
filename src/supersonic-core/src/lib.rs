pub mod catalog;
pub mod catalog_contract;
pub mod config;
pub mod format;
pub mod logging;
pub mod models;
pub mod paths;
pub mod trending;

pub use catalog::{CatalogError, CatalogResult, MusicCatalog, SearchFilter};
pub use config::{
    CatalogConfig, Config, ConfigError, LogLevel, LoggingConfig, TrendingConfig, ValidationError,
};
pub use format::{select_audio_format, AudioContainer, Quality, SelectionError, SelectionResult};
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use paths::{AppDirs, DirsError};
pub use trending::{resolve_trending, Trending, TrendingSource};

pub const APP_NAME: &str = "supersonic";
pub const APP_AUTHOR: &str = "Supersonic";
pub const APP_QUALIFIER: &str = "io";
