//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CacheConfig, CrawlerSettings, LlmConfig, LogFormat, LoggingConfig,
    ServerConfig, StorageConfig, WidgetConfig,
};
