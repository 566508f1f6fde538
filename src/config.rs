use serde::Deserialize;

use crate::vmm::config::{
    ConfigError, EngineConfig, ReplacementPolicy, DEFAULT_DISK_SIZE, DEFAULT_PAGE_SIZE,
    DEFAULT_RAM_SIZE,
};

/// Startup configuration, merged from three layers: built-in defaults,
/// then an optional config file, then environment variables carrying the
/// `PAGESIM_` prefix.
#[derive(Debug, PartialEq, Deserialize)]
pub struct Config {
    pub page_size: u64,
    pub ram_size: u64,
    pub disk_size: u64,
    pub swap: ReplacementPolicy,
    pub log_level: String,
}

impl Config {
    /// Loads the configuration. An empty `file` skips the file layer.
    pub fn new(file: &str) -> Result<Config, config::ConfigError> {
        let mut cfg = config::Config::builder()
            .set_default("page_size", DEFAULT_PAGE_SIZE)?
            .set_default("ram_size", DEFAULT_RAM_SIZE)?
            .set_default("disk_size", DEFAULT_DISK_SIZE)?
            .set_default("swap", "fifo")?
            .set_default("log_level", "info")?;
        if !file.is_empty() {
            cfg = cfg.add_source(config::File::with_name(file));
        }
        cfg = cfg.add_source(config::Environment::with_prefix("PAGESIM"));

        cfg.build()?.try_deserialize()
    }

    /// Validated engine view of the sizes and policy.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        EngineConfig::new(self.page_size, self.ram_size, self.disk_size, self.swap)
    }
}
