use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u64 = 16;
pub const DEFAULT_RAM_SIZE: u64 = 2048;
pub const DEFAULT_DISK_SIZE: u64 = 4096;

/// Errors raised while validating engine parameters
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A storage size that is zero where it must not be, or not a whole
    /// number of pages
    InvalidSize(String),
    /// A replacement policy name that is neither `fifo` nor `lru`
    UnknownPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSize(msg) => write!(f, "{}", msg),
            ConfigError::UnknownPolicy(name) => {
                write!(f, "unknown replacement policy '{}', expected fifo or lru", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which resident page the engine evicts when a RAM frame must be vacated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPolicy {
    /// Evict the page resident longest; accesses never reorder the queue.
    Fifo,
    /// Evict the page untouched longest; every hit refreshes its position.
    Lru,
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<ReplacementPolicy, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(ReplacementPolicy::Fifo),
            "lru" => Ok(ReplacementPolicy::Lru),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementPolicy::Fifo => write!(f, "fifo"),
            ReplacementPolicy::Lru => write!(f, "lru"),
        }
    }
}

/// Fixed engine parameters. All sizes are in bytes and stay constant for
/// the lifetime of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub page_size: u64,
    pub ram_size: u64,
    pub disk_size: u64,
    pub policy: ReplacementPolicy,
}

impl EngineConfig {
    /// Validates and builds a configuration. The page size must be positive
    /// and both storage sizes must be exact multiples of it.
    pub fn new(
        page_size: u64,
        ram_size: u64,
        disk_size: u64,
        policy: ReplacementPolicy,
    ) -> Result<EngineConfig, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidSize("page size must be positive".to_string()));
        }
        if ram_size % page_size != 0 {
            return Err(ConfigError::InvalidSize(format!(
                "RAM size {} is not a whole number of {}-byte pages",
                ram_size, page_size
            )));
        }
        if disk_size % page_size != 0 {
            return Err(ConfigError::InvalidSize(format!(
                "swap size {} is not a whole number of {}-byte pages",
                disk_size, page_size
            )));
        }
        Ok(EngineConfig {
            page_size,
            ram_size,
            disk_size,
            policy,
        })
    }

    /// Number of page frames in RAM.
    pub fn ram_frames(&self) -> usize {
        (self.ram_size / self.page_size) as usize
    }

    /// Number of page frames in the swap area.
    pub fn disk_frames(&self) -> usize {
        (self.disk_size / self.page_size) as usize
    }

    /// Pages needed to back `bytes` of address space, rounding up.
    pub fn pages_for(&self, bytes: u64) -> usize {
        ((bytes + self.page_size - 1) / self.page_size) as usize
    }
}
