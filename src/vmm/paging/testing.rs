#[cfg(test)]
use crate::vmm::config::{EngineConfig, ReplacementPolicy};

#[cfg(test)]
use super::engine::PagingEngine;

/// An engine over deliberately small tiers: 16-byte pages with the given
/// number of RAM and swap frames.
#[cfg(test)]
pub fn create_testing_engine(
    ram_frames: usize,
    disk_frames: usize,
    policy: ReplacementPolicy,
) -> PagingEngine {
    let config = EngineConfig::new(
        16,
        16 * ram_frames as u64,
        16 * disk_frames as u64,
        policy,
    )
    .unwrap();
    PagingEngine::new(config)
}
