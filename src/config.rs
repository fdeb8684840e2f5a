// Splitter configuration

use serde::{Deserialize, Serialize};

/// Upper bound on deliveries the subset mask can address
pub const DELIVERY_LIMIT_CEILING: usize = 63;

/// Tuning knobs of the basket splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Largest number of distinct deliveries a basket may involve.
    /// The search runs k * 2^(k-1) flow solves, so keep this small.
    pub max_deliveries: usize,

    /// Check the delivery edges against their expected state after every restore
    pub verify_restores: bool,

    /// Restore toggled deliveries to their base cost instead of the penalty cost,
    /// so every configuration starts from the network as built
    pub restore_to_base: bool,
}

impl SplitterConfig {
    /// Effective delivery limit, never above what the subset mask supports
    pub fn delivery_limit(&self) -> usize {
        self.max_deliveries.min(DELIVERY_LIMIT_CEILING)
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_deliveries: 16,
            verify_restores: true,
            restore_to_base: false,
        }
    }
}
