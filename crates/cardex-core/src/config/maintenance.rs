use super::env::read_env_usize;

const ENV_REPAIR_SAMPLE: &str = "CARDEX_REPAIR_SAMPLE";

pub const DEFAULT_REPAIR_SAMPLE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceConfig {
    pub orphan_sample: usize,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            orphan_sample: DEFAULT_REPAIR_SAMPLE,
        }
    }
}

impl MaintenanceConfig {
    pub(super) fn from_env() -> Self {
        Self {
            orphan_sample: read_env_usize(ENV_REPAIR_SAMPLE, DEFAULT_REPAIR_SAMPLE, 0),
        }
    }
}
