use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Falls back to built-in defaults if [`init_config`] was never called.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::default()))
        .clone()
}

/// Install the global configuration
///
/// Only the first call wins; later calls return the already installed value.
pub fn init_config(config: StaticConfig) -> Arc<StaticConfig> {
    CONFIG.get_or_init(|| Arc::new(config)).clone()
}
