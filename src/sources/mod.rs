pub mod mock_ecmc;

pub use mock_ecmc::{MockEcmcSource, MOCK_ECMC_SOURCE};

use std::time::Duration;

use crate::app::ports::OwnerSource;
use crate::config::ScrapeConfig;

/// Build a source by name; only the mock ECMC source exists in-process
pub fn create_source(name: &str, config: &ScrapeConfig) -> Option<Box<dyn OwnerSource>> {
    match name {
        MOCK_ECMC_SOURCE => Some(Box::new(MockEcmcSource::new(
            config.seed,
            Duration::from_millis(config.delay_ms),
        ))),
        _ => None,
    }
}

pub fn get_supported_sources() -> Vec<&'static str> {
    vec![MOCK_ECMC_SOURCE]
}
