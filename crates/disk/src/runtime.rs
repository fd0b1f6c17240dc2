//! Process-wide disk configuration, installed once before the first disk
//! is built.

use diskarb_core::DiskConfig;
use std::sync::OnceLock;
use thiserror::Error;

static CONFIG: OnceLock<DiskConfig> = OnceLock::new();

#[derive(Debug, Error)]
#[error("disk runtime is already initialized")]
pub struct AlreadyInitialized;

/// Installs `config` for every disk built afterwards. Fails once a
/// configuration is in place, including the default one the builders fall
/// back to.
pub fn initialize(config: DiskConfig) -> Result<(), AlreadyInitialized> {
    CONFIG.set(config).map_err(|_| AlreadyInitialized)?;
    log::debug!("disk runtime initialized");
    Ok(())
}

pub fn config() -> &'static DiskConfig {
    CONFIG.get_or_init(DiskConfig::default)
}
