use crate::credentials::{Credentials, Gid, Uid};
use crate::volume::DEVICE_DIRECTORY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    pub device_directory: String,
    pub admin_uid: Uid,
    pub admin_gid: Gid,
    pub unknown_uid: Uid,
    pub unknown_gid: Gid,
    pub default_mode: u32,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            device_directory: DEVICE_DIRECTORY.to_string(),
            admin_uid: 0,
            admin_gid: 80,
            unknown_uid: 99,
            unknown_gid: 99,
            default_mode: 0o755,
        }
    }
}

impl DiskConfig {
    pub fn admin_credentials(&self) -> Credentials {
        Credentials::uniform(self.admin_uid, self.admin_gid)
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<DiskConfig> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let config: DiskConfig = serde_json::from_str(&data)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diskarb.json");
        std::fs::write(&path, r#"{ "admin_gid": 0, "default_mode": 448 }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.admin_gid, 0);
        assert_eq!(config.default_mode, 0o700);
        assert_eq!(config.unknown_uid, 99);
        assert_eq!(config.device_directory, "/dev/");
    }

    #[test]
    fn malformed_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diskarb.json");
        std::fs::write(&path, "admin_gid = 0").unwrap();
        assert!(load_config(&path).is_err());
        assert!(load_config(dir.path().join("absent.json")).is_err());
    }
}
