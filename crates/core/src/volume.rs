use crate::credentials::Uid;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

pub const DEVICE_DIRECTORY: &str = "/dev/";

/// One entry of the host mount table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FsStatus {
    pub mount_from: String,
    pub mount_on: String,
    pub fs_type: String,
    pub owner: Uid,
    pub local: bool,
}

/// Non-blocking file-system status queries.
pub trait VolumeStatus {
    /// Snapshot of the mount table, without waiting on unresponsive file systems.
    fn mounts(&self) -> Result<Vec<FsStatus>>;

    /// Uid the calling process acts as when several mounts share a mount point.
    fn effective_uid(&self) -> Uid;

    fn status(&self, mount_point: &str) -> Option<FsStatus> {
        let mounts = self.mounts().ok()?;
        select_mount(mounts, mount_point, self.effective_uid())
    }
}

/// Picks the mount at `mount_point`, preferring the one owned by `euid`
/// and otherwise keeping the last match.
pub fn select_mount(mounts: Vec<FsStatus>, mount_point: &str, euid: Uid) -> Option<FsStatus> {
    let mut found = None;
    for mount in mounts {
        if mount.mount_on != mount_point {
            continue;
        }
        let owned = mount.owner == euid;
        found = Some(mount);
        if owned {
            break;
        }
    }
    found
}

/// Identity the arbitration engine uses for a mounted volume: the device
/// path for device-backed mounts, otherwise the mount point qualified by owner.
pub fn volume_id(status: &FsStatus) -> String {
    if status.mount_from.starts_with(DEVICE_DIRECTORY) {
        status.mount_from.clone()
    } else {
        format!("{}?owner={}", status.mount_on, status.owner)
    }
}

/// POSIX representation of `path` as the mount table spells it: UTF-8,
/// without a trailing separator except for the root.
pub fn file_system_representation(path: &Path) -> Option<String> {
    let text = path.to_str()?;
    if text.is_empty() {
        return None;
    }
    let trimmed = text.trim_end_matches('/');
    if trimmed.is_empty() {
        return Some("/".to_string());
    }
    Some(trimmed.to_string())
}
