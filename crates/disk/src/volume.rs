use crate::disk::Disk;
use crate::ownership::{self, OwnershipHints};
use crate::runtime;
use diskarb_core::volume::file_system_representation;
use diskarb_core::{keys, DiskState, UserDirectory, VolumeStatus};
use std::path::Path;

/// Builds a disk for the volume mounted at `path`. Returns `None` when the
/// path has no file-system representation or its status is unavailable.
pub fn create_from_volume_path<M, V, U>(path: &Path, volumes: &V, users: &U) -> Option<Disk<M>>
where
    V: VolumeStatus + ?Sized,
    U: UserDirectory + ?Sized,
{
    let mount_point = file_system_representation(path)?;
    let status = match volumes.status(&mount_point) {
        Some(status) => status,
        None => {
            log::debug!("no file system status for {}", mount_point);
            return None;
        }
    };

    let config = runtime::config();
    let mut disk = Disk::new(status.mount_on.clone(), config);
    disk.bypath = Some(path.to_path_buf());
    disk.description.insert(keys::VOLUME_MOUNTABLE, true);
    disk.description.insert(keys::VOLUME_NETWORK, !status.local);
    disk.description.insert(keys::VOLUME_PATH, path.to_path_buf());
    disk.state |= DiskState::PIPELINE;

    let hints = OwnershipHints {
        owner_uid: Some(status.owner),
        ..Default::default()
    };
    let ownership = ownership::resolve(&hints, users, config);
    disk.credentials = ownership.credentials;

    Some(disk)
}
