use diskarb_core::{Credentials, DiskConfig, FsStatus, Uid, UserRecord, VolumeStatus};
use diskarb_disk::{create_from_volume_path, runtime, Disk};
use diskarb_registry::MemEntry;
use std::path::Path;

struct OneMount;

impl VolumeStatus for OneMount {
    fn mounts(&self) -> anyhow::Result<Vec<FsStatus>> {
        Ok(vec![FsStatus {
            mount_from: "/dev/disk4s1".to_string(),
            mount_on: "/Volumes/Data".to_string(),
            fs_type: "apfs".to_string(),
            owner: 4242,
            local: true,
        }])
    }

    fn effective_uid(&self) -> Uid {
        0
    }
}

#[test]
fn configuration_is_installed_once() {
    let config = DiskConfig {
        admin_uid: 10,
        admin_gid: 11,
        default_mode: 0o700,
        ..Default::default()
    };
    runtime::initialize(config.clone()).unwrap();
    assert_eq!(runtime::config(), &config);

    let users: Vec<UserRecord> = Vec::new();
    let disk: Disk<MemEntry> =
        create_from_volume_path(Path::new("/Volumes/Data"), &OneMount, &users).unwrap();
    assert_eq!(disk.mode(), 0o700);
    assert_eq!(disk.credentials(), Credentials::uniform(10, 11));

    assert!(runtime::initialize(DiskConfig::default()).is_err());
    assert_eq!(runtime::config(), &config);
}
