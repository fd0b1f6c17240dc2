//! Mount table of a Linux host, read from `/proc/self/mounts`.

#![cfg(target_os = "linux")]

use anyhow::{Context, Result};
use diskarb_core::{FsStatus, Uid, VolumeStatus};
use std::fs;
use std::os::unix::fs::MetadataExt;

const MOUNTS_PATH: &str = "/proc/self/mounts";

/// File systems whose status may block on a remote server.
const NETWORK_FS_TYPES: &[&str] = &[
    "nfs", "nfs4", "cifs", "smb3", "smbfs", "afs", "9p", "ceph", "glusterfs", "davfs",
    "ncpfs", "fuse.sshfs",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxVolumes;

impl VolumeStatus for LinuxVolumes {
    fn mounts(&self) -> Result<Vec<FsStatus>> {
        let data = fs::read_to_string(MOUNTS_PATH)
            .with_context(|| format!("read {}", MOUNTS_PATH))?;
        Ok(parse_mounts(&data, owner_of))
    }

    fn effective_uid(&self) -> Uid {
        unsafe { libc::geteuid() }
    }
}

/// Local mount points report their owner; network ones are never stat'ed.
fn owner_of(mount_point: &str) -> Uid {
    match fs::metadata(mount_point) {
        Ok(metadata) => metadata.uid(),
        Err(err) => {
            log::debug!("stat {}: {}", mount_point, err);
            0
        }
    }
}

pub fn is_network_fs(fs_type: &str) -> bool {
    NETWORK_FS_TYPES.contains(&fs_type)
}

/// Parses mount-table lines. `owner` is asked only about local mounts;
/// network mounts are attributed to uid 0.
pub fn parse_mounts<F>(data: &str, mut owner: F) -> Vec<FsStatus>
where
    F: FnMut(&str) -> Uid,
{
    let mut mounts = Vec::new();
    for line in data.lines() {
        let mut parts = line.split_whitespace();
        let mount_from = match parts.next() {
            Some(value) => unescape_mount(value),
            None => continue,
        };
        let mount_on = match parts.next() {
            Some(value) => unescape_mount(value),
            None => continue,
        };
        let fs_type = match parts.next() {
            Some(value) => value.to_string(),
            None => continue,
        };
        let local = !is_network_fs(&fs_type);
        let owner = if local { owner(&mount_on) } else { 0 };
        mounts.push(FsStatus {
            mount_from,
            mount_on,
            fs_type,
            owner,
            local,
        });
    }
    mounts
}

/// Undoes the octal escapes (`\040` and friends) the kernel writes for
/// whitespace and backslashes.
fn unescape_mount(value: &str) -> String {
    let mut output = String::new();
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        let mut octal = String::new();
        while octal.len() < 3 {
            match chars.peek() {
                Some(next) if next.is_digit(8) => {
                    octal.push(*next);
                    chars.next();
                }
                _ => break,
            }
        }
        match u8::from_str_radix(&octal, 8) {
            Ok(byte) if octal.len() == 3 => output.push(byte as char),
            _ => {
                output.push('\\');
                output.push_str(&octal);
            }
        }
    }
    output
}
