//! Mount table of a macOS host, read with `getfsstat(MNT_NOWAIT)` so that an
//! unresponsive network server cannot stall the caller.

use anyhow::Result;
use diskarb_core::{FsStatus, Uid, VolumeStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct MacVolumes;

impl VolumeStatus for MacVolumes {
    fn mounts(&self) -> Result<Vec<FsStatus>> {
        read_mounts()
    }

    fn effective_uid(&self) -> Uid {
        #[cfg(unix)]
        {
            unsafe { libc::geteuid() }
        }
        #[cfg(not(unix))]
        {
            0
        }
    }
}

#[cfg(target_os = "macos")]
fn read_mounts() -> Result<Vec<FsStatus>> {
    use anyhow::anyhow;
    use libc::{getfsstat, statfs, MNT_LOCAL, MNT_NOWAIT};
    use std::mem::size_of;
    use std::ptr;

    let count = unsafe { getfsstat(ptr::null_mut(), 0, MNT_NOWAIT) };
    if count < 0 {
        return Err(anyhow!("getfsstat failed: {}", std::io::Error::last_os_error()));
    }
    let mut buf = vec![unsafe { std::mem::zeroed::<statfs>() }; count as usize];
    let res = unsafe {
        getfsstat(
            buf.as_mut_ptr(),
            (buf.len() * size_of::<statfs>()) as i32,
            MNT_NOWAIT,
        )
    };
    if res < 0 {
        return Err(anyhow!("getfsstat failed: {}", std::io::Error::last_os_error()));
    }

    let mut entries = Vec::new();
    for entry in buf.into_iter().take(res as usize) {
        entries.push(FsStatus {
            mount_from: text(&entry.f_mntfromname),
            mount_on: text(&entry.f_mntonname),
            fs_type: text(&entry.f_fstypename),
            owner: entry.f_owner,
            local: entry.f_flags & MNT_LOCAL as u32 != 0,
        });
    }
    Ok(entries)
}

#[cfg(target_os = "macos")]
fn text(raw: &[libc::c_char]) -> String {
    unsafe { std::ffi::CStr::from_ptr(raw.as_ptr()) }
        .to_string_lossy()
        .to_string()
}

#[cfg(not(target_os = "macos"))]
fn read_mounts() -> Result<Vec<FsStatus>> {
    Err(anyhow::anyhow!("diskarb-host-macos requires macOS"))
}
