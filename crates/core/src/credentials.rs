use serde::Serialize;

pub type Uid = u32;
pub type Gid = u32;

/// Effective and real owner identities of a disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Credentials {
    pub effective_uid: Uid,
    pub effective_gid: Gid,
    pub real_uid: Uid,
    pub real_gid: Gid,
}

impl Credentials {
    pub fn uniform(uid: Uid, gid: Gid) -> Self {
        Self {
            effective_uid: uid,
            effective_gid: gid,
            real_uid: uid,
            real_gid: gid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub uid: Uid,
    pub gid: Gid,
}

/// Primary user records by uid.
pub trait UserDirectory {
    fn user_by_uid(&self, uid: Uid) -> Option<UserRecord>;
}

impl<T: UserDirectory + ?Sized> UserDirectory for &T {
    fn user_by_uid(&self, uid: Uid) -> Option<UserRecord> {
        (**self).user_by_uid(uid)
    }
}

impl UserDirectory for [UserRecord] {
    fn user_by_uid(&self, uid: Uid) -> Option<UserRecord> {
        self.iter().find(|user| user.uid == uid).cloned()
    }
}

impl UserDirectory for Vec<UserRecord> {
    fn user_by_uid(&self, uid: Uid) -> Option<UserRecord> {
        self.as_slice().user_by_uid(uid)
    }
}

/// The host password database.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUsers;

#[cfg(unix)]
impl UserDirectory for SystemUsers {
    fn user_by_uid(&self, uid: Uid) -> Option<UserRecord> {
        use std::ffi::CStr;
        use std::ptr;

        let mut buffer = vec![0 as libc::c_char; 4096];
        loop {
            let mut entry = unsafe { std::mem::zeroed::<libc::passwd>() };
            let mut result: *mut libc::passwd = ptr::null_mut();
            let status = unsafe {
                libc::getpwuid_r(
                    uid as libc::uid_t,
                    &mut entry,
                    buffer.as_mut_ptr(),
                    buffer.len(),
                    &mut result,
                )
            };
            if status == libc::ERANGE && buffer.len() < 1 << 20 {
                buffer.resize(buffer.len() * 2, 0);
                continue;
            }
            if status != 0 || result.is_null() {
                return None;
            }
            let name = if entry.pw_name.is_null() {
                String::new()
            } else {
                unsafe { CStr::from_ptr(entry.pw_name) }
                    .to_string_lossy()
                    .to_string()
            };
            return Some(UserRecord {
                name,
                uid: entry.pw_uid as Uid,
                gid: entry.pw_gid as Gid,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_directory_finds_by_uid() {
        let users = vec![
            UserRecord { name: "root".to_string(), uid: 0, gid: 0 },
            UserRecord { name: "alice".to_string(), uid: 501, gid: 20 },
        ];
        assert_eq!(users.user_by_uid(501).map(|user| user.gid), Some(20));
        assert!(users.user_by_uid(502).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn system_users_resolve_root() {
        let root = SystemUsers.user_by_uid(0).expect("uid 0 exists");
        assert_eq!(root.uid, 0);
    }
}
