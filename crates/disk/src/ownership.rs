use diskarb_core::{Credentials, DiskConfig, Uid, UserDirectory};

/// Device traits that decide who owns a new disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipHints {
    pub removable: bool,
    /// Set only when the device explicitly reports an external interconnect.
    pub external: bool,
    pub owner_uid: Option<Uid>,
    pub owner_mode: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub credentials: Credentials,
    pub mode: u32,
}

/// Administrative ownership by default. Removable or external media lose
/// their real owner to the unknown sentinel; an owner uid with a user
/// record takes all four identities.
pub fn resolve<U>(hints: &OwnershipHints, users: &U, config: &DiskConfig) -> Ownership
where
    U: UserDirectory + ?Sized,
{
    let mut credentials = config.admin_credentials();
    let mut mode = config.default_mode;

    if hints.removable || hints.external {
        credentials.real_uid = config.unknown_uid;
        credentials.real_gid = config.unknown_gid;
    }

    if let Some(user) = hints.owner_uid.and_then(|uid| users.user_by_uid(uid)) {
        credentials = Credentials::uniform(user.uid, user.gid);
    }

    if let Some(owner_mode) = hints.owner_mode {
        mode = owner_mode;
    }

    Ownership { credentials, mode }
}
