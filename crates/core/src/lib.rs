pub mod config;
pub mod credentials;
pub mod description;
pub mod flags;
pub mod keys;
pub mod value;
pub mod volume;

pub use config::{load_config, DiskConfig};
pub use credentials::{Credentials, Gid, Uid, UserDirectory, UserRecord};
pub use description::Description;
pub use flags::{DiskOptions, DiskState};
pub use value::Value;
pub use volume::{FsStatus, VolumeStatus};

#[cfg(unix)]
pub use credentials::SystemUsers;
