//! Disk entities as the arbitration daemon sees them, and the two ways of
//! building one: from a media entry in the device registry, or from the
//! mount point of an already mounted volume.

pub mod disk;
pub mod error;
pub mod media;
pub mod ownership;
pub mod runtime;
pub mod summary;
pub mod volume;

pub use disk::{Attachment, DeviceNode, Disk};
pub use error::BuildError;
pub use media::create_from_media;
pub use ownership::{Ownership, OwnershipHints};
pub use volume::create_from_volume_path;

#[cfg(test)]
pub(crate) mod fixtures;
