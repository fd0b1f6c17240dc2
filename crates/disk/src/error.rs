use diskarb_registry::RegistryError;
use thiserror::Error;

/// Why a disk could not be built from a media entry. Every variant that
/// knows the disk id carries it for diagnostics.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("media properties are unavailable")]
    Properties(#[source] RegistryError),
    #[error("media has no usable BSD name")]
    InvalidName,
    #[error("{id}: missing {attribute}")]
    MissingAttribute { id: String, attribute: &'static str },
    #[error("{id}: {attribute} has an unexpected type")]
    InvalidAttribute { id: String, attribute: &'static str },
    #[error("{id}: {attribute} is not valid UTF-8")]
    Undecodable { id: String, attribute: &'static str },
    #[error("{id}: no block storage device above the media")]
    NoBlockStorageDevice { id: String },
    #[error("{id}: {attribute} is unavailable")]
    Registry {
        id: String,
        attribute: &'static str,
        #[source]
        source: RegistryError,
    },
}

impl BuildError {
    pub fn id(&self) -> Option<&str> {
        match self {
            BuildError::Properties(_) | BuildError::InvalidName => None,
            BuildError::MissingAttribute { id, .. }
            | BuildError::InvalidAttribute { id, .. }
            | BuildError::Undecodable { id, .. }
            | BuildError::NoBlockStorageDevice { id }
            | BuildError::Registry { id, .. } => Some(id),
        }
    }
}
