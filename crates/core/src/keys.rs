//! Description key vocabulary.

pub const DISK_ID: &str = "DADiskID";

pub const VOLUME_KIND: &str = "DAVolumeKind";
pub const VOLUME_MOUNTABLE: &str = "DAVolumeMountable";
pub const VOLUME_NAME: &str = "DAVolumeName";
pub const VOLUME_NETWORK: &str = "DAVolumeNetwork";
pub const VOLUME_PATH: &str = "DAVolumePath";
pub const VOLUME_UUID: &str = "DAVolumeUUID";

pub const MEDIA_BLOCK_SIZE: &str = "DAMediaBlockSize";
pub const MEDIA_BSD_MAJOR: &str = "DAMediaBSDMajor";
pub const MEDIA_BSD_MINOR: &str = "DAMediaBSDMinor";
pub const MEDIA_BSD_NAME: &str = "DAMediaBSDName";
pub const MEDIA_BSD_UNIT: &str = "DAMediaBSDUnit";
pub const MEDIA_CONTENT: &str = "DAMediaContent";
pub const MEDIA_EJECTABLE: &str = "DAMediaEjectable";
pub const MEDIA_ICON: &str = "DAMediaIcon";
pub const MEDIA_KIND: &str = "DAMediaKind";
pub const MEDIA_LEAF: &str = "DAMediaLeaf";
pub const MEDIA_NAME: &str = "DAMediaName";
pub const MEDIA_PATH: &str = "DAMediaPath";
pub const MEDIA_REMOVABLE: &str = "DAMediaRemovable";
pub const MEDIA_SIZE: &str = "DAMediaSize";
pub const MEDIA_TYPE: &str = "DAMediaType";
pub const MEDIA_UUID: &str = "DAMediaUUID";
pub const MEDIA_WHOLE: &str = "DAMediaWhole";
pub const MEDIA_WRITABLE: &str = "DAMediaWritable";

pub const DEVICE_GUID: &str = "DADeviceGUID";
pub const DEVICE_INTERNAL: &str = "DADeviceInternal";
pub const DEVICE_MODEL: &str = "DADeviceModel";
pub const DEVICE_PATH: &str = "DADevicePath";
pub const DEVICE_PROTOCOL: &str = "DADeviceProtocol";
pub const DEVICE_REVISION: &str = "DADeviceRevision";
pub const DEVICE_UNIT: &str = "DADeviceUnit";
pub const DEVICE_VENDOR: &str = "DADeviceVendor";

pub const BUS_NAME: &str = "DABusName";
pub const BUS_PATH: &str = "DABusPath";

pub const APPEARANCE_TIME: &str = "DAAppearanceTime";

/// Reserved match criterion: its value is a property table matched
/// structurally against the live registry entry instead of by equality.
pub const PROPERTY_MATCH: &str = "IOPropertyMatch";
