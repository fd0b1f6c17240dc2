//! Registry class and property names read by the disk builders.

pub const MEDIA_CLASS: &str = "IOMedia";
pub const CD_MEDIA_CLASS: &str = "IOCDMedia";
pub const DVD_MEDIA_CLASS: &str = "IODVDMedia";
pub const BLOCK_STORAGE_DEVICE_CLASS: &str = "IOBlockStorageDevice";

pub const BSD_NAME: &str = "BSD Name";
pub const BSD_MAJOR: &str = "BSD Major";
pub const BSD_MINOR: &str = "BSD Minor";
pub const BSD_UNIT: &str = "BSD Unit";

pub const MEDIA_PREFERRED_BLOCK_SIZE: &str = "Preferred Block Size";
pub const MEDIA_CONTENT: &str = "Content";
pub const MEDIA_EJECTABLE: &str = "Ejectable";
pub const MEDIA_ICON: &str = "IOMediaIcon";
pub const MEDIA_LEAF: &str = "Leaf";
pub const MEDIA_REMOVABLE: &str = "Removable";
pub const MEDIA_SIZE: &str = "Size";
pub const MEDIA_WHOLE: &str = "Whole";
pub const MEDIA_WRITABLE: &str = "Writable";
pub const CD_MEDIA_TYPE: &str = "Type";
pub const DVD_MEDIA_TYPE: &str = "Type";

pub const PROTOCOL_CHARACTERISTICS: &str = "Protocol Characteristics";
pub const PHYSICAL_INTERCONNECT_LOCATION: &str = "Physical Interconnect Location";
pub const PHYSICAL_INTERCONNECT_TYPE: &str = "Physical Interconnect";
pub const LOCATION_INTERNAL: &str = "Internal";
pub const LOCATION_EXTERNAL: &str = "External";

pub const DEVICE_CHARACTERISTICS: &str = "Device Characteristics";
pub const PRODUCT_NAME: &str = "Product Name";
pub const PRODUCT_REVISION_LEVEL: &str = "Product Revision Level";
pub const VENDOR_NAME: &str = "Vendor Name";

pub const UNIT: &str = "IOUnit";
pub const GUID: &str = "GUID";

pub const AUTO_DISK_MOUNT: &str = "autodiskmount";
pub const EJECT_UPON_LOGOUT: &str = "eject-upon-logout";
pub const OWNER_UID: &str = "owner-uid";
pub const OWNER_MODE: &str = "owner-mode";

pub const PROVIDER_CLASS: &str = "IOProviderClass";
pub const NAME_MATCH: &str = "IONameMatch";
pub const PROPERTY_MATCH: &str = "IOPropertyMatch";

/// Registry entry names are bounded C strings.
pub const NAME_LIMIT: usize = 128;
