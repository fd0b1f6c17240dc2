//! Registry trees shaped like a real storage stack, for builder tests.

use diskarb_core::Value;
use diskarb_registry::{props, MemEntry, Properties};
use std::collections::BTreeMap;

/// Entries of a built tree. The media is the only handle the tree keeps on
/// its leaf; ancestors are held both here and by their children.
pub(crate) struct Tree {
    pub bus: Option<MemEntry>,
    pub device: MemEntry,
    pub media: MemEntry,
}

pub(crate) struct TreeSpec {
    media_classes: Vec<&'static str>,
    media_name: Vec<u8>,
    media: Properties,
    device: Properties,
    bus: Option<(Vec<u8>, Vec<u8>)>,
    media_device_tree: Option<(Vec<u8>, Vec<u8>)>,
    unreadable: bool,
}

impl TreeSpec {
    /// A whole internal disk, `disk2`, under an internal SATA device
    /// attached to a bus in the device tree.
    pub fn new() -> Self {
        let mut media = Properties::new();
        let mut put = |key: &str, value: Value| {
            media.insert(key.to_string(), value);
        };
        put(props::BSD_NAME, "disk2".into());
        put(props::BSD_MAJOR, 1i64.into());
        put(props::BSD_MINOR, 8i64.into());
        put(props::BSD_UNIT, 2i64.into());
        put(props::MEDIA_PREFERRED_BLOCK_SIZE, 512i64.into());
        put(props::MEDIA_CONTENT, "GUID_partition_scheme".into());
        put(props::MEDIA_EJECTABLE, false.into());
        put(props::MEDIA_LEAF, false.into());
        put(props::MEDIA_REMOVABLE, false.into());
        put(props::MEDIA_SIZE, 500_107_862_016i64.into());
        put(props::MEDIA_WHOLE, true.into());
        put(props::MEDIA_WRITABLE, true.into());

        let protocol: BTreeMap<String, Value> = [
            (
                props::PHYSICAL_INTERCONNECT_LOCATION.to_string(),
                Value::from(props::LOCATION_INTERNAL),
            ),
            (props::PHYSICAL_INTERCONNECT_TYPE.to_string(), Value::from("SATA")),
        ]
        .into_iter()
        .collect();
        let characteristics: BTreeMap<String, Value> = [
            (props::PRODUCT_NAME.to_string(), Value::from("APPLE SSD")),
            (props::PRODUCT_REVISION_LEVEL.to_string(), Value::from("1.0")),
            (props::VENDOR_NAME.to_string(), Value::from("Apple")),
        ]
        .into_iter()
        .collect();
        let icon: BTreeMap<String, Value> = [
            (
                "CFBundleIdentifier".to_string(),
                Value::from("com.apple.iokit.IOStorageFamily"),
            ),
            ("IOBundleResourceFile".to_string(), Value::from("Internal.icns")),
        ]
        .into_iter()
        .collect();

        let mut device = Properties::new();
        device.insert(props::PROTOCOL_CHARACTERISTICS.to_string(), protocol.into());
        device.insert(props::DEVICE_CHARACTERISTICS.to_string(), characteristics.into());
        device.insert(props::MEDIA_ICON.to_string(), icon.into());

        Self {
            media_classes: vec![props::MEDIA_CLASS],
            media_name: b"APPLE SSD Media".to_vec(),
            media,
            device,
            bus: Some((b"sata".to_vec(), b"IODeviceTree:/PCI0@0/SATA@1F,2".to_vec())),
            media_device_tree: None,
            unreadable: false,
        }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.media_classes.push(class);
        self
    }

    pub fn name(mut self, name: &[u8]) -> Self {
        self.media_name = name.to_vec();
        self
    }

    pub fn media(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.media.insert(key.to_string(), value.into());
        self
    }

    pub fn without_media(mut self, key: &str) -> Self {
        self.media.remove(key);
        self
    }

    pub fn device(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.device.insert(key.to_string(), value.into());
        self
    }

    pub fn without_device(mut self, key: &str) -> Self {
        self.device.remove(key);
        self
    }

    pub fn without_bus(mut self) -> Self {
        self.bus = None;
        self
    }

    /// Device-tree name and path of the bus above the device.
    pub fn bus(mut self, name: &[u8], path: &[u8]) -> Self {
        self.bus = Some((name.to_vec(), path.to_vec()));
        self
    }

    /// Attaches the media itself to the device-tree plane.
    pub fn media_device_tree(mut self, name: &[u8], path: &[u8]) -> Self {
        self.media_device_tree = Some((name.to_vec(), path.to_vec()));
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    pub fn build(self) -> Tree {
        let bus = self.bus.map(|(name, path)| {
            MemEntry::builder("pci-bridge")
                .class("IOPCIDevice")
                .device_tree(name, path)
                .build()
        });

        let mut port = MemEntry::builder("AppleAHCIDiskDriver").class("IOService");
        if let Some(bus) = &bus {
            port = port.parent(bus);
        }
        let port = port.build();

        let mut device = MemEntry::builder("IOAHCIBlockStorageDevice")
            .class(props::BLOCK_STORAGE_DEVICE_CLASS)
            .parent(&port);
        for (key, value) in self.device {
            device = device.property(&key, value);
        }
        let device = device.build();

        let driver = MemEntry::builder("IOBlockStorageDriver")
            .class("IOBlockStorageDriver")
            .parent(&device)
            .build();

        let mut media = MemEntry::builder(self.media_name).parent(&driver);
        for class in self.media_classes {
            media = media.class(class);
        }
        for (key, value) in self.media {
            media = media.property(&key, value);
        }
        if let Some((name, path)) = self.media_device_tree {
            media = media.device_tree(name, path);
        }
        if self.unreadable {
            media = media.unreadable();
        }

        Tree {
            bus,
            device,
            media: media.build(),
        }
    }
}
