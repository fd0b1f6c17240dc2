use crate::disk::{DeviceNode, Disk};
use crate::error::BuildError;
use crate::ownership::{self, OwnershipHints};
use crate::runtime;
use diskarb_core::{keys, DiskConfig, DiskOptions, UserDirectory, Value};
use diskarb_registry::text::{decode_legacy, decode_utf8};
use diskarb_registry::{find_ancestor, props, search_property, Plane, Properties, RegistryEntry};
use std::path::PathBuf;
use time::OffsetDateTime;

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z, the reference
/// date appearance times count from.
const REFERENCE_DATE_UNIX_SECONDS: f64 = 978_307_200.0;

/// Builds a disk from a media entry of the device registry.
///
/// The media entry is retained by the returned disk. Every other handle and
/// property snapshot taken along the way is released before returning, on
/// success and on failure alike.
pub fn create_from_media<M, U>(media: &M, users: &U) -> Result<Disk<M>, BuildError>
where
    M: RegistryEntry,
    U: UserDirectory + ?Sized,
{
    build(media, users, runtime::config()).map_err(|err| {
        if media.path(Plane::Service).is_ok() {
            log::error!(
                "unable to create disk, id = {}: {}",
                err.id().unwrap_or("(null)"),
                err
            );
        }
        err
    })
}

fn build<M, U>(media: &M, users: &U, config: &DiskConfig) -> Result<Disk<M>, BuildError>
where
    M: RegistryEntry,
    U: UserDirectory + ?Sized,
{
    let properties = media.properties().map_err(BuildError::Properties)?;

    let name = properties
        .get(props::BSD_NAME)
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty() && name.len() < props::NAME_LIMIT)
        .ok_or(BuildError::InvalidName)?;
    let path = format!("{}{}", config.device_directory, name);

    let mut disk = Disk::new(path.clone(), config);
    disk.device = Some(PathBuf::from(&path));
    disk.device_path = Some(path);
    disk.raw_device_path = Some(format!("{}r{}", config.device_directory, name));
    disk.media = Some(media.clone());
    disk.description.insert(keys::VOLUME_NETWORK, false);

    let id = disk.id.clone();
    let scan = Scan { id: &id, properties: &properties };

    let block_size = scan.required(props::MEDIA_PREFERRED_BLOCK_SIZE)?;
    disk.description.insert(keys::MEDIA_BLOCK_SIZE, block_size.clone());
    let bsd_name = scan.required(props::BSD_NAME)?;
    disk.description.insert(keys::MEDIA_BSD_NAME, bsd_name.clone());

    let major = scan.required_integer(props::BSD_MAJOR)?;
    disk.description.insert(keys::MEDIA_BSD_MAJOR, major);
    let minor = scan.required_integer(props::BSD_MINOR)?;
    disk.description.insert(keys::MEDIA_BSD_MINOR, minor);
    disk.device_node = DeviceNode {
        major: major as u32,
        minor: minor as u32,
    };

    let unit = scan.required_integer(props::BSD_UNIT)?;
    disk.description.insert(keys::MEDIA_BSD_UNIT, unit);
    disk.device_unit = unit as i32;

    let content = scan.required(props::MEDIA_CONTENT)?;
    disk.description.insert(keys::MEDIA_CONTENT, content.clone());
    let ejectable = scan.required(props::MEDIA_EJECTABLE)?;
    disk.description.insert(keys::MEDIA_EJECTABLE, ejectable.clone());

    let icon = search_property(media, Plane::Service, props::MEDIA_ICON)
        .ok_or_else(|| scan.missing(props::MEDIA_ICON))?;
    disk.description.insert(keys::MEDIA_ICON, icon);

    let (kind, type_key) = if media.conforms_to(props::DVD_MEDIA_CLASS) {
        (props::DVD_MEDIA_CLASS, Some(props::DVD_MEDIA_TYPE))
    } else if media.conforms_to(props::CD_MEDIA_CLASS) {
        (props::CD_MEDIA_CLASS, Some(props::CD_MEDIA_TYPE))
    } else {
        (props::MEDIA_CLASS, None)
    };
    disk.description.insert(keys::MEDIA_KIND, kind);
    if let Some(type_key) = type_key {
        disk.description.insert(keys::MEDIA_TYPE, scan.required(type_key)?.clone());
    }

    let leaf = scan.required(props::MEDIA_LEAF)?;
    disk.description.insert(keys::MEDIA_LEAF, leaf.clone());

    let media_name = media.name().map_err(|source| BuildError::Registry {
        id: id.clone(),
        attribute: "media name",
        source,
    })?;
    disk.description.insert(keys::MEDIA_NAME, decode_legacy(&media_name));

    let media_path = media
        .path(Plane::DeviceTree)
        .or_else(|_| media.path(Plane::Service))
        .map_err(|source| BuildError::Registry {
            id: id.clone(),
            attribute: "media path",
            source,
        })?;
    disk.description.insert(keys::MEDIA_PATH, decode_legacy(&media_path));

    let fields = [
        (props::MEDIA_REMOVABLE, keys::MEDIA_REMOVABLE),
        (props::MEDIA_SIZE, keys::MEDIA_SIZE),
        (props::MEDIA_WHOLE, keys::MEDIA_WHOLE),
        (props::MEDIA_WRITABLE, keys::MEDIA_WRITABLE),
    ];
    for (registry_key, key) in fields {
        disk.description.insert(key, scan.required(registry_key)?.clone());
    }

    drop(properties);

    let device = find_ancestor(media, Plane::Service, |entry| {
        entry.conforms_to(props::BLOCK_STORAGE_DEVICE_CLASS)
    })
    .ok_or_else(|| BuildError::NoBlockStorageDevice { id: id.clone() })?;

    let device_properties = device.properties().map_err(|source| BuildError::Registry {
        id: id.clone(),
        attribute: "device properties",
        source,
    })?;
    describe_device(&mut disk, &device_properties);
    drop(device_properties);

    let device_path = device.path(Plane::Service).map_err(|source| BuildError::Registry {
        id: id.clone(),
        attribute: "device path",
        source,
    })?;
    let device_path = decode_utf8(&device_path).ok_or_else(|| BuildError::Undecodable {
        id: id.clone(),
        attribute: "device path",
    })?;
    disk.description.insert(keys::DEVICE_PATH, device_path);

    if let Some(unit) = search_property(&device, Plane::Service, props::UNIT) {
        disk.description.insert(keys::DEVICE_UNIT, unit);
    }

    if let Some(Value::Integer(guid)) = search_property(&device, Plane::Service, props::GUID) {
        let guid = (guid as u64).to_be_bytes().to_vec();
        disk.description.insert(keys::DEVICE_GUID, guid);
    }

    let bus = find_ancestor(&device, Plane::Service, |entry| {
        entry.in_plane(Plane::DeviceTree)
    });
    if let Some(bus) = bus {
        let bus_name = bus
            .name_in_plane(Plane::DeviceTree)
            .map_err(|source| BuildError::Registry {
                id: id.clone(),
                attribute: "bus name",
                source,
            })?;
        let bus_name = decode_utf8(&bus_name).ok_or_else(|| BuildError::Undecodable {
            id: id.clone(),
            attribute: "bus name",
        })?;
        disk.description.insert(keys::BUS_NAME, bus_name);

        let bus_path = bus.path(Plane::DeviceTree).map_err(|source| BuildError::Registry {
            id: id.clone(),
            attribute: "bus path",
            source,
        })?;
        let bus_path = decode_utf8(&bus_path).ok_or_else(|| BuildError::Undecodable {
            id: id.clone(),
            attribute: "bus path",
        })?;
        disk.description.insert(keys::BUS_PATH, bus_path);
    }

    disk.description.insert(keys::APPEARANCE_TIME, appearance_time());

    match search_property(media, Plane::Service, props::AUTO_DISK_MOUNT) {
        None => disk.options |= DiskOptions::MOUNT_AUTOMATIC,
        Some(Value::Boolean(true)) => {
            disk.options |= DiskOptions::MOUNT_AUTOMATIC | DiskOptions::MOUNT_AUTOMATIC_NO_DEFER
        }
        Some(_) => {}
    }

    let eject = search_property(&device, Plane::Service, props::EJECT_UPON_LOGOUT);
    if eject.is_some_and(|value| value.is_true()) {
        disk.options |= DiskOptions::EJECT_UPON_LOGOUT;
    }

    let hints = OwnershipHints {
        removable: disk
            .description
            .get(keys::MEDIA_REMOVABLE)
            .is_some_and(Value::is_true),
        external: disk.description.get(keys::DEVICE_INTERNAL) == Some(&Value::Boolean(false)),
        owner_uid: search_property(&device, Plane::Service, props::OWNER_UID)
            .and_then(|value| value.as_i64())
            .map(|uid| uid as u32),
        owner_mode: search_property(&device, Plane::Service, props::OWNER_MODE)
            .and_then(|value| value.as_i64())
            .map(|mode| mode as u32),
    };
    let ownership = ownership::resolve(&hints, users, config);
    disk.credentials = ownership.credentials;
    disk.mode = ownership.mode;

    Ok(disk)
}

/// Optional device attributes from the characteristics sub-tables.
fn describe_device<M>(disk: &mut Disk<M>, properties: &Properties) {
    if let Some(protocol) = properties
        .get(props::PROTOCOL_CHARACTERISTICS)
        .and_then(Value::as_dictionary)
    {
        match protocol
            .get(props::PHYSICAL_INTERCONNECT_LOCATION)
            .and_then(Value::as_str)
        {
            Some(props::LOCATION_INTERNAL) => {
                disk.description.insert(keys::DEVICE_INTERNAL, true)
            }
            Some(props::LOCATION_EXTERNAL) => {
                disk.description.insert(keys::DEVICE_INTERNAL, false)
            }
            _ => {}
        }
        if let Some(interconnect) = protocol.get(props::PHYSICAL_INTERCONNECT_TYPE) {
            disk.description.insert(keys::DEVICE_PROTOCOL, interconnect.clone());
        }
    }

    if let Some(characteristics) = properties
        .get(props::DEVICE_CHARACTERISTICS)
        .and_then(Value::as_dictionary)
    {
        let fields = [
            (props::PRODUCT_NAME, keys::DEVICE_MODEL),
            (props::PRODUCT_REVISION_LEVEL, keys::DEVICE_REVISION),
            (props::VENDOR_NAME, keys::DEVICE_VENDOR),
        ];
        for (registry_key, key) in fields {
            if let Some(value) = characteristics.get(registry_key) {
                disk.description.insert(key, value.clone());
            }
        }
    }
}

fn appearance_time() -> f64 {
    let now = OffsetDateTime::now_utc();
    now.unix_timestamp_nanos() as f64 / 1e9 - REFERENCE_DATE_UNIX_SECONDS
}

/// Mandatory lookups in the media property snapshot.
struct Scan<'a> {
    id: &'a str,
    properties: &'a Properties,
}

impl Scan<'_> {
    fn missing(&self, attribute: &'static str) -> BuildError {
        BuildError::MissingAttribute {
            id: self.id.to_string(),
            attribute,
        }
    }

    fn required(&self, attribute: &'static str) -> Result<&Value, BuildError> {
        self.properties
            .get(attribute)
            .ok_or_else(|| self.missing(attribute))
    }

    fn required_integer(&self, attribute: &'static str) -> Result<i64, BuildError> {
        self.required(attribute)?
            .as_i64()
            .ok_or_else(|| BuildError::InvalidAttribute {
                id: self.id.to_string(),
                attribute,
            })
    }
}
