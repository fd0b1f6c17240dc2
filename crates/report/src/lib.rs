//! Wire form of disk descriptions and on-disk report bundles.

use anyhow::{anyhow, bail, Context, Result};
use diskarb_core::{keys, Description, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

const UUID_KEYS: [&str; 2] = [keys::MEDIA_UUID, keys::VOLUME_UUID];
const PATH_KEYS: [&str; 1] = [keys::VOLUME_PATH];

/// Encodes a description as a binary property list. UUIDs travel as
/// upper-case strings and paths as POSIX strings.
pub fn serialize_description(description: &Description) -> Result<Vec<u8>> {
    let mut dictionary = plist::Dictionary::new();
    for (key, value) in description.iter() {
        let value = to_plist(value).with_context(|| format!("encode {}", key))?;
        dictionary.insert(key.clone(), value);
    }
    let mut out = Vec::new();
    plist::Value::Dictionary(dictionary)
        .to_writer_binary(&mut out)
        .context("write binary plist")?;
    Ok(out)
}

/// Decodes a property list written by [`serialize_description`], restoring
/// the UUID and path entries to their typed forms. A UUID entry that does
/// not parse is kept as the string it arrived as.
pub fn deserialize_description(bytes: &[u8]) -> Result<Description> {
    let value = plist::Value::from_reader(Cursor::new(bytes)).context("read plist")?;
    let plist::Value::Dictionary(dictionary) = value else {
        bail!("description is not a dictionary");
    };

    let mut description = Description::new();
    for (key, value) in dictionary {
        let mut value = from_plist(value).with_context(|| format!("decode {}", key))?;
        if UUID_KEYS.contains(&key.as_str()) {
            match value.as_str().map(Uuid::parse_str) {
                Some(Ok(uuid)) => value = Value::Uuid(uuid),
                Some(Err(err)) => log::debug!("{} stays a string: {}", key, err),
                None => {}
            }
        } else if PATH_KEYS.contains(&key.as_str()) {
            if let Value::String(text) = value {
                value = Value::Path(PathBuf::from(text));
            }
        }
        description.insert(key, value);
    }
    Ok(description)
}

fn to_plist(value: &Value) -> Result<plist::Value> {
    Ok(match value {
        Value::Boolean(value) => plist::Value::Boolean(*value),
        Value::Integer(value) => plist::Value::Integer((*value).into()),
        Value::Real(value) => plist::Value::Real(*value),
        Value::String(value) => plist::Value::String(value.clone()),
        Value::Data(value) => plist::Value::Data(value.clone()),
        Value::Path(path) => plist::Value::String(
            path.to_str()
                .ok_or_else(|| anyhow!("path {} is not UTF-8", path.display()))?
                .to_string(),
        ),
        Value::Uuid(uuid) => plist::Value::String(uuid.hyphenated().to_string().to_uppercase()),
        Value::Array(items) => {
            plist::Value::Array(items.iter().map(to_plist).collect::<Result<_>>()?)
        }
        Value::Dictionary(entries) => {
            let mut dictionary = plist::Dictionary::new();
            for (key, value) in entries {
                dictionary.insert(key.clone(), to_plist(value)?);
            }
            plist::Value::Dictionary(dictionary)
        }
    })
}

fn from_plist(value: plist::Value) -> Result<Value> {
    Ok(match value {
        plist::Value::Boolean(value) => Value::Boolean(value),
        plist::Value::Integer(value) => Value::Integer(
            value
                .as_signed()
                .ok_or_else(|| anyhow!("integer {:?} out of range", value))?,
        ),
        plist::Value::Real(value) => Value::Real(value),
        plist::Value::String(value) => Value::String(value),
        plist::Value::Data(value) => Value::Data(value),
        plist::Value::Array(items) => {
            Value::Array(items.into_iter().map(from_plist).collect::<Result<_>>()?)
        }
        plist::Value::Dictionary(dictionary) => {
            let mut entries = BTreeMap::new();
            for (key, value) in dictionary {
                entries.insert(key, from_plist(value)?);
            }
            Value::Dictionary(entries)
        }
        other => bail!("unsupported plist value {:?}", other),
    })
}

#[derive(Debug, Serialize)]
pub struct ReportPaths {
    pub run_id: String,
    pub root: PathBuf,
    pub description_json: PathBuf,
    pub description_plist: PathBuf,
    pub run_json: PathBuf,
}

#[derive(Debug, Serialize)]
struct RunMetadata<'a> {
    run_id: &'a str,
    created_at_utc: String,
    disk_id: &'a str,
    summary: Option<&'a str>,
}

/// Writes `description` under `<base>/reports/<run id>/` as JSON and as a
/// binary plist, next to a `run.json` naming the disk.
pub fn create_report_bundle(
    base: impl AsRef<Path>,
    disk_id: &str,
    description: &Description,
    summary: Option<&str>,
) -> Result<ReportPaths> {
    let run_id = Uuid::new_v4().to_string();
    let root = base.as_ref().join("reports").join(&run_id);
    std::fs::create_dir_all(&root).with_context(|| format!("create {}", root.display()))?;

    let description_json = root.join("description.json");
    let description_plist = root.join("description.plist");
    let run_json = root.join("run.json");

    std::fs::write(&description_json, serde_json::to_string_pretty(description)?)?;
    std::fs::write(&description_plist, serialize_description(description)?)?;

    let created_at_utc = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")?;
    let run = RunMetadata {
        run_id: &run_id,
        created_at_utc,
        disk_id,
        summary,
    };
    std::fs::write(&run_json, serde_json::to_string_pretty(&run)?)?;

    Ok(ReportPaths {
        run_id,
        root,
        description_json,
        description_plist,
        run_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Description {
        let mut description = Description::new();
        description.insert(keys::DISK_ID, b"/dev/disk2s1\0".to_vec());
        description.insert(keys::MEDIA_BSD_NAME, "disk2s1");
        description.insert(keys::MEDIA_SIZE, 209_715_200i64);
        description.insert(keys::MEDIA_WHOLE, false);
        description.insert(keys::APPEARANCE_TIME, 781_234_567.25);
        description.insert(
            keys::VOLUME_UUID,
            Uuid::parse_str("3c1b5e9a-8d2f-4c6e-9b1a-0f2e3d4c5b6a").unwrap(),
        );
        description.insert(keys::VOLUME_PATH, PathBuf::from("/Volumes/EFI"));
        let icon: BTreeMap<String, Value> =
            [("IOBundleResourceFile".to_string(), Value::from("Removable.icns"))]
                .into_iter()
                .collect();
        description.insert(keys::MEDIA_ICON, icon);
        description
    }

    #[test]
    fn binary_plist_restores_typed_entries() {
        let description = sample();
        let bytes = serialize_description(&description).unwrap();
        assert!(bytes.starts_with(b"bplist00"));
        assert_eq!(deserialize_description(&bytes).unwrap(), description);
    }

    #[test]
    fn uuids_and_paths_travel_as_strings() {
        let bytes = serialize_description(&sample()).unwrap();
        let value = plist::Value::from_reader(Cursor::new(&bytes[..])).unwrap();
        let dictionary = value.as_dictionary().unwrap();
        assert_eq!(
            dictionary.get(keys::VOLUME_UUID).and_then(plist::Value::as_string),
            Some("3C1B5E9A-8D2F-4C6E-9B1A-0F2E3D4C5B6A")
        );
        assert_eq!(
            dictionary.get(keys::VOLUME_PATH).and_then(plist::Value::as_string),
            Some("/Volumes/EFI")
        );
    }

    #[test]
    fn malformed_uuid_stays_a_string() {
        let mut dictionary = plist::Dictionary::new();
        dictionary.insert(
            keys::MEDIA_UUID.to_string(),
            plist::Value::String("not-a-uuid".to_string()),
        );
        dictionary.insert(
            keys::MEDIA_BSD_NAME.to_string(),
            plist::Value::String("disk3".to_string()),
        );
        let mut bytes = Vec::new();
        plist::Value::Dictionary(dictionary)
            .to_writer_binary(&mut bytes)
            .unwrap();

        let description = deserialize_description(&bytes).unwrap();
        assert_eq!(
            description.get(keys::MEDIA_UUID),
            Some(&Value::String("not-a-uuid".to_string()))
        );
        assert_eq!(description.get(keys::MEDIA_BSD_NAME), Some(&Value::from("disk3")));
    }

    #[test]
    fn non_dictionary_is_rejected() {
        let mut bytes = Vec::new();
        plist::Value::Boolean(true).to_writer_binary(&mut bytes).unwrap();
        assert!(deserialize_description(&bytes).is_err());
    }

    #[test]
    fn report_bundle_layout() {
        let dir = tempfile::tempdir().unwrap();
        let paths =
            create_report_bundle(dir.path(), "/dev/disk2s1", &sample(), Some("disk2s1 ..."))
                .unwrap();

        assert!(paths.root.starts_with(dir.path().join("reports")));
        let plist_bytes = std::fs::read(&paths.description_plist).unwrap();
        assert_eq!(deserialize_description(&plist_bytes).unwrap(), sample());

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&paths.description_json).unwrap()).unwrap();
        assert_eq!(json[keys::MEDIA_BSD_NAME], "disk2s1");
        assert_eq!(json[keys::VOLUME_PATH], "/Volumes/EFI");

        let run: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&paths.run_json).unwrap()).unwrap();
        assert_eq!(run["run_id"], paths.run_id.as_str());
        assert_eq!(run["disk_id"], "/dev/disk2s1");
    }
}
