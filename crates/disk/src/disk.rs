use crate::summary;
use anyhow::Result;
use diskarb_core::{
    keys, Credentials, Description, DiskConfig, DiskOptions, DiskState, Gid, Uid, Value,
};
use diskarb_registry::RegistryEntry;
use std::any::Any;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Opaque payload a collaborator attaches to a disk (claim callback,
/// context, file-system handle). The disk only holds a reference.
pub type Attachment = Rc<dyn Any>;

const HASHED_ID_BYTES: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DeviceNode {
    pub major: u32,
    pub minor: u32,
}

/// A disk or mounted volume, identified by `id` for its whole lifetime.
///
/// Equality and hashing look at the id only. The description can only be
/// changed through [`Disk::set_description`], which drops the cached
/// serialization.
pub struct Disk<M> {
    pub(crate) id: String,
    pub(crate) bypath: Option<PathBuf>,
    pub(crate) claim: Option<Attachment>,
    pub(crate) context: Option<Attachment>,
    pub(crate) context_reentry: Option<Attachment>,
    pub(crate) description: Description,
    pub(crate) device: Option<PathBuf>,
    pub(crate) device_node: DeviceNode,
    pub(crate) device_path: Option<String>,
    pub(crate) raw_device_path: Option<String>,
    pub(crate) device_unit: i32,
    pub(crate) filesystem: Option<Attachment>,
    pub(crate) media: Option<M>,
    pub(crate) mode: u32,
    pub(crate) options: DiskOptions,
    pub(crate) serialization: OnceCell<Rc<[u8]>>,
    pub(crate) state: DiskState,
    pub(crate) credentials: Credentials,
}

impl<M> Disk<M> {
    pub(crate) fn new(id: impl Into<String>, config: &DiskConfig) -> Self {
        let id = id.into();
        let mut description = Description::new();
        let mut id_bytes = id.clone().into_bytes();
        id_bytes.push(0);
        description.insert(keys::DISK_ID, id_bytes);

        Self {
            id,
            bypath: None,
            claim: None,
            context: None,
            context_reentry: None,
            description,
            device: None,
            device_node: DeviceNode::default(),
            device_path: None,
            raw_device_path: None,
            device_unit: -1,
            filesystem: None,
            media: None,
            mode: config.default_mode,
            options: DiskOptions::empty(),
            serialization: OnceCell::new(),
            state: DiskState::empty(),
            credentials: config.admin_credentials(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bypath(&self) -> Option<&Path> {
        self.bypath.as_deref()
    }

    pub fn device(&self) -> Option<&Path> {
        self.device.as_deref()
    }

    pub fn device_node(&self) -> DeviceNode {
        self.device_node
    }

    /// Block-buffered device path, `/dev/diskN`.
    pub fn device_path(&self) -> Option<&str> {
        self.device_path.as_deref()
    }

    /// Character device path, `/dev/rdiskN`.
    pub fn raw_device_path(&self) -> Option<&str> {
        self.raw_device_path.as_deref()
    }

    /// BSD unit number, -1 when unknown.
    pub fn device_unit(&self) -> i32 {
        self.device_unit
    }

    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    pub fn claim(&self) -> Option<&Attachment> {
        self.claim.as_ref()
    }

    pub fn context(&self) -> Option<&Attachment> {
        self.context.as_ref()
    }

    pub fn context_reentry(&self) -> Option<&Attachment> {
        self.context_reentry.as_ref()
    }

    pub fn filesystem(&self) -> Option<&Attachment> {
        self.filesystem.as_ref()
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn description_value(&self, key: &str) -> Option<&Value> {
        self.description.get(key)
    }

    pub fn compare_description(&self, key: &str, value: Option<&Value>) -> Ordering {
        self.description.compare(key, value)
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn options(&self) -> DiskOptions {
        self.options
    }

    pub fn option(&self, option: DiskOptions) -> bool {
        self.options.intersects(option)
    }

    pub fn state(&self) -> DiskState {
        self.state
    }

    pub fn has_state(&self, state: DiskState) -> bool {
        self.state.intersects(state)
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials
    }

    pub fn set_bypath(&mut self, bypath: Option<PathBuf>) {
        self.bypath = bypath;
    }

    pub fn set_claim(&mut self, claim: Option<Attachment>) {
        self.claim = claim;
    }

    pub fn set_context(&mut self, context: Option<Attachment>) {
        self.context = context;
    }

    pub fn set_context_reentry(&mut self, context: Option<Attachment>) {
        self.context_reentry = context;
    }

    pub fn set_filesystem(&mut self, filesystem: Option<Attachment>) {
        self.filesystem = filesystem;
    }

    /// Stores or, with `None`, removes a description value and invalidates
    /// the cached serialization.
    pub fn set_description(&mut self, key: impl Into<String>, value: Option<Value>) {
        self.description.set(key, value);
        self.serialization.take();
    }

    pub fn set_options(&mut self, options: DiskOptions, value: bool) {
        self.options.set(options, value);
    }

    pub fn set_state(&mut self, state: DiskState, value: bool) {
        self.state.set(state, value);
    }

    pub fn set_effective_uid(&mut self, uid: Uid) {
        self.credentials.effective_uid = uid;
    }

    pub fn set_effective_gid(&mut self, gid: Gid) {
        self.credentials.effective_gid = gid;
    }

    pub fn set_real_uid(&mut self, uid: Uid) {
        self.credentials.real_uid = uid;
    }

    pub fn set_real_gid(&mut self, gid: Gid) {
        self.credentials.real_gid = gid;
    }

    pub fn set_mode(&mut self, mode: u32) {
        self.mode = mode;
    }

    /// Encoded description, computed on first use and shared until the
    /// description changes.
    pub fn serialization(&self) -> Result<Rc<[u8]>> {
        if let Some(bytes) = self.serialization.get() {
            return Ok(bytes.clone());
        }
        let bytes: Rc<[u8]> = diskarb_report::serialize_description(&self.description)?.into();
        let _ = self.serialization.set(bytes.clone());
        Ok(bytes)
    }

    pub fn is_serialized(&self) -> bool {
        self.serialization.get().is_some()
    }

    /// One-line volume summary, only for mountable volumes.
    pub fn log_line(&self) -> Option<String> {
        summary::summary_line(&self.description)
    }

    pub fn log(&self) {
        if let Some(line) = self.log_line() {
            log::info!("{}", line);
        }
    }
}

impl<M: RegistryEntry> Disk<M> {
    /// Every criterion must be satisfied by the description; the reserved
    /// property-match criterion is checked against the live media entry.
    pub fn matches(&self, criteria: &Description) -> bool {
        self.description.matches(criteria, |table| {
            self.media
                .as_ref()
                .map(|media| media.matches_property_table(table))
                .unwrap_or(false)
        })
    }
}

impl<M> PartialEq for Disk<M> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<M> Eq for Disk<M> {}

impl<M> Hash for Disk<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let bytes = self.id.as_bytes();
        state.write(&bytes[..bytes.len().min(HASHED_ID_BYTES)]);
    }
}

impl<M> fmt::Display for Disk<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl<M> fmt::Debug for Disk<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disk")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
