//! The typed configuration store.

use std::path::{Path, PathBuf};

use ember_core::{
    ChunkPos, ConfigError, Document, DocumentValue, FromDocumentValue, Inventory, ItemStack,
    Location, SoundTag, Timestamp, WorldName,
};
use uuid::Uuid;

use crate::codec::{self, RichValue};

/// A typed view over one configuration file.
///
/// The store owns an in-memory [`Document`] and the path it was loaded
/// from. Reads and writes go against the in-memory tree; nothing touches
/// the filesystem until [`save`](Config::save) is called. All mutation is
/// `&mut self`; a store is not shared across threads.
#[derive(Debug, Clone)]
pub struct Config {
    file: PathBuf,
    header: Option<String>,
    doc: Document,
}

impl Config {
    /// Open the configuration file at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or malformed
    /// file also yields an empty store, with the failure logged, so one
    /// corrupt file never takes the plugin down.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let file = path.into();
        let doc = match Document::load(&file) {
            Ok(doc) => doc,
            Err(e) => {
                log::error!("failed to load {}: {}", file.display(), e);
                Document::new()
            }
        };
        Self {
            file,
            header: None,
            doc,
        }
    }

    /// Open `path` and copy every key from `defaults` that is not already
    /// present.
    pub fn with_defaults(path: impl Into<PathBuf>, defaults: &Document) -> Self {
        let mut config = Self::open(path);
        config.doc.copy_defaults(defaults);
        config
    }

    /// Wrap an already-built document, associating it with `path` for
    /// later saves.
    pub fn from_document(path: impl Into<PathBuf>, doc: Document) -> Self {
        Self {
            file: path.into(),
            header: None,
            doc,
        }
    }

    /// The file this store reads from and saves to.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The comment header written at the top of the saved file, if any.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Set or clear the comment header.
    pub fn set_header(&mut self, header: Option<impl Into<String>>) {
        self.header = header.map(Into::into);
    }

    /// Direct access to the underlying document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Whether any value is stored at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.doc.contains(path)
    }

    /// The raw value at `path`.
    pub fn get(&self, path: &str) -> Option<&DocumentValue> {
        self.doc.get(path)
    }

    /// The value at `path` converted to `T`, or `None` when absent or of
    /// the wrong shape.
    pub fn get_as<T: FromDocumentValue>(&self, path: &str) -> Option<T> {
        self.doc.get(path).and_then(T::from_document_value)
    }

    // -- fail-soft primitive getters -------------------------------------

    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.doc.get(path).and_then(DocumentValue::as_str)
    }

    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.doc.get(path).and_then(DocumentValue::as_i64)
    }

    pub fn get_boolean(&self, path: &str) -> Option<bool> {
        self.doc.get(path).and_then(DocumentValue::as_bool)
    }

    pub fn get_double(&self, path: &str) -> Option<f64> {
        self.doc.get(path).and_then(DocumentValue::as_f64)
    }

    /// A list of strings at `path`. Missing or non-list values yield an
    /// empty vector; non-string elements are skipped.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        self.filtered_list(path, |v| v.as_str().map(String::from))
    }

    /// A list of integers at `path`, with the same tolerance as
    /// [`get_string_list`](Config::get_string_list).
    pub fn get_int_list(&self, path: &str) -> Vec<i64> {
        self.filtered_list(path, DocumentValue::as_i64)
    }

    fn filtered_list<T>(&self, path: &str, f: impl Fn(&DocumentValue) -> Option<T>) -> Vec<T> {
        self.doc
            .get(path)
            .and_then(DocumentValue::as_sequence)
            .map(|items| items.iter().filter_map(f).collect())
            .unwrap_or_default()
    }

    // -- text-round-trip numeric getters ---------------------------------

    /// A wide integer at `path`, parsed from the value's display text.
    ///
    /// Values written through [`set_value`](Config::set_value) with an
    /// `i64` are stored as decimal text, so this is their read path. A
    /// native integer also parses. Everything else, including an absent
    /// path, is a coercion error.
    pub fn get_long(&self, path: &str) -> Result<i64, ConfigError> {
        codec::decode_long(&self.doc, path)
    }

    /// A single-precision float at `path`, parsed from display text with
    /// the same rules as [`get_long`](Config::get_long).
    pub fn get_float(&self, path: &str) -> Result<f32, ConfigError> {
        codec::decode_float(&self.doc, path)
    }

    // -- rich typed getters ----------------------------------------------

    pub fn get_timestamp(&self, path: &str) -> ember_core::Result<Timestamp> {
        Ok(codec::decode_timestamp(&self.doc, path)?)
    }

    pub fn get_uuid(&self, path: &str) -> ember_core::Result<Uuid> {
        Ok(codec::decode_uuid(&self.doc, path)?)
    }

    pub fn get_sound(&self, path: &str) -> ember_core::Result<SoundTag> {
        Ok(codec::decode_sound(&self.doc, path)?)
    }

    pub fn get_world(&self, path: &str) -> ember_core::Result<WorldName> {
        Ok(codec::decode_world(&self.doc, path)?)
    }

    pub fn get_location(&self, path: &str) -> ember_core::Result<Location> {
        Ok(codec::decode_location(&self.doc, path)?)
    }

    pub fn get_chunk(&self, path: &str) -> ember_core::Result<ChunkPos> {
        Ok(codec::decode_chunk(&self.doc, path)?)
    }

    /// The item stack at `path`, or `None` when absent or malformed.
    pub fn get_item(&self, path: &str) -> Option<ItemStack> {
        codec::decode_item(&self.doc, path)
    }

    /// Reconstruct a slot container from `path`, reading its size from
    /// the stored `size` key.
    pub fn get_inventory(&self, path: &str, title: &str) -> ember_core::Result<Inventory> {
        Ok(codec::decode_inventory(&self.doc, path, title)?)
    }

    /// Reconstruct a slot container of a known size, tolerating a missing
    /// stored size and skipping malformed slots.
    pub fn get_inventory_sized(&self, path: &str, size: usize, title: &str) -> Inventory {
        codec::decode_inventory_sized(&self.doc, path, size, title)
    }

    // -- writes ----------------------------------------------------------

    /// Store a value at `path`.
    ///
    /// The value is dispatched through the codec registry: recognized rich
    /// kinds are expanded into their storage shape, document-native values
    /// are stored as-is, and `Absent` (including `None` options) clears
    /// the path.
    pub fn set_value(&mut self, path: &str, value: impl Into<RichValue>) {
        match value.into() {
            RichValue::Absent => {
                self.doc.remove(path);
            }
            RichValue::Native(v) => self.doc.set(path, v),
            rich @ (RichValue::Inventory(_)
            | RichValue::Timestamp(_)
            | RichValue::Long(_)
            | RichValue::Uuid(_)
            | RichValue::Sound(_)
            | RichValue::Location(_)
            | RichValue::Chunk(_)
            | RichValue::World(_)) => {
                // Exhaustive over the registry's kinds: adding a variant
                // without extending this arm fails to compile
                let kind = codec::expand(&rich, path, &mut self.doc);
                debug_assert!(kind.is_some(), "registry must cover {:?}", rich);
            }
        }
    }

    /// Store `value` at `path` only when the path is currently empty.
    pub fn set_default(&mut self, path: &str, value: impl Into<RichValue>) {
        if !self.doc.contains(path) {
            self.set_value(path, value);
        }
    }

    /// Read `path` as `T`, falling back to `default` and persisting it
    /// when the read misses.
    ///
    /// Note that default and read paths can disagree for kinds stored as
    /// text: an `i64` default is written as a decimal string, which a
    /// later `get_or_set_default::<i64>` will not read back as an integer
    /// and will overwrite with the default again. Use
    /// [`get_long`](Config::get_long) for wide integers.
    pub fn get_or_set_default<T>(&mut self, path: &str, default: T) -> T
    where
        T: FromDocumentValue + Into<RichValue> + Clone,
    {
        match self.get_as::<T>(path) {
            Some(stored) => stored,
            None => {
                self.set_value(path, default.clone());
                default
            }
        }
    }

    /// Top-level key names, in stored order.
    pub fn keys(&self) -> Vec<String> {
        self.doc.keys()
    }

    /// Key names of the mapping at `path`. Empty when the path does not
    /// hold a mapping.
    pub fn keys_at(&self, path: &str) -> Vec<String> {
        self.doc.keys_at(path)
    }

    /// Remove every stored key.
    pub fn clear(&mut self) {
        for key in self.doc.keys() {
            self.doc.remove(&key);
        }
    }

    // -- filesystem ------------------------------------------------------

    /// Write the document to the store's file.
    ///
    /// # Returns
    ///
    /// `true` on success. Failures are logged and reported as `false`
    /// rather than propagated, so a failed save never unwinds the caller.
    pub fn save(&self) -> bool {
        self.save_to(&self.file)
    }

    /// Write the document to an arbitrary path, leaving the store's own
    /// file association unchanged.
    pub fn save_to(&self, path: &Path) -> bool {
        match self.doc.save(path, self.header.as_deref()) {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to save {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Create the store's file on disk if it does not exist yet.
    ///
    /// # Returns
    ///
    /// `true` when the file was created, `false` when it already existed
    /// or creation failed (the latter is logged).
    pub fn create_file(&self) -> bool {
        if let Some(parent) = self.file.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("failed to create {}: {}", parent.display(), e);
                return false;
            }
        }
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.file)
        {
            Ok(_) => true,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => false,
            Err(e) => {
                log::error!("failed to create {}: {}", self.file.display(), e);
                false
            }
        }
    }

    /// Discard the in-memory document and re-read the file.
    pub fn reload(&mut self) {
        self.doc = match Document::load(&self.file) {
            Ok(doc) => doc,
            Err(e) => {
                log::error!("failed to reload {}: {}", self.file.display(), e);
                Document::new()
            }
        };
    }
}
