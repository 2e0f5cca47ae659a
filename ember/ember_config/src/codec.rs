//! The value codec registry.
//!
//! Each codec associates one recognized value kind with an expansion that
//! flattens the value into primitive document paths, and a mirror decode
//! that reconstructs it from those paths. Codecs are consulted in a fixed
//! priority order on write; the first matching entry wins. No type tag is
//! stored, so decoding is driven entirely by the caller picking the right
//! getter — round-tripping through the wrong getter yields garbage, not an
//! error. This asymmetry is deliberate and matches the stored file format.

use ember_core::{
    ChunkPos, ConfigError, Document, DocumentValue, Inventory, ItemStack, Location, SoundTag,
    Timestamp, WorldName,
};
use uuid::Uuid;

/// A value on its way into the store.
///
/// This tagged union is the write surface of the marshalling protocol:
/// every representation the codec registry recognizes, plus `Native` for
/// anything the document model holds as-is and `Absent` for clears.
#[derive(Debug, Clone, PartialEq)]
pub enum RichValue {
    /// No value; setting this clears the path.
    Absent,

    /// A fixed-size slot container, expanded into `size` plus one key per
    /// slot.
    Inventory(Inventory),

    /// A point in time, stored as its epoch-millisecond decimal string.
    Timestamp(Timestamp),

    /// A wide integer, stored as its decimal string so no precision is lost
    /// to the document's native numeric type.
    Long(i64),

    /// An opaque 128-bit identifier, stored in canonical hyphenated form.
    Uuid(Uuid),

    /// A named sound effect tag, stored as its name.
    Sound(SoundTag),

    /// A point with orientation, expanded into `x`/`y`/`z`/`pitch`/`yaw`
    /// plus the owning world's name.
    Location(Location),

    /// A grid cell, expanded into `x`/`z` plus the owning world's name.
    Chunk(ChunkPos),

    /// A region reference, stored as the world name.
    World(WorldName),

    /// A document-native value, stored without transformation.
    Native(DocumentValue),
}

impl From<Inventory> for RichValue {
    fn from(v: Inventory) -> Self {
        Self::Inventory(v)
    }
}

impl From<Timestamp> for RichValue {
    fn from(v: Timestamp) -> Self {
        Self::Timestamp(v)
    }
}

// i64 is the wide-integer kind; i32 stays document-native below.
impl From<i64> for RichValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<Uuid> for RichValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<SoundTag> for RichValue {
    fn from(v: SoundTag) -> Self {
        Self::Sound(v)
    }
}

impl From<Location> for RichValue {
    fn from(v: Location) -> Self {
        Self::Location(v)
    }
}

impl From<ChunkPos> for RichValue {
    fn from(v: ChunkPos) -> Self {
        Self::Chunk(v)
    }
}

impl From<WorldName> for RichValue {
    fn from(v: WorldName) -> Self {
        Self::World(v)
    }
}

impl From<DocumentValue> for RichValue {
    fn from(v: DocumentValue) -> Self {
        Self::Native(v)
    }
}

impl From<ItemStack> for RichValue {
    fn from(v: ItemStack) -> Self {
        Self::Native(v.to_value())
    }
}

impl From<bool> for RichValue {
    fn from(v: bool) -> Self {
        Self::Native(v.into())
    }
}

impl From<i32> for RichValue {
    fn from(v: i32) -> Self {
        Self::Native(v.into())
    }
}

impl From<f64> for RichValue {
    fn from(v: f64) -> Self {
        Self::Native(v.into())
    }
}

impl From<&str> for RichValue {
    fn from(v: &str) -> Self {
        Self::Native(v.into())
    }
}

impl From<String> for RichValue {
    fn from(v: String) -> Self {
        Self::Native(v.into())
    }
}

impl<T: Into<DocumentValue>> From<Vec<T>> for RichValue {
    fn from(v: Vec<T>) -> Self {
        Self::Native(v.into())
    }
}

/// The optional-unwrap step of the dispatch algorithm: an empty option
/// clears the path, a present one recurses on the wrapped value.
impl<T: Into<RichValue>> From<Option<T>> for RichValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Absent,
        }
    }
}

/// One registered codec: a kind name and its expansion function.
///
/// The expansion returns `false` when the value is not of this entry's
/// kind, letting dispatch fall through to the next entry.
pub(crate) struct CodecEntry {
    pub kind: &'static str,
    pub expand: fn(&RichValue, &str, &mut Document) -> bool,
}

/// The registry, in dispatch priority order. Registered once, immutable.
pub(crate) const CODECS: &[CodecEntry] = &[
    CodecEntry {
        kind: "inventory",
        expand: expand_inventory,
    },
    CodecEntry {
        kind: "timestamp",
        expand: expand_timestamp,
    },
    CodecEntry {
        kind: "long",
        expand: expand_long,
    },
    CodecEntry {
        kind: "uuid",
        expand: expand_uuid,
    },
    CodecEntry {
        kind: "sound",
        expand: expand_sound,
    },
    CodecEntry {
        kind: "location",
        expand: expand_location,
    },
    CodecEntry {
        kind: "chunk",
        expand: expand_chunk,
    },
    CodecEntry {
        kind: "world",
        expand: expand_world,
    },
];

/// Run the registry against a value. Returns the kind that matched.
pub(crate) fn expand(value: &RichValue, path: &str, doc: &mut Document) -> Option<&'static str> {
    CODECS
        .iter()
        .find(|entry| (entry.expand)(value, path, doc))
        .map(|entry| entry.kind)
}

fn expand_inventory(value: &RichValue, path: &str, doc: &mut Document) -> bool {
    let RichValue::Inventory(inv) = value else {
        return false;
    };
    doc.set(&format!("{}.size", path), inv.size() as i64);
    for (i, slot) in inv.slots().enumerate() {
        let node = match slot {
            Some(stack) => stack.to_value(),
            None => DocumentValue::Null,
        };
        doc.set(&format!("{}.{}", path, i), node);
    }
    true
}

fn expand_timestamp(value: &RichValue, path: &str, doc: &mut Document) -> bool {
    let RichValue::Timestamp(ts) = value else {
        return false;
    };
    doc.set(path, ts.millis().to_string());
    true
}

fn expand_long(value: &RichValue, path: &str, doc: &mut Document) -> bool {
    let RichValue::Long(v) = value else {
        return false;
    };
    doc.set(path, v.to_string());
    true
}

fn expand_uuid(value: &RichValue, path: &str, doc: &mut Document) -> bool {
    let RichValue::Uuid(v) = value else {
        return false;
    };
    doc.set(path, v.to_string());
    true
}

fn expand_sound(value: &RichValue, path: &str, doc: &mut Document) -> bool {
    let RichValue::Sound(v) = value else {
        return false;
    };
    doc.set(path, v.name());
    true
}

fn expand_location(value: &RichValue, path: &str, doc: &mut Document) -> bool {
    let RichValue::Location(loc) = value else {
        return false;
    };
    doc.set(&format!("{}.x", path), loc.x);
    doc.set(&format!("{}.y", path), loc.y);
    doc.set(&format!("{}.z", path), loc.z);
    doc.set(&format!("{}.pitch", path), loc.pitch as f64);
    doc.set(&format!("{}.yaw", path), loc.yaw as f64);
    doc.set(&format!("{}.world", path), loc.world.as_str());
    true
}

fn expand_chunk(value: &RichValue, path: &str, doc: &mut Document) -> bool {
    let RichValue::Chunk(chunk) = value else {
        return false;
    };
    doc.set(&format!("{}.x", path), chunk.x as i64);
    doc.set(&format!("{}.z", path), chunk.z as i64);
    doc.set(&format!("{}.world", path), chunk.world.as_str());
    true
}

fn expand_world(value: &RichValue, path: &str, doc: &mut Document) -> bool {
    let RichValue::World(world) = value else {
        return false;
    };
    doc.set(path, world.as_str());
    true
}

// ---------------------------------------------------------------------------
// Mirror decoders, one per kind. Each is surfaced by a dedicated typed
// getter on the store; there is no generic decode entry point.
// ---------------------------------------------------------------------------

/// Numeric-parse the display form of the value at `path`.
///
/// This is the text-round-trip coercion used for wide integers and floats:
/// it accepts values stored as their string representation, and fails with
/// a coercion error when the path is absent or its display form is not
/// numeric text.
pub(crate) fn decode_long(doc: &Document, path: &str) -> Result<i64, ConfigError> {
    let text = display_at(doc, path);
    text.parse().map_err(|_| ConfigError::Coercion {
        path: path.to_string(),
        found: text,
    })
}

pub(crate) fn decode_float(doc: &Document, path: &str) -> Result<f32, ConfigError> {
    let text = display_at(doc, path);
    text.parse().map_err(|_| ConfigError::Coercion {
        path: path.to_string(),
        found: text,
    })
}

pub(crate) fn decode_timestamp(doc: &Document, path: &str) -> Result<Timestamp, ConfigError> {
    decode_long(doc, path).map(Timestamp::from_millis)
}

pub(crate) fn decode_uuid(doc: &Document, path: &str) -> Result<Uuid, ConfigError> {
    let value = doc
        .get(path)
        .ok_or_else(|| ConfigError::MissingKey(path.to_string()))?;
    let text = value.as_str().ok_or_else(|| ConfigError::Coercion {
        path: path.to_string(),
        found: value.display_text(),
    })?;
    Uuid::parse_str(text).map_err(|_| ConfigError::Coercion {
        path: path.to_string(),
        found: text.to_string(),
    })
}

pub(crate) fn decode_sound(doc: &Document, path: &str) -> Result<SoundTag, ConfigError> {
    string_at(doc, path).map(SoundTag::new)
}

pub(crate) fn decode_world(doc: &Document, path: &str) -> Result<WorldName, ConfigError> {
    string_at(doc, path).map(WorldName::new)
}

pub(crate) fn decode_location(doc: &Document, path: &str) -> Result<Location, ConfigError> {
    let world = world_at(doc, path)?;
    Ok(Location::with_orientation(
        world,
        float_at(doc, &format!("{}.x", path))?,
        float_at(doc, &format!("{}.y", path))?,
        float_at(doc, &format!("{}.z", path))?,
        decode_float(doc, &format!("{}.pitch", path))?,
        decode_float(doc, &format!("{}.yaw", path))?,
    ))
}

pub(crate) fn decode_chunk(doc: &Document, path: &str) -> Result<ChunkPos, ConfigError> {
    let world = world_at(doc, path)?;
    Ok(ChunkPos::new(
        world,
        int_at(doc, &format!("{}.x", path))? as i32,
        int_at(doc, &format!("{}.z", path))? as i32,
    ))
}

/// Reconstruct a container whose size is read from the stored `size` key.
///
/// Fails fast when no size was stored; use [`decode_inventory_sized`] when
/// the caller knows the size.
pub(crate) fn decode_inventory(
    doc: &Document,
    path: &str,
    title: &str,
) -> Result<Inventory, ConfigError> {
    let size_path = format!("{}.size", path);
    let size = doc
        .get(&size_path)
        .and_then(DocumentValue::as_i64)
        .ok_or(ConfigError::MissingKey(size_path))?;
    Ok(decode_inventory_sized(doc, path, size.max(0) as usize, title))
}

/// Reconstruct a container of an explicitly given size, tolerating a
/// missing stored size. Slots that are absent or malformed stay empty.
pub(crate) fn decode_inventory_sized(
    doc: &Document,
    path: &str,
    size: usize,
    title: &str,
) -> Inventory {
    let mut inventory = Inventory::new(size, title);
    for slot in 0..size {
        let item = doc
            .get(&format!("{}.{}", path, slot))
            .and_then(ItemStack::from_value);
        inventory.set_item(slot, item);
    }
    inventory
}

pub(crate) fn decode_item(doc: &Document, path: &str) -> Option<ItemStack> {
    doc.get(path).and_then(ItemStack::from_value)
}

fn display_at(doc: &Document, path: &str) -> String {
    match doc.get(path) {
        Some(value) => value.display_text(),
        None => "nothing".to_string(),
    }
}

fn string_at(doc: &Document, path: &str) -> Result<String, ConfigError> {
    let value = doc
        .get(path)
        .ok_or_else(|| ConfigError::MissingKey(path.to_string()))?;
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| ConfigError::Coercion {
            path: path.to_string(),
            found: value.display_text(),
        })
}

fn world_at(doc: &Document, path: &str) -> Result<WorldName, ConfigError> {
    let world_path = format!("{}.world", path);
    match doc.get(&world_path).and_then(DocumentValue::as_str) {
        Some(name) => Ok(WorldName::new(name)),
        None => Err(ConfigError::DanglingReference(world_path)),
    }
}

fn float_at(doc: &Document, path: &str) -> Result<f64, ConfigError> {
    let value = doc
        .get(path)
        .ok_or_else(|| ConfigError::MissingKey(path.to_string()))?;
    value.as_f64().ok_or_else(|| ConfigError::Coercion {
        path: path.to_string(),
        found: value.display_text(),
    })
}

fn int_at(doc: &Document, path: &str) -> Result<i64, ConfigError> {
    let value = doc
        .get(path)
        .ok_or_else(|| ConfigError::MissingKey(path.to_string()))?;
    value.as_i64().ok_or_else(|| ConfigError::Coercion {
        path: path.to_string(),
        found: value.display_text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::MaterialId;

    #[test]
    fn test_dispatch_priority_first_match_wins() {
        let mut doc = Document::new();
        let value = RichValue::Long(1 << 60);
        assert_eq!(expand(&value, "big", &mut doc), Some("long"));
        // Stored as text, not a native number
        assert_eq!(doc.get("big").unwrap().as_str(), Some(&*(1i64 << 60).to_string()));
    }

    #[test]
    fn test_native_values_do_not_match_any_codec() {
        let mut doc = Document::new();
        let value = RichValue::Native(DocumentValue::Int(3));
        assert_eq!(expand(&value, "n", &mut doc), None);
    }

    #[test]
    fn test_option_conversion_unwraps() {
        let some: RichValue = Some(5i32).into();
        assert_eq!(some, RichValue::Native(DocumentValue::Int(5)));

        let none: RichValue = Option::<i32>::None.into();
        assert_eq!(none, RichValue::Absent);
    }

    #[test]
    fn test_uuid_round_trip() {
        let mut doc = Document::new();
        let id = Uuid::new_v4();
        assert_eq!(expand(&RichValue::Uuid(id), "owner", &mut doc), Some("uuid"));

        // Canonical hyphenated string form on disk
        assert_eq!(doc.get("owner").unwrap().as_str(), Some(&*id.to_string()));
        assert_eq!(decode_uuid(&doc, "owner").unwrap(), id);
    }

    #[test]
    fn test_timestamp_is_stored_as_text() {
        let mut doc = Document::new();
        let ts = Timestamp::from_millis(1_700_000_000_123);
        assert_eq!(
            expand(&RichValue::Timestamp(ts), "last_seen", &mut doc),
            Some("timestamp")
        );

        assert_eq!(
            doc.get("last_seen").unwrap().as_str(),
            Some("1700000000123")
        );
        assert_eq!(decode_timestamp(&doc, "last_seen").unwrap(), ts);
    }

    #[test]
    fn test_location_round_trip() {
        let mut doc = Document::new();
        let loc = Location::with_orientation(WorldName::new("hub"), 1.5, 64.0, -3.25, 12.5, 90.0);
        assert_eq!(
            expand(&RichValue::Location(loc.clone()), "spawn", &mut doc),
            Some("location")
        );

        let decoded = decode_location(&doc, "spawn").unwrap();
        assert_eq!(decoded.world, loc.world);
        assert!((decoded.x - loc.x).abs() < f64::EPSILON);
        assert!((decoded.y - loc.y).abs() < f64::EPSILON);
        assert!((decoded.z - loc.z).abs() < f64::EPSILON);
        assert!((decoded.pitch - loc.pitch).abs() < f32::EPSILON);
        assert!((decoded.yaw - loc.yaw).abs() < f32::EPSILON);
    }

    #[test]
    fn test_location_missing_world_is_dangling() {
        let mut doc = Document::new();
        doc.set("spawn.x", 0.0);
        doc.set("spawn.y", 64.0);
        doc.set("spawn.z", 0.0);
        doc.set("spawn.pitch", 0.0);
        doc.set("spawn.yaw", 0.0);

        match decode_location(&doc, "spawn") {
            Err(ConfigError::DanglingReference(path)) => assert_eq!(path, "spawn.world"),
            other => panic!("expected dangling reference, got {:?}", other),
        }
    }

    #[test]
    fn test_chunk_round_trip() {
        let mut doc = Document::new();
        let chunk = ChunkPos::new(WorldName::new("nether"), -4, 17);
        assert_eq!(
            expand(&RichValue::Chunk(chunk.clone()), "portal", &mut doc),
            Some("chunk")
        );
        assert_eq!(decode_chunk(&doc, "portal").unwrap(), chunk);
    }

    #[test]
    fn test_inventory_round_trip_including_empty_slots() {
        let mut doc = Document::new();
        let mut inv = Inventory::new(5, "Backpack");
        inv.set_item(0, Some(ItemStack::new(MaterialId::new("emerald"), 3)));
        inv.set_item(3, Some(ItemStack::new(MaterialId::new("bread"), 16)));
        assert_eq!(
            expand(&RichValue::Inventory(inv.clone()), "backpack", &mut doc),
            Some("inventory")
        );

        assert_eq!(doc.get("backpack.size").unwrap().as_i64(), Some(5));
        assert!(doc.get("backpack.1").unwrap().is_null());

        let decoded = decode_inventory(&doc, "backpack", "Backpack").unwrap();
        assert_eq!(decoded, inv);
    }

    #[test]
    fn test_inventory_without_stored_size() {
        let mut doc = Document::new();
        doc.set(
            "menu.0",
            ItemStack::new(MaterialId::new("compass"), 1).to_value(),
        );

        // The two-argument form fails fast on the missing size key
        match decode_inventory(&doc, "menu", "Menu") {
            Err(ConfigError::MissingKey(path)) => assert_eq!(path, "menu.size"),
            other => panic!("expected missing key, got {:?}", other),
        }

        // The explicitly sized form tolerates it
        let decoded = decode_inventory_sized(&doc, "menu", 3, "Menu");
        assert_eq!(decoded.size(), 3);
        assert_eq!(decoded.item(0).unwrap().material.as_str(), "compass");
        assert!(decoded.item(1).is_none());
    }

    #[test]
    fn test_long_decode_failures() {
        let doc = Document::new();
        // Absent paths fail the numeric parse of "nothing"
        assert!(matches!(
            decode_long(&doc, "missing"),
            Err(ConfigError::Coercion { .. })
        ));

        let mut doc = Document::new();
        doc.set("word", "not-a-number");
        assert!(matches!(
            decode_long(&doc, "word"),
            Err(ConfigError::Coercion { .. })
        ));
    }
}
