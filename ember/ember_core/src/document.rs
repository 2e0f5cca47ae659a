//! The hierarchical key/value document backing configuration files.
//!
//! This module defines the document value model and a path-addressed tree of
//! string-keyed nodes. Paths are `.`-joined key segments; writing to a path
//! creates intermediate mappings as needed. The document serializes to and
//! from YAML, optionally with a leading comment header.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A value stored in a document node.
///
/// This enum represents every representation the backing file format can
/// hold natively: scalars, ordered sequences, and nested mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentValue {
    /// Null value.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Integer value.
    Int(i64),

    /// Floating-point value.
    Float(f64),

    /// String value.
    String(String),

    /// Ordered sequence of values.
    Sequence(Vec<DocumentValue>),

    /// Nested mapping of string keys to values.
    Mapping(BTreeMap<String, DocumentValue>),
}

impl DocumentValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this value is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Check if this value is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Get this value as a boolean.
    ///
    /// # Returns
    ///
    /// The boolean value, or `None` if this value is not a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer.
    ///
    /// Integral floats coerce; everything else does not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    /// Get this value as a floating-point number.
    ///
    /// Integers coerce; everything else does not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get this value as a string slice.
    ///
    /// Only actual strings match; no display coercion happens here.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a sequence.
    pub fn as_sequence(&self) -> Option<&[DocumentValue]> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a mapping.
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, DocumentValue>> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// The display form of this value, as used by text-round-trip coercion.
    ///
    /// Scalars render bare (strings without quotes) so that a value stored
    /// as its string representation numeric-parses back.
    pub fn display_text(&self) -> String {
        self.to_string()
    }

    fn get(&self, key: &str) -> Option<&DocumentValue> {
        match self {
            Self::Mapping(m) => m.get(key),
            _ => None,
        }
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut DocumentValue> {
        match self {
            Self::Mapping(m) => m.get_mut(key),
            _ => None,
        }
    }
}

impl Default for DocumentValue {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for DocumentValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for DocumentValue {
    fn from(i: i32) -> Self {
        Self::Int(i as i64)
    }
}

impl From<i64> for DocumentValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for DocumentValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for DocumentValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<DocumentValue>> From<Vec<T>> for DocumentValue {
    fn from(v: Vec<T>) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for DocumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(fl) => write!(f, "{}", fl),
            Self::String(s) => write!(f, "{}", s),
            Self::Sequence(seq) => {
                write!(f, "[")?;
                for (i, v) in seq.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Self::Mapping(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Trait for converting a document value to a concrete native type.
///
/// Used by `get_as`-style reads: conversion either succeeds against the
/// value's actual representation or reports absence, never an error.
pub trait FromDocumentValue: Sized {
    /// Convert a document value to this type, or `None` if the value does
    /// not have this type's representation.
    fn from_document_value(value: &DocumentValue) -> Option<Self>;
}

impl FromDocumentValue for bool {
    fn from_document_value(value: &DocumentValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromDocumentValue for i32 {
    fn from_document_value(value: &DocumentValue) -> Option<Self> {
        value.as_i64().and_then(|i| i.try_into().ok())
    }
}

impl FromDocumentValue for i64 {
    fn from_document_value(value: &DocumentValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FromDocumentValue for f64 {
    fn from_document_value(value: &DocumentValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromDocumentValue for String {
    fn from_document_value(value: &DocumentValue) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl<T: FromDocumentValue> FromDocumentValue for Vec<T> {
    fn from_document_value(value: &DocumentValue) -> Option<Self> {
        value
            .as_sequence()
            .map(|s| s.iter().filter_map(T::from_document_value).collect())
    }
}

impl FromDocumentValue for DocumentValue {
    fn from_document_value(value: &DocumentValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// A hierarchical document addressed by dotted paths.
///
/// The root is always a mapping. Paths like `a.b.c` address the value under
/// key `c` of the mapping under key `b` of the root mapping `a`. Writing
/// creates intermediate mappings; a non-mapping intermediate is replaced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    root: BTreeMap<String, DocumentValue>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value at a path.
    ///
    /// # Returns
    ///
    /// The value, or `None` if any segment of the path does not resolve.
    pub fn get(&self, path: &str) -> Option<&DocumentValue> {
        let mut segments = split_path(path);
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Get a mutable reference to the value at a path.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut DocumentValue> {
        let mut segments = split_path(path);
        let first = segments.next()?;
        let mut current = self.root.get_mut(first)?;
        for segment in segments {
            current = current.get_mut(segment)?;
        }
        Some(current)
    }

    /// Check whether a path resolves to any node.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Set the value at a path, creating intermediate mappings as needed.
    pub fn set(&mut self, path: &str, value: impl Into<DocumentValue>) {
        let segments: Vec<&str> = split_path(path).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current: &mut BTreeMap<String, DocumentValue> = &mut self.root;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| DocumentValue::Mapping(BTreeMap::new()));
            if !entry.is_mapping() {
                *entry = DocumentValue::Mapping(BTreeMap::new());
            }
            current = match entry {
                DocumentValue::Mapping(m) => m,
                _ => unreachable!("intermediate was just replaced with a mapping"),
            };
        }

        current.insert(last.to_string(), value.into());
    }

    /// Remove the value at a path.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the path did not resolve.
    pub fn remove(&mut self, path: &str) -> Option<DocumentValue> {
        let segments: Vec<&str> = split_path(path).collect();
        let (last, parents) = segments.split_last()?;

        if parents.is_empty() {
            return self.root.remove(*last);
        }

        let mut current = self.root.get_mut(parents[0])?;
        for segment in &parents[1..] {
            current = current.get_mut(segment)?;
        }
        match current {
            DocumentValue::Mapping(m) => m.remove(*last),
            _ => None,
        }
    }

    /// The immediate keys of the root mapping.
    pub fn keys(&self) -> Vec<String> {
        self.root.keys().cloned().collect()
    }

    /// The immediate child keys of the mapping at a path.
    ///
    /// Empty when the path is absent or does not hold a mapping.
    pub fn keys_at(&self, path: &str) -> Vec<String> {
        match self.get(path) {
            Some(DocumentValue::Mapping(m)) => m.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Overlay compiled-in defaults onto this document.
    ///
    /// Every path present in `defaults` but absent here is copied in, so
    /// that `contains` is well-defined for every shipped setting. Values
    /// already present are left untouched, including inside nested
    /// mappings.
    pub fn copy_defaults(&mut self, defaults: &Document) {
        copy_mapping_defaults(&mut self.root, &defaults.root);
    }

    /// Parse a document from YAML text.
    ///
    /// Empty input yields an empty document. A non-mapping YAML root is a
    /// serialization error.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: DocumentValue = serde_yaml::from_str(text)
            .map_err(|e| Error::Serialization(format!("invalid document: {}", e)))?;
        match value {
            DocumentValue::Mapping(root) => Ok(Self { root }),
            DocumentValue::Null => Ok(Self::new()),
            other => Err(Error::Serialization(format!(
                "document root must be a mapping, found {}",
                other
            ))),
        }
    }

    /// Render this document as YAML text, optionally with a leading header
    /// written verbatim as comment lines.
    pub fn to_yaml_string(&self, header: Option<&str>) -> Result<String> {
        let body = if self.root.is_empty() {
            // serde_yaml renders an empty mapping as "{}"; an empty file
            // reads better and loads back identically.
            String::new()
        } else {
            serde_yaml::to_string(&DocumentValue::Mapping(self.root.clone()))
                .map_err(|e| Error::Serialization(e.to_string()))?
        };

        match header {
            Some(header) => {
                let mut out = String::new();
                for line in header.lines() {
                    out.push_str("# ");
                    out.push_str(line);
                    out.push('\n');
                }
                out.push_str(&body);
                Ok(out)
            }
            None => Ok(body),
        }
    }

    /// Load a document from a file.
    ///
    /// A missing file loads as an empty document; any other I/O or parse
    /// failure is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_yaml_str(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Save this document to a file.
    pub fn save(&self, path: &Path, header: Option<&str>) -> Result<()> {
        let text = self.to_yaml_string(header)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, text)?;
        Ok(())
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

fn copy_mapping_defaults(
    target: &mut BTreeMap<String, DocumentValue>,
    defaults: &BTreeMap<String, DocumentValue>,
) {
    for (key, default) in defaults {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), default.clone());
            }
            Some(DocumentValue::Mapping(existing)) => {
                if let DocumentValue::Mapping(inner) = default {
                    copy_mapping_defaults(existing, inner);
                }
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_set_get_remove() {
        let mut doc = Document::new();
        doc.set("a.b.c", 42);
        doc.set("a.d", "hello");

        assert_eq!(doc.get("a.b.c").unwrap().as_i64(), Some(42));
        assert_eq!(doc.get("a.d").unwrap().as_str(), Some("hello"));
        assert!(doc.get("a.x").is_none());
        assert!(doc.contains("a.b"));

        let removed = doc.remove("a.b.c").unwrap();
        assert_eq!(removed.as_i64(), Some(42));
        assert!(!doc.contains("a.b.c"));
        // The intermediate mapping survives removal of its last child
        assert!(doc.contains("a.b"));
    }

    #[test]
    fn test_set_replaces_non_mapping_intermediate() {
        let mut doc = Document::new();
        doc.set("a", 1);
        doc.set("a.b", 2);
        assert_eq!(doc.get("a.b").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_keys_enumeration() {
        let mut doc = Document::new();
        doc.set("alpha.one", 1);
        doc.set("alpha.two", 2);
        doc.set("beta", true);

        assert_eq!(doc.keys(), vec!["alpha".to_string(), "beta".to_string()]);
        assert_eq!(
            doc.keys_at("alpha"),
            vec!["one".to_string(), "two".to_string()]
        );
        assert!(doc.keys_at("beta").is_empty());
        assert!(doc.keys_at("missing").is_empty());
    }

    #[test]
    fn test_native_coercions() {
        assert_eq!(DocumentValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(DocumentValue::Float(7.0).as_i64(), Some(7));
        assert_eq!(DocumentValue::Float(7.5).as_i64(), None);
        assert_eq!(DocumentValue::String("7".into()).as_i64(), None);
        assert_eq!(DocumentValue::Bool(true).as_str(), None);
    }

    #[test]
    fn test_display_text_is_bare() {
        assert_eq!(DocumentValue::String("123".into()).display_text(), "123");
        assert_eq!(DocumentValue::Int(5).display_text(), "5");
        assert_eq!(DocumentValue::Null.display_text(), "null");
    }

    #[test]
    fn test_copy_defaults() {
        let mut defaults = Document::new();
        defaults.set("spawn.world", "hub");
        defaults.set("spawn.x", 0);
        defaults.set("messages.join", "welcome");

        let mut doc = Document::new();
        doc.set("spawn.x", 128);
        doc.copy_defaults(&defaults);

        // Existing values win, missing keys are filled in
        assert_eq!(doc.get("spawn.x").unwrap().as_i64(), Some(128));
        assert_eq!(doc.get("spawn.world").unwrap().as_str(), Some("hub"));
        assert_eq!(doc.get("messages.join").unwrap().as_str(), Some("welcome"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut doc = Document::new();
        doc.set("server.name", "ember");
        doc.set("server.port", 25565);
        doc.set("flags", vec![true, false]);

        let text = doc.to_yaml_string(None).unwrap();
        let reloaded = Document::from_yaml_str(&text).unwrap();
        assert_eq!(doc, reloaded);
    }

    #[test]
    fn test_yaml_header() {
        let mut doc = Document::new();
        doc.set("a", 1);

        let text = doc.to_yaml_string(Some("Ember settings\nDo not edit")).unwrap();
        assert!(text.starts_with("# Ember settings\n# Do not edit\n"));

        // Comments are ignored on the way back in
        let reloaded = Document::from_yaml_str(&text).unwrap();
        assert_eq!(reloaded.get("a").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn test_empty_input_loads_empty() {
        let doc = Document::from_yaml_str("").unwrap();
        assert!(doc.keys().is_empty());

        let doc = Document::from_yaml_str("   \n").unwrap();
        assert!(doc.keys().is_empty());
    }

    #[test]
    fn test_scalar_root_is_rejected() {
        assert!(Document::from_yaml_str("42").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");

        let mut doc = Document::new();
        doc.set("a.b", "value");
        doc.save(&path, Some("header")).unwrap();

        let reloaded = Document::load(&path).unwrap();
        assert_eq!(reloaded.get("a.b").unwrap().as_str(), Some("value"));

        // Missing files load empty
        let empty = Document::load(&dir.path().join("absent.yml")).unwrap();
        assert!(empty.keys().is_empty());
    }
}
