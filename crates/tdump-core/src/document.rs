//! # Document Model
//!
//! The canonical, comparable output of a dump.
//!
//! A [`Document`] is a detached snapshot: scalars, ordered sequences, and
//! string-keyed mappings that keep insertion order. Key order is part of the
//! value. Two documents are equal only if their mappings list the same keys
//! in the same order, which is stricter than `IndexMap`'s own equality.
//!
//! ## Usage
//!
//! ```rust
//! use tdump_core::Document;
//!
//! let left = Document::map([("name", Document::from("Window")), ("size", Document::from(24))]);
//! let right = Document::map([("name", Document::from("Window")), ("size", Document::from(32))]);
//!
//! let differences = left.diff(&right);
//! assert_eq!(differences.len(), 1);
//! assert_eq!(differences[0].path, "/size");
//! ```

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::DumpResult;

/// Ordered string-keyed mapping inside a [`Document`].
pub type Map = IndexMap<String, Document>;

/// A dump value.
#[derive(Debug, Clone)]
pub enum Document
{
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Document>),
    Map(Map),
}

impl Document
{
    /// The empty mapping, which is what an absent handle dumps to.
    #[must_use]
    pub fn empty() -> Self
    {
        Document::Map(Map::new())
    }

    /// Build a mapping from key/value pairs, keeping their order.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Document)>,
    {
        Document::Map(entries.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }

    /// `true` for the empty mapping.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        matches!(self, Document::Map(map) if map.is_empty())
    }

    /// Value under `key` if this is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Document>
    {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Look up a value by JSON-pointer path, e.g. `/0/methods/2/name`.
    ///
    /// The empty path returns `self`.
    #[must_use]
    pub fn pointer(&self, path: &str) -> Option<&Document>
    {
        if path.is_empty() {
            return Some(self);
        }
        let rest = path.strip_prefix('/')?;
        rest.split('/').try_fold(self, |current, token| {
            let token = unescape_token(token);
            match current {
                Document::Map(map) => map.get(token.as_str()),
                Document::List(items) => token.parse::<usize>().ok().and_then(|index| items.get(index)),
                _ => None,
            }
        })
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Map>
    {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Document]>
    {
        match self {
            Document::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str>
    {
        match self {
            Document::Str(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool>
    {
        match self {
            Document::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64>
    {
        match self {
            Document::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool
    {
        matches!(self, Document::Null)
    }

    /// Compact JSON with mapping keys in insertion order.
    ///
    /// Equal documents always serialize to identical bytes, so the output can
    /// be hashed or diffed textually.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::DumpError::Serialization`] if the encoder fails.
    pub fn to_canonical_bytes(&self) -> DumpResult<Vec<u8>>
    {
        Ok(serde_json::to_vec(self)?)
    }

    /// Indented JSON for human inspection.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::DumpError::Serialization`] if the encoder fails.
    pub fn to_pretty_string(&self) -> DumpResult<String>
    {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Lower-case hex SHA-256 of the canonical bytes.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::DumpError::Serialization`] if the encoder fails.
    pub fn fingerprint(&self) -> DumpResult<String>
    {
        let bytes = self.to_canonical_bytes()?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }

    /// Paths at which `self` and `other` differ, in document order.
    ///
    /// Mappings with the same keys in a different order are reported once,
    /// at the mapping itself.
    #[must_use]
    pub fn diff(&self, other: &Document) -> Vec<Difference>
    {
        let mut out = Vec::new();
        diff_into(String::new(), self, other, &mut out);
        out
    }

    fn rank(&self) -> u8
    {
        match self {
            Document::Null => 0,
            Document::Bool(_) => 1,
            Document::Int(_) => 2,
            Document::Str(_) => 3,
            Document::List(_) => 4,
            Document::Map(_) => 5,
        }
    }
}

impl Default for Document
{
    fn default() -> Self
    {
        Document::empty()
    }
}

impl PartialEq for Document
{
    fn eq(&self, other: &Self) -> bool
    {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Document {}

impl PartialOrd for Document
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering>
    {
        Some(self.cmp(other))
    }
}

/// Structural order: by kind first, then by value. Mappings compare their
/// entries pairwise in insertion order.
impl Ord for Document
{
    fn cmp(&self, other: &Self) -> Ordering
    {
        match (self, other) {
            (Document::Null, Document::Null) => Ordering::Equal,
            (Document::Bool(a), Document::Bool(b)) => a.cmp(b),
            (Document::Int(a), Document::Int(b)) => a.cmp(b),
            (Document::Str(a), Document::Str(b)) => a.cmp(b),
            (Document::List(a), Document::List(b)) => a.cmp(b),
            (Document::Map(a), Document::Map(b)) => a.iter().cmp(b.iter()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Serialize for Document
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Document::Null => serializer.serialize_unit(),
            Document::Bool(value) => serializer.serialize_bool(*value),
            Document::Int(value) => serializer.serialize_i64(*value),
            Document::Str(value) => serializer.serialize_str(value),
            Document::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl fmt::Display for Document
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<bool> for Document
{
    fn from(value: bool) -> Self
    {
        Document::Bool(value)
    }
}

impl From<i64> for Document
{
    fn from(value: i64) -> Self
    {
        Document::Int(value)
    }
}

impl From<i32> for Document
{
    fn from(value: i32) -> Self
    {
        Document::Int(i64::from(value))
    }
}

impl From<u32> for Document
{
    fn from(value: u32) -> Self
    {
        Document::Int(i64::from(value))
    }
}

impl From<&str> for Document
{
    fn from(value: &str) -> Self
    {
        Document::Str(value.to_owned())
    }
}

impl From<String> for Document
{
    fn from(value: String) -> Self
    {
        Document::Str(value)
    }
}

impl<T> From<Option<T>> for Document
where
    T: Into<Document>,
{
    fn from(value: Option<T>) -> Self
    {
        value.map_or(Document::Null, Into::into)
    }
}

impl From<Vec<Document>> for Document
{
    fn from(items: Vec<Document>) -> Self
    {
        Document::List(items)
    }
}

impl From<Map> for Document
{
    fn from(map: Map) -> Self
    {
        Document::Map(map)
    }
}

/// One point at which two documents disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference
{
    /// JSON-pointer path of the disagreeing value.
    pub path: String,
    /// Value on the left, `None` if the path only exists on the right.
    pub left: Option<Document>,
    /// Value on the right, `None` if the path only exists on the left.
    pub right: Option<Document>,
}

impl fmt::Display for Difference
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        match (&self.left, &self.right) {
            (Some(left), Some(right)) => write!(f, "{path}: {left} != {right}"),
            (Some(left), None) => write!(f, "{path}: only on left: {left}"),
            (None, Some(right)) => write!(f, "{path}: only on right: {right}"),
            (None, None) => write!(f, "{path}"),
        }
    }
}

fn diff_into(path: String, left: &Document, right: &Document, out: &mut Vec<Difference>)
{
    match (left, right) {
        (Document::Map(a), Document::Map(b)) => {
            let before = out.len();
            for (key, value) in a {
                let child = format!("{path}/{}", escape_token(key));
                match b.get(key) {
                    Some(other) => diff_into(child, value, other, out),
                    None => out.push(Difference {
                        path: child,
                        left: Some(value.clone()),
                        right: None,
                    }),
                }
            }
            for (key, value) in b {
                if !a.contains_key(key) {
                    out.push(Difference {
                        path: format!("{path}/{}", escape_token(key)),
                        left: None,
                        right: Some(value.clone()),
                    });
                }
            }
            if out.len() == before && !a.keys().eq(b.keys()) {
                out.push(Difference {
                    path,
                    left: Some(left.clone()),
                    right: Some(right.clone()),
                });
            }
        }
        (Document::List(a), Document::List(b)) => {
            for (index, (x, y)) in a.iter().zip(b).enumerate() {
                diff_into(format!("{path}/{index}"), x, y, out);
            }
            for (index, extra) in a.iter().enumerate().skip(b.len()) {
                out.push(Difference {
                    path: format!("{path}/{index}"),
                    left: Some(extra.clone()),
                    right: None,
                });
            }
            for (index, extra) in b.iter().enumerate().skip(a.len()) {
                out.push(Difference {
                    path: format!("{path}/{index}"),
                    left: None,
                    right: Some(extra.clone()),
                });
            }
        }
        _ => {
            if left != right {
                out.push(Difference {
                    path,
                    left: Some(left.clone()),
                    right: Some(right.clone()),
                });
            }
        }
    }
}

fn escape_token(token: &str) -> String
{
    token.replace('~', "~0").replace('/', "~1")
}

fn unescape_token(token: &str) -> String
{
    token.replace("~1", "/").replace("~0", "~")
}
