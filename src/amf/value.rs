//! AMF0 value types
//!
//! A decoded or hand-built AMF0 payload is a tree of [`Amf0Value`]s. Keyed
//! containers keep their properties in insertion order so that encoding is
//! deterministic; every child is owned by its parent.

use indexmap::IndexMap;

use super::marker::Marker;

/// Insertion-ordered name/value map used by Object and ECMA Array
///
/// Names are unique. [`Properties::put`] with an existing name drops the old
/// entry and appends the new one at the end. Lookups and inserts are hashed,
/// so decoding an object stays linear in its property count.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: IndexMap<String, Amf0Value>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a property, moving it to the end if the name already exists
    ///
    /// Returns the replaced value, if any.
    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Amf0Value>,
    ) -> Option<Amf0Value> {
        let key = key.into();
        let old = self.entries.shift_remove(&key);
        self.entries.insert(key, value.into());
        old
    }

    pub fn get(&self, key: &str) -> Option<&Amf0Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Amf0Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a property, keeping the order of the others
    pub fn remove(&mut self, key: &str) -> Option<Amf0Value> {
        self.entries.shift_remove(key)
    }

    /// Name of the property at `index` in encoding order
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.entries.get_index(index).map(|(k, _)| k.as_str())
    }

    /// Value of the property at `index` in encoding order
    pub fn value_at(&self, index: usize) -> Option<&Amf0Value> {
        self.entries.get_index(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Amf0Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Equal when both hold the same properties in the same order
impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Into<String>, V: Into<Amf0Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (k, v) in iter {
            props.put(k, v);
        }
        props
    }
}

impl IntoIterator for Properties {
    type Item = (String, Amf0Value);
    type IntoIter = indexmap::map::IntoIter<String, Amf0Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// AMF0 value
///
/// Each variant maps to exactly one [`Marker`]; see [`Amf0Value::marker`].
#[derive(Debug, Clone, PartialEq)]
pub enum Amf0Value {
    /// IEEE 754 double-precision floating point (0x00)
    Number(f64),

    /// Boolean (0x01)
    Boolean(bool),

    /// UTF-8 string with a 16-bit byte length (0x02)
    String(String),

    /// Anonymous object (0x03)
    Object(Properties),

    /// Null (0x05)
    Null,

    /// Undefined (0x06)
    Undefined,

    /// Associative array (0x08)
    ///
    /// The element count on the wire is only a hint; the live property count
    /// is written on encode.
    EcmaArray(Properties),

    /// Dense array with an authoritative count (0x0A)
    StrictArray(Vec<Amf0Value>),

    /// Object end sentinel (0x09)
    ObjectEnd,
}

impl Amf0Value {
    /// Empty anonymous object
    pub fn object() -> Self {
        Amf0Value::Object(Properties::new())
    }

    /// Empty ECMA array
    pub fn ecma_array() -> Self {
        Amf0Value::EcmaArray(Properties::new())
    }

    /// Empty strict array
    pub fn strict_array() -> Self {
        Amf0Value::StrictArray(Vec::new())
    }

    /// The marker this value is encoded with
    pub fn marker(&self) -> Marker {
        match self {
            Amf0Value::Number(_) => Marker::Number,
            Amf0Value::Boolean(_) => Marker::Boolean,
            Amf0Value::String(_) => Marker::String,
            Amf0Value::Object(_) => Marker::Object,
            Amf0Value::Null => Marker::Null,
            Amf0Value::Undefined => Marker::Undefined,
            Amf0Value::EcmaArray(_) => Marker::EcmaArray,
            Amf0Value::StrictArray(_) => Marker::StrictArray,
            Amf0Value::ObjectEnd => Marker::ObjectEnd,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Amf0Value::Number(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Amf0Value::Boolean(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Amf0Value::String(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Amf0Value::Object(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Amf0Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Amf0Value::Undefined)
    }

    pub fn is_ecma_array(&self) -> bool {
        matches!(self, Amf0Value::EcmaArray(_))
    }

    pub fn is_strict_array(&self) -> bool {
        matches!(self, Amf0Value::StrictArray(_))
    }

    pub fn is_object_end(&self) -> bool {
        matches!(self, Amf0Value::ObjectEnd)
    }

    /// Check if this value is null or undefined
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, Amf0Value::Null | Amf0Value::Undefined)
    }

    /// Try to get this value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Amf0Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Amf0Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Amf0Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Properties of an Object or ECMA Array
    pub fn as_object(&self) -> Option<&Properties> {
        match self {
            Amf0Value::Object(p) | Amf0Value::EcmaArray(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Properties> {
        match self {
            Amf0Value::Object(p) | Amf0Value::EcmaArray(p) => Some(p),
            _ => None,
        }
    }

    /// Elements of a strict array
    pub fn as_array(&self) -> Option<&[Amf0Value]> {
        match self {
            Amf0Value::StrictArray(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Amf0Value>> {
        match self {
            Amf0Value::StrictArray(a) => Some(a),
            _ => None,
        }
    }

    /// Number of children for containers, `None` for scalars
    pub fn len(&self) -> Option<usize> {
        match self {
            Amf0Value::Object(p) | Amf0Value::EcmaArray(p) => Some(p.len()),
            Amf0Value::StrictArray(a) => Some(a.len()),
            _ => None,
        }
    }

    /// Put a property into an Object or ECMA Array
    ///
    /// Returns the replaced value, if any. Hands the value back if `self` is
    /// not a keyed container.
    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Amf0Value>,
    ) -> Result<Option<Amf0Value>, Amf0Value> {
        match self.as_object_mut() {
            Some(props) => Ok(props.put(key, value)),
            None => Err(value.into()),
        }
    }

    /// Append an element to a strict array
    ///
    /// Hands the value back if `self` is not a strict array.
    pub fn push(&mut self, value: impl Into<Amf0Value>) -> Result<(), Amf0Value> {
        match self.as_array_mut() {
            Some(elements) => {
                elements.push(value.into());
                Ok(())
            }
            None => Err(value.into()),
        }
    }

    /// Get a property from an object value
    pub fn get(&self, key: &str) -> Option<&Amf0Value> {
        self.as_object()?.get(key)
    }

    /// Get a string property from an object value
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Get a number property from an object value
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_number()
    }
}

impl Default for Amf0Value {
    fn default() -> Self {
        Amf0Value::Null
    }
}

impl From<bool> for Amf0Value {
    fn from(v: bool) -> Self {
        Amf0Value::Boolean(v)
    }
}

impl From<f64> for Amf0Value {
    fn from(v: f64) -> Self {
        Amf0Value::Number(v)
    }
}

impl From<i32> for Amf0Value {
    fn from(v: i32) -> Self {
        Amf0Value::Number(f64::from(v))
    }
}

impl From<u32> for Amf0Value {
    fn from(v: u32) -> Self {
        Amf0Value::Number(f64::from(v))
    }
}

impl From<String> for Amf0Value {
    fn from(v: String) -> Self {
        Amf0Value::String(v)
    }
}

impl From<&str> for Amf0Value {
    fn from(v: &str) -> Self {
        Amf0Value::String(v.to_string())
    }
}

impl From<Properties> for Amf0Value {
    fn from(v: Properties) -> Self {
        Amf0Value::Object(v)
    }
}

impl<V: Into<Amf0Value>> From<Vec<V>> for Amf0Value {
    fn from(v: Vec<V>) -> Self {
        Amf0Value::StrictArray(v.into_iter().map(Into::into).collect())
    }
}
