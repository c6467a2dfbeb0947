//! The in-memory document value.

use indexmap::IndexMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::Index;

/// Entries of a YAML mapping, in insertion order.
///
/// Keys may be any [`Value`], including booleans and null.
pub type Mapping = IndexMap<Value, Value>;

/// A loaded YAML document (or any node within one).
///
/// Equality is structural. Two dictionaries are equal when they hold the same
/// entries regardless of order, and doubles compare by bit pattern so that
/// every value can also serve as a mapping key.
///
/// ## Example
///
/// ```rust
/// use yaml_tree::Value;
///
/// let doc: Value = [("amount", Value::from(5))].into_iter().collect();
/// assert_eq!(doc["amount"].as_i64(), Some(5));
/// assert!(doc["missing"].is_null());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// `null`, `~`, an empty plain scalar, or a `!!null` tagged scalar.
    #[default]
    Null,

    /// A boolean value.
    Bool(bool),

    /// An integer value.
    Int(i64),

    /// A floating-point value.
    Double(f64),

    /// A string value.
    String(String),

    /// A sequence.
    Array(Vec<Value>),

    /// A mapping.
    Dictionary(Mapping),
}

static NULL: Value = Value::Null;

impl Value {
    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dictionary(_) => "dictionary",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a double. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Mapping> {
        match self {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a dictionary entry by key.
    ///
    /// Returns None if this is not a dictionary or the key is absent.
    pub fn get(&self, key: impl Into<Value>) -> Option<&Value> {
        match self {
            Value::Dictionary(map) => map.get(&key.into()),
            _ => None,
        }
    }

    /// Number of children (array length or dictionary entry count).
    pub fn len(&self) -> usize {
        match self {
            Value::Array(items) => items.len(),
            Value::Dictionary(map) => map.len(),
            _ => 0,
        }
    }

    /// Check if this value has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Double(d) => d.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Array(items) => items.hash(state),
            Value::Dictionary(map) => {
                // Order-independent, to agree with dictionary equality.
                let combined = map.iter().fold(0u64, |acc, entry| {
                    let mut hasher = DefaultHasher::new();
                    entry.hash(&mut hasher);
                    acc.wrapping_add(hasher.finish())
                });
                map.len().hash(state);
                combined.hash(state);
            }
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self {
            Value::Array(items) => items.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", crate::resolver::format_double(*d)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Dictionary(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Dictionary(map)
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Dictionary(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
