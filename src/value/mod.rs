//! Defines the dynamic [`Value`] model used for render contexts.

mod from;
#[cfg(feature = "serde")]
mod ser;

use std::cmp::Ordering;
use std::fmt;

pub use std::collections::BTreeMap as Map;
pub use std::vec::Vec as List;

#[cfg(feature = "serde")]
pub use crate::value::ser::to_value;

/// Data to be rendered represented as a recursive enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(List<Value>),
    Map(Map<String, Value>),
}

/// The mapping of names to values supplied by the caller.
pub type Context = Map<String, Value>;

impl Value {
    /// Returns the boolean interpretation of this value.
    ///
    /// `None` is falsy, booleans are themselves, numbers are falsy iff zero,
    /// and strings, lists and maps are falsy iff empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    /// Compares two values for the comparison operators.
    ///
    /// Two strings compare lexicographically and two numbers numerically,
    /// widening integers to floats. Two booleans compare with false < true.
    /// Everything else falls back to comparing display strings.
    pub fn compare(&self, other: &Value) -> Ordering {
        if let (Value::String(a), Value::String(b)) = (self, other) {
            return a.cmp(b);
        }
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return if a < b {
                Ordering::Less
            } else if a > b {
                Ordering::Greater
            } else {
                Ordering::Equal
            };
        }
        if let (Value::Bool(a), Value::Bool(b)) = (self, other) {
            return a.cmp(b);
        }
        self.to_string().cmp(&other.to_string())
    }

    /// The human name of this value's type, used in error messages.
    pub(crate) fn human(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("<nil>"),
            Value::Bool(b) => fmt::Display::fmt(b, f),
            Value::Integer(n) => fmt::Display::fmt(n, f),
            Value::Float(n) => fmt::Display::fmt(n, f),
            Value::String(s) => fmt::Display::fmt(s, f),
            Value::List(list) => {
                f.write_str("[")?;
                for (i, entry) in list.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", entry)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::value;

    #[test]
    fn display_scalars() {
        assert_eq!(Value::None.to_string(), "<nil>");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Float(8.5).to_string(), "8.5");
        assert_eq!(Value::Float(9.0).to_string(), "9");
        assert_eq!(Value::from("testing...").to_string(), "testing...");
    }

    #[test]
    fn display_list() {
        let v = value!([1, "two", 3.5]);
        assert_eq!(v.to_string(), "[1, two, 3.5]");
    }

    #[test]
    fn display_map_is_key_ordered() {
        let v = value!({ b: 2, a: 1, c: 3 });
        assert_eq!(v.to_string(), "{a: 1, b: 2, c: 3}");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Integer(-1).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!value!([]).is_truthy());
        assert!(value!(["x"]).is_truthy());
        assert!(!value!({}).is_truthy());
        assert!(value!({ x: 1 }).is_truthy());
    }

    #[test]
    fn compare_strings() {
        let a = Value::from("apple");
        let b = Value::from("banana");
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(a.compare(&a), Ordering::Equal);
    }

    #[test]
    fn compare_numbers_widen_to_float() {
        let a = Value::Integer(3);
        let b = Value::Float(2.5);
        assert_eq!(a.compare(&b), Ordering::Greater);
        assert_eq!(Value::Integer(2).compare(&Value::Float(2.0)), Ordering::Equal);
    }

    #[test]
    fn compare_bools() {
        assert_eq!(
            Value::Bool(false).compare(&Value::Bool(true)),
            Ordering::Less
        );
    }

    #[test]
    fn compare_mixed_falls_back_to_display() {
        // "42" vs "<nil>" as display strings
        assert_eq!(
            Value::Integer(42).compare(&Value::None),
            "42".cmp("<nil>")
        );
    }
}
