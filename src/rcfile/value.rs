//! Typed values of a resource file and the record that holds them.
use std::collections::BTreeMap;
use std::fmt;

use crate::config::MergePolicy;

/// A value read from a resource file, coerced from its text.
#[derive(Debug, Clone, PartialEq)]
pub enum RcValue {
    /// A value made only of ASCII digits.
    Int(i64),
    /// A value that parses as a floating-point number.
    Float(f64),
    /// The literal `True` or `False`.
    Bool(bool),
    /// Anything else, and merged repeatable values.
    Str(String),
}

impl RcValue {
    /// Coerce trimmed resource-file text into a typed value.
    ///
    /// Digits-only text becomes an integer (or a float if it overflows),
    /// then a float is attempted, then the literals `True` / `False`;
    /// everything else stays a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use installer_utils::rcfile::RcValue;
    ///
    /// assert_eq!(RcValue::coerce("10"), RcValue::Int(10));
    /// assert_eq!(RcValue::coerce("1.5"), RcValue::Float(1.5));
    /// assert_eq!(RcValue::coerce("True"), RcValue::Bool(true));
    /// assert_eq!(RcValue::coerce("/usr/bin"), RcValue::Str("/usr/bin".into()));
    /// ```
    #[must_use]
    pub fn coerce(text: &str) -> Self {
        if !text.is_empty()
            && text.bytes().all(|b| b.is_ascii_digit())
            && let Ok(n) = text.parse::<i64>()
        {
            return Self::Int(n);
        }
        if let Ok(f) = text.parse::<f64>() {
            return Self::Float(f);
        }
        match text {
            "True" => Self::Bool(true),
            "False" => Self::Bool(false),
            _ => Self::Str(text.to_string()),
        }
    }

    /// Return the string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Return the integer payload, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for RcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Field name → value mapping built from a resource file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RcRecord {
    values: BTreeMap<String, RcValue>,
}

impl RcRecord {
    /// Create an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Store `value` under `key` according to `policy`.
    ///
    /// With [`MergePolicy::Append`] and an existing value, the result is the
    /// old and new values joined by a space.
    pub fn merge(&mut self, key: &str, value: RcValue, policy: MergePolicy) {
        let merged = match (policy, self.values.get(key)) {
            (MergePolicy::Append, Some(old)) => RcValue::Str(format!("{old} {value}")),
            _ => value,
        };
        self.values.insert(key.to_string(), merged);
    }

    /// Insert `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: RcValue) -> Option<RcValue> {
        self.values.insert(key.into(), value)
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RcValue> {
        self.values.get(key)
    }

    /// Whether the record holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RcValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
