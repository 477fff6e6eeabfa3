//! Dynamically typed parameter values and name → value maps.
//!
//! Attributes and action arguments arrive from configuration files and
//! design-space sweeps, so their types are only known at call time.

use std::collections::BTreeMap;
use std::fmt;

use hwc_core::errors::ModelError;
use serde::{Deserialize, Serialize};

/// A single attribute or argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Numeric view of the value. Strings are parsed leniently with
    /// [`parse_float`], so `"40nm"` reads as `40.0`.
    pub fn as_f64(&self, context: &str) -> Result<f64, ModelError> {
        match self {
            Self::Float(v) => Ok(*v),
            Self::Int(v) => Ok(*v as f64),
            Self::Str(s) => parse_float(s, context),
            Self::Bool(b) => Err(ModelError::InvalidArgument {
                context: context.to_string(),
                message: format!("expected a number, got boolean {b}"),
            }),
        }
    }

    /// Integer view. Floats must be integral.
    pub fn as_i64(&self, context: &str) -> Result<i64, ModelError> {
        match self {
            Self::Int(v) => Ok(*v),
            other => {
                let v = other.as_f64(context)?;
                if v.fract() == 0.0 && v.is_finite() {
                    Ok(v as i64)
                } else {
                    Err(ModelError::InvalidArgument {
                        context: context.to_string(),
                        message: format!("expected an integer, got {v}"),
                    })
                }
            }
        }
    }

    /// Boolean view. Accepts `true`/`false` strings and 0/1 integers.
    pub fn as_bool(&self, context: &str) -> Result<bool, ModelError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(0) => Ok(false),
            Self::Int(1) => Ok(true),
            Self::Str(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Self::Str(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(ModelError::InvalidArgument {
                context: context.to_string(),
                message: format!("expected a boolean, got {other}"),
            }),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(impl From<$ty> for ParamValue {
            fn from(v: $ty) -> Self {
                Self::$variant(v as $conv)
            }
        })*
    };
}

impl_from!(
    f64 => Float as f64,
    f32 => Float as f64,
    i64 => Int as i64,
    i32 => Int as i64,
    u32 => Int as i64,
    usize => Int as i64,
);

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Parse a float, trimming leading and trailing characters that cannot be
/// part of a number (units, quotes, whitespace). Scientific notation is
/// accepted.
pub fn parse_float(s: &str, context: &str) -> Result<f64, ModelError> {
    let numeric = |c: char| c.is_ascii_digit() || matches!(c, 'e' | 'E' | '-' | '+' | '.');
    let trimmed = s.trim_start_matches(|c: char| !numeric(c));
    let trimmed = trimmed.trim_end_matches(|c: char| !numeric(c));
    trimmed.parse::<f64>().map_err(|_| ModelError::InvalidArgument {
        context: context.to_string(),
        message: format!("could not parse \"{s}\" as a float"),
    })
}

/// Name → value map used for component attributes and action arguments.
///
/// Null values are never stored: building from optional values or from
/// JSON drops them, so "unset" and "explicitly null" mean the same thing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Option<ParamValue>>")]
pub struct Params(BTreeMap<String, ParamValue>);

impl From<BTreeMap<String, Option<ParamValue>>> for Params {
    fn from(map: BTreeMap<String, Option<ParamValue>>) -> Self {
        Self::from_optional(map)
    }
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Build from optional values, skipping `None`.
    pub fn from_optional<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<ParamValue>)>,
    {
        Self(
            entries
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k.into(), v)))
                .collect(),
        )
    }

    /// Parse a JSON object. `null` members are dropped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert when `value` is `Some`; remove the key otherwise.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<ParamValue>) {
        let key = key.into();
        match value {
            Some(v) => {
                self.0.insert(key, v);
            }
            None => {
                self.0.remove(&key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated key list, or `<none>` when empty.
    pub fn key_list(&self) -> String {
        if self.0.is_empty() {
            "<none>".to_string()
        } else {
            self.keys().collect::<Vec<_>>().join(", ")
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}
