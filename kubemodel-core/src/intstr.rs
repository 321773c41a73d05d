//! A value that is either an integer or a string, such as a port name or number.
use derive_more::From;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer or a string
///
/// Serializes untagged, as the api server expects: `8080` or `"http"`.
#[derive(From, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum IntOrString {
    /// The integer form
    Int(i32),
    /// The string form, e.g. a named port or a percentage
    String(String),
}

impl Default for IntOrString {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl From<&str> for IntOrString {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl IntOrString {
    /// Resolve a value against `total`, treating strings ending in `%` as percentages
    ///
    /// Percentages round down. Returns `None` for strings that are not percentages.
    pub fn scaled_value(&self, total: i32) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            Self::String(s) => {
                let pct: i64 = s.strip_suffix('%')?.parse().ok()?;
                i32::try_from(pct * i64::from(total) / 100).ok()
            }
        }
    }
}

impl fmt::Display for IntOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}
