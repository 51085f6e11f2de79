//! Three-state optional values for wire payloads.
//!
//! Several backends overload `null`, the empty string and zero with
//! different meanings (for example "not merged yet" against "merged at the
//! epoch"). `Nullable` keeps "field omitted" apart from "field present but
//! null" so adapters can decide explicitly.

use serde::{Deserialize, Deserializer};

/// A JSON field that may be absent, explicitly `null`, or carry a value.
///
/// Use together with `#[serde(default)]` so omitted fields deserialise to
/// [`Nullable::Absent`].
///
/// # Example
///
/// ```
/// use forgekit::scm::Nullable;
///
/// #[derive(serde::Deserialize)]
/// struct Wire {
///     #[serde(default)]
///     merged_at: Nullable<String>,
/// }
///
/// let absent: Wire = serde_json::from_str("{}").expect("valid json");
/// let null: Wire = serde_json::from_str(r#"{"merged_at":null}"#).expect("valid json");
/// assert!(absent.merged_at.is_absent());
/// assert!(null.merged_at.is_null());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Nullable<T> {
    /// The field was not present in the payload.
    #[default]
    Absent,
    /// The field was present with a `null` value.
    Null,
    /// The field was present with a value.
    Value(T),
}

impl<T> Nullable<T> {
    /// Returns true when the field was omitted.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns true when the field was present and `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true when the field carried a value.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Borrows the value, if any.
    #[must_use]
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Converts into an `Option`, collapsing absent and null.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

impl Nullable<String> {
    /// Borrows the string, treating absent and null as empty.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.as_ref().map_or("", String::as_str)
    }

    /// Returns true when a non-empty string is present.
    #[must_use]
    pub fn is_non_empty(&self) -> bool {
        !self.as_str().is_empty()
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

impl<'de, T> Deserialize<'de> for Nullable<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
