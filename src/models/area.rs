//! Physical area codes and their `"Point <code>"` wire encoding.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{AppError, Result};

/// Prefix marking a resolved area reference on mission endpoints.
pub const POINT_PREFIX: &str = "Point ";

/// A bare physical area code such as `A1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Area(String);

impl Area {
    /// Parse an area from either its bare code or its `"Point <code>"` form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the code is empty after trimming.
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw
            .trim_start()
            .strip_prefix(POINT_PREFIX)
            .unwrap_or(raw)
            .trim();
        if code.is_empty() {
            return Err(AppError::Validation(format!("invalid area code: {raw:?}")));
        }
        Ok(Self(code.to_owned()))
    }

    /// Bare area code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Endpoint encoding used on mission records.
    #[must_use]
    pub fn to_point_ref(&self) -> String {
        format!("{POINT_PREFIX}{}", self.0)
    }
}

impl Display for Area {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Area {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional mission endpoints in `"Point <code>"` form.
pub mod point_ref {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Area;

    /// Serialize an optional endpoint with the point prefix.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    #[allow(clippy::ref_option)] // signature fixed by `serde(with)`
    pub fn serialize<S>(value: &Option<Area>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(area) => serializer.serialize_some(&area.to_point_ref()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional endpoint, accepting prefixed or bare codes.
    ///
    /// # Errors
    ///
    /// Fails when the value is present but empty.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Area>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|value| Area::parse(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}
