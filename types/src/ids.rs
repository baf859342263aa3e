use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("store id must not be empty")]
pub struct StoreIdError;

/// Opaque store identifier. Upserts are keyed on this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoreId(String);

impl StoreId {
    pub fn new(id: impl Into<String>) -> Result<Self, StoreIdError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(StoreIdError);
        }
        Ok(Self(id))
    }

    /// Id derived from a creation timestamp in milliseconds.
    #[must_use]
    pub fn from_millis(millis: u128) -> Self {
        Self(millis.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StoreId {
    type Error = StoreIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StoreId> for String {
    fn from(value: StoreId) -> Self {
        value.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug must not be empty")]
    Empty,
    #[error("slug is longer than {max} characters", max = Slug::MAX_LEN)]
    TooLong,
    #[error("slug may only contain lowercase letters, digits and '-' (got {0:?})")]
    InvalidChar(char),
    #[error("slug must not start or end with '-'")]
    EdgeHyphen,
}

/// URL-safe store handle used in `?s=<slug>` share links.
///
/// Invariant: 1..=64 characters from `[a-z0-9-]`, not starting or ending with `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub const MAX_LEN: usize = 64;

    pub fn parse(raw: impl Into<String>) -> Result<Self, SlugError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SlugError::Empty);
        }
        if raw.len() > Self::MAX_LEN {
            return Err(SlugError::TooLong);
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidChar(bad));
        }
        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }
        Ok(Self(raw))
    }

    /// Default slug for a freshly created store: `loja-` plus the last four
    /// characters of its id.
    #[must_use]
    pub fn for_new_store(id: &StoreId) -> Self {
        let suffix: String = id
            .as_str()
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if suffix.is_empty() {
            return Self("loja".to_string());
        }
        Self(format!("loja-{suffix}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
