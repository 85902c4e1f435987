use std::collections::BTreeMap;
use std::path::Path;
use http::header::HeaderValue;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Session cookies sent with every request, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies(BTreeMap<String, String>);

/// One entry of a browser cookie export; other keys are ignored.
#[derive(Debug, Deserialize)]
struct ExportedCookie {
    name: String,
    value: String,
}

impl Cookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of `{"name": ..., "value": ...}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let exported: Vec<ExportedCookie> = serde_json::from_str(json)?;
        Ok(exported.into_iter().map(|c| (c.name, c.value)).collect())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let cookies = Self::from_json(&json)?;
        debug!(path = ?path, count = cookies.len(), "Loaded cookies");
        Ok(cookies)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for the `Cookie` request header, or `None` when empty.
    pub fn header_value(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        Some(pairs.join("; "))
    }

    /// The `Cookie` header, failing if any cookie holds bytes a header cannot carry.
    pub fn header(&self) -> Result<Option<HeaderValue>> {
        match self.header_value() {
            Some(value) => Ok(Some(HeaderValue::from_str(&value)?)),
            None => Ok(None),
        }
    }
}

impl FromIterator<(String, String)> for Cookies {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
