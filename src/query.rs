//! Raw request parameters.
//!
//! Two views of the same query string:
//!
//! - [`SearchParams`]: the ordered, multi-value list exactly as it arrived,
//!   for factories that need repeated keys or low-level access.
//! - [`TransformConfig`]: a flat `key → value` map (last value wins) that
//!   factories normally read through
//!   [`FactoryContext::use_param`](crate::context::FactoryContext::use_param).
//!
//! Values are raw strings. Nothing here validates; that is the job of the
//! [`parsers`](crate::parsers).

use std::collections::HashMap;
use url::form_urlencoded;

/// Ordered list of `(key, value)` pairs from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` string.
    ///
    /// A leading `?` is ignored. Keys without `=` get an empty value, so
    /// `?blur&flip` enables both flags.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in arrival order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flatten into a [`TransformConfig`], later values overriding earlier.
    pub fn to_config(&self) -> TransformConfig {
        self.iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Flat mapping from parameter name to raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformConfig {
    values: HashMap<String, String>,
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string straight into a config.
    pub fn from_query(query: &str) -> Self {
        SearchParams::parse(query).to_config()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TransformConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
