//! Request parameters.
//!
//! # Responsibilities
//! - Decode query strings and urlencoded form bodies
//! - Merge them into one lookup, body values winning over query values
//! - Pick one, several or all parameters for controllers
//!
//! # Design Decisions
//! - Repeated keys keep the last value
//! - Missing keys are reported as `None`, never as empty strings

use std::collections::BTreeMap;

use serde::Serialize;
use url::form_urlencoded;

/// Merged query + form parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestParams {
    values: BTreeMap<String, String>,
}

/// Shape of a `parse` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// No keys requested: every parameter.
    All(BTreeMap<String, String>),
    /// Exactly one distinct key requested: its value.
    One(Option<String>),
    /// Several keys requested: each key with its value, if any.
    Many(BTreeMap<String, Option<String>>),
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters from a raw query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::new();
        params.extend_urlencoded(query.as_bytes());
        params
    }

    /// Parameters from a query string and an urlencoded body.
    pub fn from_parts(query: Option<&str>, form: Option<&[u8]>) -> Self {
        let mut params = Self::new();
        if let Some(query) = query {
            params.extend_urlencoded(query.as_bytes());
        }
        if let Some(form) = form {
            params.extend_urlencoded(form);
        }
        params
    }

    fn extend_urlencoded(&mut self, input: &[u8]) {
        for (key, value) in form_urlencoded::parse(input) {
            self.values.insert(key.into_owned(), value.into_owned());
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The requested keys, each mapped to its value or `None`.
    pub fn pick<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> BTreeMap<String, Option<String>> {
        keys.into_iter()
            .map(|key| (key.to_string(), self.values.get(key).cloned()))
            .collect()
    }

    /// Everything for no keys, a bare value for one key, a map otherwise.
    pub fn parse(&self, keys: &[&str]) -> Parsed {
        if keys.is_empty() {
            return Parsed::All(self.values.clone());
        }

        let mut picked = self.pick(keys.iter().copied());
        if picked.len() == 1 {
            let value = picked.pop_first().and_then(|(_, v)| v);
            return Parsed::One(value);
        }
        Parsed::Many(picked)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
