//! Request target splitting and query-string decoding.

use rustc_hash::FxHashMap;
use std::borrow::Cow;

/// Decoded query parameters. Repeated keys keep their first value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Query(FxHashMap<String, String>);

impl Query {
    pub fn parse(query: &str) -> Self {
        let mut params = FxHashMap::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.entry(decode(key)).or_insert_with(|| decode(value));
        }
        Self(params)
    }

    /// Value of `key`, treating an empty value like a missing one.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

/// `+` is a space in form encoding; `%XX` sequences that are not valid
/// UTF-8 are kept as they came.
fn decode(component: &str) -> String {
    let spaced = component.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(Cow::Borrowed(s)) => s.to_owned(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => spaced,
    }
}

/// Split a request target into its decoded path and raw query.
pub fn split_target(target: &str) -> (String, &str) {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let path = urlencoding::decode(path)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| path.to_owned());
    (path, query)
}
