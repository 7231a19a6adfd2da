//! Content from local JSON files.
//!
//! # Layout
//!
//! ```text
//! fixtures/
//! ├── pages.json            [ { "slug": "beranda", "locale": "id", ... }, ... ]
//! ├── insights.json
//! ├── works.json
//! ├── global-strings.json   [ { "locale": "id", ... }, ... ]   (optional)
//! └── site-settings.json    { ... }                             (optional)
//! ```
//!
//! Entries use the same JSON shape the CMS returns, so a fixture directory can
//! be produced by saving API responses' `data` arrays.

use super::{
    Collection, ContentSource,
    error::CmsError,
    types::{ContentItem, Insight, Page, RfpSubmission, Work},
};
use crate::locale::Locale;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::{fs, path::Path};

#[derive(Default)]
pub struct FixtureSource {
    entries: FxHashMap<Collection, Vec<Value>>,
    global_strings: Vec<Value>,
    site_settings: Value,
    submissions: Mutex<Vec<Value>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every known fixture file present in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, CmsError> {
        let mut source = Self::new();
        for collection in Collection::ALL {
            let path = dir.join(format!("{}.json", collection.api_name()));
            if let Some(Value::Array(items)) = read_optional(&path)? {
                source.entries.insert(collection, items);
            }
        }
        if let Some(Value::Array(items)) = read_optional(&dir.join("global-strings.json"))? {
            source.global_strings = items;
        }
        if let Some(settings) = read_optional(&dir.join("site-settings.json"))? {
            source.site_settings = settings;
        }
        Ok(source)
    }

    #[cfg(test)]
    pub fn with_entries(mut self, collection: Collection, entries: Vec<Value>) -> Self {
        self.entries.entry(collection).or_default().extend(entries);
        self
    }

    #[cfg(test)]
    pub fn with_global_strings(mut self, entries: Vec<Value>) -> Self {
        self.global_strings.extend(entries);
        self
    }

    #[cfg(test)]
    pub fn with_site_settings(mut self, settings: Value) -> Self {
        self.site_settings = settings;
        self
    }

    /// Submissions received so far, in arrival order.
    #[cfg(test)]
    pub fn submissions(&self) -> Vec<Value> {
        self.submissions.lock().clone()
    }

    fn find<T: DeserializeOwned>(
        &self,
        collection: Collection,
        locale: Locale,
        pred: impl Fn(&Value) -> bool,
    ) -> Result<Option<T>, CmsError> {
        let found = self
            .entries
            .get(&collection)
            .into_iter()
            .flatten()
            .find(|&entry| in_locale(entry, locale) && pred(entry));
        found
            .map(|entry| decode(collection, entry.clone()))
            .transpose()
    }
}

fn read_optional(path: &Path) -> Result<Option<Value>, CmsError> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).map_err(|err| CmsError::Fixture(path.to_path_buf(), err))?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|err| CmsError::Decode(path.display().to_string(), err))
}

fn decode<T: DeserializeOwned>(collection: Collection, entry: Value) -> Result<T, CmsError> {
    serde_json::from_value(entry)
        .map_err(|err| CmsError::Decode(format!("{}.json", collection.api_name()), err))
}

fn field<'a>(entry: &'a Value, name: &str) -> Option<&'a str> {
    entry.get(name).and_then(Value::as_str)
}

fn in_locale(entry: &Value, locale: Locale) -> bool {
    field(entry, "locale") == Some(locale.code())
}

impl ContentSource for FixtureSource {
    fn insight_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Insight>, CmsError> {
        self.find(Collection::Insights, locale, |e| field(e, "slug") == Some(slug))
    }

    fn work_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Work>, CmsError> {
        self.find(Collection::Works, locale, |e| field(e, "slug") == Some(slug))
    }

    fn page_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Page>, CmsError> {
        self.find(Collection::Pages, locale, |e| field(e, "slug") == Some(slug))
    }

    fn list(&self, collection: Collection, locale: Locale) -> Result<Vec<ContentItem>, CmsError> {
        self.entries
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|entry| in_locale(entry, locale))
            .map(|entry| decode(collection, entry.clone()))
            .collect()
    }

    fn item_by_slug(
        &self,
        collection: Collection,
        slug: &str,
        locale: Locale,
    ) -> Result<Option<ContentItem>, CmsError> {
        self.find(collection, locale, |e| field(e, "slug") == Some(slug))
    }

    fn item_by_document_id(
        &self,
        collection: Collection,
        document_id: &str,
        locale: Locale,
    ) -> Result<Option<ContentItem>, CmsError> {
        self.find(collection, locale, |e| {
            field(e, "documentId") == Some(document_id)
        })
    }

    fn global_strings(&self, locale: Locale) -> Result<Value, CmsError> {
        let data = self
            .global_strings
            .iter()
            .find(|entry| in_locale(entry, locale))
            .cloned()
            .unwrap_or(Value::Null);
        Ok(json!({ "data": data }))
    }

    fn site_settings(&self) -> Result<Value, CmsError> {
        Ok(json!({ "data": self.site_settings }))
    }

    fn submit_rfp(&self, submission: &RfpSubmission) -> Result<Value, CmsError> {
        let mut submissions = self.submissions.lock();
        let mut record = serde_json::to_value(submission)
            .map_err(|err| CmsError::Decode("rfp-submissions".into(), err))?;
        if let Value::Object(map) = &mut record {
            map.insert("id".into(), json!(submissions.len() + 1));
        }
        submissions.push(record.clone());
        Ok(json!({ "data": record }))
    }
}
