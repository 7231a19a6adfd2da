//! Content access.
//!
//! Everything the presentation layer renders comes through a
//! [`ContentSource`]. Two implementations exist:
//!
//! - [`StrapiClient`]: the CMS REST API over HTTP
//! - [`FixtureSource`]: JSON files on disk (or in memory for tests)
//!
//! Entries are locale-scoped. Translations of one logical entry share a
//! `documentId`, so `(slug, locale)` and `(documentId, locale)` both identify
//! exactly one entry.

mod error;
mod fixtures;
mod strapi;
mod types;

pub use error::CmsError;
pub use fixtures::FixtureSource;
pub use strapi::StrapiClient;
pub use types::{
    Author, ContentItem, Insight, MediaFile, MediaFormat, MediaFormats, Page, RfpSubmission, Seo,
    Tag, Work, non_empty,
};

use crate::{config::SiteConfig, locale::Locale, log};
use anyhow::Result;
use serde_json::Value;

/// CMS collections addressable by slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Pages,
    Insights,
    Works,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Pages, Collection::Insights, Collection::Works];

    /// REST path segment, also the fixture file stem.
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Insights => "insights",
            Self::Works => "works",
        }
    }

    /// Parse the `type` query parameter; unknown values mean pages.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("insights") => Self::Insights,
            Some("works") => Self::Works,
            _ => Self::Pages,
        }
    }
}

/// Read access to CMS content plus the one write the site performs.
pub trait ContentSource: Send + Sync {
    /// Fully populated insight (hero image, SEO, tags, author).
    fn insight_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Insight>, CmsError>;

    /// Case study with every relation populated.
    fn work_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Work>, CmsError>;

    /// Page with its section list populated.
    fn page_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Page>, CmsError>;

    /// Every entry of a collection in one locale.
    fn list(&self, collection: Collection, locale: Locale) -> Result<Vec<ContentItem>, CmsError>;

    fn item_by_slug(
        &self,
        collection: Collection,
        slug: &str,
        locale: Locale,
    ) -> Result<Option<ContentItem>, CmsError>;

    fn item_by_document_id(
        &self,
        collection: Collection,
        document_id: &str,
        locale: Locale,
    ) -> Result<Option<ContentItem>, CmsError>;

    /// Slug of the `to` translation of the entry `(slug, from)`.
    ///
    /// `Ok(None)` when the entry or its translation does not exist.
    fn translate_slug(
        &self,
        collection: Collection,
        slug: &str,
        from: Locale,
        to: Locale,
    ) -> Result<Option<String>, CmsError> {
        let Some(current) = self.item_by_slug(collection, slug, from)? else {
            return Ok(None);
        };
        if current.document_id.is_empty() {
            return Ok(None);
        }
        Ok(self
            .item_by_document_id(collection, &current.document_id, to)?
            .map(|item| item.slug))
    }

    /// Raw `global-strings` response for a locale.
    fn global_strings(&self, locale: Locale) -> Result<Value, CmsError>;

    /// Raw `site-settings` response.
    fn site_settings(&self) -> Result<Value, CmsError>;

    /// Store a contact-form submission, returning the created record.
    fn submit_rfp(&self, submission: &RfpSubmission) -> Result<Value, CmsError>;
}

/// Build the content source the config asks for.
pub fn source_from_config(config: &SiteConfig) -> Result<Box<dyn ContentSource>> {
    match &config.cms.fixtures {
        Some(dir) => {
            log!("cms"; "fixtures from {}", dir.display());
            Ok(Box::new(FixtureSource::from_dir(dir)?))
        }
        None => {
            log!("cms"; "{}", config.cms.url);
            Ok(Box::new(StrapiClient::new(
                &config.cms.url,
                config.cms.token.clone(),
            )?))
        }
    }
}
