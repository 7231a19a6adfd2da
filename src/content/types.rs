//! Content entity types as delivered by the CMS REST API.
//!
//! The CMS sends `null` for empty fields rather than omitting them, so
//! string and list fields go through [`null_default`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize `null` as the type's default.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat empty strings like missing values, the way the CMS editors do.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

// ============================================================================
// Media
// ============================================================================

/// An uploaded asset with its generated renditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub formats: Option<MediaFormats>,
    pub url: String,
}

/// Named renditions generated by the CMS upload plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaFormats {
    #[serde(default)]
    pub large: Option<MediaFormat>,
    #[serde(default)]
    pub medium: Option<MediaFormat>,
    #[serde(default)]
    pub small: Option<MediaFormat>,
    #[serde(default)]
    pub thumbnail: Option<MediaFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFormat {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// SEO
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub meta_robots: Option<String>,
    #[serde(default, rename = "canonicalURL")]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub meta_image: Option<MediaFile>,
    #[serde(default)]
    pub structured_data: Option<Value>,
}

// ============================================================================
// Insights
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

/// A long-form article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub document_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Raw editor HTML.
    #[serde(default, deserialize_with = "null_default")]
    pub body: String,
    #[serde(default, rename = "reading_time")]
    pub reading_time: Option<u32>,
    #[serde(default, rename = "hero_image")]
    pub hero_image: Option<MediaFile>,
    #[serde(default)]
    pub seo: Option<Seo>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "null_default")]
    pub locale: String,
    #[serde(default, deserialize_with = "null_default")]
    pub published_at: String,
    #[serde(default, deserialize_with = "null_default")]
    pub updated_at: String,
}

impl Insight {
    /// Stored reading time, or one minute per 200 words of body.
    pub fn reading_minutes(&self) -> u32 {
        match self.reading_time.filter(|m| *m > 0) {
            Some(minutes) => minutes,
            None => self.body.split_whitespace().count().div_ceil(200) as u32,
        }
    }
}

// ============================================================================
// Works
// ============================================================================

/// A client case study.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub document_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Raw editor HTML.
    #[serde(default, deserialize_with = "null_default")]
    pub body: String,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default, rename = "budget_band")]
    pub budget_band: Option<String>,
    #[serde(default)]
    pub channels: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default, rename = "is_enterprise", deserialize_with = "null_default")]
    pub is_enterprise: bool,
    #[serde(default)]
    pub seo: Option<Seo>,
    #[serde(default, deserialize_with = "null_default")]
    pub locale: String,
    #[serde(default, deserialize_with = "null_default")]
    pub updated_at: String,
}

// ============================================================================
// Pages
// ============================================================================

/// A page composed of CMS sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub document_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "page_type")]
    pub page_type: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub locale: String,
    #[serde(default)]
    pub seo: Option<Seo>,
    /// Tagged section payloads; `None` when the CMS sent no section list.
    #[serde(default)]
    pub sections: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "null_default")]
    pub updated_at: String,
}

/// The identity fields shared by every collection entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub document_id: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_default")]
    pub locale: String,
    #[serde(default, deserialize_with = "null_default")]
    pub updated_at: String,
    #[serde(default, rename = "page_type")]
    pub page_type: Option<String>,
}

impl Page {
    /// Pages of type `custom` are service pages with their own route.
    pub fn is_service(&self) -> bool {
        self.page_type.as_deref() == Some("custom")
    }
}

impl ContentItem {
    /// Pages of type `custom` are service pages with their own route.
    pub fn is_service(&self) -> bool {
        self.page_type.as_deref() == Some("custom")
    }
}

// ============================================================================
// RFP
// ============================================================================

/// A validated contact-form submission, shaped for the CMS collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfpSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub goals: Option<String>,
    pub scope: Option<String>,
    pub budget_band: Option<String>,
    pub timeline: Option<String>,
    pub message: String,
    pub locale: String,
    pub source: String,
    pub status: String,
}
