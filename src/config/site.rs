//! `[site]` section configuration.
//!
//! Public identity of the site: brand name, canonical origin, logo.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in cavota.toml.
///
/// # Example
/// ```toml
/// [site]
/// name = "CAVOTA"
/// url = "https://cavota.id"
/// logo = "/favicon.png"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Brand name used in titles, JSON-LD publisher and author fallbacks.
    #[serde(default = "defaults::site::name")]
    #[educe(Default = defaults::site::name())]
    pub name: String,

    /// Canonical origin, no trailing slash. Relative media paths are
    /// prefixed with it.
    #[serde(default = "defaults::site::url")]
    #[educe(Default = defaults::site::url())]
    pub url: String,

    /// Site-relative path of the publisher logo.
    #[serde(default = "defaults::site::logo")]
    #[educe(Default = defaults::site::logo())]
    pub logo: String,

    /// Site-relative path of the OpenGraph fallback image.
    #[serde(default = "defaults::site::default_image")]
    #[educe(Default = defaults::site::default_image())]
    pub default_image: String,
}

impl SiteSection {
    /// Turn a site-relative path into an absolute URL.
    ///
    /// Plain prefix concatenation: only paths starting with `/` are touched,
    /// query strings and fragments ride along unchanged.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.url)
        } else {
            path.to_owned()
        }
    }
}
