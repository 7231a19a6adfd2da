//! Sitemap generation.
//!
//! Lists every public page of both locales for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml">
//!   <url>
//!     <loc>https://cavota.id/id</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    content::{CmsError, Collection, ContentItem, ContentSource},
    locale::Locale,
    log,
    sections::{insight_path, page_path, service_path, service_slug, work_path},
    utils::{
        date::w3c_date,
        html::escape_xml,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::{fs, path::Path};

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// XML namespace for `xhtml:link` alternates
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// `Cache-Control` of a successfully generated sitemap.
pub const CACHE_CONTROL: &str = "public, max-age=3600, s-maxage=3600, stale-while-revalidate=86400";

// ============================================================================
// Public API
// ============================================================================

/// Fetch all content and render the sitemap.
///
/// A collection that fails to list in one locale is left out. Only when
/// every listing fails is the error returned; callers then fall back to
/// [`fallback_sitemap`].
pub fn build_sitemap(source: &dyn ContentSource, site_url: &str) -> Result<String, CmsError> {
    let content = SitemapContent::fetch(source)?;
    let today = Utc::now().date_naive();
    Ok(Sitemap::from_content(site_url, today, &content).into_xml())
}

/// Minimal sitemap with the two locale roots.
pub fn fallback_sitemap(site_url: &str) -> String {
    let urls = Locale::ALL
        .iter()
        .map(|locale| UrlEntry {
            loc: format!("{site_url}/{locale}"),
            lastmod: None,
            changefreq: None,
            priority: 1.0,
        })
        .collect();
    Sitemap {
        urls,
        alternates_ns: false,
    }
    .into_xml()
}

/// `cavota sitemap`: write the sitemap to `output`, or stdout.
pub fn write_sitemap(
    source: &dyn ContentSource,
    config: &SiteConfig,
    output: Option<&Path>,
) -> Result<()> {
    let xml = build_sitemap(source, &config.site.url).context("Failed to collect sitemap content")?;
    let xml = minify(MinifyType::Xml(&xml), config);

    match output {
        Some(path) => {
            fs::write(path, &*xml)
                .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;
            log!("sitemap"; "{}", path.display());
        }
        None => println!("{xml}"),
    }
    Ok(())
}

// ============================================================================
// Content Collection
// ============================================================================

/// Entries of every listed collection, tagged with the locale they were
/// listed under.
#[derive(Debug, Default)]
struct SitemapContent {
    pages: Vec<(Locale, ContentItem)>,
    insights: Vec<(Locale, ContentItem)>,
    works: Vec<(Locale, ContentItem)>,
}

impl SitemapContent {
    /// List the three collections in parallel.
    fn fetch(source: &dyn ContentSource) -> Result<Self, CmsError> {
        let ((pages, page_errors), ((insights, insight_errors), (works, work_errors))) =
            rayon::join(
                || list_all(source, Collection::Pages),
                || {
                    rayon::join(
                        || list_all(source, Collection::Insights),
                        || list_all(source, Collection::Works),
                    )
                },
            );

        let mut errors: Vec<CmsError> = page_errors
            .into_iter()
            .chain(insight_errors)
            .chain(work_errors)
            .collect();
        let all_failed = errors.len() == Collection::ALL.len() * Locale::ALL.len();
        if let Some(err) = errors.pop().filter(|_| all_failed) {
            return Err(err);
        }

        Ok(Self {
            pages,
            insights,
            works,
        })
    }
}

/// Entries of one collection in every locale, plus the listings that failed.
fn list_all(
    source: &dyn ContentSource,
    collection: Collection,
) -> (Vec<(Locale, ContentItem)>, Vec<CmsError>) {
    let mut items = Vec::new();
    let mut errors = Vec::new();
    for locale in Locale::ALL {
        match source.list(collection, locale) {
            Ok(listed) => items.extend(listed.into_iter().map(|item| (locale, item))),
            Err(err) => {
                log!("sitemap"; "skipping {} ({locale}): {err}", collection.api_name());
                errors.push(err);
            }
        }
    }
    (items, errors)
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
    /// Declare the `xhtml` namespace on `<urlset>`
    alternates_ns: bool,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (YYYY-MM-DD format)
    lastmod: Option<String>,
    changefreq: Option<&'static str>,
    priority: f32,
}

impl UrlEntry {
    fn monthly(loc: String, updated_at: &str, priority: f32) -> Self {
        Self {
            loc,
            lastmod: Some(w3c_date(updated_at)),
            changefreq: Some("monthly"),
            priority,
        }
    }
}

impl Sitemap {
    fn from_content(site_url: &str, today: NaiveDate, content: &SitemapContent) -> Self {
        let today = today.format("%Y-%m-%d").to_string();
        let mut urls: Vec<UrlEntry> = Locale::ALL
            .iter()
            .map(|locale| UrlEntry {
                loc: format!("{site_url}/{locale}"),
                lastmod: Some(today.clone()),
                changefreq: Some("weekly"),
                priority: 1.0,
            })
            .collect();

        // Service pages have their own route and rank above regular pages
        let (services, pages): (Vec<_>, Vec<_>) =
            content.pages.iter().partition(|(_, item)| item.is_service());

        for (locale, page) in pages {
            let loc = format!("{site_url}{}", page_path(*locale, &page.slug));
            urls.push(UrlEntry::monthly(loc, &page.updated_at, 0.8));
        }

        for (locale, service) in services {
            let loc = format!("{site_url}{}", service_path(*locale, service_slug(&service.slug)));
            urls.push(UrlEntry::monthly(loc, &service.updated_at, 0.9));
        }

        for (locale, insight) in &content.insights {
            let loc = format!("{site_url}{}", insight_path(*locale, &insight.slug));
            let amp = format!("{loc}/amp");
            urls.push(UrlEntry::monthly(loc, &insight.updated_at, 0.7));
            urls.push(UrlEntry::monthly(amp, &insight.updated_at, 0.6));
        }

        for (locale, work) in &content.works {
            let loc = format!("{site_url}{}", work_path(*locale, &work.slug));
            urls.push(UrlEntry::monthly(loc, &work.updated_at, 0.7));
        }

        Self {
            urls,
            alternates_ns: true,
        }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(256 + self.urls.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        if self.alternates_ns {
            xml.push_str(&format!(
                r#"<urlset xmlns="{SITEMAP_NS}" xmlns:xhtml="{XHTML_NS}">"#
            ));
        } else {
            xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        }
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            if let Some(changefreq) = entry.changefreq {
                xml.push_str(&format!("    <changefreq>{changefreq}</changefreq>\n"));
            }
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

// ============================================================================
// Tests
// ============================================================================
