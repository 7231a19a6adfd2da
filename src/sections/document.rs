//! Full HTML documents around rendered page bodies.

use crate::{
    config::SiteSection,
    content::{Page, Seo, non_empty},
    locale::Locale,
    utils::html::escape_html,
};
use serde_json::Value;

/// Site path of a page; the home page lives at the locale root.
pub fn page_path(locale: Locale, slug: &str) -> String {
    if slug == locale.home_slug() || slug == Locale::Id.home_slug() {
        format!("/{locale}")
    } else {
        format!("/{locale}/{slug}")
    }
}

pub fn insight_path(locale: Locale, slug: &str) -> String {
    format!("/{locale}/{}/{slug}", locale.insights_segment())
}

pub fn work_path(locale: Locale, slug: &str) -> String {
    format!("/{locale}/{}/{slug}", locale.works_segment())
}

/// Service pages are `custom` pages routed under their own segment.
pub fn service_path(locale: Locale, slug: &str) -> String {
    format!("/{locale}/{}/{slug}", locale.services_segment())
}

/// URL slug of a service page. Indonesian entries are stored as `layanan-{slug}`.
pub fn service_slug(page_slug: &str) -> &str {
    page_slug.strip_prefix("layanan-").unwrap_or(page_slug)
}

/// Head fields of a rendered document, already resolved against fallbacks.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub image: String,
    pub keywords: Option<String>,
    pub robots: String,
    /// OpenGraph type: `website` or `article`.
    pub og_type: &'static str,
    pub structured_data: Option<Value>,
}

impl DocumentMeta {
    /// Resolve head fields from an optional SEO component, then the entry's
    /// own `title`/`description`, then the site defaults. `path` is the
    /// entry's site path, used when no canonical URL is set.
    pub fn from_seo(
        seo: Option<&Seo>,
        title: &str,
        description: Option<&str>,
        path: &str,
        site: &SiteSection,
    ) -> Self {
        let title = seo
            .and_then(|s| non_empty(s.meta_title.as_deref()))
            .or_else(|| non_empty(Some(title)))
            .unwrap_or(&site.name)
            .to_owned();
        let description = seo
            .and_then(|s| non_empty(s.meta_description.as_deref()))
            .or_else(|| non_empty(description))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{} - Leading Indonesian Consulting Firm", site.name));
        let canonical = seo
            .and_then(|s| non_empty(s.canonical_url.as_deref()))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{}{path}", site.url));
        let image = seo
            .and_then(|s| s.meta_image.as_ref())
            .map(|image| site.absolute(&image.url))
            .unwrap_or_else(|| site.absolute(&site.default_image));
        let robots = seo
            .and_then(|s| non_empty(s.meta_robots.as_deref()))
            .unwrap_or("index, follow")
            .to_owned();

        Self {
            title,
            description,
            canonical,
            image,
            keywords: seo
                .and_then(|s| non_empty(s.keywords.as_deref()))
                .map(str::to_owned),
            robots,
            og_type: "website",
            structured_data: seo
                .and_then(|s| s.structured_data.clone())
                .filter(|d| !d.is_null()),
        }
    }
}

/// Wrap `body` of a section-composed page in a document with SEO head.
///
/// `alternates` lists the page's translations as `(locale, slug)`; each becomes
/// an `hreflang` link, with `x-default` pointing at the Indonesian version.
pub fn render_page_document(
    page: &Page,
    locale: Locale,
    site: &SiteSection,
    body: &str,
    alternates: &[(Locale, String)],
) -> String {
    section_document(page, locale, site, body, alternates, page_path)
}

/// Same as [`render_page_document`] for a page served under the services segment.
pub fn render_service_document(
    page: &Page,
    locale: Locale,
    site: &SiteSection,
    body: &str,
    alternates: &[(Locale, String)],
) -> String {
    section_document(page, locale, site, body, alternates, |locale, slug| {
        service_path(locale, service_slug(slug))
    })
}

fn section_document(
    page: &Page,
    locale: Locale,
    site: &SiteSection,
    body: &str,
    alternates: &[(Locale, String)],
    path: fn(Locale, &str) -> String,
) -> String {
    let meta = DocumentMeta::from_seo(
        page.seo.as_ref(),
        &page.title,
        page.description.as_deref(),
        &path(locale, &page.slug),
        site,
    );
    let alternates: Vec<(Locale, String)> = alternates
        .iter()
        .map(|(alternate, slug)| (*alternate, path(*alternate, slug)))
        .collect();
    render_document(&meta, locale, site, body, &alternates)
}

/// Wrap `body` in a document with the head described by `meta`.
///
/// `alternates` are `(locale, site path)` pairs.
pub fn render_document(
    meta: &DocumentMeta,
    locale: Locale,
    site: &SiteSection,
    body: &str,
    alternates: &[(Locale, String)],
) -> String {
    let title = escape_html(&meta.title);
    let description = escape_html(&meta.description);
    let canonical = &meta.canonical;
    let image = &meta.image;

    let mut html = String::with_capacity(4096 + body.len());
    html.push_str("<!doctype html>\n");
    html.push_str(&format!("<html lang=\"{locale}\">\n<head>\n"));
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("  <title>{title}</title>\n"));
    html.push_str(&format!("  <meta name=\"description\" content=\"{description}\">\n"));
    if let Some(keywords) = &meta.keywords {
        html.push_str(&format!(
            "  <meta name=\"keywords\" content=\"{}\">\n",
            escape_html(keywords)
        ));
    }
    html.push_str(&format!(
        "  <meta name=\"robots\" content=\"{}\">\n",
        escape_html(&meta.robots)
    ));
    html.push_str(&format!(
        "  <link rel=\"canonical\" href=\"{}\">\n",
        escape_html(canonical)
    ));

    for (alternate, path) in alternates {
        html.push_str(&format!(
            "  <link rel=\"alternate\" hreflang=\"{alternate}\" href=\"{}{}\">\n",
            site.url,
            escape_html(path)
        ));
    }
    if let Some((_, path)) = alternates.iter().find(|(l, _)| *l == Locale::Id) {
        html.push_str(&format!(
            "  <link rel=\"alternate\" hreflang=\"x-default\" href=\"{}{}\">\n",
            site.url,
            escape_html(path)
        ));
    }

    html.push_str(&format!(
        "  <meta property=\"og:type\" content=\"{}\">\n",
        meta.og_type
    ));
    html.push_str(&format!("  <meta property=\"og:title\" content=\"{title}\">\n"));
    html.push_str(&format!(
        "  <meta property=\"og:description\" content=\"{description}\">\n"
    ));
    html.push_str(&format!(
        "  <meta property=\"og:url\" content=\"{}\">\n",
        escape_html(canonical)
    ));
    html.push_str(&format!(
        "  <meta property=\"og:site_name\" content=\"{}\">\n",
        escape_html(&site.name)
    ));
    html.push_str(&format!(
        "  <meta property=\"og:locale\" content=\"{}\">\n",
        locale.territory()
    ));
    html.push_str(&format!(
        "  <meta property=\"og:image\" content=\"{}\">\n",
        escape_html(image)
    ));
    html.push_str("  <meta name=\"twitter:card\" content=\"summary_large_image\">\n");
    html.push_str(&format!("  <meta name=\"twitter:title\" content=\"{title}\">\n"));
    html.push_str(&format!(
        "  <meta name=\"twitter:description\" content=\"{description}\">\n"
    ));
    html.push_str(&format!(
        "  <meta name=\"twitter:image\" content=\"{}\">\n",
        escape_html(image)
    ));

    if let Some(data) = &meta.structured_data {
        // Editors may store the JSON-LD as a string or as an object
        let json = match data {
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        };
        html.push_str(&format!(
            "  <script type=\"application/ld+json\">{}</script>\n",
            json.replace("</", "<\\/")
        ));
    }

    html.push_str("</head>\n<body>\n<main>\n");
    html.push_str(body);
    html.push_str("\n</main>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MediaFile, Seo};
    use serde_json::json;

    fn page() -> Page {
        Page {
            title: "Layanan".into(),
            slug: "layanan-kami".into(),
            locale: "id".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_path() {
        assert_eq!(page_path(Locale::Id, "beranda"), "/id");
        assert_eq!(page_path(Locale::En, "home"), "/en");
        assert_eq!(page_path(Locale::En, "beranda"), "/en");
        assert_eq!(page_path(Locale::En, "about"), "/en/about");
    }

    #[test]
    fn test_detail_paths() {
        assert_eq!(insight_path(Locale::Id, "growth"), "/id/wawasan/growth");
        assert_eq!(work_path(Locale::En, "bank-x"), "/en/work/bank-x");
        assert_eq!(service_path(Locale::Id, "seo"), "/id/layanan/seo");
        assert_eq!(service_path(Locale::En, "seo"), "/en/services/seo");
        assert_eq!(service_slug("layanan-seo"), "seo");
        assert_eq!(service_slug("seo"), "seo");
    }

    #[test]
    fn test_service_document_paths() {
        let alternates = vec![
            (Locale::Id, "layanan-kami".to_string()),
            (Locale::En, "our-services".to_string()),
        ];
        let html = render_service_document(
            &page(),
            Locale::Id,
            &SiteSection::default(),
            "<p>x</p>",
            &alternates,
        );
        assert!(html.contains(r#"<link rel="canonical" href="https://cavota.id/id/layanan/kami">"#));
        assert!(html.contains(
            r#"<link rel="alternate" hreflang="en" href="https://cavota.id/en/services/our-services">"#
        ));
    }

    #[test]
    fn test_defaults_from_page_and_site() {
        let html = render_page_document(&page(), Locale::Id, &SiteSection::default(), "<p>x</p>", &[]);
        assert!(html.starts_with("<!doctype html>\n<html lang=\"id\">"));
        assert!(html.contains("<title>Layanan</title>"));
        assert!(html.contains(
            r#"<meta name="description" content="CAVOTA - Leading Indonesian Consulting Firm">"#
        ));
        assert!(html.contains(r#"<link rel="canonical" href="https://cavota.id/id/layanan-kami">"#));
        assert!(html.contains(
            r#"<meta property="og:image" content="https://cavota.id/images/og-default.jpg">"#
        ));
        assert!(html.contains(r#"<meta name="robots" content="index, follow">"#));
        assert!(html.contains("<main>\n<p>x</p>\n</main>"));
    }

    #[test]
    fn test_seo_component_wins() {
        let page = Page {
            seo: Some(Seo {
                meta_title: Some("Custom title".into()),
                meta_description: Some("Custom description".into()),
                canonical_url: Some("https://cavota.id/id/layanan".into()),
                meta_robots: Some("noindex".into()),
                meta_image: Some(MediaFile {
                    url: "/uploads/og.png".into(),
                    ..Default::default()
                }),
                structured_data: Some(json!({"@type": "Service", "name": "</script>"})),
                ..Default::default()
            }),
            ..page()
        };
        let html = render_page_document(&page, Locale::Id, &SiteSection::default(), "", &[]);
        assert!(html.contains("<title>Custom title</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://cavota.id/id/layanan">"#));
        assert!(html.contains(r#"content="https://cavota.id/uploads/og.png""#));
        assert!(html.contains(r#"<meta name="robots" content="noindex">"#));
        assert!(html.contains(r#"<script type="application/ld+json">"#));
        assert!(!html.contains("\"</script>"));
    }

    #[test]
    fn test_render_document_with_own_paths() {
        let site = SiteSection::default();
        let mut meta = DocumentMeta::from_seo(
            None,
            "Bank X",
            Some("Studi kasus"),
            "/id/karya/bank-x",
            &site,
        );
        meta.og_type = "article";
        let alternates = vec![
            (Locale::Id, "/id/karya/bank-x".to_string()),
            (Locale::En, "/en/work/bank-x".to_string()),
        ];
        let html = render_document(&meta, Locale::Id, &site, "<p>x</p>", &alternates);

        assert!(html.contains("<title>Bank X</title>"));
        assert!(html.contains(r#"<meta name="description" content="Studi kasus">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://cavota.id/id/karya/bank-x">"#));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(
            r#"<link rel="alternate" hreflang="en" href="https://cavota.id/en/work/bank-x">"#
        ));
        assert!(html.contains(
            r#"<link rel="alternate" hreflang="x-default" href="https://cavota.id/id/karya/bank-x">"#
        ));
    }

    #[test]
    fn test_hreflang_alternates() {
        let alternates = vec![
            (Locale::Id, "layanan-kami".to_string()),
            (Locale::En, "our-services".to_string()),
        ];
        let html =
            render_page_document(&page(), Locale::Id, &SiteSection::default(), "", &alternates);
        assert!(html.contains(
            r#"<link rel="alternate" hreflang="id" href="https://cavota.id/id/layanan-kami">"#
        ));
        assert!(html.contains(
            r#"<link rel="alternate" hreflang="en" href="https://cavota.id/en/our-services">"#
        ));
        assert!(html.contains(
            r#"<link rel="alternate" hreflang="x-default" href="https://cavota.id/id/layanan-kami">"#
        ));
    }
}
