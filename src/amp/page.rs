//! Complete AMP document for one insight.
//!
//! The output is a standalone `<html ⚡>` page: everything it needs (styles,
//! structured data, extension scripts) is inlined, so rendering is a pure
//! function of the insight, the locale and the site identity.

use super::{
    components::required_components,
    css::{AMP_BOILERPLATE, amp_css},
    image::{ImageRole, to_amp_image},
    sanitize::sanitize_with_origin,
};
use crate::{
    config::SiteSection,
    content::{Insight, non_empty},
    locale::Locale,
    utils::{date::long_date, html::escape_html},
};
use serde_json::json;

const AMP_RUNTIME: &str = r#"<script async src="https://cdn.ampproject.org/v0.js"></script>"#;

// ============================================================================
// Public API
// ============================================================================

/// Canonical (non-AMP) URL of an insight.
pub fn canonical_url(site: &SiteSection, locale: Locale, slug: &str) -> String {
    format!("{}/{locale}/insights/{slug}", site.url)
}

/// SEO description: meta description, then summary, then a generated sentence.
pub fn description(insight: &Insight) -> String {
    insight
        .seo
        .as_ref()
        .and_then(|seo| non_empty(seo.meta_description.as_deref()))
        .or_else(|| non_empty(insight.summary.as_deref()))
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Insight tentang {}", insight.title))
}

/// Author display name, falling back to the site name.
fn author_name<'a>(insight: &'a Insight, site: &'a SiteSection) -> &'a str {
    insight
        .author
        .as_ref()
        .and_then(|author| non_empty(Some(author.name.as_str())))
        .unwrap_or(&site.name)
}

/// Schema.org `Article` JSON-LD, safe to inline inside `<script>`.
pub fn article_json_ld(insight: &Insight, locale: Locale, site: &SiteSection) -> String {
    let logo = site.absolute(&site.logo);
    let image = insight
        .hero_image
        .as_ref()
        .map(|hero| site.absolute(&hero.url))
        .unwrap_or_else(|| logo.clone());

    let document = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": insight.title,
        "description": description(insight),
        "datePublished": insight.published_at,
        "dateModified": insight.updated_at,
        "author": {
            "@type": "Person",
            "name": author_name(insight, site),
        },
        "publisher": {
            "@type": "Organization",
            "name": site.name,
            "logo": {
                "@type": "ImageObject",
                "url": logo,
            },
        },
        "image": [image],
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": canonical_url(site, locale, &insight.slug),
        },
    });

    // A literal `</script>` in any field would end the block early
    document.to_string().replace("</", "<\\/")
}

/// Render the full AMP document.
pub fn render_amp_page(insight: &Insight, locale: Locale, site: &SiteSection) -> String {
    let strings = locale.strings();
    let canonical = canonical_url(site, locale, &insight.slug);
    let amp_url = format!("{canonical}/amp");

    let body = sanitize_with_origin(&insight.body, &site.url);
    let components = required_components(&body);

    let seo = insight.seo.as_ref();
    let title = escape_html(
        seo.and_then(|s| non_empty(s.meta_title.as_deref()))
            .unwrap_or(&insight.title),
    );
    let description = escape_html(&description(insight));
    let keywords = seo.and_then(|s| non_empty(s.keywords.as_deref()));
    let hero_url = insight.hero_image.as_ref().map(|hero| site.absolute(&hero.url));

    let mut html = String::with_capacity(16 * 1024 + body.len());

    // Head
    html.push_str("<!doctype html>\n");
    html.push_str(&format!("<html ⚡ lang=\"{locale}\">\n"));
    html.push_str("<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width,minimum-scale=1,initial-scale=1\">\n",
    );
    html.push_str(&format!("  <link rel=\"canonical\" href=\"{canonical}\">\n"));
    html.push_str(&format!("  <title>{title}</title>\n"));
    html.push_str(&format!("  <meta name=\"description\" content=\"{description}\">\n"));
    if let Some(keywords) = keywords {
        html.push_str(&format!(
            "  <meta name=\"keywords\" content=\"{}\">\n",
            escape_html(keywords)
        ));
    }
    html.push_str(&format!("  <meta property=\"og:title\" content=\"{title}\">\n"));
    html.push_str(&format!(
        "  <meta property=\"og:description\" content=\"{description}\">\n"
    ));
    html.push_str(&format!("  <meta property=\"og:url\" content=\"{amp_url}\">\n"));
    html.push_str("  <meta property=\"og:type\" content=\"article\">\n");
    html.push_str(&format!(
        "  <meta property=\"og:locale\" content=\"{}\">\n",
        locale.territory()
    ));
    if let Some(hero_url) = &hero_url {
        html.push_str(&format!("  <meta property=\"og:image\" content=\"{hero_url}\">\n"));
    }
    html.push_str("  <meta name=\"twitter:card\" content=\"summary_large_image\">\n");
    html.push_str(&format!("  <meta name=\"twitter:title\" content=\"{title}\">\n"));
    html.push_str(&format!(
        "  <meta name=\"twitter:description\" content=\"{description}\">\n"
    ));
    if let Some(hero_url) = &hero_url {
        html.push_str(&format!("  <meta name=\"twitter:image\" content=\"{hero_url}\">\n"));
    }
    html.push_str(&format!("  {AMP_RUNTIME}\n"));
    for script in &components {
        html.push_str(&format!("  {script}\n"));
    }
    html.push_str(&format!("  {AMP_BOILERPLATE}\n"));
    html.push_str(&format!("  <style amp-custom>\n{}\n  </style>\n", amp_css()));
    html.push_str(&format!(
        "  <script type=\"application/ld+json\">\n{}\n  </script>\n",
        article_json_ld(insight, locale, site)
    ));
    html.push_str("</head>\n");

    // Article
    html.push_str("<body>\n  <div class=\"container\">\n");
    html.push_str(&format!(
        "    <nav class=\"breadcrumb\"><a href=\"/{locale}/{}\">{}</a></nav>\n",
        locale.insights_segment(),
        strings.back_to_insights
    ));
    html.push_str("    <header class=\"article-header\">\n");
    html.push_str(&format!("      <h1>{}</h1>\n", escape_html(&insight.title)));
    html.push_str(&article_meta(insight, locale, site));
    html.push_str(&tag_list(insight));
    html.push_str("    </header>\n");
    if let Some(hero) = &insight.hero_image {
        html.push_str(&format!(
            "    {}\n",
            to_amp_image(hero, ImageRole::Cover, &site.url)
        ));
    }
    html.push_str(&format!("    <article class=\"article-body\">\n{body}\n    </article>\n"));

    // CTA + footer
    html.push_str("    <section class=\"cta-strip\">\n");
    html.push_str(&format!("      <h3>{}</h3>\n", strings.cta_title));
    html.push_str(&format!("      <p>{}</p>\n", strings.cta_description));
    html.push_str(&format!(
        "      <a href=\"{}\" class=\"cta-button\">{}</a>\n",
        strings.contact_path, strings.cta_button
    ));
    html.push_str("    </section>\n  </div>\n");
    html.push_str(&format!(
        "  <footer class=\"footer\">\n    <div class=\"container\">\n      <p>{}</p>\n    </div>\n  </footer>\n",
        strings.copyright
    ));
    html.push_str("</body>\n</html>\n");

    html
}

// ============================================================================
// Fragments
// ============================================================================

/// Byline: author, localized publish date and optional reading time.
fn article_meta(insight: &Insight, locale: Locale, site: &SiteSection) -> String {
    let strings = locale.strings();
    let mut meta = String::from("      <div class=\"article-meta\">\n");
    meta.push_str(&format!(
        "        <span class=\"author\">{} {}</span>\n",
        strings.by,
        escape_html(author_name(insight, site))
    ));
    if !insight.published_at.is_empty() {
        meta.push_str(&format!(
            "        <span> • </span><time datetime=\"{}\">{}</time>\n",
            escape_html(&insight.published_at),
            escape_html(&long_date(&insight.published_at, locale))
        ));
    }
    if let Some(minutes) = insight.reading_time.filter(|m| *m > 0) {
        meta.push_str(&format!(
            "        <span> • </span><span>{minutes} {}</span>\n",
            strings.read_time
        ));
    }
    meta.push_str("      </div>\n");
    meta
}

fn tag_list(insight: &Insight) -> String {
    if insight.tags.is_empty() {
        return String::new();
    }
    let tags: String = insight
        .tags
        .iter()
        .map(|tag| format!("<span class=\"tag\">{}</span>", escape_html(&tag.name)))
        .collect();
    format!("      <div class=\"tags\">{tags}</div>\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Author, MediaFile, Seo, Tag};
    use serde_json::Value;

    fn site() -> SiteSection {
        SiteSection::default()
    }

    fn insight() -> Insight {
        Insight {
            document_id: "doc1".into(),
            title: "Growth Playbook".into(),
            slug: "growth-playbook".into(),
            body: concat!(
                r#"<p>Intro</p><script>x()</script>"#,
                r#"<iframe src="https://www.youtube.com/embed/abc123"></iframe>"#,
            )
            .into(),
            reading_time: Some(5),
            tags: vec![Tag {
                id: 1,
                name: "Strategy".into(),
                slug: "strategy".into(),
            }],
            author: Some(Author {
                id: 1,
                name: "Rina".into(),
            }),
            locale: "en".into(),
            published_at: "2025-10-17T03:00:00.000Z".into(),
            updated_at: "2025-10-18T03:00:00.000Z".into(),
            ..Default::default()
        }
    }

    fn json_ld(insight: &Insight, locale: Locale) -> Value {
        serde_json::from_str(&article_json_ld(insight, locale, &site())).unwrap()
    }

    #[test]
    fn test_document_head() {
        let html = render_amp_page(&insight(), Locale::En, &site());
        assert!(html.starts_with("<!doctype html>\n<html ⚡ lang=\"en\">"));
        assert!(html.contains(
            r#"<link rel="canonical" href="https://cavota.id/en/insights/growth-playbook">"#
        ));
        assert!(html.contains(
            r#"<meta property="og:url" content="https://cavota.id/en/insights/growth-playbook/amp">"#
        ));
        assert!(html.contains("<title>Growth Playbook</title>"));
        assert!(html.contains(AMP_RUNTIME));
        assert!(html.contains("<style amp-boilerplate>"));
        assert!(html.contains("<style amp-custom>"));
        assert!(!html.contains("name=\"keywords\""));
    }

    #[test]
    fn test_body_sanitized_and_components_listed() {
        let html = render_amp_page(&insight(), Locale::En, &site());
        assert!(!html.contains("x()"));
        assert!(html.contains(r#"<amp-youtube data-videoid="abc123""#));
        assert!(html.contains(r#"custom-element="amp-img""#));
        assert!(html.contains(r#"custom-element="amp-youtube""#));
        assert!(!html.contains(r#"custom-element="amp-video""#));
    }

    #[test]
    fn test_byline_and_tags() {
        let html = render_amp_page(&insight(), Locale::En, &site());
        assert!(html.contains("<span class=\"author\">By Rina</span>"));
        assert!(html.contains(">October 17, 2025</time>"));
        assert!(html.contains("<span>5 min read</span>"));
        assert!(html.contains("<span class=\"tag\">Strategy</span>"));

        let html = render_amp_page(&insight(), Locale::Id, &site());
        assert!(html.contains("<span class=\"author\">Oleh Rina</span>"));
        assert!(html.contains(">17 Oktober 2025</time>"));
        assert!(html.contains("5 menit baca"));
    }

    #[test]
    fn test_localized_chrome() {
        let html = render_amp_page(&insight(), Locale::Id, &site());
        assert!(html.contains(r#"<a href="/id/wawasan">Kembali ke Wawasan</a>"#));
        assert!(html.contains(r#"<a href="/id/kontak" class="cta-button">Hubungi Kami</a>"#));
        assert!(html.contains("Semua hak dilindungi"));

        let html = render_amp_page(&insight(), Locale::En, &site());
        assert!(html.contains(r#"<a href="/en/insights">Back to Insights</a>"#));
        assert!(html.contains("Interested in working together?"));
    }

    #[test]
    fn test_optional_parts_omitted() {
        let insight = Insight {
            reading_time: None,
            tags: Vec::new(),
            hero_image: None,
            ..insight()
        };
        let html = render_amp_page(&insight, Locale::En, &site());
        assert!(!html.contains("min read"));
        assert!(!html.contains("class=\"tags\""));
        assert!(!html.contains("og:image"));
        assert!(!html.contains("cover-image\"></amp-img>"));
    }

    #[test]
    fn test_cover_image_and_social_images() {
        let insight = Insight {
            hero_image: Some(MediaFile {
                name: "cover.jpg".into(),
                url: "/uploads/cover.jpg".into(),
                ..Default::default()
            }),
            ..insight()
        };
        let html = render_amp_page(&insight, Locale::En, &site());
        assert!(html.contains(r#"class="cover-image"></amp-img>"#));
        assert!(html.contains(
            r#"<meta property="og:image" content="https://cavota.id/uploads/cover.jpg">"#
        ));
        assert!(html.contains(
            r#"<meta name="twitter:image" content="https://cavota.id/uploads/cover.jpg">"#
        ));
    }

    #[test]
    fn test_text_fields_escaped() {
        let insight = Insight {
            title: "A <b>bold</b> \"claim\"".into(),
            ..insight()
        };
        let html = render_amp_page(&insight, Locale::En, &site());
        assert!(html.contains("<h1>A &lt;b&gt;bold&lt;/b&gt; &quot;claim&quot;</h1>"));
    }

    #[test]
    fn test_seo_overrides() {
        let insight = Insight {
            summary: Some("Summary".into()),
            seo: Some(Seo {
                meta_title: Some("SEO Title".into()),
                meta_description: Some("SEO description".into()),
                keywords: Some("growth, b2b".into()),
                ..Default::default()
            }),
            ..insight()
        };
        let html = render_amp_page(&insight, Locale::En, &site());
        assert!(html.contains("<title>SEO Title</title>"));
        assert!(html.contains(r#"<meta name="description" content="SEO description">"#));
        assert!(html.contains(r#"<meta name="keywords" content="growth, b2b">"#));
        // The heading keeps the article title
        assert!(html.contains("<h1>Growth Playbook</h1>"));
    }

    #[test]
    fn test_json_ld_fields() {
        let doc = json_ld(&insight(), Locale::En);
        assert_eq!(doc["@type"], "Article");
        assert_eq!(doc["headline"], "Growth Playbook");
        assert_eq!(doc["description"], "Insight tentang Growth Playbook");
        assert_eq!(doc["datePublished"], "2025-10-17T03:00:00.000Z");
        assert_eq!(doc["dateModified"], "2025-10-18T03:00:00.000Z");
        assert_eq!(doc["author"]["name"], "Rina");
        assert_eq!(doc["publisher"]["name"], "CAVOTA");
        assert_eq!(doc["publisher"]["logo"]["url"], "https://cavota.id/favicon.png");
        assert_eq!(doc["image"][0], "https://cavota.id/favicon.png");
        assert_eq!(
            doc["mainEntityOfPage"]["@id"],
            "https://cavota.id/en/insights/growth-playbook"
        );
    }

    #[test]
    fn test_json_ld_fallbacks() {
        let insight = Insight {
            author: None,
            summary: Some(String::new()),
            hero_image: Some(MediaFile {
                url: "https://cdn.test/cover.jpg".into(),
                ..Default::default()
            }),
            ..insight()
        };
        let doc = json_ld(&insight, Locale::Id);
        assert_eq!(doc["author"]["name"], "CAVOTA");
        assert_eq!(doc["description"], "Insight tentang Growth Playbook");
        assert_eq!(doc["image"][0], "https://cdn.test/cover.jpg");
    }

    #[test]
    fn test_json_ld_cannot_close_script() {
        let insight = Insight {
            title: "</script><script>alert(1)</script>".into(),
            ..insight()
        };
        let raw = article_json_ld(&insight, Locale::En, &site());
        assert!(!raw.contains("</script>"));
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["headline"], "</script><script>alert(1)</script>");
    }
}
