//! Built-in section renderers.
//!
//! Payloads are read straight from CMS JSON. Every renderer tolerates
//! missing fields; the ones that list things render nothing when the list
//! is empty.

use super::{
    RenderContext,
    document::work_path,
    markdown::{markdown_to_html, process_template},
};
use crate::utils::html::escape_html;
use serde_json::Value;

// ============================================================================
// Payload access
// ============================================================================

/// Non-empty string field.
fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Array field, empty when absent or `null`.
fn list<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn flag(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Anchor tag; external links open in a new tab.
fn link(href: &str, label: &str, external: bool, class: &str) -> String {
    let target = if external {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    };
    format!(
        r#"<a href="{}" class="{class}"{target}>{}</a>"#,
        escape_html(href),
        escape_html(label)
    )
}

/// `<h2>` plus optional subtitle paragraph.
fn heading(section: &Value, title_key: &str) -> String {
    let mut html = String::new();
    if let Some(title) = text(section, title_key) {
        html.push_str(&format!("<h2>{}</h2>", escape_html(title)));
    }
    if let Some(subtitle) = text(section, "subtitle") {
        html.push_str(&format!(
            r#"<p class="section-subtitle">{}</p>"#,
            escape_html(subtitle)
        ));
    }
    html
}

/// Grid modifier by item count; seven or more share one layout.
fn grid_class(count: usize) -> String {
    format!("grid grid-{}", count.min(7))
}

// ============================================================================
// Renderers
// ============================================================================

pub fn hero(section: &Value, ctx: &RenderContext) -> Option<String> {
    let heading = text(section, "heading")?;
    let variant = text(section, "style_variant").unwrap_or("default");

    // Legacy payloads carry a single `media` for both breakpoints
    let legacy = section.get("media").filter(|m| !m.is_null());
    let web = section.get("media_web").filter(|m| !m.is_null()).or(legacy);
    let mobile = section.get("media_mobile").filter(|m| !m.is_null()).or(legacy);
    let web = web.or(mobile);
    let mobile = mobile.or(web);

    let mut html = format!(r#"<section class="hero hero-{}">"#, escape_html(variant));

    if let (Some(web), Some(mobile)) = (web, mobile) {
        let url = |media: &Value| ctx.site.absolute(text(media, "url").unwrap_or_default());
        let alt = text(web, "alternativeText").unwrap_or(heading);
        html.push_str(&format!(
            r#"<picture class="hero-media"><source media="(max-width: 767px)" srcset="{}"><img src="{}" alt="{}"></picture>"#,
            escape_html(&url(mobile)),
            escape_html(&url(web)),
            escape_html(alt)
        ));
    }

    html.push_str(r#"<div class="hero-content">"#);
    if let Some(eyebrow) = text(section, "eyebrow") {
        html.push_str(&format!(r#"<p class="hero-eyebrow">{}</p>"#, escape_html(eyebrow)));
    }
    html.push_str(&format!("<h1>{}</h1>", escape_html(heading)));
    if let Some(subheading) = text(section, "subheading") {
        html.push_str(&format!(
            r#"<p class="hero-subheading">{}</p>"#,
            escape_html(subheading)
        ));
    }

    let buttons: Vec<String> = list(section, "buttons")
        .iter()
        .filter_map(|button| {
            let label = text(button, "label")?;
            let url = text(button, "url")?;
            Some(link(url, label, flag(button, "isExternal"), "button"))
        })
        .collect();
    if !buttons.is_empty() {
        html.push_str(&format!(r#"<div class="hero-actions">{}</div>"#, buttons.concat()));
    }

    html.push_str("</div></section>");
    Some(html)
}

pub fn services_grid(section: &Value, ctx: &RenderContext) -> Option<String> {
    let items = list(section, "items");
    if items.is_empty() {
        return None;
    }

    let mut html = format!(
        r#"<section class="services-grid">{}<div class="{}">"#,
        heading(section, "title"),
        grid_class(items.len())
    );
    for item in items {
        let title = text(item, "title").unwrap_or_default();
        html.push_str(r#"<div class="card">"#);
        match item.get("icon").and_then(|icon| text(icon, "url").map(|url| (icon, url))) {
            Some((icon, url)) => html.push_str(&format!(
                r#"<img class="card-icon" src="{}" alt="{}">"#,
                escape_html(&ctx.media_url(url)),
                escape_html(text(icon, "alternativeText").unwrap_or(title))
            )),
            None => html.push_str(r#"<div class="card-icon"></div>"#),
        }
        html.push_str(&format!("<h3>{}</h3>", escape_html(title)));
        if let Some(subtitle) = text(item, "subtitle") {
            html.push_str(&format!(r#"<p class="card-subtitle">{}</p>"#, escape_html(subtitle)));
        }
        if let Some(description) = text(item, "description") {
            html.push_str(&format!("<p>{}</p>", escape_html(description)));
        }
        if let Some(url) = text(item, "url") {
            html.push_str(&link(
                url,
                ctx.locale.strings().learn_more,
                flag(item, "isExternal"),
                "card-link",
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    Some(html)
}

pub fn rich_text(section: &Value, _ctx: &RenderContext) -> Option<String> {
    let content = text(section, "content")?;
    Some(format!(
        r#"<section class="rich-text"><div class="prose">{}</div></section>"#,
        markdown_to_html(content)
    ))
}

pub fn metrics_grid(section: &Value, _ctx: &RenderContext) -> Option<String> {
    let metrics = list(section, "metrics");
    if metrics.is_empty() {
        return None;
    }

    let mut html = format!(
        r#"<section class="metrics-grid">{}<div class="{}">"#,
        heading(section, "title"),
        grid_class(metrics.len())
    );
    for metric in metrics {
        html.push_str(&format!(
            r#"<div class="metric"><div class="metric-value">{}</div><p class="metric-label">{}</p>"#,
            escape_html(text(metric, "value").unwrap_or_default()),
            escape_html(text(metric, "label").unwrap_or_default())
        ));
        if let Some(description) = text(metric, "description") {
            html.push_str(&format!(
                r#"<p class="metric-description">{}</p>"#,
                escape_html(description)
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    Some(html)
}

pub fn cta_strip(section: &Value, ctx: &RenderContext) -> Option<String> {
    let strings = ctx.locale.strings();
    let button = section.get("button").filter(|b| !b.is_null());
    let label = button
        .and_then(|b| text(b, "label"))
        .unwrap_or(strings.lets_talk);
    let url = button
        .and_then(|b| text(b, "url"))
        .unwrap_or(strings.contact_path);
    let external = button.is_some_and(|b| flag(b, "isExternal"));

    let mut html = String::from(r#"<section class="cta-strip">"#);
    html.push_str(&heading(section, "title"));
    if let Some(body) = text(section, "text") {
        html.push_str(&format!(r#"<p class="cta-text">{}</p>"#, escape_html(body)));
    }
    html.push_str(&link(url, label, external, "cta-button"));
    html.push_str("</section>");
    Some(html)
}

pub fn proof_bar(section: &Value, ctx: &RenderContext) -> Option<String> {
    // Older payloads put a single note/logos pair on the section itself
    let legacy;
    let items = match section.get("items").and_then(Value::as_array) {
        Some(items) => items.as_slice(),
        None if text(section, "note").is_some() => {
            legacy = [section.clone()];
            &legacy[..]
        }
        None => &[],
    };
    if items.is_empty() {
        return None;
    }

    let mut html = String::from(r#"<section class="proof-bar">"#);
    if let Some(title) = text(section, "title") {
        html.push_str(&format!("<h2>{}</h2>", escape_html(title)));
    }
    html.push_str(&format!(r#"<div class="{}">"#, grid_class(items.len().min(4))));
    for item in items {
        html.push_str(r#"<div class="proof-item">"#);
        let logos = list(item, "logos");
        if !logos.is_empty() {
            html.push_str(r#"<div class="proof-logos">"#);
            for logo in logos {
                let Some(url) = text(logo, "url") else { continue };
                html.push_str(&format!(
                    r#"<img src="{}" alt="{}" width="32" height="32">"#,
                    escape_html(&ctx.media_url(url)),
                    escape_html(text(logo, "alternativeText").unwrap_or_default())
                ));
            }
            html.push_str("</div>");
        }
        html.push_str(&format!(
            "<p>{}</p></div>",
            escape_html(text(item, "note").unwrap_or_default())
        ));
    }
    html.push_str("</div></section>");
    Some(html)
}

pub fn playbook(section: &Value, _ctx: &RenderContext) -> Option<String> {
    let steps = list(section, "steps");
    if steps.is_empty() {
        return None;
    }

    let mut html = format!(
        r#"<section class="playbook">{}<ol class="{}">"#,
        heading(section, "title"),
        grid_class(steps.len())
    );
    for (index, step) in steps.iter().enumerate() {
        html.push_str(&format!(
            r#"<li class="step"><span class="step-number">{}</span><h3>{}</h3><p>{}</p></li>"#,
            index + 1,
            escape_html(text(step, "title").unwrap_or_default()),
            escape_html(text(step, "description").unwrap_or_default())
        ));
    }
    html.push_str("</ol></section>");
    Some(html)
}

pub fn testimonial_carousel(section: &Value, _ctx: &RenderContext) -> Option<String> {
    let testimonials = list(section, "testimonials");
    let shown = match section.get("max_items").and_then(Value::as_u64) {
        Some(max) if max > 0 => &testimonials[..testimonials.len().min(max as usize)],
        _ => testimonials,
    };

    let mut html = String::from(r#"<section class="testimonials">"#);
    html.push_str(&heading(section, "title"));
    if !shown.is_empty() {
        html.push_str(&format!(r#"<div class="{}">"#, grid_class(shown.len().min(3))));
        for testimonial in shown {
            html.push_str(&format!(
                r#"<figure class="testimonial"><blockquote>{}</blockquote><figcaption><strong>{}</strong>"#,
                escape_html(text(testimonial, "quote").unwrap_or_default()),
                escape_html(text(testimonial, "name").unwrap_or_default())
            ));
            let role: Vec<&str> = ["title", "company"]
                .iter()
                .filter_map(|key| text(testimonial, key))
                .collect();
            if !role.is_empty() {
                html.push_str(&format!("<span>{}</span>", escape_html(&role.join(", "))));
            }
            html.push_str("</figcaption></figure>");
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
    Some(html)
}

pub fn case_carousel(section: &Value, ctx: &RenderContext) -> Option<String> {
    let cases = list(section, "cases");
    let locale = ctx.locale;

    let mut html = String::from(r#"<section class="case-carousel">"#);
    html.push_str(&heading(section, "title"));
    if !cases.is_empty() {
        html.push_str(r#"<div class="cases">"#);
        for case in cases {
            let title = text(case, "title").unwrap_or_default();
            html.push_str(r#"<article class="case">"#);
            if let Some(industry) = text(case, "industry") {
                html.push_str(&format!(r#"<p class="case-industry">{}</p>"#, escape_html(industry)));
            }
            match text(case, "slug") {
                Some(slug) => {
                    let href = work_path(locale, slug);
                    html.push_str(&format!("<h3>{}</h3>", link(&href, title, false, "case-link")));
                }
                None => html.push_str(&format!("<h3>{}</h3>", escape_html(title))),
            }
            if let Some(summary) = text(case, "summary") {
                html.push_str(&format!("<p>{}</p>", escape_html(summary)));
            }
            html.push_str("</article>");
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
    Some(html)
}

pub fn dynamic_content(section: &Value, ctx: &RenderContext) -> Option<String> {
    let template = text(section, "content_template").unwrap_or_default();
    let content = process_template(template, ctx.template_data);

    let mut html = String::from(r#"<section class="dynamic-content">"#);
    html.push_str(&heading(section, "title"));
    if !content.is_empty() {
        html.push_str(&format!(r#"<div class="prose">{}</div>"#, markdown_to_html(&content)));
    }
    html.push_str("</section>");
    Some(html)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SiteSection, locale::Locale};
    use serde_json::json;

    fn render(
        renderer: fn(&Value, &RenderContext) -> Option<String>,
        locale: Locale,
        section: Value,
    ) -> Option<String> {
        let site = SiteSection::default();
        let ctx = RenderContext::new(locale, &site, "http://localhost:1337");
        renderer(&section, &ctx)
    }

    #[test]
    fn test_hero_full() {
        let html = render(
            hero,
            Locale::En,
            json!({
                "eyebrow": "Consulting",
                "heading": "Grow with <CAVOTA>",
                "subheading": "Strategy that ships",
                "buttons": [
                    {"label": "Start", "url": "/en/contact", "isExternal": false},
                    {"label": "Deck", "url": "https://deck.test", "isExternal": true},
                ],
                "media": {"url": "/uploads/hero.jpg", "alternativeText": "Team"},
            }),
        )
        .unwrap();
        assert!(html.starts_with(r#"<section class="hero hero-default">"#));
        assert!(html.contains("<h1>Grow with &lt;CAVOTA&gt;</h1>"));
        assert!(html.contains(r#"<img src="https://cavota.id/uploads/hero.jpg" alt="Team">"#));
        assert!(html.contains(r#"srcset="https://cavota.id/uploads/hero.jpg""#));
        assert!(html.contains(r#"<a href="/en/contact" class="button">Start</a>"#));
        assert!(html.contains(
            r#"<a href="https://deck.test" class="button" target="_blank" rel="noopener noreferrer">Deck</a>"#
        ));
    }

    #[test]
    fn test_hero_prefers_breakpoint_media() {
        let html = render(
            hero,
            Locale::En,
            json!({
                "heading": "H",
                "style_variant": "image_right",
                "media_web": {"url": "/web.jpg"},
                "media_mobile": null,
                "media": {"url": "/legacy.jpg"},
            }),
        )
        .unwrap();
        assert!(html.contains(r#"class="hero hero-image_right""#));
        assert!(html.contains(r#"<img src="https://cavota.id/web.jpg""#));
        assert!(html.contains(r#"srcset="https://cavota.id/legacy.jpg""#));
    }

    #[test]
    fn test_hero_requires_heading() {
        assert!(render(hero, Locale::En, json!({"eyebrow": "x"})).is_none());
    }

    #[test]
    fn test_services_grid() {
        let section = json!({
            "title": "Services",
            "items": [
                {"title": "SEO", "description": "Rank", "url": "/en/services/seo",
                 "icon": {"url": "/uploads/seo.svg"}},
                {"title": "Ads", "description": "Reach"},
            ],
        });
        let html = render(services_grid, Locale::Id, section).unwrap();
        assert!(html.contains("<h2>Services</h2>"));
        assert!(html.contains(r#"class="grid grid-2""#));
        assert!(html.contains(r#"src="http://localhost:1337/uploads/seo.svg" alt="SEO""#));
        assert!(html.contains(">Pelajari Lebih Lanjut</a>"));
        assert_eq!(html.matches(r#"class="card""#).count(), 2);
    }

    #[test]
    fn test_empty_lists_render_nothing() {
        assert!(render(services_grid, Locale::En, json!({"title": "S", "items": []})).is_none());
        assert!(render(metrics_grid, Locale::En, json!({"title": "M", "metrics": null})).is_none());
        assert!(render(playbook, Locale::En, json!({"title": "P"})).is_none());
        assert!(render(proof_bar, Locale::En, json!({"title": "P"})).is_none());
        assert!(render(rich_text, Locale::En, json!({"content": ""})).is_none());
    }

    #[test]
    fn test_metrics_grid() {
        let html = render(
            metrics_grid,
            Locale::En,
            json!({
                "title": "Results",
                "subtitle": "Last year",
                "metrics": [
                    {"value": "3x", "label": "ROAS", "description": "avg"},
                    {"value": "120", "label": "Clients"},
                    {"value": "9", "label": "Years"},
                ],
            }),
        )
        .unwrap();
        assert!(html.contains(r#"<p class="section-subtitle">Last year</p>"#));
        assert!(html.contains(r#"class="grid grid-3""#));
        assert!(html.contains(r#"<div class="metric-value">3x</div>"#));
        assert_eq!(html.matches("metric-description").count(), 1);
    }

    #[test]
    fn test_cta_strip_fallback_button() {
        let html = render(cta_strip, Locale::Id, json!({"text": "Siap tumbuh?"})).unwrap();
        assert!(html.contains(r#"<a href="/id/kontak" class="cta-button">Mari Bicara</a>"#));

        let html = render(cta_strip, Locale::En, json!({"text": "Ready?", "button": null})).unwrap();
        assert!(html.contains(r#"<a href="/en/contact" class="cta-button">Let's Talk</a>"#));
    }

    #[test]
    fn test_cta_strip_custom_button() {
        let html = render(
            cta_strip,
            Locale::En,
            json!({
                "title": "Work with us",
                "text": "Ready?",
                "button": {"label": "Book", "url": "https://cal.test", "isExternal": true},
            }),
        )
        .unwrap();
        assert!(html.contains("<h2>Work with us</h2>"));
        assert!(html.contains(r#"href="https://cal.test" class="cta-button" target="_blank""#));
    }

    #[test]
    fn test_proof_bar_items_and_legacy() {
        let html = render(
            proof_bar,
            Locale::En,
            json!({"items": [{"note": "Trusted by 50 brands", "logos": [{"url": "/l.png"}]}]}),
        )
        .unwrap();
        assert!(html.contains("<p>Trusted by 50 brands</p>"));
        assert!(html.contains(r#"src="http://localhost:1337/l.png""#));

        let html = render(proof_bar, Locale::En, json!({"note": "Legacy note"})).unwrap();
        assert!(html.contains("<p>Legacy note</p>"));
    }

    #[test]
    fn test_playbook_numbers_steps() {
        let html = render(
            playbook,
            Locale::En,
            json!({"title": "How", "steps": [
                {"title": "Audit", "description": "Look"},
                {"title": "Plan", "description": "Think"},
            ]}),
        )
        .unwrap();
        assert!(html.contains(r#"<span class="step-number">1</span><h3>Audit</h3>"#));
        assert!(html.contains(r#"<span class="step-number">2</span><h3>Plan</h3>"#));
    }

    #[test]
    fn test_testimonials_respect_max_items() {
        let html = render(
            testimonial_carousel,
            Locale::En,
            json!({
                "title": "Clients",
                "max_items": 1,
                "testimonials": [
                    {"name": "A", "title": "CEO", "company": "X", "quote": "Great"},
                    {"name": "B", "quote": "Good"},
                ],
            }),
        )
        .unwrap();
        assert!(html.contains("<blockquote>Great</blockquote>"));
        assert!(html.contains("<span>CEO, X</span>"));
        assert!(!html.contains("Good"));
    }

    #[test]
    fn test_case_carousel_links_localized() {
        let html = render(
            case_carousel,
            Locale::Id,
            json!({"title": "Karya", "cases": [{"title": "Brand X", "slug": "brand-x", "industry": "Retail"}]}),
        )
        .unwrap();
        assert!(html.contains(r#"<a href="/id/karya/brand-x" class="case-link">Brand X</a>"#));
        assert!(html.contains(r#"<p class="case-industry">Retail</p>"#));
    }

    #[test]
    fn test_dynamic_content_template() {
        let site = SiteSection::default();
        let data = json!({"site_settings": {"contact_email": "hi@cavota.id"}});
        let ctx =
            RenderContext::new(Locale::En, &site, "").with_template_data(&data);
        let section = json!({
            "title": "Contact",
            "content_template": "Email **{{site_settings.contact_email}}**",
        });
        let html = dynamic_content(&section, &ctx).unwrap();
        assert!(html.contains("<h2>Contact</h2>"));
        assert!(html.contains("<strong>hi@cavota.id</strong>"));
    }
}
