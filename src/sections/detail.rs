//! Detail pages for insights and case studies.
//!
//! Both are single CMS entries rather than section lists, rendered into a
//! fixed article layout and wrapped with [`render_document`].

use super::{
    RenderContext,
    document::{DocumentMeta, insight_path, render_document, work_path},
    markdown::article_to_html,
};
use crate::{
    amp::strip_active_content,
    content::{Insight, Work, non_empty},
    locale::Locale,
    utils::{date::long_date, html::escape_html},
};

// ============================================================================
// Insights
// ============================================================================

/// Full document for an insight. `alternates` are `(locale, slug)` pairs.
pub fn render_insight_page(
    insight: &Insight,
    ctx: &RenderContext,
    alternates: &[(Locale, String)],
) -> String {
    let locale = ctx.locale;
    let mut meta = DocumentMeta::from_seo(
        insight.seo.as_ref(),
        &insight.title,
        insight.summary.as_deref(),
        &insight_path(locale, &insight.slug),
        ctx.site,
    );
    meta.og_type = "article";
    if let Some(hero) = &insight.hero_image {
        meta.image = ctx.media_url(&hero.url);
    }

    let alternates: Vec<(Locale, String)> = alternates
        .iter()
        .map(|(other, slug)| (*other, insight_path(*other, slug)))
        .collect();
    render_document(&meta, locale, ctx.site, &insight_body(insight, ctx), &alternates)
}

fn insight_body(insight: &Insight, ctx: &RenderContext) -> String {
    let locale = ctx.locale;
    let strings = locale.strings();
    let listing = format!("/{locale}/{}", locale.insights_segment());
    let title = escape_html(&insight.title);

    let mut html = String::from(r#"<article class="insight">"#);
    html.push_str(&format!(
        r#"<nav class="breadcrumb"><a href="/{locale}">{}</a> / <a href="{listing}">{}</a> / <span>{title}</span></nav>"#,
        strings.home, strings.insights
    ));

    html.push_str(&format!(r#"<header class="article-header"><h1>{title}</h1>"#));
    if let Some(summary) = non_empty(insight.summary.as_deref()) {
        html.push_str(&format!(r#"<p class="summary">{}</p>"#, escape_html(summary)));
    }
    html.push_str(r#"<div class="article-meta">"#);
    if !insight.published_at.is_empty() {
        html.push_str(&format!(
            r#"<time datetime="{}">{}</time>"#,
            escape_html(&insight.published_at),
            escape_html(&long_date(&insight.published_at, locale))
        ));
    }
    let minutes = insight.reading_minutes();
    if minutes > 0 {
        html.push_str(&format!(
            "<span> • </span><span>{minutes} {}</span>",
            strings.read_time
        ));
    }
    html.push_str("</div>");
    if !insight.tags.is_empty() {
        html.push_str(r#"<div class="tags">"#);
        for tag in &insight.tags {
            html.push_str(&format!(r#"<span class="tag">{}</span>"#, escape_html(&tag.name)));
        }
        html.push_str("</div>");
    }
    html.push_str("</header>");

    if let Some(hero) = &insight.hero_image {
        let alt = non_empty(hero.alternative_text.as_deref()).unwrap_or(&insight.title);
        html.push_str(&format!(
            r#"<figure class="hero-image"><img src="{}" alt="{}"></figure>"#,
            escape_html(&ctx.media_url(&hero.url)),
            escape_html(alt)
        ));
    }

    html.push_str(&format!(
        r#"<div class="prose">{}</div>"#,
        article_to_html(&insight.body)
    ));
    html.push_str(&format!(
        r#"<footer class="article-footer"><a href="{listing}">← {}</a></footer>"#,
        strings.back_to_insights
    ));
    html.push_str("</article>");
    html
}

// ============================================================================
// Works
// ============================================================================

/// Full document for a case study. `alternates` are `(locale, slug)` pairs.
pub fn render_work_page(work: &Work, ctx: &RenderContext, alternates: &[(Locale, String)]) -> String {
    let locale = ctx.locale;
    let mut meta = DocumentMeta::from_seo(
        work.seo.as_ref(),
        &work.title,
        work.summary.as_deref(),
        &work_path(locale, &work.slug),
        ctx.site,
    );
    meta.og_type = "article";

    let alternates: Vec<(Locale, String)> = alternates
        .iter()
        .map(|(other, slug)| (*other, work_path(*other, slug)))
        .collect();
    render_document(&meta, locale, ctx.site, &work_body(work, locale), &alternates)
}

/// `over_500m` → `OVER 500M`.
fn band_label(value: &str) -> String {
    value.replace('_', " ").to_uppercase()
}

fn work_body(work: &Work, locale: Locale) -> String {
    let strings = locale.strings();
    let mut html = String::from(r#"<article class="work">"#);

    let kind: Vec<&str> = [work.categories.as_deref(), work.industry.as_deref()]
        .into_iter()
        .filter_map(non_empty)
        .collect();
    if !kind.is_empty() || work.is_enterprise {
        html.push_str(r#"<div class="work-kind">"#);
        if !kind.is_empty() {
            html.push_str(&format!("<span>{}</span>", escape_html(&kind.join(" • "))));
        }
        if work.is_enterprise {
            html.push_str(r#"<span class="badge">Enterprise</span>"#);
        }
        html.push_str("</div>");
    }

    html.push_str(&format!("<h1>{}</h1>", escape_html(&work.title)));
    if let Some(summary) = non_empty(work.summary.as_deref()) {
        html.push_str(&format!(r#"<p class="summary">{}</p>"#, escape_html(summary)));
    }

    let facts = [
        (strings.objective, non_empty(work.objective.as_deref()).map(str::to_owned)),
        (strings.budget, non_empty(work.budget_band.as_deref()).map(band_label)),
        (strings.channels, non_empty(work.channels.as_deref()).map(band_label)),
    ];
    html.push_str(r#"<dl class="work-facts">"#);
    for (label, value) in facts {
        html.push_str(&format!(
            "<div><dt>{label}</dt><dd>{}</dd></div>",
            escape_html(value.as_deref().unwrap_or(strings.not_specified))
        ));
    }
    html.push_str("</dl>");

    let details = match work.body.trim() {
        "" => escape_html(strings.details_unavailable),
        body => strip_active_content(body),
    };
    html.push_str(&format!(
        r#"<section class="prose"><h2>{}</h2><div>{details}</div></section>"#,
        strings.project_details
    ));
    html.push_str(&format!(
        r#"<footer class="article-footer"><a href="/{locale}">← {}</a></footer>"#,
        strings.back_to_home
    ));
    html.push_str("</article>");
    html
}
