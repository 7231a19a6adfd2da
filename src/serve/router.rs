//! Request routing.
//!
//! [`route`] maps a method, request target and body onto a [`Reply`] without
//! touching the network, so every endpoint is testable against a
//! [`FixtureSource`](crate::content::FixtureSource).
//!
//! | Path                                     | Handler               |
//! |------------------------------------------|-----------------------|
//! | `/{locale}/insights/{slug}/amp`          | AMP article           |
//! | `/{locale}/insights/{slug}`              | insight article       |
//! | `/{locale}/work/{slug}`                  | case study            |
//! | `/{locale}/services/{slug}`              | service page          |
//! | `/{locale}` and `/{locale}/{slug}`       | section page          |
//! | `/sitemap.xml`                           | sitemap               |
//! | `/next-api/revalidate`                   | tag revalidation      |
//! | `/next-api/strapi-webhook`               | CMS webhook           |
//! | `/next-api/translate-path`               | slug translation      |
//! | `/next-api/rfp-submissions`              | contact form          |
//! | `/next-api/proxy/global-strings`         | CMS passthrough       |
//! | `/api/proxy/site-settings`               | CMS passthrough       |
//!
//! Detail segments match in either language (`wawasan`, `karya`, `layanan`).

use super::reply::{HTML, Reply, XML};
use crate::{
    amp::render_amp_page,
    cache::{CachedResponse, RenderCache},
    config::SiteConfig,
    content::{Collection, ContentSource, Page},
    locale::Locale,
    log, revalidate, rfp,
    sections::{
        RenderContext, SectionRegistry, insight_path, page_path, render_insight_page,
        render_page_document, render_service_document, render_work_page, service_path, work_path,
    },
    sitemap::{self, build_sitemap, fallback_sitemap},
    utils::{
        minify::{MinifyType, minify},
        query::{Query, split_target},
    },
};
use serde_json::{Value, json};
use std::time::Duration;
use tiny_http::Method;

/// `Cache-Control` of rendered articles and pages.
const PAGE_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";

// ============================================================================
// Application State
// ============================================================================

/// Everything a request handler needs, shared by all server threads.
pub struct App {
    pub config: SiteConfig,
    pub source: Box<dyn ContentSource>,
    pub cache: RenderCache,
    pub registry: SectionRegistry,
}

impl App {
    pub fn new(config: SiteConfig, source: Box<dyn ContentSource>) -> Self {
        let cache = RenderCache::new(Duration::from_secs(config.serve.cache_ttl));
        Self {
            config,
            source,
            cache,
            registry: SectionRegistry::default(),
        }
    }

    /// Store a rendered response unless caching is switched off.
    fn remember(&self, key: &str, response: &CachedResponse) {
        if self.config.serve.cache_ttl > 0 {
            self.cache.insert(key, response.clone());
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Resolve one request.
pub fn route(app: &App, method: &Method, target: &str, body: &str) -> Reply {
    let (path, query) = split_target(target);
    let query = Query::parse(query);
    let secret = app.config.revalidate.secret.as_deref();

    match (method, path.as_str()) {
        (Method::Get, "/sitemap.xml") => sitemap_xml(app),

        (Method::Post, "/next-api/revalidate") => {
            revalidate::revalidate_body(&app.cache, secret, body)
        }
        (Method::Get, "/next-api/revalidate") => revalidate::revalidate(
            &app.cache,
            secret,
            revalidate::Channel::Query,
            &revalidate::RevalidateRequest::from_query(&query),
        ),

        (Method::Post, "/next-api/strapi-webhook") => revalidate::handle_webhook(&app.cache, body),
        (Method::Get, "/next-api/strapi-webhook") => revalidate::webhook_info(),

        (Method::Get, "/next-api/translate-path" | "/api/translate-path") => {
            translate_path(app, &query)
        }
        (Method::Post, "/next-api/rfp-submissions") => rfp::submit(app.source.as_ref(), body),
        (Method::Get, "/next-api/proxy/global-strings") => global_strings(app, &query),
        (Method::Get, "/api/proxy/site-settings") => site_settings(app),

        (Method::Get, _) => {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            match segments.as_slice() {
                [locale, "insights" | "wawasan", slug, "amp"] => amp_article(app, locale, slug),
                [locale, "insights" | "wawasan", slug] => insight_page(app, locale, slug),
                [locale, "work" | "karya", slug] => work_page(app, locale, slug),
                [locale, "services" | "layanan", slug] => service_page(app, locale, slug),
                [locale] => section_page(app, locale, None),
                [locale, slug] => section_page(app, locale, Some(*slug)),
                _ => Reply::not_found(),
            }
        }

        _ => Reply::not_found(),
    }
}

fn internal_error() -> Reply {
    Reply::text(500, "Internal Server Error")
}

/// Minify a rendered document and cache it under `key`.
fn html_page(app: &App, key: &str, html: &str, tags: Vec<String>) -> Reply {
    let response = CachedResponse {
        body: minify(MinifyType::Html(html), &app.config).into_owned(),
        content_type: HTML,
        headers: vec![("Cache-Control", PAGE_CACHE_CONTROL.into())],
        tags,
    };
    app.remember(key, &response);
    response.into()
}

// ============================================================================
// AMP Articles
// ============================================================================

fn amp_article(app: &App, locale: &str, slug: &str) -> Reply {
    // An unknown locale is just another missing article
    let Some(locale) = Locale::from_code(locale) else {
        return Reply::text(404, "Insight not found");
    };
    let key = format!("{}/amp", insight_path(locale, slug));
    if let Some(cached) = app.cache.get(&key) {
        return cached.into();
    }

    match app.source.insight_by_slug(slug, locale) {
        Ok(Some(insight)) => {
            log!("amp"; "{key}");
            let response = CachedResponse {
                body: render_amp_page(&insight, locale, &app.config.site),
                content_type: HTML,
                headers: vec![
                    ("Cache-Control", PAGE_CACHE_CONTROL.into()),
                    ("Vary", "Accept-Encoding".into()),
                ],
                tags: vec![format!("insight:{slug}:{locale}"), format!("insights:{locale}")],
            };
            app.remember(&key, &response);
            response.into()
        }
        Ok(None) => Reply::text(404, "Insight not found"),
        Err(err) => {
            log!("error"; "AMP render of {key} failed: {:#}", anyhow::Error::from(err));
            internal_error()
        }
    }
}

// ============================================================================
// Section Pages
// ============================================================================

fn section_page(app: &App, locale: &str, slug: Option<&str>) -> Reply {
    let Some(locale) = Locale::from_code(locale) else {
        return Reply::not_found();
    };
    let slug = slug.unwrap_or(locale.home_slug());
    let key = page_path(locale, slug);
    if let Some(cached) = app.cache.get(&key) {
        return cached.into();
    }

    let page = match app.source.page_by_slug(slug, locale) {
        Ok(Some(page)) => page,
        Ok(None) => return Reply::text(404, locale.strings().page_not_found),
        Err(err) => {
            log!("error"; "page {key} failed: {:#}", anyhow::Error::from(err));
            return internal_error();
        }
    };

    let body = compose(app, &page, locale);
    let alternates = alternates(app.source.as_ref(), Collection::Pages, &page.slug, locale);
    let html = render_page_document(&page, locale, &app.config.site, &body, &alternates);
    log!("page"; "{key}");
    html_page(app, &key, &html, vec![format!("page:{}:{locale}", page.slug)])
}

/// A `custom` page under the services segment. Indonesian entries are
/// looked up as `layanan-{slug}` first.
fn service_page(app: &App, locale: &str, slug: &str) -> Reply {
    let Some(locale) = Locale::from_code(locale) else {
        return Reply::not_found();
    };
    let key = service_path(locale, slug);
    if let Some(cached) = app.cache.get(&key) {
        return cached.into();
    }

    let mut candidates = vec![slug.to_owned()];
    if locale == Locale::Id {
        candidates.insert(0, format!("layanan-{slug}"));
    }
    let mut found = None;
    for candidate in &candidates {
        match app.source.page_by_slug(candidate, locale) {
            Ok(Some(page)) => {
                found = Some(page);
                break;
            }
            Ok(None) => {}
            Err(err) => {
                log!("error"; "service {key} failed: {:#}", anyhow::Error::from(err));
                return internal_error();
            }
        }
    }
    let Some(page) = found.filter(|page| page.is_service() && page.sections.is_some()) else {
        return Reply::text(404, locale.strings().page_not_found);
    };

    let body = compose(app, &page, locale);
    let alternates = alternates(app.source.as_ref(), Collection::Pages, &page.slug, locale);
    let html = render_service_document(&page, locale, &app.config.site, &body, &alternates);
    log!("service"; "{key}");
    html_page(app, &key, &html, vec![format!("page:{}:{locale}", page.slug)])
}

/// Render a page's sections, loading template data only when a section
/// asks for it.
fn compose(app: &App, page: &Page, locale: Locale) -> String {
    let sections = page.sections.as_deref();
    let data = sections
        .filter(|sections| sections.iter().any(uses_templates))
        .map(|_| template_data(app.source.as_ref(), locale));

    let mut ctx = RenderContext::new(locale, &app.config.site, &app.config.cms.url);
    if let Some(data) = &data {
        ctx = ctx.with_template_data(data);
    }
    app.registry.render_sections(sections, &ctx)
}

fn uses_templates(section: &Value) -> bool {
    section.get("__component").and_then(Value::as_str) == Some("sections.dynamic-content")
}

/// `{ site_settings, global_strings }` for template placeholders. Parts the
/// CMS cannot deliver stay `null`, leaving their placeholders unresolved.
fn template_data(source: &dyn ContentSource, locale: Locale) -> Value {
    let data = |result: Result<Value, _>, what: &str| match result {
        Ok(mut value) => value.get_mut("data").map(Value::take).unwrap_or(Value::Null),
        Err(err) => {
            log!("cms"; "{what} unavailable: {err}");
            Value::Null
        }
    };
    json!({
        "site_settings": data(source.site_settings(), "site settings"),
        "global_strings": data(source.global_strings(locale), "global strings"),
    })
}

/// Every locale's slug of the entry, the current one included.
fn alternates(
    source: &dyn ContentSource,
    collection: Collection,
    slug: &str,
    locale: Locale,
) -> Vec<(Locale, String)> {
    Locale::ALL
        .iter()
        .filter_map(|&other| {
            if other == locale {
                return Some((other, slug.to_owned()));
            }
            match source.translate_slug(collection, slug, locale, other) {
                Ok(translated) => translated.map(|s| (other, s)),
                Err(err) => {
                    log!("cms"; "no {other} alternate for {slug}: {err}");
                    None
                }
            }
        })
        .collect()
}

// ============================================================================
// Detail Pages
// ============================================================================

fn insight_page(app: &App, locale: &str, slug: &str) -> Reply {
    let Some(locale) = Locale::from_code(locale) else {
        return Reply::not_found();
    };
    let key = insight_path(locale, slug);
    if let Some(cached) = app.cache.get(&key) {
        return cached.into();
    }

    let insight = match app.source.insight_by_slug(slug, locale) {
        Ok(Some(insight)) => insight,
        Ok(None) => return Reply::text(404, locale.strings().page_not_found),
        Err(err) => {
            log!("error"; "insight {key} failed: {:#}", anyhow::Error::from(err));
            return internal_error();
        }
    };

    let ctx = RenderContext::new(locale, &app.config.site, &app.config.cms.url);
    let alternates = alternates(app.source.as_ref(), Collection::Insights, &insight.slug, locale);
    let html = render_insight_page(&insight, &ctx, &alternates);
    log!("insight"; "{key}");
    html_page(
        app,
        &key,
        &html,
        vec![format!("insight:{slug}:{locale}"), format!("insights:{locale}")],
    )
}

fn work_page(app: &App, locale: &str, slug: &str) -> Reply {
    let Some(locale) = Locale::from_code(locale) else {
        return Reply::not_found();
    };
    let key = work_path(locale, slug);
    if let Some(cached) = app.cache.get(&key) {
        return cached.into();
    }

    let work = match app.source.work_by_slug(slug, locale) {
        Ok(Some(work)) => work,
        Ok(None) => return Reply::text(404, locale.strings().page_not_found),
        Err(err) => {
            log!("error"; "work {key} failed: {:#}", anyhow::Error::from(err));
            return internal_error();
        }
    };

    let ctx = RenderContext::new(locale, &app.config.site, &app.config.cms.url);
    let alternates = alternates(app.source.as_ref(), Collection::Works, &work.slug, locale);
    let html = render_work_page(&work, &ctx, &alternates);
    log!("work"; "{key}");
    // Works carry no tags; the webhook drops their paths
    html_page(app, &key, &html, Vec::new())
}

// ============================================================================
// Sitemap
// ============================================================================

fn sitemap_xml(app: &App) -> Reply {
    const KEY: &str = "/sitemap.xml";
    if let Some(cached) = app.cache.get(KEY) {
        return cached.into();
    }

    match build_sitemap(app.source.as_ref(), &app.config.site.url) {
        Ok(xml) => {
            let response = CachedResponse {
                body: minify(MinifyType::Xml(&xml), &app.config).into_owned(),
                content_type: XML,
                headers: vec![("Cache-Control", sitemap::CACHE_CONTROL.into())],
                tags: Vec::new(),
            };
            app.remember(KEY, &response);
            response.into()
        }
        Err(err) => {
            log!("error"; "sitemap generation failed: {:#}", anyhow::Error::from(err));
            Reply::new(200, XML, fallback_sitemap(&app.config.site.url))
        }
    }
}

// ============================================================================
// API Endpoints
// ============================================================================

/// Slug of the same entry in another locale. Misses and CMS failures answer
/// with the slug that was asked about.
fn translate_path(app: &App, query: &Query) -> Reply {
    let (Some(slug), Some(current), Some(target)) = (
        query.get("slug"),
        query.get("currentLocale"),
        query.get("targetLocale"),
    ) else {
        return Reply::json(400, &json!({ "error": "Missing parameters" }));
    };

    let collection = Collection::from_param(query.get("type"));
    let translated = match (Locale::from_code(current), Locale::from_code(target)) {
        (Some(from), Some(to)) => app
            .source
            .translate_slug(collection, slug, from, to)
            .unwrap_or_else(|err| {
                log!("cms"; "error translating path: {err}");
                None
            }),
        _ => None,
    };

    Reply::json(200, &json!({ "slug": translated.as_deref().unwrap_or(slug) }))
}

fn global_strings(app: &App, query: &Query) -> Reply {
    let locale = Locale::or_default(query.get("locale").unwrap_or_default());
    match app.source.global_strings(locale) {
        Ok(data) => Reply::json(200, &data),
        Err(err) => {
            log!("error"; "global strings: {:#}", anyhow::Error::from(err));
            Reply::json(500, &json!({ "error": "Failed to fetch global strings" }))
        }
    }
}

fn site_settings(app: &App) -> Reply {
    match app.source.site_settings() {
        Ok(data) => Reply::json(200, &data),
        Err(err) => {
            log!("error"; "site settings: {:#}", anyhow::Error::from(err));
            Reply::json(500, &json!({ "error": "Failed to fetch site settings" }))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
