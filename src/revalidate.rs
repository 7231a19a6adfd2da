//! Cache revalidation.
//!
//! Two ways in:
//!
//! - `/next-api/revalidate`: a caller names one entry (`model`, `slug`,
//!   `locale`) and proves it knows the shared secret. The entry's cache tags
//!   are dropped.
//! - `/next-api/strapi-webhook`: the CMS reports a lifecycle event. Every site
//!   path that can show the entry is dropped, then the sitemap.
//!
//! Both only invalidate; the next request re-renders.

use crate::{
    cache::RenderCache,
    locale::Locale,
    log,
    sections::{insight_path, page_path, service_path, service_slug, work_path},
    serve::reply::Reply,
    utils::query::Query,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

// ============================================================================
// Tag Revalidation
// ============================================================================

/// Where the revalidation parameters came from.
///
/// The two channels check the secret differently and word their errors
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// JSON body of a `POST`
    Body,
    /// Query string of a `GET`
    Query,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevalidateRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
}

impl RevalidateRequest {
    pub fn from_query(query: &Query) -> Self {
        let owned = |key: &str| query.get(key).map(str::to_owned);
        Self {
            model: owned("model"),
            slug: owned("slug"),
            locale: owned("locale"),
            secret: owned("secret"),
        }
    }
}

/// Cache tags an entry's pages were built from.
///
/// Models other than `page` and `insight` carry no tags.
pub fn revalidation_tags(model: &str, slug: &str, locale: Option<&str>) -> Vec<String> {
    let locale = locale.filter(|l| !l.is_empty()).unwrap_or("id");
    match model {
        "page" => vec![format!("page:{slug}:{locale}")],
        "insight" => vec![
            format!("insight:{slug}:{locale}"),
            format!("insights:{locale}"),
        ],
        _ => Vec::new(),
    }
}

/// Parse a `POST` body and revalidate.
pub fn revalidate_body(cache: &RenderCache, secret: Option<&str>, body: &str) -> Reply {
    // An unconfigured secret is reported before the body is even looked at
    if secret.is_none() {
        return error(500, "REVALIDATE_SECRET not configured");
    }
    match serde_json::from_str::<RevalidateRequest>(body) {
        Ok(request) => revalidate(cache, secret, Channel::Body, &request),
        Err(err) => {
            log!("revalidate"; "bad request body: {err}");
            Reply::json(
                500,
                &json!({ "error": "Internal server error", "message": err.to_string() }),
            )
        }
    }
}

/// Check the secret and required fields, then drop the entry's cache tags.
pub fn revalidate(
    cache: &RenderCache,
    secret: Option<&str>,
    channel: Channel,
    request: &RevalidateRequest,
) -> Reply {
    let provided = request.secret.as_deref();
    match channel {
        Channel::Body => {
            let Some(expected) = secret else {
                return error(500, "REVALIDATE_SECRET not configured");
            };
            if provided != Some(expected) {
                return error(401, "Invalid secret");
            }
        }
        Channel::Query => {
            if provided.is_none() || provided != secret {
                return error(401, "Invalid or missing secret");
            }
        }
    }

    let model = request.model.as_deref().filter(|m| !m.is_empty());
    let slug = request.slug.as_deref().filter(|s| !s.is_empty());
    let (Some(model), Some(slug)) = (model, slug) else {
        return error(
            400,
            match channel {
                Channel::Body => "Missing required fields: model, slug",
                Channel::Query => "Missing required query params: model, slug",
            },
        );
    };

    let tags = revalidation_tags(model, slug, request.locale.as_deref());
    for tag in &tags {
        let dropped = cache.invalidate_tag(tag);
        log!("revalidate"; "{tag} ({dropped} cached)");
    }

    Reply::json(
        200,
        &json!({
            "revalidated": true,
            "tags": tags,
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "message": format!("Successfully revalidated {} cache tag(s)", tags.len()),
        }),
    )
}

fn error(status: u16, message: &str) -> Reply {
    Reply::json(status, &json!({ "error": message }))
}

// ============================================================================
// CMS Webhook
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub entry: Option<WebhookEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Site paths that may render the changed entry, home pages first.
///
/// Duplicates are dropped, first occurrence wins.
pub fn webhook_paths(model: &str, slug: Option<&str>) -> Vec<String> {
    let slug = slug.filter(|s| !s.is_empty());
    let mut paths: Vec<String> = Locale::ALL.iter().map(|l| format!("/{l}")).collect();

    match model {
        "page" => {
            if let Some(slug) = slug {
                paths.extend(Locale::ALL.iter().map(|&l| page_path(l, slug)));
                let service = service_slug(slug);
                paths.extend(Locale::ALL.iter().map(|&l| service_path(l, service)));
            }
        }
        "insight" => {
            if let Some(slug) = slug {
                paths.extend(Locale::ALL.iter().map(|&l| insight_path(l, slug)));
                paths.extend(
                    Locale::ALL
                        .iter()
                        .map(|&l| format!("{}/amp", insight_path(l, slug))),
                );
            }
            paths.extend(
                Locale::ALL
                    .iter()
                    .map(|l| format!("/{l}/{}", l.insights_segment())),
            );
        }
        "work" => {
            if let Some(slug) = slug {
                paths.extend(Locale::ALL.iter().map(|&l| work_path(l, slug)));
            }
            paths.extend(
                Locale::ALL
                    .iter()
                    .map(|l| format!("/{l}/{}", l.works_segment())),
            );
        }
        // Shared content shows up on the home pages, already listed
        "global-strings" | "site-settings" | "testimonial" => {}
        other => log!("webhook"; "unknown model: {other}"),
    }

    let mut seen = rustc_hash::FxHashSet::default();
    paths.retain(|path| seen.insert(path.clone()));
    paths
}

/// Handle a CMS lifecycle event.
pub fn handle_webhook(cache: &RenderCache, body: &str) -> Reply {
    let payload: WebhookPayload = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(err) => {
            log!("webhook"; "error processing webhook: {err}");
            return Reply::json(
                500,
                &json!({ "success": false, "error": "Failed to process webhook" }),
            );
        }
    };
    let entry = payload.entry.unwrap_or_default();
    match entry.id {
        Some(id) => log!("webhook"; "{} for {} #{id}", payload.event, payload.model),
        None => log!("webhook"; "{} for {}", payload.event, payload.model),
    }

    // Placeholders for these can sit in any page's dynamic sections
    if matches!(payload.model.as_str(), "global-strings" | "site-settings") {
        cache.clear();
    }

    let slug = entry.slug.as_deref();
    if let Some(slug) = slug.filter(|s| !s.is_empty()) {
        for tag in revalidation_tags(&payload.model, slug, entry.locale.as_deref()) {
            cache.invalidate_tag(&tag);
        }
    }

    let paths = webhook_paths(&payload.model, slug);
    let results: Vec<Value> = paths
        .iter()
        .map(|path| {
            cache.invalidate_path(path);
            json!({ "path": path, "success": true })
        })
        .collect();
    cache.invalidate_path("/sitemap.xml");
    log!("webhook"; "revalidated {} paths and the sitemap", paths.len());

    Reply::json(
        200,
        &json!({
            "success": true,
            "message": format!("Revalidated {} of {} paths", results.len(), paths.len()),
            "event": payload.event,
            "model": payload.model,
            "results": results,
        }),
    )
}

/// Description returned to a `GET` on the webhook endpoint.
pub fn webhook_info() -> Reply {
    Reply::json(
        200,
        &json!({
            "status": "Strapi Webhook Handler",
            "endpoint": "/next-api/strapi-webhook",
            "method": "POST",
            "description": "Receives webhooks from Strapi and drops the affected cached pages",
        }),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedResponse;
    use std::time::Duration;

    fn cache_with(entries: &[(&str, &[&str])]) -> RenderCache {
        let cache = RenderCache::new(Duration::from_secs(300));
        for (path, tags) in entries {
            cache.insert(
                *path,
                CachedResponse {
                    body: String::new(),
                    content_type: "text/html; charset=utf-8",
                    headers: Vec::new(),
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                },
            );
        }
        cache
    }

    fn request(model: Option<&str>, slug: Option<&str>, secret: Option<&str>) -> RevalidateRequest {
        RevalidateRequest {
            model: model.map(Into::into),
            slug: slug.map(Into::into),
            locale: None,
            secret: secret.map(Into::into),
        }
    }

    #[test]
    fn test_revalidation_tags() {
        assert_eq!(revalidation_tags("page", "tentang", Some("id")), ["page:tentang:id"]);
        assert_eq!(
            revalidation_tags("insight", "growth", Some("en")),
            ["insight:growth:en", "insights:en"]
        );
        assert_eq!(revalidation_tags("page", "beranda", None), ["page:beranda:id"]);
        assert!(revalidation_tags("work", "x", Some("en")).is_empty());
    }

    #[test]
    fn test_body_without_configured_secret() {
        let cache = cache_with(&[]);
        let reply = revalidate_body(&cache, None, r#"{"model":"page","slug":"a"}"#);
        assert_eq!(reply.status, 500);
        assert_eq!(reply.json_body()["error"], "REVALIDATE_SECRET not configured");
    }

    #[test]
    fn test_body_wrong_secret() {
        let cache = cache_with(&[]);
        let reply = revalidate_body(
            &cache,
            Some("s3cret"),
            r#"{"model":"page","slug":"a","secret":"nope"}"#,
        );
        assert_eq!(reply.status, 401);
        assert_eq!(reply.json_body()["error"], "Invalid secret");
    }

    #[test]
    fn test_body_missing_fields() {
        let cache = cache_with(&[]);
        let reply = revalidate_body(&cache, Some("s3cret"), r#"{"model":"page","secret":"s3cret"}"#);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.json_body()["error"], "Missing required fields: model, slug");
    }

    #[test]
    fn test_body_not_json() {
        let cache = cache_with(&[]);
        let reply = revalidate_body(&cache, Some("s3cret"), "{");
        assert_eq!(reply.status, 500);
        assert_eq!(reply.json_body()["error"], "Internal server error");
    }

    #[test]
    fn test_body_success_drops_tags() {
        let cache = cache_with(&[
            ("/en/insights/growth/amp", &["insight:growth:en", "insights:en"]),
            ("/id/wawasan/tumbuh/amp", &["insight:tumbuh:id", "insights:id"]),
        ]);
        let reply = revalidate_body(
            &cache,
            Some("s3cret"),
            r#"{"model":"insight","slug":"growth","locale":"en","secret":"s3cret"}"#,
        );
        assert_eq!(reply.status, 200);

        let body = reply.json_body();
        assert_eq!(body["revalidated"], true);
        assert_eq!(body["tags"], json!(["insight:growth:en", "insights:en"]));
        assert_eq!(body["message"], "Successfully revalidated 2 cache tag(s)");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));

        assert!(cache.get("/en/insights/growth/amp").is_none());
        assert!(cache.get("/id/wawasan/tumbuh/amp").is_some());
    }

    #[test]
    fn test_query_secret_checks() {
        let cache = cache_with(&[]);
        let missing = request(Some("page"), Some("a"), None);
        let reply = revalidate(&cache, Some("s3cret"), Channel::Query, &missing);
        assert_eq!(reply.status, 401);
        assert_eq!(reply.json_body()["error"], "Invalid or missing secret");

        // No configured secret never matches
        let provided = request(Some("page"), Some("a"), Some("x"));
        let reply = revalidate(&cache, None, Channel::Query, &provided);
        assert_eq!(reply.status, 401);
    }

    #[test]
    fn test_query_missing_params() {
        let cache = cache_with(&[]);
        let query = Query::parse("model=page&secret=s3cret");
        let reply = revalidate(
            &cache,
            Some("s3cret"),
            Channel::Query,
            &RevalidateRequest::from_query(&query),
        );
        assert_eq!(reply.status, 400);
        assert_eq!(reply.json_body()["error"], "Missing required query params: model, slug");
    }

    #[test]
    fn test_query_success() {
        let cache = cache_with(&[("/id/tentang", &["page:tentang:id"])]);
        let query = Query::parse("model=page&slug=tentang&secret=s3cret");
        let reply = revalidate(
            &cache,
            Some("s3cret"),
            Channel::Query,
            &RevalidateRequest::from_query(&query),
        );
        assert_eq!(reply.status, 200);
        assert_eq!(reply.json_body()["tags"], json!(["page:tentang:id"]));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_webhook_paths_insight() {
        assert_eq!(
            webhook_paths("insight", Some("growth")),
            [
                "/id",
                "/en",
                "/id/wawasan/growth",
                "/en/insights/growth",
                "/id/wawasan/growth/amp",
                "/en/insights/growth/amp",
                "/id/wawasan",
                "/en/insights",
            ]
        );
        assert_eq!(
            webhook_paths("insight", None),
            ["/id", "/en", "/id/wawasan", "/en/insights"]
        );
    }

    #[test]
    fn test_webhook_paths_other_models() {
        assert_eq!(
            webhook_paths("page", Some("about")),
            ["/id", "/en", "/id/about", "/en/about", "/id/layanan/about", "/en/services/about"]
        );
        assert_eq!(
            webhook_paths("page", Some("layanan-seo")),
            [
                "/id",
                "/en",
                "/id/layanan-seo",
                "/en/layanan-seo",
                "/id/layanan/seo",
                "/en/services/seo",
            ]
        );
        assert_eq!(webhook_paths("page", None), ["/id", "/en"]);
        assert_eq!(
            webhook_paths("work", Some("x")),
            ["/id", "/en", "/id/karya/x", "/en/work/x", "/id/karya", "/en/work"]
        );
        assert_eq!(webhook_paths("global-strings", None), ["/id", "/en"]);
        assert_eq!(webhook_paths("testimonial", Some("t")), ["/id", "/en"]);
        assert_eq!(webhook_paths("mystery", Some("m")), ["/id", "/en"]);
    }

    #[test]
    fn test_handle_webhook() {
        let cache = cache_with(&[
            ("/id", &[]),
            ("/en/insights/growth/amp", &["insight:growth:en", "insights:en"]),
            ("/id/wawasan/growth/amp", &[]),
            ("/sitemap.xml", &[]),
            ("/en/about", &["page:about:en"]),
        ]);
        let reply = handle_webhook(
            &cache,
            r#"{"event":"entry.update","model":"insight","entry":{"id":3,"slug":"growth","locale":"en"}}"#,
        );
        assert_eq!(reply.status, 200);

        let body = reply.json_body();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Revalidated 8 of 8 paths");
        assert_eq!(body["event"], "entry.update");
        assert_eq!(body["model"], "insight");
        assert_eq!(body["results"][0], json!({"path": "/id", "success": true}));

        assert_eq!(cache.len(), 1);
        assert!(cache.get("/en/about").is_some());
    }

    #[test]
    fn test_handle_webhook_shared_content_clears() {
        let cache = cache_with(&[("/id/tentang", &["page:tentang:id"]), ("/en/about", &[])]);
        let reply = handle_webhook(&cache, r#"{"event":"entry.publish","model":"site-settings"}"#);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.json_body()["message"], "Revalidated 2 of 2 paths");
        assert!(cache.is_empty());

        let cache = cache_with(&[("/en/about", &["page:about:en"])]);
        handle_webhook(&cache, r#"{"event":"entry.update","model":"testimonial"}"#);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_handle_webhook_bad_payload() {
        let cache = cache_with(&[]);
        let reply = handle_webhook(&cache, "not json");
        assert_eq!(reply.status, 500);
        assert_eq!(
            reply.json_body(),
            json!({"success": false, "error": "Failed to process webhook"})
        );
    }

    #[test]
    fn test_webhook_info() {
        let body = webhook_info().json_body();
        assert_eq!(body["endpoint"], "/next-api/strapi-webhook");
        assert_eq!(body["method"], "POST");
    }
}
