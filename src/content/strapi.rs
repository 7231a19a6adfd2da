//! HTTP client for the CMS REST API.
//!
//! All lookups go through `GET {base}/api/<collection>?filters[..][$eq]=..&locale=..`
//! and read the first element of the `data` array. Failures are surfaced to
//! the caller as-is; there is no retry or timeout policy here.

use super::{
    Collection, ContentSource,
    error::CmsError,
    types::{ContentItem, Insight, Page, RfpSubmission, Work},
};
use crate::locale::Locale;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Relations the AMP and article views need on an insight.
const INSIGHT_POPULATE: &str = "populate[hero_image][populate]=*\
&populate[seo][populate]=*\
&populate[tags]=true\
&populate[author]=true\
&populate[localizations]=true";

/// Nested section fields, listed explicitly since `*` stops at depth one.
const PAGE_POPULATE: &str = "populate[0]=sections\
&populate[1]=sections.items\
&populate[2]=sections.items.icon\
&populate[3]=sections.metrics\
&populate[4]=sections.buttons\
&populate[5]=sections.media\
&populate[6]=sections.steps\
&populate[7]=sections.testimonials\
&populate[8]=sections.media_web\
&populate[9]=sections.media_mobile\
&populate[10]=sections.logos\
&populate[11]=sections.button\
&populate[12]=seo";

/// Page size for collection listings.
const LIST_PAGE_SIZE: u32 = 100;

pub struct StrapiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl StrapiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, CmsError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let http = Client::builder()
            .build()
            .map_err(|source| CmsError::Transport {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self {
            base_url,
            token: token.filter(|t| !t.is_empty()),
            http,
        })
    }

    /// Absolute URL for an `/api`-relative path with query.
    pub fn endpoint(&self, path_and_query: &str) -> String {
        format!("{}/api{path_and_query}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Content-Type", "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, url: &str, request: RequestBuilder) -> Result<Value, CmsError> {
        let transport = |source| CmsError::Transport {
            url: url.to_owned(),
            source,
        };

        let response = self.authorize(request).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or_default().to_owned());
            return Err(CmsError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().map_err(transport)?;
        serde_json::from_str(&text).map_err(|err| CmsError::Decode(url.to_owned(), err))
    }

    fn get_json(&self, path_and_query: &str) -> Result<Value, CmsError> {
        let url = self.endpoint(path_and_query);
        self.send(&url, self.http.get(&url))
    }

    /// First element of the `data` array, decoded.
    fn first<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<Option<T>, CmsError> {
        let url = self.endpoint(path_and_query);
        let mut response = self.send(&url, self.http.get(&url))?;
        let first = match response.get_mut("data") {
            Some(Value::Array(items)) if !items.is_empty() => items.swap_remove(0),
            _ => return Ok(None),
        };
        serde_json::from_value(first)
            .map(Some)
            .map_err(|err| CmsError::Decode(url, err))
    }

    /// Every element of the `data` array, decoded.
    fn all<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<Vec<T>, CmsError> {
        let url = self.endpoint(path_and_query);
        let mut response = self.send(&url, self.http.get(&url))?;
        match response.get_mut("data").map(Value::take) {
            Some(data @ Value::Array(_)) => {
                serde_json::from_value(data).map_err(|err| CmsError::Decode(url, err))
            }
            _ => Ok(Vec::new()),
        }
    }
}

fn slug_filter(slug: &str) -> String {
    format!("filters[slug][$eq]={}", urlencoding::encode(slug))
}

impl ContentSource for StrapiClient {
    fn insight_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Insight>, CmsError> {
        self.first(&format!(
            "/insights?{}&locale={locale}&{INSIGHT_POPULATE}",
            slug_filter(slug)
        ))
    }

    fn work_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Work>, CmsError> {
        self.first(&format!(
            "/works?{}&locale={locale}&populate=*",
            slug_filter(slug)
        ))
    }

    fn page_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<Page>, CmsError> {
        self.first(&format!(
            "/pages?{}&locale={locale}&{PAGE_POPULATE}",
            slug_filter(slug)
        ))
    }

    fn list(&self, collection: Collection, locale: Locale) -> Result<Vec<ContentItem>, CmsError> {
        self.all(&format!(
            "/{}?locale={locale}&pagination[pageSize]={LIST_PAGE_SIZE}",
            collection.api_name()
        ))
    }

    fn item_by_slug(
        &self,
        collection: Collection,
        slug: &str,
        locale: Locale,
    ) -> Result<Option<ContentItem>, CmsError> {
        self.first(&format!(
            "/{}?{}&locale={locale}",
            collection.api_name(),
            slug_filter(slug)
        ))
    }

    fn item_by_document_id(
        &self,
        collection: Collection,
        document_id: &str,
        locale: Locale,
    ) -> Result<Option<ContentItem>, CmsError> {
        self.first(&format!(
            "/{}?filters[documentId][$eq]={}&locale={locale}",
            collection.api_name(),
            urlencoding::encode(document_id)
        ))
    }

    fn global_strings(&self, locale: Locale) -> Result<Value, CmsError> {
        self.get_json(&format!("/global-strings?locale={locale}"))
    }

    fn site_settings(&self) -> Result<Value, CmsError> {
        self.get_json("/site-settings?populate=*")
    }

    fn submit_rfp(&self, submission: &RfpSubmission) -> Result<Value, CmsError> {
        let url = self.endpoint("/rfp-submissions");
        let request = self.http.post(&url).json(&json!({ "data": submission }));
        self.send(&url, request)
    }
}
