//! Section-composed pages.
//!
//! A CMS page carries a list of section payloads, each tagged with a
//! `__component` discriminator (`sections.hero`, `sections.playbook`, ...).
//! [`SectionRegistry`] maps the discriminator to a renderer and concatenates
//! the results; [`render_page_document`] wraps them in a full HTML document.
//!
//! Insight and case-study detail pages are single entries, not section lists;
//! the `detail` module renders those into the same document shell.

mod blocks;
mod detail;
mod document;
mod markdown;

pub use detail::{render_insight_page, render_work_page};
pub use document::{
    insight_path, page_path, render_page_document, render_service_document, service_path,
    service_slug, work_path,
};

use crate::{config::SiteSection, locale::Locale, log, utils::html::escape_html};
use rustc_hash::FxHashMap;
use serde_json::Value;

/// Everything a section renderer may read besides its own payload.
pub struct RenderContext<'a> {
    pub locale: Locale,
    pub site: &'a SiteSection,
    /// Prefix for CMS-hosted uploads referenced by relative URL.
    pub media_origin: &'a str,
    /// `{ "site_settings": .., "global_strings": .. }` for template placeholders.
    pub template_data: Option<&'a Value>,
}

impl<'a> RenderContext<'a> {
    pub fn new(locale: Locale, site: &'a SiteSection, media_origin: &'a str) -> Self {
        Self {
            locale,
            site,
            media_origin,
            template_data: None,
        }
    }

    pub fn with_template_data(mut self, data: &'a Value) -> Self {
        self.template_data = Some(data);
        self
    }

    /// Absolute URL of a CMS upload.
    pub fn media_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{url}", self.media_origin)
        } else {
            url.to_owned()
        }
    }
}

/// Renders one section payload; `None` renders nothing.
pub type SectionRenderer = fn(&Value, &RenderContext) -> Option<String>;

/// Discriminator → renderer lookup.
pub struct SectionRegistry {
    renderers: FxHashMap<&'static str, SectionRenderer>,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("sections.hero", blocks::hero)
            .register("sections.services-grid", blocks::services_grid)
            .register("sections.rich-text", blocks::rich_text)
            .register("sections.metrics-grid", blocks::metrics_grid)
            .register("sections.cta-strip", blocks::cta_strip)
            .register("sections.proof-bar", blocks::proof_bar)
            .register("sections.playbook", blocks::playbook)
            .register("sections.testimonial-carousel", blocks::testimonial_carousel)
            .register("sections.case-carousel", blocks::case_carousel)
            .register("sections.dynamic-content", blocks::dynamic_content);
        registry
    }
}

impl SectionRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: FxHashMap::default(),
        }
    }

    /// Add or replace the renderer for a discriminator.
    pub fn register(&mut self, component: &'static str, renderer: SectionRenderer) -> &mut Self {
        self.renderers.insert(component, renderer);
        self
    }

    #[cfg(test)]
    pub fn contains(&self, component: &str) -> bool {
        self.renderers.contains_key(component)
    }

    /// Render one payload by its `__component` tag.
    ///
    /// Payloads without a tag, or with a tag nobody registered, are skipped.
    pub fn render_section(&self, section: &Value, ctx: &RenderContext) -> Option<String> {
        let component = section.get("__component").and_then(Value::as_str)?;
        match self.renderers.get(component) {
            Some(render) => render(section, ctx),
            None => {
                log!("sections"; "unknown section component: {component}");
                None
            }
        }
    }

    /// Render a page's section list in order.
    ///
    /// `None` means the CMS sent no list at all, which shows the localized
    /// "content not available" notice instead of an empty page.
    pub fn render_sections(&self, sections: Option<&[Value]>, ctx: &RenderContext) -> String {
        let Some(sections) = sections else {
            return format!(
                "<div class=\"content-unavailable\"><p>{}</p></div>",
                escape_html(ctx.locale.strings().content_unavailable)
            );
        };
        sections
            .iter()
            .filter_map(|section| self.render_section(section, ctx))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
