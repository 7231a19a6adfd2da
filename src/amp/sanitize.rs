//! HTML → AMP conversion of editor-authored article bodies.
//!
//! AMP forbids custom JS, inline CSS and raw media tags, so the body is
//! rewritten with a fixed sequence of pattern substitutions:
//!
//! 1. drop `<script>` and `<style>` blocks
//! 2. drop inline `on*="..."` handlers
//! 3. `<img>` → `<amp-img>` (dropped without `src`)
//! 4. `<video>…</video>` → `<amp-video>` (dropped without `src`)
//! 5. YouTube `<iframe>` → `<amp-youtube>`
//! 6. drop every other `<iframe>…</iframe>`
//! 7. drop leftover `style` / `onclick` / `onload` / `onerror` attributes
//! 8. `target="_blank"` anchors without `rel=` gain `rel="noopener nofollow"`
//!
//! Each step sees the whole output of the previous one. The order is part of
//! the contract: reordering changes output on real articles.
//!
//! Conversion never fails. Markup it does not recognize passes through.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Origin prefixed to root-relative media sources.
pub const DEFAULT_ORIGIN: &str = "https://cavota.id";

const IMG_DEFAULT_WIDTH: &str = "800";
const IMG_DEFAULT_HEIGHT: &str = "600";
const VIDEO_DEFAULT_WIDTH: &str = "640";
const VIDEO_DEFAULT_HEIGHT: &str = "360";

macro_rules! regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("static pattern compiles"));
    };
}

regex!(RE_SCRIPT, r#"(?is)<script[^>]*>.*?</script>"#);
regex!(RE_STYLE, r#"(?is)<style[^>]*>.*?</style>"#);
regex!(RE_EVENT_HANDLER, r#"(?i)\s*on[a-z0-9_]+\s*=\s*["'][^"']*["']"#);
regex!(RE_IMG, r#"(?i)<img([^>]*?)>"#);
regex!(RE_VIDEO, r#"(?is)<video([^>]*?)>(.*?)</video>"#);
regex!(
    RE_YOUTUBE,
    r#"(?is)<iframe[^>]*youtube\.com/embed/([^"'\s?&]+)[^>]*>.*?</iframe>"#
);
regex!(RE_IFRAME, r#"(?is)<iframe([^>]*)>.*?</iframe>"#);
regex!(
    RE_DANGEROUS_ATTR,
    r#"(?i)\s*(style|onclick|onload|onerror)\s*=\s*["'][^"']*["']"#
);
regex!(RE_ANCHOR, r#"(?i)<a([^>]*?)>"#);

regex!(RE_ATTR_SRC, r#"(?i)src\s*=\s*["']([^"']*)["']"#);
regex!(RE_ATTR_ALT, r#"(?i)alt\s*=\s*["']([^"']*)["']"#);
regex!(RE_ATTR_WIDTH, r#"(?i)width\s*=\s*["']?([0-9]+)["']?"#);
regex!(RE_ATTR_HEIGHT, r#"(?i)height\s*=\s*["']?([0-9]+)["']?"#);

// ============================================================================
// Public API
// ============================================================================

/// Convert an article body to AMP, resolving `/…` media against `origin`.
pub fn sanitize_with_origin(html: &str, origin: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let html = RE_SCRIPT.replace_all(html, "");
    let html = RE_STYLE.replace_all(&html, "").into_owned();
    let html = RE_EVENT_HANDLER.replace_all(&html, "").into_owned();
    let html = RE_IMG
        .replace_all(&html, |caps: &Captures| convert_img(&caps[1], origin))
        .into_owned();
    let html = RE_VIDEO
        .replace_all(&html, |caps: &Captures| convert_video(&caps[1], origin))
        .into_owned();
    let html = RE_YOUTUBE
        .replace_all(&html, |caps: &Captures| youtube_embed(&caps[1]))
        .into_owned();
    let html = strip_foreign_iframes(&html);
    let html = RE_DANGEROUS_ATTR.replace_all(&html, "").into_owned();
    RE_ANCHOR
        .replace_all(&html, |caps: &Captures| fix_external_link(caps))
        .into_owned()
}

/// Drop `<script>`/`<style>` blocks and inline `on*` handlers, leaving the
/// rest of the markup as authored. Regular (non-AMP) article pages use this.
pub fn strip_active_content(html: &str) -> String {
    let html = RE_SCRIPT.replace_all(html, "");
    let html = RE_STYLE.replace_all(&html, "");
    RE_EVENT_HANDLER.replace_all(&html, "").into_owned()
}

// ============================================================================
// Steps
// ============================================================================

/// Value of the first attribute matching `re` inside an open tag's attribute text.
fn attr<'a>(re: &Regex, attrs: &'a str) -> Option<&'a str> {
    re.captures(attrs)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Prefix root-relative paths with the origin. Plain concatenation.
fn absolute(src: &str, origin: &str) -> String {
    if src.starts_with('/') {
        format!("{origin}{src}")
    } else {
        src.to_owned()
    }
}

fn convert_img(attrs: &str, origin: &str) -> String {
    let Some(src) = attr(&RE_ATTR_SRC, attrs) else {
        return String::new();
    };
    let alt = attr(&RE_ATTR_ALT, attrs).unwrap_or("");
    let width = attr(&RE_ATTR_WIDTH, attrs).unwrap_or(IMG_DEFAULT_WIDTH);
    let height = attr(&RE_ATTR_HEIGHT, attrs).unwrap_or(IMG_DEFAULT_HEIGHT);
    let src = absolute(src, origin);

    format!(
        r#"<amp-img src="{src}" width="{width}" height="{height}" layout="responsive" alt="{alt}" class="inline-image"></amp-img>"#
    )
}

fn convert_video(attrs: &str, origin: &str) -> String {
    let Some(src) = attr(&RE_ATTR_SRC, attrs) else {
        return String::new();
    };
    let width = attr(&RE_ATTR_WIDTH, attrs).unwrap_or(VIDEO_DEFAULT_WIDTH);
    let height = attr(&RE_ATTR_HEIGHT, attrs).unwrap_or(VIDEO_DEFAULT_HEIGHT);
    let src = absolute(src, origin);

    format!(
        r#"<amp-video src="{src}" width="{width}" height="{height}" layout="responsive" controls></amp-video>"#
    )
}

fn youtube_embed(video_id: &str) -> String {
    format!(
        r#"<amp-youtube data-videoid="{video_id}" layout="responsive" width="480" height="270"></amp-youtube>"#
    )
}

/// Remove `<iframe …>…</iframe>` blocks whose open tag does not mention `amp-`.
///
/// An iframe whose open tag does mention `amp-` is skipped and matching
/// resumes one byte later, so an iframe nested after it can still be removed.
fn strip_foreign_iframes(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(caps) = RE_IFRAME.captures_at(html, search) {
        let Some(whole) = caps.get(0) else { break };
        if caps[1].to_ascii_lowercase().contains("amp-") {
            // `<` is one byte, so this stays on a char boundary
            search = whole.start() + 1;
            continue;
        }
        out.push_str(&html[copied..whole.start()]);
        copied = whole.end();
        search = whole.end();
    }

    out.push_str(&html[copied..]);
    out
}

/// Anchors opening a new tab get `rel="noopener nofollow"` unless they carry
/// any `rel=` already, whatever its value.
fn fix_external_link(caps: &Captures) -> String {
    let attrs = &caps[1];
    let opens_new_tab = attrs.contains(r#"target="_blank""#) || attrs.contains("target='_blank'");
    if opens_new_tab && !attrs.contains("rel=") {
        format!(r#"<a{attrs} rel="noopener nofollow">"#)
    } else {
        caps[0].to_owned()
    }
}

// ============================================================================
// Tests
// ============================================================================
