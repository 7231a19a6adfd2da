//! Markdown and placeholder handling for editor-authored section text.

use crate::amp::strip_active_content;
use pulldown_cmark::{Event, Options, Parser, html};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("static pattern compiles"));

/// Render Markdown to HTML.
///
/// Raw HTML in the source is emitted as escaped text: section copy comes from
/// the CMS admin and is never trusted as markup.
pub fn markdown_to_html(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Render an article body.
///
/// Unlike section copy, article bodies keep the editor's inline HTML (minus
/// scripts and handlers), and single newlines become `<br>`.
pub fn article_to_html(source: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    strip_active_content(&out)
}

/// Replace `{{a.b.c}}` with the value at that path in `data`.
///
/// Placeholders that resolve to nothing (or `null`) are left verbatim, and
/// without `data` the template is returned unchanged.
pub fn process_template(template: &str, data: Option<&Value>) -> String {
    let Some(data) = data else {
        return template.to_owned();
    };
    RE_PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let path = caps[1].trim();
            match path.split('.').try_fold(data, |value, key| value.get(key)) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => caps[0].to_owned(),
                Some(other) => other.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_markdown_basics() {
        let html = markdown_to_html("# Title\n\nSome **bold** text.\n\n- a\n- b\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<li>a</li>"));
    }

    #[test]
    fn test_markdown_escapes_raw_html() {
        let html = markdown_to_html("Hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_article_keeps_inline_html() {
        let html = article_to_html(
            "## Langkah\n\nBaris satu\nbaris dua <em>penting</em>\n\n<script>x()</script>",
        );
        assert!(html.contains("<h2>Langkah</h2>"));
        assert!(html.contains("Baris satu<br />\nbaris dua <em>penting</em>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_template_resolves_paths() {
        let data = json!({
            "site_settings": {"contact_email": "hello@cavota.id", "founded": 2019},
            "global_strings": {"cta": {"label": "Talk"}},
        });
        let out = process_template(
            "Mail {{ site_settings.contact_email }} since {{site_settings.founded}}: {{global_strings.cta.label}}",
            Some(&data),
        );
        assert_eq!(out, "Mail hello@cavota.id since 2019: Talk");
    }

    #[test]
    fn test_template_unresolved_left_verbatim() {
        let data = json!({"site_settings": {"phone": null}});
        let out = process_template("{{site_settings.phone}} / {{nope.x}}", Some(&data));
        assert_eq!(out, "{{site_settings.phone}} / {{nope.x}}");
    }

    #[test]
    fn test_template_without_data() {
        assert_eq!(process_template("{{site_settings.x}}", None), "{{site_settings.x}}");
    }
}
