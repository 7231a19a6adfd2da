//! AMP extension scripts a converted body needs.

/// Extensions detected by their opening tag, in emission order.
const EXTENSIONS: [&str; 4] = ["amp-img", "amp-video", "amp-youtube", "amp-accordion"];

/// Script tags for every extension used in `html`.
///
/// `amp-img` is always included; the others only when `<amp-…` appears.
pub fn required_components(html: &str) -> Vec<String> {
    EXTENSIONS
        .iter()
        .enumerate()
        .filter(|(i, name)| *i == 0 || html.contains(&format!("<{name}")))
        .map(|(_, name)| script_tag(name))
        .collect()
}

/// `<script async custom-element=…>` for one extension at version 0.1.
pub fn script_tag(name: &str) -> String {
    format!(
        r#"<script async custom-element="{name}" src="https://cdn.ampproject.org/v0/{name}-0.1.js"></script>"#
    )
}
