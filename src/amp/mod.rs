//! AMP rendering of insights.
//!
//! - [`sanitize`]: editor HTML → AMP-valid fragment
//! - [`image`]: CMS media → responsive `<amp-img>`
//! - [`components`]: extension scripts a fragment needs
//! - [`css`]: inlined brand stylesheet and boilerplate
//! - [`page`]: the full `<html ⚡>` document

pub mod components;
pub mod css;
pub mod image;
pub mod page;
pub mod sanitize;

pub use components::required_components;
pub use page::render_amp_page;
pub use sanitize::{DEFAULT_ORIGIN, sanitize_with_origin, strip_active_content};
