//! Responsive `<amp-img>` selection for CMS media.

use crate::content::{MediaFile, non_empty};
use crate::utils::html::escape_quotes;

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

/// Where an image sits in the article, which decides its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Cover,
    Inline,
}

impl ImageRole {
    pub const fn class(self) -> &'static str {
        match self {
            Self::Cover => "cover-image",
            Self::Inline => "inline-image",
        }
    }
}

/// Pick the rendition to display: `large`, then `medium`, then the original.
///
/// Returns `(url, width, height)`. Missing or zero original dimensions fall
/// back to 800×600.
pub fn select_rendition(media: &MediaFile) -> (&str, u32, u32) {
    let formats = media.formats.as_ref();
    let rendition = formats
        .and_then(|f| f.large.as_ref())
        .or_else(|| formats.and_then(|f| f.medium.as_ref()));

    match rendition {
        Some(r) => (r.url.as_str(), r.width, r.height),
        None => (
            media.url.as_str(),
            media.width.filter(|w| *w > 0).unwrap_or(DEFAULT_WIDTH),
            media.height.filter(|h| *h > 0).unwrap_or(DEFAULT_HEIGHT),
        ),
    }
}

/// First non-empty of alternative text, caption and file name.
pub fn alt_text(media: &MediaFile) -> &str {
    non_empty(media.alternative_text.as_deref())
        .or_else(|| non_empty(media.caption.as_deref()))
        .or_else(|| non_empty(Some(media.name.as_str())))
        .unwrap_or("Image")
}

/// Render `media` as a responsive `<amp-img>`, resolving `/…` URLs against `origin`.
pub fn to_amp_image(media: &MediaFile, role: ImageRole, origin: &str) -> String {
    let (url, width, height) = select_rendition(media);
    let src = if url.starts_with('/') {
        format!("{origin}{url}")
    } else {
        url.to_owned()
    };
    let alt = escape_quotes(alt_text(media));
    let class = role.class();

    format!(
        r#"<amp-img src="{src}" width="{width}" height="{height}" layout="responsive" alt="{alt}" class="{class}"></amp-img>"#
    )
}
