//! Brand stylesheet inlined into `<style amp-custom>`.

/// AMP caps custom CSS at 75 KB per document.
pub const AMP_CSS_LIMIT: usize = 75_000;

const STYLE: &str = include_str!("../embed/amp/style.css");

/// Mandatory AMP boilerplate: hides the body until the runtime has laid out
/// the page, with a `<noscript>` escape hatch.
pub const AMP_BOILERPLATE: &str = concat!(
    "<style amp-boilerplate>",
    "body{-webkit-animation:-amp-start 8s steps(1,end) 0s 1 normal both;",
    "-moz-animation:-amp-start 8s steps(1,end) 0s 1 normal both;",
    "-ms-animation:-amp-start 8s steps(1,end) 0s 1 normal both;",
    "animation:-amp-start 8s steps(1,end) 0s 1 normal both}",
    "@-webkit-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}",
    "@-moz-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}",
    "@-ms-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}",
    "@-o-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}",
    "@keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}",
    "</style>",
    "<noscript><style amp-boilerplate>",
    "body{-webkit-animation:none;-moz-animation:none;-ms-animation:none;animation:none}",
    "</style></noscript>",
);

pub fn amp_css() -> &'static str {
    STYLE.trim()
}
