//! Shared helpers: logging, escaping, dates, minification, query strings.

pub mod date;
pub mod html;
pub mod log;
pub mod minify;
pub mod query;
