//! Content source error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("request to `{url}` failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CMS returned {status} for `{url}`: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response shape from `{0}`")]
    Decode(String, #[source] serde_json::Error),

    #[error("IO error when reading fixture `{0}`")]
    Fixture(PathBuf, #[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_includes_body() {
        let err = CmsError::Status {
            url: "http://localhost:1337/api/insights".into(),
            status: 403,
            body: "Forbidden".into(),
        };
        let display = err.to_string();
        assert!(display.contains("403"));
        assert!(display.contains("/api/insights"));
        assert!(display.contains("Forbidden"));
    }

    #[test]
    fn test_decode_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CmsError::Decode("insights.json".into(), source);
        assert!(std::error::Error::source(&err).is_some());
    }
}
