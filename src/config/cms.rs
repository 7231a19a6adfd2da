//! `[cms]` and `[revalidate]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[cms]` section in cavota.toml - where content comes from.
///
/// # Example
/// ```toml
/// [cms]
/// url = "http://localhost:1337"
/// token = "..."            # or STRAPI_TOKEN
/// fixtures = "fixtures"    # serve local JSON instead of the CMS
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CmsSection {
    /// Base URL of the CMS, without the `/api` suffix.
    #[serde(default = "defaults::cms::url")]
    #[educe(Default = defaults::cms::url())]
    pub url: String,

    /// Bearer token sent with every CMS request.
    #[serde(default = "defaults::cms::token")]
    #[educe(Default = defaults::cms::token())]
    pub token: Option<String>,

    /// Directory of `<collection>.json` fixtures. Takes precedence over `url`.
    #[serde(default = "defaults::cms::fixtures")]
    #[educe(Default = defaults::cms::fixtures())]
    pub fixtures: Option<PathBuf>,
}

/// `[revalidate]` section in cavota.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevalidateSection {
    /// Shared secret for `/next-api/revalidate`. Unset disables the endpoint.
    #[serde(default)]
    pub secret: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_cms_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.cms.url, "http://localhost:1337");
        assert!(config.cms.token.is_none());
        assert!(config.cms.fixtures.is_none());
        assert!(config.revalidate.secret.is_none());
    }

    #[test]
    fn test_cms_config_full() {
        let config = r#"
            [cms]
            url = "https://cms.cavota.id"
            token = "abc"
            fixtures = "fixtures"

            [revalidate]
            secret = "s3cret"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.cms.url, "https://cms.cavota.id");
        assert_eq!(config.cms.token.as_deref(), Some("abc"));
        assert_eq!(config.cms.fixtures, Some(PathBuf::from("fixtures")));
        assert_eq!(config.revalidate.secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [cms]
            populate = "*"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
