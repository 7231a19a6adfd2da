//! Site configuration management for `cavota.toml`.
//!
//! # Sections
//!
//! | Section        | Purpose                                         |
//! |----------------|-------------------------------------------------|
//! | `[site]`       | Brand name, canonical origin, logo              |
//! | `[cms]`        | CMS base URL, token, or local fixtures          |
//! | `[serve]`      | HTTP server (interface, port, minify, cache)    |
//! | `[revalidate]` | Shared secret for cache revalidation            |
//!
//! Environment variables override the file (`STRAPI_URL`, `STRAPI_TOKEN`,
//! `REVALIDATE_SECRET`, `NEXT_PUBLIC_SITE_URL`); CLI flags override both.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://cavota.id"
//!
//! [cms]
//! url = "http://localhost:1337"
//!
//! [serve]
//! port = 3000
//! ```

mod cms;
pub mod defaults;
mod error;
mod serve;
mod site;

pub use cms::{CmsSection, RevalidateSection};
pub use error::ConfigError;
pub use serve::ServeConfig;
pub use site::SiteSection;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing cavota.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Public site identity
    #[serde(default)]
    pub site: SiteSection,

    /// Content source
    #[serde(default)]
    pub cms: CmsSection,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Revalidation settings
    #[serde(default)]
    pub revalidate: RevalidateSection,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Load from the CLI's root/config pair, then layer env and CLI overrides.
    ///
    /// A missing config file is not an error: every field has a default.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.update_with_env(|key| std::env::var(key).ok());
        config.update_with_cli(cli, root);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` so tests can inject them.
    pub fn update_with_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("STRAPI_URL") {
            self.cms.url = url;
        }
        if let Some(token) = lookup("STRAPI_TOKEN") {
            self.cms.token = Some(token);
        }
        if let Some(secret) = lookup("REVALIDATE_SECRET") {
            self.revalidate.secret = Some(secret);
        }
        if let Some(url) = lookup("NEXT_PUBLIC_SITE_URL") {
            self.site.url = url;
        }
        self.site.url = self.site.url.trim_end_matches('/').to_owned();
        self.cms.url = self.cms.url.trim_end_matches('/').to_owned();
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli, root: &Path) {
        if let Commands::Serve {
            interface,
            port,
            fixtures,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            if let Some(dir) = fixtures {
                self.cms.fixtures = Some(dir.clone());
            }
        }

        if let Some(dir) = self.cms.fixtures.take() {
            self.cms.fixtures = Some(if dir.is_relative() {
                root.join(dir)
            } else {
                dir
            });
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration after all overrides are applied
    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.site.url) {
            bail!(ConfigError::Validation(
                "[site.url] must start with http:// or https://".into()
            ));
        }

        if !is_http_url(&self.cms.url) {
            bail!(ConfigError::Validation(
                "[cms.url] must start with http:// or https://".into()
            ));
        }

        if let Some(dir) = &self.cms.fixtures
            && !dir.is_dir()
        {
            bail!(ConfigError::Validation(format!(
                "[cms.fixtures] `{}` is not a directory",
                dir.display()
            )));
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// ============================================================================
// Tests
// ============================================================================
