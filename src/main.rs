//! CAVOTA - presentation service for a bilingual CMS-driven site.

mod amp;
mod cache;
mod cli;
mod config;
mod content;
mod locale;
mod revalidate;
mod rfp;
mod sections;
mod serve;
mod sitemap;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use content::source_from_config;
use serve::{App, serve_site};
use std::{
    fs,
    io::{self, Read},
    path::Path,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => {
            let source = source_from_config(&config)?;
            serve_site(App::new(config, source))
        }
        Commands::Amp {
            file,
            components,
            origin,
        } => {
            let origin = origin.as_deref().unwrap_or(&config.site.url);
            convert_to_amp(file.as_deref(), *components, origin)
        }
        Commands::Sitemap { output } => {
            let source = source_from_config(&config)?;
            sitemap::write_sitemap(source.as_ref(), &config, output.as_deref())
        }
    }
}

/// `cavota amp`: sanitize a fragment and print it, optionally followed by the
/// extension scripts it needs.
fn convert_to_amp(file: Option<&Path>, components: bool, origin: &str) -> Result<()> {
    let html = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let amp = amp::sanitize_with_origin(&html, origin);
    println!("{amp}");
    if components {
        for script in amp::required_components(&amp) {
            println!("{script}");
        }
    }
    Ok(())
}
