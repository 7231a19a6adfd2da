//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CAVOTA presentation service CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root; relative paths in the config resolve against it
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: cavota.toml)
    #[arg(short = 'C', long, default_value = "cavota.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve AMP articles, section pages, sitemap and webhooks
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// Read content from a directory of JSON fixtures instead of the CMS
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Convert an HTML fragment to AMP and print it
    Amp {
        /// HTML file to convert (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Also print the AMP component scripts the fragment needs
        #[arg(long)]
        components: bool,

        /// Origin used for root-relative media (default: [site.url])
        #[arg(long)]
        origin: Option<String>,
    },

    /// Fetch all content and write sitemap.xml
    Sitemap {
        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_amp(&self) -> bool {
        matches!(self.command, Commands::Amp { .. })
    }
    pub const fn is_sitemap(&self) -> bool {
        matches!(self.command, Commands::Sitemap { .. })
    }
}
