//! Command-line interface definitions for folio

use clap::{Parser, Subcommand};
use folio::beacon::EventKind;
use folio::compose::ComposeMode;
use std::path::PathBuf;

/// CLI structure for the folio application
#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Static portfolio site generator", long_about = None)]
pub struct Cli {
    /// Site configuration file (defaults to ./folio.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for folio
#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter folio.toml
    Init {
        /// Directory to initialize (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite an existing folio.toml
        #[arg(short, long)]
        force: bool,
    },

    /// Render the portfolio to static HTML
    Build {
        /// Portfolio JSON document (URL or path)
        #[arg(short, long, value_name = "LOCATION")]
        data: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How malformed sections are handled
        #[arg(short, long, value_enum)]
        mode: Option<ComposeMode>,

        /// Inline local images as base64 data URLs
        #[arg(long)]
        embed_images: bool,
    },

    /// List the sections that would be rendered, in order
    Sections {
        /// Portfolio JSON document (URL or path)
        #[arg(short, long, value_name = "LOCATION")]
        data: Option<String>,

        /// How malformed sections are handled
        #[arg(short, long, value_enum)]
        mode: Option<ComposeMode>,

        /// Print the section descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse inline markup and print the result
    Markup {
        /// Text to parse (reads standard input when omitted)
        text: Option<String>,

        /// Print rendered HTML instead of the node tree
        #[arg(long)]
        html: bool,
    },

    /// Record an analytics event
    Track {
        /// Event to record
        #[arg(value_enum)]
        event: EventKind,

        /// Portfolio JSON document (URL or path)
        #[arg(short, long, value_name = "LOCATION")]
        data: Option<String>,

        /// Value of the visitor's source query parameter
        #[arg(long)]
        source: Option<String>,

        /// Referring page
        #[arg(long)]
        referrer: Option<String>,

        /// User agent reported with the event
        #[arg(long, default_value = concat!("folio/", env!("CARGO_PKG_VERSION")))]
        user_agent: String,

        /// Session state file
        #[arg(long)]
        session: Option<PathBuf>,
    },
}
