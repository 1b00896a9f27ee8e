//! folio - static portfolio site generator
//!
//! A CLI tool that renders a portfolio JSON document to static HTML and
//! reports visit and download events.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use folio::beacon::{Beacon, EventKind, HttpTransport, SessionContext, VisitContext};
use folio::compose::{compose_sections, ComposeMode, SectionKind};
use folio::html_exporter::{self, ExportOptions, PUBLICATIONS_PAGE};
use folio::loader::{self, load_configuration, Source, DATA_URL_ENV};
use folio::markup;
use folio::site_config::{SiteConfig, CONFIG_FILE_NAME};
use std::io::Read;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = "public";
const DEFAULT_SESSION_FILE: &str = ".folio-session.toml";

/// Main entry point for the folio CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { path, force } => {
            handle_init_command(path, force)?;
        }

        Commands::Build {
            data,
            output,
            mode,
            embed_images,
        } => {
            let config = load_site_config(cli.config.as_deref())?;
            handle_build_command(&config, data, output, mode, embed_images, cli.verbose)?;
        }

        Commands::Sections { data, mode, json } => {
            let config = load_site_config(cli.config.as_deref())?;
            handle_sections_command(&config, data, mode, json)?;
        }

        Commands::Markup { text, html } => {
            handle_markup_command(text, html)?;
        }

        Commands::Track {
            event,
            data,
            source,
            referrer,
            user_agent,
            session,
        } => {
            let config = load_site_config(cli.config.as_deref())?;
            let ctx = VisitContext {
                source_param: source,
                referrer,
                user_agent,
            };
            handle_track_command(&config, event, data, ctx, session)?;
        }
    }

    Ok(())
}

/// Initialize logging; `RUST_LOG` wins over the defaults
fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or(if verbose { "info" } else { "warn" });
    env_logger::Builder::from_env(env).init();
}

/// Load folio.toml from `path`, or from the working directory when it exists
fn load_site_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load site configuration {}", path.display())),
        None => SiteConfig::load_or_default(".")
            .with_context(|| format!("Failed to load {}", CONFIG_FILE_NAME)),
    }
}

/// Resolve the document source from the CLI, the environment, then folio.toml
fn resolve_source(data: Option<String>, config: &SiteConfig) -> Result<Source> {
    let env = std::env::var(DATA_URL_ENV).ok();
    match loader::select_source(data.as_deref(), env.as_deref(), config.data_source.as_deref()) {
        Some(source) => Ok(source),
        None => bail!(
            "No portfolio data source: pass --data, set {}, or set data_source in {}",
            DATA_URL_ENV,
            CONFIG_FILE_NAME
        ),
    }
}

/// Handle the init command
fn handle_init_command(path: Option<PathBuf>, force: bool) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from("."));
    let config_path = target_path.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it",
            config_path.display()
        );
    }

    // Create the target directory if it doesn't exist
    if !target_path.exists() {
        std::fs::create_dir_all(&target_path)
            .with_context(|| format!("Failed to create directory {}", target_path.display()))?;
    }

    SiteConfig::starter()
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("✓ Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Point data_source in {} at your portfolio JSON", CONFIG_FILE_NAME);
    println!("  2. Run 'folio sections' to check which sections will render");
    println!("  3. Run 'folio build' to generate the site");

    Ok(())
}

/// Handle the build command
fn handle_build_command(
    config: &SiteConfig,
    data: Option<String>,
    output: Option<PathBuf>,
    mode: Option<ComposeMode>,
    embed_images: bool,
    verbose: bool,
) -> Result<()> {
    let source = resolve_source(data, config)?;
    let output_dir = output
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let mode = mode.or(config.mode).unwrap_or_default();
    let index_path = output_dir.join("index.html");

    println!("Building portfolio...");
    println!("Source: {}", source);
    println!("Output: {}", output_dir.display());

    // Stage 1: Load the document
    println!("\n[Stage 1/3] Loading portfolio data...");
    let doc = match load_configuration(&source) {
        Ok(doc) => doc,
        Err(e) => {
            html_exporter::to_failure_html(&index_path).with_context(|| {
                format!("Failed to write failure page to {}", index_path.display())
            })?;
            return Err(e).with_context(|| format!("Failed to load portfolio data from {}", source));
        }
    };
    println!("✓ Loaded {}", source);

    // Stage 2: Compose sections
    println!("\n[Stage 2/3] Composing sections...");
    let sections = compose_sections(&doc, mode).context("Failed to compose sections")?;
    println!("✓ Composed {} sections", sections.len());
    if verbose {
        for section in &sections {
            println!("  - {}", section.id);
        }
    }

    // Stage 3: Render
    println!("\n[Stage 3/3] Rendering HTML...");
    let mut options = ExportOptions::new(mode);
    options.embed_images = embed_images || config.embed_images;
    if let Source::Path(path) = &source {
        if let Some(parent) = path.parent() {
            options.asset_root = parent.to_path_buf();
        }
    }

    html_exporter::to_html(&doc, &sections, &options, &index_path)
        .with_context(|| format!("Failed to export HTML to {}", index_path.display()))?;
    println!("✓ Successfully wrote: {}", index_path.display());

    let publications_path = output_dir.join(PUBLICATIONS_PAGE);
    let written = html_exporter::to_publications_html(&doc, &options, &publications_path)
        .with_context(|| format!("Failed to export HTML to {}", publications_path.display()))?;
    if written {
        println!("✓ Successfully wrote: {}", publications_path.display());
    }

    println!("\n✓ Build completed successfully!");
    Ok(())
}

/// Handle the sections command
fn handle_sections_command(
    config: &SiteConfig,
    data: Option<String>,
    mode: Option<ComposeMode>,
    json: bool,
) -> Result<()> {
    let source = resolve_source(data, config)?;
    let mode = mode.or(config.mode).unwrap_or_default();
    let doc = load_configuration(&source)
        .with_context(|| format!("Failed to load portfolio data from {}", source))?;
    let sections = compose_sections(&doc, mode).context("Failed to compose sections")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    println!("{:<4} {:<24} {:<8} KIND", "#", "ID", "INDEX");
    for (position, section) in sections.iter().enumerate() {
        let index = if section.is_indexed() {
            section.resolved_index.to_string()
        } else {
            "-".to_string()
        };
        let kind = match section.kind {
            SectionKind::Fixed(_) => "fixed",
            SectionKind::Custom(_) => "custom",
        };
        println!("{:<4} {:<24} {:<8} {}", position + 1, section.id, index, kind);
    }
    Ok(())
}

/// Handle the markup command
fn handle_markup_command(text: Option<String>, html: bool) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read standard input")?;
            buffer
        }
    };

    let nodes = markup::parse(&text);
    if html {
        println!("{}", markup::to_html(&nodes));
    } else {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    }
    Ok(())
}

/// Handle the track command
fn handle_track_command(
    config: &SiteConfig,
    event: EventKind,
    data: Option<String>,
    ctx: VisitContext,
    session: Option<PathBuf>,
) -> Result<()> {
    let source = resolve_source(data, config)?;
    let doc = load_configuration(&source)
        .with_context(|| format!("Failed to load portfolio data from {}", source))?;

    let Some(tracking) = doc.tracking() else {
        println!("No tracking configuration; nothing recorded");
        return Ok(());
    };

    let session_path = session
        .or_else(|| config.session_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let mut session = SessionContext::load(&session_path)
        .with_context(|| format!("Failed to load session {}", session_path.display()))?;

    let beacon = Beacon::new(&tracking, HttpTransport);
    let outcome = beacon.record_event(event, &ctx, &mut session);

    session
        .save(&session_path)
        .with_context(|| format!("Failed to save session {}", session_path.display()))?;

    println!("{}: {:?}", event, outcome);
    Ok(())
}
