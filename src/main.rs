#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
//! `riddlen-search` - Instant client-side search for the Riddlen documentation site.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_cargo::style::CLAP_STYLING;
use riddlen_search::builder::{build_documents, write_index};
use riddlen_search::dropdown::{Dropdown, Effect, Event};
use riddlen_search::render::{HtmlRenderer, Render, TerminalRenderer};
use riddlen_search::types::DEFAULT_INDEX_FILE;
use riddlen_search::{Error, Result, Scope, SearchIndex};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// CLI arguments for `riddlen-search`
#[derive(Parser, Debug)]
#[command(author, version, about, styles = CLAP_STYLING)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Build the document list from a Jekyll site source
    Build {
        /// Site source directory
        #[arg(default_value = ".")]
        dir:    PathBuf,
        /// Output file
        #[arg(short, long, default_value = DEFAULT_INDEX_FILE)]
        output: PathBuf,
    },
    /// Search the document list
    Search {
        /// Search query, used as typed
        query:  String,
        /// Document list to search
        #[arg(short, long, default_value = DEFAULT_INDEX_FILE)]
        index:  PathBuf,
        /// Only search pages whose url matches this glob, e.g. '/docs/**'
        #[arg(short, long)]
        within: Option<String>,
        /// Print the dropdown markup instead of plain text
        #[arg(long)]
        html:   bool,
    },
}

/// Log to stderr, filtered by `RUST_LOG`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

/// Build the document list for a site source
fn build_index(dir: &Path, output: &Path) -> Result<()> {
    println!("Building search index from: {}", dir.display());

    let documents = build_documents(dir)?;
    if documents.is_empty() {
        println!("No pages were found. Make sure the directory is a Jekyll site source.");
        return Ok(());
    }

    write_index(&documents, output)?;
    println!("- Pages indexed: {}", documents.len());
    println!("- Index saved to {}", output.display());
    Ok(())
}

/// Run one query the way the dropdown would and print what it shows
fn search(query: &str, index_path: &Path, within: Option<&str>, html: bool) -> Result<()> {
    if !index_path.exists() {
        return Err(Error::index(&format!(
            "No index found at {}. Run 'riddlen-search build' first.",
            index_path.display()
        )));
    }

    let index = SearchIndex::load_or_inert(index_path);

    let outcome = if let Some(pattern) = within {
        index.query_within(query, &Scope::new(pattern)?)
    } else {
        let mut dropdown = Dropdown::new(&index);
        let effects = dropdown.handle(&Event::Input(query.to_owned()));
        if !effects.contains(&Effect::Show) {
            return Ok(());
        }
        dropdown.outcome().clone()
    };

    let rendered = if html {
        HtmlRenderer.render(&outcome)
    } else {
        TerminalRenderer { color: std::io::stdout().is_terminal() }.render(&outcome)
    };
    if rendered.is_empty() {
        return Ok(());
    }
    if html {
        println!("{rendered}");
    } else {
        print!("{rendered}");
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Build { dir, output } => {
            if dir.is_dir() {
                build_index(&dir, &output)
            } else {
                Err(Error::index(&format!("Not a directory: {}", dir.display())))
            }
        },
        Command::Search { query, index, within, html } => {
            search(&query, &index, within.as_deref(), html)
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
