//! Larch CLI
//!
//! Loads a JSON parse fixture into a document and runs selector queries
//! against it.

mod fixture;
mod print;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use larch_dom::{Document, NodeId};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use fixture::JsonFixtureParser;
use print::{QueryReport, label, print_matches, print_tree};

/// Query a parsed HTML document with CSS selectors
#[derive(Parser, Debug)]
#[command(name = "larch")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r"EXAMPLES:
    # Print the DOM tree of a fixture
    larch page.json --tree

    # Run selectors
    larch page.json -s 'ul.nav > li' -s '#main p:first-child'

    # Check one element against a selector
    larch page.json --id greeting --matches 'div > p[lang|=en]'

    # Machine-readable output, reading the fixture from stdin
    larch - -s a --json
")]
struct Cli {
    /// JSON fixture holding a parsed document, or `-` for stdin
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Selector to run against the document (repeatable)
    #[arg(short, long = "select", value_name = "SELECTOR")]
    selectors: Vec<String>,

    /// Element id for --matches and --closest
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Test the --id element against a selector
    #[arg(short, long, value_name = "SELECTOR", requires = "id")]
    matches: Option<String>,

    /// Find the nearest inclusive ancestor of the --id element matching a selector
    #[arg(long, value_name = "SELECTOR", requires = "id")]
    closest: Option<String>,

    /// Print the DOM tree
    #[arg(short, long)]
    tree: bool,

    /// Print a structural summary of the document
    #[arg(long)]
    structure: bool,

    /// Print selector results as JSON
    #[arg(long)]
    json: bool,

    /// Print the document's error log
    #[arg(short, long)]
    errors: bool,

    /// Document URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let doc = load(&cli)?;

    if cli.tree {
        println!("=== DOM Tree ===");
        print_tree(doc.tree(), NodeId::ROOT, 0);
    }

    if cli.structure {
        println!("{}", doc.debug_structure());
    }

    if cli.json {
        let reports: Vec<QueryReport> = cli
            .selectors
            .iter()
            .map(|selector| {
                QueryReport::new(doc.tree(), selector, &doc.query_selector_all(selector))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for selector in &cli.selectors {
            print_matches(doc.tree(), selector, &doc.query_selector_all(selector));
        }
    }

    if let Some(id) = &cli.id {
        let element = doc
            .get_element_by_id(id)
            .with_context(|| format!("no element with id '{id}'"))?;
        if let Some(selector) = &cli.matches {
            let verdict = if doc.element_matches(element, selector) {
                "matches".green().to_string()
            } else {
                "does not match".red().to_string()
            };
            println!("#{id} {verdict} {}", selector.bold());
        }
        if let Some(selector) = &cli.closest {
            match doc.closest(element, selector) {
                Some(found) => println!("closest: [{}] {}", found.0, label(doc.tree(), found)),
                None => println!("closest: {}", "none".dimmed()),
            }
        }
    }

    if cli.errors {
        let errors = doc.get_errors();
        println!("\n=== Errors ({}) ===", errors.len());
        for error in &errors {
            println!("  - {}", error.red());
        }
    }

    Ok(())
}

/// Read the fixture and load it. A fixture that fails to parse still
/// yields a document (the error shell), so only I/O errors abort.
fn load(cli: &Cli) -> anyhow::Result<Document> {
    let source = if cli.path.as_os_str() == "-" {
        let mut buffer = String::new();
        let _ = io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read fixture from stdin")?;
        buffer
    } else {
        fs::read_to_string(&cli.path)
            .with_context(|| format!("failed to read {}", cli.path.display()))?
    };

    let mut doc = match &cli.url {
        Some(url) => Document::with_url(url),
        None => Document::new(),
    }
    .with_parser(JsonFixtureParser);

    if !doc.parse_html(&source) {
        tracing::warn!(path = %cli.path.display(), "fixture did not load cleanly");
    }
    Ok(doc)
}

/// Log to stderr. `-v` overrides `RUST_LOG`, which defaults to `warn`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
