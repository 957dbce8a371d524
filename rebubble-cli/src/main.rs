//! rebubble CLI
//!
//! Loads a JSON document fixture, dispatches a synthetic click at an element
//! and prints which node a delegated listener would receive.
//!
//! ```text
//! rebubble --fixture fixtures/blog.json --selector "#content div.blog-title" --target title
//! ```
//!
//! Exit status: 0 on a match, 1 when nothing matched, 2 on error.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use rebubble::{ClassMatching, Matcher, MatcherOptions};
use rebubble_dom::{DomTree, Event, NodeId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rebubble", version, about = "Find the delegated target of a click")]
struct Cli {
    /// JSON fixture describing the document
    #[arg(long)]
    fixture: PathBuf,

    /// Delegation selector, e.g. "#content div.blog-title"
    #[arg(long, default_value = "")]
    selector: String,

    /// id of the element the click lands on
    #[arg(long)]
    target: String,

    /// id of the element the listener sits on [default: the document element]
    #[arg(long)]
    boundary: Option<String>,

    /// Match `.class` against whole class tokens instead of substrings
    #[arg(long)]
    token_classes: bool,

    /// Print the document tree before matching
    #[arg(long)]
    tree: bool,
}

impl Cli {
    fn matcher(&self) -> Matcher {
        let class_matching = if self.token_classes {
            ClassMatching::Token
        } else {
            ClassMatching::Substring
        };
        Matcher::with_options(MatcherOptions { class_matching })
    }

    /// Build the click event: target by id, current target from `--boundary`.
    fn event(&self, tree: &DomTree) -> Result<Event> {
        let target = lookup(tree, &self.target)?;
        let listener = match &self.boundary {
            Some(id) => lookup(tree, id)?,
            None => tree
                .document_element()
                .context("fixture has no document element")?,
        };
        Ok(Event::new(target).at(listener))
    }

    /// Run the delegation; `Ok(None)` means no match.
    fn resolve(&self, tree: &DomTree) -> Result<Option<NodeId>> {
        let event = self.event(tree)?;
        let hit = self
            .matcher()
            .handy(tree, &self.selector, None, &event)
            .with_context(|| format!("matching selector {:?}", self.selector))?;
        Ok(hit)
    }
}

fn lookup(tree: &DomTree, id: &str) -> Result<NodeId> {
    tree.get_element_by_id(id)
        .with_context(|| format!("no element with id {id:?} in fixture"))
}

fn run(cli: &Cli) -> Result<bool> {
    let json = fs::read_to_string(&cli.fixture)
        .with_context(|| format!("reading {}", cli.fixture.display()))?;
    let tree = DomTree::from_json(&json)
        .with_context(|| format!("loading {}", cli.fixture.display()))?;
    tracing::debug!(nodes = tree.len(), "fixture loaded");

    if cli.tree {
        println!("{}", "=== DOM Tree ===".bold());
        tree.print_tree(tree.root());
        println!();
    }

    match cli.resolve(&tree)? {
        Some(node) => {
            println!("{} {} ({node})", "match:".green().bold(), tree.describe(node));
            Ok(true)
        }
        None => {
            println!("{}", "no match".yellow());
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}
