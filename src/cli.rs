// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{ArgAction, Parser, ValueEnum};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "fanout-crawler",
    version,
    about = "Crawl a link graph concurrently, visiting every page once",
    long_about = "fanout-crawler starts at one URL, fetches every page reachable from it \
                  exactly once (one task per page), and prints a line per page as it is found."
)]
pub struct Cli {
    /// URL to start crawling from
    #[arg(default_value = "https://golang.org/")]
    pub start_url: String,

    /// Where pages come from
    #[arg(long, value_enum, default_value_t = Source::Fixture)]
    pub source: Source,

    /// Output one JSON object per event instead of text lines
    #[arg(long)]
    pub json: bool,

    /// Maximum number of fetches running at once (default: unlimited)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_in_flight: Option<u64>,

    /// Buffer size of each task's event channel
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    pub channel_capacity: u64,

    /// Per-request timeout in seconds (http source only)
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Only follow links on the start URL's host (http source only)
    #[arg(long)]
    pub same_host: bool,

    /// Stop the crawl after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Exit with code 1 if any page failed to fetch
    #[arg(long)]
    pub strict: bool,

    /// More logging on stderr (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

// Page sources the CLI knows about
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// Built-in golang.org fixture, no network access
    Fixture,
    /// Real HTTP requests
    Http,
}
