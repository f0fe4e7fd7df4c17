// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so stdout only carries crawl output)
// 3. Build a fetcher and start the crawl
// 4. Print every event as it arrives
// 5. Exit with proper code (0 = done, 1 = fetch errors with --strict, 2 = error)
// =============================================================================

mod cli;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Source};
use fanout_crawler::fetch::host_of;
use fanout_crawler::{
    CrawlOptions, CrawlSession, Crawler, FixtureFetcher, HttpFetcher, HttpFetcherConfig,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins; otherwise -v / -vv pick the level
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let options = CrawlOptions {
        channel_capacity: usize::try_from(cli.channel_capacity)?,
        max_in_flight: cli.max_in_flight.map(usize::try_from).transpose()?,
    };

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());
    if let Some(secs) = cli.deadline_secs {
        cancel_after(cancel.clone(), Duration::from_secs(secs));
    }

    let session = match cli.source {
        Source::Fixture => Crawler::with_options(FixtureFetcher::golang(), options)
            .crawl_with_cancellation(cli.start_url.as_str(), cancel.clone()),
        Source::Http => {
            let host = host_of(&cli.start_url)
                .ok_or_else(|| anyhow!("Invalid URL '{}': no host", cli.start_url))?;
            let fetcher = HttpFetcher::new(HttpFetcherConfig {
                timeout: Duration::from_secs(cli.timeout_secs),
                same_host: cli.same_host.then_some(host),
                ..Default::default()
            })?;
            Crawler::with_options(fetcher, options)
                .crawl_with_cancellation(cli.start_url.as_str(), cancel.clone())
        }
    };

    let summary = print_events(session, cli.json).await?;

    info!(
        found = summary.found,
        errors = summary.errors,
        visited = summary.visited,
        cancelled = cancel.is_cancelled(),
        "crawl finished"
    );

    if cli.strict && summary.errors > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Counts gathered while printing
#[derive(Debug, Default)]
struct Summary {
    found: usize,
    errors: usize,
    visited: usize,
}

// Prints events until the crawl signals it is done
async fn print_events(mut session: CrawlSession, json: bool) -> Result<Summary> {
    let mut summary = Summary::default();

    while let Some(event) = session.next().await {
        if event.is_error() {
            summary.errors += 1;
        } else {
            summary.found += 1;
        }

        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", event);
        }
    }

    summary.visited = session.visited_count();
    Ok(summary)
}

fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

fn cancel_after(cancel: CancellationToken, deadline: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(deadline).await;
        cancel.cancel();
    });
}

