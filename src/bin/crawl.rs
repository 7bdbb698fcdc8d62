//! Command-line front end for the crawl engine.
//!
//! Reads an account definition from a JSON file, runs a full crawl and
//! prints the resulting report as JSON on stdout. Watermark updates and
//! cookie persistence stay with whatever invokes this binary.

use anyhow::Context;
use clap::Parser;
use feedlead::{Account, CrawlConfig, Crawler};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crawl", version, about = "Crawl an account's group feeds for new leads")]
struct Args {
    /// Path to the account JSON file (username, password, cookies, groups)
    account: PathBuf,

    /// Entry page of the platform, used for session restore
    #[arg(long)]
    portal_url: String,

    /// Distinct leads to accumulate per group before stopping
    #[arg(long, default_value_t = 8)]
    min_posts: usize,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Disable the Chrome sandbox (needed when running as root in a container)
    #[arg(long)]
    no_sandbox: bool,

    /// Pretty-print the report JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.account)
        .with_context(|| format!("reading account file {}", args.account.display()))?;
    let account: Account = serde_json::from_str(&raw).context("parsing account JSON")?;

    let mut config = CrawlConfig::new(args.portal_url.as_str());
    config.min_posts = args.min_posts;
    config.browser.headless = !args.headed;
    config.browser.sandbox = !args.no_sandbox;

    log::info!(
        "crawling {} group(s) for {}",
        account.groups.len(),
        account.username
    );

    let mut crawler = Crawler::new(config);
    let report = crawler.crawl(&account).context("crawl failed")?;

    for group in &report.partial_groups {
        log::warn!("partial result for {}", group);
    }
    for (group, reason) in &report.failed_groups {
        log::error!("no result for {}: {}", group, reason);
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    Ok(())
}
