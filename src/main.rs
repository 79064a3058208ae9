use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

use listing_catalog::{
    write_catalog, CatalogBuilder, Config, CrawlSettings, ExportFormat, HttpDirectoryFetcher,
};

fn cli() -> Command {
    Command::new("Listing Catalog")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Build a media catalog document from HTTP directory listings")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("root-url")
                .short('r')
                .long("root-url")
                .value_name("URL")
                .help("Root URL holding the (YYYY) year folders"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output document path")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("fallback-image")
                .long("fallback-image")
                .value_name("URL")
                .help("Thumbnail used when a title has no artwork"),
        )
        .arg(
            Arg::new("from-year")
                .long("from-year")
                .value_name("YEAR")
                .help("Newest year to scan")
                .value_parser(value_parser!(i32)),
        )
        .arg(
            Arg::new("to-year")
                .long("to-year")
                .value_name("YEAR")
                .help("Oldest year to scan")
                .value_parser(value_parser!(i32)),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format: xml or json")
                .value_parser(value_parser!(ExportFormat)),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .value_name("NUM")
                .help("Year folders scanned in parallel")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-request timeout")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
}

/// `RUST_LOG` wins over the configured level
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("listing_catalog={},warn", level)))
}

/// Level in effect before any config file is read
fn startup_level(verbose: bool, env_level: Option<&str>) -> &str {
    if verbose {
        "debug"
    } else {
        env_level.unwrap_or("info")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    // Initialize logging before the config file is read so discovery is visible
    let verbose = matches.get_flag("verbose");
    let env_level = std::env::var("LISTING_CATALOG_LOG_LEVEL").ok();
    let initial_level = startup_level(verbose, env_level.as_deref());
    let (filter, filter_handle) = reload::Layer::new(log_filter(initial_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let mut config = Config::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    if let Some(root_url) = matches.get_one::<String>("root-url") {
        config.crawl.root_url = root_url.clone();
    }
    if let Some(output) = matches.get_one::<PathBuf>("output") {
        config.output.path = output.clone();
    }
    if let Some(fallback) = matches.get_one::<String>("fallback-image") {
        config.crawl.fallback_image = fallback.clone();
    }
    if let Some(year) = matches.get_one::<i32>("from-year") {
        config.crawl.first_year = *year;
    }
    if let Some(year) = matches.get_one::<i32>("to-year") {
        config.crawl.last_year = *year;
    }
    if let Some(format) = matches.get_one::<ExportFormat>("format") {
        config.output.format = *format;
    }
    if let Some(workers) = matches.get_one::<usize>("workers") {
        config.performance.max_concurrent_years = *workers;
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.http.timeout_seconds = *timeout;
    }

    // A level from the config file only applies when nothing more specific was given
    if !verbose && config.output.log_level != initial_level {
        filter_handle
            .reload(log_filter(&config.output.log_level))
            .context("Failed to apply configured log level")?;
    }

    config.validate()?;
    info!("🚀 Listing Catalog starting...");
    info!("{}", config.summary());

    let fetcher = HttpDirectoryFetcher::new(&config.http)?;
    let settings = CrawlSettings::from_config(&config)?;
    let builder = CatalogBuilder::new(fetcher, settings)
        .with_concurrency(config.performance.max_concurrent_years);

    let (catalog, report) = builder.build_with_report().await;

    for year in report.years.iter().filter(|y| y.skipped.is_some()) {
        if let Some(reason) = &year.skipped {
            info!("⏭️ {} skipped: {}", year.year, reason);
        }
    }
    if report.entries_skipped() > 0 {
        warn!("{} entries skipped across all years", report.entries_skipped());
    }

    write_catalog(&catalog, &config.output.path, config.output.format)
        .await
        .with_context(|| format!("Failed to write {}", config.output.path.display()))?;

    info!("✅ {} created!", config.output.path.display());
    info!("📊 Items: {}", catalog.item_count());
    info!("📅 Years with listings: {}/{}", report.years_scanned(), report.years.len());

    Ok(())
}
