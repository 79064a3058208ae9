/// Catalog assembly across the configured year range
use super::{Catalog, CrawlSettings, SkipReason, SkippedEntry, YearOutcome, YearScanner};
use crate::listing::DirectoryFetcher;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};
use tracing::info;

/// Summary of one year in a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearReport {
    pub year: i32,
    pub items: usize,
    /// Set when the year listing itself could not be read
    pub skipped: Option<SkipReason>,
    pub skipped_entries: Vec<SkippedEntry>,
}

/// What happened during one build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub years: Vec<YearReport>,
}

impl BuildReport {
    pub fn years_scanned(&self) -> usize {
        self.years.iter().filter(|y| y.skipped.is_none()).count()
    }

    pub fn years_skipped(&self) -> usize {
        self.years.iter().filter(|y| y.skipped.is_some()).count()
    }

    pub fn total_items(&self) -> usize {
        self.years.iter().map(|y| y.items).sum()
    }

    pub fn entries_skipped(&self) -> usize {
        self.years.iter().map(|y| y.skipped_entries.len()).sum()
    }

    pub fn year(&self, year: i32) -> Option<&YearReport> {
        self.years.iter().find(|y| y.year == year)
    }
}

/// Builds a catalog by scanning every configured year
pub struct CatalogBuilder<F: DirectoryFetcher> {
    fetcher: F,
    settings: CrawlSettings,
    max_concurrent_years: usize,
}

impl<F: DirectoryFetcher> CatalogBuilder<F> {
    pub fn new(fetcher: F, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            settings,
            max_concurrent_years: 1,
        }
    }

    /// Scan up to `workers` year folders at the same time
    pub fn with_concurrency(mut self, workers: usize) -> Self {
        self.max_concurrent_years = workers.max(1);
        self
    }

    pub async fn build(&self) -> Catalog {
        self.build_with_report().await.0
    }

    /// Scan every year, newest first, and collect one bucket per year.
    ///
    /// Scans may overlap but buckets are always emitted in descending year
    /// order, one per year, including empty ones.
    pub async fn build_with_report(&self) -> (Catalog, BuildReport) {
        let started_at = Utc::now();
        let start_time = Instant::now();
        let scanner = &YearScanner::new(&self.fetcher, &self.settings);

        info!(
            "🚀 Building catalog from {} ({} down to {}, {} concurrent)",
            self.settings.root_url,
            self.settings.years.newest,
            self.settings.years.oldest,
            self.max_concurrent_years
        );

        let outcomes: Vec<YearOutcome> = stream::iter(self.settings.years.iter())
            .map(move |year| scanner.scan_year(year))
            .buffered(self.max_concurrent_years)
            .collect()
            .await;

        let mut catalog = Catalog::default();
        let mut years = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            let (bucket, report) = match outcome {
                YearOutcome::Scanned { bucket, skipped } => {
                    let report = YearReport {
                        year: bucket.year,
                        items: bucket.items.len(),
                        skipped: None,
                        skipped_entries: skipped,
                    };
                    (bucket, report)
                }
                YearOutcome::Skipped { bucket, reason } => {
                    let report = YearReport {
                        year: bucket.year,
                        items: 0,
                        skipped: Some(reason),
                        skipped_entries: Vec::new(),
                    };
                    (bucket, report)
                }
            };
            catalog.buckets.push(bucket);
            years.push(report);
        }

        let report = BuildReport {
            started_at,
            duration: start_time.elapsed(),
            years,
        };

        info!(
            "🎉 Catalog built in {:.2}s: {} items, {} years scanned, {} years skipped",
            report.duration.as_secs_f64(),
            report.total_items(),
            report.years_scanned(),
            report.years_skipped()
        );

        (catalog, report)
    }
}
