/// Per-year folder scanning
use super::{CrawlSettings, EntryResolver, Resolution, SkipReason, YearBucket};
use crate::listing::DirectoryFetcher;
use tracing::{debug, info, warn};

/// An entry of a year listing that produced no item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub link: String,
    pub display_text: String,
    pub reason: SkipReason,
}

/// Result of scanning one year folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearOutcome {
    /// The year listing was read; the bucket may still be empty
    Scanned {
        bucket: YearBucket,
        skipped: Vec<SkippedEntry>,
    },
    /// The year listing could not be read; the bucket is empty
    Skipped { bucket: YearBucket, reason: SkipReason },
}

impl YearOutcome {
    pub fn bucket(&self) -> &YearBucket {
        match self {
            YearOutcome::Scanned { bucket, .. } | YearOutcome::Skipped { bucket, .. } => bucket,
        }
    }

    pub fn year(&self) -> i32 {
        self.bucket().year
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, YearOutcome::Skipped { .. })
    }
}

/// Enumerates a year folder and resolves its title entries in listing order
pub struct YearScanner<'a, F: DirectoryFetcher + ?Sized> {
    fetcher: &'a F,
    settings: &'a CrawlSettings,
}

impl<'a, F: DirectoryFetcher + ?Sized> YearScanner<'a, F> {
    pub fn new(fetcher: &'a F, settings: &'a CrawlSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Scan `<root>/(year)/`.
    ///
    /// A year folder that cannot be fetched yields an empty, skipped bucket.
    /// Entries whose display text carries the high-resolution marker are
    /// dropped before resolution; entries whose own folder cannot be fetched
    /// are recorded as skipped and scanning continues.
    pub async fn scan_year(&self, year: i32) -> YearOutcome {
        let year_url = match self.settings.year_url(year) {
            Ok(url) => url,
            Err(e) => {
                warn!("⚠️ Year {}: {}", year, e);
                return YearOutcome::Skipped {
                    bucket: YearBucket::empty(year),
                    reason: SkipReason::ListingFailed(e),
                };
            }
        };

        let listing = match self.fetcher.fetch(&year_url).await {
            Ok(listing) => listing,
            Err(e) => {
                debug!("Year {} skipped, listing unavailable: {}", year, e);
                return YearOutcome::Skipped {
                    bucket: YearBucket::empty(year),
                    reason: SkipReason::ListingFailed(e),
                };
            }
        };

        let resolver = EntryResolver::new(self.fetcher, self.settings);
        let mut bucket = YearBucket::empty(year);
        let mut skipped = Vec::new();

        for entry in listing.iter().filter(|e| !e.is_self_reference()) {
            let resolution = if self.settings.is_high_resolution(&entry.display_text) {
                Resolution::Skipped(SkipReason::HighResolution)
            } else {
                resolver
                    .resolve(&year_url, entry)
                    .await
                    .unwrap_or_else(|e| Resolution::Skipped(SkipReason::ListingFailed(e)))
            };

            match resolution {
                Resolution::Found(item) => {
                    debug!("🎬 {} -> {}", item.title, item.video_url);
                    bucket.items.push(item);
                }
                Resolution::Skipped(reason) => {
                    debug!("Skipping {:?} in {}: {}", entry.display_text, year, reason);
                    skipped.push(SkippedEntry {
                        link: entry.link.clone(),
                        display_text: entry.display_text.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            "📅 {}: {} items, {} entries skipped",
            year,
            bucket.items.len(),
            skipped.len()
        );

        YearOutcome::Scanned { bucket, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::YearRange;
    use crate::error::FetchError;
    use crate::listing::ListingEntry;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use url::Url;

    /// Serves one fixed year listing and records every requested URL
    struct RecordingFetcher {
        year_listing: Vec<ListingEntry>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DirectoryFetcher for RecordingFetcher {
        async fn fetch(&self, url: &Url) -> Result<Vec<ListingEntry>, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            if url.as_str() == "http://host/(2015)/" {
                Ok(self.year_listing.clone())
            } else {
                Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout: std::time::Duration::from_secs(15),
                })
            }
        }
    }

    fn settings() -> CrawlSettings {
        CrawlSettings::new(
            Url::parse("http://host/").unwrap(),
            Url::parse("https://example.com/fallback.png").unwrap(),
            YearRange::new(2015, 2015).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_high_resolution_entries_never_reach_resolver() {
        let fetcher = RecordingFetcher {
            year_listing: vec![
                ListingEntry::new("The.Great.Voyage.2015.1080p.BluRay.mkv", "The.Great.Voyage.2015.1080p.BluRay.mkv"),
                ListingEntry::new("Voyage1080/", "Voyage 1080p/"),
                ListingEntry::new("Inside.Out.2015.mkv", "Inside.Out.2015.mkv"),
            ],
            requested: Mutex::new(Vec::new()),
        };
        let settings = settings();

        let outcome = YearScanner::new(&fetcher, &settings).scan_year(2015).await;

        let YearOutcome::Scanned { bucket, skipped } = outcome else {
            panic!("year listing should have been read");
        };
        assert_eq!(bucket.items.len(), 1);
        assert_eq!(bucket.items[0].title, "Inside Out (2015)");
        assert_eq!(skipped.len(), 2);
        assert!(skipped.iter().all(|s| s.reason == SkipReason::HighResolution));
        // the tainted folder was never entered
        assert_eq!(*fetcher.requested.lock().unwrap(), vec!["http://host/(2015)/".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_sub_folder_is_skipped_not_fatal() {
        let fetcher = RecordingFetcher {
            year_listing: vec![
                ListingEntry::new("Slow/", "Slow/"),
                ListingEntry::new("Minions.2015.mp4", "Minions.2015.mp4"),
            ],
            requested: Mutex::new(Vec::new()),
        };
        let settings = settings();

        let outcome = YearScanner::new(&fetcher, &settings).scan_year(2015).await;

        assert!(!outcome.is_skipped());
        let YearOutcome::Scanned { bucket, skipped } = outcome else {
            unreachable!();
        };
        assert_eq!(bucket.items.len(), 1);
        assert_eq!(skipped[0].link, "Slow/");
        assert!(matches!(
            skipped[0].reason,
            SkipReason::ListingFailed(FetchError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_year_is_empty_bucket() {
        let fetcher = RecordingFetcher {
            year_listing: Vec::new(),
            requested: Mutex::new(Vec::new()),
        };
        let settings = settings();

        let outcome = YearScanner::new(&fetcher, &settings).scan_year(2014).await;

        assert!(outcome.is_skipped());
        assert_eq!(outcome.year(), 2014);
        assert!(outcome.bucket().items.is_empty());
    }
}
