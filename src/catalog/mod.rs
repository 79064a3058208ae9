/// Catalog model and the crawl pipeline that fills it
///
/// Year folders are scanned by [`YearScanner`], each title entry inside them
/// is resolved by [`EntryResolver`], and [`CatalogBuilder`] assembles the
/// year buckets in descending order.

pub mod builder;
pub mod resolver;
pub mod scanner;

pub use builder::{BuildReport, CatalogBuilder, YearReport};
pub use resolver::{EntryResolver, Resolution};
pub use scanner::{SkippedEntry, YearOutcome, YearScanner};

use crate::config::Config;
use crate::error::{CatalogError, FetchError};
use crate::listing::LinkClassifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A fully determined catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    /// Normalized "Title (Year)" or bare title
    pub title: String,
    /// Year parsed from the raw name, if any
    pub year: Option<String>,
    pub video_url: Url,
    pub thumbnail_url: Url,
}

/// Items found in one year folder, in listing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBucket {
    pub year: i32,
    pub items: Vec<ResolvedItem>,
}

impl YearBucket {
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            items: Vec::new(),
        }
    }
}

/// Year buckets in descending year order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub buckets: Vec<YearBucket>,
}

impl Catalog {
    pub fn item_count(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum()
    }

    pub fn bucket(&self, year: i32) -> Option<&YearBucket> {
        self.buckets.iter().find(|b| b.year == year)
    }
}

/// Closed range of years, iterated newest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub newest: i32,
    pub oldest: i32,
}

impl YearRange {
    pub fn new(newest: i32, oldest: i32) -> Result<Self, CatalogError> {
        if newest < oldest {
            return Err(CatalogError::Config(format!(
                "year range {}..{} is not descending",
                newest, oldest
            )));
        }
        Ok(Self { newest, oldest })
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> {
        (self.oldest..=self.newest).rev()
    }
}

/// Why an entry or a year contributed nothing to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Display text carries the high-resolution marker
    HighResolution,
    /// A direct file that is not a video
    NotVideo,
    /// A folder without any acceptable video
    NoAcceptableVideo,
    /// The listing could not be retrieved
    ListingFailed(FetchError),
    /// A link that cannot be resolved against its listing URL
    MalformedLink(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::HighResolution => write!(f, "high-resolution duplicate"),
            SkipReason::NotVideo => write!(f, "not a video file"),
            SkipReason::NoAcceptableVideo => write!(f, "no acceptable video"),
            SkipReason::ListingFailed(e) => write!(f, "listing failed: {}", e),
            SkipReason::MalformedLink(link) => write!(f, "malformed link {:?}", link),
        }
    }
}

/// Read-only settings shared by every stage of one build
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub root_url: Url,
    pub fallback_image: Url,
    pub classifier: LinkClassifier,
    pub years: YearRange,
    pub high_resolution_marker: String,
}

impl CrawlSettings {
    pub fn new(root_url: Url, fallback_image: Url, years: YearRange) -> Self {
        Self {
            root_url: with_trailing_slash(root_url),
            fallback_image,
            classifier: LinkClassifier::default(),
            years,
            high_resolution_marker: "1080".to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let crawl = &config.crawl;
        let root_url = Url::parse(&crawl.root_url)
            .map_err(|e| CatalogError::Config(format!("root_url: {}", e)))?;
        let fallback_image = Url::parse(&crawl.fallback_image)
            .map_err(|e| CatalogError::Config(format!("fallback_image: {}", e)))?;
        let years = YearRange::new(crawl.first_year, crawl.last_year)?;

        let mut settings = Self::new(root_url, fallback_image, years);
        settings.classifier = LinkClassifier::new(&crawl.video_extensions, &crawl.image_extensions);
        settings.high_resolution_marker = crawl.high_resolution_marker.clone();
        Ok(settings)
    }

    /// Whether a display text names a duplicate high-resolution release
    pub fn is_high_resolution(&self, display_text: &str) -> bool {
        !self.high_resolution_marker.is_empty() && display_text.contains(&self.high_resolution_marker)
    }

    /// URL of a year folder, `<root>/(YYYY)/`
    pub fn year_url(&self, year: i32) -> Result<Url, FetchError> {
        self.root_url
            .join(&format!("({})/", year))
            .map_err(|e| FetchError::InvalidUrl(format!("year {}: {}", year, e)))
    }
}

/// Without a trailing slash, joining would replace the last path segment
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(root: &str) -> CrawlSettings {
        CrawlSettings::new(
            Url::parse(root).unwrap(),
            Url::parse("https://example.com/fallback.png").unwrap(),
            YearRange::new(2012, 2010).unwrap(),
        )
    }

    #[test]
    fn test_year_range_descends() {
        let range = YearRange::new(2025, 2000).unwrap();
        let years: Vec<i32> = range.iter().collect();
        assert_eq!(years.len(), 26);
        assert_eq!(years.first(), Some(&2025));
        assert_eq!(years.last(), Some(&2000));
        assert!(years.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_single_year_range() {
        let range = YearRange::new(2010, 2010).unwrap();
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![2010]);
        assert!(YearRange::new(2009, 2010).is_err());
    }

    #[test]
    fn test_year_url() {
        let s = settings("http://10.1.1.1/data/Animation%20Movies/");
        assert_eq!(
            s.year_url(2010).unwrap().as_str(),
            "http://10.1.1.1/data/Animation%20Movies/(2010)/"
        );
    }

    #[test]
    fn test_root_without_trailing_slash() {
        let s = settings("http://10.1.1.1/data/Animation%20Movies");
        assert_eq!(
            s.year_url(2011).unwrap().as_str(),
            "http://10.1.1.1/data/Animation%20Movies/(2011)/"
        );
    }

    #[test]
    fn test_high_resolution_marker_is_substring() {
        let s = settings("http://host/");
        assert!(s.is_high_resolution("Movie.2010.1080p.mkv"));
        assert!(s.is_high_resolution("Movie 1080"));
        assert!(!s.is_high_resolution("Movie.2010.720p.mkv"));
    }

    #[test]
    fn test_settings_from_config() {
        let config = crate::config::ConfigBuilder::new()
            .with_root_url("http://media.local/anim")
            .with_years(2003, 2001)
            .build();
        let s = CrawlSettings::from_config(&config).unwrap();
        assert_eq!(s.root_url.as_str(), "http://media.local/anim/");
        assert_eq!(s.years.iter().collect::<Vec<_>>(), vec![2003, 2002, 2001]);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog {
            buckets: vec![YearBucket::empty(2011), YearBucket::empty(2010)],
        };
        assert_eq!(catalog.item_count(), 0);
        assert!(catalog.bucket(2010).is_some());
        assert!(catalog.bucket(1999).is_none());
    }
}
