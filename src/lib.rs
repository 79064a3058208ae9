/// Listing Catalog
///
/// Crawls an HTTP directory tree of year folders and title folders, picks the
/// playable file and artwork for each title, and writes a year-ordered
/// catalog document for media-center front ends.

pub mod catalog;
pub mod config;
pub mod error;
pub mod listing;
pub mod output;
pub mod title;

// Re-export main types for easy access
pub use crate::catalog::{
    BuildReport, Catalog, CatalogBuilder, CrawlSettings, ResolvedItem, SkipReason, YearBucket,
    YearOutcome, YearRange,
};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{CatalogError, FetchError};
pub use crate::listing::{AssetKind, DirectoryFetcher, HttpDirectoryFetcher, LinkClassifier, ListingEntry};
pub use crate::output::{write_catalog, ExportFormat};
pub use crate::title::normalize;
