/// Resolution of one title entry into a catalog record
use super::{CrawlSettings, ResolvedItem, SkipReason};
use crate::error::FetchError;
use crate::listing::{AssetKind, DirectoryFetcher, ListingEntry};
use crate::title;
use tracing::debug;
use url::Url;

/// Outcome of resolving one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedItem),
    Skipped(SkipReason),
}

impl Resolution {
    pub fn item(self) -> Option<ResolvedItem> {
        match self {
            Resolution::Found(item) => Some(item),
            Resolution::Skipped(_) => None,
        }
    }
}

/// Picks the video and thumbnail that represent a title entry
pub struct EntryResolver<'a, F: DirectoryFetcher + ?Sized> {
    fetcher: &'a F,
    settings: &'a CrawlSettings,
}

impl<'a, F: DirectoryFetcher + ?Sized> EntryResolver<'a, F> {
    pub fn new(fetcher: &'a F, settings: &'a CrawlSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Resolve an entry of the listing at `listing_url`.
    ///
    /// Folders are entered and searched for artwork and a video; direct
    /// files must be videos themselves. A failed sub-listing fetch is
    /// returned as an error for the caller to handle.
    pub async fn resolve(
        &self,
        listing_url: &Url,
        entry: &ListingEntry,
    ) -> Result<Resolution, FetchError> {
        let entry_url = match listing_url.join(&entry.link) {
            Ok(url) => url,
            Err(e) => {
                debug!("Cannot resolve {:?} against {}: {}", entry.link, listing_url, e);
                return Ok(Resolution::Skipped(SkipReason::MalformedLink(entry.link.clone())));
            }
        };

        match self.settings.classifier.classify(entry) {
            AssetKind::Directory => self.resolve_directory(&entry_url).await,
            AssetKind::Video => Ok(self.resolve_file(entry_url, &entry.display_text)),
            AssetKind::Image | AssetKind::Unknown => Ok(Resolution::Skipped(SkipReason::NotVideo)),
        }
    }

    async fn resolve_directory(&self, dir_url: &Url) -> Result<Resolution, FetchError> {
        let listing = self.fetcher.fetch(dir_url).await?;
        let classifier = &self.settings.classifier;

        let thumbnail_url = listing
            .iter()
            .filter(|e| classifier.classify(e) == AssetKind::Image)
            .find_map(|e| dir_url.join(&e.link).ok())
            .unwrap_or_else(|| self.settings.fallback_image.clone());

        let video = listing.iter().find(|e| {
            classifier.classify(e) == AssetKind::Video
                && !self.settings.is_high_resolution(&e.display_text)
        });

        let Some(video) = video else {
            debug!("No acceptable video in {}", dir_url);
            return Ok(Resolution::Skipped(SkipReason::NoAcceptableVideo));
        };

        let video_url = match dir_url.join(&video.link) {
            Ok(url) => url,
            Err(_) => return Ok(Resolution::Skipped(SkipReason::MalformedLink(video.link.clone()))),
        };

        Ok(Resolution::Found(self.build_item(
            &video.display_text,
            video_url,
            thumbnail_url,
        )))
    }

    fn resolve_file(&self, video_url: Url, display_text: &str) -> Resolution {
        let thumbnail_url = self.settings.fallback_image.clone();
        Resolution::Found(self.build_item(display_text, video_url, thumbnail_url))
    }

    fn build_item(&self, display_text: &str, video_url: Url, thumbnail_url: Url) -> ResolvedItem {
        let raw_title = title_source(display_text, &video_url);
        let parsed = title::parse(&raw_title);

        ResolvedItem {
            title: parsed.display(),
            year: parsed.year,
            video_url,
            thumbnail_url,
        }
    }
}

/// Display text of the chosen video, or its decoded file name when the
/// listing shows no text for it
fn title_source(display_text: &str, video_url: &Url) -> String {
    let text = display_text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    let file_name = video_url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    urlencoding::decode(file_name)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| file_name.to_string())
}
