/// Directory listing retrieval and classification
///
/// A listing is whatever an HTTP directory index page exposes for one folder,
/// reduced to `(link, display text)` pairs.

pub mod classifier;
pub mod fetcher;

pub use classifier::LinkClassifier;
pub use fetcher::{parse_listing, DirectoryFetcher, HttpDirectoryFetcher};

use serde::{Deserialize, Serialize};

/// One `(link, display text)` pair from a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Relative or absolute href
    pub link: String,
    /// Anchor text shown by the index page
    pub display_text: String,
}

impl ListingEntry {
    pub fn new(link: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            display_text: display_text.into(),
        }
    }

    /// Links that point back at the listing itself or its parent
    pub fn is_self_reference(&self) -> bool {
        self.link == "../" || self.link == "./"
    }
}

/// What a listing entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Directory,
    Video,
    Image,
    Unknown,
}
