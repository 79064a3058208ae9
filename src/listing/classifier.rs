use super::{AssetKind, ListingEntry};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &[".mkv", ".mp4", ".avi", ".ts", ".webm"];
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

/// Sorts listing entries into directories, videos and images by their link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkClassifier {
    video_extensions: Vec<String>,
    image_extensions: Vec<String>,
}

impl LinkClassifier {
    /// Build a classifier from extension lists. Extensions are matched
    /// case-insensitively and may be given with or without the leading dot.
    pub fn new<V, I>(video_extensions: V, image_extensions: I) -> Self
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            video_extensions: normalize_extensions(video_extensions),
            image_extensions: normalize_extensions(image_extensions),
        }
    }

    pub fn classify(&self, entry: &ListingEntry) -> AssetKind {
        self.classify_link(&entry.link)
    }

    pub fn classify_link(&self, link: &str) -> AssetKind {
        if link.ends_with('/') {
            return if link == "../" || link == "./" {
                AssetKind::Unknown
            } else {
                AssetKind::Directory
            };
        }

        let lower = link.to_lowercase();
        if self.video_extensions.iter().any(|ext| lower.ends_with(ext.as_str())) {
            AssetKind::Video
        } else if self.image_extensions.iter().any(|ext| lower.ends_with(ext.as_str())) {
            AssetKind::Image
        } else {
            AssetKind::Unknown
        }
    }

    pub fn is_video(&self, link: &str) -> bool {
        self.classify_link(link) == AssetKind::Video
    }

    pub fn video_extensions(&self) -> &[String] {
        &self.video_extensions
    }
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_EXTENSIONS, DEFAULT_IMAGE_EXTENSIONS)
    }
}

fn normalize_extensions<T>(extensions: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim().to_lowercase())
        .filter(|ext| !ext.is_empty() && ext != ".")
        .map(|ext| if ext.starts_with('.') { ext } else { format!(".{}", ext) })
        .collect()
}
