use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::listing::classifier::{DEFAULT_IMAGE_EXTENSIONS, DEFAULT_VIDEO_EXTENSIONS};
use crate::output::ExportFormat;

/// Configuration for a catalog build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to crawl and how to interpret it
    pub crawl: CrawlConfig,

    /// HTTP client settings for listing retrieval
    pub http: HttpConfig,

    /// Output document settings
    pub output: OutputConfig,

    /// Concurrency settings
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Root of the year folder tree; year folders are named "(YYYY)"
    pub root_url: String,

    /// Thumbnail used when a title folder has no artwork
    pub fallback_image: String,

    /// Extensions that identify playable files
    pub video_extensions: Vec<String>,

    /// Extensions that identify artwork
    pub image_extensions: Vec<String>,

    /// Newest year scanned (inclusive)
    pub first_year: i32,

    /// Oldest year scanned (inclusive)
    pub last_year: i32,

    /// Display-text marker of duplicate high-resolution releases
    pub high_resolution_marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Extra attempts for timeouts, transport errors and 5xx responses
    pub max_retries: u32,

    /// Base delay between attempts, multiplied by the attempt number
    pub retry_backoff_ms: u64,

    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output document path
    pub path: PathBuf,

    /// Output document format
    pub format: ExportFormat,

    /// Log level
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Year folders scanned at the same time
    pub max_concurrent_years: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_url: "http://10.1.1.1/data/Animation%20Movies/".to_string(),
            fallback_image: "https://example.com/fallback/animation.png".to_string(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            first_year: 2025,
            last_year: 2000,
            high_resolution_marker: "1080".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            max_retries: 0,
            retry_backoff_ms: 500,
            user_agent: concat!("listing-catalog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Animation-Movies.xml"),
            format: ExportFormat::Xml,
            log_level: "info".to_string(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_years: num_cpus::get().min(8),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            http: HttpConfig::default(),
            output: OutputConfig::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the well-known
    /// locations are tried in order and defaults are used if none is found.
    /// Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::discover().unwrap_or_default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn discover() -> Option<Self> {
        let config_paths = ["listing-catalog.toml", "config/listing-catalog.toml"];

        for path in &config_paths {
            let path = Path::new(path);
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => return Some(config),
                Err(e) => tracing::warn!("{:#}", e),
            }
        }

        None
    }

    /// Override settings from `LISTING_CATALOG_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(root_url) = std::env::var("LISTING_CATALOG_ROOT_URL") {
            self.crawl.root_url = root_url;
        }

        if let Ok(fallback) = std::env::var("LISTING_CATALOG_FALLBACK_IMAGE") {
            self.crawl.fallback_image = fallback;
        }

        if let Ok(output) = std::env::var("LISTING_CATALOG_OUTPUT") {
            self.output.path = PathBuf::from(output);
        }

        if let Ok(timeout) = std::env::var("LISTING_CATALOG_TIMEOUT") {
            match timeout.parse() {
                Ok(seconds) => self.http.timeout_seconds = seconds,
                Err(_) => tracing::warn!("Ignoring invalid LISTING_CATALOG_TIMEOUT: {}", timeout),
            }
        }

        if let Ok(workers) = std::env::var("LISTING_CATALOG_WORKERS") {
            match workers.parse() {
                Ok(workers) => self.performance.max_concurrent_years = workers,
                Err(_) => tracing::warn!("Ignoring invalid LISTING_CATALOG_WORKERS: {}", workers),
            }
        }

        if let Ok(log_level) = std::env::var("LISTING_CATALOG_LOG_LEVEL") {
            self.output.log_level = log_level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.crawl.root_url)
            .map_err(|e| anyhow!("root_url {:?} is not a valid URL: {}", self.crawl.root_url, e))?;
        Url::parse(&self.crawl.fallback_image).map_err(|e| {
            anyhow!("fallback_image {:?} is not a valid URL: {}", self.crawl.fallback_image, e)
        })?;

        if self.crawl.first_year < self.crawl.last_year {
            return Err(anyhow!(
                "first_year ({}) must not be older than last_year ({})",
                self.crawl.first_year,
                self.crawl.last_year
            ));
        }

        if self.crawl.video_extensions.is_empty() {
            return Err(anyhow!("video_extensions must not be empty"));
        }

        if self.crawl.image_extensions.is_empty() {
            return Err(anyhow!("image_extensions must not be empty"));
        }

        if self.http.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        if self.performance.max_concurrent_years == 0 {
            return Err(anyhow!("max_concurrent_years must be greater than 0"));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Catalog Configuration:\n\
            - Root URL: {}\n\
            - Years: {} down to {}\n\
            - Video Extensions: {}\n\
            - Image Extensions: {}\n\
            - Timeout: {}s (retries: {})\n\
            - Concurrent Years: {}\n\
            - Output: {} ({:?})",
            self.crawl.root_url,
            self.crawl.first_year,
            self.crawl.last_year,
            self.crawl.video_extensions.join(", "),
            self.crawl.image_extensions.join(", "),
            self.http.timeout_seconds,
            self.http.max_retries,
            self.performance.max_concurrent_years,
            self.output.path.display(),
            self.output.format,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_root_url(mut self, url: impl Into<String>) -> Self {
        self.config.crawl.root_url = url.into();
        self
    }

    pub fn with_fallback_image(mut self, url: impl Into<String>) -> Self {
        self.config.crawl.fallback_image = url.into();
        self
    }

    pub fn with_years(mut self, first_year: i32, last_year: i32) -> Self {
        self.config.crawl.first_year = first_year;
        self.config.crawl.last_year = last_year;
        self
    }

    pub fn with_output(mut self, path: PathBuf, format: ExportFormat) -> Self {
        self.config.output.path = path;
        self.config.output.format = format;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.http.timeout_seconds = seconds;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.performance.max_concurrent_years = workers;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.crawl.first_year, 2025);
        assert_eq!(config.crawl.last_year, 2000);
        assert_eq!(config.http.timeout_seconds, 15);
        assert_eq!(config.crawl.high_resolution_marker, "1080");
        assert!(config.crawl.video_extensions.contains(&".mkv".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_root_url("http://media.local/anim/")
            .with_fallback_image("http://media.local/anim/missing.png")
            .with_years(2012, 2010)
            .with_output(PathBuf::from("out/anim.json"), ExportFormat::Json)
            .with_workers(2)
            .build();

        assert_eq!(config.crawl.root_url, "http://media.local/anim/");
        assert_eq!(config.crawl.fallback_image, "http://media.local/anim/missing.png");
        assert_eq!(config.output.path, PathBuf::from("out/anim.json"));
        assert_eq!(config.output.format, ExportFormat::Json);
        assert_eq!(config.crawl.first_year, 2012);
        assert_eq!(config.performance.max_concurrent_years, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        assert!(ConfigBuilder::new().with_years(2000, 2025).build().validate().is_err());
        assert!(ConfigBuilder::new().with_root_url("not a url").build().validate().is_err());
        assert!(ConfigBuilder::new().with_timeout(0).build().validate().is_err());
        assert!(ConfigBuilder::new().with_workers(0).build().validate().is_err());

        let mut config = Config::default();
        config.crawl.video_extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawl]
            root_url = "http://media.local/anim/"
            first_year = 2020
            last_year = 2018

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawl.root_url, "http://media.local/anim/");
        assert_eq!(config.crawl.last_year, 2018);
        assert_eq!(config.crawl.high_resolution_marker, "1080");
        assert_eq!(config.output.format, ExportFormat::Json);
        assert_eq!(config.http.timeout_seconds, 15);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing-catalog.toml");
        let config = ConfigBuilder::new().with_years(2015, 2011).build();

        config.save(&path).unwrap();
        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.crawl.first_year, 2015);
        assert_eq!(loaded.crawl.last_year, 2011);
    }
}
