/// Catalog document output
pub mod json;
pub mod xml;

use crate::catalog::Catalog;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xml,
    Json,
}

impl ExportFormat {
    pub fn render(&self, catalog: &Catalog) -> Result<String> {
        match self {
            ExportFormat::Xml => xml::render(catalog),
            ExportFormat::Json => json::render(catalog),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Xml => write!(f, "xml"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(ExportFormat::Xml),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// Render the catalog and write it to `path`, creating parent directories
pub async fn write_catalog(catalog: &Catalog, path: &Path, format: ExportFormat) -> Result<()> {
    let document = format.render(catalog)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, document).await?;

    info!("📝 Wrote {} items to: {}", catalog.item_count(), path.display());
    Ok(())
}
