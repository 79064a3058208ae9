use crate::catalog::Catalog;
use crate::error::Result;

/// Pretty-printed JSON with the same year/item structure as the XML document
pub fn render(catalog: &Catalog) -> Result<String> {
    Ok(serde_json::to_string_pretty(catalog)?)
}
