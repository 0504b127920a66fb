use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::model::PageDocument;

/// Create the output root and its `images/` directory. Safe to call repeatedly.
pub fn ensure_output_dirs(config: &ScrapeConfig) -> Result<(), ScrapeError> {
    for dir in [config.output_dir.clone(), config.images_dir()] {
        fs::create_dir_all(&dir).map_err(|e| ScrapeError::io(&dir, e))?;
    }
    info!(
        "Created output directories: {} and {}",
        config.output_dir.display(),
        config.images_dir().display()
    );
    Ok(())
}

/// Write the fetched markup verbatim.
pub fn save_markup(markup: &str, path: &Path) -> Result<(), ScrapeError> {
    info!("Saving raw HTML to {}", path.display());
    fs::write(path, markup).map_err(|e| ScrapeError::io(path, e))
}

/// Write the document as pretty-printed UTF-8 JSON.
pub fn save_page_data(page: &PageDocument, path: &Path) -> Result<(), ScrapeError> {
    info!("Saving data to {}", path.display());
    let json = serde_json::to_string_pretty(page)?;
    fs::write(path, json).map_err(|e| ScrapeError::io(path, e))
}

pub fn load_page_data(path: &Path) -> Result<PageDocument, ScrapeError> {
    let json = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

// ── Tests ──
