pub mod links;
pub mod sections;
pub mod tables;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::ScrapeError;
use crate::model::{PageDocument, PageMetadata};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());

/// Parse markup into a [`PageDocument`].
///
/// Malformed markup is recovered by the tree builder and never fails here.
/// Only an unusable base URL is fatal.
pub fn extract_page(markup: &str, base_url: &str) -> Result<PageDocument, ScrapeError> {
    let base = Url::parse(base_url)
        .map_err(|e| ScrapeError::Parse(format!("invalid base URL {}: {}", base_url, e)))?;

    let doc = Html::parse_document(markup);
    if !doc.errors.is_empty() {
        debug!("Recovered from {} markup errors", doc.errors.len());
    }

    let title = doc
        .select(&TITLE)
        .next()
        .map(|t| element_text(&t))
        .unwrap_or_default();
    let main_heading = doc.select(&H1).next().map(|h| element_text(&h));

    debug!("Extracting sections...");
    let sections = sections::extract(&doc);
    debug!("Extracting images...");
    let images = links::extract_images(&doc, &base);
    debug!("Extracting tables...");
    let tables = tables::extract(&doc);
    debug!("Extracting links...");
    let links = links::extract_links(&doc, &base);

    Ok(PageDocument {
        url: base_url.to_string(),
        title,
        sections,
        images,
        tables,
        links,
        metadata: PageMetadata { main_heading },
        downloaded_images: Vec::new(),
    })
}

/// All descendant text of an element, trimmed.
pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Tests ──
