use std::collections::BTreeSet;

use crate::model::ImageRef;

/// Union of the page's resolved image URLs and the known supplementary URLs.
///
/// Empty URLs are dropped. The set iterates in sorted order.
pub fn resolve_image_urls(images: &[ImageRef], known: &[String]) -> BTreeSet<String> {
    images
        .iter()
        .map(|img| img.absolute_url.as_str())
        .chain(known.iter().map(String::as_str))
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ──
