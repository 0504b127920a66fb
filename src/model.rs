use std::path::Path;

use serde::{Deserialize, Serialize};

/// Structured extraction of one documentation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    pub url: String,
    pub title: String,
    pub sections: Vec<Section>,
    pub images: Vec<ImageRef>,
    pub tables: Vec<Table>,
    pub links: Vec<LinkRef>,
    pub metadata: PageMetadata,
    #[serde(default)]
    pub downloaded_images: Vec<DownloadResult>,
}

impl PageDocument {
    /// Attach download outcomes. The only mutation after extraction.
    pub fn attach_downloads(&mut self, results: Vec<DownloadResult>) {
        self.downloaded_images = results;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading rank 1-6, written as the tag name ("h2").
    #[serde(with = "heading_level")]
    pub level: u8,
    pub title: String,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Paragraph { text: String },
    List { items: Vec<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub absolute_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRef {
    pub text: String,
    pub href: String,
    pub absolute_url: String,
}

/// Outcome of one image download.
///
/// Successful records carry the file details, failed ones only `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

impl DownloadResult {
    pub fn saved(
        url: &str,
        local_path: &Path,
        filename: String,
        size_bytes: u64,
        content_type: String,
    ) -> Self {
        DownloadResult {
            url: url.to_string(),
            local_path: Some(local_path.display().to_string()),
            filename: Some(filename),
            size_bytes: Some(size_bytes),
            content_type: Some(content_type),
            error: None,
            success: true,
        }
    }

    pub fn failed(url: &str, error: impl Into<String>) -> Self {
        DownloadResult {
            url: url.to_string(),
            local_path: None,
            filename: None,
            size_bytes: None,
            content_type: None,
            error: Some(error.into()),
            success: false,
        }
    }
}

mod heading_level {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(level: &u8, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("h{}", level))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        let tag = String::deserialize(d)?;
        tag.strip_prefix('h')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=6).contains(n))
            .ok_or_else(|| de::Error::custom(format!("invalid heading level: {}", tag)))
    }
}

// ── Tests ──
