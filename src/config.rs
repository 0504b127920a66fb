use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ScrapeError;

const ENV_PREFIX: &str = "DOCSCRAPE";

const DEFAULT_URL: &str = "https://create.roblox.com/docs/tutorials/curriculums/studio/explore-ui";
const DEFAULT_OUTPUT_DIR: &str = "roblox_docs_data";

/// Image URLs referenced by the page that are not present in its static markup.
const KNOWN_IMAGES: &[&str] = &[
    "https://prod.docsiteassets.roblox.com/assets/tutorials/studio-lesson/Mezzanine.jpg",
    "https://prod.docsiteassets.roblox.com/assets/tutorials/studio-lesson/Toolbar.jpg",
    "https://prod.docsiteassets.roblox.com/assets/tutorials/studio-lesson/3D-Viewport.jpg",
    "https://prod.docsiteassets.roblox.com/assets/tutorials/studio-lesson/Toolbox.jpg",
    "https://prod.docsiteassets.roblox.com/assets/tutorials/studio-lesson/Explorer.jpg",
    "https://prod.docsiteassets.roblox.com/assets/tutorials/studio-lesson/Properties.jpg",
];

const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const IMAGE_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub url: String,
    pub output_dir: PathBuf,
    pub known_images: Vec<String>,
    /// Pause between successive image downloads.
    pub download_delay_ms: u64,
    pub image_timeout_secs: u64,
    pub page_user_agent: String,
    pub image_user_agent: String,
    pub image_accept: String,
    pub accept_language: String,
    pub referer: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            url: DEFAULT_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            known_images: KNOWN_IMAGES.iter().map(|s| s.to_string()).collect(),
            download_delay_ms: 700,
            image_timeout_secs: 30,
            page_user_agent: PAGE_USER_AGENT.to_string(),
            image_user_agent: IMAGE_USER_AGENT.to_string(),
            image_accept: IMAGE_ACCEPT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            referer: "https://create.roblox.com/".to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Defaults, then an optional TOML file, then `DOCSCRAPE_*` env vars.
    pub fn load(file: Option<&Path>) -> Result<Self, ScrapeError> {
        let defaults = config::Config::try_from(&ScrapeConfig::default())
            .map_err(|e| ScrapeError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("known_images"),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize::<ScrapeConfig>())
            .map_err(|e| ScrapeError::Config(e.to_string()))
    }

    /// Reject settings that would only fail later in the run.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        Url::parse(&self.url)
            .map_err(|e| ScrapeError::Config(format!("url {:?}: {}", self.url, e)))?;
        for known in &self.known_images {
            Url::parse(known)
                .map_err(|e| ScrapeError::Config(format!("known image {:?}: {}", known, e)))?;
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ScrapeError::Config("output_dir must not be empty".into()));
        }
        Ok(())
    }

    pub fn images_dir(&self) -> PathBuf {
        self.output_dir.join("images")
    }

    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join("page_content.html")
    }

    pub fn data_path(&self) -> PathBuf {
        self.output_dir.join("page_data.json")
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn defaults_match_original_constants() {
        let c = ScrapeConfig::default();
        assert_eq!(c.known_images.len(), 6);
        assert_eq!(c.download_delay_ms, 700);
        assert_eq!(c.image_timeout_secs, 30);
        assert_eq!(c.data_path(), PathBuf::from("roblox_docs_data/page_data.json"));
        assert_eq!(c.html_path(), PathBuf::from("roblox_docs_data/page_content.html"));
        assert_eq!(c.images_dir(), PathBuf::from("roblox_docs_data/images"));
        c.validate().unwrap();
    }

    #[test]
    #[serial]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "url = \"https://docs.example.com/page\"\n\
             output_dir = \"out\"\n\
             download_delay_ms = 0\n\
             known_images = [\"https://docs.example.com/a.png\"]"
        )
        .unwrap();

        let c = ScrapeConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.url, "https://docs.example.com/page");
        assert_eq!(c.output_dir, PathBuf::from("out"));
        assert_eq!(c.download_delay_ms, 0);
        assert_eq!(c.known_images, vec!["https://docs.example.com/a.png"]);
        // untouched keys keep their defaults
        assert_eq!(c.image_timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn env_overrides_file_and_splits_lists() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "output_dir = \"from_file\"\nimage_timeout_secs = 9").unwrap();

        std::env::set_var("DOCSCRAPE_OUTPUT_DIR", "envout");
        std::env::set_var("DOCSCRAPE_KNOWN_IMAGES", "https://a/x.jpg,https://a/y.jpg");
        std::env::set_var("DOCSCRAPE_DOWNLOAD_DELAY_MS", "5");
        let loaded = ScrapeConfig::load(Some(file.path()));
        std::env::remove_var("DOCSCRAPE_OUTPUT_DIR");
        std::env::remove_var("DOCSCRAPE_KNOWN_IMAGES");
        std::env::remove_var("DOCSCRAPE_DOWNLOAD_DELAY_MS");

        let c = loaded.unwrap();
        assert_eq!(c.output_dir, PathBuf::from("envout"));
        assert_eq!(c.known_images, vec!["https://a/x.jpg", "https://a/y.jpg"]);
        assert_eq!(c.download_delay_ms, 5);
        assert_eq!(c.image_timeout_secs, 9);
    }

    #[test]
    #[serial]
    fn missing_file_is_config_error() {
        let err = ScrapeConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn validate_rejects_relative_known_image() {
        let c = ScrapeConfig {
            known_images: vec!["/assets/a.jpg".into()],
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ScrapeError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_url() {
        let c = ScrapeConfig {
            url: "nope".into(),
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }
}
