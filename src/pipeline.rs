use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use crate::config::ScrapeConfig;
use crate::downloader::{self, ImageRequest};
use crate::images::resolve_image_urls;
use crate::report::RunSummary;
use crate::{fetcher, output, parser};

/// fetch → extract → resolve → download → persist, strictly in sequence.
pub async fn run(config: &ScrapeConfig) -> Result<RunSummary> {
    config.validate()?;
    let client = Client::new();
    let image_request = ImageRequest::from_config(config)?;

    output::ensure_output_dirs(config)?;

    let markup = fetcher::fetch_page(&client, &config.url, &config.page_user_agent).await?;
    output::save_markup(&markup, &config.html_path())?;

    info!("Extracting page data...");
    let mut page = parser::extract_page(&markup, &config.url)?;
    info!(
        "Extracted {} sections, {} tables, {} images, {} links",
        page.sections.len(),
        page.tables.len(),
        page.images.len(),
        page.links.len()
    );

    let urls = resolve_image_urls(&page.images, &config.known_images);
    println!("Downloading {} images...", urls.len());
    let results = downloader::download_all(
        &client,
        &urls,
        &config.images_dir(),
        &image_request,
        Duration::from_millis(config.download_delay_ms),
    )
    .await;
    page.attach_downloads(results);

    output::save_page_data(&page, &config.data_path())
        .with_context(|| format!("Failed to persist {}", config.data_path().display()))?;

    Ok(RunSummary::from_page(&page, urls.len()))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, dir: &std::path::Path, known: Vec<String>) -> ScrapeConfig {
        ScrapeConfig {
            url: format!("{}/docs/explore-ui", server.uri()),
            output_dir: dir.join("out"),
            known_images: known,
            download_delay_ms: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_image_is_reported_and_data_still_written() {
        let server = MockServer::start().await;
        let html = r#"<html><head><title>Docs</title></head><body>
            <h2>Overview</h2><p>Hello</p>
            <img src="/img/ok.png" alt="ok"><img src="/img/gone.png" alt="gone">
            <img src="/img/ok.png" alt="again">
            <h2>Next</h2></body></html>"#;

        Mock::given(method("GET"))
            .and(path("/docs/explore-ui"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/img/ok.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![1u8; 64]),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/img/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let known = vec![format!("{}/img/ok.png", server.uri())];
        let config = config_for(&server, tmp.path(), known);

        let summary = run(&config).await.unwrap();

        assert_eq!(summary.images_found, 3);
        assert_eq!(summary.unique_urls, 2);
        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_bytes, 64);
        assert!(summary.failures[0].0.ends_with("/img/gone.png"));

        let saved = output::load_page_data(&config.data_path()).unwrap();
        assert_eq!(saved.title, "Docs");
        assert_eq!(saved.sections.len(), 1);
        assert_eq!(saved.sections[0].title, "Overview");
        assert_eq!(saved.downloaded_images.len(), 2);
        assert_eq!(RunSummary::from_page(&saved, 2), summary);
        assert!(config.html_path().exists());
        assert!(config.images_dir().join("ok.png").exists());
    }

    #[tokio::test]
    async fn page_fetch_failure_aborts_before_extraction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let config = config_for(&server, tmp.path(), vec![]);

        let err = run(&config).await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::Fetch { .. })
        ));
        assert!(!config.html_path().exists());
        assert!(!config.data_path().exists());
    }

    #[tokio::test]
    async fn invalid_config_fails_fast() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ScrapeConfig {
            url: "not a url".into(),
            output_dir: tmp.path().join("out"),
            ..Default::default()
        };
        let err = run(&config).await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::Config(_))
        ));
        assert!(!config.output_dir.exists());
    }
}
