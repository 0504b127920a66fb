use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use futures::TryStreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, REFERER, USER_AGENT,
};
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tracing::{info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::{DownloadError, ScrapeError};
use crate::model::DownloadResult;

const CHUNK_SIZE: usize = 8 * 1024;
const DEFAULT_EXTENSION: &str = "jpg";

static SUBTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[^/;]+/([^;+\s]+)").unwrap());

/// Per-request settings for image downloads.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    headers: HeaderMap,
    timeout: Duration,
}

impl ImageRequest {
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let value = |name: &str, v: &str| {
            HeaderValue::from_str(v)
                .map_err(|e| ScrapeError::Config(format!("invalid {} header: {}", name, e)))
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, value("user-agent", &config.image_user_agent)?);
        headers.insert(ACCEPT, value("accept", &config.image_accept)?);
        headers.insert(ACCEPT_LANGUAGE, value("accept-language", &config.accept_language)?);
        headers.insert(REFERER, value("referer", &config.referer)?);
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        Ok(ImageRequest {
            headers,
            timeout: Duration::from_secs(config.image_timeout_secs),
        })
    }
}

/// Download every URL in sorted order, pausing `delay` between requests.
///
/// Returns one record per URL; failures never stop the loop.
pub async fn download_all(
    client: &Client,
    urls: &BTreeSet<String>,
    images_dir: &Path,
    request: &ImageRequest,
    delay: Duration,
) -> Vec<DownloadResult> {
    let total = urls.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut results = Vec::with_capacity(total);
    for (idx, url) in urls.iter().enumerate() {
        if idx > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        pb.set_message(url.clone());
        results.push(download_image(client, url, images_dir, request).await);
        pb.inc(1);
    }

    pb.finish_and_clear();
    let ok = results.iter().filter(|r| r.success).count();
    info!("Downloaded {} images ({} ok, {} errors)", total, ok, total - ok);
    results
}

/// Fetch one image into `images_dir`. Any failure becomes a failed record.
pub async fn download_image(
    client: &Client,
    url: &str,
    images_dir: &Path,
    request: &ImageRequest,
) -> DownloadResult {
    match try_download(client, url, images_dir, request).await {
        Ok(saved) => {
            info!(
                "Saved: {} ({} bytes)",
                saved.filename.as_deref().unwrap_or_default(),
                saved.size_bytes.unwrap_or_default()
            );
            saved
        }
        Err(e) => {
            // keep the whole source chain, reqwest's Display alone hides timeouts
            let reason = format!("{:#}", anyhow::Error::from(e));
            warn!("Error downloading {}: {}", url, reason);
            DownloadResult::failed(url, reason)
        }
    }
}

async fn try_download(
    client: &Client,
    url: &str,
    images_dir: &Path,
    request: &ImageRequest,
) -> Result<DownloadResult, DownloadError> {
    let parsed = Url::parse(url)?;
    let response = client
        .get(parsed.clone())
        .headers(request.headers.clone())
        .timeout(request.timeout)
        .send()
        .await?
        .error_for_status()?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.to_lowercase().contains("image") {
        warn!("Content-Type is {:?} for {}, may not be an image", content_type, url);
    }

    let filename = filename_for(url, &parsed, &content_type);
    let path = images_dir.join(&filename);

    let size = match stream_to_file(response, &path).await {
        Ok(size) => size,
        Err(e) => {
            // don't leave a truncated image behind
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e);
        }
    };

    Ok(DownloadResult::saved(url, &path, filename, size, content_type))
}

/// Stream the body to `path` in bounded reads and return the size on disk.
async fn stream_to_file(response: Response, path: &Path) -> Result<u64, DownloadError> {
    let mut file = File::create(path).await?;

    let body = response.bytes_stream().map_err(std::io::Error::other);
    let reader = StreamReader::new(body);
    tokio::pin!(reader);

    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).await?;
    }
    file.flush().await?;
    drop(file);

    Ok(tokio::fs::metadata(path).await?.len())
}

/// Last path segment when it has an extension, else a name derived from the URL hash.
fn filename_for(raw_url: &str, parsed: &Url, content_type: &str) -> String {
    let base = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    if !base.is_empty() && base.contains('.') {
        return base.to_string();
    }

    let digest = format!("{:x}", md5::compute(raw_url.as_bytes()));
    format!("image_{}.{}", &digest[..8], extension_for(content_type))
}

/// Subtype of any type mentioning "image" (`image/svg+xml` -> `svg`), else `jpg`.
fn extension_for(content_type: &str) -> String {
    if !content_type.to_lowercase().contains("image") {
        return DEFAULT_EXTENSION.to_string();
    }
    SUBTYPE_RE
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

// ── Tests ──
