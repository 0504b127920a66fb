use reqwest::header::USER_AGENT;
use reqwest::Client;
use tracing::info;

use crate::error::ScrapeError;

/// GET the page and return its body. Error statuses are fatal.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    user_agent: &str,
) -> Result<String, ScrapeError> {
    let fetch_err = |source: reqwest::Error| ScrapeError::Fetch {
        url: url.to_string(),
        source,
    };

    info!("Fetching page: {}", url);
    let body = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)?;

    info!("Page fetched successfully ({} bytes)", body.len());
    Ok(body)
}

// ── Tests ──
