/// Remote image listing
///
/// Fetches a JSON array of image records and maps each record to the
/// identifier used by the gallery (its direct download URL).
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;

use crate::error::FetchError;
use crate::state::data::ImageId;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("gallery-grid/", env!("CARGO_PKG_VERSION"));

/// Largest listing body accepted
const MAX_LISTING_BYTES: usize = 4 * 1024 * 1024;

/// One entry of the listing response. Other fields (author, size,
/// page URL) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingRecord {
    #[serde(default)]
    pub id: String,
    pub download_url: String,
}

static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Shared HTTP client with consistent timeouts
pub fn client() -> Result<&'static reqwest::Client, FetchError> {
    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = build_client()?;
    Ok(CLIENT.get_or_init(|| client))
}

fn build_client() -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::Network(e.to_string()))
}

/// Fetch the listing at `url` with the shared client
pub async fn fetch_listing(url: String) -> Result<Vec<ImageId>, FetchError> {
    fetch_listing_with(client()?, &url).await
}

/// Fetch the listing at `url` with an explicit client
pub async fn fetch_listing_with(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<ImageId>, FetchError> {
    tracing::info!("Fetching image listing from {url}");
    let body = fetch_bytes_with(client, url, MAX_LISTING_BYTES).await?;
    parse_listing(&body)
}

/// GET `url` and return the body, rejecting non-success statuses and
/// bodies larger than `max_bytes`.
pub async fn fetch_bytes_with(
    client: &reqwest::Client,
    url: &str,
    max_bytes: usize,
) -> Result<Vec<u8>, FetchError> {
    let mut response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    if let Some(length) = response.content_length() {
        if length > max_bytes as u64 {
            return Err(FetchError::TooLarge(max_bytes));
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > max_bytes {
            return Err(FetchError::TooLarge(max_bytes));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Decode a listing body into identifiers, keeping the first occurrence
/// of any duplicated URL.
pub fn parse_listing(body: &[u8]) -> Result<Vec<ImageId>, FetchError> {
    let records: Vec<ListingRecord> =
        serde_json::from_slice(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut ids = Vec::with_capacity(records.len());
    for record in records {
        if record.download_url.is_empty() {
            tracing::warn!("Skipping listing record {:?} without download URL", record.id);
            continue;
        }
        if seen.insert(record.download_url.clone()) {
            ids.push(ImageId::from(record.download_url));
        } else {
            tracing::warn!("Skipping duplicate image {}", record.download_url);
        }
    }
    Ok(ids)
}
