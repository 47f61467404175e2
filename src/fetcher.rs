//! Bounded-concurrency retrieval of product detail pages

use crate::error::FetchError;
use crate::parsers::RecordExtractor;
use crate::progress::Progress;
use crate::results::{ProductRecord, ProductUrlSet};
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Desktop Chrome identity; several catalogs serve a stripped page to unknown agents
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_LANGUAGE_VALUE: &str = "vi-VN,vi;q=0.9,en-US;q=0.8,en;q=0.7";

/// Builds the HTTP client used for detail pages
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
    );

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches every product URL once and extracts a record from each page
///
/// At most `max_concurrency` requests are in flight. Records are collected in
/// completion order; failed requests and pages without a record are dropped.
pub struct DetailFetcher {
    client: Client,
    max_concurrency: usize,
}

impl DetailFetcher {
    pub fn new(client: Client, max_concurrency: usize) -> Self {
        Self {
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub async fn fetch_all(
        &self,
        urls: &ProductUrlSet,
        extractor: &'static dyn RecordExtractor,
        progress: &Progress,
    ) -> Vec<ProductRecord> {
        let total = urls.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for url in urls.iter() {
            let url = url.to_string();
            let client = self.client.clone();
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let result = fetch_with_permit(&semaphore, &client, &url, extractor).await;
                (url, result)
            });
        }

        let mut records = Vec::with_capacity(total);
        let mut completed = 0;

        while let Some(joined) = tasks.join_next().await {
            completed += 1;
            match joined {
                Ok((_, Ok(record))) => records.push(record),
                Ok((url, Err(e))) => ::log::warn!("Dropping {}: {}", url, e),
                Err(e) => ::log::error!("Detail task failed: {}", e),
            }
            progress.fetched(completed, total);
        }

        progress.status(format!(
            "Extracted {} records from {} product pages",
            records.len(),
            total
        ));
        records
    }
}

/// Wait for a pool slot, then fetch one page
async fn fetch_with_permit(
    semaphore: &Semaphore,
    client: &Client,
    url: &str,
    extractor: &dyn RecordExtractor,
) -> Result<ProductRecord, FetchError> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|_| FetchError::Cancelled)?;
    fetch_record(client, url, extractor).await
}

/// Fetch one page and hand the body to the extractor
pub async fn fetch_record(
    client: &Client,
    url: &str,
    extractor: &dyn RecordExtractor,
) -> Result<ProductRecord, FetchError> {
    ::log::debug!("GET {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    extractor.extract(&body, url).ok_or(FetchError::Empty)
}
