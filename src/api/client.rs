use crate::app_config::Backend;
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub fn new_client(backend: &Backend) -> Result<Client, ApiClientError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(backend.request_timeout())
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// GETs `url` and decodes the JSON body. Non-2xx statuses are errors.
pub(super) async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
    debug!(url, "🌐 GET {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { url: url.to_string(), status });
    }

    Ok(response.json::<T>().await?)
}

#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("could not build the HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request to '{url}' failed with status {status}")]
    Status { url: String, status: StatusCode },
}
