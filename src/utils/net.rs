use std::{collections::HashMap, time::Duration};

use log::{debug, warn};
use reqwest::{
    Method, StatusCode,
    header::{CONTENT_TYPE, HeaderMap},
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{Jitter, RetryTransientMiddleware, policies::ExponentialBackoff};
use url::Url;

use crate::error::{SdError, SdResult};

pub async fn http_get(
    url: &str,
    path: Option<&str>,
    query: &HashMap<String, String>,
    headers: &HashMap<String, String>,
    timeout_secs: u64,
    max_retries: u64,
) -> SdResult<String> {
    let request_url = match path {
        Some(path) => join_url(url, path)?,
        None => url.to_string(),
    };

    let client = build_client(timeout_secs, max_retries);

    let mut request_builder = client
        .request(Method::GET, &request_url)
        .timeout(request_timeout(timeout_secs));
    request_builder = request_builder.query(query);

    for (k, v) in headers {
        request_builder = request_builder.header(k, v);
    }

    let response = request_builder.send().await?;

    if response.status().is_success() {
        // Decodes with the charset declared in Content-Type, UTF-8 otherwise
        if declared_charset(response.headers()).is_none() {
            warn!("[HTTP] No charset declared by GET {request_url}, decode as UTF-8");
        }

        Ok(response.text().await?)
    } else {
        debug!("[HTTP Status Error] {response:?}");

        Err(SdError::HttpStatusError {
            status: response.status().to_string(),
            request: format!("GET {request_url}"),
        })
    }
}

pub async fn http_head(url: &str, timeout_secs: u64, max_retries: u64) -> SdResult<StatusCode> {
    let client = build_client(timeout_secs, max_retries);

    let response = client
        .request(Method::HEAD, url)
        .timeout(request_timeout(timeout_secs))
        .send()
        .await?;

    Ok(response.status())
}

pub async fn http_post(
    url: &str,
    body: &serde_json::Value,
    timeout_secs: u64,
    max_retries: u64,
) -> SdResult<Vec<u8>> {
    http_send_json(Method::POST, url, body, timeout_secs, max_retries).await
}

pub async fn http_put(
    url: &str,
    body: &serde_json::Value,
    timeout_secs: u64,
    max_retries: u64,
) -> SdResult<Vec<u8>> {
    http_send_json(Method::PUT, url, body, timeout_secs, max_retries).await
}

pub fn join_url(base_url: &str, extend_url: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base_url)?;

    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(extend_url.split('/').filter(|s| !s.is_empty()));

    Ok(url.to_string())
}

/// Charset parameter of the response `Content-Type`, if any.
fn declared_charset(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)?
        .to_str()
        .ok()?
        .split(';')
        .skip(1)
        .find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"').to_string())
        })
}

fn request_timeout(timeout_secs: u64) -> Duration {
    Duration::from_secs(timeout_secs.max(1))
}

fn build_client(timeout_secs: u64, max_retries: u64) -> ClientWithMiddleware {
    let timeout_secs = timeout_secs.max(1);
    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_secs(1), Duration::from_secs(timeout_secs))
        .jitter(Jitter::Bounded)
        .base(2)
        .build_with_total_retry_duration_and_max_retries(Duration::from_secs(
            max_retries * timeout_secs,
        ));

    ClientBuilder::new(reqwest::Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}

async fn http_send_json(
    method: Method,
    url: &str,
    body: &serde_json::Value,
    timeout_secs: u64,
    max_retries: u64,
) -> SdResult<Vec<u8>> {
    let client = build_client(timeout_secs, max_retries);

    let response = client
        .request(method.clone(), url)
        .timeout(request_timeout(timeout_secs))
        .header(CONTENT_TYPE, "application/json")
        .body(serde_json::to_vec(body)?)
        .send()
        .await?;

    if response.status().is_success() {
        Ok(response.bytes().await?.to_vec())
    } else {
        debug!("[HTTP Status Error] {response:?}");

        Err(SdError::HttpStatusError {
            status: response.status().to_string(),
            request: format!("{method} {url}"),
        })
    }
}
