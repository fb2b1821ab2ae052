//! Daily price history pages (`/item/sise_day`) of the remote quote site.

use std::{collections::HashMap, sync::LazyLock};

use async_trait::async_trait;
use fake_user_agent::get_rua;
use log::{debug, warn};
use scraper::{Html, Selector};

use crate::{
    config::SdConfig,
    error::{SdError, SdResult},
    utils::net::http_get,
};

static LAST_PAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.Nnavi td.pgRR a").expect("Invalid last page selector")
});

/// Source of raw history pages; one call is one outbound request, without caching.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, code: &str, page: u32) -> SdResult<String>;
}

pub struct SiseClient {
    api: String,
    endpoint: String,
    timeout_secs: u64,
    max_retries: u64,
}

impl SiseClient {
    pub fn new(api: &str, endpoint: &str, timeout_secs: u64, max_retries: u64) -> Self {
        Self {
            api: api.to_string(),
            endpoint: endpoint.to_string(),
            timeout_secs,
            max_retries,
        }
    }

    pub fn from_config(config: &SdConfig) -> Self {
        Self::new(
            &config.source_api,
            &config.source_endpoint,
            config.timeout_secs,
            config.max_retries,
        )
    }
}

#[async_trait]
impl PageSource for SiseClient {
    async fn fetch_page(&self, code: &str, page: u32) -> SdResult<String> {
        let mut query: HashMap<String, String> = HashMap::new();
        query.insert("code".to_string(), code.to_string());
        query.insert("page".to_string(), page.to_string());

        let mut headers: HashMap<String, String> = HashMap::new();
        headers.insert(
            reqwest::header::USER_AGENT.to_string(),
            get_rua().to_string(),
        );

        debug!("[Sise] Fetch {code} page {page}");

        let path = format!("/item/{}", self.endpoint);
        let text = http_get(
            &self.api,
            Some(&path),
            &query,
            &headers,
            self.timeout_secs,
            self.max_retries,
        )
        .await?;

        if text.trim().is_empty() {
            return Err(SdError::Invalid {
                code: "EMPTY_PAGE",
                message: format!("Empty page {page} of '{code}'"),
            });
        }

        Ok(text)
    }
}

/// Fetches page 1 and reads the total page count from its pagination control.
/// Returns 0 when the page has no "last page" control.
pub async fn resolve_last_page(source: &dyn PageSource, code: &str) -> SdResult<u32> {
    let text = source.fetch_page(code, 1).await?;

    let last_page = {
        let document = Html::parse_document(&text);
        parse_last_page(&document)
    };

    Ok(last_page)
}

/// The "last page" link targets `...?code=<code>&page=<n>`; `n` is the last `=` token.
pub fn parse_last_page(document: &Html) -> u32 {
    let Some(href) = document
        .select(&LAST_PAGE_SELECTOR)
        .next()
        .and_then(|a| a.value().attr("href"))
    else {
        return 0;
    };

    let token = href.rsplit('=').next().unwrap_or_default().trim();
    match token.parse::<u32>() {
        Ok(last_page) => last_page,
        Err(err) => {
            warn!("[Sise] Invalid last page link '{href}': {err}");
            0
        }
    }
}
