use std::path::Path;

use log::debug;
use tokio::sync::mpsc;

pub use crate::{
    crawl::{CrawlEvent, CrawlStream, CrawlSummary},
    data::{daily::DailyRecord, stock::StockRef},
};
use crate::{
    CHANNEL_BUFFER_DEFAULT, CONFIG,
    config::{self, SdConfig},
    crawl::{
        CrawlContext,
        backfill::backfill as backfill_stocks,
        poll::{LocalClock, run_poll},
    },
    ds::sise::{PageSource, SiseClient},
    error::{SdError, SdResult},
    registry::load_registry,
    store::{IndexStore, load_schema},
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum CrawlMode {
    Backfill,
    Poll,
    BackfillThenPoll,
}

/// One-time pass over every history page of every registered stock.
pub async fn backfill() -> SdResult<CrawlStream> {
    crawl(CrawlMode::Backfill).await
}

/// Daily poll loop; the returned stream never ends.
pub async fn poll() -> SdResult<CrawlStream> {
    crawl(CrawlMode::Poll).await
}

/// Backfill followed by the daily poll loop.
pub async fn run() -> SdResult<CrawlStream> {
    crawl(CrawlMode::BackfillThenPoll).await
}

pub async fn stocks() -> SdResult<Vec<StockRef>> {
    let registry_path = { CONFIG.read().await.registry_path.clone() };
    load_registry(Path::new(&registry_path))
}

pub async fn check() -> SdResult<Vec<(String, Option<SdError>)>> {
    let config = { CONFIG.read().await.clone() };
    let mut status: Vec<(String, Option<SdError>)> = vec![];

    let probe_code = match load_registry(Path::new(&config.registry_path)) {
        Ok(stocks) => {
            status.push((format!("Registry ({} stocks)", stocks.len()), None));
            stocks.first().map(|stock| stock.code.clone())
        }
        Err(err) => {
            status.push(("Registry".to_string(), Some(err)));
            None
        }
    };

    status.push((
        "Schema".to_string(),
        load_schema(Path::new(&config.schema_path)).err(),
    ));

    let source = SiseClient::from_config(&config);
    let probe_code = probe_code.unwrap_or("005930".to_string());
    status.push((
        format!("Source ({probe_code})"),
        source.fetch_page(&probe_code, 1).await.err(),
    ));

    let store = IndexStore::from_config(&config);
    status.push(("Store".to_string(), store.ping().await.err()));

    Ok(status)
}

pub async fn get_config() -> SdResult<SdConfig> {
    Ok(CONFIG.read().await.clone())
}

pub async fn set_config(key: &str, value: &str) -> SdResult<()> {
    let mut config = CONFIG.write().await;

    let mut updated = config.clone();
    updated.set(key, value)?;
    config::store(&updated)?;

    *config = updated;
    Ok(())
}

async fn crawl(mode: CrawlMode) -> SdResult<CrawlStream> {
    let config = { CONFIG.read().await.clone() };
    let stocks = load_registry(Path::new(&config.registry_path))?;
    debug!("[{mode:?}] {} stocks loaded", stocks.len());

    let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_DEFAULT);

    tokio::spawn(async move {
        let source = SiseClient::from_config(&config);
        let sink = IndexStore::from_config(&config);
        let context = CrawlContext {
            source: &source,
            sink: &sink,
            request_delay_secs: config.request_delay_secs,
            event_sender: &sender,
        };

        context.prepare_index().await;

        if matches!(mode, CrawlMode::Backfill | CrawlMode::BackfillThenPoll) {
            let summary = backfill_stocks(&context, &stocks).await;
            context.send(CrawlEvent::Summary(summary)).await;
        }

        if matches!(mode, CrawlMode::Poll | CrawlMode::BackfillThenPoll) {
            run_poll(
                &context,
                &stocks,
                &LocalClock,
                config.poll_hour,
                config.poll_interval_secs,
            )
            .await;
        }
    });

    Ok(CrawlStream::new(receiver))
}
