use std::time::Duration;

use log::{error, info, warn};
use rand::Rng;
use tokio::{
    sync::mpsc::{Receiver, Sender},
    time::sleep,
};

use crate::{
    data::{daily::DailyRecord, stock::StockRef},
    ds::sise::PageSource,
    store::{IndexStatus, RecordSink},
};

pub mod backfill;
pub mod poll;

#[cfg(test)]
pub(crate) mod fixtures;

pub enum CrawlEvent {
    Info(String),
    Warn(String),
    Page {
        stock: StockRef,
        page: u32,
        last_page: u32,
        records: usize,
    },
    Record(StockRef, DailyRecord),
    Summary(CrawlSummary),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrawlSummary {
    pub stocks: usize,
    pub pages: usize,
    pub records: usize,
    pub failed_pages: usize,
    pub failed_records: usize,
}

/// Everything one crawl pass needs; a single pass owns the only active connection to
/// the source, so requests never overlap.
pub struct CrawlContext<'a> {
    pub source: &'a dyn PageSource,
    pub sink: &'a dyn RecordSink,
    pub request_delay_secs: u64,
    pub event_sender: &'a Sender<CrawlEvent>,
}

pub struct CrawlStream {
    receiver: Receiver<CrawlEvent>,
}

impl CrawlContext<'_> {
    pub async fn info(&self, message: String) {
        info!("{message}");
        let _ = self.event_sender.send(CrawlEvent::Info(message)).await;
    }

    pub async fn warn(&self, message: String) {
        warn!("{message}");
        let _ = self.event_sender.send(CrawlEvent::Warn(message)).await;
    }

    pub async fn send(&self, event: CrawlEvent) {
        let _ = self.event_sender.send(event).await;
    }

    /// Index bootstrap failures are reported but never stop the crawl.
    pub async fn prepare_index(&self) {
        match self.sink.ensure_index().await {
            Ok(IndexStatus::Created) => self.info("[Store] Index created".to_string()).await,
            Ok(IndexStatus::Exists) => {}
            Err(err) => {
                error!("[Store] Prepare index error: {err}");
                let _ = self
                    .event_sender
                    .send(CrawlEvent::Warn(format!("[Store] Prepare index error: {err}")))
                    .await;
            }
        }
    }

    /// Writes one record; a failed write is counted and reported, never retried.
    pub async fn ingest(
        &self,
        stock: &StockRef,
        record: &DailyRecord,
        summary: &mut CrawlSummary,
    ) -> bool {
        match self.sink.ingest(stock, record).await {
            Ok(_) => {
                summary.records += 1;
                true
            }
            Err(err) => {
                summary.failed_records += 1;
                self.warn(format!("[{}] [{}] Ingest failed: {err}", stock.code, record.date))
                    .await;
                false
            }
        }
    }

    /// Sleeps a random duration below `request_delay_secs` to spread requests out.
    pub async fn pause(&self) {
        if self.request_delay_secs > 0 {
            let millis = rand::rng().random_range(0..self.request_delay_secs * 1000);
            sleep(Duration::from_millis(millis)).await;
        }
    }
}

impl CrawlStream {
    pub fn new(receiver: Receiver<CrawlEvent>) -> Self {
        Self { receiver }
    }

    pub async fn next(&mut self) -> Option<CrawlEvent> {
        self.receiver.recv().await
    }
}
