use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, Receiver};

use crate::{
    crawl::CrawlEvent,
    data::{daily::DailyRecord, stock::StockRef},
    ds::sise::PageSource,
    error::{SdError, SdResult},
    store::{IndexStatus, RecordSink},
};

pub struct Row<'a> {
    pub date: &'a str,
    pub close: &'a str,
    pub indicator: &'a str,
    pub change: &'a str,
}

pub fn page_html(rows: &[Row], last_page: Option<u32>) -> String {
    let rows: String = rows
        .iter()
        .map(|row| {
            format!(
                r#"<tr onmouseover="mouseOver(this)" onmouseout="mouseOut(this)">
<td align="center"><span class="tah p10 gray03">{}</span></td>
<td class="num"><span class="tah p11">{}</span></td>
<td class="num"><img src="ico.gif" alt="{}"><span class="tah p11">{}</span></td>
<td class="num"><span class="tah p11">1,000</span></td>
<td class="num"><span class="tah p11">1,100</span></td>
<td class="num"><span class="tah p11">900</span></td>
<td class="num"><span class="tah p11">12,345</span></td>
</tr>"#,
                row.date, row.close, row.indicator, row.change
            )
        })
        .collect();

    let navigation = last_page
        .map(|page| {
            format!(
                r#"<table class="Nnavi"><tr><td class="on"><a href="?page=1">1</a></td><td class="pgRR"><a href="/item/sise_day.naver?code=005930&page={page}">last</a></td></tr></table>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><body><table class="type2"><tr><th>date</th></tr><tr><td colspan="7"></td></tr>{rows}</table>{navigation}</body></html>"#
    )
}

/// Pages keyed by `(code, page)`; `failures` makes the next N fetches of a page fail.
#[derive(Default)]
pub struct FakeSource {
    pub pages: HashMap<(String, u32), String>,
    pub failures: Mutex<HashMap<(String, u32), usize>>,
    pub calls: Mutex<Vec<(String, u32)>>,
}

impl FakeSource {
    pub fn with_page(mut self, code: &str, page: u32, html: String) -> Self {
        self.pages.insert((code.to_string(), page), html);
        self
    }

    pub fn with_failures(self, code: &str, page: u32, times: usize) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert((code.to_string(), page), times);
        self
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn fetch_page(&self, code: &str, page: u32) -> SdResult<String> {
        let key = (code.to_string(), page);
        self.calls.lock().unwrap().push(key.clone());

        if let Some(remaining) = self.failures.lock().unwrap().get_mut(&key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SdError::HttpStatusError {
                    status: "503 Service Unavailable".to_string(),
                    request: format!("GET {code}#{page}"),
                });
            }
        }

        self.pages.get(&key).cloned().ok_or(SdError::HttpStatusError {
            status: "404 Not Found".to_string(),
            request: format!("GET {code}#{page}"),
        })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub fail: bool,
    pub records: Mutex<Vec<(String, DailyRecord)>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<(String, DailyRecord)> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn ensure_index(&self) -> SdResult<IndexStatus> {
        Ok(IndexStatus::Exists)
    }

    async fn ingest(&self, stock: &StockRef, record: &DailyRecord) -> SdResult<()> {
        if self.fail {
            return Err(SdError::HttpStatusError {
                status: "500 Internal Server Error".to_string(),
                request: "POST /stock/daily".to_string(),
            });
        }

        self.records
            .lock()
            .unwrap()
            .push((stock.code.clone(), record.clone()));
        Ok(())
    }
}

pub fn event_channel() -> (mpsc::Sender<CrawlEvent>, Receiver<CrawlEvent>) {
    mpsc::channel(1024)
}

pub fn drain(receiver: &mut Receiver<CrawlEvent>) -> Vec<CrawlEvent> {
    let mut events = vec![];
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
