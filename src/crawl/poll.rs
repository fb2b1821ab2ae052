use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use log::debug;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    crawl::{CrawlContext, CrawlEvent, CrawlSummary},
    data::stock::StockRef,
    extract::extract_records,
    utils::datetime::date_to_str,
};

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct LocalClock;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PollState {
    Idle,
    Polling,
}

/// Decides when a daily pass is due: once per calendar day, at or after `poll_hour`.
#[derive(Debug)]
pub struct PollScheduler {
    poll_hour: u32,
    state: PollState,
    last_polled: Option<NaiveDate>,
}

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl PollScheduler {
    pub fn new(poll_hour: u32) -> Self {
        Self {
            poll_hour,
            state: PollState::Idle,
            last_polled: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn last_polled(&self) -> Option<NaiveDate> {
        self.last_polled
    }

    /// Moves Idle -> Polling when due and returns the date the pass is for.
    pub fn begin(&mut self, now: NaiveDateTime) -> Option<NaiveDate> {
        let today = now.date();

        if self.state == PollState::Idle
            && now.hour() >= self.poll_hour
            && self.last_polled != Some(today)
        {
            self.state = PollState::Polling;
            Some(today)
        } else {
            None
        }
    }

    /// Moves back to Idle once a full pass over all stocks is done.
    pub fn finish(&mut self, date: NaiveDate) {
        self.state = PollState::Idle;
        self.last_polled = Some(date);
    }
}

/// Re-reads page 1 of every stock and ingests only the row dated `today`.
pub async fn poll_today(
    context: &CrawlContext<'_>,
    stocks: &[StockRef],
    today: NaiveDate,
) -> CrawlSummary {
    let mut summary = CrawlSummary::default();

    for stock in stocks {
        summary.stocks += 1;

        match context.source.fetch_page(&stock.code, 1).await {
            Ok(text) => {
                summary.pages += 1;

                let record = extract_records(&text)
                    .into_iter()
                    .find(|record| record.date == today);
                if let Some(record) = record {
                    if context.ingest(stock, &record, &mut summary).await {
                        context.send(CrawlEvent::Record(stock.clone(), record)).await;
                    }
                } else {
                    context
                        .info(format!("[{stock}] No record for {}", date_to_str(&today)))
                        .await;
                }
            }
            Err(err) => {
                summary.failed_pages += 1;
                context
                    .warn(format!(
                        "[{stock}] Poll of {} skipped: {err}",
                        date_to_str(&today)
                    ))
                    .await;
            }
        }

        context.pause().await;
    }

    summary
}

/// Checks the clock every `interval_secs` forever and runs one pass per day past `poll_hour`.
pub async fn run_poll(
    context: &CrawlContext<'_>,
    stocks: &[StockRef],
    clock: &dyn Clock,
    poll_hour: u32,
    interval_secs: u64,
) {
    let mut scheduler = PollScheduler::new(poll_hour);

    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    context
        .info(format!("[Poll] Waiting for {poll_hour:02}:00 every day"))
        .await;

    loop {
        ticker.tick().await;

        let now = clock.now();
        if let Some(today) = scheduler.begin(now) {
            context
                .info(format!("[Poll] Start pass for {}", date_to_str(&today)))
                .await;

            let summary = poll_today(context, stocks, today).await;
            context.send(CrawlEvent::Summary(summary)).await;

            scheduler.finish(today);
        } else {
            debug!(
                "[Poll] {:?} at {now}, last polled {:?}",
                scheduler.state(),
                scheduler.last_polled()
            );
        }
    }
}
