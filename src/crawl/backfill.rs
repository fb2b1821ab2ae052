use log::debug;

use crate::{
    crawl::{CrawlContext, CrawlEvent, CrawlSummary},
    data::stock::StockRef,
    ds::sise::resolve_last_page,
    extract::extract_records,
};

/// Walks every history page of every stock once, oldest page last.
///
/// A stock whose page count cannot be resolved is crawled as a single page, and a page
/// that fails to load is skipped; neither stops the pass.
pub async fn backfill(context: &CrawlContext<'_>, stocks: &[StockRef]) -> CrawlSummary {
    let mut summary = CrawlSummary::default();

    for stock in stocks {
        summary.stocks += 1;

        let last_page = match resolve_last_page(context.source, &stock.code).await {
            Ok(0) => {
                debug!("[{stock}] No pagination control, single page");
                1
            }
            Ok(last_page) => last_page,
            Err(err) => {
                context
                    .warn(format!("[{stock}] Resolve pages failed, crawl page 1 only: {err}"))
                    .await;
                1
            }
        };

        context
            .info(format!("[{stock}] {last_page} page(s) to crawl"))
            .await;

        for page in 1..=last_page {
            match context.source.fetch_page(&stock.code, page).await {
                Ok(text) => {
                    summary.pages += 1;

                    let records = extract_records(&text);
                    for record in &records {
                        context.ingest(stock, record, &mut summary).await;
                    }

                    context
                        .send(CrawlEvent::Page {
                            stock: stock.clone(),
                            page,
                            last_page,
                            records: records.len(),
                        })
                        .await;
                }
                Err(err) => {
                    summary.failed_pages += 1;
                    context
                        .warn(format!("[{stock}] Page {page}/{last_page} skipped: {err}"))
                        .await;
                }
            }

            context.pause().await;
        }
    }

    summary
}
