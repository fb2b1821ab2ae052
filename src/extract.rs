//! Turns a daily history page into [`DailyRecord`]s.
//!
//! Trading-day rows carry an `onmouseover` hover handler; header and spacer rows do not.
//! Cells are read in a fixed order: date, close, change, open, high, low, volume.

use std::sync::LazyLock;

use log::warn;
use scraper::{ElementRef, Html, Selector};

use crate::{
    data::daily::{DailyRecord, Direction, FieldAnomaly, Parsed, parse_number},
    error::{SdError, SdResult},
    utils::datetime::date_from_str,
};

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"table.type2 tr[onmouseover="mouseOver(this)"]"#)
        .expect("Invalid row selector")
});
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("Invalid cell selector"));
static VALUE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span:not(.blind)").expect("Invalid value selector"));
static INDICATOR_IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[alt]").expect("Invalid indicator selector"));
static INDICATOR_TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.blind").expect("Invalid indicator selector"));

const CELL_COUNT: usize = 7;

#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedRow {
    pub record: DailyRecord,
    pub anomalies: Vec<FieldAnomaly>,
}

/// Lazily yields one record per trading-day row, in page order.
/// Rows without a readable date are skipped; unreadable numbers become zero.
pub fn extract_rows(document: &Html) -> impl Iterator<Item = DailyRecord> + '_ {
    document
        .select(&ROW_SELECTOR)
        .filter_map(|row| match extract_row(row) {
            Ok(extracted) => {
                for anomaly in &extracted.anomalies {
                    warn!(
                        "[Extract] [{}] {anomaly}, defaulted to 0",
                        extracted.record.date
                    );
                }

                Some(extracted.record)
            }
            Err(err) => {
                warn!("[Extract] Row skipped: {err}");
                None
            }
        })
}

/// Parses the page text and collects its records, so the document tree never outlives the call.
pub fn extract_records(text: &str) -> Vec<DailyRecord> {
    let document = Html::parse_document(text);
    extract_rows(&document).collect()
}

pub fn extract_row(row: ElementRef) -> SdResult<ExtractedRow> {
    let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).take(CELL_COUNT).collect();

    let date_text = cells.first().map(|cell| cell_text(*cell)).unwrap_or_default();
    let date = date_from_str(&date_text).map_err(|_| SdError::Invalid {
        code: "INVALID_ROW_DATE",
        message: format!("Unable to parse row date '{date_text}'"),
    })?;

    let mut anomalies: Vec<FieldAnomaly> = vec![];
    let mut field = |index: usize, name: &'static str| -> i64 {
        let parsed = match cells.get(index) {
            Some(cell) => parse_number(&cell_text(*cell)),
            None => Parsed::Defaulted {
                raw: String::new(),
                reason: "missing cell".to_string(),
            },
        };

        if let Some(anomaly) = parsed.anomaly(name) {
            anomalies.push(anomaly);
        }

        parsed.into_value()
    };

    let close_price = field(1, "close_price");
    let change_magnitude = field(2, "change");
    let open_price = field(3, "open_price");
    let high_price = field(4, "high_price");
    let low_price = field(5, "low_price");
    let volume = field(6, "volume");

    let direction = cells
        .get(2)
        .map(|cell| cell_direction(*cell))
        .unwrap_or(Direction::Up);

    Ok(ExtractedRow {
        record: DailyRecord {
            date,
            close_price,
            change: direction.apply(change_magnitude),
            open_price,
            high_price,
            low_price,
            volume,
        },
        anomalies,
    })
}

/// Text of the value spans of a cell, or of the whole cell when it has none.
fn cell_text(cell: ElementRef) -> String {
    let mut spans = cell.select(&VALUE_SELECTOR).peekable();

    let text: String = if spans.peek().is_some() {
        spans.flat_map(|span| span.text()).collect()
    } else {
        cell.text().collect()
    };

    text.trim().to_string()
}

/// An indicator image's `alt` wins over hidden indicator text. A cell without any indicator
/// (no change against the previous day) keeps the positive sign.
fn cell_direction(cell: ElementRef) -> Direction {
    if let Some(alt) = cell
        .select(&INDICATOR_IMG_SELECTOR)
        .next()
        .and_then(|img| img.value().attr("alt"))
    {
        return Direction::from_indicator(alt);
    }

    if let Some(blind) = cell.select(&INDICATOR_TEXT_SELECTOR).next() {
        let indicator: String = blind.text().collect();
        return Direction::from_indicator(&indicator);
    }

    Direction::Up
}
