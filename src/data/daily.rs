use std::fmt::Display;

use chrono::NaiveDate;
use serde::Serialize;

use crate::utils::{datetime::date_to_str, text::strip_number};

/// Indicator texts the source uses for a rise against the previous day.
static UP_INDICATORS: &[&str] = &["상승", "상한"];

/// One trading day of one stock, in the shape written to the index.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,

    #[serde(rename = "endPrice")]
    pub close_price: i64,

    #[serde(rename = "compareYesterday")]
    pub change: i64,

    #[serde(rename = "price")]
    pub open_price: i64,

    #[serde(rename = "highPrice")]
    pub high_price: i64,

    #[serde(rename = "lowPrice")]
    pub low_price: i64,

    #[serde(rename = "tradeCount")]
    pub volume: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

/// Result of parsing a single cell: either the value or a zero default with the reason.
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    Defaulted { raw: String, reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldAnomaly {
    pub field: &'static str,
    pub raw: String,
    pub reason: String,
}

impl Display for DailyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} close={} change={:+} open={} high={} low={} volume={}",
            date_to_str(&self.date),
            self.close_price,
            self.change,
            self.open_price,
            self.high_price,
            self.low_price,
            self.volume
        )
    }
}

impl Direction {
    /// Anything other than a recognised "up" indicator counts as down.
    pub fn from_indicator(indicator: &str) -> Self {
        if UP_INDICATORS.contains(&indicator.trim()) {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn apply(&self, magnitude: i64) -> i64 {
        match self {
            Self::Up => magnitude.abs(),
            Self::Down => -magnitude.abs(),
        }
    }
}

impl<T: Default> Parsed<T> {
    pub fn into_value(self) -> T {
        match self {
            Self::Value(v) => v,
            Self::Defaulted { .. } => T::default(),
        }
    }

    pub fn anomaly(&self, field: &'static str) -> Option<FieldAnomaly> {
        match self {
            Self::Value(_) => None,
            Self::Defaulted { raw, reason } => Some(FieldAnomaly {
                field,
                raw: raw.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

impl Display for FieldAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}': {}", self.field, self.raw, self.reason)
    }
}

pub fn parse_number(text: &str) -> Parsed<i64> {
    match strip_number(text).parse::<i64>() {
        Ok(v) => Parsed::Value(v),
        Err(err) => Parsed::Defaulted {
            raw: text.to_string(),
            reason: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 1,234 "), Parsed::Value(1234));
        assert_eq!(parse_number("0"), Parsed::Value(0));
        assert_eq!(parse_number("15,234,567"), Parsed::Value(15234567));

        let parsed = parse_number("-");
        assert_eq!(parsed.anomaly("close_price").unwrap().raw, "-");
        assert_eq!(parsed.into_value(), 0);

        assert!(parse_number("").anomaly("volume").is_some());
        assert!(parse_number("12.5").anomaly("volume").is_some());
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::from_indicator("상승"), Direction::Up);
        assert_eq!(Direction::from_indicator(" 상한 "), Direction::Up);
        assert_eq!(Direction::from_indicator("하락"), Direction::Down);
        assert_eq!(Direction::from_indicator("하한"), Direction::Down);
        assert_eq!(Direction::from_indicator("???"), Direction::Down);
        assert_eq!(Direction::from_indicator(""), Direction::Down);

        assert_eq!(Direction::Up.apply(1500), 1500);
        assert_eq!(Direction::Down.apply(1500), -1500);
        assert_eq!(Direction::Down.apply(0), 0);
    }

    #[test]
    fn test_serialize() {
        let record = DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            close_price: 73000,
            change: -500,
            open_price: 73500,
            high_price: 74000,
            low_price: 72800,
            volume: 10234567,
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "date": "2024-01-15",
                "endPrice": 73000,
                "compareYesterday": -500,
                "price": 73500,
                "highPrice": 74000,
                "lowPrice": 72800,
                "tradeCount": 10234567,
            })
        );
        assert_eq!(
            record.to_string(),
            "2024-01-15 close=73000 change=-500 open=73500 high=74000 low=72800 volume=10234567"
        );
    }
}
