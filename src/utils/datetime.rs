use chrono::NaiveDate;

use crate::error::{SdError, SdResult};

/// Parses the `YYYY.MM.DD` dates of the history table.
pub fn date_from_str(s: &str) -> SdResult<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y.%m.%d").map_err(|err| SdError::Invalid {
        code: "INVALID_DATE",
        message: format!("Unable to parse date '{s}': {err}"),
    })
}

pub fn date_to_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn secs_to_human_str(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;

    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_str() {
        assert_eq!(
            date_to_str(&date_from_str("2024.01.15").unwrap()),
            "2024-01-15"
        );
        assert_eq!(
            date_to_str(&date_from_str(" 2024.01.15 ").unwrap()),
            "2024-01-15"
        );
        assert!(date_from_str("2024-01-15").is_err());
        assert!(date_from_str("2024.02.30").is_err());
        assert!(date_from_str("invalid-date").is_err());
        assert!(date_from_str("").is_err());
    }

    #[test]
    fn test_date_to_str() {
        assert_eq!(
            date_to_str(&NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
            "2023-01-01"
        );
        assert_eq!(
            date_to_str(&NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            "2023-12-31"
        );
    }

    #[test]
    fn test_secs_to_human_str() {
        assert_eq!(secs_to_human_str(0), "0s");
        assert_eq!(secs_to_human_str(59), "59s");
        assert_eq!(secs_to_human_str(90), "1m30s");
        assert_eq!(secs_to_human_str(3600), "1h0m0s");
        assert_eq!(secs_to_human_str(7325), "2h2m5s");
    }
}
