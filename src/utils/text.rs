pub fn is_ascii_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Left-pads `text` with zeros up to `width` characters; longer text is returned unchanged.
pub fn zero_pad(text: &str, width: usize) -> String {
    format!("{text:0>width$}")
}

/// Trims whitespace and drops thousands separators, e.g. `" 1,234 "` -> `"1234"`.
pub fn strip_number(text: &str) -> String {
    text.trim().chars().filter(|c| *c != ',').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ascii_digits() {
        assert!(is_ascii_digits("1234567890"));
        assert!(!is_ascii_digits(""));
        assert!(!is_ascii_digits("xyz"));
        assert!(!is_ascii_digits("123.xyz"));
    }

    #[test]
    fn test_zero_pad() {
        assert_eq!(zero_pad("5930", 6), "005930");
        assert_eq!(zero_pad("005930", 6), "005930");
        assert_eq!(zero_pad("1234567", 6), "1234567");
        assert_eq!(zero_pad("", 6), "000000");
    }

    #[test]
    fn test_strip_number() {
        assert_eq!(strip_number(" 1,234 "), "1234");
        assert_eq!(strip_number("12,345,678"), "12345678");
        assert_eq!(strip_number("\n\t-\t"), "-");
    }
}
