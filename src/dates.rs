//! Lenient date parsing shared by the reconciliation modules.
//!
//! Every helper here is total: a value that doesn't look like a date
//! yields `None`, never an error. Upstream spreadsheets mix `2024-03-31`,
//! `2024.03.31`, `20240331`, and Excel leftovers in the same column, so
//! the parsers accept all of them and shrug at the rest.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

// Compile-once regex patterns via OnceLock.
fn re_iso_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap())
}

fn re_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9]").unwrap())
}

/// Parse a date in any of the formats the upstream spreadsheets produce.
///
/// Accepts `YYYY-MM-DD`, `YYYY.MM.DD`, `YYYY/MM/DD`, and bare `YYYYMMDD`.
/// Anything else (including empty strings) is `None`.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }

    // Bare 8-digit form, possibly with stray separators already mixed in.
    let digits = re_digits().replace_all(raw, "");
    if digits.len() == 8 {
        if let Ok(d) = NaiveDate::parse_from_str(&digits, "%Y%m%d") {
            return Some(d);
        }
    }

    log::debug!("unparseable date ignored: {:?}", raw);
    None
}

/// Find the first `YYYY-MM-DD` substring in free text.
///
/// Used to recover resignation dates that a column shift pushed into a
/// notes-like field.
pub fn extract_iso_date(text: &str) -> Option<String> {
    re_iso_date().find(text).map(|m| m.as_str().to_string())
}

/// Normalize a birth date to 8 digits (`YYYYMMDD`), or `None`.
///
/// Strips every non-digit first. Accepts an 8-digit form with a year in
/// 1900..=2030, or a 6-digit `YYMMDD` form where `YY < 30` means the
/// 2000s. Month and day are range-checked; out of range means absent.
pub fn normalize_birth_date(raw: &str) -> Option<String> {
    let digits = re_digits().replace_all(raw, "");

    let full = match digits.len() {
        8 => digits.to_string(),
        6 => {
            let yy: u32 = digits[0..2].parse().ok()?;
            let century = if yy < 30 { "20" } else { "19" };
            format!("{}{}", century, digits)
        }
        _ => return None,
    };

    let year: u32 = full[0..4].parse().ok()?;
    let month: u32 = full[4..6].parse().ok()?;
    let day: u32 = full[6..8].parse().ok()?;
    if !(1900..=2030).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(parse_flexible_date("2024-03-31"), Some(expected));
        assert_eq!(parse_flexible_date("2024.03.31"), Some(expected));
        assert_eq!(parse_flexible_date("2024/03/31"), Some(expected));
        assert_eq!(parse_flexible_date("20240331"), Some(expected));
        assert_eq!(parse_flexible_date(" 2024-03-31 "), Some(expected));
    }

    #[test]
    fn test_parse_flexible_date_garbage() {
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("재직중"), None);
        assert_eq!(parse_flexible_date("2024-13-01"), None);
        assert_eq!(parse_flexible_date("31-03-2024"), None);
    }

    #[test]
    fn test_extract_iso_date() {
        assert_eq!(
            extract_iso_date("퇴사 2024-03-31 처리"),
            Some("2024-03-31".to_string())
        );
        assert_eq!(extract_iso_date("특이사항 없음"), None);
        // First match wins
        assert_eq!(
            extract_iso_date("2023-01-01 → 2024-02-02"),
            Some("2023-01-01".to_string())
        );
    }

    #[test]
    fn test_normalize_birth_date_eight_digits() {
        assert_eq!(normalize_birth_date("19900101"), Some("19900101".into()));
        assert_eq!(normalize_birth_date("1990-01-01"), Some("19900101".into()));
        assert_eq!(normalize_birth_date("1990.01.01"), Some("19900101".into()));
    }

    #[test]
    fn test_normalize_birth_date_six_digit_pivot() {
        // YY < 30 → 2000s, YY >= 30 → 1900s
        assert_eq!(normalize_birth_date("050315"), Some("20050315".into()));
        assert_eq!(normalize_birth_date("900101"), Some("19900101".into()));
        assert_eq!(normalize_birth_date("290101"), Some("20290101".into()));
        assert_eq!(normalize_birth_date("300101"), Some("19300101".into()));
    }

    #[test]
    fn test_normalize_birth_date_rejects() {
        assert_eq!(normalize_birth_date(""), None);
        assert_eq!(normalize_birth_date("홍길동"), None);
        assert_eq!(normalize_birth_date("18991231"), None); // year too old
        assert_eq!(normalize_birth_date("19901301"), None); // month 13
        assert_eq!(normalize_birth_date("19900132"), None); // day 32
        assert_eq!(normalize_birth_date("1990"), None); // too short
    }
}
