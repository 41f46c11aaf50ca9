// src/app/utils.rs
use chrono::NaiveDate;

/// Pull the year out of an API date string ("2019-07-30" → 2019).
pub(crate) fn release_year(date: &str) -> Option<i32> {
    let year = date.split('-').next()?;
    if year.len() != 4 {
        return None;
    }
    year.parse().ok()
}

/// "2019-07-30" → "July 30, 2019". Falls back to the raw string for anything
/// the API sends that isn't a proper date.
pub(crate) fn format_release_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Compact USD, the way the detail view shows budget/revenue:
/// 950 → "$950", 1_500_000 → "$1.5M", 2_000_000_000 → "$2B".
pub(crate) fn format_compact_usd(amount: u64) -> String {
    fn scaled(v: f64, suffix: &str) -> String {
        let s = format!("{v:.1}");
        let s = s.strip_suffix(".0").unwrap_or(&s);
        format!("${s}{suffix}")
    }
    let a = amount as f64;
    if amount >= 1_000_000_000 {
        scaled(a / 1e9, "B")
    } else if amount >= 1_000_000 {
        scaled(a / 1e6, "M")
    } else if amount >= 1_000 {
        scaled(a / 1e3, "K")
    } else {
        format!("${amount}")
    }
}

/// 134 → "2h 14m"; sub-hour runtimes stay in minutes.
pub(crate) fn format_runtime(mins: u32) -> String {
    let h = mins / 60;
    let m = mins % 60;
    if h > 0 {
        format!("{h}h {m:02}m")
    } else {
        format!("{m} min")
    }
}

/// Thousands separators for vote counts (12345 → "12,345").
pub(crate) fn format_count(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_from_api_date() {
        assert_eq!(release_year("1994-09-23"), Some(1994));
        assert_eq!(release_year(""), None);
        assert_eq!(release_year("soon"), None);
    }

    #[test]
    fn compact_usd_rounds_and_trims() {
        assert_eq!(format_compact_usd(0), "$0");
        assert_eq!(format_compact_usd(950), "$950");
        assert_eq!(format_compact_usd(63_000_000), "$63M");
        assert_eq!(format_compact_usd(1_550_000), "$1.6M");
        assert_eq!(format_compact_usd(2_000_000_000), "$2B");
    }

    #[test]
    fn runtime_formats() {
        assert_eq!(format_runtime(134), "2h 14m");
        assert_eq!(format_runtime(45), "45 min");
        assert_eq!(format_runtime(120), "2h 00m");
    }

    #[test]
    fn counts_get_separators() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1_234), "1,234");
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    #[test]
    fn bad_dates_fall_through() {
        assert_eq!(format_release_date("n/a"), "n/a");
        assert_eq!(format_release_date("1994-09-23"), "September 23, 1994");
    }
}
