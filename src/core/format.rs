//! Display formatting in Argentine Spanish style (`1.234,50`).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Currencies without a minor unit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["PYG"];

pub fn fraction_digits(code: &str) -> usize {
    if ZERO_DECIMAL_CURRENCIES.contains(&code) {
        0
    } else {
        2
    }
}

/// Formats a converted amount using the fraction digits of `code`.
pub fn format_amount(value: f64, code: &str) -> String {
    format_decimal(value, fraction_digits(code))
}

/// Formats a plain number with two fraction digits.
pub fn format_number(value: f64) -> String {
    format_decimal(value, 2)
}

/// Rounds half away from zero, then groups thousands with `.` and separates
/// decimals with `,`.
///
/// Rounding works on the shortest decimal form of `value`, so `1.005` is
/// `1,01` even though the nearest `f64` sits just below it.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let (negative, digits) = match Decimal::from_str(&value.to_string()) {
        Ok(exact) => {
            let rounded = exact
                .round_dp_with_strategy(decimals as u32, RoundingStrategy::MidpointAwayFromZero);
            (
                rounded.is_sign_negative() && !rounded.is_zero(),
                format!("{:.*}", decimals, rounded.abs()),
            )
        }
        // Beyond the range of Decimal; fraction digits are noise at this size anyway
        Err(_) => {
            let digits = format!("{:.*}", decimals, value.abs());
            let nonzero = digits.bytes().any(|b| matches!(b, b'1'..=b'9'));
            (value < 0.0 && nonzero, digits)
        }
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if decimals > 0 {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// `2025-03-14` becomes `14/03/2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Rough age of a capture time, for stale data notices.
pub fn describe_age(captured_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(captured_at);
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };

    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        plural(elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        plural(elapsed.num_hours(), "hour")
    } else {
        plural(elapsed.num_days(), "day")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_pyg_has_no_fraction_digits() {
        assert_eq!(format_amount(1234.5, "PYG"), "1.235");
        assert_eq!(format_amount(1234.5, "USD"), "1.234,50");
    }

    #[test]
    fn test_grouping_and_small_values() {
        assert_eq!(format_number(0.0), "0,00");
        assert_eq!(format_number(0.004), "0,00");
        assert_eq!(format_number(0.5), "0,50");
        assert_eq!(format_number(999.999), "1.000,00");
        assert_eq!(format_number(1234567.891), "1.234.567,89");
        assert_eq!(format_amount(7692307.69, "PYG"), "7.692.308");
    }

    #[test]
    fn test_midpoints_round_on_the_decimal_form() {
        assert_eq!(format_number(1.005), "1,01");
        assert_eq!(format_number(1.255), "1,26");
        assert_eq!(format_number(0.285), "0,29");
        assert_eq!(format_number(10.075), "10,08");
        assert_eq!(format_number(-10.075), "-10,08");
        assert_eq!(format_amount(2.5, "PYG"), "3");
        assert_eq!(format_amount(-2.5, "PYG"), "-3");
    }

    #[test]
    fn test_values_beyond_decimal_range() {
        let formatted = format_amount(1e30, "PYG");
        assert!(formatted.starts_with("1.000.000.000.000.000."));
        assert_eq!(formatted.len(), 31 + 10);
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_number(-1234.5), "-1.234,50");
        assert_eq!(format_number(-0.001), "0,00");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(format_date(date), "04/03/2025");
    }

    #[test]
    fn test_describe_age() {
        let now = Utc::now();
        assert_eq!(describe_age(now - Duration::seconds(20), now), "just now");
        assert_eq!(describe_age(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(describe_age(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(describe_age(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(describe_age(now - Duration::days(3), now), "3 days ago");
    }
}
