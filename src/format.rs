//! Number formatting for chart annotations.

use num_format::{Locale, ToFormattedString};

/// Fixed-point formatting, e.g. `fixed(81.234, 1) == "81.2"`.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Fixed-point formatting with English thousands separators, e.g. `2,450.50`.
///
/// Rounds first and groups afterwards so carries (`999.996` -> `1,000.00`) land
/// in the integer part.
pub fn grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return fixed(value, decimals);
    }
    let plain = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };
    let Ok(int_value) = int_part.parse::<u64>() else {
        return fixed(value, decimals);
    };
    let mut out = String::new();
    if value.is_sign_negative() && plain.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    out.push_str(&int_value.to_formatted_string(&Locale::en));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Share in `[0, 1]` rendered as a whole percentage, e.g. `0.254 -> "25%"`.
pub fn percent(share: f64) -> String {
    format!("{:.0}%", share * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_inserts_separators_and_keeps_decimals() {
        assert_eq!(grouped(2450.5, 2), "2,450.50");
        assert_eq!(grouped(1234567.0, 0), "1,234,567");
        assert_eq!(grouped(999.996, 2), "1,000.00");
        assert_eq!(grouped(-1500.26, 1), "-1,500.3");
        assert_eq!(grouped(12.0, 2), "12.00");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(grouped(-0.001, 2), "0.00");
    }

    #[test]
    fn percent_rounds_to_whole() {
        assert_eq!(percent(0.254), "25%");
        assert_eq!(percent(1.0), "100%");
    }
}
