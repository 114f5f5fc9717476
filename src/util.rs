// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" CSV/number handling so the rest of
// the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values containing letters other than an exponent marker.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed or is not finite.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a head count. Exports often write integers as `"1234.0"`, so this goes
/// through `f64` and rounds to the nearest whole person.
pub fn parse_count_safe(s: Option<&str>) -> Option<i64> {
    let v = parse_f64_safe(s)?;
    if v.abs() > i64::MAX as f64 {
        return None;
    }
    Some(v.round() as i64)
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>()
        .ok()
        .or_else(|| match parse_f64_safe(Some(s)) {
            Some(v) if v.fract() == 0.0 && v.abs() <= i32::MAX as f64 => Some(v as i32),
            _ => None,
        })
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Smallest and largest value, or `None` for an empty slice.
pub fn min_max(v: &[f64]) -> Option<(f64, f64)> {
    let first = *v.first()?;
    Some(
        v.iter()
            .fold((first, first), |(lo, hi), x| (lo.min(*x), hi.max(*x))),
    )
}

/// Min-max scale `x` into `[0, 1]`. A zero-width range maps to the midpoint 0.5.
///
/// Only exactly equal bounds count as zero-width: ratios such as need
/// prevalence can legitimately differ by less than `f64::EPSILON`.
pub fn min_max_scale(x: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.5;
    }
    ((x - min) / (max - min)).clamp(0.0, 1.0)
}

pub fn sort_f64(v: &mut [f64]) {
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Quantile `q` (0..=1) of an ascending slice using linear interpolation
/// between closest ranks. Returns 0 for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Render a ratio as a percentage, e.g. `0.517` -> `51.7%`.
pub fn format_pct(ratio: f64) -> String {
    format!("{}%", format_number(ratio * 100.0, 1))
}

/// Render an optional value, or `-` when absent.
pub fn format_opt<T, F>(v: Option<T>, f: F) -> String
where
    F: FnOnce(T) -> String,
{
    v.map(f).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thousands_separators_and_exponents() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("5.6e8")), Some(5.6e8));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn counts_accept_float_notation() {
        assert_eq!(parse_count_safe(Some("47500000.0")), Some(47_500_000));
        assert_eq!(parse_count_safe(Some("-3")), Some(-3));
        assert_eq!(parse_i32_safe(Some("2026.0")), Some(2026));
        assert_eq!(parse_i32_safe(Some("2026.5")), None);
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let v = [0.2, 0.5, 0.8];
        assert!((quantile_sorted(&v, 0.25) - 0.35).abs() < 1e-12);
        assert!((quantile_sorted(&v, 0.5) - 0.5).abs() < 1e-12);
        assert!((quantile_sorted(&v, 0.75) - 0.65).abs() < 1e-12);
        assert_eq!(quantile_sorted(&[0.4], 0.75), 0.4);
        assert_eq!(quantile_sorted(&[], 0.5), 0.0);
    }

    #[test]
    fn scale_handles_zero_width_range() {
        assert_eq!(min_max_scale(3.0, 3.0, 3.0), 0.5);
        assert_eq!(min_max_scale(0.2, 0.2, 0.8), 0.0);
        assert_eq!(min_max_scale(0.8, 0.2, 0.8), 1.0);
        assert_eq!(min_max(&[]), None);
        assert_eq!(min_max(&[2.0, -1.0, 5.0]), Some((-1.0, 5.0)));
    }

    #[test]
    fn scale_separates_ranges_narrower_than_epsilon() {
        let (lo, hi) = (1e-17, 2e-17);
        assert!(hi - lo < f64::EPSILON);
        assert_eq!(min_max_scale(lo, lo, hi), 0.0);
        assert_eq!(min_max_scale(hi, lo, hi), 1.0);
        assert!((min_max_scale(1.5e-17, lo, hi) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-0.5, 1), "-0.5");
        assert_eq!(format_number(-0.0001, 2), "0.00");
        assert_eq!(format_int(9855u64), "9,855");
        assert_eq!(format_pct(0.517), "51.7%");
    }
}
