//! Unit conversion, product, aggregation, and rounding rules
//!
//! Every function here is pure and total: invalid numeric input degrades to
//! zero or an empty result, never an error. Amounts travel through the record
//! as strings, so the formatting helpers live here too.

/// Square feet per square metre
pub const SQFT_PER_SQM: f64 = 10.7639;

/// Parse an amount field, treating missing or non-numeric input as 0
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert an area from square metres to square feet
///
/// Defined only for positive input; callers leave the target field untouched
/// when this returns `None`. The conversion is one-directional: editing the
/// sqft side never back-computes sqm.
pub fn convert_area_unit(sqm: f64) -> Option<f64> {
    if sqm > 0.0 {
        Some(round2(sqm * SQFT_PER_SQM))
    } else {
        None
    }
}

/// Quantity times rate, formatted to 2 decimals
///
/// Missing operands are treated as 0. A non-positive result renders as the
/// empty string rather than "0".
pub fn product(qty: f64, rate: f64) -> String {
    let value = round2(qty * rate);
    if value > 0.0 {
        format_amount(value)
    } else {
        String::new()
    }
}

/// Sum a series of amounts, formatted to 2 decimals
///
/// An empty series or an all-zero total renders as the empty string. This is
/// what keeps untouched TOTAL fields blank on the form instead of showing "0".
pub fn sum<I: IntoIterator<Item = f64>>(values: I) -> String {
    let total = round2(values.into_iter().sum());
    if total == 0.0 {
        String::new()
    } else {
        format_amount(total)
    }
}

/// Round to the nearest thousand
pub fn round_to_thousand(value: f64) -> f64 {
    (value / 1000.0).round() * 1000.0
}

/// Fraction of a value, used for the cascading valuation outputs
/// (1.0, 0.9, 0.8, 0.35)
pub fn percent_of(value: f64, fraction: f64) -> f64 {
    value * fraction
}

/// Format an amount with 2 decimal places
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format a rounded amount without decimals
pub fn format_whole(value: f64) -> String {
    format!("{}", value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_amount() {
        assert_relative_eq!(parse_amount("123.45"), 123.45);
        assert_relative_eq!(parse_amount("  42 "), 42.0);
        assert_relative_eq!(parse_amount(""), 0.0);
        assert_relative_eq!(parse_amount("n/a"), 0.0);
    }

    #[test]
    fn test_convert_area_unit() {
        assert_relative_eq!(convert_area_unit(100.0).unwrap(), 1076.39);
        assert_relative_eq!(convert_area_unit(1.0).unwrap(), 10.76);
        assert_eq!(convert_area_unit(0.0), None);
        assert_eq!(convert_area_unit(-5.0), None);
    }

    #[test]
    fn test_product() {
        assert_eq!(product(100.0, 50.0), "5000.00");
        assert_eq!(product(2.5, 4.0), "10.00");
        assert_eq!(product(0.0, 50.0), "");
        assert_eq!(product(100.0, 0.0), "");
    }

    #[test]
    fn test_sum_empty_and_zero() {
        assert_eq!(sum(Vec::new()), "");
        assert_eq!(sum(vec![0.0, 0.0, 0.0]), "");
        assert_eq!(sum(vec![5000.0, 12000.0]), "17000.00");
        assert_eq!(sum(vec![1.005, 2.005]), "3.01");
    }

    #[test]
    fn test_round_to_thousand() {
        assert_relative_eq!(round_to_thousand(123456.0), 123000.0);
        assert_relative_eq!(round_to_thousand(123500.0), 124000.0);
        assert_relative_eq!(round_to_thousand(0.0), 0.0);
        assert_relative_eq!(round_to_thousand(999.0), 1000.0);
    }

    #[test]
    fn test_percent_of() {
        assert_relative_eq!(percent_of(123000.0, 1.0), 123000.0);
        assert_relative_eq!(percent_of(123000.0, 0.9), 110700.0);
        assert_relative_eq!(percent_of(123000.0, 0.8), 98400.0);
        assert_relative_eq!(percent_of(123000.0, 0.35), 43050.0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_amount(17000.0), "17000.00");
        assert_eq!(format_whole(123000.0), "123000");
    }
}
