//! Amount helpers.
//!
//! Card amounts travel in minor units (cents); PayPal amounts and email
//! summaries use decimal strings with two places.

/// Smallest chargeable amount in minor units ($0.50).
pub const MIN_CHARGE_AMOUNT: i64 = 50;

/// Formats minor units as a decimal string: `1999` becomes `"19.99"`.
pub fn format_minor_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Formats a major-unit amount with two decimals: `19.9` becomes `"19.90"`.
pub fn format_major_units(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minor_units() {
        assert_eq!(format_minor_units(1999), "19.99");
        assert_eq!(format_minor_units(50), "0.50");
        assert_eq!(format_minor_units(5), "0.05");
        assert_eq!(format_minor_units(100_000), "1000.00");
        assert_eq!(format_minor_units(-250), "-2.50");
    }

    #[test]
    fn formats_major_units() {
        assert_eq!(format_major_units(19.99), "19.99");
        assert_eq!(format_major_units(19.9), "19.90");
        assert_eq!(format_major_units(5.0), "5.00");
    }
}
