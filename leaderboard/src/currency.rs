// Presentation of balances as dollar amounts.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::cells::parse_balance_cell;
use crate::config::LeaderboardError;

/// Formats an amount with a dollar sign, grouping separators and exactly
/// two decimal places: `1234.5` becomes `$1,234.50`.
///
/// Cents are rounded half to even. Negative amounts keep the sign after the
/// dollar sign (`$-12.00`), which is how the dashboard has always shown them.
pub fn format_currency(amount: Decimal) -> String {
    let mut cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    if cents.is_zero() {
        // Avoids printing "-0.00".
        cents = Decimal::ZERO;
    }
    cents.rescale(2);
    let digits = cents.abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if cents.is_sign_negative() { "-" } else { "" };
    format!("${}{}.{}", sign, group_thousands(int_part), frac_part)
}

/// Reads back an amount produced by [format_currency].
pub fn parse_currency(s: &str) -> Result<Decimal, LeaderboardError> {
    parse_balance_cell(s)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut res = String::with_capacity(len + len / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            res.push(',');
        }
        res.push(c);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_with_grouping_and_cents() {
        assert_eq!(format_currency(dec!(1234.5)), "$1,234.50");
        assert_eq!(format_currency(dec!(1200)), "$1,200.00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(100000)), "$100,000.00");
    }

    #[test]
    fn formats_small_amounts() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec!(0.5)), "$0.50");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(format_currency(dec!(0.125)), "$0.12");
        assert_eq!(format_currency(dec!(0.135)), "$0.14");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_currency(dec!(-1234.5)), "$-1,234.50");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn parses_formatted_amounts() {
        assert_eq!(parse_currency("$1,234.50").unwrap(), dec!(1234.50));
        assert_eq!(parse_currency("$-1,234.50").unwrap(), dec!(-1234.50));
        assert_eq!(parse_currency("$0.00").unwrap(), Decimal::ZERO);
        assert!(parse_currency("$").is_err());
    }
}
