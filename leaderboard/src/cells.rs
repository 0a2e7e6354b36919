//! Conversion of the raw cells of an account-history export into a
//! [BalancePair].
//!
//! This is the only place where the textual `N/A` marker is looked at. The
//! rest of the crate works on [ClosingBalance].

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::*;

/// The marker used by the exports when there is no closing balance.
pub const NOT_APPLICABLE: &str = "N/A";

fn invalid(reason: String) -> LeaderboardError {
    LeaderboardError::InvalidUploadData { team: None, reason }
}

/// Parses a balance cell.
///
/// Accepts plain numbers (`1200.5`) as well as the currency notation of the
/// exports (`$1,200.50`, `-$12.00`, `$-12.00`). Anything else is rejected:
/// an unreadable cell is never treated as a zero balance.
pub fn parse_balance_cell(cell: &str) -> Result<Decimal, LeaderboardError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty balance cell".to_string()));
    }
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let (negative, rest) = match rest.strip_prefix('-') {
        Some(_) if negative => {
            return Err(invalid(format!("balance cell has two signs: {:?}", cell)));
        }
        Some(r) => (true, r),
        None => (negative, rest),
    };

    let digits: String = rest.chars().filter(|c| *c != ',').collect();
    let well_formed = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.');
    if !well_formed {
        return Err(invalid(format!("balance cell is not a number: {:?}", cell)));
    }
    let value = Decimal::from_str(&digits)
        .map_err(|e| invalid(format!("balance cell {:?}: {}", cell, e)))?;
    Ok(if negative { -value } else { value })
}

/// Parses the closing balance cell. An empty cell or `N/A` means that the
/// export did not report a closing balance.
pub fn parse_closing_cell(cell: &str) -> Result<ClosingBalance, LeaderboardError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_APPLICABLE) {
        Ok(ClosingBalance::NotApplicable)
    } else {
        parse_balance_cell(trimmed).map(ClosingBalance::Present)
    }
}

impl BalancePair {
    /// Builds the pair from the balance-before and balance-after cells.
    pub fn from_cells(before: &str, after: &str) -> Result<BalancePair, LeaderboardError> {
        Ok(BalancePair {
            before: parse_balance_cell(before)?,
            after: parse_closing_cell(after)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_balance_cell("1200").unwrap(), dec!(1200));
        assert_eq!(parse_balance_cell(" 1200.55 ").unwrap(), dec!(1200.55));
        assert_eq!(parse_balance_cell("-3.5").unwrap(), dec!(-3.5));
    }

    #[test]
    fn currency_notation() {
        assert_eq!(parse_balance_cell("$100,000.00").unwrap(), dec!(100000));
        assert_eq!(parse_balance_cell("-$12.00").unwrap(), dec!(-12));
        assert_eq!(parse_balance_cell("$-12.00").unwrap(), dec!(-12));
    }

    #[test]
    fn rejects_garbage() {
        for cell in ["", "   ", "N/A", "abc", "12a", "--5", "-$-5", "1.2.3", "$", ",", "NaN"] {
            let res = parse_balance_cell(cell);
            assert!(
                matches!(res, Err(LeaderboardError::InvalidUploadData { .. })),
                "cell {:?} gave {:?}",
                cell,
                res
            );
        }
    }

    #[test]
    fn closing_sentinel() {
        assert_eq!(
            parse_closing_cell("N/A").unwrap(),
            ClosingBalance::NotApplicable
        );
        assert_eq!(
            parse_closing_cell("n/a").unwrap(),
            ClosingBalance::NotApplicable
        );
        assert_eq!(parse_closing_cell("").unwrap(), ClosingBalance::NotApplicable);
        assert_eq!(
            parse_closing_cell("$1,200.00").unwrap(),
            ClosingBalance::Present(dec!(1200))
        );
        assert!(parse_closing_cell("none").is_err());
    }

    #[test]
    fn pair_from_cells() {
        assert_eq!(
            BalancePair::from_cells("500", "N/A").unwrap(),
            BalancePair::without_closing(dec!(500))
        );
        assert_eq!(
            BalancePair::from_cells("1000", "1200").unwrap(),
            BalancePair::new(dec!(1000), dec!(1200))
        );
        assert!(BalancePair::from_cells("N/A", "1200").is_err());
    }
}
