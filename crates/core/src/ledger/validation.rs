//! Input validation for ledger operations.

use rust_decimal::Decimal;

use super::error::LedgerError;

/// Parses a user-supplied amount string.
///
/// Accepts plain decimal numbers; anything unparsable or not strictly
/// positive is rejected so a bad command never touches the ledger.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidAmount`] carrying the raw input.
pub fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(raw.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(raw.to_string()));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100", dec!(100))]
    #[case("12.5", dec!(12.5))]
    #[case("0.01", dec!(0.01))]
    #[case(" 7 ", dec!(7))]
    fn accepts_positive_numbers(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).expect("should parse"), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("12x")]
    #[case("1,5")]
    #[case("0")]
    #[case("0.0")]
    #[case("-5")]
    fn rejects_invalid_input(#[case] raw: &str) {
        assert!(matches!(
            parse_amount(raw),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn error_carries_raw_input() {
        let Err(LedgerError::InvalidAmount(raw)) = parse_amount("lunch") else {
            panic!("expected InvalidAmount");
        };
        assert_eq!(raw, "lunch");
    }
}
