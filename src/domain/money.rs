use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Largest single amount accepted from user input: 1,000,000,000,000.00.
/// Keeps any realistic number of entries far from overflowing a total.
pub const MAX_AMOUNT_CENTS: Cents = 1_000_000_000_000 * 100;

/// Format an amount for display: thousands separators, two decimals,
/// negatives wrapped in parentheses.
/// Example: 123450 -> "1,234.50", -123450 -> "(1,234.50)"
pub fn format_amount(cents: Cents) -> String {
    let body = group_thousands(cents.unsigned_abs());
    if cents < 0 {
        format!("({})", body)
    } else {
        body
    }
}

/// Row form used in the interactive transaction list.
/// Example: 5000 -> "+ 50.00", -5000 -> "- 50.00"
pub fn format_signed(cents: Cents) -> String {
    if cents > 0 {
        format!("+ {}", format_amount(cents))
    } else {
        format!("- {}", format_amount(cents.abs()))
    }
}

/// Plain signed decimal used for CSV export.
/// Example: 123450 -> "1234.50", -1 -> "-0.01"
pub fn format_plain(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Statement form: no separators, negatives in parentheses.
/// Example: 123450 -> "1234.50", -123450 -> "(1234.50)"
pub fn format_statement_amount(cents: Cents) -> String {
    let abs_cents = cents.unsigned_abs();
    let body = format!("{}.{:02}", abs_cents / 100, abs_cents % 100);
    if cents < 0 {
        format!("({})", body)
    } else {
        body
    }
}

fn group_thousands(abs_cents: u64) -> String {
    let units = (abs_cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}.{:02}", grouped, abs_cents % 100)
}

/// Parse a user-entered, unsigned amount into cents.
///
/// A comma is accepted as the decimal separator. Digits beyond the second
/// decimal are rounded half-up: "0.005" -> 1, "0.004" -> 0. The result is
/// not checked for being positive; callers decide what zero means.
/// Anything above `MAX_AMOUNT_CENTS` is `Overflow`.
/// Example: "50" -> 5000, "12,5" -> 1250, "+3.10" -> 310
pub fn parse_amount(input: &str) -> Result<Cents, ParseAmountError> {
    let normalized = input.trim().replace(',', ".");
    let normalized = normalized.strip_prefix('+').unwrap_or(&normalized);

    let (units_str, decimal_str) = match normalized.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (normalized, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(units_str) || !all_digits(decimal_str) {
        return Err(ParseAmountError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseAmountError::Overflow)?
    };

    let digits: Vec<i64> = decimal_str.bytes().map(|b| i64::from(b - b'0')).collect();
    let digit = |i: usize| digits.get(i).copied().unwrap_or(0);
    let mut fraction = digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        fraction += 1;
    }

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .filter(|c| *c <= MAX_AMOUNT_CENTS)
        .ok_or(ParseAmountError::Overflow)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
            ParseAmountError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(123450), "1,234.50");
        assert_eq!(format_amount(-123450), "(1,234.50)");
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(1), "0.01");
        assert_eq!(format_amount(99999), "999.99");
        assert_eq!(format_amount(100000), "1,000.00");
        assert_eq!(format_amount(100_000_000), "1,000,000.00");
        assert_eq!(format_amount(-5), "(0.05)");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(123450), "+ 1,234.50");
        assert_eq!(format_signed(-123450), "- 1,234.50");
    }

    #[test]
    fn test_format_plain_and_statement() {
        assert_eq!(format_plain(123450), "1234.50");
        assert_eq!(format_plain(-123450), "-1234.50");
        assert_eq!(format_plain(-1), "-0.01");
        assert_eq!(format_plain(0), "0.00");
        assert_eq!(format_statement_amount(123450), "1234.50");
        assert_eq!(format_statement_amount(-123450), "(1234.50)");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50"), Ok(5000));
        assert_eq!(parse_amount("50.00"), Ok(5000));
        assert_eq!(parse_amount("12.5"), Ok(1250));
        assert_eq!(parse_amount("12,5"), Ok(1250));
        assert_eq!(parse_amount(" +3.10 "), Ok(310));
        assert_eq!(parse_amount(".50"), Ok(50));
        assert_eq!(parse_amount("7."), Ok(700));
    }

    #[test]
    fn test_parse_amount_rounds_half_up() {
        assert_eq!(parse_amount("0.005"), Ok(1));
        assert_eq!(parse_amount("0.004"), Ok(0));
        assert_eq!(parse_amount("1.995"), Ok(200));
        assert_eq!(parse_amount("1.9949"), Ok(199));
        assert_eq!(format_amount(parse_amount("0.005").unwrap()), "0.01");
    }

    #[test]
    fn test_parse_amount_invalid() {
        for input in ["", "  ", ".", "abc", "-5", "1e3", "nan", "inf", "12.34.56", "1,234.5"] {
            assert_eq!(
                parse_amount(input),
                Err(ParseAmountError::InvalidFormat),
                "input {:?}",
                input
            );
        }
        assert_eq!(
            parse_amount("99999999999999999999"),
            Err(ParseAmountError::Overflow)
        );
        assert_eq!(
            parse_amount("90000000000000000"),
            Err(ParseAmountError::Overflow)
        );
    }

    #[test]
    fn test_parse_amount_upper_limit() {
        assert_eq!(parse_amount("1000000000000"), Ok(MAX_AMOUNT_CENTS));
        assert_eq!(parse_amount("1000000000000.00"), Ok(MAX_AMOUNT_CENTS));
        assert_eq!(
            parse_amount("1000000000000.01"),
            Err(ParseAmountError::Overflow)
        );
        assert_eq!(parse_amount("999999999999.995"), Ok(MAX_AMOUNT_CENTS));
    }
}
