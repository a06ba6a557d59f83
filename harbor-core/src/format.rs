//! Display formatting and lenient parsing of currency amounts.
//!
//! The engine never rounds; these helpers are where presentation rounding
//! happens.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::TaxInputs;
use crate::calculations::common::{round_half_up, round_whole_half_up};

/// Characters that can never be part of an amount.
static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]").expect("valid regex"));

/// Longest leading number, in the shapes `12`, `12.`, `12.5` and `.5`.
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(\d+\.?\d*|\.\d+)").expect("valid regex"));

/// Result of [`parse_currency`].
///
/// `valid` is `false` when the text held no number at all, or a number
/// larger than [`TaxInputs::MAX_AMOUNT`]; `value` is zero in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAmount {
    pub value: Decimal,
    pub valid: bool,
}

impl ParsedAmount {
    fn invalid() -> Self {
        Self {
            value: Decimal::ZERO,
            valid: false,
        }
    }

    /// The parsed value, or zero when nothing could be parsed.
    pub fn or_zero(self) -> Decimal {
        self.value
    }

    /// The parsed value, or `None` when nothing could be parsed.
    pub fn ok(self) -> Option<Decimal> {
        self.valid.then_some(self.value)
    }
}

/// Parses user-entered currency text such as `"$1,234.56"`.
///
/// Everything except digits, `.` and `-` is stripped first, then the longest
/// leading number is read. Trailing garbage after that number is ignored,
/// so `"12.5.3"` reads as `12.5`. Amounts beyond [`TaxInputs::MAX_AMOUNT`]
/// in either direction are rejected.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use harbor_core::parse_currency;
///
/// assert_eq!(parse_currency("$25,000").value, dec!(25000));
/// assert_eq!(parse_currency("-$1,500.75").value, dec!(-1500.75));
///
/// let empty = parse_currency("");
/// assert!(!empty.valid);
/// assert_eq!(empty.or_zero(), dec!(0));
/// ```
pub fn parse_currency(text: &str) -> ParsedAmount {
    let stripped = NON_NUMERIC.replace_all(text, "");
    let Some(found) = LEADING_NUMBER.find(&stripped) else {
        return ParsedAmount::invalid();
    };

    let (negative, digits) = match found.as_str().strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, found.as_str()),
    };
    let digits = digits.trim_end_matches('.');
    let digits = if digits.starts_with('.') {
        format!("0{digits}")
    } else {
        digits.to_string()
    };

    match Decimal::from_str(&digits) {
        Ok(value) if value <= TaxInputs::MAX_AMOUNT => ParsedAmount {
            value: if negative { -value } else { value },
            valid: true,
        },
        Ok(value) => {
            tracing::warn!(
                input = %text,
                "amount out of range: {} exceeds {}",
                value,
                TaxInputs::MAX_AMOUNT
            );
            ParsedAmount::invalid()
        }
        Err(err) => {
            tracing::warn!(input = %text, "amount out of range: {}", err);
            ParsedAmount::invalid()
        }
    }
}

/// Formats an amount as whole dollars, e.g. `$61,625`.
///
/// Exact halves round up (`0.5` → `$1`, `-0.5` → `$0`). Negative amounts
/// render as `-$1,234`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use harbor_core::format_currency;
///
/// assert_eq!(format_currency(dec!(61625.044)), "$61,625");
/// assert_eq!(format_currency(dec!(-1234.4)), "-$1,234");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_whole_half_up(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let whole = rounded.abs().trunc().to_string();

    format!("{sign}${}", group_thousands(&whole))
}

/// Formats an amount with cents, e.g. `$14,117.15`.
///
/// Exact half cents round away from zero.
pub fn format_currency_with_cents(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a rate as a whole percentage: `0.24` → `24%`, `1.1` → `110%`.
pub fn format_percentage(rate: Decimal) -> String {
    let percent = round_whole_half_up(rate.saturating_mul(Decimal::ONE_HUNDRED));
    format!("{}%", percent.trunc())
}

/// Inserts a comma every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
