//! Conversion between base-unit amounts and display strings.
//!
//! Everything here is integer arithmetic on the digits themselves. Output
//! never depends on the process locale: digit groups are separated by
//! [`THIN_SP`], which cannot be mistaken for the decimal point.

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use crate::error::ParseAmountError;
use crate::units::{self, Unit, THIN_SP, THIN_SP_HTML};

/// Signed amount in base units (satoshis).
pub type Amount = i64;

/// Base units per whole coin: 1 SHIRE = 100,000,000 satoshis.
pub const COIN: Amount = 100_000_000;
/// Protocol supply ceiling in base units.
pub const MAX_MONEY: Amount = 21_000_000 * COIN;

/// Longest digit string, sign included, handed to integer conversion.
const MAX_DIGITS: usize = 18;

/// When to insert thin-space digit grouping into the integer part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorStyle {
    Never,
    /// Group only when the integer part has more than four digits.
    #[default]
    Standard,
    Always,
}

pub fn max_money() -> Amount {
    MAX_MONEY
}

/// True when `value` lies in `0..=MAX_MONEY`.
pub fn money_range(value: Amount) -> bool {
    (0..=MAX_MONEY).contains(&value)
}

fn group_digits(digits: &str, separators: SeparatorStyle) -> String {
    let len = digits.len();
    let grouped = match separators {
        SeparatorStyle::Never => false,
        SeparatorStyle::Standard => len > 4,
        SeparatorStyle::Always => true,
    };
    if !grouped {
        return digits.to_string();
    }

    let mut out = String::with_capacity(len + (len / 3) * THIN_SP.len_utf8());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THIN_SP);
        }
        out.push(ch);
    }
    out
}

/// Render `amount` in `unit`, e.g. `-1234.50000000` or `+12 345.00000000`.
///
/// Returns an empty string when `unit` is not a known unit id. Callers must
/// treat that as "cannot format", never as a zero-length amount.
pub fn format(
    unit: impl Into<i32>,
    amount: Amount,
    plus_sign: bool,
    separators: SeparatorStyle,
) -> String {
    let Some(unit) = Unit::from_id(unit.into()) else {
        return String::new();
    };

    // Registry factors are positive powers of ten.
    let coin = unit.factor().unsigned_abs();
    let magnitude = amount.unsigned_abs();
    let quotient = magnitude / coin;

    let mut out = String::new();
    if amount < 0 {
        out.push('-');
    } else if plus_sign && amount > 0 {
        out.push('+');
    }
    out.push_str(&group_digits(&quotient.to_string(), separators));

    let decimals = unit.decimals();
    if decimals > 0 {
        let remainder = magnitude % coin;
        out.push('.');
        out.push_str(&format!("{remainder:0decimals$}"));
    }
    out
}

/// [`format`] followed by a space and the unit's short name.
///
/// Do not use this in markup: renderers may wrap at the grouping mark. Use
/// [`format_html_with_unit`] there.
pub fn format_with_unit(
    unit: impl Into<i32>,
    amount: Amount,
    plus_sign: bool,
    separators: SeparatorStyle,
) -> String {
    let id = unit.into();
    format!(
        "{} {}",
        format(id, amount, plus_sign, separators),
        units::short_name(id)
    )
}

/// [`format_with_unit`] wrapped in a non-wrapping span, with each grouping
/// mark written as an explicit `&thinsp;` entity.
pub fn format_html_with_unit(
    unit: impl Into<i32>,
    amount: Amount,
    plus_sign: bool,
    separators: SeparatorStyle,
) -> String {
    let text = format_with_unit(unit, amount, plus_sign, separators)
        .replace(THIN_SP, THIN_SP_HTML);
    format!("<span style='white-space: nowrap;'>{text}</span>")
}

/// Parse a display string in `unit` back into base units.
///
/// Whitespace (thin spaces included) is ignored anywhere in the input, so
/// grouped and ungrouped strings parse alike. The result is not checked
/// against [`MAX_MONEY`]; use [`money_range`] for that.
pub fn parse(unit: impl Into<i32>, text: &str) -> Result<Amount, ParseAmountError> {
    let id = unit.into();
    parse_digits(id, text)
        .inspect_err(|err| tracing::debug!(unit = id, %err, "rejected amount text"))
}

fn parse_digits(id: i32, text: &str) -> Result<Amount, ParseAmountError> {
    let unit = Unit::from_id(id).ok_or(ParseAmountError::InvalidUnit { unit: id })?;
    if text.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parts = cleaned.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(ParseAmountError::MultipleDecimalPoints);
    }

    let decimals = unit.decimals();
    let fraction_len = fraction.chars().count();
    if fraction_len > decimals {
        return Err(ParseAmountError::TooManyDecimals {
            max: decimals,
            actual: fraction_len,
        });
    }

    let digits = format!("{whole}{fraction:0<decimals$}");
    let digit_count = digits.chars().count();
    if digit_count > MAX_DIGITS {
        return Err(ParseAmountError::TooManyDigits {
            digits: digit_count,
        });
    }

    digits.parse::<Amount>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ParseAmountError::Overflow,
        _ => ParseAmountError::InvalidNumber,
    })
}
