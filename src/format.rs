//! Display helpers for callers that render results.
//!
//! The engine itself only ever returns raw [`Decimal`]s; these functions
//! round half away from zero, the way amounts are shown on a payslip.

use rust_decimal::{Decimal, RoundingStrategy};

fn rounded(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as Australian dollars with two decimals and a
/// thousands separator.
///
/// ```
/// use payslip_engine::format::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(344959755, 5)), "$3,449.60");
/// assert_eq!(format_currency(Decimal::new(-1234567, 1)), "-$123,456.70");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let amount = rounded(value, 2);
    let text = format!("{:.2}", amount.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{fraction}")
}

/// Formats hours to two decimals.
pub fn format_hours(value: Decimal) -> String {
    format!("{:.2}", rounded(value, 2))
}

/// Formats a rate or proportion to four decimals.
pub fn format_rate(value: Decimal) -> String {
    format!("{:.4}", rounded(value, 4))
}
