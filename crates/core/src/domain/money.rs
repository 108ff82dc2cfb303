use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_PREFIX: &str = "$";

/// Formats an amount for display: rounded half-up to two decimals and prefixed
/// with the currency symbol. Stored and summed values are never rounded.
pub fn format_price(amount: Decimal) -> String {
    format!("{CURRENCY_PREFIX}{}", format_amount(amount))
}

pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
