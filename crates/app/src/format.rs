//! Display formatting

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

/// Render a timestamp as `MM/DD/YYYY`
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` and bare dates.
/// Anything else yields `None`.
#[must_use]
pub fn format_date(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    let date = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()?;

    Some(date.format("%m/%d/%Y").to_string())
}

/// Render an amount in pounds as `£x.yy`
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("£{rounded:.2}")
}
