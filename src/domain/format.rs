//! Display formatting for prices and feed timestamps.

use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

use super::listing::Price;

/// `$28,500` for numbers, verbatim for text.
pub fn format_price(price: Option<&Price>) -> String {
    match price {
        None => "Price not available".to_string(),
        Some(Price::Text(text)) if text.trim().is_empty() => "Price not available".to_string(),
        Some(Price::Text(text)) => text.clone(),
        Some(Price::Amount(amount)) if *amount == 0.0 || amount.is_nan() => {
            "Price not available".to_string()
        }
        Some(Price::Amount(amount)) => format!("${}", group_thousands(*amount)),
    }
}

fn group_thousands(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let whole = rounded.abs().trunc() as u64;
    let cents = ((rounded.abs() - rounded.abs().trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if cents > 0 {
        let fraction = format!("{cents:02}");
        grouped.push('.');
        grouped.push_str(fraction.trim_end_matches('0'));
    }
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Parses feed timestamps. Offset-less values are wall-clock time in the local zone.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT)
        .ok()
        .map(|naive| naive.assume_offset(local_offset()))
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}

/// "Oct 9, 2025 at 07:03 PM" in local time; unparseable input is returned as-is.
pub fn found_label(raw: &str) -> String {
    found_label_at(raw, local_offset())
}

fn found_label_at(raw: &str, offset: UtcOffset) -> String {
    let format = format_description!(
        "[month repr:short] [day padding:none], [year] at [hour repr:12]:[minute] [period]"
    );
    parse_timestamp(raw)
        .and_then(|ts| ts.to_offset(offset).format(&format).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// "Oct 9" in local time.
pub fn short_date(raw: &str) -> String {
    short_date_at(raw, local_offset())
}

fn short_date_at(raw: &str, offset: UtcOffset) -> String {
    let format = format_description!("[month repr:short] [day padding:none]");
    parse_timestamp(raw)
        .and_then(|ts| ts.to_offset(offset).format(&format).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// "10/9/2025 at 7:03:13 PM"
pub fn updated_label(ts: OffsetDateTime) -> String {
    let format = format_description!(
        "[month padding:none]/[day padding:none]/[year] at [hour repr:12 padding:none]:[minute]:[second] [period]"
    );
    ts.format(&format).unwrap_or_else(|_| ts.to_string())
}

pub fn time_ago(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let minutes = (now - then).whole_minutes().max(0);
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else {
        format!("{days} days ago")
    }
}

/// `time_ago` against the current clock, for raw feed timestamps.
pub fn time_ago_from(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|then| time_ago(then, OffsetDateTime::now_utc()))
}
