use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{columns, CellValue, ListingTable};

/// "도보 N분" (walk N minutes) inside the nearest-subway text.
static WALK_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"도보\s*(\d+)분").expect("walk-time pattern is valid"));

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Type-coerce the raw table and add the analytic columns.
///
/// Empty tables are returned unchanged. Otherwise the output holds every
/// input column plus `date_only`, `deposit_per_sqm`, `premium_ratio` and
/// `subway_minutes`. Values that fail to coerce become null.
pub fn preprocess(mut table: ListingTable) -> ListingTable {
    if table.is_empty() {
        return table;
    }

    coerce_numeric(&mut table);
    fill_missing_amounts(&mut table);
    coerce_timestamps(&mut table);
    derive_columns(&mut table);

    log::debug!(
        "Preprocessed {} listings into {} columns",
        table.len(),
        table.column_names.len()
    );
    table
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

fn coerce_numeric(table: &mut ListingTable) {
    for name in columns::NUMERIC {
        if !table.has_column(name) {
            continue;
        }
        let values: Vec<CellValue> = table.column(name).into_iter().map(to_number).collect();
        table.set_column(name, values);
    }
}

/// Numeric coercion of one cell; anything unparseable becomes null.
pub fn to_number(cell: &CellValue) -> CellValue {
    let value = match cell {
        CellValue::Integer(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).into()
}

fn coerce_timestamps(table: &mut ListingTable) {
    let stamps: Vec<Option<DateTime<FixedOffset>>> = table
        .column(columns::CREATED_AT)
        .into_iter()
        .map(parse_timestamp)
        .collect();

    if table.has_column(columns::CREATED_AT) {
        let cells: Vec<CellValue> = stamps
            .iter()
            .map(|t| t.map_or(CellValue::Null, CellValue::Timestamp))
            .collect();
        table.set_column(columns::CREATED_AT, cells);
    }

    // Calendar date in the timestamp's own offset.
    let dates: Vec<CellValue> = stamps
        .iter()
        .map(|t| t.map_or(CellValue::Null, |t| CellValue::Date(t.date_naive())))
        .collect();
    table.set_column(columns::DATE_ONLY, dates);
}

/// Accepts RFC 3339, naive ISO date-times (taken as UTC) and bare dates.
pub fn parse_timestamp(cell: &CellValue) -> Option<DateTime<FixedOffset>> {
    let text = match cell {
        CellValue::Timestamp(t) => return Some(*t),
        CellValue::Date(d) => return Some(midnight_utc(*d)),
        CellValue::String(s) => s.trim(),
        _ => return None,
    };

    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t);
    }
    if let Ok(t) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(t);
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(midnight_utc)
}

fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset()
}

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

/// Currency columns default to 0. `subway_minutes` is deliberately left out.
fn fill_missing_amounts(table: &mut ListingTable) {
    for name in columns::CURRENCY {
        let values: Vec<CellValue> = table
            .column(name)
            .into_iter()
            .map(|cell| match cell {
                CellValue::Null => CellValue::Float(0.0),
                other => other.clone(),
            })
            .collect();
        table.set_column(name, values);
    }
}

// ---------------------------------------------------------------------------
// Derived columns
// ---------------------------------------------------------------------------

fn derive_columns(table: &mut ListingTable) {
    let deposit = table.numeric_column(columns::DEPOSIT);
    let premium = table.numeric_column(columns::PREMIUM);
    let size = table.numeric_column(columns::SIZE);

    let per_sqm: Vec<CellValue> = deposit
        .iter()
        .zip(&size)
        .map(|(&d, &s)| deposit_per_sqm(d, s).into())
        .collect();
    table.set_column(columns::DEPOSIT_PER_SQM, per_sqm);

    let ratio: Vec<CellValue> = premium
        .iter()
        .zip(&deposit)
        .map(|(&p, &d)| CellValue::Float(premium_ratio(p, d)))
        .collect();
    table.set_column(columns::PREMIUM_RATIO, ratio);

    let minutes: Vec<CellValue> = table
        .column(columns::NEAR_SUBWAY)
        .into_iter()
        .map(|cell| subway_minutes(cell).map_or(CellValue::Null, CellValue::Integer))
        .collect();
    table.set_column(columns::SUBWAY_MINUTES, minutes);
}

/// `deposit / size`; null when either side is unknown or the size is 0.
pub fn deposit_per_sqm(deposit: Option<f64>, size: Option<f64>) -> Option<f64> {
    match (deposit, size) {
        (Some(d), Some(s)) if s != 0.0 => Some(d / s),
        _ => None,
    }
}

/// `premium / deposit` where the deposit is positive, 0 otherwise. Never
/// negative: a negative premium counts as no premium.
pub fn premium_ratio(premium: Option<f64>, deposit: Option<f64>) -> f64 {
    match deposit {
        Some(d) if d > 0.0 => (premium.unwrap_or(0.0) / d).max(0.0),
        _ => 0.0,
    }
}

/// Walking minutes from text such as `"강남역 도보 5분"`.
pub fn subway_minutes(cell: &CellValue) -> Option<i64> {
    let text = match cell {
        CellValue::Null => return None,
        CellValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    WALK_MINUTES
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok())
}
