use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::NonEmptyView;
use super::model::{columns, Listing};

/// The four headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub avg_deposit: f64,
    pub avg_monthly_rent: f64,
    pub avg_premium: f64,
}

/// Mean deposit of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    pub category: String,
    pub mean_deposit: f64,
}

pub fn summarize(view: &NonEmptyView<'_>) -> Summary {
    let column_mean = |name: &str| mean(view.listings().filter_map(|l| l.number(name))).unwrap_or(0.0);

    Summary {
        count: view.len(),
        avg_deposit: column_mean(columns::DEPOSIT),
        avg_monthly_rent: column_mean(columns::MONTHLY_RENT),
        avg_premium: column_mean(columns::PREMIUM),
    }
}

/// Mean deposit per category, keyed and ordered by category name.
pub fn category_deposit_means(view: &NonEmptyView<'_>) -> BTreeMap<String, f64> {
    mean_by(
        view.listings(),
        |l| l.category().map(str::to_string),
        |l| l.number(columns::DEPOSIT),
    )
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

/// Arithmetic mean; `None` for no values.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let sorted = sorted(values);
    quantile(&sorted, 0.5)
}

pub fn sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.into_iter().collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Quantile of already sorted data, linearly interpolated between the two
/// nearest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Group-by mean. Rows without a key or a value are skipped.
pub fn mean_by<'a, K, I, FK, FV>(rows: I, key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = &'a Listing>,
    FK: Fn(&Listing) -> Option<K>,
    FV: Fn(&Listing) -> Option<f64>,
{
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let (Some(k), Some(v)) = (key(row), value(row)) else {
            continue;
        };
        let entry = acc.entry(k).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}
