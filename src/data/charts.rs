//! Chart-ready data. Each function shapes one chart from a filtered view;
//! drawing is left to the UI layer.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{category_deposit_means, mean_by, quantile, sorted, CategoryMean};
use super::filter::NonEmptyView;
use super::insight::thousands;
use super::model::columns;

/// Bins used by the monthly-rent histogram unless configured otherwise.
pub const DEFAULT_RENT_BINS: usize = 15;

/// Whisker reach, in interquartile ranges.
const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyDeposit {
    pub date: NaiveDate,
    pub mean_deposit: f64,
}

/// Half-open bin `[start, end)`; the last bin also holds `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub deposit: f64,
    pub monthly_rent: f64,
    pub category: Option<String>,
    /// Bubble size.
    pub size: Option<f64>,
    pub title: Option<String>,
    pub floor: Option<f64>,
    pub near_subway: Option<String>,
}

impl ScatterPoint {
    /// Tooltip lines: title, prices, floor and nearest subway.
    pub fn hover_text(&self) -> String {
        let mut lines = vec![self.title.clone().unwrap_or_else(|| "(untitled)".to_string())];
        lines.push(format!(
            "deposit {} / rent {}",
            thousands(self.deposit),
            thousands(self.monthly_rent)
        ));
        if let Some(floor) = self.floor {
            lines.push(format!("floor {floor}"));
        }
        if let Some(station) = &self.near_subway {
            lines.push(station.clone());
        }
        lines.join("\n")
    }
}

/// One listing inside a ratio box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioPoint {
    pub ratio: f64,
    pub title: Option<String>,
    pub premium: f64,
    pub deposit: f64,
}

impl RatioPoint {
    pub fn hover_text(&self) -> String {
        format!(
            "{}\npremium {} / deposit {}\nratio {:.2}",
            self.title.as_deref().unwrap_or("(untitled)"),
            thousands(self.premium),
            thousands(self.deposit),
            self.ratio
        )
    }
}

/// Box-plot statistics of `premium_ratio` for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioBox {
    pub category: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    /// Every listing, in row order.
    pub points: Vec<RatioPoint>,
}

/// All five charts of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub deposit_timeseries: Vec<DailyDeposit>,
    pub rent_histogram: Vec<HistogramBin>,
    pub deposit_by_category: Vec<CategoryMean>,
    pub price_scatter: Vec<ScatterPoint>,
    pub premium_ratio_boxes: Vec<RatioBox>,
}

impl ChartSet {
    pub fn compute(view: &NonEmptyView<'_>, rent_bins: usize) -> Self {
        ChartSet {
            deposit_timeseries: deposit_timeseries(view),
            rent_histogram: rent_histogram(view, rent_bins),
            deposit_by_category: deposit_by_category(view),
            price_scatter: price_scatter(view),
            premium_ratio_boxes: premium_ratio_boxes(view),
        }
    }
}

/// Mean deposit per registration date, oldest first.
pub fn deposit_timeseries(view: &NonEmptyView<'_>) -> Vec<DailyDeposit> {
    mean_by(view.listings(), |l| l.date(), |l| l.number(columns::DEPOSIT))
        .into_iter()
        .map(|(date, mean_deposit)| DailyDeposit { date, mean_deposit })
        .collect()
}

/// Equal-width histogram of monthly rent. A constant column yields a single
/// bin holding every row.
pub fn rent_histogram(view: &NonEmptyView<'_>, bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = view
        .listings()
        .filter_map(|l| l.number(columns::MONTHLY_RENT))
        .collect();

    let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    }) else {
        return Vec::new();
    };

    if min == max {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Mean deposit per category, highest first. Equal means keep name order.
pub fn deposit_by_category(view: &NonEmptyView<'_>) -> Vec<CategoryMean> {
    let mut ranked: Vec<CategoryMean> = category_deposit_means(view)
        .into_iter()
        .map(|(category, mean_deposit)| CategoryMean {
            category,
            mean_deposit,
        })
        .collect();
    ranked.sort_by(|a, b| b.mean_deposit.total_cmp(&a.mean_deposit));
    ranked
}

pub fn price_scatter(view: &NonEmptyView<'_>) -> Vec<ScatterPoint> {
    view.listings()
        .map(|l| ScatterPoint {
            deposit: l.amount(columns::DEPOSIT),
            monthly_rent: l.amount(columns::MONTHLY_RENT),
            category: l.category().map(str::to_string),
            size: l.number(columns::SIZE),
            title: l.text(columns::TITLE).map(str::to_string),
            floor: l.number(columns::FLOOR),
            near_subway: l.text(columns::NEAR_SUBWAY).map(str::to_string),
        })
        .collect()
}

/// Per-category distribution of `premium_ratio`, categories in order of
/// first appearance.
pub fn premium_ratio_boxes(view: &NonEmptyView<'_>) -> Vec<RatioBox> {
    let mut groups: Vec<(String, Vec<RatioPoint>)> = Vec::new();
    for l in view.listings() {
        let (Some(category), Some(ratio)) = (l.category(), l.number(columns::PREMIUM_RATIO)) else {
            continue;
        };
        let point = RatioPoint {
            ratio,
            title: l.text(columns::TITLE).map(str::to_string),
            premium: l.amount(columns::PREMIUM),
            deposit: l.amount(columns::DEPOSIT),
        };
        match groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, points)) => points.push(point),
            None => groups.push((category.to_string(), vec![point])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(category, points)| ratio_box(category, points))
        .collect()
}

fn ratio_box(category: String, points: Vec<RatioPoint>) -> Option<RatioBox> {
    let data = sorted(points.iter().map(|p| p.ratio));
    let q1 = quantile(&data, 0.25)?;
    let median = quantile(&data, 0.5)?;
    let q3 = quantile(&data, 0.75)?;

    let reach = WHISKER_IQR * (q3 - q1);
    let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);
    let inside = || data.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));

    Some(RatioBox {
        category,
        q1,
        median,
        q3,
        lower_whisker: inside().next().unwrap_or(q1),
        upper_whisker: inside().last().unwrap_or(q3),
        outliers: data
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{DataBounds, FilterState, FilteredView};
    use crate::data::loader::parse_items;
    use crate::data::preprocess::preprocess;
    use crate::data::test_support::sample_table;

    fn with_default_filters<T>(f: impl FnOnce(&NonEmptyView<'_>) -> T) -> T {
        let table = sample_table();
        let filters = FilterState::from_bounds(&DataBounds::from_table(&table));
        let view = FilteredView::new(&table, &filters).non_empty().unwrap();
        f(&view)
    }

    #[test]
    fn timeseries_is_chronological() {
        let series = with_default_filters(deposit_timeseries);
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        assert_eq!(
            series,
            vec![
                DailyDeposit { date: day(1), mean_deposit: 2000.0 },
                DailyDeposit { date: day(2), mean_deposit: 2000.0 },
                DailyDeposit { date: day(3), mean_deposit: 3250.0 },
            ]
        );
    }

    #[test]
    fn histogram_counts_every_row() {
        let bins = with_default_filters(|v| rent_histogram(v, DEFAULT_RENT_BINS));
        assert_eq!(bins.len(), 15);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[0].start, 80.0);
        assert_eq!(bins[14].end, 250.0);
        // 80 and 90 share the first bin, 250 lands in the last one.
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[14].count, 1);
    }

    #[test]
    fn constant_rent_is_one_bin() {
        let table = preprocess(
            parse_items(r#"{"items": [{"monthlyRent": 50}, {"monthlyRent": 50}]}"#).unwrap(),
        );
        let view = FilteredView::all(&table).non_empty().unwrap();
        assert_eq!(
            rent_histogram(&view, 10),
            vec![HistogramBin { start: 50.0, end: 50.0, count: 2 }]
        );
    }

    #[test]
    fn category_ranking_is_descending() {
        let ranked = with_default_filters(deposit_by_category);
        let names: Vec<_> = ranked.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["음식점", "카페", "편의점"]);
        assert_eq!(ranked[0].mean_deposit, 3500.0);
        assert_eq!(ranked[2].mean_deposit, 1500.0);
    }

    #[test]
    fn scatter_keeps_hover_fields() {
        let points = with_default_filters(price_scatter);
        assert_eq!(points.len(), 5);
        let first = &points[0];
        assert_eq!(first.deposit, 1000.0);
        assert_eq!(first.monthly_rent, 80.0);
        assert_eq!(first.category.as_deref(), Some("카페"));
        assert_eq!(first.size, Some(33.0));
        assert_eq!(first.title.as_deref(), Some("역삼 카페 A"));
        assert_eq!(first.near_subway.as_deref(), Some("역삼역 도보 5분"));
        assert_eq!(points[2].near_subway, None);
    }

    #[test]
    fn hover_text_names_the_listing() {
        let points = with_default_filters(price_scatter);
        let text = points[0].hover_text();
        assert!(text.starts_with("역삼 카페 A\n"), "{text}");
        assert!(text.contains("deposit 1,000 / rent 80"));
        assert!(text.contains("역삼역 도보 5분"));

        let boxes = with_default_filters(premium_ratio_boxes);
        let text = boxes[0].points[0].hover_text();
        assert!(text.contains("역삼 카페 A"));
        assert!(text.contains("premium 200 / deposit 1,000"));
        assert!(text.ends_with("ratio 0.20"));
    }

    #[test]
    fn ratio_boxes_follow_first_appearance() {
        let boxes = with_default_filters(premium_ratio_boxes);
        let names: Vec<_> = boxes.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(names, vec!["카페", "음식점", "편의점"]);

        let cafe = &boxes[0];
        let ratios: Vec<f64> = cafe.points.iter().map(|p| p.ratio).collect();
        assert_eq!(ratios, vec![0.2, 0.5]);
        assert_eq!(cafe.points[0].title.as_deref(), Some("역삼 카페 A"));
        assert_eq!(cafe.points[0].deposit, 1000.0);
        assert_eq!(cafe.points[0].premium, 200.0);
        assert!((cafe.median - 0.35).abs() < 1e-9);
        assert!(cafe.outliers.is_empty());
    }

    #[test]
    fn ratio_box_flags_outliers() {
        let points = [0.1, 0.2, 0.2, 0.3, 5.0]
            .into_iter()
            .map(|ratio| RatioPoint {
                ratio,
                title: None,
                premium: ratio * 100.0,
                deposit: 100.0,
            })
            .collect();
        let b = ratio_box("x".into(), points).unwrap();
        assert_eq!(b.q1, 0.2);
        assert_eq!(b.median, 0.2);
        assert_eq!(b.q3, 0.3);
        assert_eq!(b.outliers, vec![5.0]);
        assert_eq!(b.lower_whisker, 0.1);
        assert_eq!(b.upper_whisker, 0.3);
        assert_eq!(b.points.len(), 5);
    }
}
