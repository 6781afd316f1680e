use std::fmt;

use serde::Serialize;

use super::aggregate::{category_deposit_means, median, CategoryMean};
use super::filter::NonEmptyView;
use super::model::columns;

/// The three statistics quoted in the insight panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// Category with the highest mean deposit.
    pub top_category: Option<CategoryMean>,
    pub median_premium_ratio: Option<f64>,
    /// Size of the listing with the highest deposit per square metre.
    pub most_efficient_size: Option<f64>,
}

pub fn insight(view: &NonEmptyView<'_>) -> Insight {
    // Categories are visited in name order; the first maximum wins ties.
    let top_category = category_deposit_means(view)
        .into_iter()
        .fold(None::<CategoryMean>, |best, (category, mean_deposit)| match best {
            Some(b) if b.mean_deposit >= mean_deposit => Some(b),
            _ => Some(CategoryMean {
                category,
                mean_deposit,
            }),
        });

    let median_premium_ratio = median(view.listings().filter_map(|l| l.number(columns::PREMIUM_RATIO)));

    let most_efficient_size = view
        .listings()
        .filter_map(|l| l.number(columns::DEPOSIT_PER_SQM).map(|v| (v, l)))
        .fold(None, |best: Option<(f64, _)>, (v, l)| match best {
            Some((bv, _)) if bv >= v => best,
            _ => Some((v, l)),
        })
        .and_then(|(_, l)| l.number(columns::SIZE));

    Insight {
        top_category,
        median_premium_ratio,
        most_efficient_size,
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.top_category {
            Some(top) => writeln!(
                f,
                "- Among the filtered listings, {} has the highest average deposit at {} (10k KRW).",
                top.category,
                thousands(top.mean_deposit)
            )?,
            None => writeln!(f, "- No category has deposit data.")?,
        }
        match self.median_premium_ratio {
            Some(r) => writeln!(f, "- The median premium-to-deposit ratio is {r:.2}.")?,
            None => writeln!(f, "- The median premium-to-deposit ratio is unavailable.")?,
        }
        match self.most_efficient_size {
            Some(s) => write!(
                f,
                "- The listing with the highest deposit per area measures {s:.1}㎡."
            ),
            None => write!(f, "- No listing has a usable deposit per area."),
        }
    }
}

/// Round to a whole number and group digits by thousands: `1234567.8` →
/// `"1,234,568"`.
pub fn thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{DataBounds, FilterState, FilteredView};
    use crate::data::test_support::sample_table;

    #[test]
    fn insight_over_default_filters() {
        let table = sample_table();
        let filters = FilterState::from_bounds(&DataBounds::from_table(&table));
        let view = FilteredView::new(&table, &filters).non_empty().unwrap();

        let insight = insight(&view);
        let top = insight.top_category.clone().unwrap();
        assert_eq!(top.category, "음식점");
        assert!((top.mean_deposit - 3500.0).abs() < 1e-9);
        assert!((insight.median_premium_ratio.unwrap() - 500.0 / 1500.0).abs() < 1e-9);
        assert_eq!(insight.most_efficient_size, Some(50.0));

        let text = insight.to_string();
        assert!(text.contains("음식점"));
        assert!(text.contains("3,500"));
        assert!(text.contains("0.33"));
        assert!(text.contains("50.0㎡"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn ties_keep_the_first_category_by_name() {
        let table = crate::data::preprocess::preprocess(
            crate::data::loader::parse_items(
                r#"{"items": [
                    {"businessMiddleCodeName": "B", "deposit": 100},
                    {"businessMiddleCodeName": "A", "deposit": 100}
                ]}"#,
            )
            .unwrap(),
        );
        let view = FilteredView::all(&table).non_empty().unwrap();
        assert_eq!(insight(&view).top_category.unwrap().category, "A");
    }

    #[test]
    fn null_deposit_per_area_is_skipped() {
        let table = crate::data::preprocess::preprocess(
            crate::data::loader::parse_items(
                r#"{"items": [
                    {"businessMiddleCodeName": "A", "deposit": 900, "size": 0},
                    {"businessMiddleCodeName": "A", "deposit": 100, "size": 20}
                ]}"#,
            )
            .unwrap(),
        );
        let view = FilteredView::all(&table).non_empty().unwrap();
        assert_eq!(insight(&view).most_efficient_size, Some(20.0));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(1234567.8), "1,234,568");
        assert_eq!(thousands(-2500.0), "-2,500");
    }
}
