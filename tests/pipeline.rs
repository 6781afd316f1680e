use std::path::Path;

use chrono::NaiveDate;
use rusty_realty::data::cache::LoadCache;
use rusty_realty::data::dashboard::Dashboard;
use rusty_realty::data::export::export_to_dir;
use rusty_realty::data::filter::{DataBounds, DateSelection, FilterState, FilteredView};
use rusty_realty::data::loader::{load_csv, load_or_empty};
use rusty_realty::data::model::columns;
use rusty_realty::data::preprocess::preprocess;

const LISTINGS: &str = r#"{
  "items": [
    {"title": "성수 카페", "businessMiddleCodeName": "카페", "deposit": "3000", "monthlyRent": 200,
     "premium": 1000, "maintenanceFee": 20, "size": 45.5, "floor": "2",
     "createdDateUtc": "2024-04-01T02:00:00Z", "nearSubwayStation": "성수역 도보 4분",
     "location": {"gu": "성동구", "geo": {"lat": 37.54, "lng": 127.05}}},
    {"title": "연남 카페", "businessMiddleCodeName": "카페", "deposit": 2000, "monthlyRent": 150,
     "premium": null, "size": 30, "floor": 1,
     "createdDateUtc": "2024-04-02T02:00:00Z", "nearSubwayStation": "홍대입구역 도보 9분",
     "location": {"gu": "마포구"}},
    {"title": "문래 식당", "businessMiddleCodeName": "음식점", "deposit": 4000, "monthlyRent": 260,
     "premium": 2000, "maintenanceFee": 30, "size": 80, "floor": 1,
     "createdDateUtc": "2024-04-02T05:00:00Z", "nearSubwayStation": null,
     "location": {"gu": "영등포구"}}
  ]
}"#;

fn write_listings(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("raw_data.json");
    std::fs::write(&path, LISTINGS).unwrap();
    path
}

#[test]
fn load_preprocess_filter_aggregate_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_listings(dir.path());

    let mut cache = LoadCache::new();
    let raw = cache.get_or_load(&path).unwrap();
    assert!(raw.has_column("location.geo.lat"));

    let table = preprocess(raw.as_ref().clone());
    assert_eq!(table.listings[0].number(columns::DEPOSIT), Some(3000.0));
    assert_eq!(table.listings[1].number(columns::PREMIUM), Some(0.0));
    assert_eq!(table.listings[1].number(columns::MAINTENANCE_FEE), Some(0.0));
    assert_eq!(
        table.numeric_column(columns::SUBWAY_MINUTES),
        vec![Some(4.0), Some(9.0), None]
    );

    let bounds = DataBounds::from_table(&table);
    let mut filters = FilterState::from_bounds(&bounds);
    filters.dates = DateSelection::Single(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());

    let view = FilteredView::new(&table, &filters).non_empty().unwrap();
    assert_eq!(view.indices(), &[1, 2]);

    let dashboard = Dashboard::compute(&view, 15);
    assert_eq!(dashboard.summary.count, 2);
    assert_eq!(dashboard.summary.avg_deposit, 3000.0);
    assert_eq!(dashboard.summary.avg_premium, 1000.0);
    assert_eq!(dashboard.charts.deposit_timeseries.len(), 1);
    assert_eq!(
        dashboard.insight.top_category.as_ref().unwrap().category,
        "음식점"
    );
    assert_eq!(dashboard.insight.median_premium_ratio, Some(0.25));

    let date = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
    let exported = export_to_dir(&view, dir.path(), date).unwrap();
    let reloaded = load_csv(&exported).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.column_names, table.column_names);

    // Reloading the export through the same pipeline gives the same rows.
    let again = preprocess(reloaded);
    let again_filters = FilterState::from_bounds(&DataBounds::from_table(&again));
    assert_eq!(FilteredView::new(&again, &again_filters).len(), 2);
    for (orig, back) in view.listings().zip(&again.listings) {
        for name in [columns::DEPOSIT, columns::PREMIUM_RATIO, columns::SIZE] {
            assert_eq!(orig.number(name), back.number(name), "column {name}");
        }
        assert_eq!(orig.date(), back.date());
    }
}

#[test]
fn broken_file_is_absorbed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw_data.json");
    std::fs::write(&path, r#"{"listings": []}"#).unwrap();

    let outcome = load_or_empty(&path);
    assert!(outcome.table.is_empty());
    let message = outcome.failure.unwrap().to_string();
    assert!(message.contains("items"), "{message}");

    assert!(preprocess(outcome.table.as_ref().clone()).is_empty());
}
