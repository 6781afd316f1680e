use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoint,
    PlotPoints, Points,
};

use crate::color::ColorMap;
use crate::data::aggregate::CategoryMean;
use crate::data::charts::{DailyDeposit, HistogramBin, RatioBox, ScatterPoint};

const CHART_HEIGHT: f32 = 260.0;
const ACCENT: Color32 = Color32::from_rgb(99, 110, 250);
/// Individual points are drawn beside their box.
const POINT_OFFSET: f64 = 0.35;

/// Mean deposit per registration date. Points sit at whole days after the
/// first date; the axis labels them with the calendar date.
pub fn deposit_timeseries(ui: &mut Ui, series: &[DailyDeposit]) {
    ui.strong("Average deposit by registration date");
    let Some(first) = series.first().map(|d| d.date) else {
        return;
    };

    let points: PlotPoints = series
        .iter()
        .map(|d| [days_between(first, d.date), d.mean_deposit])
        .collect();
    let markers: PlotPoints = series
        .iter()
        .map(|d| [days_between(first, d.date), d.mean_deposit])
        .collect();

    Plot::new("deposit_timeseries")
        .height(CHART_HEIGHT)
        .x_axis_label("Registration date")
        .y_axis_label("Avg. deposit (10k KRW)")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            day_label(first, mark.value).unwrap_or_default()
        })
        .label_formatter(move |_name, value: &PlotPoint| match day_label(first, value.x) {
            Some(day) => format!("{day}\n{:.0}", value.y),
            None => String::new(),
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(ACCENT).width(2.0).name("avg. deposit"));
            plot_ui.points(Points::new(markers).color(ACCENT).radius(3.5));
        });
}

fn days_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64
}

/// `first + x` days, for whole-day positions only.
fn day_label(first: NaiveDate, x: f64) -> Option<String> {
    if !x.is_finite() || x.fract() != 0.0 {
        return None;
    }
    Duration::try_days(x as i64)
        .and_then(|offset| first.checked_add_signed(offset))
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Tooltip text for whichever listing sits exactly at the hovered point.
fn hover_lookup(entries: Vec<([f64; 2], String)>) -> impl Fn(&str, &PlotPoint) -> String {
    move |_name: &str, value: &PlotPoint| {
        entries
            .iter()
            .find(|([x, y], _)| (x - value.x).abs() < 1e-9 && (y - value.y).abs() < 1e-9)
            .map(|(_, text)| text.clone())
            .unwrap_or_default()
    }
}

/// Monthly-rent distribution.
pub fn rent_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    ui.strong("Monthly rent distribution");
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            let width = (b.end - b.start).max(1.0);
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(width)
                .fill(ACCENT)
        })
        .collect();

    Plot::new("rent_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Monthly rent (10k KRW)")
        .y_axis_label("Listings")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(ACCENT).name("listings"));
        });
}

/// Mean deposit per category, highest first. One series per category so
/// the legend names them.
pub fn deposit_by_category(ui: &mut Ui, ranking: &[CategoryMean], colors: &ColorMap) {
    ui.strong("Average deposit by category");
    Plot::new("deposit_by_category")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Avg. deposit (10k KRW)")
        .show(ui, |plot_ui| {
            for (i, entry) in ranking.iter().enumerate() {
                let color = colors.color_for(&entry.category);
                let bar = Bar::new(i as f64, entry.mean_deposit)
                    .width(0.7)
                    .fill(color)
                    .name(&entry.category);
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(&entry.category));
            }
        });
}

/// Deposit against monthly rent; bubble radius grows with floor area.
pub fn price_scatter(ui: &mut Ui, points: &[ScatterPoint], colors: &ColorMap) {
    ui.strong("Deposit vs. monthly rent (bubble = area)");
    let max_size = points
        .iter()
        .filter_map(|p| p.size)
        .fold(0.0_f64, f64::max);

    let hover = points
        .iter()
        .map(|p| ([p.deposit, p.monthly_rent], p.hover_text()))
        .collect();

    Plot::new("price_scatter")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .label_formatter(hover_lookup(hover))
        .x_axis_label("Deposit (10k KRW)")
        .y_axis_label("Monthly rent (10k KRW)")
        .show(ui, |plot_ui| {
            for p in points {
                let category = p.category.as_deref().unwrap_or("unknown");
                let radius = match p.size {
                    Some(size) if max_size > 0.0 && size > 0.0 => {
                        2.0 + 8.0 * (size / max_size).sqrt() as f32
                    }
                    _ => 2.0,
                };
                plot_ui.points(
                    Points::new(vec![[p.deposit, p.monthly_rent]])
                        .radius(radius)
                        .color(colors.color_for(category))
                        .name(category),
                );
            }
        });
}

/// Premium/deposit ratio per category with every individual point.
pub fn premium_ratio_boxes(ui: &mut Ui, boxes: &[RatioBox], colors: &ColorMap) {
    ui.strong("Premium / deposit ratio by category");
    let hover = boxes
        .iter()
        .enumerate()
        .flat_map(|(i, b)| {
            b.points
                .iter()
                .map(move |p| ([i as f64 + POINT_OFFSET, p.ratio], p.hover_text()))
        })
        .collect();

    Plot::new("premium_ratio_boxes")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .label_formatter(hover_lookup(hover))
        .y_axis_label("Premium / deposit")
        .show(ui, |plot_ui| {
            for (i, b) in boxes.iter().enumerate() {
                let x = i as f64;
                let color = colors.color_for(&b.category);
                let spread = BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker);
                let elem = BoxElem::new(x, spread)
                    .name(&b.category)
                    .box_width(0.5)
                    .stroke(Stroke::new(1.5, color))
                    .fill(color.gamma_multiply(0.3));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).color(color).name(&b.category));

                let scattered: PlotPoints =
                    b.points.iter().map(|p| [x + POINT_OFFSET, p.ratio]).collect();
                plot_ui.points(
                    Points::new(scattered)
                        .radius(2.5)
                        .color(color)
                        .name(&b.category),
                );
            }
        });
}
