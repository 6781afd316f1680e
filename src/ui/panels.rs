use chrono::Local;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::DateSelection;
use crate::data::insight::thousands;
use crate::state::{AppState, Warning};
use crate::ui::{charts, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_empty() {
        ui.label("No listings loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the closures.
    let bounds = state.bounds.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Categories ----
            let header = format!(
                "Category  ({}/{})",
                state.filters.categories.len(),
                bounds.categories.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_categories();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_categories();
                        }
                    });

                    for category in &bounds.categories {
                        let mut checked = state.filters.categories.contains(category);
                        let text = RichText::new(category).color(state.color_map.color_for(category));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_category(category);
                        }
                    }
                });
            ui.separator();

            // ---- Floor ----
            if let Some((min, max)) = bounds.floor {
                ui.strong("Floor");
                let (mut lo, mut hi) = state.filters.floor;
                let changed = range_sliders(ui, &mut lo, &mut hi, min, max);
                if changed {
                    state.set_floor_range(lo, hi);
                }
                ui.separator();
            }

            // ---- Deposit ----
            if let Some((min, max)) = bounds.deposit {
                ui.strong("Deposit (10k KRW)");
                let (mut lo, mut hi) = state.filters.deposit;
                let changed = range_sliders(ui, &mut lo, &mut hi, min, max);
                if changed {
                    state.set_deposit_range(lo, hi);
                }
                ui.separator();
            }

            // ---- Registration date ----
            if bounds.dates.is_some() {
                ui.strong("Registration date");
                date_controls(ui, state);
            }
        });
}

/// Two sliders over `[min, max]`. Returns whether either moved.
fn range_sliders(ui: &mut Ui, lo: &mut i64, hi: &mut i64, min: i64, max: i64) -> bool {
    let moved_lo = ui
        .add(egui::Slider::new(lo, min..=max).text("from"))
        .changed();
    let moved_hi = ui
        .add(egui::Slider::new(hi, min..=max).text("to"))
        .changed();
    moved_lo || moved_hi
}

fn date_controls(ui: &mut Ui, state: &mut AppState) {
    let (mut start, mut end) = state.filters.dates.bounds();
    let mut single = matches!(state.filters.dates, DateSelection::Single(_));
    let mut changed = false;

    changed |= ui.checkbox(&mut single, "Single day").changed();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("from");
        changed |= ui
            .push_id("date_start", |ui| ui.add(DatePickerButton::new(&mut start)))
            .inner
            .changed();
    });
    if !single {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("to");
            changed |= ui
                .push_id("date_end", |ui| ui.add(DatePickerButton::new(&mut end)))
                .inner
                .changed();
        });
    }

    if changed {
        let dates = if single {
            DateSelection::Single(start)
        } else {
            DateSelection::Range(start, end)
        };
        state.set_dates(dates);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.dashboard.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV"))
                .clicked()
            {
                // Error details end up in the status message.
                let _ = state.export(Local::now().date_naive());
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.table.is_empty() {
            ui.label(format!(
                "{} listings loaded, {} shown",
                state.table.len(),
                state.visible_indices.len()
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Metrics, charts, insight and raw data, or the warning that replaces them.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        let text = state
            .warning
            .as_ref()
            .map_or_else(|| "Loading…".to_string(), Warning::to_string);
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(text).color(Color32::from_rgb(230, 160, 40)));
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Metrics ----
            let s = &dashboard.summary;
            ui.columns(4, |cols| {
                metric(&mut cols[0], "Listings", thousands(s.count as f64));
                metric(&mut cols[1], "Avg. deposit", format!("{} (10k KRW)", thousands(s.avg_deposit)));
                metric(&mut cols[2], "Avg. monthly rent", format!("{} (10k KRW)", thousands(s.avg_monthly_rent)));
                metric(&mut cols[3], "Avg. premium", format!("{} (10k KRW)", thousands(s.avg_premium)));
            });
            ui.separator();

            // ---- Charts ----
            let c = &dashboard.charts;
            ui.columns(2, |cols| {
                charts::deposit_timeseries(&mut cols[0], &c.deposit_timeseries);
                charts::rent_histogram(&mut cols[1], &c.rent_histogram);
            });
            ui.columns(2, |cols| {
                charts::deposit_by_category(&mut cols[0], &c.deposit_by_category, &state.color_map);
                charts::price_scatter(&mut cols[1], &c.price_scatter, &state.color_map);
            });
            charts::premium_ratio_boxes(ui, &c.premium_ratio_boxes, &state.color_map);
            ui.separator();

            // ---- Insight ----
            ui.heading("Insights");
            ui.label(dashboard.insight.to_string());
            ui.separator();

            // ---- Raw data ----
            egui::CollapsingHeader::new("Raw data")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    table::raw_data(ui, &state.table, &state.visible_indices);
                });
        });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.heading(value);
    });
}
