use std::sync::Arc;

use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

const EXTRA_FONT: &str = "listing-text";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RealtyApp {
    pub state: AppState,
}

impl RealtyApp {
    /// `font` is appended to both font families so Hangul category names
    /// and titles render.
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState, font: Option<Vec<u8>>) -> Self {
        if let Some(bytes) = font {
            install_font(&cc.egui_ctx, bytes);
        }
        Self { state }
    }
}

fn install_font(ctx: &egui::Context, bytes: Vec<u8>) {
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        EXTRA_FONT.to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(EXTRA_FONT.to_owned());
    }
    ctx.set_fonts(fonts);
}

impl eframe::App for RealtyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, insight, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &self.state);
        });
    }
}
