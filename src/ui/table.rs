use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::ListingTable;

const ROW_HEIGHT: f32 = 18.0;

/// Raw-data view of the visible listings, every column in table order.
pub fn raw_data(ui: &mut Ui, table: &ListingTable, visible: &[usize]) {
    let columns = &table.column_names;

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(320.0)
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for name in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                    let listing = &table.listings[visible[row.index()]];
                    for name in columns {
                        row.col(|ui: &mut Ui| {
                            let cell = listing.get(name);
                            if cell.is_null() {
                                ui.weak("—");
                            } else {
                                ui.label(cell.to_string());
                            }
                        });
                    }
                });
            });
    });
}
