// src/gui/components/data_table.rs
//
// Draws the collated cross-tab. Purely a view.

use eframe::egui::{ self, Align, Layout, RichText };
use egui_extras::{ Column, TableBuilder };

use crate::gui::app::App;

/// The two leading columns hold category names; the rest are counts.
const LABEL_COLS: usize = 2;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(ds) = &app.data else {
        ui.centered_and_justified(|ui| {
            ui.label("Nothing collated yet");
        });
        return;
    };

    let cols = ds
        .headers
        .as_ref()
        .map(|h| h.len())
        .or_else(|| ds.rows.first().map(|r| r.len()))
        .unwrap_or(0);
    if cols == 0 {
        return;
    }

    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;  // reserve space instead of overlaying content
        s.bar_width = 10.0;
    }

    let avail_h = ui.available_height();
    egui::ScrollArea::horizontal()
        .id_salt("crosstab_hscroll")
        .max_height(avail_h)
        .show(ui, |ui| {
            let mut table = TableBuilder::new(ui)
                .striped(true)
                .min_scrolled_height(0.0)
                .max_scroll_height(avail_h);
            for ci in 0..cols {
                let w = if ci < LABEL_COLS { 160.0 } else { 70.0 };
                table = table.column(Column::initial(w).resizable(true).clip(true).at_least(20.0));
            }

            table
                .header(24.0, |mut header| {
                    for ci in 0..cols {
                        let name = ds.headers.as_ref().and_then(|h| h.get(ci)).map_or("", |s| s.as_str());
                        header.col(|ui| {
                            ui.label(RichText::new(name).strong());
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, ds.rows.len(), |mut row| {
                        let r = &ds.rows[row.index()];
                        for ci in 0..cols {
                            let cell = r.get(ci).map_or("", |s| s.as_str());
                            row.col(|ui| {
                                if ci < LABEL_COLS {
                                    ui.label(cell);
                                } else {
                                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                        ui.label(cell);
                                    });
                                }
                            });
                        }
                    });
                });
        });
}
