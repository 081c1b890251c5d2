// src/gui/actions/copy.rs
use eframe::egui;

use crate::{ csv, gui::app::App };

pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    let Some(ds) = app.data.as_ref().filter(|d| !d.is_empty()) else {
        app.status("Nothing to copy");
        logd!("Copy: Clicked, but there's nothing to copy");
        return;
    };

    let export = &app.state.options.export;
    let txt = csv::to_export_string(&ds.headers, &ds.rows, export.include_headers, export.delim());
    logf!("Copy: rows={}", ds.rows.len());

    ui_ctx.copy_text(txt);
    app.status("Copied to clipboard");
}
