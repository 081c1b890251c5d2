// src/gui/actions/export.rs
use crate::{ file, gui::app::App };

pub fn export(app: &mut App) {
    // normalize out_path first (mutates app) before any &app borrows
    app.commit_out_path();

    let status_msg = match &app.data {
        None => {
            logd!("Export: Clicked, but there's nothing to export");
            s!("Nothing to export")
        }
        Some(ds) if ds.is_empty() => s!("Nothing to export"),
        Some(ds) => {
            let export = &app.state.options.export;
            logf!("Export: Begin rows={} format={:?}", ds.rows.len(), export.format);
            match file::write_export(export, ds) {
                Ok(path) => format!("Exported {}", path.display()),
                Err(e) => {
                    loge!("Export: Error: {}", e);
                    format!("Export error: {e}")
                }
            }
        }
    };

    app.status(status_msg);
}
