// src/gui/actions/collate.rs
//
// Collation runs for minutes; it gets its own thread (and browser session).
// The UI thread polls the channel once per frame.

use std::sync::mpsc::{ self, TryRecvError };
use std::thread;

use crate::{
    config::registry::Registry,
    gui::{ app::App, progress::GuiProgress },
    progress::Progress,
    runner,
};

use super::Outcome;

pub fn collate(app: &mut App) {
    if app.running {
        return;
    }
    let opts = app.state.options.collate.clone();
    if let Err(e) = opts.validate() {
        app.status(format!("Error: {e}"));
        return;
    }

    logf!("Collate: Begin url={} axes={:?} optimize={}", opts.url, opts.axes, opts.optimize);

    let (tx, rx) = mpsc::channel();
    let mut prog = GuiProgress::new(app.status.clone());

    thread::spawn(move || {
        let res = runner::collate(&opts, &Registry::builtin(), &mut prog);
        prog.finish();
        let _ = tx.send(Outcome::Collated(res.map_err(|e| e.to_string())));
    });

    app.running = true;
    app.worker = Some(rx);
    app.status("Starting...");
}

pub fn list_axes(app: &mut App) {
    if app.running {
        return;
    }
    let opts = app.state.options.collate.clone();
    logf!("Axes: Listing for {}", opts.url);

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let res = runner::list_axes(&opts, &Registry::builtin());
        let _ = tx.send(Outcome::Axes(res.map_err(|e| e.to_string())));
    });

    app.running = true;
    app.worker = Some(rx);
    app.status("Reading axes...");
}

/// Pick up a finished worker, if any.
pub fn poll(app: &mut App) {
    let Some(rx) = &app.worker else { return };
    let outcome = match rx.try_recv() {
        Ok(o) => o,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => {
            loge!("Worker: Exited without a result");
            app.worker = None;
            app.running = false;
            app.status("Error: worker stopped unexpectedly");
            return;
        }
    };
    app.worker = None;
    app.running = false;

    match outcome {
        Outcome::Collated(Ok(c)) => {
            let axes = app.state.options.collate.axis_names();
            app.walked_as = (!c.assignment.is_identity()).then(|| c.assignment.apply(&axes));
            let ds = c.table.to_dataset();
            logf!("Collate: OK rows={} total={} anomalies={}", ds.rows.len(), c.table.grand_total(), c.anomalies);
            app.status(format!("Ready: {} rows, {} counted", ds.rows.len(), c.table.grand_total()));
            app.data = Some(ds);

            if !app.out_path_dirty {
                let stem = runner::suggested_stem(&app.state.options.collate);
                let dir = app.state.options.export.out_dir().join(stem);
                app.state.options.export.set_path(&dir.to_string_lossy());
                app.refresh_out_path();
            }
        }
        Outcome::Collated(Err(e)) => {
            loge!("Collate: Error: {e}");
            app.status(format!("Error: {e}"));
        }
        Outcome::Axes(Ok(axes)) => {
            logf!("Axes: {} offered", axes.len());
            app.status(format!("{} axes available", axes.len()));
            app.state.gui.known_axes = axes;
        }
        Outcome::Axes(Err(e)) => {
            loge!("Axes: Error: {e}");
            app.status(format!("Error: {e}"));
        }
    }
}
