// src/gui/app.rs
use std::{
    error::Error,
    sync::{ mpsc::Receiver, Arc, Mutex },
    time::Duration,
};

use eframe::egui;

use crate::config::{ registry::Registry, state::AppState };
use crate::data::DataSet;

use super::actions::Outcome;
use super::components::{ data_table, export_bar, form_panel };

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    crate::log::init();
    eframe::run_native(
        "TRAC Collate",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,
    pub registry: Registry,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    // last collated table
    pub data: Option<DataSet>,
    /// Axis order the page was actually walked in, when it differs from the form.
    pub walked_as: Option<[String; 3]>,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,
    pub worker: Option<Receiver<Outcome>>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let out_path_text = state.options.export.out_path().to_string_lossy().into();
        logf!("Init: url={}, axes={:?}", state.options.collate.url, state.options.collate.axes);

        Self {
            state,
            registry: Registry::builtin(),
            out_path_text,
            out_path_dirty: false,
            data: None,
            walked_as: None,
            status: Arc::new(Mutex::new(s!("Idle"))),
            running: false,
            worker: None,
        }
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Push the typed output path into ExportOptions.
    pub fn commit_out_path(&mut self) {
        if self.out_path_dirty {
            self.state.options.export.set_path(&self.out_path_text);
            logf!("Export: Out path set → {}", self.state.options.export.out_path().display());
            self.out_path_dirty = false;
        }
    }

    /// Re-derive the displayed output path when nothing was typed over it.
    pub fn refresh_out_path(&mut self) {
        if !self.out_path_dirty {
            self.out_path_text = self.state.options.export.out_path().to_string_lossy().into_owned();
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        super::actions::poll(self);
        if self.running {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::SidePanel::left("collate_form")
            .resizable(false)
            .min_width(320.0)
            .show(ctx, |ui| {
                form_panel::draw(ui, self);
            });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.running {
                    ui.spinner();
                }
                ui.label(self.status_text());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            export_bar::draw(ui, self);
            ui.separator();
            data_table::draw(ui, self);
        });
    }
}
