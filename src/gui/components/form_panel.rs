// src/gui/components/form_panel.rs
//
// Left panel: page, axes, browser and the COLLATE button.

use eframe::egui;

use crate::config::options::BrowserKind;
use crate::gui::{ actions, app::App };

const AXIS_LABELS: [&str; 3] = ["Rows (axis 1)", "Sub-rows (axis 2)", "Columns (axis 3)"];

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Page");
    let mut url_changed = false;
    {
        let registry = &app.registry;
        let collate = &mut app.state.options.collate;

        egui::ComboBox::from_id_salt("page_url")
            .width(300.0)
            .selected_text(crate::core::sanitize::url_slug(&collate.url))
            .show_ui(ui, |ui| {
                for (url, page) in registry.iter() {
                    // pages we can't drive are listed by --list-pages, not here
                    if page.layout().is_none() {
                        continue;
                    }
                    let label = format!("{url} ({})", page.label());
                    if ui.selectable_label(collate.url == url, label).clicked() && collate.url != url {
                        collate.url = s!(url);
                        url_changed = true;
                    }
                }
            });
        if ui
            .add(egui::TextEdit::singleline(&mut collate.url).font(egui::TextStyle::Monospace))
            .changed()
        {
            url_changed = true;
        }
    }
    if url_changed {
        logf!("UI: url → {}", app.state.options.collate.url);
        app.state.gui.known_axes.clear();
        app.refresh_out_path();
    }

    ui.separator();
    ui.heading("Axes");
    {
        let known = &app.state.gui.known_axes;
        let axes = &mut app.state.options.collate.axes;
        for (i, axis) in axes.iter_mut().enumerate() {
            ui.label(AXIS_LABELS[i]);
            if known.is_empty() {
                ui.text_edit_singleline(axis);
            } else {
                egui::ComboBox::from_id_salt(("axis", i))
                    .width(300.0)
                    .selected_text(axis.as_str())
                    .show_ui(ui, |ui| {
                        for name in known {
                            if ui.selectable_label(*axis == *name, name).clicked() {
                                *axis = name.clone();
                            }
                        }
                    });
            }
        }
    }
    ui.checkbox(&mut app.state.options.collate.optimize, "Optimize traversal order");

    ui.separator();
    ui.heading("Browser");
    {
        let collate = &mut app.state.options.collate;
        egui::ComboBox::from_id_salt("browser")
            .selected_text(collate.browser.name())
            .show_ui(ui, |ui| {
                for b in BrowserKind::ALL {
                    ui.selectable_value(&mut collate.browser, b, b.name());
                }
            });
        ui.checkbox(&mut collate.headless, "Headless");
        ui.horizontal(|ui| {
            ui.label("WebDriver:");
            ui.text_edit_singleline(&mut collate.webdriver_url);
        });
        ui.horizontal(|ui| {
            ui.label("Query timeout:");
            ui.add(egui::DragValue::new(&mut collate.query_timeout_secs).range(1..=300).suffix(" s"));
        });
    }

    ui.separator();
    ui.add_enabled_ui(!app.running, |ui| {
        ui.horizontal(|ui| {
            if ui.button("List axes").clicked() {
                actions::list_axes(app);
            }

            let red = egui::Color32::from_rgb(220, 30, 30);
            let black = egui::Color32::BLACK;
            if ui
                .add(egui::Button::new(egui::RichText::new("COLLATE").color(black).strong()).fill(red))
                .clicked()
            {
                actions::collate(app);
            }
        });
    });

    if app.state.gui.show_assignment {
        if let Some(order) = &app.walked_as {
            ui.add_space(6.0);
            ui.label(format!("Walked as: {} / {} / {}", order[0], order[1], order[2]));
        }
    }
}
