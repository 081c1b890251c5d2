// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::{ IconData, ViewportBuilder };
use image::{ Rgba, RgbaImage };
use trac_collate::gui;

const ICON_SIZE: u32 = 64;

/// A 3×3 grid of cells, shaded by row, on a transparent background.
fn app_icon() -> IconData {
    let cell = ICON_SIZE / 3;
    let rgba = RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let (cx, cy) = (x % cell, y % cell);
        if cx < 2 || cy < 2 || x >= cell * 3 || y >= cell * 3 {
            return Rgba([0, 0, 0, 0]);
        }
        let shade = 90 + (y / cell) as u8 * 50;
        Rgba([30, shade, 200, 255])
    });
    let (width, height) = rgba.dimensions();
    IconData { rgba: rgba.into_raw(), width, height }
}

fn main() {
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("TRAC Collate")
            .with_icon(app_icon()),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
