// src/runner.rs
//! Frontend-agnostic entry points: resolve the page, drive a collation,
//! assemble the cross-tab and export it.
//!
//! `collect` works over any `Document`; the browser-backed wrappers below it
//! need the `webdriver` feature.

use crate::config::options::CollateOptions;
use crate::core::Document;
use crate::core::sanitize::{filename_stem, url_slug};
use crate::data::CrossTab;
use crate::engine::{AxisPermutation, Collator, CollateError};
use crate::progress::Progress;
use crate::specs::LayoutKind;

#[cfg(feature = "webdriver")]
use {
    std::{error::Error, path::PathBuf},
    crate::config::{options::AppOptions, registry::Registry},
    crate::core::browser::WebDriverDocument,
    crate::file,
};

/// A finished collation.
#[derive(Clone, Debug)]
pub struct Collated {
    pub table: CrossTab,
    /// Widget order the page was walked in.
    pub assignment: AxisPermutation,
    /// Element/text disagreements absorbed on the way.
    pub anomalies: usize,
}

/// Summary of what was produced.
#[cfg(feature = "webdriver")]
pub struct RunSummary {
    pub file_written: PathBuf,
    pub collated: Collated,
}

/// Open `opts.url` on `doc`, commit the axes (optimized if asked), walk, assemble.
pub fn collect<D: Document>(
    doc: &mut D,
    opts: &CollateOptions,
    kind: LayoutKind,
    progress: &mut dyn Progress,
) -> Result<Collated, CollateError> {
    opts.validate()?;
    let axes = opts.axis_names();

    let mut collator = Collator::open(doc, &opts.url, kind, opts.tuning())?;
    collator.validate_axes(&axes)?;

    let assignment = if opts.optimize {
        progress.log("Optimizing axis order...");
        collator.optimize_axes(&axes)?
    } else {
        AxisPermutation::IDENTITY
    };

    progress.log("Collating...");
    let counts = collator.run_traversal(&assignment, &axes, progress)?;
    let table = CrossTab::assemble(&counts, &axes, &assignment);
    logf!(
        "Collated {} rows × {} columns, total {}",
        table.index.len(), table.columns.len(), table.grand_total()
    );

    Ok(Collated { table, assignment, anomalies: collator.anomalies() })
}

/// Axis names the first widget offers.
pub fn axes_offered<D: Document>(
    doc: &mut D,
    opts: &CollateOptions,
    kind: LayoutKind,
) -> Result<Vec<String>, CollateError> {
    let collator = Collator::open(doc, &opts.url, kind, opts.tuning())?;
    Ok(collator.widget_options(0).iter().map(|o| o.name.clone()).collect())
}

/// Default export file stem: page slug plus the axis names.
pub fn suggested_stem(opts: &CollateOptions) -> String {
    let axes = opts.axis_names();
    filename_stem(
        &[url_slug(&opts.url), axes[0].as_str(), axes[1].as_str(), axes[2].as_str()],
        crate::config::consts::DEFAULT_FILE,
    )
}

/* ---------------- Browser-backed ---------------- */

/// Resolve, start a browser, collect, close the browser.
#[cfg(feature = "webdriver")]
pub fn collate(
    opts: &CollateOptions,
    registry: &Registry,
    progress: &mut dyn Progress,
) -> Result<Collated, CollateError> {
    opts.validate()?;
    let resolved = registry.resolve(&opts.url)?;
    if resolved.partial {
        progress.log("Warning: URL is not fully supported. Collating anyway...");
    }

    progress.log(&format!("Starting {}...", opts.browser));
    let mut doc = WebDriverDocument::connect(&opts.webdriver_url, opts.browser, opts.headless)?
        .with_timeout(opts.query_timeout());
    let out = collect(&mut doc, opts, resolved.kind, progress);
    if let Err(e) = doc.close() {
        logw!("Closing browser: {e}");
    }
    if let Err(e) = &out {
        loge!("Collation failed: {e}");
    }
    out
}

/// Collate and write the export file.
#[cfg(feature = "webdriver")]
pub fn run(
    app: &AppOptions,
    registry: &Registry,
    progress: &mut dyn Progress,
) -> Result<RunSummary, Box<dyn Error>> {
    file::check_writable(&app.export)?;
    let collated = collate(&app.collate, registry, progress)?;
    let file_written = file::write_export(&app.export, &collated.table.to_dataset())?;
    progress.log(&format!("Wrote {}", file_written.display()));
    Ok(RunSummary { file_written, collated })
}

#[cfg(feature = "webdriver")]
pub fn list_axes(opts: &CollateOptions, registry: &Registry) -> Result<Vec<String>, CollateError> {
    let resolved = registry.resolve(&opts.url)?;
    let mut doc = WebDriverDocument::connect(&opts.webdriver_url, opts.browser, opts.headless)?
        .with_timeout(opts.query_timeout());
    let out = axes_offered(&mut doc, opts, resolved.kind);
    if let Err(e) = doc.close() {
        logw!("Closing browser: {e}");
    }
    out
}
