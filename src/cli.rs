// src/cli.rs
use clap::Parser;
use color_eyre::eyre::{bail, eyre};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::config::consts::{DEFAULT_WEBDRIVER_URL, QUERY_TIMEOUT_SECS};
use crate::config::options::{AppOptions, BrowserKind, CollateOptions, ExportFormat};
use crate::config::registry::Registry;
use crate::core::sanitize::shorten;
use crate::file::normalize_separators;
use crate::progress::Progress;
use crate::runner;

#[derive(Parser, Debug)]
#[command(name = "cli")]
#[command(about = "Collate a three-axis TRAC cross-tabulation into a CSV/TSV file")]
pub struct Args {
    /// Entry page (see --list-pages)
    #[arg(long)]
    pub url: Option<String>,

    /// Axis name; give exactly three, outermost first
    #[arg(long = "axis", value_name = "NAME")]
    pub axes: Vec<String>,

    /// Reorder axes internally to minimize page interactions
    #[arg(long)]
    pub optimize: bool,

    /// Firefox, Chrome, Edge or Safari
    #[arg(long, default_value = "firefox")]
    pub browser: BrowserKind,

    #[arg(long)]
    pub headless: bool,

    /// WebDriver server URL
    #[arg(long, default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver: String,

    /// Output file; extension follows --format
    #[arg(short, long)]
    pub out: Option<String>,

    /// csv or tsv
    #[arg(long, default_value = "csv")]
    pub format: ExportFormat,

    /// Omit the header line
    #[arg(long)]
    pub no_headers: bool,

    /// Cap every retry loop at N attempts
    #[arg(long, value_name = "N")]
    pub attempt_cap: Option<u32>,

    /// Seconds one browser query waits for a match
    #[arg(long, value_name = "SECS", default_value_t = QUERY_TIMEOUT_SECS)]
    pub query_timeout: u64,

    /// Print known pages and exit
    #[arg(long)]
    pub list_pages: bool,

    /// Print the axes the page offers and exit
    #[arg(long)]
    pub list_axes: bool,
}

impl Args {
    pub fn to_options(&self) -> color_eyre::Result<AppOptions> {
        let mut collate = CollateOptions::default();
        if let Some(url) = &self.url {
            collate.url = url.clone();
        }
        if !self.list_axes {
            let [a, b, c]: [String; 3] = self.axes.clone().try_into().map_err(|v: Vec<String>| {
                eyre!("exactly three --axis values are required (got {})", v.len())
            })?;
            collate.axes = [a, b, c];
        }
        collate.optimize = self.optimize;
        collate.browser = self.browser;
        collate.headless = self.headless;
        collate.webdriver_url = self.webdriver.clone();
        collate.attempt_cap = self.attempt_cap;
        collate.query_timeout_secs = self.query_timeout;

        let mut app = AppOptions { collate, ..Default::default() };
        app.export.format = self.format;
        app.export.include_headers = !self.no_headers;
        match &self.out {
            Some(o) => app.export.set_path(&normalize_separators(o)),
            None => {
                let stem = runner::suggested_stem(&app.collate);
                let dir = crate::config::consts::DEFAULT_OUT_DIR;
                app.export.set_path(&format!("{dir}/{stem}"));
            }
        }
        Ok(app)
    }
}

pub fn run() -> color_eyre::Result<()> {
    color_eyre::install()?;
    crate::log::init();

    let args = Args::parse();
    let registry = Registry::builtin();

    if args.list_pages {
        for (url, page) in registry.iter() {
            println!("{url}\t{}", page.label());
        }
        return Ok(());
    }

    let app = args.to_options()?;

    if args.list_axes {
        for axis in runner::list_axes(&app.collate, &registry)? {
            println!("{axis}");
        }
        return Ok(());
    }

    if let Err(e) = app.collate.validate() {
        bail!(e);
    }

    let mut progress = CliProgress::new();
    let summary = runner::run(&app, &registry, &mut progress).map_err(|e| eyre!("{e}"))?;

    let c = &summary.collated;
    if !c.assignment.is_identity() {
        eprintln!("Traversed as {:?}", c.assignment.apply(&app.collate.axis_names()));
    }
    if c.anomalies > 0 {
        eprintln!("{} row/element mismatches absorbed (see {})", c.anomalies, crate::config::consts::LOG_DIR);
    }
    println!("{}", summary.file_written.display());
    Ok(())
}

/* ---------------- Progress bars ---------------- */

/// Two bars: table-1 rows, and table-2 rows under the current table-1 row.
struct CliProgress {
    multi: MultiProgress,
    outer: Option<ProgressBar>,
    inner: Option<ProgressBar>,
}

impl CliProgress {
    fn new() -> Self {
        Self { multi: MultiProgress::new(), outer: None, inner: None }
    }

    fn bar(&self, len: usize) -> ProgressBar {
        let style = ProgressStyle::with_template("{msg}{percent:>3}%|{bar:30}| {pos}/{len} [{per_sec}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let pb = self.multi.add(ProgressBar::new(len as u64));
        pb.set_style(style);
        pb
    }

    fn clear(&mut self) {
        if let Some(i) = self.inner.take() { i.finish_and_clear(); }
        if let Some(o) = self.outer.take() { o.finish_and_clear(); }
    }
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.clear();
        self.outer = Some(self.bar(total));
    }

    fn row_begin(&mut self, name: &str, children: usize) {
        if let Some(i) = self.inner.take() {
            i.finish_and_clear();
            if let Some(o) = &self.outer { o.inc(1); }
        }
        if let Some(o) = &self.outer {
            o.set_message(shorten(&format!("Table 1: {name}")));
        }
        self.inner = Some(self.bar(children));
    }

    fn cell_done(&mut self, _outer: &str, inner: &str) {
        if let Some(i) = &self.inner {
            i.set_message(shorten(&format!("Table 2: {inner}")));
            i.inc(1);
        }
    }

    fn log(&mut self, msg: &str) {
        let _ = self.multi.println(msg);
    }

    fn finish(&mut self) {
        self.clear();
    }
}
