// src/config/options.rs
use std::ffi::OsString;
use std::fmt;
use std::path::{ Path, PathBuf };
use std::str::FromStr;
use std::time::Duration;

use super::consts::*;
use crate::engine::{CollateError, Tuning};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub collate: CollateOptions,
    pub export: ExportOptions,
}

/* ---------------- Collation ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    Firefox,
    Chrome,
    Edge,
    Safari,
}

impl BrowserKind {
    pub const ALL: [BrowserKind; 4] = [Self::Firefox, Self::Chrome, Self::Edge, Self::Safari];

    pub fn name(self) -> &'static str {
        match self {
            Self::Firefox => "Firefox",
            Self::Chrome  => "Chrome",
            Self::Edge    => "Edge",
            Self::Safari  => "Safari",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrowserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firefox" | "gecko" => Ok(Self::Firefox),
            "chrome" | "chromium" => Ok(Self::Chrome),
            "edge" | "msedge" => Ok(Self::Edge),
            "safari" => Ok(Self::Safari),
            other => Err(format!(
                "browser must be one of: Firefox, Chrome, Edge, Safari (got {other:?})"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollateOptions {
    /// Entry page; must be known to the registry.
    pub url: String,
    /// Axis names in the order the user wants them in the output.
    pub axes: [String; 3],
    /// Reorder axes internally to minimize page interactions.
    pub optimize: bool,
    pub browser: BrowserKind,
    pub headless: bool,
    pub webdriver_url: String,
    /// Cap every retry loop (tests / impatient runs). None = production policy.
    pub attempt_cap: Option<u32>,
    /// How long one browser query waits for a match.
    pub query_timeout_secs: u64,
}

impl Default for CollateOptions {
    fn default() -> Self {
        Self {
            url: s!("https://tracreports.org/phptools/immigration/asylum/"),
            axes: [s!("Decision"), s!("Age"), s!("Absentia")],
            optimize: false,
            browser: BrowserKind::Firefox,
            headless: false,
            webdriver_url: s!(DEFAULT_WEBDRIVER_URL),
            attempt_cap: None,
            query_timeout_secs: QUERY_TIMEOUT_SECS,
        }
    }
}

impl CollateOptions {
    /// Three non-empty, pairwise distinct axis names.
    pub fn validate(&self) -> Result<(), CollateError> {
        for (i, axis) in self.axes.iter().enumerate() {
            if axis.trim().is_empty() {
                return Err(CollateError::InvalidAxes(format!("axis {} is empty", i + 1)));
            }
        }
        for i in 0..3 {
            for j in (i + 1)..3 {
                if self.axes[i].trim() == self.axes[j].trim() {
                    return Err(CollateError::InvalidAxes(format!(
                        "axis {:?} is given twice", self.axes[i].trim()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Trimmed copy of the axis names.
    pub fn axis_names(&self) -> [String; 3] {
        self.axes.clone().map(|a| s!(a.trim()))
    }

    pub fn tuning(&self) -> Tuning {
        match self.attempt_cap {
            Some(cap) => Tuning::default().with_attempt_cap(cap),
            None => Tuning::default(),
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/* ---------------- Export ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    out_path: OutputPath,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_path: OutputPath::default(),
            include_headers: true,
        }
    }
}

impl ExportOptions {
    /// `<dir>/<stem>.<ext>`; the extension always follows `format`.
    pub fn out_path(&self) -> PathBuf {
        let stem = self.out_path.file_stem.to_string_lossy();
        self.out_path.dir.join(join!(&*stem, ".", self.format.ext()))
    }

    /// Parse GUI/CLI text into dir + stem. Ignores pasted extension; format controls it.
    pub fn set_path(&mut self, text: &str) {
        let p = Path::new(text.trim());
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
    }

    /// Directory the export lands in.
    pub fn out_dir(&self) -> &Path {
        &self.out_path.dir
    }

    pub fn delim(&self) -> char {
        self.format.delim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
        }
    }
}
