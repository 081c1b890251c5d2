// src/file.rs

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use crate::csv::to_export_string;
use crate::config::options::ExportOptions;
use crate::data::DataSet;

/// Write one export file based on ExportOptions (path, headers policy, delimiter).
/// Returns the final path written to.
pub fn write_export(
    export: &ExportOptions,
    data: &DataSet,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let contents = to_export_string(
        &data.headers,
        &data.rows,
        export.include_headers,
        export.delim(),
    );

    fs::write(&path, contents)?;
    logf!("Wrote {} rows to {}", data.rows.len(), path.display());
    Ok(path)
}

/// Fail early, before a long collation, if the export target can't be written.
pub fn check_writable(export: &ExportOptions) -> Result<(), Box<dyn std::error::Error>> {
    let path = export.out_path();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_directory(&dir)?;
    if path.is_dir() {
        return Err(format!("Export path is a directory: {}", path.display()).into());
    }

    let probe = dir.join(".collate-write-probe");
    OpenOptions::new().create(true).write(true).truncate(true).open(&probe)?;
    let _ = fs::remove_file(&probe);
    Ok(())
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c=='/'||c=='\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}
