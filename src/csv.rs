// src/csv.rs
use std::io::{self, Write};

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/* ---------------- Export ---------------- */

/// Create a full export string (Copy/Export).
/// - `headers`: column headers (if any)
/// - `rows`: data rows
/// - `include_headers`: whether to emit a header line
/// - `sep`: character to be used as field/cell separator
pub fn to_export_string(
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    include_headers: bool,
    sep: char,
) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        if let Some(h) = headers {
            let _ = write_row(&mut buf, h, sep);
        }
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_with_separators_are_quoted() {
        let headers = Some(vec![s!("Court"), s!("Decision"), s!("Total")]);
        let rows = vec![vec![s!("New York, NY"), s!("Said \"no\""), s!("3")]];
        let out = to_export_string(&headers, &rows, true, ',');
        assert_eq!(out, "Court,Decision,Total\n\"New York, NY\",\"Said \"\"no\"\"\",3\n");

        let bare = to_export_string(&headers, &rows, false, ',');
        assert!(!bare.starts_with("Court"));
        assert_eq!(out.lines().count(), bare.lines().count() + 1);
    }

    #[test]
    fn tsv_leaves_commas_alone() {
        let rows = vec![vec![s!("New York, NY"), s!("1,200")]];
        let out = to_export_string(&None, &rows, true, '\t');
        assert_eq!(out, "New York, NY\t1,200\n");
    }
}
