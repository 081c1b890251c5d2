// src/specs/rows.rs
//! Table text → `(category, count)` lines.
//!
//! A data line is `<category name> <count>`: the rightmost whitespace-separated
//! token is the count (digit separators allowed), everything before it the name.
//! Blank lines, header lines (non-numeric count) and aggregate lines
//! (`All`, `Total`, `All-*`) are structural and dropped.

use crate::core::sanitize::normalize_ws;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLine {
    pub name: String,
    pub value: u64,
}

pub fn parse_lines(text: &str) -> Vec<ParsedLine> {
    text.lines().filter_map(parse_line).collect()
}

/// `None` for structural lines.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    let (name, value) = line.rsplit_once(char::is_whitespace)?;
    let name = normalize_ws(name);
    let value = value.trim();

    if name.is_empty() || is_aggregate(&name) || is_aggregate(value) {
        return None;
    }

    let digits: String = value.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = digits.parse::<u64>().ok()?;
    Some(ParsedLine { name, value })
}

fn is_aggregate(s: &str) -> bool {
    s == "All" || s == "Total" || s.starts_with("All-")
}

/// `1234567` → `1,234,567`, the way the pages print counts.
pub fn fmt_count(n: u64) -> String {
    let raw = n.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
