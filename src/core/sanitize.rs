// src/core/sanitize.rs

/// Collapse whitespace runs to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Fixed-width progress label: anything over 24 chars is cut to 20 plus "...",
/// then padded to 25.
pub fn shorten(name: &str) -> String {
    let count = name.chars().count();
    let cut: String = if count > 24 {
        let head: String = name.chars().take(20).collect();
        join!(&head, "...")
    } else {
        s!(name)
    };
    format!("{cut:<25}")
}

/// File-system friendly stem: alphanumerics kept, whitespace and separators
/// folded to single underscores.
pub fn filename_stem(parts: &[&str], fallback: &str) -> String {
    let mut out = String::new();
    let mut last_us = true;
    for part in parts {
        for ch in part.chars() {
            if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
            else if ch == '-' { out.push(ch); last_us = false; }
            else if !last_us { out.push('_'); last_us = true; }
        }
        if !last_us { out.push('_'); last_us = true; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}

/// Last non-empty path segment of a URL, without extension.
pub fn url_slug(url: &str) -> &str {
    let seg = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");
    seg.split('.').next().unwrap_or(seg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_pads_and_truncates() {
        assert_eq!(shorten("Asylum"), format!("{:<25}", "Asylum"));
        let long = shorten("Immigration Court Hearing Location");
        assert_eq!(long, format!("{:<25}", "Immigration Court He..."));
    }

    #[test]
    fn stem_from_url_and_axes() {
        let url = "https://trac.syr.edu/phptools/immigration/asylum/";
        let stem = filename_stem(&[url_slug(url), "Decision", "Age Group", "In Absentia?"], "x");
        assert_eq!(stem, "asylum_Decision_Age_Group_In_Absentia");
        assert_eq!(url_slug("https://trac.syr.edu/immigration/detentionstats/facilities.html"), "facilities");
        assert_eq!(filename_stem(&["??"], "collated"), "collated");
    }

    #[test]
    fn normalize_ws_collapses_runs() {
        assert_eq!(normalize_ws("  New   York \t 12 "), "New York 12");
    }
}
