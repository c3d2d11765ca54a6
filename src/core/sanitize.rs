// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}

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

/// Trimmed copy; `None` becomes empty.
pub fn clamp_str(s: Option<&str>) -> String {
    s.unwrap_or("").trim().to_string()
}

/// Trimmed, or `None` when nothing is left.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    let t = clamp_str(s);
    if t.is_empty() { None } else { Some(t) }
}

/// Parse a Spanish-formatted amount: `1.234.567,89` → 1234567.89
pub fn parse_es_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().replace('.', "").replace(',', ".");
    cleaned.parse::<f64>().ok()
}
