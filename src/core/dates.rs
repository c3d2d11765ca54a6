// src/core/dates.rs
use chrono::{Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD`
pub fn to_iso_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM`
pub fn to_iso_month(d: NaiveDate) -> String {
    d.format("%Y-%m").to_string()
}

pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Accepts `YYYY-MM` only.
pub fn is_iso_month(s: &str) -> bool {
    let s = s.trim();
    s.len() == 7 && NaiveDate::parse_from_str(&join!(s, "-01"), "%Y-%m-%d").is_ok()
}

/// Bring the date spellings seen upstream onto `YYYY-MM-DD`.
/// `dd/mm/yyyy`, `yyyy-mm-dd`, or a `dd/mm/yyyy` buried in text; anything else comes back trimmed.
pub fn normalize_date(s: &str) -> String {
    let s = s.trim();
    if let Some(d) = dmy_at(s, 0).filter(|_| s.len() == 10) {
        return d;
    }
    if parse_iso_date(s).is_some() && s.len() == 10 {
        return s.to_string();
    }
    for (i, _) in s.char_indices() {
        if let Some(d) = dmy_at(s, i) {
            return d;
        }
    }
    s.to_string()
}

fn dmy_at(s: &str, at: usize) -> Option<String> {
    let b = s.as_bytes().get(at..at + 10)?;
    let digits = |r: std::ops::Range<usize>| b[r].iter().all(u8::is_ascii_digit);
    if digits(0..2) && b[2] == b'/' && digits(3..5) && b[5] == b'/' && digits(6..10) {
        let t = &s[at..at + 10];
        Some(format!("{}-{}-{}", &t[6..10], &t[3..5], &t[0..2]))
    } else {
        None
    }
}
