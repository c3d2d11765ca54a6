// src/specs/pasted.rs
//
// Results block pasted by hand from any results page.
//
// There is no structure to rely on, only the shape of a combination: seven small numbers
// close together. Strip the markup, find every run of one/two-digit numbers where each
// follows the previous within a few characters, and take the last run. Its first five
// values are the numbers, the next two the stars. A `Bote … 17.000.000` line, if present,
// gives the prize.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::html::strip_tags;
use crate::core::sanitize::{normalize_entities, parse_es_amount};

const MIN_RUN: usize = 7;
const MAX_RUN: usize = 20;
/// Max characters between two numbers of the same run.
const MAX_GAP: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct PastedResult {
    pub win_nums: Vec<u32>,
    pub win_stars: Vec<u32>,
    pub prize: Option<f64>,
}

fn number_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})\b").ok()).as_ref()
}

fn prize_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Bote[^0-9]*([0-9.,]+)").ok()).as_ref()
}

pub fn parse_results_from_text(text: &str) -> Option<PastedResult> {
    if text.trim().is_empty() {
        return None;
    }

    let prize = prize_re()
        .and_then(|re| re.captures(text))
        .and_then(|c| parse_es_amount(&c[1]));

    let clean = strip_tags(normalize_entities(text));

    // (value, start, end) of every standalone 1-2 digit number
    let found: Vec<(u32, usize, usize)> = number_re()?
        .captures_iter(&clean)
        .filter_map(|c| {
            let m = c.get(1)?;
            Some((m.as_str().parse().ok()?, m.start(), m.end()))
        })
        .collect();

    let mut chosen: Option<&[(u32, usize, usize)]> = None;
    for i in 0..found.len() {
        let mut end = i + 1;
        while end < found.len() && end - i < MAX_RUN && found[end].1 - found[end - 1].2 <= MAX_GAP {
            end += 1;
        }
        if end - i >= MIN_RUN {
            chosen = Some(&found[i..end]);
        }
    }

    let run = chosen?;
    let values: Vec<u32> = run.iter().map(|(v, _, _)| *v).collect();
    logd!("Pasted: picked run of {} numbers", values.len());

    Some(PastedResult {
        win_nums: values[..5].to_vec(),
        win_stars: values[5..7].to_vec(),
        prize,
    })
}
