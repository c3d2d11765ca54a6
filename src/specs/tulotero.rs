// src/specs/tulotero.rs
//
// Upstream results page.
//
// The page ships its data inside an inline script as `console.log({"resultados":[...]})`.
// We find that script, cut the object literal out of the call and read it as JSON.
// Each entry carries `fecha` (or `date`), `juego`, `combinacion` ("a,b,c,d,e") and
// `estrella1`/`estrella2` (number or string).
//
// Selection: the entry whose date matches the requested one, else the first
// EUROMILLONES entry, else the first entry.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::config::consts::{NUMBERS_PER_BET, STARS_PER_BET};
use crate::core::dates::normalize_date;
use crate::core::html::script_bodies;
use crate::fetch::OfficialResult;

const GAME: &str = "EUROMILLONES";

fn payload_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"console\.log\((\{[\s\S]*?\})\);?").ok()).as_ref()
}

/// Body of the last script that logs the results object.
fn results_script(html: &str) -> Option<String> {
    script_bodies(html)
        .into_iter()
        .filter(|body| body.contains("console.log({") && body.contains("\"resultados\""))
        .last()
}

/// Leading integer of a JSON number or string, like a lenient `parseInt`.
fn leading_int(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => {
            let whole = n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))?;
            u32::try_from(whole).ok()
        }
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn entry_date(entry: &Value) -> Option<String> {
    ["fecha", "date"].iter().find_map(|k| match entry.get(*k) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(normalize_date(s)),
        _ => None,
    })
}

fn select_entry<'a>(list: &'a [Value], fecha: Option<&str>) -> Option<&'a Value> {
    if let Some(target) = fecha.map(normalize_date).filter(|t| !t.is_empty()) {
        if let Some(hit) = list.iter().find(|e| entry_date(e).as_deref() == Some(target.as_str())) {
            logd!("Tulotero: matched entry for {target}");
            return Some(hit);
        }
        logd!("Tulotero: nothing for {target}, falling back");
    }
    list.iter()
        .find(|e| e.get("juego").and_then(Value::as_str) == Some(GAME))
        .or_else(|| list.first())
}

/// Extract the winning combination from the page. `None` when anything is off.
pub fn parse_results_page(html: &str, fecha: Option<&str>) -> Option<OfficialResult> {
    let Some(script) = results_script(html) else {
        logd!("Tulotero: results script not found");
        return None;
    };
    let caps = payload_re()?.captures(&script)?;
    let data: Value = match serde_json::from_str(&caps[1]) {
        Ok(v) => v,
        Err(e) => {
            logd!("Tulotero: payload is not JSON: {e}");
            return None;
        }
    };

    let list = data.get("resultados")?.as_array()?;
    let entry = select_entry(list, fecha)?;

    let combo = entry.get("combinacion")?.as_str()?;
    let win_nums: Vec<u32> = combo
        .split(',')
        .map(|n| leading_int(&Value::String(n.to_string())))
        .collect::<Option<_>>()?;
    let win_stars: Vec<u32> = ["estrella1", "estrella2"]
        .iter()
        .map(|k| entry.get(*k).and_then(leading_int))
        .collect::<Option<_>>()?;

    if win_nums.len() != NUMBERS_PER_BET || win_stars.len() != STARS_PER_BET {
        logd!("Tulotero: unexpected shape {:?} / {:?}", win_nums, win_stars);
        return None;
    }
    Some(OfficialResult { win_nums, win_stars })
}
