// src/eligibility.rs
//
// Who may play a given draw.
//
// A participant plays iff they are active, their entry for the pay month is marked
// paid (`pagado == true`, nothing looser), and their preference is the draw's day or `ambos`.

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::consts::MAX_NEXT_DRAW_WEEKS;
use crate::core::dates;
use crate::csv::{write_row, Quote};
use crate::model::{DrawDay, Participant, PaymentEntry};
use crate::store::Store;

/// Pure check for one participant. Missing participant or missing entry → false.
pub fn is_eligible(participant: Option<&Participant>, day: DrawDay, entry: Option<&PaymentEntry>) -> bool {
    let Some(p) = participant else { return false };
    if !p.active {
        return false;
    }
    match entry {
        Some(e) if e.paid => p.preference.matches(day),
        _ => false,
    }
}

/// Ids of everyone eligible for `day` paid through `pay_month`, in participant-list order.
///
/// Backfills the month first (`Store::ensure_pay_month`), so this may add the month and
/// default entries to the document. Returns nothing when either argument is missing.
pub fn compute_eligible_ids(store: &mut Store, day: Option<DrawDay>, pay_month: &str) -> Vec<String> {
    let pay_month = pay_month.trim();
    let Some(day) = day else { return Vec::new() };
    if pay_month.is_empty() {
        return Vec::new();
    }

    store.ensure_pay_month(pay_month);
    let doc = store.document();
    doc.participants
        .iter()
        .filter(|p| is_eligible(Some(p), day, doc.entry(pay_month, &p.id)))
        .map(|p| p.id.clone())
        .collect()
}

/// Eligible participants themselves, same order as `compute_eligible_ids`.
pub fn eligible_participants(store: &mut Store, day: Option<DrawDay>, pay_month: &str) -> Vec<Participant> {
    let ids = compute_eligible_ids(store, day, pay_month);
    ids.iter()
        .filter_map(|id| store.participant(id).cloned())
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextDraw {
    pub date: NaiveDate,
    pub day: DrawDay,
    pub ids: Vec<String>,
}

/// First Tuesday/Friday from `from` (inclusive) within `max_weeks` weeks that has at least
/// one eligible participant. The pay month is the candidate date's own month.
/// `max_weeks` is capped at `MAX_NEXT_DRAW_WEEKS`; the scan also stops at the end of the
/// calendar.
pub fn next_eligible_draw(
    store: &mut Store,
    from: NaiveDate,
    max_weeks: u32,
    allowed: &[DrawDay],
) -> Option<NextDraw> {
    let weeks = max_weeks.min(MAX_NEXT_DRAW_WEEKS);
    for i in 0..(i64::from(weeks) * 7) {
        let d = from.checked_add_signed(Duration::days(i))?;
        let Some(day) = DrawDay::from_weekday(d.weekday()) else { continue };
        if !allowed.contains(&day) {
            continue;
        }
        let ids = compute_eligible_ids(store, Some(day), &dates::to_iso_month(d));
        if !ids.is_empty() {
            return Some(NextDraw { date: d, day, ids });
        }
    }
    None
}

/// `id,nombre` CSV of the eligible participants; data fields are always quoted.
pub fn eligible_csv(store: &mut Store, day: Option<DrawDay>, pay_month: &str) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let _ = write_row(&mut buf, &[s!("id"), s!("nombre")], ',', Quote::Minimal);
    for p in eligible_participants(store, day, pay_month) {
        let _ = write_row(&mut buf, &[p.id, p.name], ',', Quote::Always);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
