// src/store.rs
//
// The repository that owns the pool document.
//
// - One `Document` per session, one writer (`&mut Store`).
// - Mutations happen in memory; `save()` persists the whole document as one JSON blob.
// - Payment months are backfilled explicitly through `ensure_pay_month`; every path that
//   reads a month's entries calls it first.
// - Validation failures return `PenaError` and leave the document untouched.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::config::consts::{FIXED_BET_ID_PREFIX, NUMBERS_PER_BET, STARS_PER_BET};
use crate::core::dates;
use crate::eligibility;
use crate::error::{PenaError, Result};
use crate::model::*;
use crate::settlement;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Input for `Store::create_draw`.
#[derive(Clone, Debug, Default)]
pub struct NewDraw {
    pub date: String,
    pub day: Option<DrawDay>,
    pub pay_month: String,
    pub note: String,
}

/// Partial update of one payment entry; `None` fields are left alone.
#[derive(Clone, Debug, Default)]
pub struct PaymentUpdate {
    pub paid: Option<bool>,
    pub paid_on: Option<String>,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub amount: Option<f64>,
}

/// Partial update of the config; `None` fields are left alone.
#[derive(Clone, Debug, Default)]
pub struct ConfigUpdate {
    pub bet_cost: Option<f64>,
    pub suggested_monthly: Option<f64>,
    pub next_draw_weeks: Option<u32>,
    pub next_draw_days: Option<NextDrawDays>,
    pub proxy_url: Option<String>,
    pub proxy_key: Option<String>,
}

pub struct Store {
    doc: Document,
    path: Option<PathBuf>,
}

impl Store {
    /// Load the document at `path`, or start a fresh one if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let doc: Document = serde_json::from_str(&text)?;
            logd!("Store: loaded {} ({} participants, {} draws)",
                path.display(), doc.participants.len(), doc.draws.len());
            doc
        } else {
            logf!("Store: no document at {}, starting empty", path.display());
            Document::default()
        };
        Ok(Self { doc, path: Some(path) })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self { doc: Document::default(), path: None }
    }

    pub fn from_document(doc: Document) -> Self {
        Self { doc, path: None }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stamp `meta.updatedAt` and write the whole document.
    pub fn save(&mut self) -> Result<()> {
        self.doc.meta.updated_at = chrono::Utc::now().to_rfc3339();
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(&self.doc)?;
        crate::file::write_atomic(path, text.as_bytes())?;
        logd!("Store: saved {}", path.display());
        Ok(())
    }

    /// Drop every participant, payment and draw. Removes the file as well.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(path) = self.path.as_deref() {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        self.doc = Document::default();
        logf!("Store: reset");
        Ok(())
    }

    /* ---------------- Payment months ---------------- */

    /// Create the month if needed and give every participant an entry in it.
    /// Blank months are ignored.
    pub fn ensure_pay_month(&mut self, month: &str) {
        let month = month.trim();
        if month.is_empty() {
            return;
        }
        let Document { participants, payments, .. } = &mut self.doc;
        let pm = payments.entry(month.to_string()).or_default();
        for p in participants.iter() {
            pm.entries.entry(p.id.clone()).or_default();
        }
    }

    /// Entries for `month`, after backfill.
    pub fn month_entries(&mut self, month: &str) -> Option<&PaymentMonth> {
        self.ensure_pay_month(month);
        self.doc.payments.get(month.trim())
    }

    pub fn payment_entry(&mut self, month: &str, participant_id: &str) -> Option<&PaymentEntry> {
        self.ensure_pay_month(month);
        self.doc.entry(month.trim(), participant_id)
    }

    pub fn update_payment(&mut self, month: &str, participant_id: &str, up: PaymentUpdate) -> Result<&PaymentEntry> {
        let month = require_month(month)?;
        if self.doc.participant(participant_id).is_none() {
            return Err(PenaError::UnknownParticipant(participant_id.to_string()));
        }
        self.ensure_pay_month(&month);
        let entry = self.doc.payments
            .get_mut(&month)
            .and_then(|pm| pm.entries.get_mut(participant_id))
            .ok_or_else(|| PenaError::UnknownParticipant(participant_id.to_string()))?;

        if let Some(v) = up.paid { entry.paid = v; }
        if let Some(v) = up.paid_on { entry.paid_on = v; }
        if let Some(v) = up.method { entry.method = v; }
        if let Some(v) = up.notes { entry.notes = v; }
        if let Some(v) = up.amount { entry.amount = if v.is_finite() { v } else { 0.0 }; }
        Ok(&*entry)
    }

    /// Set `pagado` for every active participant. Marking paid stamps today's date
    /// on entries that have none. Returns how many entries were touched.
    pub fn mark_all(&mut self, month: &str, paid: bool) -> Result<usize> {
        let month = require_month(month)?;
        self.ensure_pay_month(&month);
        let today = dates::to_iso_date(dates::today());
        let Document { participants, payments, .. } = &mut self.doc;
        let Some(pm) = payments.get_mut(&month) else {
            return Ok(0);
        };
        let mut touched = 0;
        for p in participants.iter().filter(|p| p.active) {
            if let Some(e) = pm.entries.get_mut(&p.id) {
                e.paid = paid;
                if paid && e.paid_on.is_empty() {
                    e.paid_on = today.clone();
                }
                touched += 1;
            }
        }
        logf!("Payments: {month} marked {} for {touched} participants",
            if paid { "paid" } else { "unpaid" });
        Ok(touched)
    }

    /* ---------------- Participants ---------------- */

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.doc.participant(id)
    }

    /// Participants sorted by name, as listings show them.
    pub fn participants_by_name(&self) -> Vec<&Participant> {
        let mut v: Vec<&Participant> = self.doc.participants.iter().collect();
        v.sort_by_key(|p| p.name.to_lowercase());
        v
    }

    pub fn add_participant(&mut self, name: &str, preference: Preference, notes: Option<&str>) -> Result<&Participant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PenaError::MissingName);
        }
        let p = Participant {
            id: new_id(),
            name: name.to_string(),
            preference,
            active: true,
            notes: crate::core::sanitize::non_blank(notes),
        };
        logf!("Participants: added {} ({})", p.name, p.id);
        self.doc.participants.push(p);
        Ok(&self.doc.participants[self.doc.participants.len() - 1])
    }

    pub fn update_participant(
        &mut self,
        id: &str,
        name: Option<&str>,
        preference: Option<Preference>,
        notes: Option<&str>,
    ) -> Result<&Participant> {
        let name = match name {
            Some(n) if n.trim().is_empty() => return Err(PenaError::MissingName),
            Some(n) => Some(n.trim().to_string()),
            None => None,
        };
        let p = self.participant_mut(id)?;
        if let Some(n) = name { p.name = n; }
        if let Some(pref) = preference { p.preference = pref; }
        if notes.is_some() { p.notes = crate::core::sanitize::non_blank(notes); }
        Ok(&*p)
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> Result<&Participant> {
        let p = self.participant_mut(id)?;
        p.active = active;
        Ok(&*p)
    }

    /// Remove a participant and every trace of them: payment entries in all months,
    /// seats in all draws. Each draw's total is recomputed from its remaining players.
    pub fn delete_participant(&mut self, id: &str) -> Result<Participant> {
        let pos = self.doc.participants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PenaError::UnknownParticipant(id.to_string()))?;
        let removed = self.doc.participants.remove(pos);

        for pm in self.doc.payments.values_mut() {
            pm.entries.remove(id);
        }

        let cost = self.doc.config.bet_cost();
        for d in self.doc.draws.iter_mut() {
            d.players.retain(|pid| pid != id);
            d.total_euros = d.players.len() as f64 * cost;
        }

        logf!("Participants: deleted {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    fn participant_mut(&mut self, id: &str) -> Result<&mut Participant> {
        self.doc.participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PenaError::UnknownParticipant(id.to_string()))
    }

    /* ---------------- Draws ---------------- */

    pub fn draw(&self, id: &str) -> Option<&Draw> {
        self.doc.draw(id)
    }

    /// Most recent first.
    pub fn draws_by_date_desc(&self) -> Vec<&Draw> {
        let mut v: Vec<&Draw> = self.doc.draws.iter().collect();
        v.sort_by(|a, b| b.date.cmp(&a.date));
        v
    }

    /// Create a draw for everyone eligible right now, with the configured fixed bets
    /// copied in. Later config edits do not touch this copy.
    pub fn create_draw(&mut self, new: NewDraw) -> Result<&Draw> {
        let date = new.date.trim().to_string();
        if date.is_empty() {
            return Err(PenaError::MissingDrawDate);
        }
        let pay_month = require_month(&new.pay_month)?;
        let day = match new.day {
            Some(d) => d,
            None => return Err(PenaError::NoEligiblePlayers { day: s!(), month: pay_month }),
        };

        let players = eligibility::compute_eligible_ids(self, Some(day), &pay_month);
        if players.is_empty() {
            return Err(PenaError::NoEligiblePlayers { day: day.to_string(), month: pay_month });
        }

        let fixed_bets = self.doc.config.fixed_bets
            .iter()
            .map(|fb| Bet {
                id: join!(FIXED_BET_ID_PREFIX, &new_id()),
                numbers: fb.nums.clone(),
                stars: fb.ests.clone(),
                fixed: Some(true),
            })
            .collect();

        let draw = Draw {
            id: new_id(),
            date,
            day,
            pay_month,
            total_euros: players.len() as f64 * self.doc.config.bet_cost(),
            players,
            bets: Vec::new(),
            fixed_bets,
            prize: 0.0,
            note: new.note,
            results: None,
        };
        logf!("Draws: created {} {} with {} players", draw.date, draw.day, draw.players.len());
        self.doc.draws.push(draw);
        Ok(&self.doc.draws[self.doc.draws.len() - 1])
    }

    pub fn delete_draw(&mut self, id: &str) -> Result<Draw> {
        let pos = self.doc.draws
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| PenaError::UnknownDraw(id.to_string()))?;
        Ok(self.doc.draws.remove(pos))
    }

    pub fn add_bet(&mut self, draw_id: &str, numbers: Vec<u32>, stars: Vec<u32>) -> Result<&Bet> {
        validate_bet(&numbers, &stars)?;
        let d = self.draw_mut(draw_id)?;
        d.bets.push(Bet { id: new_id(), numbers, stars, fixed: None });
        Ok(&d.bets[d.bets.len() - 1])
    }

    /// Remove one of the draw's own bets. Snapshotted fixed bets stay.
    pub fn remove_bet(&mut self, draw_id: &str, bet_id: &str) -> Result<Bet> {
        let d = self.draw_mut(draw_id)?;
        let pos = d.bets
            .iter()
            .position(|b| b.id == bet_id)
            .ok_or_else(|| PenaError::UnknownBet(bet_id.to_string()))?;
        Ok(d.bets.remove(pos))
    }

    /// Settle a draw against the winning combination and keep the summary on it.
    pub fn record_results(
        &mut self,
        draw_id: &str,
        win_nums: &[u32],
        win_stars: &[u32],
        prize: f64,
    ) -> Result<&ResultSummary> {
        if win_nums.len() < NUMBERS_PER_BET {
            return Err(PenaError::NotEnoughNumbers { expected: NUMBERS_PER_BET, got: win_nums.len() });
        }
        let prize = if prize.is_finite() { prize } else { 0.0 };
        let draw = self.doc.draw(draw_id).ok_or_else(|| PenaError::UnknownDraw(draw_id.to_string()))?;
        let summary = settlement::compute_results(&self.doc, Some(draw), win_nums, win_stars, prize)
            .ok_or_else(|| PenaError::UnknownDraw(draw_id.to_string()))?;

        logf!("Draws: results for {} -> {} winners", draw_id, summary.total_winners);
        let d = self.draw_mut(draw_id)?;
        d.prize = prize;
        Ok(&*d.results.insert(summary))
    }

    pub fn set_prize_and_note(&mut self, draw_id: &str, prize: Option<f64>, note: Option<&str>) -> Result<&Draw> {
        let d = self.draw_mut(draw_id)?;
        if let Some(p) = prize { d.prize = if p.is_finite() { p } else { 0.0 }; }
        if let Some(n) = note { d.note = n.to_string(); }
        Ok(&*d)
    }

    fn draw_mut(&mut self, id: &str) -> Result<&mut Draw> {
        self.doc.draws
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| PenaError::UnknownDraw(id.to_string()))
    }

    /* ---------------- Config ---------------- */

    pub fn config(&self) -> &Config {
        &self.doc.config
    }

    pub fn update_config(&mut self, up: ConfigUpdate) -> &Config {
        let c = &mut self.doc.config;
        if let Some(v) = up.bet_cost.filter(|v| v.is_finite()) { c.bet_cost = v; }
        if let Some(v) = up.suggested_monthly.filter(|v| v.is_finite()) { c.suggested_monthly = Some(v); }
        if let Some(v) = up.next_draw_weeks { c.next_draw_weeks = v; }
        if let Some(v) = up.next_draw_days { c.next_draw_days = v; }
        if let Some(v) = up.proxy_url { c.proxy.url = crate::core::sanitize::non_blank(Some(&v)); }
        if let Some(v) = up.proxy_key { c.proxy.key = crate::core::sanitize::non_blank(Some(&v)); }
        c
    }

    pub fn add_fixed_bet(&mut self, nums: Vec<u32>, ests: Vec<u32>) -> Result<&FixedBet> {
        if nums.len() != NUMBERS_PER_BET || ests.len() != STARS_PER_BET {
            return Err(PenaError::InvalidFixedBet);
        }
        let list = &mut self.doc.config.fixed_bets;
        list.push(FixedBet { nums, ests });
        Ok(&list[list.len() - 1])
    }

    /// Remove by position. Draws created earlier keep their copy.
    pub fn remove_fixed_bet(&mut self, idx: usize) -> Result<FixedBet> {
        let list = &mut self.doc.config.fixed_bets;
        if idx >= list.len() {
            return Err(PenaError::UnknownFixedBet(idx));
        }
        Ok(list.remove(idx))
    }

    /* ---------------- Import / export ---------------- */

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }

    /// Replace the whole document with a backup. The backup must carry a `config`
    /// object, `participantes` array, `pagos` object and `sorteos` array; otherwise
    /// nothing changes.
    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PenaError::InvalidBackup(e.to_string()))?;
        validate_backup_shape(&value)?;

        let has_meta = value.get("meta").is_some_and(Value::is_object);
        let mut doc: Document = serde_json::from_value(value)
            .map_err(|e| PenaError::InvalidBackup(e.to_string()))?;
        if !has_meta {
            doc.meta = Meta::now();
        }
        logf!("Store: imported backup ({} participants, {} draws)",
            doc.participants.len(), doc.draws.len());
        self.doc = doc;
        Ok(())
    }
}

fn require_month(month: &str) -> Result<String> {
    let month = month.trim();
    if month.is_empty() {
        return Err(PenaError::MissingPayMonth);
    }
    if !dates::is_iso_month(month) {
        return Err(PenaError::InvalidPayMonth(month.to_string()));
    }
    Ok(month.to_string())
}

fn validate_bet(numbers: &[u32], stars: &[u32]) -> Result<()> {
    if numbers.len() < NUMBERS_PER_BET {
        return Err(PenaError::NotEnoughNumbers { expected: NUMBERS_PER_BET, got: numbers.len() });
    }
    if stars.len() < STARS_PER_BET {
        return Err(PenaError::NotEnoughStars { expected: STARS_PER_BET, got: stars.len() });
    }
    if numbers.len() > NUMBERS_PER_BET || stars.len() > STARS_PER_BET {
        return Err(PenaError::InvalidBet(format!(
            "{} números y {} estrellas", numbers.len(), stars.len()
        )));
    }
    Ok(())
}

fn validate_backup_shape(v: &Value) -> Result<()> {
    let missing = |what: &str| Err(PenaError::InvalidBackup(format!("falta {what}")));
    if !v.is_object() {
        return missing("el objeto raíz");
    }
    if !v.get("config").is_some_and(Value::is_object) {
        return missing("config");
    }
    if !v.get("participantes").is_some_and(Value::is_array) {
        return missing("participantes");
    }
    if !v.get("pagos").is_some_and(Value::is_object) {
        return missing("pagos");
    }
    if !v.get("sorteos").is_some_and(Value::is_array) {
        return missing("sorteos");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(names: &[(&str, Preference)]) -> (Store, Vec<String>) {
        let mut st = Store::in_memory();
        let ids = names
            .iter()
            .map(|(n, pref)| st.add_participant(n, pref.clone(), None).unwrap().id.clone())
            .collect();
        (st, ids)
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut st = Store::in_memory();
        assert!(matches!(st.add_participant("   ", Preference::Ambos, None), Err(PenaError::MissingName)));
        assert!(st.document().participants.is_empty());
    }

    #[test]
    fn ensure_pay_month_backfills_every_participant() {
        let (mut st, ids) = store_with(&[("Ana", Preference::Ambos), ("Luis", Preference::Martes)]);
        st.ensure_pay_month("2025-03");
        let pm = &st.document().payments["2025-03"];
        assert_eq!(pm.entries.len(), 2);
        for id in &ids {
            let e = &pm.entries[id];
            assert!(!e.paid);
            assert_eq!(e.amount, 0.0);
        }
        // Blank months are ignored.
        st.ensure_pay_month("  ");
        assert_eq!(st.document().payments.len(), 1);
    }

    #[test]
    fn mark_all_only_touches_active_and_stamps_date() {
        let (mut st, ids) = store_with(&[("Ana", Preference::Ambos), ("Luis", Preference::Ambos)]);
        st.set_active(&ids[1], false).unwrap();
        assert_eq!(st.mark_all("2025-03", true).unwrap(), 1);
        let doc = st.document();
        assert!(doc.entry("2025-03", &ids[0]).unwrap().paid);
        assert!(!doc.entry("2025-03", &ids[0]).unwrap().paid_on.is_empty());
        assert!(!doc.entry("2025-03", &ids[1]).unwrap().paid);
    }

    #[test]
    fn create_draw_requires_date_month_and_players() {
        let (mut st, _) = store_with(&[("Ana", Preference::Ambos)]);
        let base = NewDraw {
            date: s!("2025-03-04"),
            day: Some(DrawDay::Martes),
            pay_month: s!("2025-03"),
            note: s!(),
        };
        assert!(matches!(
            st.create_draw(NewDraw { date: s!(""), ..base.clone() }),
            Err(PenaError::MissingDrawDate)
        ));
        assert!(matches!(
            st.create_draw(NewDraw { pay_month: s!(""), ..base.clone() }),
            Err(PenaError::MissingPayMonth)
        ));
        assert!(matches!(
            st.create_draw(base.clone()),
            Err(PenaError::NoEligiblePlayers { .. })
        ));
        assert!(st.document().draws.is_empty());
    }

    #[test]
    fn add_bet_validates_counts() {
        let (mut st, _) = store_with(&[("Ana", Preference::Ambos)]);
        st.mark_all("2025-03", true).unwrap();
        let id = st.create_draw(NewDraw {
            date: s!("2025-03-04"),
            day: Some(DrawDay::Martes),
            pay_month: s!("2025-03"),
            note: s!(),
        }).unwrap().id.clone();

        assert!(matches!(st.add_bet(&id, vec![1, 2, 3, 4], vec![1, 2]), Err(PenaError::NotEnoughNumbers { .. })));
        assert!(matches!(st.add_bet(&id, vec![1, 2, 3, 4, 5], vec![1]), Err(PenaError::NotEnoughStars { .. })));
        assert!(matches!(st.add_bet(&id, vec![1, 2, 3, 4, 5, 6], vec![1, 2]), Err(PenaError::InvalidBet(_))));
        let bet = st.add_bet(&id, vec![1, 2, 3, 4, 5], vec![1, 2]).unwrap().id.clone();
        assert_eq!(st.draw(&id).unwrap().bets.len(), 1);
        st.remove_bet(&id, &bet).unwrap();
        assert!(st.draw(&id).unwrap().bets.is_empty());
    }

    #[test]
    fn fixed_bets_need_exact_shape() {
        let mut st = Store::in_memory();
        assert!(matches!(st.add_fixed_bet(vec![1, 2, 3, 4], vec![1, 2]), Err(PenaError::InvalidFixedBet)));
        assert!(matches!(st.add_fixed_bet(vec![1, 2, 3, 4, 5], vec![1, 2, 3]), Err(PenaError::InvalidFixedBet)));
        st.add_fixed_bet(vec![1, 2, 3, 4, 5], vec![1, 2]).unwrap();
        assert_eq!(st.config().fixed_bets.len(), 1);
        assert!(matches!(st.remove_fixed_bet(3), Err(PenaError::UnknownFixedBet(3))));
        st.remove_fixed_bet(0).unwrap();
        assert!(st.config().fixed_bets.is_empty());
    }

    #[test]
    fn import_rejects_bad_shapes_without_touching_state() {
        let (mut st, _) = store_with(&[("Ana", Preference::Ambos)]);
        let before = st.document().clone();
        for bad in [
            "not json",
            "[]",
            r#"{"participantes":[],"pagos":{},"sorteos":[]}"#,
            r#"{"config":{},"participantes":{},"pagos":{},"sorteos":[]}"#,
            r#"{"config":{},"participantes":[],"pagos":[],"sorteos":[]}"#,
            r#"{"config":{},"participantes":[],"pagos":{}}"#,
        ] {
            assert!(matches!(st.import_json(bad), Err(PenaError::InvalidBackup(_))), "{bad}");
            assert_eq!(st.document(), &before);
        }
    }

    #[test]
    fn import_synthesizes_meta() {
        let mut st = Store::in_memory();
        st.import_json(r#"{"config":{},"participantes":[],"pagos":{},"sorteos":[]}"#).unwrap();
        assert_eq!(st.document().meta.version, 1);
        assert!(!st.document().meta.created_at.is_empty());
        assert_eq!(st.config().bet_cost, 2.5);
    }
}
