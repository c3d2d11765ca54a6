// src/accounting.rs
//
// Money in, money out, and the per-month payment headcount.

use serde::Serialize;

use crate::model::Document;
use crate::store::Store;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accounting {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_prizes: f64,
    pub balance: f64,
}

/// Income is every recorded `cantidad`, expenses every draw's stake, prizes only count for
/// draws that have results.
pub fn calculate_accounting(doc: &Document) -> Accounting {
    let total_income: f64 = doc.payments
        .values()
        .flat_map(|pm| pm.entries.values())
        .map(|e| e.amount)
        .sum();
    let total_expenses: f64 = doc.draws.iter().map(|d| d.total_euros).sum();
    let total_prizes: f64 = doc.draws
        .iter()
        .filter(|d| d.results.is_some())
        .map(|d| d.prize)
        .sum();

    Accounting {
        total_income,
        total_expenses,
        total_prizes,
        balance: total_income - total_expenses + total_prizes,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub activos: usize,
    pub pagados: usize,
    pub pendientes: usize,
}

/// Headcount of active participants for `month`; backfills the month first.
pub fn month_summary(store: &mut Store, month: &str) -> MonthSummary {
    store.ensure_pay_month(month);
    let month = month.trim();
    let doc = store.document();
    let active: Vec<&str> = doc.participants
        .iter()
        .filter(|p| p.active)
        .map(|p| p.id.as_str())
        .collect();
    let pagados = active
        .iter()
        .filter(|id| doc.entry(month, id).is_some_and(|e| e.paid))
        .count();

    MonthSummary {
        month: month.to_string(),
        activos: active.len(),
        pagados,
        pendientes: active.len() - pagados,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DrawDay, Preference};
    use crate::store::{NewDraw, PaymentUpdate};

    #[test]
    fn balance_counts_prizes_only_with_results() {
        let mut st = Store::in_memory();
        let a = st.add_participant("Ana", Preference::Ambos, None).unwrap().id.clone();
        let b = st.add_participant("Luis", Preference::Ambos, None).unwrap().id.clone();
        for id in [&a, &b] {
            st.update_payment("2025-03", id, PaymentUpdate {
                paid: Some(true),
                amount: Some(10.0),
                ..Default::default()
            }).unwrap();
        }
        let new = |date: &str| NewDraw {
            date: s!(date),
            day: Some(DrawDay::Martes),
            pay_month: s!("2025-03"),
            note: s!(),
        };
        let settled = st.create_draw(new("2025-03-04")).unwrap().id.clone();
        let pending = st.create_draw(new("2025-03-11")).unwrap().id.clone();
        st.record_results(&settled, &[1, 2, 3, 4, 5], &[1, 2], 8.0).unwrap();
        st.set_prize_and_note(&pending, Some(100.0), None).unwrap();

        let acc = calculate_accounting(st.document());
        assert_eq!(acc.total_income, 20.0);
        assert_eq!(acc.total_expenses, 10.0);
        assert_eq!(acc.total_prizes, 8.0);
        assert_eq!(acc.balance, 18.0);
    }

    #[test]
    fn month_summary_ignores_inactive() {
        let mut st = Store::in_memory();
        let a = st.add_participant("Ana", Preference::Ambos, None).unwrap().id.clone();
        st.add_participant("Luis", Preference::Ambos, None).unwrap();
        let c = st.add_participant("Eva", Preference::Ambos, None).unwrap().id.clone();
        st.set_active(&c, false).unwrap();
        st.update_payment("2025-03", &a, PaymentUpdate { paid: Some(true), ..Default::default() }).unwrap();
        st.update_payment("2025-03", &c, PaymentUpdate { paid: Some(true), ..Default::default() }).unwrap();

        let s = month_summary(&mut st, "2025-03");
        assert_eq!((s.activos, s.pagados, s.pendientes), (2, 1, 1));
    }
}
