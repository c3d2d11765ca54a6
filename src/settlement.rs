// src/settlement.rs
//
// Settling a draw once the winning combination is known.
//
// Win rule: at least 2 numbers, or at least 1 number plus both stars. Coarser than the
// official 13-tier prize table.
//
// The fixed bets evaluated here come from the *current* config, not the copy the draw took
// at creation time. Draws created before a fixed bet was added or removed are therefore
// settled against today's list. `check_bets` uses the draw's own copy instead.

use serde_json::Value;

use crate::model::{Bet, Document, Draw, ResultSummary, Winner, WinnerCounts};

/// Split a comma list and keep what parses as a number.
pub fn parse_number_list(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

/// JSON coercion: numbers and numeric strings are kept, anything else dropped.
pub fn coerce_numbers(values: &[Value]) -> Vec<u32> {
    values
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        })
        .collect()
}

pub fn is_winner(matched_numbers: usize, matched_stars: usize) -> bool {
    matched_numbers >= 2 || (matched_numbers >= 1 && matched_stars >= 2)
}

/// How many of `picked` appear in `winning`.
pub fn count_matches(picked: &[u32], winning: &[u32]) -> usize {
    picked.iter().filter(|n| winning.contains(n)).count()
}

/// Settle `draw` against the winning numbers and split `total_prize` equally between
/// every winning bet. `None` only when there is no draw.
pub fn compute_results(
    doc: &Document,
    draw: Option<&Draw>,
    win_nums: &[u32],
    win_stars: &[u32],
    total_prize: f64,
) -> Option<ResultSummary> {
    let draw = draw?;

    let mut winners = Vec::new();
    let mut counts = WinnerCounts::default();

    for bet in &draw.bets {
        let n = count_matches(&bet.numbers, win_nums);
        let s = count_matches(&bet.stars, win_stars);
        if is_winner(n, s) {
            winners.push(Winner::Apuesta { id: bet.id.clone(), matched_numbers: n, matched_stars: s });
            counts.bets += 1;
        }
    }

    for (idx, fb) in doc.config.fixed_bets.iter().enumerate() {
        let n = count_matches(&fb.nums, win_nums);
        let s = count_matches(&fb.ests, win_stars);
        if is_winner(n, s) {
            winners.push(Winner::Fija { idx, matched_numbers: n, matched_stars: s });
            counts.fixed += 1;
        }
    }

    let total_winners = winners.len();
    let total_distributed = if total_winners > 0 { total_prize } else { 0.0 };
    let per_winner = if total_winners > 0 { total_distributed / total_winners as f64 } else { 0.0 };

    Some(ResultSummary {
        date: draw.date.clone(),
        day: draw.day,
        win_nums: win_nums.to_vec(),
        win_stars: win_stars.to_vec(),
        total_winners,
        counts,
        total_distributed,
        per_winner,
        winners,
    })
}

/// One line of the bet checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BetCheck {
    pub bet_id: String,
    pub fixed: bool,
    /// 1-based position within its group (fixed or regular).
    pub position: usize,
    pub matched_numbers: Vec<u32>,
    pub matched_stars: Vec<u32>,
    pub winner: bool,
}

/// Per-bet report over the draw's own fixed-bet copy first, then its regular bets.
pub fn check_bets(draw: &Draw, win_nums: &[u32], win_stars: &[u32]) -> Vec<BetCheck> {
    fn check(bet: &Bet, fixed: bool, position: usize, wn: &[u32], we: &[u32]) -> BetCheck {
        let matched_numbers: Vec<u32> = bet.numbers.iter().copied().filter(|n| wn.contains(n)).collect();
        let matched_stars: Vec<u32> = bet.stars.iter().copied().filter(|e| we.contains(e)).collect();
        let winner = is_winner(matched_numbers.len(), matched_stars.len());
        BetCheck { bet_id: bet.id.clone(), fixed, position, matched_numbers, matched_stars, winner }
    }

    let fixed = draw.fixed_bets.iter().enumerate().map(|(i, b)| check(b, true, i + 1, win_nums, win_stars));
    let regular = draw.bets.iter().enumerate().map(|(i, b)| check(b, false, i + 1, win_nums, win_stars));
    fixed.chain(regular).collect()
}
