// src/model.rs
//
// The persisted document and everything inside it.
// JSON keys follow the stored document (Spanish); Rust names are English.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::config::consts::{DEFAULT_BET_COST, DEFAULT_NEXT_DRAW_WEEKS, DOCUMENT_VERSION};

/* ---------------- Days & preferences ---------------- */

/// Draw days. EuroMillones runs on Tuesdays and Fridays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawDay {
    Martes,
    Viernes,
}

impl DrawDay {
    pub const ALL: [DrawDay; 2] = [DrawDay::Martes, DrawDay::Viernes];

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawDay::Martes => "martes",
            DrawDay::Viernes => "viernes",
        }
    }

    /// Map a calendar weekday onto a draw day, if it is one.
    pub fn from_weekday(wd: chrono::Weekday) -> Option<Self> {
        match wd {
            chrono::Weekday::Tue => Some(DrawDay::Martes),
            chrono::Weekday::Fri => Some(DrawDay::Viernes),
            _ => None,
        }
    }
}

impl fmt::Display for DrawDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "martes" => Ok(DrawDay::Martes),
            "viernes" => Ok(DrawDay::Viernes),
            other => Err(format!("Unknown draw day: {other}")),
        }
    }
}

/// Which draws a participant plays.
///
/// A stored value that is none of the known ones is kept as `Other` and matches no day,
/// so that participant is simply never eligible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Preference {
    Martes,
    Viernes,
    #[default]
    Ambos,
    Other(String),
}

impl Preference {
    pub fn matches(&self, day: DrawDay) -> bool {
        match self {
            Preference::Ambos => true,
            Preference::Martes => day == DrawDay::Martes,
            Preference::Viernes => day == DrawDay::Viernes,
            Preference::Other(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Preference::Martes => "martes",
            Preference::Viernes => "viernes",
            Preference::Ambos => "ambos",
            Preference::Other(raw) => raw.as_str(),
        }
    }

    /// Lenient reading used for stored documents.
    fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| Preference::Other(raw.to_string()))
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = String;

    /// Trimmed and case-insensitive; blank means `ambos`. Unknown values are an error here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "ambos" => Ok(Preference::Ambos),
            "martes" => Ok(Preference::Martes),
            "viernes" => Ok(Preference::Viernes),
            other => Err(format!("Unknown preference: {other}")),
        }
    }
}

impl Serialize for Preference {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Preference {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(de)?;
        Ok(Preference::from_stored(raw.as_deref().unwrap_or("")))
    }
}

/// Only a literal JSON `true` counts as paid.
fn strict_true<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(de)?, Value::Bool(true)))
}

/* ---------------- Participants & payments ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "preferencia", default)]
    pub preference: Preference,
    #[serde(rename = "activo", default)]
    pub active: bool,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    #[serde(rename = "pagado", default, deserialize_with = "strict_true")]
    pub paid: bool,
    #[serde(rename = "fechaPago", default)]
    pub paid_on: String,
    #[serde(rename = "medio", default)]
    pub method: String,
    #[serde(rename = "notas", default)]
    pub notes: String,
    #[serde(rename = "cantidad", default)]
    pub amount: f64,
}

impl Default for PaymentEntry {
    fn default() -> Self {
        Self {
            paid: false,
            paid_on: s!(),
            method: s!(),
            notes: s!(),
            amount: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMonth {
    #[serde(default)]
    pub entries: BTreeMap<String, PaymentEntry>,
}

/* ---------------- Bets & draws ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: String,
    #[serde(rename = "numeros", default)]
    pub numbers: Vec<u32>,
    #[serde(rename = "estrellas", default)]
    pub stars: Vec<u32>,
    #[serde(rename = "esFija", default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<bool>,
}

/// A fixed bet as configured: replayed into every new draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedBet {
    #[serde(default)]
    pub nums: Vec<u32>,
    #[serde(default)]
    pub ests: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub id: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "dia")]
    pub day: DrawDay,
    #[serde(rename = "payMonth", default)]
    pub pay_month: String,
    #[serde(rename = "jugadores", default)]
    pub players: Vec<String>,
    #[serde(rename = "totalEuros", default)]
    pub total_euros: f64,
    #[serde(rename = "apuestas", default)]
    pub bets: Vec<Bet>,
    #[serde(rename = "apuestasFijas", default)]
    pub fixed_bets: Vec<Bet>,
    #[serde(rename = "premio", default)]
    pub prize: f64,
    #[serde(rename = "nota", default)]
    pub note: String,
    #[serde(rename = "resultados", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultSummary>,
}

/* ---------------- Results ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Winner {
    Apuesta {
        id: String,
        #[serde(rename = "numAciertos")]
        matched_numbers: usize,
        #[serde(rename = "estAciertos")]
        matched_stars: usize,
    },
    Fija {
        idx: usize,
        #[serde(rename = "numAciertos")]
        matched_numbers: usize,
        #[serde(rename = "estAciertos")]
        matched_stars: usize,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerCounts {
    #[serde(rename = "apuestas")]
    pub bets: usize,
    #[serde(rename = "fijas")]
    pub fixed: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "dia")]
    pub day: DrawDay,
    #[serde(rename = "winNums")]
    pub win_nums: Vec<u32>,
    #[serde(rename = "winStars")]
    pub win_stars: Vec<u32>,
    #[serde(rename = "totalWinners")]
    pub total_winners: usize,
    pub counts: WinnerCounts,
    #[serde(rename = "totalDistributed")]
    pub total_distributed: f64,
    #[serde(rename = "perWinner")]
    pub per_winner: f64,
    #[serde(default)]
    pub winners: Vec<Winner>,
}

/* ---------------- Config ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextDrawDays {
    #[serde(default)]
    pub martes: bool,
    #[serde(default)]
    pub viernes: bool,
}

impl Default for NextDrawDays {
    fn default() -> Self {
        Self { martes: true, viernes: true }
    }
}

impl NextDrawDays {
    pub fn allowed(&self) -> Vec<DrawDay> {
        let mut out = Vec::with_capacity(2);
        if self.martes { out.push(DrawDay::Martes); }
        if self.viernes { out.push(DrawDay::Viernes); }
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "costeApuesta", default = "default_bet_cost", deserialize_with = "lenient_cost")]
    pub bet_cost: f64,
    #[serde(rename = "mensualSugerido", default, skip_serializing_if = "Option::is_none")]
    pub suggested_monthly: Option<f64>,
    #[serde(rename = "apuestasFijas", default)]
    pub fixed_bets: Vec<FixedBet>,
    #[serde(rename = "nextDrawWeeks", default = "default_next_draw_weeks")]
    pub next_draw_weeks: u32,
    #[serde(rename = "nextDrawDays", default)]
    pub next_draw_days: NextDrawDays,
    #[serde(default)]
    pub proxy: ProxySettings,
}

fn default_bet_cost() -> f64 { DEFAULT_BET_COST }

/// `null`, strings and non-positive numbers all read as the default cost.
fn lenient_cost<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    let v = Value::deserialize(de)?;
    Ok(Config::effective_cost(v.as_f64().unwrap_or(f64::NAN)))
}
fn default_next_draw_weeks() -> u32 { DEFAULT_NEXT_DRAW_WEEKS }

impl Config {
    /// The cost actually charged per bet: anything that is not a positive number falls back
    /// to the default.
    pub fn effective_cost(cost: f64) -> f64 {
        if cost.is_finite() && cost > 0.0 { cost } else { DEFAULT_BET_COST }
    }

    pub fn bet_cost(&self) -> f64 {
        Self::effective_cost(self.bet_cost)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bet_cost: DEFAULT_BET_COST,
            suggested_monthly: None,
            fixed_bets: Vec::new(),
            next_draw_weeks: DEFAULT_NEXT_DRAW_WEEKS,
            next_draw_days: NextDrawDays::default(),
            proxy: ProxySettings::default(),
        }
    }
}

/* ---------------- Document ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub version: u32,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl Meta {
    pub fn now() -> Self {
        let ts = chrono::Utc::now().to_rfc3339();
        Self { version: DOCUMENT_VERSION, created_at: ts.clone(), updated_at: ts }
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::now()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub config: Config,
    #[serde(rename = "participantes", default)]
    pub participants: Vec<Participant>,
    #[serde(rename = "pagos", default)]
    pub payments: BTreeMap<String, PaymentMonth>,
    #[serde(rename = "sorteos", default)]
    pub draws: Vec<Draw>,
}

impl Document {
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn draw(&self, id: &str) -> Option<&Draw> {
        self.draws.iter().find(|d| d.id == id)
    }

    pub fn entry(&self, month: &str, participant_id: &str) -> Option<&PaymentEntry> {
        self.payments.get(month)?.entries.get(participant_id)
    }

    /// Equality that ignores `meta.updatedAt`.
    pub fn same_content(&self, other: &Document) -> bool {
        let mut a = self.clone();
        a.meta.updated_at.clear();
        let mut b = other.clone();
        b.meta.updated_at.clear();
        a == b
    }
}
