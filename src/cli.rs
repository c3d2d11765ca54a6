// src/cli.rs
//
// `pena` command line. Thin: parse, call the store/engines, print, save.

use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, eyre, Result};
use serde_json::json;

use crate::accounting::{calculate_accounting, month_summary};
use crate::config::consts::MAX_NEXT_DRAW_WEEKS;
use crate::config::options::{ClientOptions, StoreOptions};
use crate::core::dates;
use crate::csv::rows_to_string;
use crate::eligibility::{eligible_csv, eligible_participants, next_eligible_draw};
use crate::fetch::ProxyClient;
use crate::file::{backup_filename, eligible_csv_filename, write_export};
use crate::model::{Draw, DrawDay, NextDrawDays, Preference, ResultSummary, Winner};
use crate::settlement::{check_bets, parse_number_list};
use crate::specs::pasted::parse_results_from_text;
use crate::store::{ConfigUpdate, NewDraw, PaymentUpdate, Store};

#[derive(Debug, Parser)]
#[command(name = "pena", version, about = "Gestor de peña de EuroMillones")]
pub struct Cli {
    /// Document file or directory (overrides PENA_STORE)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Print JSON instead of tables where it makes sense
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add, edit and list participants
    #[command(subcommand)]
    Participant(ParticipantCmd),
    /// Monthly payments
    #[command(subcommand)]
    Pay(PayCmd),
    /// Who can play a draw day with a given pay month
    Eligible {
        #[arg(long)]
        day: DrawDay,
        #[arg(long)]
        month: String,
        /// Export as `elegibles_<month>.csv`
        #[arg(long)]
        csv: bool,
        /// Output file or directory for --csv
        #[arg(short = 'o', long, default_value = "")]
        out: String,
    },
    /// Next Tuesday/Friday with eligible players
    Next {
        /// Start date (YYYY-MM-DD), default today
        #[arg(long)]
        from: Option<String>,
        /// Weeks to scan, default from config
        #[arg(long)]
        weeks: Option<u32>,
    },
    /// Draws, bets and results
    #[command(subcommand)]
    Draw(DrawCmd),
    /// Fixed bets replayed in every new draw
    #[command(subcommand)]
    Fixed(FixedCmd),
    /// Pool settings
    #[command(subcommand)]
    Config(ConfigCmd),
    /// Month headcount and accounting
    Summary {
        /// YYYY-MM, default current month
        #[arg(long)]
        month: Option<String>,
    },
    /// Write a JSON backup
    Export {
        #[arg(short = 'o', long, default_value = "")]
        out: String,
    },
    /// Replace everything with a JSON backup
    Import { file: PathBuf },
    /// Delete all data
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ListFilter {
    #[default]
    Todos,
    Activos,
    Inactivos,
}

#[derive(Debug, Subcommand)]
pub enum ParticipantCmd {
    Add {
        name: String,
        #[arg(long, default_value = "ambos")]
        pref: Preference,
        #[arg(long)]
        notes: Option<String>,
    },
    List {
        #[arg(long, value_enum, default_value_t)]
        filter: ListFilter,
    },
    Edit {
        /// Id or name
        who: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        pref: Option<Preference>,
        #[arg(long)]
        notes: Option<String>,
    },
    Activate { who: String },
    Deactivate { who: String },
    /// Removes payments and draw seats too
    Delete { who: String },
}

#[derive(Debug, Subcommand)]
pub enum PayCmd {
    /// Payment sheet for a month
    Show { month: String },
    /// Update one participant's entry
    Set {
        month: String,
        /// Id or name
        who: String,
        #[arg(long)]
        paid: Option<bool>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        method: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Mark every active participant paid (or unpaid)
    All {
        month: String,
        #[arg(long)]
        unpaid: bool,
    },
}

#[derive(Debug, Args)]
pub struct Combination {
    /// Comma list, e.g. 3,17,22,38,45
    #[arg(long)]
    pub nums: String,
    /// Comma list, e.g. 2,11
    #[arg(long)]
    pub stars: String,
}

#[derive(Debug, Subcommand)]
pub enum BetCmd {
    Add {
        draw: String,
        #[command(flatten)]
        combo: Combination,
    },
    Remove { draw: String, bet: String },
}

#[derive(Debug, Subcommand)]
pub enum DrawCmd {
    Create {
        #[arg(long)]
        date: String,
        #[arg(long)]
        day: Option<DrawDay>,
        /// YYYY-MM, default the draw date's month
        #[arg(long)]
        month: Option<String>,
        #[arg(long, default_value = "")]
        note: String,
    },
    List,
    /// Id or date
    Show { draw: String },
    Delete { draw: String },
    #[command(subcommand)]
    Bet(BetCmd),
    /// Record the winning combination and prize
    Results {
        draw: String,
        #[command(flatten)]
        combo: Combination,
        #[arg(long, default_value_t = 0.0)]
        prize: f64,
    },
    /// Per-bet report; uses recorded results when no combination is given
    Check {
        draw: String,
        #[arg(long)]
        nums: Option<String>,
        #[arg(long)]
        stars: Option<String>,
    },
    /// Ask the proxy for the official result
    Fetch {
        draw: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        key: Option<String>,
        /// Record the fetched numbers on the draw
        #[arg(long)]
        record: bool,
        #[arg(long)]
        prize: Option<f64>,
    },
    /// Extract the result from pasted text (file or stdin)
    Paste {
        draw: String,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        record: bool,
        #[arg(long)]
        prize: Option<f64>,
    },
    /// Set prize and/or ticket note
    Prize {
        draw: String,
        #[arg(long)]
        prize: Option<f64>,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FixedCmd {
    List,
    Add {
        #[command(flatten)]
        combo: Combination,
    },
    /// 1-based position as shown by `fixed list`
    Remove { position: usize },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCmd {
    Show,
    Set {
        #[arg(long)]
        bet_cost: Option<f64>,
        #[arg(long)]
        monthly: Option<f64>,
        #[arg(long)]
        weeks: Option<u32>,
        /// Days the next-draw search considers, e.g. martes,viernes
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        proxy_url: Option<String>,
        #[arg(long)]
        proxy_key: Option<String>,
    },
}

/* ---------------- Entry ---------------- */

pub fn store_options(cli: &Cli) -> StoreOptions {
    let mut opts = StoreOptions::from_env();
    if let Some(p) = cli.store.as_deref() {
        opts.set_path(p);
    }
    opts
}

pub fn run(cli: Cli) -> Result<()> {
    let opts = store_options(&cli);
    let mut store = Store::open(opts.document_path())?;
    let json = cli.json;

    let save = match cli.command {
        Command::Participant(cmd) => participant(&mut store, cmd, json)?,
        Command::Pay(cmd) => pay(&mut store, cmd)?,
        Command::Eligible { day, month, csv, out } => eligible(&mut store, day, &month, csv, &out, json)?,
        Command::Next { from, weeks } => next(&mut store, from.as_deref(), weeks, json)?,
        Command::Draw(cmd) => draw(&mut store, cmd, json)?,
        Command::Fixed(cmd) => fixed(&mut store, cmd)?,
        Command::Config(cmd) => config(&mut store, cmd, json)?,
        Command::Summary { month } => summary(&mut store, month.as_deref(), json)?,
        Command::Export { out } => {
            let name = backup_filename(&dates::to_iso_date(dates::today()));
            let path = write_export(&out, &name, &store.export_json()?)?;
            println!("Copia guardada en {}", path.display());
            false
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            store.import_json(&text)?;
            println!("Importado desde {}", file.display());
            true
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("Esto borra todos los datos; repite con --yes");
            }
            store.reset()?;
            println!("Datos borrados");
            false
        }
    };

    if save {
        store.save()?;
    }
    Ok(())
}

/* ---------------- Lookups ---------------- */

/// Participant id from an id or a (case-insensitive) unique name.
fn participant_id(store: &Store, who: &str) -> Result<String> {
    let who = who.trim();
    if store.participant(who).is_some() {
        return Ok(who.to_string());
    }
    let lc = who.to_lowercase();
    let hits: Vec<&str> = store.document().participants
        .iter()
        .filter(|p| p.name.to_lowercase() == lc)
        .map(|p| p.id.as_str())
        .collect();
    match hits.as_slice() {
        [id] => Ok(id.to_string()),
        [] => bail!("Participante no encontrado: {who}"),
        _ => bail!("Hay varios participantes llamados {who}; usa el id"),
    }
}

/// Draw id from an id or a date with exactly one draw.
fn draw_id(store: &Store, key: &str) -> Result<String> {
    let key = key.trim();
    if store.draw(key).is_some() {
        return Ok(key.to_string());
    }
    let hits: Vec<&Draw> = store.document().draws.iter().filter(|d| d.date == key).collect();
    match hits.as_slice() {
        [d] => Ok(d.id.clone()),
        [] => bail!("Sorteo no encontrado: {key}"),
        _ => bail!("Hay varios sorteos el {key}; usa el id"),
    }
}

fn names(store: &Store, ids: &[String]) -> Vec<String> {
    ids.iter()
        .map(|id| store.participant(id).map(|p| p.name.clone()).unwrap_or_else(|| id.clone()))
        .collect()
}

fn list(v: &[u32]) -> String {
    v.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
}

fn euro(v: f64) -> String {
    format!("{v:.2} €")
}

fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    print!("{}", rows_to_string(Some(&headers), &rows, '\t'));
}

fn print_json(v: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

/* ---------------- Participants ---------------- */

fn participant(store: &mut Store, cmd: ParticipantCmd, json: bool) -> Result<bool> {
    match cmd {
        ParticipantCmd::Add { name, pref, notes } => {
            let p = store.add_participant(&name, pref, notes.as_deref())?;
            println!("{}\t{}", p.id, p.name);
        }
        ParticipantCmd::List { filter } => {
            let rows: Vec<_> = store.participants_by_name()
                .into_iter()
                .filter(|p| match filter {
                    ListFilter::Todos => true,
                    ListFilter::Activos => p.active,
                    ListFilter::Inactivos => !p.active,
                })
                .collect();
            if json {
                print_json(&rows)?;
            } else {
                print_table(
                    &["id", "nombre", "preferencia", "activo", "notas"],
                    rows.iter().map(|p| vec![
                        p.id.clone(),
                        p.name.clone(),
                        p.preference.to_string(),
                        if p.active { s!("sí") } else { s!("no") },
                        p.notes.clone().unwrap_or_default(),
                    ]).collect(),
                );
            }
            return Ok(false);
        }
        ParticipantCmd::Edit { who, name, pref, notes } => {
            let id = participant_id(store, &who)?;
            let p = store.update_participant(&id, name.as_deref(), pref, notes.as_deref())?;
            println!("Actualizado {}", p.name);
        }
        ParticipantCmd::Activate { who } => {
            let id = participant_id(store, &who)?;
            println!("{} activo", store.set_active(&id, true)?.name);
        }
        ParticipantCmd::Deactivate { who } => {
            let id = participant_id(store, &who)?;
            println!("{} inactivo", store.set_active(&id, false)?.name);
        }
        ParticipantCmd::Delete { who } => {
            let id = participant_id(store, &who)?;
            let p = store.delete_participant(&id)?;
            println!("Eliminado {}", p.name);
        }
    }
    Ok(true)
}

/* ---------------- Payments ---------------- */

fn pay(store: &mut Store, cmd: PayCmd) -> Result<bool> {
    match cmd {
        PayCmd::Show { month } => {
            if !dates::is_iso_month(&month) {
                bail!("Mes de pago no válido: {month}");
            }
            store.ensure_pay_month(&month);
            let doc = store.document();
            let rows = store.participants_by_name()
                .into_iter()
                .map(|p| {
                    let e = doc.entry(month.trim(), &p.id).cloned().unwrap_or_default();
                    vec![
                        p.name.clone(),
                        if e.paid { s!("sí") } else { s!("no") },
                        e.paid_on,
                        e.method,
                        format!("{:.2}", e.amount),
                        e.notes,
                    ]
                })
                .collect();
            print_table(&["nombre", "pagado", "fecha", "medio", "cantidad", "notas"], rows);
        }
        PayCmd::Set { month, who, paid, date, method, notes, amount } => {
            let id = participant_id(store, &who)?;
            let stamp = paid == Some(true) && date.is_none();
            let mut up = PaymentUpdate { paid, paid_on: date, method, notes, amount };
            if stamp && store.payment_entry(&month, &id).is_some_and(|e| e.paid_on.is_empty()) {
                up.paid_on = Some(dates::to_iso_date(dates::today()));
            }
            let e = store.update_payment(&month, &id, up)?;
            println!("{month}: pagado={} fecha={} cantidad={:.2}", e.paid, e.paid_on, e.amount);
        }
        PayCmd::All { month, unpaid } => {
            let n = store.mark_all(&month, !unpaid)?;
            println!("{month}: {n} participantes marcados como {}", if unpaid { "pendientes" } else { "pagados" });
        }
    }
    Ok(true)
}

/* ---------------- Eligibility ---------------- */

fn eligible(store: &mut Store, day: DrawDay, month: &str, csv: bool, out: &str, json: bool) -> Result<bool> {
    if !dates::is_iso_month(month) {
        bail!("Mes de pago no válido: {month}");
    }
    if csv {
        let text = eligible_csv(store, Some(day), month);
        let path = write_export(out, &eligible_csv_filename(month), &text)?;
        println!("CSV guardado en {}", path.display());
        return Ok(true);
    }
    let people = eligible_participants(store, Some(day), month);
    if json {
        print_json(&people)?;
    } else {
        println!("{} aptos para {day} ({month})", people.len());
        for p in &people {
            println!("{}\t{}", p.id, p.name);
        }
    }
    Ok(true)
}

fn next(store: &mut Store, from: Option<&str>, weeks: Option<u32>, json: bool) -> Result<bool> {
    let from = match from {
        Some(f) => dates::parse_iso_date(f).ok_or_else(|| eyre!("Fecha no válida: {f}"))?,
        None => dates::today(),
    };
    let weeks = weeks.unwrap_or(store.config().next_draw_weeks).min(MAX_NEXT_DRAW_WEEKS);
    let allowed = store.config().next_draw_days.allowed();

    match next_eligible_draw(store, from, weeks, &allowed) {
        Some(nd) => {
            let who = names(store, &nd.ids);
            if json {
                print_json(&json!({
                    "fecha": dates::to_iso_date(nd.date),
                    "dia": nd.day,
                    "payMonth": dates::to_iso_month(nd.date),
                    "ids": nd.ids,
                    "nombres": who,
                }))?;
            } else {
                println!("{} ({}) · {} jugadores: {}",
                    dates::to_iso_date(nd.date), nd.day, nd.ids.len(), who.join(", "));
            }
        }
        None => println!("Ningún sorteo con jugadores en las próximas {weeks} semanas"),
    }
    Ok(true)
}

/* ---------------- Draws ---------------- */

fn print_summary(r: &ResultSummary) {
    println!("Combinación ganadora: {} + {}", list(&r.win_nums), list(&r.win_stars));
    println!("Ganadores: {} (apuestas {}, fijas {}) · Total repartido: {} · Por ganador: {}",
        r.total_winners, r.counts.bets, r.counts.fixed, euro(r.total_distributed), euro(r.per_winner));
    for w in &r.winners {
        match w {
            Winner::Apuesta { id, matched_numbers, matched_stars } =>
                println!("  apuesta {id}: {matched_numbers} números, {matched_stars} estrellas"),
            Winner::Fija { idx, matched_numbers, matched_stars } =>
                println!("  fija #{}: {matched_numbers} números, {matched_stars} estrellas", idx + 1),
        }
    }
}

fn record(store: &mut Store, id: &str, nums: &[u32], stars: &[u32], prize: f64) -> Result<()> {
    let r = store.record_results(id, nums, stars, prize)?;
    print_summary(r);
    Ok(())
}

fn draw(store: &mut Store, cmd: DrawCmd, json: bool) -> Result<bool> {
    match cmd {
        DrawCmd::Create { date, day, month, note } => {
            let parsed = dates::parse_iso_date(&date).ok_or_else(|| eyre!("Fecha no válida: {date}"))?;
            let day = day.or_else(|| DrawDay::from_weekday(chrono::Datelike::weekday(&parsed)));
            let pay_month = month.unwrap_or_else(|| dates::to_iso_month(parsed));
            let d = store.create_draw(NewDraw { date, day, pay_month, note })?;
            println!("{}\t{} {} · {} jugadores · {}", d.id, d.date, d.day, d.players.len(), euro(d.total_euros));
        }
        DrawCmd::List => {
            let rows = store.draws_by_date_desc()
                .into_iter()
                .map(|d| vec![
                    d.id.clone(),
                    d.date.clone(),
                    d.day.to_string(),
                    d.pay_month.clone(),
                    d.players.len().to_string(),
                    (d.bets.len() + d.fixed_bets.len()).to_string(),
                    format!("{:.2}", d.total_euros),
                    format!("{:.2}", d.prize),
                    d.results.as_ref().map(|r| r.total_winners.to_string()).unwrap_or_default(),
                ])
                .collect();
            print_table(&["id", "fecha", "dia", "payMonth", "jugadores", "apuestas", "totalEuros", "premio", "ganadores"], rows);
            return Ok(false);
        }
        DrawCmd::Show { draw } => {
            let id = draw_id(store, &draw)?;
            let d = store.draw(&id).ok_or_else(|| eyre!("Sorteo no encontrado: {id}"))?;
            if json {
                print_json(d)?;
                return Ok(false);
            }
            println!("{} {} (mes de pago {}) · {} · premio {}", d.date, d.day, d.pay_month, euro(d.total_euros), euro(d.prize));
            if !d.note.is_empty() {
                println!("Nota: {}", d.note);
            }
            println!("Jugadores ({}): {}", d.players.len(), names(store, &d.players).join(", "));
            for (i, b) in d.fixed_bets.iter().enumerate() {
                println!("  fija #{}: {} + {}", i + 1, list(&b.numbers), list(&b.stars));
            }
            for b in &d.bets {
                println!("  {}: {} + {}", b.id, list(&b.numbers), list(&b.stars));
            }
            if let Some(r) = &d.results {
                print_summary(r);
            }
            return Ok(false);
        }
        DrawCmd::Delete { draw } => {
            let id = draw_id(store, &draw)?;
            let d = store.delete_draw(&id)?;
            println!("Eliminado sorteo {} {}", d.date, d.day);
        }
        DrawCmd::Bet(BetCmd::Add { draw, combo }) => {
            let id = draw_id(store, &draw)?;
            let b = store.add_bet(&id, parse_number_list(&combo.nums), parse_number_list(&combo.stars))?;
            println!("{}\t{} + {}", b.id, list(&b.numbers), list(&b.stars));
        }
        DrawCmd::Bet(BetCmd::Remove { draw, bet }) => {
            let id = draw_id(store, &draw)?;
            store.remove_bet(&id, &bet)?;
            println!("Apuesta eliminada");
        }
        DrawCmd::Results { draw, combo, prize } => {
            let id = draw_id(store, &draw)?;
            record(store, &id, &parse_number_list(&combo.nums), &parse_number_list(&combo.stars), prize)?;
        }
        DrawCmd::Check { draw, nums, stars } => {
            let id = draw_id(store, &draw)?;
            let d = store.draw(&id).ok_or_else(|| eyre!("Sorteo no encontrado: {id}"))?;
            let (wn, we) = match (nums, stars, &d.results) {
                (Some(n), Some(s), _) => (parse_number_list(&n), parse_number_list(&s)),
                (None, None, Some(r)) => (r.win_nums.clone(), r.win_stars.clone()),
                _ => bail!("Indica --nums y --stars o registra antes los resultados"),
            };
            for c in check_bets(d, &wn, &we) {
                let label = if c.fixed { format!("fija #{}", c.position) } else { format!("apuesta #{}", c.position) };
                println!("{label}: {} números [{}], {} estrellas [{}]{}",
                    c.matched_numbers.len(), list(&c.matched_numbers),
                    c.matched_stars.len(), list(&c.matched_stars),
                    if c.winner { " · PREMIO" } else { "" });
            }
            return Ok(false);
        }
        DrawCmd::Fetch { draw, url, key, record: save_it, prize } => {
            let id = draw_id(store, &draw)?;
            let (date, stored_prize) = store.draw(&id)
                .map(|d| (d.date.clone(), d.prize))
                .ok_or_else(|| eyre!("Sorteo no encontrado: {id}"))?;
            let opts = ClientOptions::resolve(url.as_deref(), key.as_deref(), &store.config().proxy);
            let r = ProxyClient::new(opts)?.fetch(Some(&date))?;
            println!("{} + {} (fuente: {})", list(&r.win_nums), list(&r.win_stars), r.source.as_deref().unwrap_or("?"));
            if !save_it {
                return Ok(false);
            }
            record(store, &id, &r.win_nums, &r.win_stars, prize.unwrap_or(stored_prize))?;
        }
        DrawCmd::Paste { draw, file, record: save_it, prize } => {
            let id = draw_id(store, &draw)?;
            let text = match file {
                Some(f) => std::fs::read_to_string(f)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let parsed = parse_results_from_text(&text)
                .ok_or_else(|| eyre!("No se han podido extraer números de ese contenido"))?;
            println!("{} + {}{}", list(&parsed.win_nums), list(&parsed.win_stars),
                parsed.prize.map(|p| format!(" · bote {}", euro(p))).unwrap_or_default());
            if !save_it {
                return Ok(false);
            }
            let prize = prize.or(parsed.prize).unwrap_or(0.0);
            record(store, &id, &parsed.win_nums, &parsed.win_stars, prize)?;
        }
        DrawCmd::Prize { draw, prize, note } => {
            let id = draw_id(store, &draw)?;
            let d = store.set_prize_and_note(&id, prize, note.as_deref())?;
            println!("{} · premio {}", d.date, euro(d.prize));
        }
    }
    Ok(true)
}

/* ---------------- Fixed bets & config ---------------- */

fn fixed(store: &mut Store, cmd: FixedCmd) -> Result<bool> {
    match cmd {
        FixedCmd::List => {
            for (i, fb) in store.config().fixed_bets.iter().enumerate() {
                println!("#{}: {} + {}", i + 1, list(&fb.nums), list(&fb.ests));
            }
            Ok(false)
        }
        FixedCmd::Add { combo } => {
            store.add_fixed_bet(parse_number_list(&combo.nums), parse_number_list(&combo.stars))?;
            println!("Apuesta fija #{} añadida", store.config().fixed_bets.len());
            Ok(true)
        }
        FixedCmd::Remove { position } => {
            let idx = position.checked_sub(1).ok_or_else(|| eyre!("La posición empieza en 1"))?;
            store.remove_fixed_bet(idx)?;
            println!("Apuesta fija #{position} eliminada");
            Ok(true)
        }
    }
}

fn parse_days(raw: &str) -> Result<NextDrawDays> {
    let mut days = NextDrawDays { martes: false, viernes: false };
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<DrawDay>().map_err(|e| eyre!(e))? {
            DrawDay::Martes => days.martes = true,
            DrawDay::Viernes => days.viernes = true,
        }
    }
    Ok(days)
}

fn config(store: &mut Store, cmd: ConfigCmd, json: bool) -> Result<bool> {
    match cmd {
        ConfigCmd::Show => {
            let c = store.config();
            if json {
                print_json(c)?;
            } else {
                println!("costeApuesta: {}", euro(c.bet_cost()));
                println!("mensualSugerido: {}", c.suggested_monthly.map(euro).unwrap_or_else(|| s!("-")));
                println!("nextDrawWeeks: {}", c.next_draw_weeks);
                println!("nextDrawDays: {}", c.next_draw_days.allowed().iter().map(DrawDay::as_str).collect::<Vec<_>>().join(","));
                println!("proxy.url: {}", c.proxy.url.as_deref().unwrap_or("-"));
                println!("proxy.key: {}", if c.proxy.key.is_some() { "(definida)" } else { "-" });
                println!("apuestasFijas: {}", c.fixed_bets.len());
            }
            Ok(false)
        }
        ConfigCmd::Set { bet_cost, monthly, weeks, days, proxy_url, proxy_key } => {
            let next_draw_days = days.as_deref().map(parse_days).transpose()?;
            store.update_config(ConfigUpdate {
                bet_cost,
                suggested_monthly: monthly,
                next_draw_weeks: weeks,
                next_draw_days,
                proxy_url,
                proxy_key,
            });
            println!("Configuración guardada");
            Ok(true)
        }
    }
}

/* ---------------- Summary ---------------- */

fn summary(store: &mut Store, month: Option<&str>, json: bool) -> Result<bool> {
    let month = month.map(str::to_string).unwrap_or_else(|| dates::to_iso_month(dates::today()));
    if !dates::is_iso_month(&month) {
        bail!("Mes de pago no válido: {month}");
    }
    let ms = month_summary(store, &month);
    let acc = calculate_accounting(store.document());
    if json {
        print_json(&json!({ "mes": ms, "contabilidad": acc }))?;
    } else {
        println!("Mes {}: {} activos · {} pagados · {} pendientes", ms.month, ms.activos, ms.pagados, ms.pendientes);
        println!("Ingresos {} · Gastos {} · Premios {} · Saldo {}",
            euro(acc.total_income), euro(acc.total_expenses), euro(acc.total_prizes), euro(acc.balance));
    }
    Ok(true)
}
