// tests/cli_parse.rs
#![cfg(feature = "cli")]

use clap::Parser;
use pena::cli::{self, Cli, Command, DrawCmd, ParticipantCmd};
use pena::model::{DrawDay, Preference};
use pena::store::Store;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("pena").chain(args.iter().copied())).unwrap()
}

#[test]
fn parses_participant_add_with_loose_preference() {
    let cli = parse(&["participant", "add", "Ana", "--pref", " Viernes "]);
    match cli.command {
        Command::Participant(ParticipantCmd::Add { name, pref, notes }) => {
            assert_eq!(name, "Ana");
            assert_eq!(pref, Preference::Viernes);
            assert!(notes.is_none());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn parses_draw_results() {
    let cli = parse(&["--store", "x/", "draw", "results", "2025-03-04", "--nums", "1,2,3,4,5", "--stars", "1,2", "--prize", "12.5"]);
    assert_eq!(cli.store.as_deref(), Some("x/"));
    match cli.command {
        Command::Draw(DrawCmd::Results { draw, combo, prize }) => {
            assert_eq!(draw, "2025-03-04");
            assert_eq!(combo.nums, "1,2,3,4,5");
            assert_eq!(prize, 12.5);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn rejects_unknown_day() {
    assert!(Cli::try_parse_from(["pena", "eligible", "--day", "lunes", "--month", "2025-03"]).is_err());
}

#[test]
fn commands_persist_through_the_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("pena.json");
    let store = doc.to_str().unwrap();
    let run = |args: &[&str]| {
        let mut full = vec!["--store", store];
        full.extend_from_slice(args);
        cli::run(parse(&full)).unwrap();
    };

    run(&["participant", "add", "Ana", "--pref", "martes"]);
    run(&["participant", "add", "Luis"]);
    run(&["pay", "all", "2025-03"]);
    run(&["fixed", "add", "--nums", "7,14,21,28,35", "--stars", "3,9"]);
    run(&["draw", "create", "--date", "2025-03-04"]);
    run(&["draw", "bet", "add", "2025-03-04", "--nums", "1,2,3,4,5", "--stars", "1,2"]);
    run(&["draw", "results", "2025-03-04", "--nums", "1,2,10,11,12", "--stars", "5,6", "--prize", "30"]);

    let st = Store::open(&doc).unwrap();
    let d = &st.document().draws[0];
    assert_eq!(d.day, DrawDay::Martes);
    assert_eq!(d.pay_month, "2025-03");
    assert_eq!(d.players.len(), 2);
    assert_eq!(d.fixed_bets.len(), 1);
    assert_eq!(d.bets.len(), 1);
    let r = d.results.as_ref().unwrap();
    assert_eq!(r.total_winners, 1);
    assert_eq!(r.per_winner, 30.0);

    // Unknown names fail without touching the file.
    let before = std::fs::read_to_string(&doc).unwrap();
    assert!(cli::run(parse(&["--store", store, "participant", "delete", "Nadie"])).is_err());
    assert_eq!(std::fs::read_to_string(&doc).unwrap(), before);
}
