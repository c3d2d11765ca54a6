// tests/backup_roundtrip.rs
use std::fs;

use pena::eligibility::compute_eligible_ids;
use pena::model::{DrawDay, Preference};
use pena::store::{ConfigUpdate, NewDraw, Store};

fn populated(path: &std::path::Path) -> Store {
    let mut st = Store::open(path).unwrap();
    let id = st.add_participant("Ana", Preference::Viernes, Some("tesorera")).unwrap().id.clone();
    st.mark_all("2025-03", true).unwrap();
    st.add_fixed_bet(vec![7, 14, 21, 28, 35], vec![3, 9]).unwrap();
    let d = st.create_draw(NewDraw {
        date: "2025-03-07".into(),
        day: Some(DrawDay::Viernes),
        pay_month: "2025-03".into(),
        note: "boleto 123".into(),
    }).unwrap().id.clone();
    st.add_bet(&d, vec![1, 2, 3, 4, 5], vec![1, 2]).unwrap();
    st.record_results(&d, &[1, 2, 10, 11, 12], &[5, 6], 42.0).unwrap();
    assert!(st.participant(&id).is_some());
    st
}

#[test]
fn save_then_open_restores_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pena_euromillones_v1.json");

    let mut st = populated(&path);
    st.save().unwrap();

    let reopened = Store::open(&path).unwrap();
    assert_eq!(reopened.document(), st.document());
}

#[test]
fn export_import_preserves_content() {
    let dir = tempfile::tempdir().unwrap();
    let st = populated(&dir.path().join("a.json"));
    let text = st.export_json().unwrap();

    let mut other = Store::in_memory();
    other.import_json(&text).unwrap();
    assert!(other.document().same_content(st.document()));
}

#[test]
fn stored_json_uses_document_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let mut st = populated(&path);
    st.save().unwrap();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    for key in ["meta", "config", "participantes", "pagos", "sorteos"] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    let draw = &v["sorteos"][0];
    assert_eq!(draw["dia"], "viernes");
    assert_eq!(draw["payMonth"], "2025-03");
    assert_eq!(draw["resultados"]["counts"]["apuestas"], 1);
    assert_eq!(draw["apuestasFijas"][0]["esFija"], true);
    assert_eq!(v["config"]["costeApuesta"], 2.5);
    let pid = v["participantes"][0]["id"].as_str().unwrap();
    assert_eq!(v["pagos"]["2025-03"]["entries"][pid]["pagado"], true);
}

#[test]
fn legacy_documents_load_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(&path, r#"{
        "config": {"costeApuesta": 3},
        "participantes": [{"id": "p1", "nombre": "Ana", "preferencia": " MARTES ", "activo": true}],
        "pagos": {"2025-03": {"importeMensual": 20, "entries": {"p1": {"pagado": "true", "cantidad": 20}}}},
        "sorteos": []
    }"#).unwrap();

    let mut st = Store::open(&path).unwrap();
    assert_eq!(st.config().bet_cost, 3.0);
    assert_eq!(st.config().next_draw_weeks, 8);
    assert_eq!(st.participant("p1").unwrap().preference, Preference::Martes);
    // "true" as a string is not paid.
    assert!(!st.payment_entry("2025-03", "p1").unwrap().paid);
    assert_eq!(st.document().meta.version, 1);
}

#[test]
fn reset_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let mut st = populated(&path);
    st.save().unwrap();
    assert!(path.exists());

    st.reset().unwrap();
    assert!(!path.exists());
    assert!(st.document().participants.is_empty());
}

#[test]
fn null_bet_cost_falls_back_to_default() {
    let mut st = Store::in_memory();
    st.import_json(r#"{
        "config": {"costeApuesta": null},
        "participantes": [
            {"id": "p1", "nombre": "Ana", "preferencia": "ambos", "activo": true},
            {"id": "p2", "nombre": "Luis", "preferencia": "ambos", "activo": true}
        ],
        "pagos": {"2025-03": {"entries": {
            "p1": {"pagado": true, "cantidad": 10},
            "p2": {"pagado": true, "cantidad": 10}
        }}},
        "sorteos": []
    }"#).unwrap();
    assert_eq!(st.config().bet_cost(), 2.5);

    let draw_id = st.create_draw(NewDraw {
        date: "2025-03-04".into(),
        day: Some(DrawDay::Martes),
        pay_month: "2025-03".into(),
        note: String::new(),
    }).unwrap().id.clone();
    assert_eq!(st.draw(&draw_id).unwrap().total_euros, 5.0);

    st.delete_participant("p2").unwrap();
    assert_eq!(st.draw(&draw_id).unwrap().total_euros, 2.5);
}

#[test]
fn zero_bet_cost_charges_the_default() {
    let mut st = Store::in_memory();
    let id = st.add_participant("Ana", Preference::Ambos, None).unwrap().id.clone();
    st.mark_all("2025-03", true).unwrap();
    st.update_config(ConfigUpdate { bet_cost: Some(0.0), ..Default::default() });

    let draw = st.create_draw(NewDraw {
        date: "2025-03-07".into(),
        day: Some(DrawDay::Viernes),
        pay_month: "2025-03".into(),
        note: String::new(),
    }).unwrap();
    assert_eq!(draw.players, vec![id]);
    assert_eq!(draw.total_euros, 2.5);
}

#[test]
fn unknown_preference_loads_but_is_never_eligible() {
    let mut st = Store::in_memory();
    st.import_json(r#"{
        "config": {},
        "sorteos": [],
        "participantes": [
            {"id": "p1", "nombre": "Ana", "preferencia": "Martes y viernes", "activo": true},
            {"id": "p2", "nombre": "Luis", "preferencia": "viernes", "activo": true}
        ],
        "pagos": {"2025-03": {"entries": {
            "p1": {"pagado": true, "cantidad": 10},
            "p2": {"pagado": true, "cantidad": 10}
        }}}
    }"#).unwrap();

    let pref = &st.participant("p1").unwrap().preference;
    assert_eq!(*pref, Preference::Other("Martes y viernes".into()));
    assert!(!pref.matches(DrawDay::Martes));
    assert!(!pref.matches(DrawDay::Viernes));

    assert!(compute_eligible_ids(&mut st, Some(DrawDay::Martes), "2025-03").is_empty());
    assert_eq!(compute_eligible_ids(&mut st, Some(DrawDay::Viernes), "2025-03"), vec!["p2".to_string()]);

    // Written back untouched.
    let v: serde_json::Value = serde_json::from_str(&st.export_json().unwrap()).unwrap();
    assert_eq!(v["participantes"][0]["preferencia"], "Martes y viernes");
}
