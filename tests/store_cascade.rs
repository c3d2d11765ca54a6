// tests/store_cascade.rs
use pena::model::{DrawDay, Preference};
use pena::store::{NewDraw, PaymentUpdate, Store};
use pena::PenaError;

fn draw_on(date: &str, day: DrawDay) -> NewDraw {
    NewDraw {
        date: date.into(),
        day: Some(day),
        pay_month: "2025-03".into(),
        note: String::new(),
    }
}

fn pool() -> (Store, Vec<String>) {
    let mut st = Store::in_memory();
    let ids: Vec<String> = [("Ana", Preference::Ambos), ("Luis", Preference::Martes), ("Eva", Preference::Viernes)]
        .iter()
        .map(|(n, p)| st.add_participant(n, p.clone(), None).unwrap().id.clone())
        .collect();
    for id in &ids {
        st.update_payment("2025-03", id, PaymentUpdate { paid: Some(true), amount: Some(10.0), ..Default::default() })
            .unwrap();
    }
    (st, ids)
}

#[test]
fn delete_participant_cascades_everywhere() {
    let (mut st, ids) = pool();
    let tue = st.create_draw(draw_on("2025-03-04", DrawDay::Martes)).unwrap().id.clone();
    let fri = st.create_draw(draw_on("2025-03-07", DrawDay::Viernes)).unwrap().id.clone();
    assert_eq!(st.draw(&tue).unwrap().players, vec![ids[0].clone(), ids[1].clone()]);
    assert_eq!(st.draw(&tue).unwrap().total_euros, 5.0);

    st.delete_participant(&ids[0]).unwrap();

    let doc = st.document();
    assert!(doc.participant(&ids[0]).is_none());
    assert!(doc.payments.values().all(|pm| !pm.entries.contains_key(&ids[0])));
    assert!(doc.draws.iter().all(|d| !d.players.contains(&ids[0])));
    assert_eq!(st.draw(&tue).unwrap().players, vec![ids[1].clone()]);
    assert_eq!(st.draw(&tue).unwrap().total_euros, 2.5);
    assert_eq!(st.draw(&fri).unwrap().total_euros, 2.5);

    assert!(matches!(st.delete_participant(&ids[0]), Err(PenaError::UnknownParticipant(_))));
}

#[test]
fn draw_keeps_its_fixed_bet_copy() {
    let (mut st, _) = pool();
    st.add_fixed_bet(vec![1, 2, 3, 4, 5], vec![1, 2]).unwrap();
    let id = st.create_draw(draw_on("2025-03-04", DrawDay::Martes)).unwrap().id.clone();

    st.remove_fixed_bet(0).unwrap();
    st.add_fixed_bet(vec![10, 20, 30, 40, 50], vec![3, 4]).unwrap();

    let d = st.draw(&id).unwrap();
    assert_eq!(d.fixed_bets.len(), 1);
    assert_eq!(d.fixed_bets[0].numbers, vec![1, 2, 3, 4, 5]);
    assert_eq!(d.fixed_bets[0].fixed, Some(true));
    assert!(d.fixed_bets[0].id.starts_with("fija-"));
}

#[test]
fn settlement_uses_current_fixed_bets() {
    let (mut st, _) = pool();
    let id = st.create_draw(draw_on("2025-03-04", DrawDay::Martes)).unwrap().id.clone();
    st.add_bet(&id, vec![1, 2, 30, 31, 32], vec![9, 10]).unwrap();
    // Added after the draw was created; still evaluated.
    st.add_fixed_bet(vec![1, 40, 41, 42, 43], vec![1, 2]).unwrap();

    let r = st.record_results(&id, &[1, 2, 3, 4, 5], &[1, 2], 100.0).unwrap();
    assert_eq!(r.total_winners, 2);
    assert_eq!(r.counts.bets, 1);
    assert_eq!(r.counts.fixed, 1);
    assert_eq!(r.per_winner, 50.0);
    assert_eq!(st.draw(&id).unwrap().prize, 100.0);
}

#[test]
fn results_need_five_numbers() {
    let (mut st, _) = pool();
    let id = st.create_draw(draw_on("2025-03-04", DrawDay::Martes)).unwrap().id.clone();
    assert!(matches!(
        st.record_results(&id, &[1, 2, 3, 4], &[1, 2], 0.0),
        Err(PenaError::NotEnoughNumbers { expected: 5, got: 4 })
    ));
    assert!(st.draw(&id).unwrap().results.is_none());
}

#[test]
fn unpaid_participants_are_left_out_of_new_draws() {
    let (mut st, ids) = pool();
    st.update_payment("2025-03", &ids[1], PaymentUpdate { paid: Some(false), ..Default::default() }).unwrap();
    let id = st.create_draw(draw_on("2025-03-04", DrawDay::Martes)).unwrap().id.clone();
    assert_eq!(st.draw(&id).unwrap().players, vec![ids[0].clone()]);

    st.set_active(&ids[0], false).unwrap();
    assert!(matches!(
        st.create_draw(draw_on("2025-03-11", DrawDay::Martes)),
        Err(PenaError::NoEligiblePlayers { .. })
    ));
    assert_eq!(st.document().draws.len(), 1);
}
