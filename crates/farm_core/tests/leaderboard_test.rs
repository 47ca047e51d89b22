use farm_core::io::seed::Seed;
use farm_core::state::Scores;
use farm_core::store::{MemoryStore, NewRun, RunStore, StoreError};

fn seed() -> Seed {
    serde_json::from_str(r#"{"id":"seed-lb","code":"LB-01"}"#).expect("seed parses")
}

fn submit(store: &mut MemoryStore, alias: &str, total: f64) -> (String, String) {
    let player = store.create_player(&format!("anon_{alias}"), alias);
    let run = store
        .insert_run(NewRun {
            player_id: player.id.clone(),
            seed_id: "seed-lb".to_string(),
            level: 1,
            scores: Scores {
                total,
                ..Scores::default()
            },
            duration_s: 0,
            actions_log: Vec::new(),
        })
        .expect("run stored");
    (player.id, run.id)
}

#[test]
fn best_scores_rank_first() {
    let mut store = MemoryStore::with_seeds([seed()]);
    submit(&mut store, "A", 95.0);
    submit(&mut store, "B", 82.0);
    submit(&mut store, "C", 88.0);

    let rows = store.leaderboard("seed-lb", None, 10).expect("leaderboard reads");
    let ranked: Vec<_> = rows.iter().map(|row| (row.rank, row.score_total)).collect();
    assert_eq!(ranked, vec![(1, 95.0), (2, 88.0), (3, 82.0)]);
    let tiers: Vec<_> = rows.iter().map(|row| row.tier.as_str()).collect();
    assert_eq!(tiers, vec!["PLATINUM", "GOLD", "BRONZE"]);
    assert_eq!(store.run_count("seed-lb"), 3);
}

#[test]
fn limit_truncates_after_ordering() {
    let mut store = MemoryStore::with_seeds([seed()]);
    for (alias, total) in [("A", 40.0), ("B", 70.0), ("C", 90.0)] {
        submit(&mut store, alias, total);
    }
    let rows = store.leaderboard("seed-lb", None, 2).expect("leaderboard reads");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].player_alias, "C");
    assert_eq!(rows[1].player_alias, "B");
}

#[test]
fn room_filter_ranks_members_only() {
    let mut store = MemoryStore::with_seeds([seed()]);
    let (alice, _) = submit(&mut store, "Alice", 60.0);
    submit(&mut store, "Bob", 99.0);
    let (carol, carol_run) = submit(&mut store, "Carol", 75.0);

    store.create_room("FRIENDS", "LB-01").expect("room created");
    store.join_room("FRIENDS", &alice).expect("alice joins");
    store.join_room("FRIENDS", &carol).expect("carol joins");

    let rows = store
        .leaderboard("seed-lb", Some("FRIENDS"), 10)
        .expect("leaderboard reads");
    let aliases: Vec<_> = rows.iter().map(|row| row.player_alias.as_str()).collect();
    assert_eq!(aliases, vec!["Carol", "Alice"]);
    assert_eq!(rows[0].rank, 1);
    // The global rank still counts Bob.
    assert_eq!(store.run_rank(&carol_run), Some(2));
}

#[test]
fn unknown_room_is_reported() {
    let store = MemoryStore::with_seeds([seed()]);
    assert_eq!(
        store.leaderboard("seed-lb", Some("GHOST"), 10),
        Err(StoreError::RoomNotFound("GHOST".to_string()))
    );
}

#[test]
fn other_seeds_do_not_leak_into_the_board() {
    let mut store = MemoryStore::with_seeds([
        seed(),
        serde_json::from_str(r#"{"id":"seed-other","code":"OT-01"}"#).expect("seed parses"),
    ]);
    submit(&mut store, "A", 50.0);
    let player = store.create_player("anon_x", "X");
    store
        .insert_run(NewRun {
            player_id: player.id,
            seed_id: "seed-other".to_string(),
            level: 2,
            scores: Scores::default(),
            duration_s: 12,
            actions_log: Vec::new(),
        })
        .expect("run stored");

    let rows = store.leaderboard("seed-lb", None, 10).expect("leaderboard reads");
    assert_eq!(rows.len(), 1);
    assert_eq!(store.run_count("seed-other"), 1);
}
