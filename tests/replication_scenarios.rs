//! Two clients replicating one game through an in-process space.

use synced_connect_four::game::{Cell, GameOutcome, GameState, Player, Position};
use synced_connect_four::sync::{
    Adoption, Coordinator, EventOutcome, LocalSpace, RequestOutcome, SpaceClient,
    SpaceStore, StoreKey, DEFAULT_KEY_PREFIX,
};

fn key() -> StoreKey {
    StoreKey::for_instance(DEFAULT_KEY_PREFIX, "https://example.org/arcade?seat=1")
}

fn join(space: &LocalSpace) -> Coordinator<SpaceClient> {
    let mut c = Coordinator::new(space.connect(), key());
    c.pump();
    c
}

fn adoptions(outcomes: Vec<EventOutcome>) -> Vec<Adoption> {
    outcomes
        .into_iter()
        .filter_map(|o| match o {
            EventOutcome::Adopted(a) => Some(a),
            _ => None,
        })
        .collect()
}

#[test]
fn moves_reach_both_clients_only_after_echo() {
    let space = LocalSpace::new();
    let mut a = join(&space);
    let mut b = join(&space);

    assert_eq!(a.request_drop(2), RequestOutcome::Published);
    assert_eq!(a.request_drop(4), RequestOutcome::Locked);
    assert_eq!(a.state(), &GameState::initial());

    assert_eq!(adoptions(a.pump()), vec![Adoption::OwnEcho]);
    assert_eq!(adoptions(b.pump()), vec![Adoption::Remote]);
    assert_eq!(a.state(), b.state());
    assert_eq!(a.state().board().get(0, 2), Cell::Red);
    assert_eq!(a.state().board().get(0, 4), Cell::Empty);
}

#[test]
fn alternating_clients_play_to_a_vertical_win() {
    let space = LocalSpace::new();
    let mut a = join(&space);
    let mut b = join(&space);

    for (i, col) in [0, 1, 0, 1, 0, 1, 0].into_iter().enumerate() {
        let mover = if i % 2 == 0 { &mut a } else { &mut b };
        assert_eq!(mover.request_drop(col), RequestOutcome::Published);
        a.pump();
        b.pump();
    }

    for c in [&a, &b] {
        assert_eq!(c.state().outcome(), Some(GameOutcome::Winner(Player::Red)));
        assert_eq!(
            c.state().winning_line(),
            &[
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0),
            ]
        );
        assert!(!c.is_input_locked());
    }
}

#[test]
fn racing_proposals_last_observed_wins() {
    let space = LocalSpace::new();
    let mut a = join(&space);
    let mut b = join(&space);

    // Both publish before either sees a notification.
    assert_eq!(a.request_drop(0), RequestOutcome::Published);
    assert_eq!(b.request_drop(6), RequestOutcome::Published);

    // Each sees its own write and then the other's.
    assert_eq!(adoptions(a.pump()), vec![Adoption::OwnEcho, Adoption::Remote]);
    assert_eq!(adoptions(b.pump()), vec![Adoption::Superseded, Adoption::Remote]);

    // The later write (b's) is what both ended on; a's move is lost.
    assert_eq!(a.state(), b.state());
    assert_eq!(a.state().board().get(0, 6), Cell::Red);
    assert_eq!(a.state().board().get(0, 0), Cell::Empty);
    assert!(!a.is_input_locked());
    assert!(!b.is_input_locked());
}

#[test]
fn late_joiner_adopts_snapshot_idle() {
    let space = LocalSpace::new();
    let mut a = join(&space);
    a.request_drop(3);
    a.pump();

    let late = join(&space);
    assert_eq!(late.state(), a.state());
    assert!(!late.is_input_locked());
}

#[test]
fn late_joiner_sees_draw_without_winning_line() {
    use Cell::{Red as R, Yellow as Y};
    let a = [1, 1, 2, 2, 1, 1, 2];
    let b = [2, 2, 1, 1, 2, 2, 1];
    let rows = [a, a, a, b, a, a];
    let board: Vec<String> = rows
        .iter()
        .map(|r| format!("{:?}", r).replace(' ', ""))
        .collect();
    let payload = format!(
        r#"{{"board":[{}],"currentTurn":2,"winner":"draw","lastModified":1700000000000}}"#,
        board.join(",")
    );

    let space = LocalSpace::new();
    let mut writer = space.connect();
    writer.set_property(key().as_str(), payload).unwrap();

    let late = join(&space);
    assert_eq!(late.state().outcome(), Some(GameOutcome::Draw));
    assert!(late.state().winning_line().is_empty());
    assert_eq!(late.state().board().get(3, 0), Y);
    assert_eq!(late.state().board().get(0, 0), R);
}

#[test]
fn corrupt_notification_does_not_release_lock() {
    let space = LocalSpace::new();
    let mut a = join(&space);
    let mut saboteur = space.connect();
    saboteur.set_property(key().as_str(), "{\"board\":42}".to_string()).unwrap();

    // The corrupt value is queued ahead of a's own echo
    a.request_drop(5);
    assert!(matches!(a.pump_one(), Some(EventOutcome::Malformed(_))));
    assert!(a.is_input_locked());
    assert_eq!(a.state(), &GameState::initial());

    assert!(matches!(
        a.pump_one(),
        Some(EventOutcome::Adopted(Adoption::OwnEcho))
    ));
    assert!(!a.is_input_locked());
}

#[test]
fn lost_echo_leaves_client_locked() {
    let space = LocalSpace::new();
    let mut a = join(&space);

    space.set_online(false);
    assert!(matches!(a.request_drop(1), RequestOutcome::PublishFailed(_)));
    assert!(a.pump().is_empty());
    assert!(a.is_input_locked());

    // Any later notification for the key releases it
    space.set_online(true);
    let mut other = join(&space);
    other.request_drop(4);
    assert_eq!(adoptions(a.pump()), vec![Adoption::Superseded]);
    assert!(!a.is_input_locked());
    assert_eq!(a.state().board().get(0, 4), Cell::Red);
}

#[test]
fn reset_clears_board_everywhere() {
    let space = LocalSpace::new();
    let mut a = join(&space);
    let mut b = join(&space);
    a.request_drop(3);
    a.pump();
    b.pump();

    assert_eq!(b.request_reset(), RequestOutcome::Published);
    a.pump();
    b.pump();
    for c in [&a, &b] {
        assert_eq!(c.state().board(), GameState::initial().board());
        assert_eq!(c.state().current_turn(), Player::Red);
        assert_eq!(c.state().outcome(), None);
    }
}

#[test]
fn other_instances_do_not_interfere() {
    let space = LocalSpace::new();
    let mut a = join(&space);
    let mut elsewhere = Coordinator::new(
        space.connect(),
        StoreKey::for_instance(DEFAULT_KEY_PREFIX, "https://example.org/lobby"),
    );
    elsewhere.pump();

    elsewhere.request_drop(0);
    assert_eq!(adoptions(a.pump()), Vec::<Adoption>::new());
    assert_eq!(a.state(), &GameState::initial());
}
