//! Tests for change notification: the version counter and `watch`.

use memory_scramble::Board;
use std::time::Duration;
use tokio::time::{sleep, timeout};

fn demo_board() -> Board {
    Board::parse("3x3\n🦄\n🦄\n🌈\n🌈\n⭐\n⭐\n☀\n☀\n🌙").expect("demo board parses")
}

fn spot(view: &str, row: usize, col: usize) -> &str {
    view.lines().nth(1 + row * 3 + col).expect("spot within view")
}

#[tokio::test]
async fn test_watch_waits_for_next_change() {
    let board = demo_board();

    let shared = board.clone();
    let watcher = tokio::spawn(async move { shared.watch("bob").await });
    sleep(Duration::from_millis(50)).await;
    assert!(!watcher.is_finished(), "nothing changed yet");

    board.flip("alice", 0, 0).await.expect("flip");
    let view = timeout(Duration::from_secs(1), watcher)
        .await
        .expect("watch woke on the flip")
        .expect("watch task ran")
        .expect("watch succeeded");
    assert_eq!(spot(&view, 0, 0), "up 🦄");
}

#[tokio::test]
async fn test_watch_resolves_on_own_flip() {
    let board = demo_board();

    let shared = board.clone();
    let watcher = tokio::spawn(async move { shared.watch("alice").await });
    sleep(Duration::from_millis(20)).await;

    // The watcher's own flip is a change like any other.
    board.flip("alice", 0, 0).await.expect("flip");
    let view = timeout(Duration::from_secs(1), watcher)
        .await
        .expect("watch woke")
        .expect("watch task ran")
        .expect("watch succeeded");
    assert_eq!(spot(&view, 0, 0), "my 🦄");
}

#[tokio::test]
async fn test_all_watchers_wake_on_one_change() {
    let board = demo_board();

    let mut watchers = Vec::new();
    for player in ["bob", "carol", "dave"] {
        let shared = board.clone();
        watchers.push(tokio::spawn(
            async move { shared.watch(player).await },
        ));
    }
    sleep(Duration::from_millis(50)).await;

    board.flip("alice", 1, 1).await.expect("flip");
    for watcher in watchers {
        let view = timeout(Duration::from_secs(1), watcher)
            .await
            .expect("every watcher wakes")
            .expect("watch task ran")
            .expect("watch succeeded");
        assert_eq!(spot(&view, 1, 1), "up ⭐");
    }
}

#[tokio::test]
async fn test_invisible_control_change_does_not_wake() {
    let board = demo_board();

    // Leave (0,0) face up and uncontrolled.
    board.flip("alice", 0, 0).await.expect("first card");
    board.flip("alice", 0, 2).await.expect("non-match");

    let shared = board.clone();
    let watcher = tokio::spawn(async move { shared.watch("bob").await });
    sleep(Duration::from_millis(20)).await;

    // Taking control of an already face-up card changes nothing a look
    // could report, so the watcher stays parked.
    board.flip("carol", 0, 0).await.expect("claim face-up card");
    sleep(Duration::from_millis(50)).await;
    assert!(!watcher.is_finished(), "no visible change yet");

    // Carol's second card turns a card up: visible, watcher wakes.
    let _ = board.flip("carol", 2, 2).await.expect("second card");
    let view = timeout(Duration::from_secs(1), watcher)
        .await
        .expect("watch woke on face change")
        .expect("watch task ran")
        .expect("watch succeeded");
    assert_eq!(spot(&view, 2, 2), "up 🌙");
}

#[tokio::test]
async fn test_version_is_monotonic_across_moves() {
    let board = demo_board();

    let mut last = board.version().await;
    board.flip("alice", 0, 0).await.expect("first card");
    let v = board.version().await;
    assert!(v > last);
    last = v;

    board.flip("alice", 0, 1).await.expect("match");
    let v = board.version().await;
    assert!(v > last);
    last = v;

    board.flip("alice", 1, 0).await.expect("cleanup move");
    let v = board.version().await;
    assert!(v > last);

    // look never advances the counter.
    board.look("alice").await.expect("look");
    assert_eq!(board.version().await, v);
}

#[tokio::test]
async fn test_watch_rejects_invalid_player() {
    let board = demo_board();
    assert!(board.watch("not a player").await.is_err());
}
