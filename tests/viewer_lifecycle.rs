//! End-to-end lifecycle tests against a real render thread.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use railvis::snapshot::PlayerState;
use railvis::{GameView, GameViewer, RouteInfo, Snapshot, TrainColor, ViewerConfig};

/// Minimal game with one route and two players.
struct FakeGame {
    turn: u32,
}

impl GameView for FakeGame {
    fn players(&self) -> Vec<PlayerState> {
        vec![
            PlayerState {
                name: "Alice".to_owned(),
                turn: self.turn,
                points: 7,
                remaining_trains: 40,
                ..PlayerState::default()
            },
            PlayerState {
                name: "Bob".to_owned(),
                turn: self.turn,
                ..PlayerState::default()
            },
        ]
    }

    fn current_player_idx(&self) -> usize {
        (self.turn % 2) as usize
    }

    fn city_names(&self) -> Vec<String> {
        vec!["Denver".to_owned(), "Omaha".to_owned()]
    }

    fn connections(&self) -> Vec<(String, String)> {
        vec![("Denver".to_owned(), "Omaha".to_owned())]
    }

    fn route_lookup(&self, _: &str, _: &str) -> Vec<RouteInfo> {
        vec![RouteInfo {
            color: TrainColor::Red,
            length: 4,
            claimed_by: None,
        }]
    }
}

fn test_config() -> ViewerConfig {
    ViewerConfig {
        width: 320,
        height: 240,
        frame_rate: 60,
        ready_timeout: Duration::from_secs(5),
        join_timeout: Duration::from_secs(2),
    }
}

#[test]
fn start_then_stop_is_clean() {
    let mut viewer = GameViewer::new(test_config());
    viewer.start().unwrap();
    assert!(viewer.is_running());
    assert!(viewer.stop());

    // The running flag clears once the thread winds down.
    let deadline = Instant::now() + Duration::from_secs(1);
    while viewer.is_running() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!viewer.is_running());
}

#[test]
fn start_is_idempotent() {
    let mut viewer = GameViewer::new(test_config());
    viewer.start().unwrap();
    viewer.start().unwrap();
    viewer.start().unwrap();
    assert!(viewer.is_running());
    assert!(viewer.stop());
}

#[test]
fn stop_without_start_returns_immediately() {
    let mut viewer = GameViewer::new(test_config());
    let begin = Instant::now();
    assert!(viewer.stop());
    assert!(begin.elapsed() < Duration::from_secs(1));
}

#[test]
fn latest_snapshot_wins() {
    let mut viewer = GameViewer::new(test_config());
    viewer.start().unwrap();
    let stats = viewer.stats();

    for turn in 1..=5 {
        viewer.push_snapshot(&FakeGame { turn }, None);
    }

    // Eventually the loop drains the queue and the freshest turn sticks;
    // intermediate snapshots may or may not have been seen.
    let deadline = Instant::now() + Duration::from_secs(3);
    while stats.last_turn.load(Ordering::SeqCst) != 5 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(stats.last_turn.load(Ordering::SeqCst), 5);
    assert!(stats.snapshots_applied.load(Ordering::Relaxed) >= 1);
    assert!(viewer.stop());
}

#[test]
fn push_after_stop_is_a_noop() {
    let mut viewer = GameViewer::new(test_config());
    viewer.start().unwrap();
    assert!(viewer.stop());
    viewer.push_snapshot(&FakeGame { turn: 9 }, None);
    viewer.push(Snapshot::capture(&FakeGame { turn: 10 }, None));
}

#[test]
fn bad_surface_size_fails_start() {
    let mut viewer = GameViewer::new(ViewerConfig {
        width: 0,
        ..test_config()
    });
    assert!(viewer.start().is_err());
    assert!(!viewer.is_running());
}

#[test]
fn viewer_restarts_after_stop() {
    let mut viewer = GameViewer::new(test_config());
    viewer.start().unwrap();
    assert!(viewer.stop());
    viewer.start().unwrap();
    assert!(viewer.is_running());
    assert!(viewer.stop());
}
