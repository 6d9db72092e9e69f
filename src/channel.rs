//! # Dual-Queue Channel
//!
//! Two unidirectional, unbounded FIFO channels between producer threads
//! and the render loop: an update channel carrying snapshots and a
//! command channel carrying control tokens. FIFO order holds within each
//! channel; no ordering is guaranteed across the two. The render loop
//! drains every pending update per tick but renders only the newest.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::snapshot::Snapshot;

/// Control tokens understood by the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask the render loop to shut down.
    Quit,
}

/// Producer half. Cheap to clone; every method is non-blocking and
/// best-effort - if the render thread is gone, sends are silently dropped.
#[derive(Clone)]
pub struct ViewerTx {
    update_tx: Sender<Snapshot>,
    command_tx: Sender<Command>,
}

/// Consumer half, owned by the render thread.
pub struct ViewerRx {
    update_rx: Receiver<Snapshot>,
    command_rx: Receiver<Command>,
}

/// Creates a connected channel pair.
pub fn pair() -> (ViewerTx, ViewerRx) {
    let (update_tx, update_rx) = mpsc::channel();
    let (command_tx, command_rx) = mpsc::channel();
    (
        ViewerTx {
            update_tx,
            command_tx,
        },
        ViewerRx {
            update_rx,
            command_rx,
        },
    )
}

impl ViewerTx {
    pub fn send_snapshot(&self, snapshot: Snapshot) {
        let _ = self.update_tx.send(snapshot);
    }

    pub fn send_command(&self, command: Command) {
        let _ = self.command_tx.send(command);
    }
}

impl ViewerRx {
    /// Drains pending commands in FIFO order without blocking.
    ///
    /// A disconnected command channel (every producer handle dropped)
    /// reads as a final `Quit`, so the render loop always has a shutdown
    /// path even when nobody asked for one explicitly.
    pub fn drain_commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        loop {
            match self.command_rx.try_recv() {
                Ok(cmd) => commands.push(cmd),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    commands.push(Command::Quit);
                    break;
                }
            }
        }
        commands
    }

    /// Drains every pending snapshot in FIFO order without blocking.
    pub fn drain_updates(&self) -> Vec<Snapshot> {
        let mut updates = Vec::new();
        while let Ok(snapshot) = self.update_rx.try_recv() {
            updates.push(snapshot);
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{GameView, PlayerState, RouteInfo};

    struct EmptyGame;

    impl GameView for EmptyGame {
        fn players(&self) -> Vec<PlayerState> {
            vec![PlayerState {
                name: "P1".into(),
                ..Default::default()
            }]
        }
        fn current_player_idx(&self) -> usize {
            0
        }
        fn city_names(&self) -> Vec<String> {
            Vec::new()
        }
        fn connections(&self) -> Vec<(String, String)> {
            Vec::new()
        }
        fn route_lookup(&self, _: &str, _: &str) -> Vec<RouteInfo> {
            Vec::new()
        }
    }

    fn snapshot_with_turn(turn: u32) -> Snapshot {
        let mut snap = Snapshot::capture(&EmptyGame, None);
        snap.turn = turn;
        snap
    }

    #[test]
    fn commands_are_fifo() {
        let (tx, rx) = pair();
        tx.send_command(Command::Quit);
        tx.send_command(Command::Quit);
        assert_eq!(rx.drain_commands(), vec![Command::Quit, Command::Quit]);
        assert!(rx.drain_commands().is_empty());
    }

    #[test]
    fn drain_updates_is_fifo_and_complete() {
        let (tx, rx) = pair();
        for turn in 1..=5 {
            tx.send_snapshot(snapshot_with_turn(turn));
        }
        let turns: Vec<u32> = rx.drain_updates().into_iter().map(|s| s.turn).collect();
        assert_eq!(turns, vec![1, 2, 3, 4, 5]);
        assert!(rx.drain_updates().is_empty());
    }

    #[test]
    fn disconnected_command_channel_reads_as_quit() {
        let (tx, rx) = pair();
        drop(tx);
        assert_eq!(rx.drain_commands(), vec![Command::Quit]);
    }

    #[test]
    fn sends_after_receiver_dropped_are_silent() {
        let (tx, rx) = pair();
        drop(rx);
        tx.send_snapshot(snapshot_with_turn(1));
        tx.send_command(Command::Quit);
    }
}
