//! # Viewer Lifecycle and Render Loop
//!
//! [`GameViewer`] owns the background render thread. `start()` spawns the
//! thread and blocks until the drawing surface is up (or a timeout
//! elapses); `push_snapshot()` hands immutable game copies across the
//! channel; `stop()` asks the loop to quit and waits a bounded time for
//! the thread to join, detaching it rather than killing it if the budget
//! runs out.
//!
//! The render loop is the sole owner of all render state. Everything it
//! touches after spawn arrives over the channels, so no locks guard the
//! canvas, the action log, or the city layout.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::channel::{self, Command, ViewerRx, ViewerTx};
use crate::draw;
use crate::geometry::Vec2;
use crate::snapshot::{GameView, Snapshot};
use crate::surface::{Canvas, SurfaceError, SurfaceEvent};

/// Viewer construction parameters.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    /// Render loop iterations per second.
    pub frame_rate: u32,
    /// How long `start()` waits for the surface to come up.
    pub ready_timeout: Duration,
    /// How long `stop()` waits for the render thread to join.
    pub join_timeout: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            frame_rate: 30,
            ready_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(2),
        }
    }
}

/// Errors surfaced to the `start()` caller.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("render thread not ready within {0:?}")]
    ReadyTimeout(Duration),
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Counters exported by the render loop, readable from any thread.
#[derive(Debug, Default)]
pub struct ViewerStats {
    pub frames: AtomicU64,
    pub snapshots_applied: AtomicU64,
    pub snapshots_discarded: AtomicU64,
    pub last_turn: AtomicU64,
}

/// Bounded history of formatted actions, newest last.
pub struct ActionLog {
    entries: VecDeque<String>,
    cap: usize,
}

impl ActionLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, entry: String) {
        if self.entries.len() == self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Up to `n` newest entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Actions kept in the log.
pub const ACTION_LOG_CAP: usize = 10;

/// Handle to the background render thread.
pub struct GameViewer {
    config: ViewerConfig,
    tx: Option<ViewerTx>,
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    stats: Arc<ViewerStats>,
}

impl GameViewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            tx: None,
            handle: None,
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(ViewerStats::default()),
        }
    }

    /// Whether the render thread is up and drawing.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Render-loop counters. Valid across start/stop cycles.
    pub fn stats(&self) -> Arc<ViewerStats> {
        self.stats.clone()
    }

    /// Spawns the render thread and blocks until the first frame is up.
    ///
    /// Idempotent: starting an already-running viewer is a no-op.
    pub fn start(&mut self) -> Result<(), ViewerError> {
        if let Some(handle) = &self.handle {
            if !handle.is_finished() {
                debug!("viewer already running, start ignored");
                return Ok(());
            }
            // Previous thread exited; reap it before respawning.
            if let Some(old) = self.handle.take() {
                let _ = old.join();
            }
        }

        let (tx, rx) = channel::pair();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), SurfaceError>>();
        let config = self.config.clone();
        let running = self.running.clone();
        let stats = self.stats.clone();

        let handle = thread::Builder::new()
            .name("railvis-render".to_owned())
            .spawn(move || {
                RenderLoop::new(config, rx, running, stats).run(ready_tx);
            })?;

        match ready_rx.recv_timeout(self.config.ready_timeout) {
            Ok(Ok(())) => {
                info!("render thread ready");
                self.tx = Some(tx);
                self.handle = Some(handle);
                Ok(())
            }
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err.into())
            }
            Err(_) => {
                // Thread is wedged before signalling; queue a quit so it
                // still winds down if it comes up late, then detach.
                warn!(timeout = ?self.config.ready_timeout, "render thread never became ready");
                tx.send_command(Command::Quit);
                drop(handle);
                Err(ViewerError::ReadyTimeout(self.config.ready_timeout))
            }
        }
    }

    /// Deep-copies `game` into a [`Snapshot`] and queues it for display.
    ///
    /// Cheap no-op when the viewer is not running.
    pub fn push_snapshot(&self, game: &impl GameView, action: Option<&Action>) {
        self.push(Snapshot::capture(game, action));
    }

    /// Queues an already-built snapshot.
    pub fn push(&self, snapshot: Snapshot) {
        if let Some(tx) = &self.tx {
            tx.send_snapshot(snapshot);
        }
    }

    /// Asks the render thread to quit and waits up to the join budget.
    ///
    /// Returns `true` if the thread exited in time (or was never
    /// started); `false` if it had to be left behind as a detached
    /// thread. The thread is never force-killed.
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return true;
        };
        if let Some(tx) = self.tx.take() {
            tx.send_command(Command::Quit);
        }

        let deadline = Instant::now() + self.config.join_timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                warn!(timeout = ?self.config.join_timeout, "render thread did not exit, detaching");
                drop(handle);
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        if handle.join().is_err() {
            warn!("render thread panicked");
        }
        true
    }
}

impl Drop for GameViewer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Stopping,
}

/// Single-threaded render state. Constructed and consumed entirely on
/// the render thread.
struct RenderLoop {
    config: ViewerConfig,
    rx: ViewerRx,
    running: Arc<AtomicBool>,
    stats: Arc<ViewerStats>,
    log: ActionLog,
    snapshot: Option<Snapshot>,
    positions: HashMap<String, Vec2>,
}

impl RenderLoop {
    fn new(
        config: ViewerConfig,
        rx: ViewerRx,
        running: Arc<AtomicBool>,
        stats: Arc<ViewerStats>,
    ) -> Self {
        Self {
            config,
            rx,
            running,
            stats,
            log: ActionLog::new(ACTION_LOG_CAP),
            snapshot: None,
            positions: HashMap::new(),
        }
    }

    fn run(mut self, ready_tx: mpsc::Sender<Result<(), SurfaceError>>) {
        let mut canvas = match Canvas::new(self.config.width, self.config.height) {
            Ok(canvas) => canvas,
            Err(err) => {
                let _ = ready_tx.send(Err(err));
                return;
            }
        };
        draw::draw_idle(&mut canvas);
        self.running.store(true, Ordering::SeqCst);
        let _ = ready_tx.send(Ok(()));

        let tick = Duration::from_secs(1) / self.config.frame_rate.max(1);
        let mut state = LoopState::Running;

        while state == LoopState::Running {
            let frame_start = Instant::now();

            for event in canvas.poll_events() {
                match event {
                    SurfaceEvent::CloseRequested => {
                        debug!("close requested, stopping");
                        state = LoopState::Stopping;
                    }
                }
            }
            for command in self.rx.drain_commands() {
                match command {
                    Command::Quit => state = LoopState::Stopping,
                }
            }

            if self.ingest_updates() {
                self.redraw(&mut canvas);
            }

            if state == LoopState::Running {
                let elapsed = frame_start.elapsed();
                if elapsed < tick {
                    thread::sleep(tick - elapsed);
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!(
            frames = self.stats.frames.load(Ordering::Relaxed),
            "render thread stopped"
        );
    }

    /// Drains every queued snapshot, logging each one's action, and keeps
    /// only the newest for rendering. Returns whether a redraw is due.
    fn ingest_updates(&mut self) -> bool {
        let mut updates = self.rx.drain_updates();
        for snapshot in &updates {
            if let Some(action) = &snapshot.action {
                self.log.push(action.clone());
            }
        }
        let Some(snapshot) = updates.pop() else {
            return false;
        };
        if !updates.is_empty() {
            self.stats
                .snapshots_discarded
                .fetch_add(updates.len() as u64, Ordering::Relaxed);
        }
        self.apply(snapshot);
        true
    }

    fn apply(&mut self, snapshot: Snapshot) {
        if self.positions.is_empty() {
            let (kind, positions) = draw::positions_for(&snapshot);
            debug!(?kind, cities = positions.len(), "map layout selected");
            self.positions = positions;
        }
        self.stats
            .last_turn
            .store(snapshot.turn as u64, Ordering::SeqCst);
        self.stats.snapshots_applied.fetch_add(1, Ordering::Relaxed);
        self.snapshot = Some(snapshot);
    }

    fn redraw(&mut self, canvas: &mut Canvas) {
        if let Some(snapshot) = &self.snapshot {
            let recent = self.log.recent(draw::ACTION_LINES);
            draw::render_frame(canvas, snapshot, &self.positions, &recent);
            self.stats.frames.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Process-wide convenience handle.
///
/// The primary API is an explicit [`GameViewer`] instance; this wrapper
/// exists for embedders that cannot thread a handle through their call
/// sites.
pub mod global {
    use std::sync::OnceLock;

    use parking_lot::Mutex;

    use super::{GameViewer, ViewerConfig, ViewerError};
    use crate::action::Action;
    use crate::snapshot::GameView;

    fn instance() -> &'static Mutex<GameViewer> {
        static VIEWER: OnceLock<Mutex<GameViewer>> = OnceLock::new();
        VIEWER.get_or_init(|| Mutex::new(GameViewer::new(ViewerConfig::default())))
    }

    pub fn start() -> Result<(), ViewerError> {
        instance().lock().start()
    }

    pub fn push_snapshot(game: &impl GameView, action: Option<&Action>) {
        instance().lock().push_snapshot(game, action);
    }

    pub fn stop() -> bool {
        instance().lock().stop()
    }
}
