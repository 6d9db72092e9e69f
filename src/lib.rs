//! # Rail Arena Viewer
//!
//! A background visualization pipeline for train-route board games. Game
//! logic runs on its own threads and hands the viewer immutable deep-copy
//! snapshots; a dedicated render thread polls them at a fixed rate and
//! draws the freshest one onto a software canvas.
//!
//! ## Architecture
//! - [`snapshot`] - deep-copy capture of a live game behind the
//!   [`GameView`] trait; the only thing that ever crosses the thread
//!   boundary.
//! - [`channel`] - dual queues (state updates plus control commands);
//!   every queued action is logged but only the newest snapshot is
//!   rendered.
//! - [`viewer`] - lifecycle controller and the render loop itself.
//! - [`tree`] - bounded sampling and PNG export of a search tree.
//! - [`geometry`], [`layout`], [`draw`], [`surface`] - route dash math,
//!   city tables, frame composition, and the pixel buffer under it all.
//!
//! ## Usage
//! ```no_run
//! use railvis::{GameViewer, ViewerConfig};
//!
//! # fn game() -> impl railvis::GameView { struct G; impl railvis::GameView for G {
//! #     fn players(&self) -> Vec<railvis::PlayerState> { Vec::new() }
//! #     fn current_player_idx(&self) -> usize { 0 }
//! #     fn city_names(&self) -> Vec<String> { Vec::new() }
//! #     fn connections(&self) -> Vec<(String, String)> { Vec::new() }
//! #     fn route_lookup(&self, _: &str, _: &str) -> Vec<railvis::RouteInfo> { Vec::new() }
//! # } G }
//! let mut viewer = GameViewer::new(ViewerConfig::default());
//! viewer.start()?;
//! viewer.push_snapshot(&game(), None);
//! viewer.stop();
//! # Ok::<(), railvis::ViewerError>(())
//! ```

pub mod action;
pub mod channel;
pub mod draw;
pub mod geometry;
pub mod layout;
pub mod snapshot;
pub mod surface;
pub mod tree;
pub mod viewer;

pub use action::{Action, CardDraw};
pub use snapshot::{GameView, PlayerState, RouteInfo, Snapshot, TrainColor};
pub use viewer::{GameViewer, ViewerConfig, ViewerError, ViewerStats};
