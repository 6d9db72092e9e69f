//! # Viewer Demo
//!
//! Drives the viewer with a scripted playout: a synthetic two-player game
//! claims routes and draws cards at a fixed cadence while the render
//! thread keeps the board current. Optionally exports the final frame and
//! a sampled search tree as PNGs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing_subscriber::EnvFilter;

use railvis::snapshot::PlayerState;
use railvis::tree::{render_tree_png, SampleConfig, SearchNode};
use railvis::{layout, Action, CardDraw, GameView, GameViewer, RouteInfo, Snapshot, TrainColor, ViewerConfig};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of scripted turns to play.
    #[clap(short, long, default_value_t = 40)]
    turns: u32,

    /// Board to play on: "usa" or "europe".
    #[clap(short, long, default_value = "usa")]
    map: String,

    /// RNG seed for the scripted playout.
    #[clap(short, long, default_value_t = 42)]
    seed: u64,

    /// Milliseconds between pushed snapshots.
    #[clap(long, default_value_t = 100)]
    step_ms: u64,

    /// Write a sampled search tree PNG here after the playout.
    #[clap(long)]
    tree_png: Option<PathBuf>,

    /// Write the final board frame here after the playout.
    #[clap(long)]
    export_final: Option<PathBuf>,
}

const COLORS: [TrainColor; 8] = [
    TrainColor::Red,
    TrainColor::Blue,
    TrainColor::Green,
    TrainColor::Yellow,
    TrainColor::Black,
    TrainColor::White,
    TrainColor::Orange,
    TrainColor::Pink,
];

fn route_points(length: u32) -> i32 {
    match length {
        1 => 1,
        2 => 2,
        3 => 4,
        4 => 7,
        5 => 10,
        _ => 15,
    }
}

/// Scripted game used only by this demo.
struct DemoGame {
    players: Vec<PlayerState>,
    current: usize,
    cities: Vec<String>,
    connections: Vec<(String, String)>,
    routes: HashMap<String, Vec<RouteInfo>>,
}

impl DemoGame {
    fn new(kind: layout::MapKind, rng: &mut Xoshiro256PlusPlus) -> Self {
        let table = match kind {
            layout::MapKind::Usa => layout::USA_CITY_POSITIONS,
            layout::MapKind::Europe => layout::EUROPE_CITY_POSITIONS,
        };
        let cities: Vec<String> = table.iter().map(|(name, _)| (*name).to_owned()).collect();

        // Chain neighbouring table entries plus a few long jumps so the
        // board has both single and double routes.
        let mut connections = Vec::new();
        let mut routes = HashMap::new();
        for pair in cities.windows(2) {
            connections.push((pair[0].clone(), pair[1].clone()));
        }
        for i in (0..cities.len().saturating_sub(5)).step_by(5) {
            connections.push((cities[i].clone(), cities[i + 5].clone()));
        }
        for (a, b) in &connections {
            let variants = if rng.gen_bool(0.2) { 2 } else { 1 };
            let entry: Vec<RouteInfo> = (0..variants)
                .map(|_| RouteInfo {
                    color: *COLORS.choose(rng).unwrap_or(&TrainColor::Gray),
                    length: rng.gen_range(1..=6),
                    claimed_by: None,
                })
                .collect();
            routes.insert(Snapshot::route_key(a, b), entry);
        }

        let players = ["Alice", "Bob"]
            .into_iter()
            .map(|name| PlayerState {
                name: name.to_owned(),
                remaining_trains: 45,
                ..PlayerState::default()
            })
            .collect();

        Self {
            players,
            current: 0,
            cities,
            connections,
            routes,
        }
    }

    /// Plays one scripted action for the current player and returns it.
    fn step(&mut self, rng: &mut Xoshiro256PlusPlus) -> Action {
        let name = self.players[self.current].name.clone();
        let action = match rng.gen_range(0..10) {
            0..=5 => self.try_claim(&name, rng),
            6..=8 => {
                let first = self.random_draw(rng);
                let second = Some(self.random_draw(rng));
                for draw in [Some(first), second].into_iter().flatten() {
                    let color = match draw {
                        CardDraw::Deck => *COLORS.choose(rng).unwrap_or(&TrainColor::Wild),
                        CardDraw::FaceUp(c) => c,
                    };
                    *self.players[self.current].train_cards.entry(color).or_insert(0) += 1;
                }
                Action::DrawTrainCards {
                    player: name,
                    first,
                    second,
                }
            }
            _ => {
                let kept = [rng.gen_range(0..=1), rng.gen_range(0..=1), rng.gen_range(0..=1)];
                self.players[self.current]
                    .destinations
                    .push(format!("Dest {}", rng.gen_range(1..100)));
                Action::DrawDestinations { player: name, kept }
            }
        };
        self.players[self.current].turn += 1;
        self.current = (self.current + 1) % self.players.len();
        action
    }

    fn random_draw(&self, rng: &mut Xoshiro256PlusPlus) -> CardDraw {
        if rng.gen_bool(0.3) {
            CardDraw::Deck
        } else {
            CardDraw::FaceUp(*COLORS.choose(rng).unwrap_or(&TrainColor::Red))
        }
    }

    fn try_claim(&mut self, name: &str, rng: &mut Xoshiro256PlusPlus) -> Action {
        let mut open: Vec<(String, String)> = self
            .connections
            .iter()
            .filter(|(a, b)| {
                self.routes
                    .get(&Snapshot::route_key(a, b))
                    .is_some_and(|v| v.iter().any(|r| r.claimed_by.is_none()))
            })
            .cloned()
            .collect();
        open.shuffle(rng);
        let Some((a, b)) = open.into_iter().next() else {
            return Action::Other {
                player: name.to_owned(),
                description: format!("{name} passed"),
            };
        };
        let key = Snapshot::route_key(&a, &b);
        let mut claimed_color = TrainColor::Gray;
        let mut claimed_len = 0;
        if let Some(variants) = self.routes.get_mut(&key) {
            if let Some(route) = variants.iter_mut().find(|r| r.claimed_by.is_none()) {
                route.claimed_by = Some(name.to_owned());
                claimed_color = route.color;
                claimed_len = route.length;
            }
        }
        let player = &mut self.players[self.current];
        player.points += route_points(claimed_len);
        player.remaining_trains = player.remaining_trains.saturating_sub(claimed_len);
        player
            .claimed_connections
            .push((a.clone(), b.clone(), claimed_color));
        Action::ClaimRoute {
            player: name.to_owned(),
            from: a,
            to: b,
            color: claimed_color,
        }
    }
}

impl GameView for DemoGame {
    fn players(&self) -> Vec<PlayerState> {
        self.players.clone()
    }

    fn current_player_idx(&self) -> usize {
        self.current
    }

    fn city_names(&self) -> Vec<String> {
        self.cities.clone()
    }

    fn connections(&self) -> Vec<(String, String)> {
        self.connections.clone()
    }

    fn route_lookup(&self, city_a: &str, city_b: &str) -> Vec<RouteInfo> {
        self.routes
            .get(&Snapshot::route_key(city_a, city_b))
            .cloned()
            .unwrap_or_default()
    }

    fn agent_label(&self, player: &str) -> Option<String> {
        match player {
            "Alice" => Some("MCTS".to_owned()),
            "Bob" => Some("Greedy".to_owned()),
            _ => None,
        }
    }
}

/// Synthetic search tree for the tree-export demo.
struct DemoNode {
    visits: u64,
    value: f64,
    action: Option<Action>,
    children: Vec<DemoNode>,
}

impl SearchNode for DemoNode {
    fn visits(&self) -> u64 {
        self.visits
    }
    fn value(&self) -> f64 {
        self.value
    }
    fn children(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }
    fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }
}

fn demo_tree(game: &DemoGame, rng: &mut Xoshiro256PlusPlus) -> DemoNode {
    fn build(
        game: &DemoGame,
        rng: &mut Xoshiro256PlusPlus,
        depth: usize,
        budget: u64,
    ) -> Vec<DemoNode> {
        if depth == 0 || budget == 0 {
            return Vec::new();
        }
        (0..rng.gen_range(2..=5))
            .map(|_| {
                let visits = rng.gen_range(0..=budget);
                let action = game.connections.choose(rng).map(|(a, b)| Action::ClaimRoute {
                    player: "Alice".to_owned(),
                    from: a.clone(),
                    to: b.clone(),
                    color: TrainColor::Red,
                });
                DemoNode {
                    visits,
                    value: visits as f64 * rng.gen_range(0.0..1.0),
                    action,
                    children: build(game, rng, depth - 1, visits / 2),
                }
            })
            .collect()
    }
    let children = build(game, rng, 4, 200);
    let visits = children.iter().map(|c| c.visits).sum::<u64>().max(1);
    DemoNode {
        visits,
        value: visits as f64 * 0.55,
        action: None,
        children,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let kind = match args.map.to_ascii_lowercase().as_str() {
        "europe" => layout::MapKind::Europe,
        _ => layout::MapKind::Usa,
    };
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(args.seed);
    let mut game = DemoGame::new(kind, &mut rng);

    let mut viewer = GameViewer::new(ViewerConfig::default());
    viewer.start()?;
    viewer.push_snapshot(&game, None);

    for _ in 0..args.turns {
        let action = game.step(&mut rng);
        viewer.push_snapshot(&game, Some(&action));
        thread::sleep(Duration::from_millis(args.step_ms));
    }

    if let Some(path) = &args.export_final {
        let snap = Snapshot::capture(&game, None);
        railvis::draw::export_frame(&snap, path)?;
        println!("{} {}", "board exported:".green(), path.display());
    }
    if let Some(path) = &args.tree_png {
        let root = demo_tree(&game, &mut rng);
        let out = render_tree_png(&root, SampleConfig::default(), Some(path))?;
        println!("{} {}", "tree exported:".green(), out.display());
    }

    let clean = viewer.stop();
    let stats = viewer.stats();
    println!(
        "{} frames={} applied={} discarded={} clean_stop={}",
        "done.".bold(),
        stats.frames.load(std::sync::atomic::Ordering::Relaxed),
        stats.snapshots_applied.load(std::sync::atomic::Ordering::Relaxed),
        stats.snapshots_discarded.load(std::sync::atomic::Ordering::Relaxed),
        clean
    );
    for player in game.players {
        println!(
            "  {}: {} points, {} trains left",
            player.name.cyan(),
            player.points,
            player.remaining_trains
        );
    }
    Ok(())
}
