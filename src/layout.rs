//! # Map Layout
//!
//! Fixed city coordinate tables for the USA and Europe boards, and the
//! heuristic that decides which table a game is using.

use std::collections::HashMap;

use crate::geometry::Vec2;

/// Which board layout a game is played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Usa,
    Europe,
}

/// City coordinates for the USA map.
pub const USA_CITY_POSITIONS: &[(&str, (f32, f32))] = &[
    ("Seattle", (90.0, 100.0)),
    ("Portland", (120.0, 150.0)),
    ("San Francisco", (100.0, 300.0)),
    ("Los Angeles", (130.0, 410.0)),
    ("Salt Lake City", (250.0, 250.0)),
    ("Las Vegas", (190.0, 330.0)),
    ("Phoenix", (230.0, 370.0)),
    ("Denver", (300.0, 280.0)),
    ("Santa Fe", (300.0, 350.0)),
    ("Oklahoma City", (400.0, 350.0)),
    ("Dallas", (420.0, 400.0)),
    ("Houston", (440.0, 440.0)),
    ("El Paso", (310.0, 420.0)),
    ("Winnipeg", (400.0, 100.0)),
    ("Duluth", (450.0, 200.0)),
    ("Omaha", (400.0, 250.0)),
    ("Kansas City", (400.0, 300.0)),
    ("Chicago", (500.0, 250.0)),
    ("Saint Louis", (470.0, 310.0)),
    ("Nashville", (520.0, 360.0)),
    ("New Orleans", (500.0, 450.0)),
    ("Little Rock", (450.0, 370.0)),
    ("Toronto", (600.0, 200.0)),
    ("Pittsburgh", (580.0, 260.0)),
    ("Washington", (620.0, 300.0)),
    ("Raleigh", (600.0, 340.0)),
    ("Atlanta", (550.0, 380.0)),
    ("Charleston", (600.0, 380.0)),
    ("Miami", (620.0, 480.0)),
    ("New York", (640.0, 240.0)),
    ("Boston", (680.0, 210.0)),
    ("Montreal", (650.0, 140.0)),
    ("Sault St. Marie", (520.0, 160.0)),
    ("Calgary", (200.0, 100.0)),
    ("Helena", (250.0, 180.0)),
    ("Vancouver", (100.0, 80.0)),
];

/// City coordinates for the Europe map.
pub const EUROPE_CITY_POSITIONS: &[(&str, (f32, f32))] = &[
    ("Edinburgh", (180.0, 150.0)),
    ("London", (200.0, 220.0)),
    ("Amsterdam", (280.0, 220.0)),
    ("Bruxelles", (270.0, 250.0)),
    ("Paris", (250.0, 300.0)),
    ("Dieppe", (220.0, 270.0)),
    ("Brest", (150.0, 300.0)),
    ("Pamplona", (200.0, 400.0)),
    ("Madrid", (150.0, 450.0)),
    ("Lisboa", (80.0, 470.0)),
    ("Cadiz", (130.0, 520.0)),
    ("Barcelona", (250.0, 430.0)),
    ("Marseille", (300.0, 380.0)),
    ("Zurich", (320.0, 320.0)),
    ("Frankfurt", (330.0, 270.0)),
    ("Munchen", (370.0, 300.0)),
    ("Venezia", (370.0, 350.0)),
    ("Roma", (370.0, 410.0)),
    ("Brindisi", (420.0, 440.0)),
    ("Palermo", (380.0, 480.0)),
    ("Kobenhavn", (350.0, 180.0)),
    ("Essen", (330.0, 230.0)),
    ("Berlin", (380.0, 230.0)),
    ("Danzic", (430.0, 200.0)),
    ("Stockholm", (400.0, 130.0)),
    ("Riga", (470.0, 170.0)),
    ("Petrograd", (530.0, 150.0)),
    ("Warszawa", (450.0, 250.0)),
    ("Wien", (410.0, 300.0)),
    ("Budapest", (450.0, 330.0)),
    ("Kyiv", (530.0, 310.0)),
    ("Wilno", (500.0, 230.0)),
    ("Smolensk", (550.0, 230.0)),
    ("Moskva", (600.0, 200.0)),
    ("Kharkov", (580.0, 320.0)),
    ("Rostov", (630.0, 350.0)),
    ("Bucuresti", (500.0, 370.0)),
    ("Sofia", (480.0, 400.0)),
    ("Constantinople", (520.0, 430.0)),
    ("Angora", (580.0, 450.0)),
    ("Sevastopol", (570.0, 390.0)),
    ("Erzurum", (650.0, 430.0)),
    ("Athina", (470.0, 460.0)),
    ("Smyrna", (520.0, 470.0)),
    ("Sarajevo", (460.0, 380.0)),
    ("Zagrab", (420.0, 350.0)),
    ("Sochi", (630.0, 370.0)),
];

const EUROPE_MARKERS: [&str; 4] = ["London", "Paris", "Berlin", "Roma"];
const USA_MARKERS: [&str; 4] = ["Seattle", "New York", "Chicago", "Los Angeles"];

/// Decides which map a game is using by counting marker cities present in
/// its city set. Ties and unknown sets default to USA.
pub fn detect_map<S: AsRef<str>>(cities: &[S]) -> MapKind {
    let contains = |name: &str| cities.iter().any(|c| c.as_ref() == name);
    let europe_count = EUROPE_MARKERS.iter().filter(|m| contains(m)).count();
    let usa_count = USA_MARKERS.iter().filter(|m| contains(m)).count();
    if europe_count > usa_count {
        MapKind::Europe
    } else {
        MapKind::Usa
    }
}

/// City-to-position table for the given map.
pub fn city_positions(kind: MapKind) -> HashMap<String, Vec2> {
    let table = match kind {
        MapKind::Usa => USA_CITY_POSITIONS,
        MapKind::Europe => EUROPE_CITY_POSITIONS,
    };
    table
        .iter()
        .map(|(name, (x, y))| (name.to_string(), Vec2::new(*x, *y)))
        .collect()
}
