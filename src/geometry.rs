//! # Route Geometry
//!
//! Pure, stateless geometry for route rendering: dashed-segment
//! generation along a connection, and perpendicular offsets for parallel
//! routes between the same pair of cities.

/// Base dash length in pixels before rescaling.
pub const DASH_LEN: f32 = 6.0;
/// Base gap length in pixels before rescaling.
pub const GAP_LEN: f32 = 4.0;
/// Offset magnitude for parallel route variants.
pub const ROUTE_OFFSET: f32 = 5.0;

/// 2D point/vector in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

/// One dash of a dashed line, as a start/end pair.
pub type Segment = (Vec2, Vec2);

/// Generates up to `count` dash segments from `p1` to `p2`, one per route
/// car. Dash and gap lengths are uniformly rescaled so the final dash
/// ends exactly at `p2`. A degenerate distance still produces one dash.
pub fn dash_segments(p1: Vec2, p2: Vec2, count: u32) -> Vec<Segment> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let distance = (dx * dx + dy * dy).sqrt().max(1.0);
    let ux = dx / distance;
    let uy = dy / distance;

    let unit = DASH_LEN + GAP_LEN;
    let max_fit = (distance / unit) as u32;
    let n = count.min(max_fit).max(1);

    // Rescale so n dashes and n-1 gaps span the distance exactly.
    let total = n as f32 * DASH_LEN + (n - 1) as f32 * GAP_LEN;
    let scale = distance / total;
    let dash = DASH_LEN * scale;
    let gap = GAP_LEN * scale;

    let mut segments = Vec::with_capacity(n as usize);
    let mut x = p1.x;
    let mut y = p1.y;
    for _ in 0..n - 1 {
        let start = Vec2::new(x, y);
        x += ux * dash;
        y += uy * dash;
        segments.push((start, Vec2::new(x, y)));
        x += ux * gap;
        y += uy * gap;
    }
    // Last dash is pinned to p2 so rounding never over- or undershoots.
    segments.push((Vec2::new(x, y), p2));
    segments
}

/// Unit vector perpendicular to the line `p1 -> p2`.
pub fn perpendicular(p1: Vec2, p2: Vec2) -> Vec2 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let len = (dx * dx + dy * dy).sqrt().max(1.0);
    Vec2::new(-dy / len, dx / len)
}

/// Offset vector for variant `idx` of `total` parallel routes on the same
/// connection. A lone variant gets zero offset; otherwise the first
/// variant shifts one way and the rest the other.
pub fn parallel_offset(p1: Vec2, p2: Vec2, idx: usize, total: usize) -> Vec2 {
    if total <= 1 {
        return Vec2::default();
    }
    let n = perpendicular(p1, p2);
    let magnitude = if idx == 0 { ROUTE_OFFSET } else { -ROUTE_OFFSET };
    Vec2::new(n.x * magnitude, n.y * magnitude)
}
