use crate::config::Tuning;

/// Playfield size in world units. Obstacle and avatar coordinates are all
/// relative to it; the front end recomputes it on viewport resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl WorldBounds {
    /// Bounds no smaller than the minimum viable world for `tuning`, so the
    /// spawner never sees an empty or negative top-height range.
    pub fn clamped(width: f64, height: f64, tuning: &Tuning) -> Self {
        let width = if width.is_finite() { width } else { 0.0 };
        let height = if height.is_finite() { height } else { 0.0 };
        Self {
            width: width.max(tuning.min_world_width()),
            height: height.max(tuning.min_world_height()),
        }
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}
