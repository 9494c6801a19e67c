use crate::config::Tuning;
use crate::world::WorldBounds;

/// Axis-aligned box in world units, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// The player. `x` never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub width: f64,
    pub height: f64,
    pub hitbox_padding: f64,
}

impl Avatar {
    pub fn new(tuning: &Tuning, y: f64) -> Self {
        Self {
            x: tuning.avatar_x,
            y,
            velocity: 0.0,
            width: tuning.avatar_width,
            height: tuning.avatar_height,
            hitbox_padding: tuning.hitbox_padding,
        }
    }

    /// Bounding box shrunk by the padding on every edge, so grazing contact
    /// does not count.
    pub fn hitbox(&self) -> Hitbox {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let pad = self.hitbox_padding;
        Hitbox {
            left: self.x - half_w + pad,
            right: self.x + half_w - pad,
            top: self.y - half_h + pad,
            bottom: self.y + half_h - pad,
        }
    }

    pub fn reset(&mut self, y: f64) {
        self.y = y;
        self.velocity = 0.0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    /// Height of the top face; the gap starts here.
    pub top_height: f64,
    pub gap: f64,
    /// Set once when the obstacle fully crosses the avatar.
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f64, top_height: f64, gap: f64) -> Self {
        Self {
            x,
            top_height,
            gap,
            passed: false,
        }
    }

    pub fn gap_bottom(&self) -> f64 {
        self.top_height + self.gap
    }

    pub fn bottom_face_height(&self, world: &WorldBounds) -> f64 {
        world.height - self.gap_bottom()
    }
}
