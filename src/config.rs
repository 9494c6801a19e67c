use std::ops::RangeInclusive;

/// Per-step physics constants. Every velocity and acceleration here is a
/// per-step increment tuned for ~60 steps per second; drive the simulation at
/// `nominal_frame_rate` or the game plays faster/slower than intended.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub gravity: f64,
    /// Negative is upward.
    pub flap_velocity: f64,
    pub obstacle_speed: f64,
    pub obstacle_width: f64,
    pub gap_min: u32,
    pub gap_max: u32,
    /// Smallest visible height of either obstacle face.
    pub min_face: u32,
    /// Horizontal distance between consecutive obstacles.
    pub spacing: f64,
    pub discard_margin: f64,
    pub avatar_x: f64,
    pub avatar_width: f64,
    pub avatar_height: f64,
    pub hitbox_padding: f64,
    pub nominal_frame_rate: f64,
    /// How far right of the avatar the first pre-populated obstacle must sit.
    pub lead_in: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.315,
            flap_velocity: -7.2,
            obstacle_speed: 2.38,
            obstacle_width: 70.0,
            gap_min: 130,
            gap_max: 180,
            min_face: 140,
            spacing: 186.0,
            discard_margin: 80.0,
            avatar_x: 80.0,
            avatar_width: 46.0,
            avatar_height: 32.0,
            hitbox_padding: 6.0,
            nominal_frame_rate: 60.0,
            lead_in: 240.0,
        }
    }
}

impl Tuning {
    pub fn gap_range(&self) -> RangeInclusive<u32> {
        self.gap_min..=self.gap_max
    }

    /// Clamp overrides that would break the simulation: a non-falling avatar,
    /// a downward flap, frozen obstacles or an inverted gap range.
    pub fn validated(mut self) -> Self {
        let defaults = Tuning::default();
        if !(self.gravity > 0.0) {
            self.gravity = defaults.gravity;
        }
        if !(self.flap_velocity < 0.0) {
            self.flap_velocity = defaults.flap_velocity;
        }
        if !(self.obstacle_speed > 0.0) {
            self.obstacle_speed = defaults.obstacle_speed;
        }
        if !(self.nominal_frame_rate > 0.0) {
            self.nominal_frame_rate = defaults.nominal_frame_rate;
        }
        if !(self.spacing > 0.0) {
            self.spacing = defaults.spacing;
        }
        if self.gap_min > self.gap_max {
            std::mem::swap(&mut self.gap_min, &mut self.gap_max);
        }
        self.discard_margin = self.discard_margin.max(self.obstacle_width);
        self.hitbox_padding = self
            .hitbox_padding
            .clamp(0.0, self.avatar_width.min(self.avatar_height) / 2.0);
        self
    }

    /// Smallest world height in which both faces and the widest gap fit.
    pub fn min_world_height(&self) -> f64 {
        (2 * self.min_face + self.gap_max + 1) as f64
    }

    pub fn min_world_width(&self) -> f64 {
        self.avatar_x + self.avatar_width + self.obstacle_width
    }

    /// Milliseconds between spawns so obstacles stay `spacing` apart at
    /// `obstacle_speed` regardless of the viewport width.
    pub fn spawn_cadence_ms(&self) -> f64 {
        self.spacing / (self.obstacle_speed * self.nominal_frame_rate) * 1000.0
    }

    // Live adjustments from the tuning HUD.

    pub fn tune_gravity(&mut self, delta: f64) {
        self.gravity = (self.gravity + delta).max(0.05);
    }

    pub fn tune_flap(&mut self, delta: f64) {
        self.flap_velocity = (self.flap_velocity - delta).min(-0.5);
    }

    pub fn tune_speed(&mut self, delta: f64) {
        self.obstacle_speed = (self.obstacle_speed + delta).max(0.2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cadence_is_about_1300ms() {
        let cadence = Tuning::default().spawn_cadence_ms();
        assert!((cadence - 1302.5).abs() < 0.1, "cadence was {cadence}");
    }

    #[test]
    fn validated_repairs_bad_overrides() {
        let tuning = Tuning {
            gravity: -1.0,
            flap_velocity: 3.0,
            obstacle_speed: 0.0,
            gap_min: 200,
            gap_max: 120,
            spacing: -5.0,
            ..Tuning::default()
        }
        .validated();

        assert_eq!(tuning.spacing, 186.0);
        assert_eq!(tuning.gravity, 0.315);
        assert_eq!(tuning.flap_velocity, -7.2);
        assert_eq!(tuning.obstacle_speed, 2.38);
        assert_eq!(tuning.gap_range(), 120..=200);
    }

    #[test]
    fn min_world_height_fits_both_faces_and_widest_gap() {
        assert_eq!(Tuning::default().min_world_height(), 461.0);
    }

    #[test]
    fn tuning_keys_stay_in_playable_range() {
        let mut tuning = Tuning::default();
        for _ in 0..100 {
            tuning.tune_gravity(-0.02);
            tuning.tune_flap(-0.2);
            tuning.tune_speed(-0.1);
        }
        assert_eq!(tuning.gravity, 0.05);
        assert_eq!(tuning.flap_velocity, -0.5);
        assert_eq!(tuning.obstacle_speed, 0.2);
    }
}
