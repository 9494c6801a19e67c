use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Tuning;
use crate::entities::Obstacle;
use crate::world::WorldBounds;

/// Produces obstacles with a random gap and decides when the next one is due.
pub struct ObstacleSpawner {
    rng: StdRng,
    cadence_ms: f64,
    last_spawn_ms: f64,
}

impl ObstacleSpawner {
    pub fn new(rng: StdRng, tuning: &Tuning) -> Self {
        Self {
            rng,
            cadence_ms: tuning.spawn_cadence_ms(),
            last_spawn_ms: 0.0,
        }
    }

    pub fn seeded(seed: u64, tuning: &Tuning) -> Self {
        Self::new(StdRng::seed_from_u64(seed), tuning)
    }

    pub fn from_entropy(tuning: &Tuning) -> Self {
        Self::new(StdRng::from_entropy(), tuning)
    }

    pub fn cadence_ms(&self) -> f64 {
        self.cadence_ms
    }

    pub fn last_spawn_ms(&self) -> f64 {
        self.last_spawn_ms
    }

    /// Recompute the spawn interval; called on start, resize and speed tuning.
    pub fn recompute_cadence(&mut self, tuning: &Tuning) {
        self.cadence_ms = tuning.spawn_cadence_ms();
    }

    /// Restart the interval from `now_ms`.
    pub fn rearm(&mut self, now_ms: f64) {
        self.last_spawn_ms = now_ms;
    }

    /// Move the last spawn forward so time spent paused does not count.
    pub fn shift(&mut self, by_ms: f64) {
        self.last_spawn_ms += by_ms;
    }

    /// True at most once per call when a full interval has elapsed. A late
    /// frame yields one spawn, not a burst of catch-up spawns.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_spawn_ms > self.cadence_ms {
            self.last_spawn_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn spawn(&mut self, world: &WorldBounds, tuning: &Tuning, x: Option<f64>) -> Obstacle {
        let gap = self.rng.gen_range(tuning.gap_range());
        let min_top = tuning.min_face;
        // The world is clamped to fit both faces, but stay non-negative even
        // if a caller hands in raw bounds.
        let max_top = (world.height as i64 - gap as i64 - tuning.min_face as i64)
            .max(min_top as i64) as u32;
        let top = self.rng.gen_range(min_top..=max_top);
        let x = x.unwrap_or(world.width + tuning.spacing);
        Obstacle::new(x, top as f64, gap as f64)
    }

    /// Fill the field at session start: one obstacle where the next timed
    /// spawn would land, then every `spacing` to the left down to the lead-in
    /// distance in front of the avatar. Returned left to right.
    pub fn prepopulate(&mut self, world: &WorldBounds, tuning: &Tuning) -> Vec<Obstacle> {
        let first = world.width + tuning.spacing;
        let min_x = tuning.avatar_x + tuning.lead_in;
        let mut xs = Vec::new();
        let mut x = first;
        while x >= min_x {
            xs.push(x);
            x -= tuning.spacing;
        }
        xs.reverse();
        xs.into_iter()
            .map(|x| self.spawn(world, tuning, Some(x)))
            .collect()
    }
}
