use crate::config::Tuning;
use crate::entities::{Avatar, Obstacle};
use crate::physics::{self, StepOutcome};
use crate::spawner::ObstacleSpawner;
use crate::world::WorldBounds;

/// All mutable state of one player's run, plus the best score that outlives
/// it.
pub struct Session {
    pub(crate) tuning: Tuning,
    pub(crate) world: WorldBounds,
    pub(crate) avatar: Avatar,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) spawner: ObstacleSpawner,
    pub(crate) score: u32,
    pub(crate) best: u32,
}

impl Session {
    /// `tuning` is passed through [`Tuning::validated`] first, so overrides
    /// that would stall or crash the spawner are repaired here.
    pub fn new(tuning: Tuning, world: WorldBounds, spawner: ObstacleSpawner, best: u32) -> Self {
        let tuning = tuning.validated();
        let world = WorldBounds::clamped(world.width, world.height, &tuning);
        let avatar = Avatar::new(&tuning, world.center_y());
        Self {
            tuning,
            world,
            avatar,
            obstacles: Vec::new(),
            spawner,
            score: 0,
            best,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> &WorldBounds {
        &self.world
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn spawn_cadence_ms(&self) -> f64 {
        self.spawner.cadence_ms()
    }

    /// Fresh run: zero score, empty field refilled from the spawner, avatar
    /// centered and at rest.
    pub(crate) fn reset(&mut self, now_ms: f64) {
        self.score = 0;
        self.avatar = Avatar::new(&self.tuning, self.world.center_y());
        self.spawner.recompute_cadence(&self.tuning);
        self.obstacles = self.spawner.prepopulate(&self.world, &self.tuning);
        self.spawner.rearm(now_ms);
    }

    pub(crate) fn resize(&mut self, width: f64, height: f64) {
        self.world = WorldBounds::clamped(width, height, &self.tuning);
        self.spawner.recompute_cadence(&self.tuning);
    }

    /// Spawn if the cadence says so; at most one obstacle per call.
    pub(crate) fn spawn_due(&mut self, now_ms: f64) -> bool {
        if self.spawner.poll(now_ms) {
            let obstacle = self.spawner.spawn(&self.world, &self.tuning, None);
            self.obstacles.push(obstacle);
            true
        } else {
            false
        }
    }

    /// One physics step. `_elapsed_ms` is accepted for symmetry with the
    /// driver but ignored: integration is per step.
    pub(crate) fn step(&mut self, _elapsed_ms: f64) -> StepOutcome {
        let outcome = physics::step(
            &mut self.avatar,
            &mut self.obstacles,
            &self.world,
            &self.tuning,
        );
        self.score += outcome.passed;
        outcome
    }

    pub(crate) fn flap(&mut self) {
        self.avatar.velocity = self.tuning.flap_velocity;
    }

    /// Raise the best score if this run beat it. Returns true when it did.
    pub(crate) fn settle_best(&mut self) -> bool {
        if self.score > self.best {
            self.best = self.score;
            true
        } else {
            false
        }
    }

    pub(crate) fn tuning_mut(&mut self) -> &mut Tuning {
        &mut self.tuning
    }

    /// Re-validate after a live edit and refit everything derived from it.
    pub(crate) fn retune(&mut self) {
        self.tuning = std::mem::take(&mut self.tuning).validated();
        self.world = WorldBounds::clamped(self.world.width, self.world.height, &self.tuning);
        self.spawner.recompute_cadence(&self.tuning);
    }

    pub(crate) fn spawner_mut(&mut self) -> &mut ObstacleSpawner {
        &mut self.spawner
    }
}
