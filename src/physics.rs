use crate::config::Tuning;
use crate::entities::{Avatar, Obstacle};
use crate::world::WorldBounds;

/// What ended the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Ceiling,
    Floor,
    /// Index into the live obstacle list at the time of the hit.
    Obstacle(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Obstacles that went from unpassed to passed this step.
    pub passed: u32,
    pub collision: Option<Collision>,
}

impl StepOutcome {
    pub fn is_game_over(&self) -> bool {
        self.collision.is_some()
    }
}

/// Advance the world by one fixed step.
///
/// Gravity and obstacle speed are per-step increments, so elapsed time plays
/// no part here. A collision stops the scan: obstacles after the colliding one
/// are neither checked nor scored, while those scanned before it keep their
/// score.
pub fn step(
    avatar: &mut Avatar,
    obstacles: &mut Vec<Obstacle>,
    world: &WorldBounds,
    tuning: &Tuning,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    avatar.velocity += tuning.gravity;
    avatar.y += avatar.velocity;

    let hb = avatar.hitbox();
    if hb.top <= 0.0 {
        outcome.collision = Some(Collision::Ceiling);
        return outcome;
    }
    if hb.bottom >= world.height {
        outcome.collision = Some(Collision::Floor);
        return outcome;
    }

    for o in obstacles.iter_mut() {
        o.x -= tuning.obstacle_speed;
    }
    obstacles.retain(|o| o.x > -tuning.discard_margin);

    for (i, o) in obstacles.iter_mut().enumerate() {
        let in_x = hb.right > o.x && hb.left < o.x + tuning.obstacle_width;
        let hit_top = hb.top < o.top_height;
        let hit_bottom = hb.bottom > o.gap_bottom();

        if in_x && (hit_top || hit_bottom) {
            outcome.collision = Some(Collision::Obstacle(i));
            return outcome;
        }
        if !o.passed && o.x + tuning.obstacle_width < avatar.x {
            o.passed = true;
            outcome.passed += 1;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldBounds {
        WorldBounds {
            width: 800.0,
            height: 600.0,
        }
    }

    fn tuning() -> Tuning {
        Tuning {
            gravity: 0.3,
            flap_velocity: -7.0,
            ..Tuning::default()
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn gravity_integrates_per_step() {
        let tuning = tuning();
        let mut avatar = Avatar::new(&tuning, 300.0);
        let mut obstacles = Vec::new();

        let outcome = step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert!(!outcome.is_game_over());
        assert!(approx(avatar.velocity, 0.3));
        assert!(approx(avatar.y, 300.3));
    }

    #[test]
    fn flap_then_step() {
        let tuning = tuning();
        let mut avatar = Avatar::new(&tuning, 300.0);
        avatar.velocity = tuning.flap_velocity;

        step(&mut avatar, &mut Vec::new(), &world(), &tuning);
        assert!(approx(avatar.velocity, -6.7));
        assert!(approx(avatar.y, 293.3));
    }

    #[test]
    fn ceiling_and_floor_end_the_run() {
        let tuning = tuning();
        let mut high = Avatar::new(&tuning, 10.0);
        high.velocity = -5.0;
        let outcome = step(&mut high, &mut Vec::new(), &world(), &tuning);
        assert_eq!(outcome.collision, Some(Collision::Ceiling));

        let mut low = Avatar::new(&tuning, 591.0);
        let outcome = step(&mut low, &mut Vec::new(), &world(), &tuning);
        assert_eq!(outcome.collision, Some(Collision::Floor));
    }

    #[test]
    fn boundary_hit_leaves_obstacles_untouched() {
        let tuning = tuning();
        let mut avatar = Avatar::new(&tuning, 591.0);
        let mut obstacles = vec![Obstacle::new(500.0, 200.0, 150.0)];
        step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert_eq!(obstacles[0].x, 500.0);
    }

    #[test]
    fn obstacles_move_left_and_are_discarded_past_margin() {
        let tuning = tuning();
        let mut avatar = Avatar::new(&tuning, 300.0);
        let mut obstacles = vec![
            Obstacle::new(-79.0, 200.0, 150.0),
            Obstacle::new(600.0, 200.0, 150.0),
        ];
        step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert_eq!(obstacles.len(), 1);
        assert!(approx(obstacles[0].x, 600.0 - 2.38));
    }

    #[test]
    fn avatar_inside_gap_survives_overlap() {
        let tuning = tuning();
        // Hitbox spans roughly 280..300 after the step; gap is 200..350.
        let mut avatar = Avatar::new(&tuning, 290.0);
        let mut obstacles = vec![Obstacle::new(60.0, 200.0, 150.0)];
        let outcome = step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert_eq!(outcome.collision, None);
    }

    #[test]
    fn hitbox_above_gap_collides() {
        let tuning = tuning();
        let mut avatar = Avatar::new(&tuning, 200.0);
        let mut obstacles = vec![Obstacle::new(60.0, 200.0, 150.0)];
        let outcome = step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert_eq!(outcome.collision, Some(Collision::Obstacle(0)));
    }

    #[test]
    fn hitbox_below_gap_collides() {
        let tuning = tuning();
        let mut avatar = Avatar::new(&tuning, 350.0);
        let mut obstacles = vec![Obstacle::new(60.0, 200.0, 150.0)];
        let outcome = step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert_eq!(outcome.collision, Some(Collision::Obstacle(0)));
    }

    #[test]
    fn passing_scores_exactly_once() {
        let tuning = tuning();
        let mut avatar = Avatar::new(&tuning, 300.0);
        // Right edge lands at 9.62 + 70 = 79.62 < 80 after one move.
        let mut obstacles = vec![Obstacle::new(12.0, 200.0, 150.0)];

        let first = step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert_eq!(first.passed, 1);
        assert!(obstacles[0].passed);

        avatar.reset(300.0);
        let second = step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert_eq!(second.passed, 0);
    }

    #[test]
    fn obstacle_still_overlapping_is_not_passed() {
        let tuning = tuning();
        let mut avatar = Avatar::new(&tuning, 300.0);
        let mut obstacles = vec![Obstacle::new(40.0, 200.0, 150.0)];
        let outcome = step(&mut avatar, &mut obstacles, &world(), &tuning);
        assert_eq!(outcome, StepOutcome::default());
        assert!(!obstacles[0].passed);
    }
}
