use std::cell::RefCell;
use std::rc::Rc;

use flappy_arcade::{
    EventLog, Game, GameEvent, GameState, ObstacleSpawner, ScoreStore, Session, Tuning,
    WorldBounds,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Store whose contents the test can still see after handing it to the game.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<(u32, u32)>>);

impl SharedStore {
    fn best(&self) -> u32 {
        self.0.borrow().0
    }

    fn saves(&self) -> u32 {
        self.0.borrow().1
    }
}

impl ScoreStore for SharedStore {
    fn load(&self) -> anyhow::Result<u32> {
        Ok(self.0.borrow().0)
    }

    fn save(&mut self, best: u32) -> anyhow::Result<()> {
        let mut inner = self.0.borrow_mut();
        inner.0 = best;
        inner.1 += 1;
        Ok(())
    }
}

/// Every gap is 180 tall and starts between 200 and 220, so holding the
/// avatar around y = 300 clears every obstacle.
fn aligned_tuning() -> Tuning {
    Tuning {
        gap_min: 180,
        gap_max: 180,
        min_face: 200,
        ..Tuning::default()
    }
}

struct Harness {
    game: Game<EventLog>,
    store: SharedStore,
    now: f64,
}

impl Harness {
    fn new(best: u32) -> Self {
        let tuning = aligned_tuning();
        let spawner = ObstacleSpawner::seeded(2024, &tuning);
        let session = Session::new(
            tuning,
            WorldBounds {
                width: 800.0,
                height: 600.0,
            },
            spawner,
            0,
        );
        let store = SharedStore::default();
        store.0.borrow_mut().0 = best;
        let game = Game::new(session, Box::new(store.clone()), EventLog::default());
        Self {
            game,
            store,
            now: 0.0,
        }
    }

    fn tick(&mut self) -> bool {
        self.now += FRAME_MS;
        match self.game.request_frame() {
            Some(ticket) => self.game.frame(ticket, self.now),
            None => {
                self.game.observe_time(self.now);
                false
            }
        }
    }

    /// Flap whenever the avatar sinks below the shared gap band.
    fn autopilot_tick(&mut self) -> bool {
        if self.game.state() == GameState::Running && self.game.session().avatar().y > 330.0 {
            self.game.request_flap();
        }
        self.tick()
    }

    fn play_until_score(&mut self, target: u32) {
        for _ in 0..20_000 {
            if self.game.session().score() >= target {
                return;
            }
            self.autopilot_tick();
            assert_eq!(self.game.state(), GameState::Running, "autopilot crashed");
        }
        panic!("never reached score {target}");
    }

    fn fall_to_game_over(&mut self) {
        for _ in 0..1_000 {
            if self.game.state() == GameState::GameOver {
                return;
            }
            self.tick();
        }
        panic!("avatar never hit the floor");
    }

    fn score_events(&mut self) -> Vec<u32> {
        self.game
            .listener_mut()
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::ScoreChanged(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

#[test]
fn score_rises_one_obstacle_at_a_time() {
    let mut h = Harness::new(0);
    h.game.request_flap();
    let mut last = 0;
    for _ in 0..1_500 {
        h.autopilot_tick();
        let score = h.game.session().score();
        assert!(score == last || score == last + 1);
        last = score;
    }
    assert_eq!(h.game.state(), GameState::Running);
    assert!(last >= 5, "only scored {last}");

    let events = h.score_events();
    let expected: Vec<u32> = (0..=last).collect();
    assert_eq!(events, expected);
}

#[test]
fn best_is_updated_only_by_a_better_game_over() {
    let mut h = Harness::new(2);
    assert_eq!(h.game.session().best(), 2);

    h.game.request_flap();
    h.play_until_score(3);
    h.fall_to_game_over();
    let final_score = h.game.session().score();
    assert!(final_score >= 3);
    assert_eq!(h.game.session().best(), final_score);
    assert_eq!(h.store.best(), final_score);
    assert_eq!(h.store.saves(), 1);

    // A worse run leaves best and the store alone.
    h.game.restart();
    h.fall_to_game_over();
    assert_eq!(h.game.session().score(), 0);
    assert_eq!(h.game.session().best(), final_score);
    assert_eq!(h.store.saves(), 1);
}

#[test]
fn game_over_is_reported_once_with_final_score() {
    let mut h = Harness::new(0);
    h.game.request_flap();
    h.play_until_score(2);
    h.fall_to_game_over();
    let final_score = h.game.session().score();

    for _ in 0..30 {
        assert!(!h.tick());
    }
    let overs: Vec<_> = h
        .game
        .listener_mut()
        .drain()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::GameOver(_)))
        .collect();
    assert_eq!(overs, vec![GameEvent::GameOver(final_score)]);
}

#[test]
fn pause_freezes_the_world() {
    let mut h = Harness::new(0);
    h.game.request_flap();
    for _ in 0..5 {
        assert!(h.tick());
    }

    // A frame requested just before the pause arrives late.
    let stray = h.game.request_frame().unwrap();
    h.game.pause();
    let avatar = h.game.session().avatar().clone();
    let obstacles = h.game.session().obstacles().to_vec();

    assert!(!h.game.frame(stray, h.now + FRAME_MS));
    for _ in 5..10 {
        assert!(!h.tick());
        h.game.request_flap();
    }
    assert_eq!(h.game.state(), GameState::Paused);
    assert_eq!(h.game.session().avatar(), &avatar);
    assert_eq!(h.game.session().obstacles(), obstacles.as_slice());

    h.game.resume();
    assert!(h.tick());
    assert_ne!(h.game.session().avatar().y, avatar.y);
}

#[test]
fn restart_resets_from_every_state() {
    let mut h = Harness::new(0);

    let check_fresh = |h: &mut Harness| {
        let tuning = aligned_tuning();
        let session = h.game.session();
        assert_eq!(h.game.state(), GameState::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.avatar().y, 300.0);
        assert_eq!(session.avatar().velocity, 0.0);
        assert!(!session.obstacles().is_empty());
        assert!(session.obstacles().iter().all(|o| !o.passed));
        assert!(
            session
                .obstacles()
                .iter()
                .all(|o| o.x >= tuning.avatar_x + tuning.lead_in)
        );
    };

    // Running
    h.game.request_flap();
    h.play_until_score(1);
    h.game.restart();
    check_fresh(&mut h);

    // Paused
    h.play_until_score(1);
    h.game.pause();
    h.game.restart();
    check_fresh(&mut h);

    // GameOver
    h.play_until_score(1);
    h.fall_to_game_over();
    h.game.restart();
    check_fresh(&mut h);
}

#[test]
fn idle_does_not_step_and_flap_starts() {
    let mut h = Harness::new(0);
    for _ in 0..10 {
        assert!(!h.tick());
    }
    assert_eq!(h.game.state(), GameState::Idle);
    assert_eq!(h.game.session().avatar().y, 300.0);
    assert!(h.game.session().obstacles().is_empty());

    h.game.request_flap();
    assert_eq!(h.game.state(), GameState::Running);
    // The starting flap begins the run; it does not also jump.
    assert_eq!(h.game.session().avatar().velocity, 0.0);
}

#[test]
fn resize_recomputes_spawn_cadence_but_keeps_the_run() {
    let mut h = Harness::new(0);
    h.game.request_flap();
    h.tick();
    let cadence = h.game.session().spawn_cadence_ms();

    h.game.on_resize(1600.0, 600.0);
    assert_eq!(h.game.state(), GameState::Running);
    assert_eq!(h.game.session().world().width, 1600.0);
    assert_eq!(h.game.session().spawn_cadence_ms(), cadence);

    // Tiny viewports are clamped to the smallest playable world.
    h.game.on_resize(100.0, 100.0);
    assert_eq!(
        h.game.session().world().height,
        aligned_tuning().min_world_height()
    );
}

#[test]
fn same_seed_replays_identically() {
    let run = || {
        let mut h = Harness::new(0);
        h.game.request_flap();
        for _ in 0..600 {
            h.autopilot_tick();
        }
        (
            h.game.session().score(),
            h.game.session().obstacles().to_vec(),
        )
    };
    assert_eq!(run(), run());
}
