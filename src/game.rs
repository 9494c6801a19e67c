use tracing::{debug, info, warn};

use crate::config::Tuning;
use crate::driver::{Driver, FrameTicket};
use crate::events::{GameListener, NullListener};
use crate::physics::StepOutcome;
use crate::session::Session;
use crate::store::{MemoryStore, ScoreStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// The state machine. Owns the session, the frame driver, the best-score store
/// and the listener that presentation hooks into.
///
/// Physics and spawning happen only through [`Game::frame`], and only while
/// `Running`. Every other transition that is not legal from the current state
/// is a silent no-op.
pub struct Game<L: GameListener = NullListener> {
    state: GameState,
    session: Session,
    driver: Driver,
    store: Box<dyn ScoreStore>,
    listener: L,
    now_ms: f64,
    paused_at_ms: Option<f64>,
    game_over_at_ms: Option<f64>,
}

impl Game<NullListener> {
    pub fn headless(session: Session) -> Self {
        Game::new(session, Box::new(MemoryStore::default()), NullListener)
    }
}

impl<L: GameListener> Game<L> {
    /// Reads the best score from `store` once; a failed read starts from the
    /// session's own best.
    pub fn new(mut session: Session, store: Box<dyn ScoreStore>, listener: L) -> Self {
        match store.load() {
            Ok(best) => session.best = session.best.max(best),
            Err(e) => warn!("could not load best score, starting from {}: {e:#}", session.best),
        }
        Self {
            state: GameState::Idle,
            session,
            driver: Driver::new(),
            store,
            listener,
            now_ms: 0.0,
            paused_at_ms: None,
            game_over_at_ms: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Timestamp of the last frame or intent the game saw.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// When the current game-over happened, for delayed overlays.
    pub fn game_over_at_ms(&self) -> Option<f64> {
        self.game_over_at_ms
    }

    /// Advance the clock without stepping. Intents use the latest reading as
    /// their timestamp.
    pub fn observe_time(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn request_frame(&self) -> Option<FrameTicket> {
        self.driver.request_frame()
    }

    /// Begin a fresh run. Legal from `Idle` and `GameOver`.
    pub fn start(&mut self) {
        match self.state {
            GameState::Idle | GameState::GameOver => self.begin_run(),
            GameState::Running | GameState::Paused => {}
        }
    }

    /// Always legal: throw away whatever is going on and start over.
    pub fn restart(&mut self) {
        self.begin_run();
    }

    /// The one control for both "begin" and "jump".
    pub fn request_flap(&mut self) {
        match self.state {
            GameState::Running => {
                self.session.flap();
                self.listener.on_flap();
            }
            GameState::Idle | GameState::GameOver => self.start(),
            GameState::Paused => {}
        }
    }

    pub fn pause(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        self.driver.stop();
        self.state = GameState::Paused;
        self.paused_at_ms = Some(self.now_ms);
        debug!(score = self.session.score, "paused");
        self.listener.on_pause();
    }

    pub fn resume(&mut self) {
        if self.state != GameState::Paused {
            return;
        }
        if let Some(at) = self.paused_at_ms.take() {
            self.session.spawner_mut().shift(self.now_ms - at);
        }
        self.state = GameState::Running;
        self.driver.arm();
        debug!("resumed");
        self.listener.on_resume();
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => self.pause(),
            GameState::Paused => self.resume(),
            GameState::Idle | GameState::GameOver => {}
        }
    }

    /// Viewport changed. Legal in every state.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.session.resize(width, height);
        debug!(
            width = self.session.world.width,
            height = self.session.world.height,
            cadence_ms = self.session.spawn_cadence_ms(),
            "world resized"
        );
    }

    /// One refresh. Spawns and steps only if the game is running and the
    /// ticket is still current; a ticket requested before a pause or
    /// game-over is ignored. Returns whether a step ran.
    pub fn frame(&mut self, ticket: FrameTicket, now_ms: f64) -> bool {
        let elapsed = (now_ms - self.now_ms).max(0.0);
        self.observe_time(now_ms);

        if self.state != GameState::Running || !self.driver.accepts(ticket) {
            return false;
        }

        self.session.spawn_due(self.now_ms);

        let before = self.session.score;
        let outcome: StepOutcome = self.session.step(elapsed);
        // One event per obstacle so listeners see every intermediate score.
        for score in before + 1..=self.session.score {
            self.listener.on_score_changed(score);
        }

        if let Some(collision) = outcome.collision {
            debug!(?collision, "collision");
            self.trigger_game_over();
        }
        true
    }

    /// Adjust physics live. Speed changes also recompute the spawn cadence.
    pub fn tune(&mut self, f: impl FnOnce(&mut Tuning)) {
        f(self.session.tuning_mut());
        self.session.retune();
    }

    fn begin_run(&mut self) {
        self.driver.stop();
        self.session.reset(self.now_ms);
        self.paused_at_ms = None;
        self.game_over_at_ms = None;
        self.state = GameState::Running;
        self.driver.arm();
        debug!(
            obstacles = self.session.obstacles.len(),
            cadence_ms = self.session.spawn_cadence_ms(),
            "run started"
        );
        self.listener.on_start();
        self.listener.on_score_changed(0);
    }

    fn trigger_game_over(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        self.driver.stop();
        self.state = GameState::GameOver;
        self.game_over_at_ms = Some(self.now_ms);

        let score = self.session.score;
        if self.session.settle_best() {
            if let Err(e) = self.store.save(self.session.best) {
                warn!("could not save best score {}: {e:#}", self.session.best);
            }
        }
        info!(score, best = self.session.best, "game over");
        self.listener.on_game_over(score);
    }
}
