/// Cues for the presentation layer. Called synchronously from inside the
/// state machine; every method defaults to doing nothing.
pub trait GameListener {
    fn on_flap(&mut self) {}
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_game_over(&mut self, _final_score: u32) {}
    fn on_start(&mut self) {}
    fn on_pause(&mut self) {}
    fn on_resume(&mut self) {}
}

/// Listener for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl GameListener for NullListener {}

/// Event record, handy for listeners that just queue what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flap,
    ScoreChanged(u32),
    GameOver(u32),
    Started,
    Paused,
    Resumed,
}

/// Collects every event in order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl GameListener for EventLog {
    fn on_flap(&mut self) {
        self.events.push(GameEvent::Flap);
    }

    fn on_score_changed(&mut self, score: u32) {
        self.events.push(GameEvent::ScoreChanged(score));
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.events.push(GameEvent::GameOver(final_score));
    }

    fn on_start(&mut self) {
        self.events.push(GameEvent::Started);
    }

    fn on_pause(&mut self) {
        self.events.push(GameEvent::Paused);
    }

    fn on_resume(&mut self) {
        self.events.push(GameEvent::Resumed);
    }
}
