use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

use flappy_arcade::{Game, GameListener, GameState};

/// What the player asked for, decoupled from the key that asked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Flap,
    /// New run, but only from the game-over screen.
    Start,
    Restart,
    TogglePause,
    Quit,
    Resize { cols: u16, rows: u16 },
    Gravity(f64),
    FlapStrength(f64),
    Speed(f64),
}

pub fn intent_for(event: &Event, tuning_keys: bool) -> Option<Intent> {
    match event {
        Event::Key(key) => key_intent(key, tuning_keys),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Intent::Flap),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(Intent::Resize {
            cols: *cols,
            rows: *rows,
        }),
        _ => None,
    }
}

fn key_intent(key: &KeyEvent, tuning_keys: bool) -> Option<Intent> {
    // Some terminals report releases too; act on presses only.
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let intent = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
        KeyCode::Char(' ') | KeyCode::Up => Intent::Flap,
        KeyCode::Enter => Intent::Start,
        KeyCode::Char('r') => Intent::Restart,
        KeyCode::Char('p') => Intent::TogglePause,
        // Tuning: a/z = gravity, s/x = flap, d/c = speed
        KeyCode::Char('a') if tuning_keys => Intent::Gravity(0.02),
        KeyCode::Char('z') if tuning_keys => Intent::Gravity(-0.02),
        KeyCode::Char('s') if tuning_keys => Intent::FlapStrength(0.2),
        KeyCode::Char('x') if tuning_keys => Intent::FlapStrength(-0.2),
        KeyCode::Char('d') if tuning_keys => Intent::Speed(0.1),
        KeyCode::Char('c') if tuning_keys => Intent::Speed(-0.1),
        _ => return None,
    };
    Some(intent)
}

/// Forward a game intent. Quit and resize belong to the caller and are
/// ignored here.
pub fn apply<L: GameListener>(game: &mut Game<L>, intent: Intent) {
    match intent {
        Intent::Flap => game.request_flap(),
        Intent::Start => {
            if game.state() == GameState::GameOver {
                game.start();
            }
        }
        Intent::Restart => game.restart(),
        Intent::TogglePause => game.toggle_pause(),
        Intent::Gravity(d) => game.tune(|t| t.tune_gravity(d)),
        Intent::FlapStrength(d) => game.tune(|t| t.tune_flap(d)),
        Intent::Speed(d) => game.tune(|t| t.tune_speed(d)),
        Intent::Quit | Intent::Resize { .. } => {}
    }
}
