use anyhow::{Context, Result};
use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};
use tracing::{debug, warn};

use flappy_arcade::GameListener;

// ── Sounds ──────────────────────────────────────────────────────────────────

/// fundsp renders at 44.1 kHz unless told otherwise.
const SAMPLE_RATE: u32 = 44_100;

#[derive(Clone, Copy)]
enum Osc {
    Sine,
    Saw,
    Square,
}

/// A pitch sweep from `from_hz` to `to_hz` whose gain falls linearly to
/// silence, rendered to mono samples.
fn sweep(osc: Osc, from_hz: f32, to_hz: f32, seconds: f32, gain: f32) -> Vec<f32> {
    let freq = shared(from_hz);
    let mut osc: Box<dyn AudioUnit> = match osc {
        Osc::Sine => Box::new(var(&freq) >> sine::<f32>()),
        Osc::Saw => Box::new(var(&freq) >> saw()),
        Osc::Square => Box::new(var(&freq) >> square()),
    };

    let len = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / len as f32;
            freq.set_value(lerp(from_hz, to_hz, t));
            osc.get_mono() * lerp(gain, 0.0, t)
        })
        .collect()
}

struct Cues {
    flap: Vec<f32>,
    score: Vec<f32>,
    crash: Vec<f32>,
}

impl Cues {
    fn synthesize() -> Self {
        let mut score = sweep(Osc::Square, 880.0, 880.0, 0.05, 0.08);
        score.extend(sweep(Osc::Square, 1320.0, 1320.0, 0.08, 0.08));
        Self {
            flap: sweep(Osc::Sine, 520.0, 900.0, 0.09, 0.25),
            score,
            // Falling sawtooth, 400 Hz down to 80 Hz.
            crash: sweep(Osc::Saw, 400.0, 80.0, 0.5, 0.15),
        }
    }
}

pub struct Audio {
    // Dropping the stream stops playback.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    cues: Cues,
}

impl Audio {
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no audio output device available")?;
        Ok(Self {
            _stream: stream,
            handle,
            cues: Cues::synthesize(),
        })
    }

    fn play(&self, samples: &[f32]) {
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                debug!("dropping sound cue: {e}");
                return;
            }
        };
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
        sink.detach(); // Play in background
    }
}

/// Game listener that turns events into sound. Without an audio device, or
/// with `--mute`, every cue is silently skipped.
pub struct SoundCues {
    audio: Option<Audio>,
}

impl SoundCues {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { audio: None };
        }
        let audio = match Audio::open() {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("sound disabled: {e:#}");
                None
            }
        };
        Self { audio }
    }

    fn play(&self, pick: impl FnOnce(&Cues) -> &[f32]) {
        if let Some(audio) = &self.audio {
            audio.play(pick(&audio.cues));
        }
    }
}

impl GameListener for SoundCues {
    fn on_flap(&mut self) {
        self.play(|c| c.flap.as_slice());
    }

    fn on_score_changed(&mut self, score: u32) {
        if score > 0 {
            self.play(|c| c.score.as_slice());
        }
    }

    fn on_game_over(&mut self, final_score: u32) {
        debug!(final_score, "crash cue");
        self.play(|c| c.crash.as_slice());
    }
}
