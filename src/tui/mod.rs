//! Terminal front end: half-block renderer, synthesized sound cues and
//! keyboard/mouse input.

pub mod audio;
pub mod input;
pub mod render;

pub use audio::SoundCues;
pub use input::{Intent, apply, intent_for};
pub use render::{Renderer, Viewport};
