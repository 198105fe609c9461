//! Outbound callback surface exposed to the embedded engine.
//!
//! The engine may invoke these synchronously from inside `tick` or during
//! startup; implementations must tolerate that and must not call back into
//! the engine.

/// Host callbacks the engine can reach during a tick.
///
/// Volumes are the engine's native 0..=127 range.
pub trait EngineHooks {
    fn init_audio(&mut self) {}
    fn shutdown_audio(&mut self) {}
    fn play_sound(&mut self, _name: &str, _volume: u8) {}
    fn play_music(&mut self, _name: &str, _looping: bool) {}
    fn stop_music(&mut self) {}
    fn set_music_volume(&mut self, _volume: u8) {}
    fn request_quit(&mut self) {}
}

/// Hooks that ignore everything; used in tests and headless runs.
pub struct NullHooks;

impl EngineHooks for NullHooks {}
