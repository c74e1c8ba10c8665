//! Audio cue port for short fixed clips (end-of-session chime).

/// Plays short audio clips. All calls are fire-and-forget.
pub trait AudioCuePlayer: Send + Sync {
    /// Start playing `source` (file path) from the beginning at `volume`.
    fn play_clip(&self, source: &str, volume: f32);

    /// Update the volume of the clip currently playing.
    fn set_volume(&self, volume: f32);

    fn pause(&self);

    fn resume(&self);

    /// Stop playback and rewind to the start.
    fn stop(&self);
}

/// Cue player that stays silent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCuePlayer;

impl AudioCuePlayer for NoopCuePlayer {
    fn play_clip(&self, source: &str, _volume: f32) {
        tracing::debug!(source, "Audio cue skipped (no cue player)");
    }

    fn set_volume(&self, _volume: f32) {}

    fn pause(&self) {}

    fn resume(&self) {}

    fn stop(&self) {}
}
