//=========================================================================
// Audio System
//
// Frame-synchronous audio tick. Mixing itself happens behind the
// backend boundary; this system owns the init/advance/destroy
// lifecycle and the frame counter the mixer paces itself against.
//
//=========================================================================

//=== External Crates =====================================================

use log::{debug, info, warn};

//=== AudioSystem =========================================================

/// Audio subsystem lifecycle and per-frame timing tick.
#[derive(Debug, Default)]
pub struct AudioSystem {
    frames: u64,
    running: bool,
}

impl AudioSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the audio backend up. Called once during engine creation.
    pub fn init(&mut self) {
        info!(target: "audio", "audio system initialized");
        self.frames = 0;
        self.running = true;
    }

    /// Advances the mixer by one frame.
    pub fn advance_frame(&mut self) {
        if !self.running {
            warn!(target: "audio", "advance_frame on stopped audio system");
            return;
        }
        self.frames = self.frames.wrapping_add(1);
    }

    /// Shuts the backend down. Called once during engine teardown.
    pub fn destroy(&mut self) {
        debug!(target: "audio", "audio system destroyed after {} frames", self.frames);
        self.running = false;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn running(&self) -> bool {
        self.running
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_while_running() {
        let mut audio = AudioSystem::new();
        audio.advance_frame();
        assert_eq!(audio.frames(), 0, "not running yet");

        audio.init();
        audio.advance_frame();
        audio.advance_frame();
        assert_eq!(audio.frames(), 2);

        audio.destroy();
        audio.advance_frame();
        assert_eq!(audio.frames(), 2, "stopped system does not tick");
    }

    #[test]
    fn init_resets_the_counter() {
        let mut audio = AudioSystem::new();
        audio.init();
        audio.advance_frame();
        audio.init();
        assert_eq!(audio.frames(), 0);
    }
}
