//=========================================================================
// Frame Stats & FPS Counter
//
// Delta-time smoothing for simulation stability, plus per-frame
// diagnostic counters (draw calls, FPS display, overlay frame index).
//
// Responsibilities:
// - Clamp and smooth raw frame deltas before simulation sees them
// - Maintain a displayable FPS value
// - Record the per-frame draw-call count after device flush
// - Emit read-only diagnostic output through the log facade
//
//=========================================================================

//=== External Crates =====================================================

use log::{debug, info};

//=== FpsCounter ==========================================================

/// Raw deltas above this are treated as stalls (window drag, debugger
/// pause) and clamped so one bad frame cannot destabilize simulation.
const MAX_RAW_DELTA: f32 = 0.05;

/// Exponential smoothing weight for the newest sample.
const SMOOTHING: f32 = 0.125;

/// Smooths raw frame deltas and derives a displayable FPS value.
///
/// Feeding a constant delta converges onto it within a few dozen
/// frames; a single extreme spike is clamped to [`MAX_RAW_DELTA`]
/// before it enters the average.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    smoothed: f32,
    fps: f32,
}

impl FpsCounter {
    /// Neutral baseline the smoother starts from.
    pub const BASELINE_DELTA: f32 = 1.0 / 60.0;

    pub fn new() -> Self {
        Self {
            smoothed: Self::BASELINE_DELTA,
            fps: 1.0 / Self::BASELINE_DELTA,
        }
    }

    /// Resets smoothing state to the neutral baseline.
    pub fn initialize(&mut self) {
        self.smoothed = Self::BASELINE_DELTA;
        self.fps = 1.0 / Self::BASELINE_DELTA;
    }

    //--- smooth() ---------------------------------------------------------
    //
    // Folds one raw delta into the running average and returns the
    // bounded value simulation should step with.
    //
    pub fn smooth(&mut self, raw_delta: f32) -> f32 {
        let clamped = raw_delta.clamp(0.0, MAX_RAW_DELTA);
        self.smoothed += (clamped - self.smoothed) * SMOOTHING;
        if self.smoothed > f32::EPSILON {
            self.fps = 1.0 / self.smoothed;
        }
        self.smoothed
    }

    /// Latest smoothed delta, in seconds.
    pub fn delta(&self) -> f32 {
        self.smoothed
    }

    /// Displayable frames-per-second value.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

//=== FrameStats ==========================================================

/// Per-frame diagnostic counters.
///
/// Mutated once per frame by the engine after render submission; all
/// `print_*` methods are read-only with respect to simulation state.
#[derive(Debug, Default)]
pub struct FrameStats {
    draw_call: i64,
    verbose: bool,
    overlay_frame: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Records the draw calls attributable to scene and UI content,
    /// after per-camera pass overhead has been subtracted.
    pub fn record_draw_call(&mut self, count: i64) {
        self.draw_call = count;
    }

    pub fn draw_call(&self) -> i64 {
        self.draw_call
    }

    //--- Diagnostics ------------------------------------------------------

    pub fn print_verbose(&self) {
        if self.verbose {
            debug!(
                target: "stats",
                "frame {}: draw_call={}",
                self.overlay_frame,
                self.draw_call
            );
        }
    }

    pub fn print_draw_call(&self) {
        if self.verbose {
            info!(target: "stats", "draw calls: {}", self.draw_call);
        }
    }

    pub fn print_fps(&self, fps: f32) {
        if self.verbose {
            info!(target: "stats", "fps: {:.1}", fps);
        }
    }

    /// Advances the debug-overlay frame counter.
    pub fn next_frame(&mut self) {
        self.overlay_frame = self.overlay_frame.wrapping_add(1);
    }

    pub fn overlay_frame(&self) -> u64 {
        self.overlay_frame
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
