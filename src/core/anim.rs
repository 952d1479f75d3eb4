//=========================================================================
// Animation System
//
// Advances flipbook frame state on sprite rows. This system is the
// single writer of sprite animation fields; the render path only
// reads the resulting frame index.
//
//=========================================================================

//=== Internal Modules ====================================================

use super::table::{TableError, TableKind, TableSet};

//=== AnimationSystem =====================================================

/// Steps sprite flipbook playback by the frame delta.
pub struct AnimationSystem;

impl AnimationSystem {
    pub fn new() -> Self {
        Self
    }

    /// Validates that the sprite table exists in the registry.
    pub fn require_tables(&self, tables: &TableSet) -> Result<(), TableError> {
        tables.require(&[TableKind::Sprite])
    }

    //--- update() ---------------------------------------------------------
    //
    // Accumulates time per sprite and wraps the frame index. Sprites
    // that are paused, single-frame, or misconfigured with a
    // non-positive rate are skipped.
    //
    pub fn update(&mut self, dt: f32, tables: &mut TableSet) -> Result<(), TableError> {
        for row in tables.sprites_mut()?.rows_mut() {
            if !row.playing || row.frame_count <= 1 || row.frame_rate <= 0.0 {
                continue;
            }

            row.frame_clock += dt;
            let step = 1.0 / row.frame_rate;
            while row.frame_clock >= step {
                row.frame_clock -= step;
                row.frame = (row.frame + 1) % row.frame_count;
            }
        }
        Ok(())
    }
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
