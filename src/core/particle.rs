//=========================================================================
// Particle Simulation System
//
// Advances per-emitter particle bookkeeping: ages live particles,
// expires them, spawns replacements within each emitter's budget, and
// retires finished emitters together with their entities.
//
// The actual look of a particle (velocity fields, color ramps) lives
// in the render path; this system only owns the counts and lifetimes
// the rest of the frame depends on.
//
//=========================================================================

//=== External Crates =====================================================

use log::debug;

//=== Internal Modules ====================================================

use super::entity::EntityManager;
use super::render::{DrawCall, DrawLayer, DrawQueue, RenderFeature, RendererKind};
use super::table::{TableError, TableKind, TableSet};

//=== ParticleSystem ======================================================

/// Steps every particle emitter by the frame delta.
pub struct ParticleSystem;

impl ParticleSystem {
    pub fn new() -> Self {
        Self
    }

    /// Validates that the particle table exists in the registry.
    pub fn require_tables(&self, tables: &TableSet) -> Result<(), TableError> {
        tables.require(&[TableKind::Particle])
    }

    //--- update() ---------------------------------------------------------
    //
    // Per emitter: age live particles and drop the expired, then spawn
    // from the accumulated debt while the emitter is within its
    // duration. An emitter past its duration stops spawning; once its
    // last particle dies the row is removed and the entity destroyed.
    //
    pub fn update(
        &mut self,
        dt: f32,
        tables: &mut TableSet,
        entities: &mut EntityManager,
    ) -> Result<(), TableError> {
        let table = tables.particles_mut()?;

        let mut index = 0;
        while index < table.len() {
            let row = &mut table.rows_mut()[index];
            row.age += dt;

            let life = row.particle_life;
            for age in row.ages.iter_mut() {
                *age += dt;
            }
            row.ages.retain(|age| *age < life);

            if row.age < row.duration {
                row.spawn_debt += row.spawn_rate * dt;
                let room = row.capacity.saturating_sub(row.ages.len());
                let spawn = (row.spawn_debt.floor() as usize).min(room);
                row.spawn_debt -= spawn as f32;
                row.ages.extend(std::iter::repeat(0.0).take(spawn));
            } else if row.ages.is_empty() {
                let retired = table.swap_remove(index);
                debug!(
                    target: "particle",
                    "emitter {:?} drained, retiring entity",
                    retired.entity.index()
                );
                entities.destroy(retired.entity);
                continue;
            }

            index += 1;
        }
        Ok(())
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=== ParticleRenderFeature ===============================================

/// Emits one draw call per emitter with live particles.
#[derive(Debug, Default)]
pub struct ParticleRenderFeature;

impl ParticleRenderFeature {
    pub fn new() -> Self {
        Self
    }
}

impl RenderFeature for ParticleRenderFeature {
    fn name(&self) -> &'static str {
        "particle"
    }

    fn renderer(&self) -> RendererKind {
        RendererKind::Batch
    }

    fn require_tables(&mut self, tables: &TableSet) -> Result<(), TableError> {
        tables.require(&[TableKind::Particle])
    }

    fn draw(
        &mut self,
        _dt: f32,
        tables: &TableSet,
        queue: &mut DrawQueue,
    ) -> Result<(), TableError> {
        for row in tables.particles()?.rows() {
            if row.live() > 0 {
                queue.push(DrawCall {
                    renderer: RendererKind::Batch,
                    layer: DrawLayer::Scene,
                    primitives: row.live() as u32,
                });
            }
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
