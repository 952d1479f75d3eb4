//=========================================================================
// Render Features
//
// A render feature walks the tables it owns and turns visible rows
// into draw calls. Features validate their table requirements once at
// registration and expose a static name for diagnostics.
//
// The built-in features mirror the batching behavior of the draw
// techniques: sprites and text collapse into one batched call each,
// meshes submit one call per visible instance.
//
//=========================================================================

//=== Internal Modules ====================================================

use super::queue::{DrawCall, DrawLayer, DrawQueue, RendererKind};
use crate::core::table::{TableError, TableKind, TableSet};

//=== RenderFeature =======================================================

/// Table-to-draw-call translation for one component kind.
pub trait RenderFeature {
    fn name(&self) -> &'static str;

    fn renderer(&self) -> RendererKind;

    /// Validates the tables this feature reads. Called once when the
    /// feature is registered.
    fn require_tables(&mut self, tables: &TableSet) -> Result<(), TableError>;

    /// Accumulates this feature's draw calls for the frame.
    fn draw(&mut self, dt: f32, tables: &TableSet, queue: &mut DrawQueue)
        -> Result<(), TableError>;
}

//=== SpriteRenderFeature =================================================

/// Batches all visible sprites into a single draw call.
#[derive(Debug, Default)]
pub struct SpriteRenderFeature;

impl SpriteRenderFeature {
    pub fn new() -> Self {
        Self
    }
}

impl RenderFeature for SpriteRenderFeature {
    fn name(&self) -> &'static str {
        "sprite"
    }

    fn renderer(&self) -> RendererKind {
        RendererKind::Batch
    }

    fn require_tables(&mut self, tables: &TableSet) -> Result<(), TableError> {
        tables.require(&[TableKind::Sprite, TableKind::Transform])
    }

    fn draw(
        &mut self,
        _dt: f32,
        tables: &TableSet,
        queue: &mut DrawQueue,
    ) -> Result<(), TableError> {
        let visible = tables
            .sprites()?
            .rows()
            .iter()
            .filter(|row| row.visible)
            .count();
        if visible > 0 {
            queue.push(DrawCall {
                renderer: RendererKind::Batch,
                layer: DrawLayer::Scene,
                primitives: visible as u32,
            });
        }
        Ok(())
    }
}

//=== MeshRenderFeature ===================================================

/// Submits one draw call per visible mesh instance.
#[derive(Debug, Default)]
pub struct MeshRenderFeature;

impl MeshRenderFeature {
    pub fn new() -> Self {
        Self
    }
}

impl RenderFeature for MeshRenderFeature {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn renderer(&self) -> RendererKind {
        RendererKind::Mesh
    }

    fn require_tables(&mut self, tables: &TableSet) -> Result<(), TableError> {
        tables.require(&[TableKind::Mesh, TableKind::Transform])
    }

    fn draw(
        &mut self,
        _dt: f32,
        tables: &TableSet,
        queue: &mut DrawQueue,
    ) -> Result<(), TableError> {
        for row in tables.meshes()?.rows() {
            if row.visible {
                queue.push(DrawCall {
                    renderer: RendererKind::Mesh,
                    layer: DrawLayer::Scene,
                    primitives: 1,
                });
            }
        }
        Ok(())
    }
}

//=== TextRenderFeature ===================================================

/// Batches all visible text runs into a single glyph-quad call.
#[derive(Debug, Default)]
pub struct TextRenderFeature;

impl TextRenderFeature {
    pub fn new() -> Self {
        Self
    }
}

impl RenderFeature for TextRenderFeature {
    fn name(&self) -> &'static str {
        "text"
    }

    fn renderer(&self) -> RendererKind {
        RendererKind::Batch
    }

    fn require_tables(&mut self, tables: &TableSet) -> Result<(), TableError> {
        tables.require(&[TableKind::Text, TableKind::Transform])
    }

    fn draw(
        &mut self,
        _dt: f32,
        tables: &TableSet,
        queue: &mut DrawQueue,
    ) -> Result<(), TableError> {
        let glyphs: usize = tables
            .texts()?
            .rows()
            .iter()
            .filter(|row| row.visible)
            .map(|row| row.content.chars().count())
            .sum();
        if glyphs > 0 {
            queue.push(DrawCall {
                renderer: RendererKind::Batch,
                layer: DrawLayer::Scene,
                primitives: glyphs as u32,
            });
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
