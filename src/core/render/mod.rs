//=========================================================================
// Render System
//
// Owns the main camera, the registry of shader-backed renderers and
// render features, the per-camera passes, and the frame's draw queue.
//
// Responsibilities:
// - Register renderers (one per technique) and derive a render pass
//   for each
// - Register features after validating their table requirements
// - Traverse features each frame, accumulating draw calls without
//   submitting them
// - Hand the accumulated queue to the device at flush
//
// Notes:
// The system reads the render-owned tables (sprite, mesh, transform,
// text) and never writes them; writers are the animation system and
// gameplay code, by convention.
//
//=========================================================================

//=== Submodules ==========================================================

mod feature;
mod queue;
mod renderer;

//=== Public API ==========================================================

pub use feature::{MeshRenderFeature, RenderFeature, SpriteRenderFeature, TextRenderFeature};
pub use queue::{
    DrawCall, DrawLayer, DrawQueue, HeadlessDevice, RenderDevice, RenderPass, RendererKind,
};
pub use renderer::{BatchRenderer, BuiltinShaders, MeshRenderer, Renderer, ShaderCatalog};

//=== External Crates =====================================================

use log::{debug, info, warn};

//=== Internal Modules ====================================================

use crate::core::camera::Camera;
use crate::core::table::{TableError, TableKind, TableSet};

//=== RenderSystem ========================================================

/// Render subsystem: camera, renderer/feature registries, draw queue.
pub struct RenderSystem {
    camera: Camera,
    aspect_ratio: f32,
    renderers: Vec<Box<dyn Renderer>>,
    features: Vec<Box<dyn RenderFeature>>,
    passes: Vec<RenderPass>,
    queue: DrawQueue,
}

impl RenderSystem {
    //--- Construction -----------------------------------------------------

    pub fn new(aspect_ratio: f32) -> Self {
        debug!(target: "render", "render system created (aspect {:.3})", aspect_ratio);
        Self {
            camera: Camera::new(),
            aspect_ratio,
            renderers: Vec::new(),
            features: Vec::new(),
            passes: Vec::new(),
            queue: DrawQueue::new(),
        }
    }

    /// Validates the render-owned tables.
    pub fn require_tables(&self, tables: &TableSet) -> Result<(), TableError> {
        tables.require(&[
            TableKind::Sprite,
            TableKind::Mesh,
            TableKind::Transform,
            TableKind::Text,
        ])
    }

    //--- Registration -----------------------------------------------------

    /// Registers a renderer and opens a per-camera pass for it.
    ///
    /// Registering a second renderer of the same kind replaces the
    /// first; the pass is renamed rather than duplicated.
    pub fn register_renderer(&mut self, renderer: Box<dyn Renderer>) {
        if let Some(slot) = self
            .renderers
            .iter_mut()
            .find(|existing| existing.kind() == renderer.kind())
        {
            warn!(
                target: "render",
                "renderer {:?} already registered, replacing `{}` with `{}`",
                renderer.kind(),
                slot.name(),
                renderer.name()
            );
            if let Some(pass) = self
                .passes
                .iter_mut()
                .find(|pass| pass.renderer == renderer.kind())
            {
                pass.name = renderer.name();
            }
            *slot = renderer;
            return;
        }

        info!(target: "render", "renderer registered: {}", renderer.name());
        self.passes.push(RenderPass {
            name: renderer.name(),
            renderer: renderer.kind(),
        });
        self.renderers.push(renderer);
    }

    /// Registers a feature after validating its table requirements.
    pub fn register_feature(
        &mut self,
        mut feature: Box<dyn RenderFeature>,
        tables: &TableSet,
    ) -> Result<(), TableError> {
        feature.require_tables(tables)?;
        info!(target: "render", "feature registered: {}", feature.name());
        self.features.push(feature);
        Ok(())
    }

    //--- Diagnostics ------------------------------------------------------

    pub fn renderer_names(&self) -> Vec<&'static str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    //--- Camera & Passes --------------------------------------------------

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn passes(&self) -> &[RenderPass] {
        &self.passes
    }

    /// Number of per-camera passes; the flush overhead subtracted from
    /// the reported draw-call count.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    //--- Frame Update -----------------------------------------------------

    /// Traverses registered features, accumulating this frame's draw
    /// calls. Nothing is submitted until [`RenderSystem::flush`].
    pub fn update(&mut self, dt: f32, tables: &TableSet) -> Result<(), TableError> {
        for feature in &mut self.features {
            feature.draw(dt, tables, &mut self.queue)?;
        }
        Ok(())
    }

    /// The frame's accumulated draw queue. The UI stage appends its
    /// overlay calls here after the scene stage.
    pub fn queue_mut(&mut self) -> &mut DrawQueue {
        &mut self.queue
    }

    pub fn queue(&self) -> &DrawQueue {
        &self.queue
    }

    /// Submits the accumulated queue through the device. Returns the
    /// total submission count, pass overhead included.
    pub fn flush(&mut self, device: &mut dyn RenderDevice) -> usize {
        device.flush(&self.passes, &mut self.queue)
    }

    //--- Teardown ---------------------------------------------------------

    /// Releases every renderer and clears all registries.
    pub fn destroy(&mut self) {
        for renderer in &mut self.renderers {
            renderer.release();
        }
        self.renderers.clear();
        self.features.clear();
        self.passes.clear();
        self.queue.clear();
        debug!(target: "render", "render system destroyed");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
