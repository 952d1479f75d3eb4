//=========================================================================
// UI System
//
// Immediate-mode overlay layer. Scenes and scripts queue primitives
// into a registered context during their update; the UI stage drains
// every context into batched draw calls after the scene's calls, so
// the overlay always renders on top.
//
// Layout, styling and widget logic live in the host application; the
// engine core only owns the per-frame primitive queues and the screen
// size used for coordinate mapping.
//
//=========================================================================

//=== External Crates =====================================================

use log::debug;

//=== Internal Modules ====================================================

use super::render::{DrawCall, DrawLayer, DrawQueue, RendererKind};

//=== UiPrimitive =========================================================

/// One queued overlay primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum UiPrimitive {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: u32,
    },
    Label {
        x: f32,
        y: f32,
        size: f32,
        text: String,
        color: u32,
    },
}

//=== UiContext ===========================================================

/// A primitive queue with its own scale factor.
///
/// Most applications register a single default context; split contexts
/// are useful when parts of the overlay need a different scale.
#[derive(Debug)]
pub struct UiContext {
    pub scale: f32,
    primitives: Vec<UiPrimitive>,
}

impl UiContext {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            primitives: Vec::new(),
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: u32) {
        self.primitives.push(UiPrimitive::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn label(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>, color: u32) {
        self.primitives.push(UiPrimitive::Label {
            x,
            y,
            size,
            text: text.into(),
            color,
        });
    }

    /// Number of primitives queued for this frame.
    pub fn pending(&self) -> usize {
        self.primitives.len()
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new(1.0)
    }
}

//=== UiSystem ============================================================

/// Owns the registered contexts and the screen size for coordinate
/// mapping. Draws through one renderer kind, fixed at construction.
pub struct UiSystem {
    renderer: RendererKind,
    contexts: Vec<UiContext>,
    screen: (f32, f32),
}

impl UiSystem {
    pub fn new(renderer: RendererKind) -> Self {
        Self {
            renderer,
            contexts: Vec::new(),
            screen: (0.0, 0.0),
        }
    }

    pub fn register_context(&mut self, context: UiContext) {
        self.contexts.push(context);
    }

    pub fn context_mut(&mut self, index: usize) -> Option<&mut UiContext> {
        self.contexts.get_mut(index)
    }

    //--- Screen Size ------------------------------------------------------
    //
    // Kept in lockstep with the camera viewport by the engine's create
    // and resize paths.
    //
    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        debug!(target: "ui", "screen size {}x{}", width, height);
        self.screen = (width, height);
    }

    pub fn screen_size(&self) -> (f32, f32) {
        self.screen
    }

    //--- draw() -----------------------------------------------------------
    //
    // Drains each context into one overlay draw call sized by its quad
    // count (one quad per rect, one per glyph). Empty contexts cost
    // nothing.
    //
    pub fn draw(&mut self, _dt: f32, queue: &mut DrawQueue) {
        for context in &mut self.contexts {
            let primitives = std::mem::take(&mut context.primitives);
            if primitives.is_empty() {
                continue;
            }

            let quads: u32 = primitives
                .iter()
                .map(|primitive| match primitive {
                    UiPrimitive::Rect { .. } => 1,
                    UiPrimitive::Label { text, .. } => text.chars().count() as u32,
                })
                .sum();

            queue.push(DrawCall {
                renderer: self.renderer,
                layer: DrawLayer::Overlay,
                primitives: quads,
            });
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ui_with_default_context() -> UiSystem {
        let mut ui = UiSystem::new(RendererKind::Mesh);
        ui.register_context(UiContext::default());
        ui
    }

    #[test]
    fn screen_size_tracks_latest_value() {
        let mut ui = ui_with_default_context();
        ui.set_screen_size(800.0, 600.0);
        ui.set_screen_size(1024.0, 768.0);
        assert_eq!(ui.screen_size(), (1024.0, 768.0));
    }

    #[test]
    fn draw_batches_context_into_one_overlay_call() {
        let mut ui = ui_with_default_context();
        let context = ui.context_mut(0).unwrap();
        context.rect(0.0, 0.0, 100.0, 20.0, 0xff00_00ff);
        context.label(4.0, 4.0, 12.0, "hp", 0xffff_ffff);

        let mut queue = DrawQueue::new();
        ui.draw(0.016, &mut queue);

        assert_eq!(queue.len(), 1);
        let call = queue.calls()[0];
        assert_eq!(call.layer, DrawLayer::Overlay);
        assert_eq!(call.primitives, 3, "one rect quad plus two glyph quads");
    }

    #[test]
    fn draw_drains_primitives_each_frame() {
        let mut ui = ui_with_default_context();
        ui.context_mut(0).unwrap().rect(0.0, 0.0, 1.0, 1.0, 0);

        let mut queue = DrawQueue::new();
        ui.draw(0.016, &mut queue);
        assert_eq!(ui.context_mut(0).unwrap().pending(), 0);

        // Nothing queued: immediate mode means no carry-over.
        let mut queue = DrawQueue::new();
        ui.draw(0.016, &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn empty_contexts_emit_nothing() {
        let mut ui = UiSystem::new(RendererKind::Mesh);
        ui.register_context(UiContext::default());
        ui.register_context(UiContext::new(2.0));

        let mut queue = DrawQueue::new();
        ui.draw(0.016, &mut queue);
        assert!(queue.is_empty());
    }
}
