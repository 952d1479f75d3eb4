//=========================================================================
// Draw Queue & Render Device
//
// Draw calls accumulate in the queue during the render and UI stages
// of the frame and are submitted in one batch at device flush. The
// device itself sits behind a trait so the engine core never touches
// a graphics API directly.
//
//=========================================================================

//=== External Crates =====================================================

use log::trace;

//=== RendererKind ========================================================

/// Identifies which registered renderer a draw call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// Batched quads: sprites, text glyphs, particles.
    Batch,
    /// Individual mesh instances and UI geometry.
    Mesh,
}

//=== DrawLayer ===========================================================

/// Submission layer. Overlay calls are issued after all scene calls
/// within a frame, so UI always draws on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawLayer {
    Scene,
    Overlay,
}

//=== DrawCall ============================================================

/// One unit of work for the rendering device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub renderer: RendererKind,
    pub layer: DrawLayer,
    /// Number of primitives (quads, instances, glyphs) in the call.
    pub primitives: u32,
}

//=== DrawQueue ===========================================================

/// Per-frame accumulator of draw calls.
#[derive(Debug, Default)]
pub struct DrawQueue {
    calls: Vec<DrawCall>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn push(&mut self, call: DrawCall) {
        self.calls.push(call);
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

//=== RenderPass ==========================================================

/// One per-camera pass, created when a renderer is registered. Each
/// pass costs one extra submission at flush time; that overhead is
/// subtracted from the reported draw-call count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPass {
    pub name: &'static str,
    pub renderer: RendererKind,
}

//=== RenderDevice ========================================================

/// The device seam: submits the accumulated queue and reports how many
/// submissions it made in total, per-camera pass setup included.
pub trait RenderDevice {
    /// Flushes all accumulated draw calls. Returns the total number of
    /// submissions, which includes one per render pass.
    fn flush(&mut self, passes: &[RenderPass], queue: &mut DrawQueue) -> usize;

    /// Releases device resources. Default implementation does nothing.
    fn destroy(&mut self) {}
}

//=== HeadlessDevice ======================================================

/// Counting device with no graphics backend.
///
/// Submits one unit per queued call plus one per pass, mirroring how a
/// real device pays per-camera setup cost. Used as the default device
/// and throughout tests.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    total_flushed: u64,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total submissions across the device's lifetime.
    pub fn total_flushed(&self) -> u64 {
        self.total_flushed
    }
}

impl RenderDevice for HeadlessDevice {
    fn flush(&mut self, passes: &[RenderPass], queue: &mut DrawQueue) -> usize {
        let submitted = queue.len() + passes.len();
        trace!(
            target: "render",
            "flush: {} calls + {} passes",
            queue.len(),
            passes.len()
        );
        self.total_flushed += submitted as u64;
        queue.clear();
        submitted
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_call(primitives: u32) -> DrawCall {
        DrawCall {
            renderer: RendererKind::Batch,
            layer: DrawLayer::Scene,
            primitives,
        }
    }

    #[test]
    fn queue_accumulates_calls() {
        let mut queue = DrawQueue::new();
        queue.push(scene_call(4));
        queue.push(scene_call(1));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.calls()[0].primitives, 4);
    }

    #[test]
    fn headless_flush_counts_calls_and_passes() {
        let mut device = HeadlessDevice::new();
        let mut queue = DrawQueue::new();
        queue.push(scene_call(4));
        queue.push(scene_call(2));

        let passes = [
            RenderPass {
                name: "batch",
                renderer: RendererKind::Batch,
            },
            RenderPass {
                name: "mesh",
                renderer: RendererKind::Mesh,
            },
        ];

        let submitted = device.flush(&passes, &mut queue);
        assert_eq!(submitted, 4);
        assert!(queue.is_empty(), "flush consumes the queue");
        assert_eq!(device.total_flushed(), 4);
    }

    #[test]
    fn empty_flush_still_pays_pass_overhead() {
        let mut device = HeadlessDevice::new();
        let mut queue = DrawQueue::new();
        let passes = [RenderPass {
            name: "batch",
            renderer: RendererKind::Batch,
        }];

        assert_eq!(device.flush(&passes, &mut queue), 1);
    }
}
