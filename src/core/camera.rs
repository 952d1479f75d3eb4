//=========================================================================
// Camera / Viewport
//
// Screen-space viewport and movement bound for the main camera.
// Owned by the render system; mutated only through the engine's
// create and resize paths.
//
//=========================================================================

//=== Bound ===============================================================

/// Axis-aligned rectangle constraining camera panning.
///
/// The default bound spans the full finite `f32` range, so a freshly
/// created or resized camera is effectively unconstrained until a
/// caller narrows it explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bound {
    /// The widest representable bound.
    pub const UNBOUNDED: Bound = Bound {
        left: f32::MIN,
        right: f32::MAX,
        top: f32::MAX,
        bottom: f32::MIN,
    };

    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

impl Default for Bound {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

//=== Camera ==============================================================

/// Main camera state: viewport dimensions, movement bound, position.
///
/// The viewport holds the pixel size used for screen-to-world mapping.
/// The bound limits where `pan` may move the camera center; viewport
/// changes never touch it beyond resetting to the unbounded default.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    viewport: (f32, f32),
    bound: Bound,
    position: (f32, f32),
}

impl Camera {
    pub fn new() -> Self {
        Self {
            viewport: (0.0, 0.0),
            bound: Bound::UNBOUNDED,
            position: (0.0, 0.0),
        }
    }

    //--- Viewport ---------------------------------------------------------

    /// Stores the pixel dimensions used for screen-to-world mapping.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    //--- Movement Bound ---------------------------------------------------

    pub fn set_bound(&mut self, bound: Bound) {
        self.bound = bound;
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    //--- Position ---------------------------------------------------------

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Moves the camera center, clamped into the movement bound.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let x = (self.position.0 + dx).clamp(self.bound.left, self.bound.right);
        let y = (self.position.1 + dy).clamp(self.bound.bottom, self.bound.top);
        self.position = (x, y);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_tracks_latest_dimensions() {
        let mut camera = Camera::new();
        camera.set_viewport(800.0, 600.0);
        camera.set_viewport(1280.0, 720.0);
        assert_eq!(camera.viewport(), (1280.0, 720.0));
    }

    #[test]
    fn default_bound_is_unbounded() {
        let camera = Camera::new();
        assert_eq!(camera.bound(), Bound::UNBOUNDED);
    }

    #[test]
    fn viewport_change_leaves_bound_untouched() {
        let mut camera = Camera::new();
        camera.set_bound(Bound::new(-10.0, 10.0, 5.0, -5.0));
        camera.set_viewport(1920.0, 1080.0);
        assert_eq!(camera.bound(), Bound::new(-10.0, 10.0, 5.0, -5.0));
    }

    #[test]
    fn pan_is_clamped_into_bound() {
        let mut camera = Camera::new();
        camera.set_bound(Bound::new(-10.0, 10.0, 5.0, -5.0));

        camera.pan(100.0, -100.0);
        assert_eq!(camera.position(), (10.0, -5.0));

        camera.pan(-3.0, 2.0);
        assert_eq!(camera.position(), (7.0, -3.0));
    }

    #[test]
    fn pan_with_default_bound_is_unconstrained() {
        let mut camera = Camera::new();
        camera.pan(1.0e6, -1.0e6);
        assert_eq!(camera.position(), (1.0e6, -1.0e6));
    }
}
