//=========================================================================
// Platform Host
//
// Adapts a Winit event loop to the engine's host lifecycle surface.
//
// Architecture:
// ```text
//  Winit Event Loop                 Engine
//  ┌───────────────────────┐       ┌─────────────────────────┐
//  │ resumed               ├──────▶│ create(aspect)          │
//  │ RedrawRequested       ├──────▶│ update()                │
//  │ Resized               ├──────▶│ resize(w, h)            │
//  │ KeyboardInput         ├──────▶│ key_event(key, pressed) │
//  │ MouseInput/CursorMoved├──────▶│ pointer_event(...)      │
//  │ CloseRequested        ├──────▶│ destroy()               │
//  └───────────────────────┘       └─────────────────────────┘
// ```
//
// Input callbacks only enqueue into the engine's pending buffer, so
// it does not matter where in the frame Winit delivers them; the
// engine latches once per update.
//
// Responsibilities:
// - Create and manage the OS window from the engine's configuration
// - Drive the engine lifecycle callbacks in the required order
// - Translate Winit input into the integer-code event surface
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== External Crates =====================================================

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Modules ====================================================

use crate::core::input::keys;
use crate::engine::Engine;
use event_mapper::{key_code, pointer_code};

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are typically fatal: without an event loop the engine cannot
/// be driven.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create the event loop.
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=== Platform ============================================================

/// Window host that owns an [`Engine`] and drives its lifecycle.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(engine)` with a built but not
///    yet created engine
/// 2. **Execution**: `platform.run()` enters the event loop
/// 3. **Startup**: the first `resumed` creates the window and calls
///    `Engine::create`
/// 4. **Frames**: every `RedrawRequested` runs one `Engine::update`
/// 5. **Shutdown**: window close destroys the engine and exits
pub struct Platform {
    engine: Engine,
    window: Option<Window>,
    cursor: (f32, f32),
    pointer_down: bool,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            window: None,
            cursor: (0.0, 0.0),
            pointer_down: false,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Starts the event loop and blocks until the window closes.
    ///
    /// Installs `env_logger` if no logger is set yet, so diagnostics
    /// from every subsystem reach the console by default.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created
    /// or fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (a Winit requirement on
    /// macOS and iOS).
    pub fn run(mut self) -> Result<(), PlatformError> {
        let _ = env_logger::try_init();
        info!(target: "platform", "starting event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window and the engine on first activation. On
    /// mobile targets `resumed` can fire again after a suspend; the
    /// existing window is kept and the engine is not re-created.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.engine.viewport_size();
        let attrs = WindowAttributes::default()
            .with_title(self.engine.title().to_owned())
            .with_inner_size(LogicalSize::new(width, height));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => window,
            Err(e) => {
                error!(target: "platform", "window creation failed: {}", e);
                event_loop.exit();
                return;
            }
        };

        info!(
            target: "platform",
            "window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let aspect_ratio = width as f32 / height as f32;
        if let Err(e) = self.engine.create(aspect_ratio) {
            error!(target: "platform", "engine creation failed: {}", e);
            event_loop.exit();
            return;
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "window close requested");
                if let Err(e) = self.engine.destroy() {
                    warn!(target: "platform", "engine teardown: {}", e);
                }
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Err(e) = self.engine.resize(size.width, size.height) {
                    warn!(target: "platform", "resize ignored: {}", e);
                }
            }

            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.repeat {
                    return;
                }
                if let Some(key) = key_code(key_event.physical_key) {
                    let pressed = key_event.state == ElementState::Pressed;
                    self.engine.key_event(key, pressed);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let code = pointer_code(button);
                let pressed = state == ElementState::Pressed;
                if code == keys::POINTER_LEFT {
                    self.pointer_down = pressed;
                }
                self.engine
                    .pointer_event(code, pressed, self.cursor.0, self.cursor.1);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                // Moves carry the current button state; the input
                // system turns only transitions into edges.
                self.engine.pointer_event(
                    keys::POINTER_LEFT,
                    self.pointer_down,
                    self.cursor.0,
                    self.cursor.1,
                );
            }

            WindowEvent::RedrawRequested => {
                match self.engine.update() {
                    Ok(_) => {}
                    Err(e) => {
                        error!(target: "platform", "frame failed: {}", e);
                        event_loop.exit();
                        return;
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
