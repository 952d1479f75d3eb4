//=========================================================================
// Cinder Engine
//
// Composition root and per-frame orchestrator.
//
// Architecture:
// ```text
//     EngineBuilder ──build()──> Engine ──create()──> [Running]
//         │                        │
//         ├─ with_size()           ├─ update()  once per host tick
//         ├─ with_table_capacity() ├─ resize()
//         ├─ with_device()         ├─ key/pointer events (enqueue only)
//         └─ with_scene_manager()  └─ destroy() once at shutdown
// ```
//
// The engine owns every subsystem as a named field and forwards to
// each explicitly, in a fixed order that is itself the contract: who
// reads shared state, who writes it, and when buffers are safe to
// reset.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Instant;

//=== External Crates =====================================================

use log::{error, info};
use thiserror::Error;

//=== Internal Modules ====================================================

use crate::core::camera::{Bound, Camera};
use crate::core::entity::EntityManager;
use crate::core::input::{InputSender, InputSystem};
use crate::core::particle::{ParticleRenderFeature, ParticleSystem};
use crate::core::render::{
    BatchRenderer, BuiltinShaders, HeadlessDevice, MeshRenderFeature, MeshRenderer, RenderDevice,
    RenderSystem, RendererKind, ShaderCatalog, SpriteRenderFeature, TextRenderFeature,
};
use crate::core::scene::{FrameEnv, IdleSceneManager, SceneManager};
use crate::core::script::ScriptSystem;
use crate::core::stats::{FpsCounter, FrameStats};
use crate::core::table::{TableError, TableKind, TableSet};
use crate::core::ui::{UiContext, UiSystem};
use crate::core::{AnimationSystem, AudioSystem};

//=== Table Capacities ====================================================

const MAX_SCRIPT: usize = 1024;
const MAX_TAG: usize = 1024;
const MAX_SPRITE: usize = 64 << 10;
const MAX_MESH: usize = 64 << 10;
const MAX_TRANSFORM: usize = 64 << 10;
const MAX_TEXT: usize = 64 << 10;
const MAX_PARTICLE: usize = 1024;

//=== EngineError =========================================================

/// Errors reported by the engine's host-facing surface.
///
/// Lifecycle misuse (updating before creation, creating or destroying
/// twice) is rejected explicitly instead of proceeding on
/// uninitialized subsystems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("`{call}` called before `create`")]
    NotCreated { call: &'static str },

    #[error("`create` called more than once")]
    AlreadyCreated,

    #[error("`destroy` called more than once")]
    AlreadyDestroyed,

    #[error("`{call}` called after `destroy`")]
    Shutdown { call: &'static str },

    #[error("shader source `{name}` not found in catalog")]
    MissingShader { name: String },

    #[error(transparent)]
    Table(#[from] TableError),
}

//=== FrameReport =========================================================

/// Summary of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Smoothed delta the frame was simulated with, in seconds.
    pub delta: f32,
    /// Displayable frames-per-second value.
    pub fps: f32,
    /// Draw calls attributable to content: total submissions minus
    /// per-camera pass overhead.
    pub draw_calls: i64,
    /// Total submissions the device reported at flush.
    pub submitted: usize,
}

//=== Lifecycle ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    Shutdown,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Viewport**: 800 x 600 pixels
/// - **Table capacities**: script 1024, tag 1024, sprite/mesh/
///   transform/text 65536, particle 1024
/// - **Device**: [`HeadlessDevice`] (counting, no graphics backend)
/// - **Shaders**: [`BuiltinShaders`]
/// - **Scene manager**: [`IdleSceneManager`]
///
/// # Examples
///
/// ```
/// use cinder_engine::EngineBuilder;
///
/// let mut engine = EngineBuilder::new()
///     .with_size(1280, 720)
///     .build()
///     .unwrap();
/// engine.create(1280.0 / 720.0).unwrap();
/// ```
pub struct EngineBuilder {
    width: u32,
    height: u32,
    title: String,
    capacities: Vec<(TableKind, usize)>,
    device: Box<dyn RenderDevice>,
    shaders: Box<dyn ShaderCatalog>,
    scenes: Box<dyn SceneManager>,
    verbose: bool,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "cinder".to_owned(),
            capacities: vec![
                (TableKind::Script, MAX_SCRIPT),
                (TableKind::Tag, MAX_TAG),
                (TableKind::Sprite, MAX_SPRITE),
                (TableKind::Mesh, MAX_MESH),
                (TableKind::Transform, MAX_TRANSFORM),
                (TableKind::Text, MAX_TEXT),
                (TableKind::Particle, MAX_PARTICLE),
            ],
            device: Box::new(HeadlessDevice::new()),
            shaders: Box::new(BuiltinShaders),
            scenes: Box::new(IdleSceneManager),
            verbose: false,
        }
    }

    /// Sets the viewport size in pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "viewport must be non-empty");
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Overrides the capacity of one table kind. Validation happens in
    /// [`EngineBuilder::build`], where a zero capacity is reported as
    /// a configuration error.
    pub fn with_table_capacity(mut self, kind: TableKind, capacity: usize) -> Self {
        if let Some(entry) = self.capacities.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 = capacity;
        }
        self
    }

    /// Installs the rendering device the frame pipeline flushes into.
    pub fn with_device(mut self, device: Box<dyn RenderDevice>) -> Self {
        self.device = device;
        self
    }

    /// Installs the shader source catalog renderers are built from.
    pub fn with_shader_catalog(mut self, shaders: Box<dyn ShaderCatalog>) -> Self {
        self.shaders = shaders;
        self
    }

    /// Installs the scene manager driven at the top of every frame.
    pub fn with_scene_manager(mut self, scenes: Box<dyn SceneManager>) -> Self {
        self.scenes = scenes;
        self
    }

    /// Enables per-frame diagnostic output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    //--- build() ----------------------------------------------------------
    //
    // Creates the engine with its component tables loaded. Subsystems
    // are not constructed until `create`, matching the host lifecycle.
    //
    pub fn build(self) -> Result<Engine, EngineError> {
        info!(
            target: "engine",
            "building engine ({}x{}, {} tables)",
            self.width,
            self.height,
            self.capacities.len()
        );

        let mut tables = TableSet::new();
        for (kind, capacity) in &self.capacities {
            tables.create_table(*kind, *capacity)?;
        }

        let mut stats = FrameStats::new();
        stats.set_verbose(self.verbose);

        Ok(Engine {
            width: self.width,
            height: self.height,
            title: self.title,
            lifecycle: Lifecycle::Idle,
            tables,
            entities: EntityManager::new(),
            stats,
            fps: FpsCounter::new(),
            input: InputSystem::new(),
            scenes: self.scenes,
            device: self.device,
            shaders: self.shaders,
            systems: None,
            last_tick: None,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Systems =============================================================

//
// Subsystems that exist only between `create` and `destroy`. The input
// system lives directly on the engine instead: its pending buffer must
// accept events at any time, including before the first frame.
//
struct Systems {
    render: RenderSystem,
    ui: UiSystem,
    particle: ParticleSystem,
    script: ScriptSystem,
    anim: AnimationSystem,
    audio: AudioSystem,
}

//=== Engine ==============================================================

/// The engine root: owns the table registry, the entity allocator and
/// every subsystem, and runs the fixed-order frame pipeline.
///
/// # Lifecycle
///
/// The host drives exactly this sequence:
///
/// 1. [`Engine::create`] once, before anything else
/// 2. [`Engine::update`] once per tick (with [`Engine::resize`] and
///    input events interleaved as they arrive)
/// 3. [`Engine::destroy`] once, after the last update
///
/// Calls outside this order are rejected with an [`EngineError`].
///
/// # Frame Pipeline
///
/// Each update executes, in order: delta smoothing, input latch, scene
/// update, script update, input reset, animation, particle simulation,
/// render accumulation, UI draw, diagnostics, audio tick, device
/// flush. The order is a contract; in particular the input reset sits
/// strictly after every consumer of the frame's snapshot and before
/// the next frame's latch.
pub struct Engine {
    width: u32,
    height: u32,
    title: String,
    lifecycle: Lifecycle,
    tables: TableSet,
    entities: EntityManager,
    stats: FrameStats,
    fps: FpsCounter,
    input: InputSystem,
    scenes: Box<dyn SceneManager>,
    device: Box<dyn RenderDevice>,
    shaders: Box<dyn ShaderCatalog>,
    systems: Option<Systems>,
    last_tick: Option<Instant>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    //--- create() ---------------------------------------------------------

    /// Initializes every subsystem in dependency order.
    ///
    /// Renderers come first since the UI draws through one of them;
    /// the table-wired subsystems validate their requirements as they
    /// are constructed; the scene manager binds last, once everything
    /// it may touch exists.
    pub fn create(&mut self, aspect_ratio: f32) -> Result<(), EngineError> {
        match self.lifecycle {
            Lifecycle::Running => return Err(EngineError::AlreadyCreated),
            Lifecycle::Shutdown => return Err(EngineError::Shutdown { call: "create" }),
            Lifecycle::Idle => {}
        }

        info!(target: "engine", "create (aspect {:.3})", aspect_ratio);
        self.fps.initialize();

        // Render system and its shader-backed renderers.
        let mut render = RenderSystem::new(aspect_ratio);
        render.require_tables(&self.tables)?;

        let (vertex, fragment) = self
            .shaders
            .shader_source("batch")
            .ok_or_else(|| EngineError::MissingShader {
                name: "batch".to_owned(),
            })?;
        render.register_renderer(Box::new(BatchRenderer::new(vertex, fragment)));

        let (vertex, fragment) = self
            .shaders
            .shader_source("mesh")
            .ok_or_else(|| EngineError::MissingShader {
                name: "mesh".to_owned(),
            })?;
        render.register_renderer(Box::new(MeshRenderer::new(vertex, fragment)));

        info!(target: "engine", "renderers: {:?}", render.renderer_names());

        render.register_feature(Box::new(SpriteRenderFeature::new()), &self.tables)?;
        render.register_feature(Box::new(MeshRenderFeature::new()), &self.tables)?;
        render.register_feature(Box::new(TextRenderFeature::new()), &self.tables)?;

        // UI draws through the mesh renderer, layered over the scene.
        let mut ui = UiSystem::new(RendererKind::Mesh);
        ui.register_context(UiContext::default());

        // Particle simulation, plus its render feature.
        let particle = ParticleSystem::new();
        particle.require_tables(&self.tables)?;
        render.register_feature(Box::new(ParticleRenderFeature::new()), &self.tables)?;

        let script = ScriptSystem::new();
        script.require_tables(&self.tables)?;

        let anim = AnimationSystem::new();
        anim.require_tables(&self.tables)?;

        info!(target: "engine", "features: {:?}", render.feature_names());

        let mut audio = AudioSystem::new();
        audio.init();

        let mut systems = Systems {
            render,
            ui,
            particle,
            script,
            anim,
            audio,
        };

        Self::apply_screen_size(&mut systems, self.width as f32, self.height as f32);

        {
            let mut env = FrameEnv {
                tables: &mut self.tables,
                entities: &mut self.entities,
                input: &self.input,
                ui: &mut systems.ui,
            };
            self.scenes.setup(&mut env);
        }

        self.systems = Some(systems);
        self.lifecycle = Lifecycle::Running;
        info!(target: "engine", "create complete");
        Ok(())
    }

    //--- update() ---------------------------------------------------------

    /// Executes one frame of the pipeline, measuring the raw delta
    /// since the previous call. Must be called once per host tick; not
    /// reentrant.
    pub fn update(&mut self) -> Result<FrameReport, EngineError> {
        let now = Instant::now();
        let raw_delta = match self.last_tick {
            Some(previous) => (now - previous).as_secs_f32(),
            None => FpsCounter::BASELINE_DELTA,
        };
        self.last_tick = Some(now);
        self.tick(raw_delta)
    }

    /// Executes one frame with an explicit raw delta. Fixed-step hosts
    /// and tests drive this directly.
    pub fn tick(&mut self, raw_delta: f32) -> Result<FrameReport, EngineError> {
        match self.lifecycle {
            Lifecycle::Idle => {
                error!(target: "engine", "update called before create");
                return Err(EngineError::NotCreated { call: "update" });
            }
            Lifecycle::Shutdown => return Err(EngineError::Shutdown { call: "update" }),
            Lifecycle::Running => {}
        }
        let Some(sys) = self.systems.as_mut() else {
            return Err(EngineError::NotCreated { call: "update" });
        };

        // 1. Smooth the raw delta before any simulation sees it.
        let dt = self.fps.smooth(raw_delta);

        // 2. Latch buffered input into the frame snapshot.
        self.input.frame();

        // 3. Scene manager advances game state.
        {
            let mut env = FrameEnv {
                tables: &mut self.tables,
                entities: &mut self.entities,
                input: &self.input,
                ui: &mut sys.ui,
            };
            self.scenes.update(dt, &mut env);
        }

        // 4. Scripts run against the same snapshot.
        sys.script.update(
            dt,
            &mut self.tables,
            &mut self.entities,
            &self.input,
            &mut sys.ui,
        )?;

        // 5. Snapshot consumers are done; clear the frame edges.
        self.input.reset();

        // 6. Sprite flipbook playback.
        sys.anim.update(dt, &mut self.tables)?;

        // 7. Particle simulation; may create or destroy entities.
        sys.particle
            .update(dt, &mut self.tables, &mut self.entities)?;

        // 8. Render features accumulate draw calls; nothing submits yet.
        sys.render.update(dt, &self.tables)?;

        // 9. UI issues its overlay calls after the scene's.
        sys.ui.draw(dt, sys.render.queue_mut());

        // 10. Diagnostics.
        self.stats.print_verbose();
        self.stats.print_draw_call();
        self.stats.print_fps(self.fps.fps());
        self.stats.next_frame();

        // 11. Audio tick.
        sys.audio.advance_frame();

        // 12. Device flush; content calls = total minus pass overhead.
        let submitted = sys.render.flush(self.device.as_mut());
        let overhead = sys.render.pass_count();
        self.stats
            .record_draw_call(submitted as i64 - overhead as i64);

        Ok(FrameReport {
            delta: dt,
            fps: self.fps.fps(),
            draw_calls: self.stats.draw_call(),
            submitted,
        })
    }

    //--- destroy() --------------------------------------------------------

    /// Tears down every subsystem. Must be called exactly once, after
    /// the last update.
    pub fn destroy(&mut self) -> Result<(), EngineError> {
        match self.lifecycle {
            Lifecycle::Idle => return Err(EngineError::NotCreated { call: "destroy" }),
            Lifecycle::Shutdown => return Err(EngineError::AlreadyDestroyed),
            Lifecycle::Running => {}
        }
        let Some(mut sys) = self.systems.take() else {
            return Err(EngineError::NotCreated { call: "destroy" });
        };

        info!(target: "engine", "destroy");
        sys.render.destroy();
        self.device.destroy();
        sys.audio.destroy();
        // The remaining subsystems hold no device resources; dropping
        // `sys` here completes their teardown.

        self.lifecycle = Lifecycle::Shutdown;
        Ok(())
    }

    //--- resize() ---------------------------------------------------------

    /// Recomputes the camera viewport and movement bound and keeps the
    /// UI screen size in lockstep. Safe to call any number of times
    /// after `create`.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        match self.lifecycle {
            Lifecycle::Idle => return Err(EngineError::NotCreated { call: "resize" }),
            Lifecycle::Shutdown => return Err(EngineError::Shutdown { call: "resize" }),
            Lifecycle::Running => {}
        }
        let Some(sys) = self.systems.as_mut() else {
            return Err(EngineError::NotCreated { call: "resize" });
        };
        Self::apply_screen_size(sys, width as f32, height as f32);
        Ok(())
    }

    fn apply_screen_size(systems: &mut Systems, width: f32, height: f32) {
        let camera = systems.render.camera_mut();
        camera.set_viewport(width, height);
        camera.set_bound(Bound::UNBOUNDED);
        systems.ui.set_screen_size(width, height);
    }

    //--- Input Callbacks --------------------------------------------------
    //
    // Enqueue only: safe at any time, from any thread, including
    // between frames. Nothing here touches per-frame state.
    //

    pub fn key_event(&self, key: i32, pressed: bool) {
        self.input.set_key_event(key, pressed);
    }

    pub fn pointer_event(&self, key: i32, pressed: bool, x: f32, y: f32) {
        self.input.set_pointer_event(key, pressed, x, y);
    }

    /// Cloneable handle for delivering input from another thread.
    pub fn input_sender(&self) -> InputSender {
        self.input.sender()
    }

    //--- Accessors --------------------------------------------------------

    pub fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Main camera state, once the engine is created.
    pub fn camera(&self) -> Option<&Camera> {
        self.systems.as_ref().map(|sys| sys.render.camera())
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.systems.as_mut().map(|sys| sys.render.camera_mut())
    }

    /// Render subsystem, for registration diagnostics.
    pub fn render(&self) -> Option<&RenderSystem> {
        self.systems.as_ref().map(|sys| &sys.render)
    }

    pub fn ui_mut(&mut self) -> Option<&mut UiSystem> {
        self.systems.as_mut().map(|sys| &mut sys.ui)
    }

    pub fn input(&self) -> &InputSystem {
        &self.input
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut TableSet {
        &mut self.tables
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.stats.set_verbose(verbose);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::keys;
    use crate::core::script::Script;
    use crate::core::table::{ParticleRow, ScriptRow, SpriteRow, TransformRow};
    use crate::core::Entity;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine_800x600() -> Engine {
        let mut engine = EngineBuilder::new().with_size(800, 600).build().unwrap();
        engine.create(800.0 / 600.0).unwrap();
        engine
    }

    //=====================================================================
    // Builder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.width, 800);
        assert_eq!(builder.height, 600);
        assert_eq!(builder.capacities.len(), 7);
    }

    #[test]
    #[should_panic(expected = "viewport must be non-empty")]
    fn builder_rejects_empty_viewport() {
        EngineBuilder::new().with_size(0, 600);
    }

    #[test]
    fn builder_zero_table_capacity_is_a_build_error() {
        let result = EngineBuilder::new()
            .with_table_capacity(TableKind::Particle, 0)
            .build();
        assert_eq!(
            result.err(),
            Some(EngineError::Table(TableError::InvalidCapacity {
                kind: TableKind::Particle
            }))
        );
    }

    #[test]
    fn build_loads_all_seven_tables() {
        let engine = EngineBuilder::new().build().unwrap();
        assert_eq!(engine.tables().len(), 7);
        let kinds: Vec<_> = engine.tables().kinds().collect();
        assert_eq!(
            kinds,
            [
                TableKind::Script,
                TableKind::Tag,
                TableKind::Sprite,
                TableKind::Mesh,
                TableKind::Transform,
                TableKind::Text,
                TableKind::Particle,
            ]
        );
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn update_before_create_is_rejected() {
        let mut engine = EngineBuilder::new().build().unwrap();
        assert_eq!(
            engine.tick(0.016).err(),
            Some(EngineError::NotCreated { call: "update" })
        );
    }

    #[test]
    fn create_twice_is_rejected() {
        let mut engine = engine_800x600();
        assert_eq!(engine.create(1.0).err(), Some(EngineError::AlreadyCreated));
    }

    #[test]
    fn destroy_twice_is_rejected() {
        let mut engine = engine_800x600();
        engine.destroy().unwrap();
        assert_eq!(engine.destroy().err(), Some(EngineError::AlreadyDestroyed));
    }

    #[test]
    fn update_after_destroy_is_rejected() {
        let mut engine = engine_800x600();
        engine.destroy().unwrap();
        assert_eq!(
            engine.tick(0.016).err(),
            Some(EngineError::Shutdown { call: "update" })
        );
    }

    #[test]
    fn destroy_before_create_is_rejected() {
        let mut engine = EngineBuilder::new().build().unwrap();
        assert_eq!(
            engine.destroy().err(),
            Some(EngineError::NotCreated { call: "destroy" })
        );
    }

    //=====================================================================
    // Startup Scenario
    //=====================================================================

    #[test]
    fn startup_sets_camera_and_ui_from_configured_size() {
        let mut engine = engine_800x600();
        engine.resize(800, 600).unwrap();

        assert_eq!(engine.camera().unwrap().viewport(), (800.0, 600.0));
        let ui = engine.ui_mut().unwrap();
        assert_eq!(ui.screen_size(), (800.0, 600.0));
    }

    #[test]
    fn resize_restores_the_unbounded_default() {
        let mut engine = engine_800x600();

        // A host-side bound survives only until the next resize.
        engine
            .camera_mut()
            .unwrap()
            .set_bound(Bound::new(-1.0, 1.0, 1.0, -1.0));
        engine.resize(1024, 768).unwrap();

        let camera = engine.camera().unwrap();
        assert_eq!(camera.viewport(), (1024.0, 768.0));
        assert_eq!(camera.bound(), Bound::UNBOUNDED);
    }

    #[test]
    fn create_registers_builtin_renderers_and_features() {
        let engine = engine_800x600();
        let render = engine.render().unwrap();
        assert_eq!(render.renderer_names(), ["batch", "mesh"]);
        assert_eq!(
            render.feature_names(),
            ["sprite", "mesh", "text", "particle"]
        );
        assert_eq!(render.pass_count(), 2);
    }

    //=====================================================================
    // Frame Scenario
    //=====================================================================

    #[test]
    fn constant_delta_stabilizes_fps_near_sixty() {
        let mut engine = engine_800x600();

        let mut report = None;
        for _ in 0..60 {
            report = Some(engine.tick(0.016).unwrap());
        }
        let report = report.unwrap();

        assert!(
            (report.delta - 0.016).abs() < 1.0e-3,
            "smoothed delta {} should sit near 16ms",
            report.delta
        );
        assert!(
            (report.fps - 62.5).abs() < 3.0,
            "fps {} should sit near 60",
            report.fps
        );
    }

    #[test]
    fn draw_call_accounting_subtracts_pass_overhead() {
        let mut engine = engine_800x600();

        // Empty world: only the two per-camera passes submit.
        let report = engine.tick(0.016).unwrap();
        assert_eq!(report.submitted, 2);
        assert_eq!(report.draw_calls, 0);

        // One visible sprite batches into one content call.
        let e = engine.entities_mut().create();
        engine
            .tables_mut()
            .transforms_mut()
            .unwrap()
            .push(TransformRow::new(e, [0.0, 0.0]))
            .unwrap();
        engine
            .tables_mut()
            .sprites_mut()
            .unwrap()
            .push(SpriteRow::new(e, 8.0, 8.0))
            .unwrap();

        let report = engine.tick(0.016).unwrap();
        assert_eq!(report.submitted, 3);
        assert_eq!(report.draw_calls, 1);
    }

    #[test]
    fn ui_calls_layer_after_scene_calls() {
        struct Hud;
        impl SceneManager for Hud {
            fn update(&mut self, _dt: f32, env: &mut FrameEnv<'_>) {
                if let Some(context) = env.ui.context_mut(0) {
                    context.rect(0.0, 0.0, 64.0, 8.0, 0xffff_ffff);
                }
            }
        }

        let mut engine = EngineBuilder::new()
            .with_scene_manager(Box::new(Hud))
            .build()
            .unwrap();
        engine.create(800.0 / 600.0).unwrap();
        let e = engine.entities_mut().create();
        engine
            .tables_mut()
            .sprites_mut()
            .unwrap()
            .push(SpriteRow::new(e, 8.0, 8.0))
            .unwrap();

        // Sprite call + UI call + 2 passes.
        let report = engine.tick(0.016).unwrap();
        assert_eq!(report.submitted, 4);
        assert_eq!(report.draw_calls, 2);
    }

    //=====================================================================
    // Pipeline Order
    //=====================================================================

    struct TraceScenes {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl SceneManager for TraceScenes {
        fn setup(&mut self, _env: &mut FrameEnv<'_>) {
            self.log.borrow_mut().push("setup");
        }

        fn update(&mut self, _dt: f32, _env: &mut FrameEnv<'_>) {
            self.log.borrow_mut().push("scene");
        }
    }

    struct TraceScript {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Script for TraceScript {
        fn update(&mut self, _entity: Entity, _dt: f32, env: &mut FrameEnv<'_>) {
            self.log.borrow_mut().push("script");
            if env.input.key_just_pressed(keys::SPACE) {
                self.log.borrow_mut().push("space-edge");
            }
        }
    }

    #[test]
    fn scene_runs_before_scripts_every_frame() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut engine = EngineBuilder::new()
            .with_scene_manager(Box::new(TraceScenes { log: log.clone() }))
            .build()
            .unwrap();
        engine.create(1.0).unwrap();

        let e = engine.entities_mut().create();
        engine
            .tables_mut()
            .scripts_mut()
            .unwrap()
            .push(ScriptRow::new(e, Box::new(TraceScript { log: log.clone() })))
            .unwrap();

        engine.tick(0.016).unwrap();
        engine.tick(0.016).unwrap();

        assert_eq!(
            &*log.borrow(),
            &["setup", "scene", "script", "scene", "script"]
        );
    }

    #[test]
    fn input_edge_is_visible_to_scripts_for_exactly_one_frame() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut engine = EngineBuilder::new().build().unwrap();
        engine.create(1.0).unwrap();

        let e = engine.entities_mut().create();
        engine
            .tables_mut()
            .scripts_mut()
            .unwrap()
            .push(ScriptRow::new(e, Box::new(TraceScript { log: log.clone() })))
            .unwrap();

        engine.key_event(keys::SPACE, true);
        engine.tick(0.016).unwrap();
        engine.tick(0.016).unwrap();

        let edges = log
            .borrow()
            .iter()
            .filter(|entry| **entry == "space-edge")
            .count();
        assert_eq!(edges, 1, "edge must not survive the reset");
    }

    #[test]
    fn events_enqueued_mid_frame_latch_next_frame() {
        let mut engine = engine_800x600();

        engine.tick(0.016).unwrap();
        // Arrives after this frame's latch.
        engine.key_event(keys::KEY_W, true);
        assert!(!engine.input().key_pressed(keys::KEY_W));

        engine.tick(0.016).unwrap();
        assert!(engine.input().key_pressed(keys::KEY_W));
    }

    //=====================================================================
    // Subsystem Integration
    //=====================================================================

    #[test]
    fn particle_emitters_flow_through_the_frame() {
        let mut engine = engine_800x600();
        let e = engine.entities_mut().create();
        engine
            .tables_mut()
            .particles_mut()
            .unwrap()
            .push(ParticleRow::new(e, 32, 100.0, 1.0))
            .unwrap();

        let report = engine.tick(0.1).unwrap();
        // Emitter call + 2 passes. The smoothed delta is small on the
        // first frame but the spawn debt still yields particles.
        assert!(report.submitted >= 2);

        let live = engine.tables().particles().unwrap().rows()[0].live();
        assert!(live > 0, "emitter should have spawned");
    }

    #[test]
    fn audio_ticks_once_per_frame() {
        let mut engine = engine_800x600();
        for _ in 0..5 {
            engine.tick(0.016).unwrap();
        }
        assert_eq!(engine.stats().overlay_frame(), 5);
    }
}
