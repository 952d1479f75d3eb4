//=========================================================================
// Engine Core
//
// The subsystems and shared state composed by the engine root:
//
//   table     shared component tables and their registry
//   entity    entity id allocation
//   camera    viewport and movement bound
//   stats     delta smoothing, FPS display, draw-call counters
//   input     pending-event buffer and per-frame snapshot
//   scene     external scene manager contract
//   script    per-entity behavior execution
//   anim      sprite flipbook playback
//   particle  emitter simulation bookkeeping
//   render    renderers, features, passes, draw queue
//   ui        immediate-mode overlay
//   audio     frame-synchronous audio tick
//
// The composition itself, including the fixed per-frame order these
// run in, lives in `crate::engine`.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod anim;
pub mod audio;
pub mod camera;
pub mod entity;
pub mod input;
pub mod particle;
pub mod render;
pub mod scene;
pub mod script;
pub mod stats;
pub mod table;
pub mod ui;

//=== Public API ==========================================================

pub use anim::AnimationSystem;
pub use audio::AudioSystem;
pub use camera::{Bound, Camera};
pub use entity::{Entity, EntityManager};
pub use input::{InputSender, InputSystem};
pub use particle::{ParticleRenderFeature, ParticleSystem};
pub use render::RenderSystem;
pub use scene::{FrameEnv, IdleSceneManager, SceneManager};
pub use script::{Script, ScriptSystem};
pub use stats::{FpsCounter, FrameStats};
pub use table::{TableError, TableKind, TableSet};
pub use ui::{UiContext, UiSystem};
