//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use cinder_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine root
pub use crate::engine::{Engine, EngineBuilder, EngineError, FrameReport};

// Tables and entities
pub use crate::core::entity::{Entity, EntityManager};
pub use crate::core::table::{
    MeshRow, ParticleRow, ScriptRow, SpriteRow, TableError, TableKind, TableSet, TagRow, TextRow,
    TransformRow,
};

// Camera and stats
pub use crate::core::camera::{Bound, Camera};
pub use crate::core::stats::{FpsCounter, FrameStats};

// Scene and script contracts
pub use crate::core::scene::{FrameEnv, IdleSceneManager, SceneManager};
pub use crate::core::script::Script;

// Input
pub use crate::core::input::{keys, InputSender, InputSystem};

// Render collaborators
pub use crate::core::render::{
    DrawCall, DrawLayer, DrawQueue, HeadlessDevice, RenderDevice, RenderFeature, Renderer,
    RendererKind, ShaderCatalog,
};

// UI
pub use crate::core::ui::{UiContext, UiSystem};

// Windowing host
pub use crate::platform::Platform;
