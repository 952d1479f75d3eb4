//=========================================================================
// Scene Manager Contract
//
// The engine drives game state through an external scene manager: it
// is bound once at creation and advanced once per frame, immediately
// after the input latch. What a scene manager does internally (state
// machines, menus, level flow) is the host application's business.
//
// Scenes receive a `FrameEnv` instead of reaching for a process-wide
// engine instance; everything a scene may touch is borrowed in
// explicitly.
//
//=========================================================================

//=== Internal Modules ====================================================

use super::entity::EntityManager;
use super::input::InputSystem;
use super::table::TableSet;
use super::ui::UiSystem;

//=== FrameEnv ============================================================

/// Borrowed view of the engine state a scene or script may use.
///
/// - `tables`: the shared component tables (single-writer convention
///   per kind applies)
/// - `entities`: the entity allocator
/// - `input`: the frame's latched input snapshot, read-only
/// - `ui`: the immediate-mode UI system, for queueing this frame's
///   widgets
pub struct FrameEnv<'a> {
    pub tables: &'a mut TableSet,
    pub entities: &'a mut EntityManager,
    pub input: &'a InputSystem,
    pub ui: &'a mut UiSystem,
}

//=== SceneManager ========================================================

/// External state driver invoked once per frame.
///
/// `setup` is called exactly once while the engine is being created,
/// after all tables and subsystems exist. `update` runs every frame
/// and may read the input snapshot latched for that frame.
pub trait SceneManager {
    /// Binds the manager to the engine. Default implementation does
    /// nothing.
    fn setup(&mut self, _env: &mut FrameEnv<'_>) {}

    /// Advances game state by `dt` seconds.
    fn update(&mut self, dt: f32, env: &mut FrameEnv<'_>);
}

//=== IdleSceneManager ====================================================

/// Scene manager that does nothing; the default until a host installs
/// its own.
#[derive(Debug, Default)]
pub struct IdleSceneManager;

impl SceneManager for IdleSceneManager {
    fn update(&mut self, _dt: f32, _env: &mut FrameEnv<'_>) {}
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::RendererKind;

    #[test]
    fn idle_manager_leaves_state_untouched() {
        let mut tables = TableSet::new();
        let mut entities = EntityManager::new();
        let input = InputSystem::new();
        let mut ui = UiSystem::new(RendererKind::Mesh);

        let mut manager = IdleSceneManager;
        let mut env = FrameEnv {
            tables: &mut tables,
            entities: &mut entities,
            input: &input,
            ui: &mut ui,
        };
        manager.setup(&mut env);
        manager.update(0.016, &mut env);

        assert_eq!(entities.count(), 0);
        assert!(tables.is_empty());
    }
}
