//=========================================================================
// Script System
//
// Drives per-entity behavior objects stored in the script table.
// Scripts run after the scene manager, inside the window where the
// input snapshot is stable, and may mutate any table they own by
// convention.
//
// Notes:
// The script batch is detached from its table while running, so a
// script can freely push rows into other tables (including spawning
// new scripts) without aliasing the list being iterated.
//
//=========================================================================

//=== Internal Modules ====================================================

use super::entity::{Entity, EntityManager};
use super::input::InputSystem;
use super::scene::FrameEnv;
use super::table::{TableError, TableKind, TableSet};
use super::ui::UiSystem;

//=== Script ==============================================================

/// A behavior bound to one entity, advanced once per frame.
pub trait Script {
    fn update(&mut self, entity: Entity, dt: f32, env: &mut FrameEnv<'_>);
}

//=== ScriptSystem ========================================================

/// Runs every script row once per frame.
pub struct ScriptSystem;

impl ScriptSystem {
    pub fn new() -> Self {
        Self
    }

    /// Validates that the script table exists in the registry.
    pub fn require_tables(&self, tables: &TableSet) -> Result<(), TableError> {
        tables.require(&[TableKind::Script])
    }

    //--- update() ---------------------------------------------------------
    //
    // Detaches the script rows, runs each against a fresh environment
    // borrow, then splices the batch back. Rows added by scripts during
    // the run land behind the existing batch.
    //
    pub fn update(
        &mut self,
        dt: f32,
        tables: &mut TableSet,
        entities: &mut EntityManager,
        input: &InputSystem,
        ui: &mut UiSystem,
    ) -> Result<(), TableError> {
        let mut batch = tables.scripts_mut()?.detach_rows();

        for row in batch.iter_mut() {
            let mut env = FrameEnv {
                tables: &mut *tables,
                entities: &mut *entities,
                input,
                ui: &mut *ui,
            };
            row.script.update(row.entity, dt, &mut env);
        }

        tables.scripts_mut()?.attach_rows(batch)
    }
}

impl Default for ScriptSystem {
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
    use crate::core::render::RendererKind;
    use crate::core::table::{ScriptRow, TransformRow};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Mover {
        speed: f32,
    }

    impl Script for Mover {
        fn update(&mut self, entity: Entity, dt: f32, env: &mut FrameEnv<'_>) {
            let transforms = env.tables.transforms_mut().unwrap();
            if let Some(row) = transforms.rows_mut().iter_mut().find(|r| r.entity == entity) {
                row.position[0] += self.speed * dt;
            }
        }
    }

    struct Recorder {
        log: Rc<RefCell<Vec<f32>>>,
    }

    impl Script for Recorder {
        fn update(&mut self, _entity: Entity, dt: f32, _env: &mut FrameEnv<'_>) {
            self.log.borrow_mut().push(dt);
        }
    }

    fn fixture() -> (TableSet, EntityManager, InputSystem, UiSystem) {
        let mut tables = TableSet::new();
        tables.create_table(TableKind::Script, 8).unwrap();
        tables.create_table(TableKind::Transform, 8).unwrap();
        (
            tables,
            EntityManager::new(),
            InputSystem::new(),
            UiSystem::new(RendererKind::Mesh),
        )
    }

    #[test]
    fn missing_script_table_is_reported() {
        let tables = TableSet::new();
        let system = ScriptSystem::new();
        assert_eq!(
            system.require_tables(&tables),
            Err(TableError::Missing {
                kind: TableKind::Script
            })
        );
    }

    #[test]
    fn scripts_mutate_other_tables() {
        let (mut tables, mut entities, input, mut ui) = fixture();
        let e = entities.create();

        tables
            .transforms_mut()
            .unwrap()
            .push(TransformRow::new(e, [0.0, 0.0]))
            .unwrap();
        tables
            .scripts_mut()
            .unwrap()
            .push(ScriptRow::new(e, Box::new(Mover { speed: 10.0 })))
            .unwrap();

        let mut system = ScriptSystem::new();
        system
            .update(0.5, &mut tables, &mut entities, &input, &mut ui)
            .unwrap();

        let x = tables.transforms().unwrap().rows()[0].position[0];
        assert!((x - 5.0).abs() < 1.0e-6);
        assert_eq!(tables.scripts().unwrap().len(), 1, "batch re-attached");
    }

    #[test]
    fn every_script_runs_once_with_frame_delta() {
        let (mut tables, mut entities, input, mut ui) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..3 {
            let e = entities.create();
            tables
                .scripts_mut()
                .unwrap()
                .push(ScriptRow::new(e, Box::new(Recorder { log: log.clone() })))
                .unwrap();
        }

        let mut system = ScriptSystem::new();
        system
            .update(0.016, &mut tables, &mut entities, &input, &mut ui)
            .unwrap();

        assert_eq!(&*log.borrow(), &[0.016, 0.016, 0.016]);
    }
}
