//=========================================================================
// Component Tables
//
// Fixed-capacity, typed dense storage for the engine's shared game
// data, plus the registry (`TableSet`) that owns the full collection.
//
// Responsibilities:
// - Store one dense row list per component kind
// - Enforce the immutable capacity chosen at creation time
// - Reject duplicate or misconfigured tables at registry level
// - Hand the full ordered collection to consuming subsystems
//
// Notes:
// The registry is a closed set: every storable kind is a variant of
// `TableEntry`, and consumers reach their rows through statically
// typed accessors instead of downcasts. Writers follow a single-writer
// convention per kind; the registry itself does not police it.
//
//=========================================================================

//=== External Crates =====================================================

use thiserror::Error;

//=== Internal Modules ====================================================

use super::entity::Entity;
use super::script::Script;

//=== TableKind ===========================================================

/// The closed set of component table kinds known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Script,
    Tag,
    Sprite,
    Mesh,
    Transform,
    Text,
    Particle,
}

//=== TableError ==========================================================

/// Registry configuration and capacity errors.
///
/// Capacity overflow is a reported error, never a silent overwrite.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table capacity must be positive (kind: {kind:?})")]
    InvalidCapacity { kind: TableKind },

    #[error("table {kind:?} is already registered")]
    Duplicate { kind: TableKind },

    #[error("table {kind:?} is missing from the registry")]
    Missing { kind: TableKind },

    #[error("table {kind:?} is full (capacity {capacity})")]
    CapacityExceeded { kind: TableKind, capacity: usize },
}

//=== Row Types ===========================================================

/// World placement of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRow {
    pub entity: Entity,
    pub position: [f32; 2],
    pub rotation: f32,
    pub scale: [f32; 2],
}

impl TransformRow {
    pub fn new(entity: Entity, position: [f32; 2]) -> Self {
        Self {
            entity,
            position,
            rotation: 0.0,
            scale: [1.0, 1.0],
        }
    }
}

/// A textured quad, with optional flipbook animation state.
///
/// The animation system is the sole writer of the `frame*` fields;
/// the render path only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteRow {
    pub entity: Entity,
    pub width: f32,
    pub height: f32,
    pub color: u32,
    pub texture: u16,
    pub frame: u16,
    pub frame_count: u16,
    pub frame_rate: f32,
    pub frame_clock: f32,
    pub playing: bool,
    pub visible: bool,
}

impl SpriteRow {
    pub fn new(entity: Entity, width: f32, height: f32) -> Self {
        Self {
            entity,
            width,
            height,
            color: 0xffff_ffff,
            texture: 0,
            frame: 0,
            frame_count: 1,
            frame_rate: 0.0,
            frame_clock: 0.0,
            playing: false,
            visible: true,
        }
    }

    /// Configures flipbook playback over `frame_count` frames at
    /// `frame_rate` frames per second.
    pub fn with_flipbook(mut self, frame_count: u16, frame_rate: f32) -> Self {
        self.frame_count = frame_count;
        self.frame_rate = frame_rate;
        self.playing = frame_count > 1;
        self
    }
}

/// A mesh instance reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRow {
    pub entity: Entity,
    pub mesh: u16,
    pub material: u16,
    pub visible: bool,
}

impl MeshRow {
    pub fn new(entity: Entity, mesh: u16) -> Self {
        Self {
            entity,
            mesh,
            material: 0,
            visible: true,
        }
    }
}

/// A run of text anchored to an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRow {
    pub entity: Entity,
    pub content: String,
    pub size: f32,
    pub color: u32,
    pub visible: bool,
}

impl TextRow {
    pub fn new(entity: Entity, content: impl Into<String>) -> Self {
        Self {
            entity,
            content: content.into(),
            size: 16.0,
            color: 0xffff_ffff,
            visible: true,
        }
    }
}

/// A free-form name attached to an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TagRow {
    pub entity: Entity,
    pub name: String,
}

impl TagRow {
    pub fn new(entity: Entity, name: impl Into<String>) -> Self {
        Self {
            entity,
            name: name.into(),
        }
    }
}

/// Per-emitter particle bookkeeping.
///
/// `ages` holds one age per live particle, bounded by `capacity`.
/// The particle simulation system is the sole writer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleRow {
    pub entity: Entity,
    pub capacity: usize,
    pub spawn_rate: f32,
    pub spawn_debt: f32,
    pub particle_life: f32,
    pub age: f32,
    pub duration: f32,
    pub ages: Vec<f32>,
}

impl ParticleRow {
    pub fn new(entity: Entity, capacity: usize, spawn_rate: f32, particle_life: f32) -> Self {
        Self {
            entity,
            capacity,
            spawn_rate,
            spawn_debt: 0.0,
            particle_life,
            age: 0.0,
            duration: f32::INFINITY,
            ages: Vec::new(),
        }
    }

    /// Limits the emitter to `duration` seconds of spawning, after which
    /// it drains and is retired by the simulation.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Number of currently live particles.
    pub fn live(&self) -> usize {
        self.ages.len()
    }
}

/// A behavior instance bound to an entity.
pub struct ScriptRow {
    pub entity: Entity,
    pub script: Box<dyn Script>,
}

impl ScriptRow {
    pub fn new(entity: Entity, script: Box<dyn Script>) -> Self {
        Self { entity, script }
    }
}

//=== Table ===============================================================

/// Fixed-capacity dense store for one row type.
///
/// The capacity is chosen once at creation and never changes. Backing
/// storage grows on demand; `capacity` is the logical bound enforced
/// on insertion.
pub struct Table<T> {
    kind: TableKind,
    capacity: usize,
    rows: Vec<T>,
}

impl<T> Table<T> {
    fn new(kind: TableKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    //--- push() -----------------------------------------------------------
    //
    // Appends a row and returns its index. A full table reports
    // `CapacityExceeded` and leaves the store untouched.
    //
    pub fn push(&mut self, row: T) -> Result<usize, TableError> {
        if self.rows.len() >= self.capacity {
            return Err(TableError::CapacityExceeded {
                kind: self.kind,
                capacity: self.capacity,
            });
        }
        self.rows.push(row);
        Ok(self.rows.len() - 1)
    }

    /// Removes the row at `index` by swapping in the last row.
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.rows.swap_remove(index)
    }

    /// Keeps only the rows for which `keep` returns `true`.
    pub fn retain(&mut self, keep: impl FnMut(&mut T) -> bool) {
        self.rows.retain_mut(keep);
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [T] {
        &mut self.rows
    }

    //--- detach_rows() / attach_rows() -------------------------------------
    //
    // Temporarily takes the row list out of the table so a consumer can
    // iterate it while mutating other tables. Rows pushed while detached
    // are kept; the detached batch is spliced back in front of them.
    //
    pub(crate) fn detach_rows(&mut self) -> Vec<T> {
        std::mem::take(&mut self.rows)
    }

    pub(crate) fn attach_rows(&mut self, mut detached: Vec<T>) -> Result<(), TableError> {
        if detached.len() + self.rows.len() > self.capacity {
            return Err(TableError::CapacityExceeded {
                kind: self.kind,
                capacity: self.capacity,
            });
        }
        std::mem::swap(&mut self.rows, &mut detached);
        self.rows.append(&mut detached);
        Ok(())
    }
}

//=== TableEntry ==========================================================

/// One registered table, tagged by kind.
pub enum TableEntry {
    Script(Table<ScriptRow>),
    Tag(Table<TagRow>),
    Sprite(Table<SpriteRow>),
    Mesh(Table<MeshRow>),
    Transform(Table<TransformRow>),
    Text(Table<TextRow>),
    Particle(Table<ParticleRow>),
}

impl TableEntry {
    pub fn kind(&self) -> TableKind {
        match self {
            TableEntry::Script(_) => TableKind::Script,
            TableEntry::Tag(_) => TableKind::Tag,
            TableEntry::Sprite(_) => TableKind::Sprite,
            TableEntry::Mesh(_) => TableKind::Mesh,
            TableEntry::Transform(_) => TableKind::Transform,
            TableEntry::Text(_) => TableKind::Text,
            TableEntry::Particle(_) => TableKind::Particle,
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            TableEntry::Script(t) => t.capacity(),
            TableEntry::Tag(t) => t.capacity(),
            TableEntry::Sprite(t) => t.capacity(),
            TableEntry::Mesh(t) => t.capacity(),
            TableEntry::Transform(t) => t.capacity(),
            TableEntry::Text(t) => t.capacity(),
            TableEntry::Particle(t) => t.capacity(),
        }
    }
}

//=== TableSet ============================================================

//--- Accessor boilerplate ------------------------------------------------
//
// One statically typed pair of accessors per table kind. A missing
// table reports `TableError::Missing` instead of panicking, so callers
// can validate their requirements once at construction.
//
macro_rules! table_accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $row:ty) => {
        pub fn $get(&self) -> Result<&Table<$row>, TableError> {
            self.entries
                .iter()
                .find_map(|entry| match entry {
                    TableEntry::$variant(table) => Some(table),
                    _ => None,
                })
                .ok_or(TableError::Missing {
                    kind: TableKind::$variant,
                })
        }

        pub fn $get_mut(&mut self) -> Result<&mut Table<$row>, TableError> {
            self.entries
                .iter_mut()
                .find_map(|entry| match entry {
                    TableEntry::$variant(table) => Some(table),
                    _ => None,
                })
                .ok_or(TableError::Missing {
                    kind: TableKind::$variant,
                })
        }
    };
}

/// Ordered registry of component tables.
///
/// Tables are created once during engine construction, each with an
/// immutable capacity. Every kind appears at most once; creation order
/// is preserved but carries no meaning.
#[derive(Default)]
pub struct TableSet {
    entries: Vec<TableEntry>,
}

impl TableSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    //--- create_table() ---------------------------------------------------
    //
    // Allocates a fixed-capacity store for `kind`. A zero capacity or a
    // duplicate kind is a configuration error.
    //
    pub fn create_table(&mut self, kind: TableKind, capacity: usize) -> Result<(), TableError> {
        if capacity == 0 {
            return Err(TableError::InvalidCapacity { kind });
        }
        if self.contains(kind) {
            return Err(TableError::Duplicate { kind });
        }

        let entry = match kind {
            TableKind::Script => TableEntry::Script(Table::new(kind, capacity)),
            TableKind::Tag => TableEntry::Tag(Table::new(kind, capacity)),
            TableKind::Sprite => TableEntry::Sprite(Table::new(kind, capacity)),
            TableKind::Mesh => TableEntry::Mesh(Table::new(kind, capacity)),
            TableKind::Transform => TableEntry::Transform(Table::new(kind, capacity)),
            TableKind::Text => TableEntry::Text(Table::new(kind, capacity)),
            TableKind::Particle => TableEntry::Particle(Table::new(kind, capacity)),
        };
        self.entries.push(entry);
        Ok(())
    }

    pub fn contains(&self, kind: TableKind) -> bool {
        self.entries.iter().any(|entry| entry.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kinds in creation order.
    pub fn kinds(&self) -> impl Iterator<Item = TableKind> + '_ {
        self.entries.iter().map(TableEntry::kind)
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    //--- require() --------------------------------------------------------
    //
    // Validates that every kind in `kinds` is registered. Subsystems
    // call this once at construction so a missing table surfaces before
    // the first frame instead of in the middle of one.
    //
    pub fn require(&self, kinds: &[TableKind]) -> Result<(), TableError> {
        for &kind in kinds {
            if !self.contains(kind) {
                return Err(TableError::Missing { kind });
            }
        }
        Ok(())
    }

    //--- Typed accessors --------------------------------------------------

    table_accessors!(scripts, scripts_mut, Script, ScriptRow);
    table_accessors!(tags, tags_mut, Tag, TagRow);
    table_accessors!(sprites, sprites_mut, Sprite, SpriteRow);
    table_accessors!(meshes, meshes_mut, Mesh, MeshRow);
    table_accessors!(transforms, transforms_mut, Transform, TransformRow);
    table_accessors!(texts, texts_mut, Text, TextRow);
    table_accessors!(particles, particles_mut, Particle, ParticleRow);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::EntityManager;

    fn full_set() -> TableSet {
        let mut tables = TableSet::new();
        for kind in [
            TableKind::Script,
            TableKind::Tag,
            TableKind::Sprite,
            TableKind::Mesh,
            TableKind::Transform,
            TableKind::Text,
            TableKind::Particle,
        ] {
            tables.create_table(kind, 8).unwrap();
        }
        tables
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut tables = TableSet::new();
        assert_eq!(
            tables.create_table(TableKind::Sprite, 0),
            Err(TableError::InvalidCapacity {
                kind: TableKind::Sprite
            })
        );
        assert!(tables.is_empty());
    }

    #[test]
    fn duplicate_kind_is_rejected() {
        let mut tables = TableSet::new();
        tables.create_table(TableKind::Sprite, 4).unwrap();
        assert_eq!(
            tables.create_table(TableKind::Sprite, 4),
            Err(TableError::Duplicate {
                kind: TableKind::Sprite
            })
        );
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn full_configuration_registers_seven_kinds() {
        let tables = full_set();
        assert_eq!(tables.len(), 7);
        for entry in tables.entries() {
            assert_eq!(entry.capacity(), 8);
        }
        assert!(tables.require(&[TableKind::Sprite, TableKind::Particle]).is_ok());
    }

    #[test]
    fn require_reports_missing_kind() {
        let mut tables = TableSet::new();
        tables.create_table(TableKind::Sprite, 4).unwrap();
        assert_eq!(
            tables.require(&[TableKind::Sprite, TableKind::Text]),
            Err(TableError::Missing {
                kind: TableKind::Text
            })
        );
    }

    #[test]
    fn push_past_capacity_is_an_error() {
        let mut tables = TableSet::new();
        tables.create_table(TableKind::Tag, 2).unwrap();
        let mut entities = EntityManager::new();

        let table = tables.tags_mut().unwrap();
        table.push(TagRow::new(entities.create(), "a")).unwrap();
        table.push(TagRow::new(entities.create(), "b")).unwrap();
        assert_eq!(
            table.push(TagRow::new(entities.create(), "c")),
            Err(TableError::CapacityExceeded {
                kind: TableKind::Tag,
                capacity: 2
            })
        );
        assert_eq!(table.len(), 2, "failed push must not grow the table");
    }

    #[test]
    fn detach_and_attach_round_trip() {
        let mut tables = TableSet::new();
        tables.create_table(TableKind::Tag, 4).unwrap();
        let mut entities = EntityManager::new();

        let table = tables.tags_mut().unwrap();
        table.push(TagRow::new(entities.create(), "a")).unwrap();

        let batch = table.detach_rows();
        assert!(table.is_empty());

        // A row added while the batch is detached survives the re-attach.
        table.push(TagRow::new(entities.create(), "b")).unwrap();
        table.attach_rows(batch).unwrap();

        let names: Vec<_> = table.rows().iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn attach_respects_capacity() {
        let mut tables = TableSet::new();
        tables.create_table(TableKind::Tag, 1).unwrap();
        let mut entities = EntityManager::new();

        let table = tables.tags_mut().unwrap();
        table.push(TagRow::new(entities.create(), "a")).unwrap();
        let batch = table.detach_rows();
        table.push(TagRow::new(entities.create(), "b")).unwrap();

        assert!(table.attach_rows(batch).is_err());
    }
}
