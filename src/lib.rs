//=========================================================================
// Cinder Engine — Library Root
//
// This crate defines the public API surface of the Cinder Engine
// core: the composition root that owns the shared component tables
// and the fixed set of subsystems, and the ordered frame pipeline
// that ties them together.
//
// Responsibilities:
// - Expose the engine root (`Engine`, `EngineBuilder`) and its host
//   lifecycle surface
// - Expose the subsystem and collaborator seams under `core`
// - Provide a Winit-backed host under `platform` for applications
//   that want a ready-made window loop
//
// Typical usage:
// ```no_run
// use cinder_engine::{EngineBuilder, platform::Platform};
//
// fn main() {
//     let engine = EngineBuilder::new()
//         .with_size(800, 600)
//         .with_title("demo")
//         .build()
//         .expect("engine configuration");
//     Platform::new(engine).run().expect("event loop");
// }
// ```
//
// Hosts with their own loop skip `platform` and call `create`,
// `update`, `resize` and `destroy` directly.
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the subsystems and shared state; `platform` the
// optional windowing host. Both are public: applications register
// scene managers, scripts and render collaborators through them.
//
pub mod core;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the root type; its public pieces are re-exported
// below so users never need the module path.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError, FrameReport};
