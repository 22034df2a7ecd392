//! Scene access for the measurement tools.
//!
//! Mesh ray casting, triangle lookup for vertex snapping, and the scene-level
//! reference state (3D cursor, unit system) that pointer resolution reads.

/// Mesh ray casting and triangle corner lookup behind the `SceneQuery` interface.
pub mod raycast;

pub use raycast::{BevyScene, SceneCursor, UnitSettings};
