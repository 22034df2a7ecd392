pub mod assets;
pub mod camera;
pub mod geometry;
pub mod gizmos;
pub mod scene;
