//! Interactive distance and angle measurement for Bevy scenes.
//!
//! [`measure`] holds the host-agnostic measurement core, [`engine`] adapts
//! Bevy's meshes, cameras and assets to it, and [`tools`] drives sessions
//! from window input. Add [`MeasurementPlugin`] to an app with a 3D camera.

pub mod engine;
pub mod error;
pub mod measure;
pub mod tools;

pub use tools::measure::MeasurementPlugin;
