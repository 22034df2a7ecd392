//! Viewport camera for scene navigation.
//!
//! Orbit/pan/dolly controls on the middle mouse button and wheel, plus the
//! adapter that exposes a Bevy camera as a [`crate::measure::host::ViewProjection`].

pub mod viewport_camera;

pub use viewport_camera::{CameraView, NoCamera, ScrollCapture, ViewportCamera, camera_controller};
