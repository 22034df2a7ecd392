//! Shared tuning constants for the measurement engine.

/// Thresholds and epsilons used by pointer resolution, snapping and point capture.
pub mod interaction;

/// Gizmo and overlay styling.
pub mod render_settings;
