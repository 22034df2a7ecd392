//! Interactive measurement tools and their Bevy integration.
//!
//! The measurement logic itself lives in [`crate::measure`] and never touches
//! the ECS. This module samples input, scene and camera state each frame and
//! hands them to the running session.
//!
//! ## Tool Manager Architecture
//!
//! The `ToolManager` resource maintains exclusive tool activation state:
//! - Only one tool can be active at a time
//! - Tools are activated via keyboard shortcuts or `ToolSelectionEvent` from other plugins
//! - A cancelled session deactivates its tool, a completed one restarts it
//!
//! ### Session Flow
//!
//! ```text
//! Keyboard (D / A) or API
//!   └─> ToolSelectionEvent
//!       └─> handle_tool_selection_events()
//!           └─> measure_session_system()
//!               ├─> invoke session for the active tool
//!               ├─> poll exit conditions (mode, view, tool switch)
//!               ├─> dispatch WindowEvents in arrival order
//!               └─> MeasureFinishedEvent / MeasureReportEvent
//! ```
//!
//! ## Available Tools
//!
//! ### Distance (`ToolType::Distance`)
//! - **Activation**: `D` key
//! - Two clicks place the endpoints; `E` aligns the dimension to the surface
//!   under the pointer; Ctrl/Shift + wheel change rotation and offset
//!
//! ### Angle (`ToolType::Angle`)
//! - **Activation**: `A` key
//! - Three clicks place first point, vertex and last point; Backspace undoes
//!   the vertex; Ctrl/Shift/Alt + wheel change offsets and arc radius
//!
//! `Tab` toggles object/edit mode. Leaving object mode cancels any running
//! measurement.

/// Key bindings overlay and the status line.
pub mod help_overlay;

/// Session driver, input translation and the plugin wiring everything together.
pub mod measure;

/// Exclusive tool activation and editor mode.
pub mod tool_manager;
