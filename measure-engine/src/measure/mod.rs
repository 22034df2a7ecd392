//! Interactive distance and angle measurement.
//!
//! This module is the host-agnostic core: it never touches the ECS. The Bevy
//! side (`crate::tools::measure`) samples input and scene state each frame,
//! wraps them in the [`host`] traits and drives a [`session::MeasureTool`].
//!
//! ## Pipeline per pointer sample
//!
//! 1. [`pointer::resolve_pointer`] casts a pick ray through the render region.
//! 2. A hit is captured by a nearby face vertex or edge midpoint when vertex
//!    snapping is on, otherwise the position is rounded to the adaptive grid
//!    ([`snapping`]). Misses land on the plane through the scene cursor.
//! 3. The tool variant ([`distance::DistanceTool`] or [`angle::AngleTool`])
//!    advances its phase and updates the backing geometry.
//!
//! Modifier + scroll edits and surface alignment write named inputs of the
//! measurement graph attached to the geometry ([`params`], [`align`]).

pub mod align;
pub mod angle;
pub mod distance;
pub mod host;
pub mod input;
pub mod keymap;
pub mod params;
pub mod pointer;
pub mod session;
pub mod settings;
pub mod snapping;

#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};

/// The measurement tools a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Distance,
    Angle,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Angle => "angle",
        }
    }
}
