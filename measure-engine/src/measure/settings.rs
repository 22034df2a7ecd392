use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// User preferences consumed by the measurement tools. Read-only to the tools.
#[derive(Resource, Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureSettings {
    /// Rotation step per scroll notch, in degrees.
    pub angle_increment: f64,
    /// Offset/radius step per scroll notch, in world units.
    pub distance_increment: f64,
    pub show_help_overlay: bool,
    /// Help overlay position, pixels from the bottom-left corner.
    pub help_position: [f32; 2],
}

impl Default for MeasureSettings {
    fn default() -> Self {
        Self {
            angle_increment: 15.0,
            distance_increment: 0.1,
            show_help_overlay: true,
            help_position: [20.0, 20.0],
        }
    }
}

impl MeasureSettings {
    /// Angle steps are applied in whole degrees.
    pub fn angle_step(&self) -> f64 {
        self.angle_increment.trunc()
    }
}
