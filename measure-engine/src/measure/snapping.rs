use bevy::math::Vec3;
use bevy::prelude::Resource;
use constants::interaction::{
    GRID_FALLBACK_SCALE, GRID_MIN_PIXELS_PER_UNIT, GRID_TARGET_PIXEL_SPACING,
};
use serde::{Deserialize, Serialize};

use super::host::{Region, ViewProjection};

/// Host snapping toggles.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Master switch, inverted while Ctrl is held.
    pub enabled: bool,
    /// Round positions to the adaptive grid.
    pub grid: bool,
    /// Capture face vertices and edge midpoints under the pointer.
    pub vertex: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            grid: true,
            vertex: true,
        }
    }
}

/// Snapping inputs for a single pointer sample.
pub struct SnapContext<'a> {
    pub region: &'a Region,
    pub view: &'a dyn ViewProjection,
    pub settings: SnapSettings,
    /// Ctrl held for this sample: flips `settings.enabled`.
    pub invert: bool,
}

impl SnapContext<'_> {
    pub fn enabled(&self) -> bool {
        self.settings.enabled != self.invert
    }

    pub fn grid_active(&self) -> bool {
        self.enabled() && self.settings.grid
    }

    pub fn vertex_active(&self) -> bool {
        self.enabled() && self.settings.vertex
    }
}

/// Grid cell size that keeps grid lines roughly `GRID_TARGET_PIXEL_SPACING` apart
/// on screen around `point`.
pub fn adaptive_grid_scale(
    point: Vec3,
    region: &Region,
    view: &dyn ViewProjection,
    unit_scale: Option<f32>,
) -> f32 {
    let mut scale = GRID_FALLBACK_SCALE;

    let projected = view
        .world_to_region(region, point)
        .zip(view.world_to_region(region, point + Vec3::X));
    if let Some((a, b)) = projected {
        let pixels_per_unit = a.distance(b);
        if pixels_per_unit > GRID_MIN_PIXELS_PER_UNIT {
            let raw_step = GRID_TARGET_PIXEL_SPACING / pixels_per_unit;
            scale = 10f32.powf(raw_step.log10().round());
        }
    }

    if let Some(unit) = unit_scale {
        scale *= unit;
    }
    scale
}

/// Round `point` to the adaptive grid when grid snapping is active, otherwise return it unchanged.
pub fn snap_point(point: Vec3, ctx: &SnapContext, unit_scale: Option<f32>) -> Vec3 {
    if !ctx.grid_active() {
        return point;
    }
    let scale = adaptive_grid_scale(point, ctx.region, ctx.view, unit_scale);
    round_to_grid(point, scale)
}

pub fn round_to_grid(point: Vec3, scale: f32) -> Vec3 {
    (point / scale).round() * scale
}
