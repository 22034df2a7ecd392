use bevy::math::{Vec2, Vec3};
use constants::interaction::VERTEX_SNAP_PIXEL_THRESHOLD;

use super::host::{RaycastHit, Region, SceneQuery, ViewArea, ViewProjection};
use super::snapping::{SnapContext, SnapSettings, snap_point};
use crate::error::{MeasureError, MeasureResult};

/// A pointer sample mapped into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPoint {
    pub location: Vec3,
    /// Scene hit under the pointer, `None` on a miss.
    pub hit: Option<RaycastHit>,
    pub vertex_snapped: bool,
}

/// Map a window-space pointer position to a world position.
///
/// The render region of `area` is authoritative even when the event arrived
/// over a panel. Fails only when no pick ray can be built.
pub fn resolve_pointer(
    scene: &mut dyn SceneQuery,
    view: &dyn ViewProjection,
    area: &ViewArea,
    cursor: Vec2,
    settings: SnapSettings,
    ctrl: bool,
) -> MeasureResult<ResolvedPoint> {
    let region = area
        .render_region()
        .ok_or(MeasureError::Resolution("view area has no render region"))?;
    if region.is_degenerate() {
        return Err(MeasureError::Resolution("render region has zero size"));
    }

    let coord = region.to_local(cursor);
    let ray = view
        .pick_ray(region, coord)
        .ok_or(MeasureError::Resolution("pick ray could not be constructed"))?;

    let snap = SnapContext {
        region,
        view,
        settings,
        invert: ctrl,
    };

    let hit = scene.raycast(ray);
    let (location, vertex_snapped) = match &hit {
        Some(hit) => {
            let snapped = if snap.vertex_active() {
                snap_to_face_feature(scene, view, region, coord, hit)
            } else {
                None
            };
            match snapped {
                Some(vertex) => (vertex, true),
                None => (hit.point, false),
            }
        }
        None => {
            let depth = scene.cursor_location();
            let location = view
                .region_to_world_at_depth(region, coord, depth)
                .ok_or(MeasureError::Resolution("pointer does not meet the cursor plane"))?;
            (location, false)
        }
    };

    let location = if vertex_snapped {
        location
    } else {
        snap_point(location, &snap, scene.unit_scale())
    };

    Ok(ResolvedPoint {
        location,
        hit,
        vertex_snapped,
    })
}

/// Nearest vertex or edge midpoint of the struck face, if it lies within the
/// pixel threshold of the pointer.
fn snap_to_face_feature(
    scene: &dyn SceneQuery,
    view: &dyn ViewProjection,
    region: &Region,
    coord: Vec2,
    hit: &RaycastHit,
) -> Option<Vec3> {
    let face_index = hit.face_index?;
    let corners = scene.face_vertices(hit.surface, face_index)?;
    if corners.is_empty() {
        return None;
    }

    let to_local = hit.surface_transform.inverse();
    let local_hit = to_local.transform_point3(hit.point);

    let nearest = face_candidates(&corners)
        .min_by(|a, b| {
            a.distance_squared(local_hit)
                .total_cmp(&b.distance_squared(local_hit))
        })?;

    let world = hit.surface_transform.transform_point3(nearest);
    let screen = view.world_to_region(region, world)?;
    (screen.distance(coord) < VERTEX_SNAP_PIXEL_THRESHOLD).then_some(world)
}

/// Each corner followed by the midpoint of the edge to the next corner.
fn face_candidates(corners: &[Vec3]) -> impl Iterator<Item = Vec3> + '_ {
    corners.iter().enumerate().flat_map(move |(i, &current)| {
        let next = corners[(i + 1) % corners.len()];
        [current, (current + next) * 0.5]
    })
}
