use bevy::prelude::*;
use constants::render_settings::{
    CURSOR_GIZMO_COLOUR, CURSOR_GIZMO_SIZE, FLOOR_GRID_CELLS, FLOOR_GRID_COLOUR,
    MEASURE_ARC_COLOUR, MEASURE_ARC_SEGMENTS, MEASURE_LINE_COLOUR, MEASURE_TICK_LENGTH,
    MEASURE_VERTEX_RADIUS, PREVIEW_MARKER_COLOUR, PREVIEW_MARKER_RADIUS,
};

use super::assets::graph_library::{GraphWrapper, WrapperRegistry};
use super::geometry::MeasurementObject;
use super::scene::SceneCursor;
use crate::measure::align::reference_normal;
use crate::tools::measure::ActiveMeasurement;

/// Default arc radius when the measurement has no wrapper to read it from.
const FALLBACK_RADIUS: f32 = 0.5;

pub fn draw_floor_grid(mut gizmos: Gizmos) {
    gizmos.grid(
        Isometry3d::from_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        UVec2::splat(FLOOR_GRID_CELLS),
        Vec2::ONE,
        FLOOR_GRID_COLOUR,
    );
}

pub fn draw_scene_cursor(mut gizmos: Gizmos, cursor: Res<SceneCursor>) {
    let half = CURSOR_GIZMO_SIZE * 0.5;
    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        gizmos.line(
            cursor.location - axis * half,
            cursor.location + axis * half,
            CURSOR_GIZMO_COLOUR,
        );
    }
}

/// Marker under the pointer until the first point is placed.
pub fn draw_preview_marker(mut gizmos: Gizmos, active: Res<ActiveMeasurement>) {
    let Some(location) = active.preview_marker() else {
        return;
    };
    gizmos.sphere(
        Isometry3d::from_translation(location),
        PREVIEW_MARKER_RADIUS,
        PREVIEW_MARKER_COLOUR,
    );
}

/// Draw every measurement from its points and the current values of its graph inputs.
pub fn draw_measurements(
    mut gizmos: Gizmos,
    objects: Query<(Entity, &MeasurementObject)>,
    wrappers: Res<WrapperRegistry>,
) {
    for (entity, object) in &objects {
        let wrapper = wrappers.wrapper(MeasurementObject::geometry_id(entity));
        for &point in &object.points {
            gizmos.sphere(
                Isometry3d::from_translation(point),
                MEASURE_VERTEX_RADIUS,
                MEASURE_LINE_COLOUR,
            );
        }
        match object.points.as_slice() {
            &[start, end] => draw_distance(&mut gizmos, start, end, wrapper),
            &[first, vertex, last] => draw_angle(&mut gizmos, first, vertex, last, wrapper),
            _ => {}
        }
    }
}

fn draw_distance(gizmos: &mut Gizmos, start: Vec3, end: Vec3, wrapper: Option<&GraphWrapper>) {
    let Ok(tangent) = Dir3::new(end - start) else {
        return;
    };
    let rotation = wrapper
        .and_then(|w| w.value_named("Rotation"))
        .unwrap_or(0.0) as f32;
    let offset = wrapper.and_then(|w| w.value_named("Offset")).unwrap_or(0.0) as f32;

    let normal = Quat::from_axis_angle(*tangent, rotation.to_radians()) * reference_normal(*tangent);
    let shift = normal * offset;
    let tick = normal * MEASURE_TICK_LENGTH;

    gizmos.line(start + shift, end + shift, MEASURE_LINE_COLOUR);
    for point in [start, end] {
        gizmos.line(point, point + shift + tick, MEASURE_LINE_COLOUR);
    }
}

fn draw_angle(
    gizmos: &mut Gizmos,
    first: Vec3,
    vertex: Vec3,
    last: Vec3,
    wrapper: Option<&GraphWrapper>,
) {
    gizmos.line(vertex, first, MEASURE_LINE_COLOUR);
    gizmos.line(vertex, last, MEASURE_LINE_COLOUR);

    let (Ok(a), Ok(b)) = (Dir3::new(first - vertex), Dir3::new(last - vertex)) else {
        return;
    };
    let radius = wrapper
        .and_then(|w| w.value_named("Radius"))
        .map_or(FALLBACK_RADIUS, |r| r as f32);
    if radius <= 0.0 {
        return;
    }
    gizmos
        .short_arc_3d_between(vertex, vertex + *a * radius, vertex + *b * radius, MEASURE_ARC_COLOUR)
        .resolution(MEASURE_ARC_SEGMENTS);
}
