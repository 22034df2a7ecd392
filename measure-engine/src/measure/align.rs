use bevy::math::Vec3;
use constants::interaction::{
    ALIGN_MIN_PROJECTION_LENGTH, ALIGN_MIN_SEGMENT_LENGTH, ALIGN_PARALLEL_EPSILON,
};

/// Scene up axis. Rotation 0 orients a distance measurement towards it.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Direction a measurement with rotation 0 is offset towards: world up made
/// orthogonal to `tangent`, or world X when the tangent is vertical.
pub fn reference_normal(tangent: Vec3) -> Vec3 {
    if tangent.dot(WORLD_UP).abs() > 1.0 - ALIGN_PARALLEL_EPSILON {
        Vec3::X
    } else {
        (WORLD_UP - WORLD_UP.dot(tangent) * tangent).normalize()
    }
}

/// Rotation, in whole degrees about the segment `start -> end`, that lays a
/// distance measurement into the plane of a surface with normal `surface_normal`.
///
/// `None` when the endpoints coincide or the normal is (nearly) parallel to the
/// segment, where no alignment is defined.
pub fn alignment_rotation(start: Vec3, end: Vec3, surface_normal: Vec3) -> Option<i64> {
    let diff = end - start;
    if diff.length() < ALIGN_MIN_SEGMENT_LENGTH {
        return None;
    }
    let tangent = diff.normalize();
    let reference = reference_normal(tangent);

    let target = surface_normal.cross(tangent);
    if target.length() < ALIGN_MIN_PROJECTION_LENGTH {
        return None;
    }
    let target = target.normalize();

    let mut angle = reference.angle_between(target);
    if reference.cross(target).dot(tangent) < 0.0 {
        angle = -angle;
    }
    Some(angle.to_degrees().round() as i64)
}
