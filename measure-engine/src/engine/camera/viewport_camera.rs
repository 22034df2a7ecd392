use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

use crate::measure::host::{Region, ViewProjection};

/// Orbit camera state. The camera sits `distance` away from `focus_point`,
/// looking at it from `yaw`/`pitch`.
#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl ViewportCamera {
    pub fn new(focus_point: Vec3, distance: f32) -> Self {
        Self {
            focus_point,
            distance,
            ..default()
        }
    }

    fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn target_transform(&self) -> Transform {
        let rotation = self.view_rotation();
        let translation = self.focus_point + rotation * Vec3::Z * self.distance;
        Transform::from_translation(translation).with_rotation(rotation)
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 12.0,
            pitch: -0.6,
            yaw: 0.0,
        }
    }
}

/// Set by tools that consumed the wheel this frame so the camera does not also dolly.
#[derive(Resource, Default)]
pub struct ScrollCapture {
    pub lock_zoom_this_frame: bool,
}

/// Middle mouse orbits, Shift + middle mouse pans, wheel dollies toward the focus point.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mut capture: ResMut<ScrollCapture>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Middle) && mouse_delta != Vec2::ZERO {
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            let rotation = viewport_camera.view_rotation();
            let pan_speed = viewport_camera.distance * 0.0015;
            let right = rotation * Vec3::X;
            let up = rotation * Vec3::Y;
            viewport_camera.focus_point += (-right * mouse_delta.x + up * mouse_delta.y) * pan_speed;
        } else {
            let yaw_sens = 0.0035;
            let pitch_sens = 0.0030;
            viewport_camera.yaw += -mouse_delta.x * yaw_sens;
            viewport_camera.pitch += -mouse_delta.y * pitch_sens;
            viewport_camera.pitch = viewport_camera.pitch.clamp(-1.55, 1.55);
        }
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let scroll_accum: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();

    if capture.lock_zoom_this_frame {
        capture.lock_zoom_this_frame = false;
    } else if scroll_accum.abs() > f32::EPSILON {
        let factor = (1.0 - scroll_accum * 0.1).clamp(0.5, 1.5);
        viewport_camera.distance = (viewport_camera.distance * factor).clamp(0.5, 500.0);
    }

    let target = viewport_camera.target_transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}

/// A 3D camera seen through the measurement core's projection interface.
pub struct CameraView<'a> {
    pub camera: &'a Camera,
    pub transform: &'a GlobalTransform,
}

impl ViewProjection for CameraView<'_> {
    fn pick_ray(&self, _region: &Region, coord: Vec2) -> Option<Ray3d> {
        self.camera.viewport_to_world(self.transform, coord).ok()
    }

    fn world_to_region(&self, _region: &Region, world: Vec3) -> Option<Vec2> {
        self.camera.world_to_viewport(self.transform, world).ok()
    }

    fn region_to_world_at_depth(&self, region: &Region, coord: Vec2, depth: Vec3) -> Option<Vec3> {
        let ray = self.pick_ray(region, coord)?;
        let plane = InfinitePlane3d {
            normal: self.transform.forward(),
        };
        let distance = ray.intersect_plane(depth, plane)?;
        Some(ray.get_point(distance))
    }
}

/// Stand-in projection while no 3D camera exists. Every query fails.
pub struct NoCamera;

impl ViewProjection for NoCamera {
    fn pick_ray(&self, _region: &Region, _coord: Vec2) -> Option<Ray3d> {
        None
    }

    fn world_to_region(&self, _region: &Region, _world: Vec3) -> Option<Vec2> {
        None
    }

    fn region_to_world_at_depth(&self, _region: &Region, _coord: Vec2, _depth: Vec3) -> Option<Vec3> {
        None
    }
}
