//! In-memory host services for exercising the measurement core without an app.

use std::collections::{HashMap, HashSet};

use bevy::math::{Dir3, Mat4, Ray3d, Vec2, Vec3};
use constants::interaction::{ANGLE_GRAPH_NAME, DISTANCE_GRAPH_NAME};

use super::host::{
    GeometryId, GeometryService, Host, Region, SceneQuery, SurfaceRef, ViewArea, ViewProjection,
    WrapperService,
};
use super::params::{InputDecl, InputValue, SocketKind};
use crate::error::{MeasureError, MeasureResult};

const VIEW_CENTER: Vec2 = Vec2::new(400.0, 300.0);

/// Top-down orthographic view looking along -Z. World X/Y map linearly onto
/// region pixels around the region centre.
#[derive(Debug, Clone, Copy)]
pub struct OrthoView {
    pub pixels_per_unit: f32,
}

impl OrthoView {
    pub fn new(pixels_per_unit: f32) -> Self {
        Self { pixels_per_unit }
    }

    /// Window position of a world point, for the regions returned by [`test_region`].
    pub fn window_point(&self, world: Vec3) -> Vec2 {
        VIEW_CENTER + world.truncate() * self.pixels_per_unit
    }

    /// World point on the z = 0 plane under a region-local coordinate.
    pub fn world_point(&self, coord: Vec2) -> Vec3 {
        ((coord - VIEW_CENTER) / self.pixels_per_unit).extend(0.0)
    }
}

impl ViewProjection for OrthoView {
    fn pick_ray(&self, _region: &Region, coord: Vec2) -> Option<Ray3d> {
        if self.pixels_per_unit <= 0.0 {
            return None;
        }
        let origin = ((coord - VIEW_CENTER) / self.pixels_per_unit).extend(100.0);
        Some(Ray3d::new(origin, Dir3::NEG_Z))
    }

    fn world_to_region(&self, _region: &Region, world: Vec3) -> Option<Vec2> {
        Some(VIEW_CENTER + world.truncate() * self.pixels_per_unit)
    }

    fn region_to_world_at_depth(&self, _region: &Region, coord: Vec2, depth: Vec3) -> Option<Vec3> {
        if self.pixels_per_unit <= 0.0 {
            return None;
        }
        Some(((coord - VIEW_CENTER) / self.pixels_per_unit).extend(depth.z))
    }
}

pub fn test_region() -> Region {
    Region::viewport(Vec2::ZERO, Vec2::new(800.0, 600.0))
}

/// 800x600 view with a 40 px side panel along the right edge.
pub fn test_area() -> ViewArea {
    ViewArea::single(Vec2::ZERO, Vec2::new(800.0, 600.0))
        .with_panel(Region::panel(Vec2::new(760.0, 0.0), Vec2::new(40.0, 600.0)))
}

/// Scene holding at most one triangle with local corners (0,0,0), (1,0,0), (0,1,0).
#[derive(Debug, Clone)]
pub struct TriangleScene {
    pub transform: Option<Mat4>,
    pub cursor: Vec3,
    pub unit: Option<f32>,
    /// Report the struck face as gone, as after the surface was deleted.
    pub forget_faces: bool,
}

impl TriangleScene {
    pub const SURFACE: SurfaceRef = SurfaceRef(1);
    const CORNERS: [Vec3; 3] = [Vec3::ZERO, Vec3::X, Vec3::Y];

    pub fn empty() -> Self {
        Self {
            transform: None,
            cursor: Vec3::ZERO,
            unit: None,
            forget_faces: false,
        }
    }

    pub fn unit_triangle(transform: Mat4) -> Self {
        Self {
            transform: Some(transform),
            ..Self::empty()
        }
    }
}

impl SceneQuery for TriangleScene {
    fn raycast(&mut self, ray: Ray3d) -> Option<super::host::RaycastHit> {
        let transform = self.transform?;
        let to_local = transform.inverse();
        let origin = to_local.transform_point3(ray.origin);
        let direction = to_local.transform_vector3(*ray.direction);
        if direction.z.abs() < 1e-6 {
            return None;
        }
        let t = -origin.z / direction.z;
        if t < 0.0 {
            return None;
        }
        let local = origin + direction * t;
        let inside = local.x >= 0.0 && local.y >= 0.0 && local.x + local.y <= 1.0;
        if !inside {
            return None;
        }
        let normal = to_local
            .transpose()
            .transform_vector3(Vec3::Z)
            .normalize();
        Some(super::host::RaycastHit {
            point: transform.transform_point3(local),
            normal,
            face_index: Some(0),
            surface: Self::SURFACE,
            surface_transform: transform,
        })
    }

    fn face_vertices(&self, surface: SurfaceRef, face_index: usize) -> Option<Vec<Vec3>> {
        if self.forget_faces || self.transform.is_none() || surface != Self::SURFACE || face_index != 0
        {
            return None;
        }
        Some(Self::CORNERS.to_vec())
    }

    fn cursor_location(&self) -> Vec3 {
        self.cursor
    }

    fn unit_scale(&self) -> Option<f32> {
        self.unit
    }
}

#[derive(Debug, Default)]
pub struct RecordingGeometry {
    next_id: u64,
    pub points: HashMap<GeometryId, Vec<Vec3>>,
    pub created: Vec<(GeometryId, String)>,
    pub destroyed: Vec<GeometryId>,
    pub redraws: usize,
}

impl GeometryService for RecordingGeometry {
    fn create(&mut self, name: &str, points: &[Vec3]) -> GeometryId {
        self.next_id += 1;
        let id = GeometryId(self.next_id);
        self.points.insert(id, points.to_vec());
        self.created.push((id, name.to_string()));
        id
    }

    fn set_points(&mut self, id: GeometryId, points: &[Vec3]) {
        if let Some(stored) = self.points.get_mut(&id) {
            *stored = points.to_vec();
        }
    }

    fn destroy(&mut self, id: GeometryId) {
        self.points.remove(&id);
        self.destroyed.push(id);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingWrappers {
    /// Graph assets available to `attach`, by name.
    pub assets: HashMap<String, Vec<InputDecl>>,
    values: HashMap<(GeometryId, String), InputValue>,
    /// Input identifiers whose writes fail.
    pub reject: HashSet<String>,
    pub active_toggles: Vec<(GeometryId, bool)>,
    pub attached: Vec<(GeometryId, String)>,
    pub detached: Vec<GeometryId>,
}

impl RecordingWrappers {
    /// Wrapper service that knows the distance and angle graphs.
    pub fn with_measurement_graphs() -> Self {
        let mut wrappers = Self::default();
        wrappers.assets.insert(
            DISTANCE_GRAPH_NAME.to_string(),
            vec![
                decl("Socket_2", "Text Rotation", SocketKind::Int, None),
                decl("Socket_3", "Rotation", SocketKind::Int, Some(InputValue::Int(0))),
                decl("Socket_4", "Offset", SocketKind::FloatDistance, None),
            ],
        );
        wrappers.assets.insert(
            ANGLE_GRAPH_NAME.to_string(),
            vec![
                decl("Socket_2", "Text Rotation", SocketKind::Int, None),
                decl("Socket_4", "Offset", SocketKind::FloatDistance, None),
                decl(
                    "Socket_5",
                    "Radius",
                    SocketKind::FloatDistance,
                    Some(InputValue::Float(0.5)),
                ),
            ],
        );
        wrappers
    }

    pub fn set_value(&mut self, id: GeometryId, identifier: &str, value: InputValue) {
        self.values.insert((id, identifier.to_string()), value);
    }

    pub fn value(&self, id: GeometryId, identifier: &str) -> Option<InputValue> {
        self.values.get(&(id, identifier.to_string())).copied()
    }
}

impl WrapperService for RecordingWrappers {
    fn attach(&mut self, geometry: GeometryId, asset: &str) -> MeasureResult<Vec<InputDecl>> {
        let decls = self
            .assets
            .get(asset)
            .cloned()
            .ok_or_else(|| MeasureError::AssetMissing(asset.to_string()))?;
        self.attached.push((geometry, asset.to_string()));
        Ok(decls)
    }

    fn detach(&mut self, geometry: GeometryId) {
        self.values.retain(|(id, _), _| *id != geometry);
        self.detached.push(geometry);
    }

    fn read(&self, geometry: GeometryId, identifier: &str) -> Option<InputValue> {
        self.value(geometry, identifier)
    }

    fn write(&mut self, geometry: GeometryId, identifier: &str, value: InputValue) -> MeasureResult<()> {
        if self.reject.contains(identifier) {
            return Err(MeasureError::WriteRejected {
                name: identifier.to_string(),
                reason: "read-only input".to_string(),
            });
        }
        self.set_value(geometry, identifier, value);
        Ok(())
    }

    fn set_active(&mut self, geometry: GeometryId, active: bool) {
        self.active_toggles.push((geometry, active));
    }
}

pub fn decl(identifier: &str, name: &str, kind: SocketKind, default: Option<InputValue>) -> InputDecl {
    InputDecl {
        identifier: identifier.to_string(),
        name: name.to_string(),
        kind,
        default,
    }
}

/// Owns one of each host service and lends them out as a [`Host`].
pub struct Harness {
    pub scene: TriangleScene,
    pub view: OrthoView,
    pub geometry: RecordingGeometry,
    pub wrappers: RecordingWrappers,
}

impl Harness {
    pub fn new(scene: TriangleScene, view: OrthoView) -> Self {
        Self {
            scene,
            view,
            geometry: RecordingGeometry::default(),
            wrappers: RecordingWrappers::with_measurement_graphs(),
        }
    }

    pub fn host(&mut self) -> Host<'_> {
        Host {
            scene: &mut self.scene,
            view: &self.view,
            geometry: &mut self.geometry,
            wrappers: &mut self.wrappers,
        }
    }
}
