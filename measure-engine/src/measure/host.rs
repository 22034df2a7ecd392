//! Boundary between the measurement core and the application hosting it.
//!
//! The core never touches the ECS directly. Each frame the host adapter wraps
//! its scene, camera, geometry storage and graph wrappers in the traits below
//! and hands them to the active tool as a [`Host`] bundle.

use bevy::math::{Mat4, Ray3d, Vec2, Vec3};

use super::params::{InputDecl, InputValue};
use crate::error::MeasureResult;

/// Role of a rectangular sub-region of the 3D view area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// The region the scene is rendered into.
    Viewport,
    /// Toolbars, side panels and headers layered over the view.
    Panel,
}

/// Axis-aligned screen rectangle in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub kind: RegionKind,
    pub origin: Vec2,
    pub size: Vec2,
}

impl Region {
    pub fn viewport(origin: Vec2, size: Vec2) -> Self {
        Self {
            kind: RegionKind::Viewport,
            origin,
            size,
        }
    }

    pub fn panel(origin: Vec2, size: Vec2) -> Self {
        Self {
            kind: RegionKind::Panel,
            origin,
            size,
        }
    }

    /// Inclusive containment test, edges count as inside.
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.x <= max.x && point.y >= self.origin.y && point.y <= max.y
    }

    /// Convert a window coordinate into this region's local coordinate space.
    pub fn to_local(&self, window_point: Vec2) -> Vec2 {
        window_point - self.origin
    }

    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// The 3D view area and the sub-regions tiled over it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewArea {
    pub origin: Vec2,
    pub size: Vec2,
    pub regions: Vec<Region>,
}

impl ViewArea {
    /// Area covered entirely by a single render region.
    pub fn single(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size,
            regions: vec![Region::viewport(origin, size)],
        }
    }

    pub fn with_panel(mut self, panel: Region) -> Self {
        self.regions.push(panel);
        self
    }

    /// The authoritative render region, regardless of which region received the event.
    pub fn render_region(&self) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == RegionKind::Viewport)
    }

    /// True when the pointer is outside the area or over any non-render region.
    pub fn is_over_ui(&self, window_point: Vec2) -> bool {
        let bounds = Region::viewport(self.origin, self.size);
        if !bounds.contains(window_point) {
            return true;
        }
        self.regions
            .iter()
            .any(|r| r.kind != RegionKind::Viewport && r.contains(window_point))
    }
}

/// Weak identifier of a struck surface. Valid only for the frame it was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceRef(pub u64);

/// Identifier of a measurement's backing point/edge object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(pub u64);

/// Result of a successful scene raycast. A miss is represented by `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec3,
    /// Unit surface normal in world space.
    pub normal: Vec3,
    pub face_index: Option<usize>,
    pub surface: SurfaceRef,
    /// Local-to-world transform of the struck surface.
    pub surface_transform: Mat4,
}

/// Host editing mode. Measurement only runs in object mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostMode {
    #[default]
    Object,
    Edit,
}

pub trait SceneQuery {
    fn raycast(&mut self, ray: Ray3d) -> Option<RaycastHit>;

    /// Corner positions of one face of `surface`, in the surface's local space and
    /// in winding order. `None` when the surface or face no longer exists.
    fn face_vertices(&self, surface: SurfaceRef, face_index: usize) -> Option<Vec<Vec3>>;

    /// World position of the scene's reference cursor, used as the depth for misses.
    fn cursor_location(&self) -> Vec3;

    /// Unit-to-world scale when a unit system is active.
    fn unit_scale(&self) -> Option<f32>;
}

pub trait ViewProjection {
    /// Pick ray through a region-local coordinate. `None` for degenerate views.
    fn pick_ray(&self, region: &Region, coord: Vec2) -> Option<Ray3d>;

    /// Region-local coordinate of a world position, `None` when behind the camera.
    fn world_to_region(&self, region: &Region, world: Vec3) -> Option<Vec2>;

    /// Point under `coord` on the view-aligned plane passing through `depth`.
    fn region_to_world_at_depth(&self, region: &Region, coord: Vec2, depth: Vec3) -> Option<Vec3>;
}

pub trait GeometryService {
    fn create(&mut self, name: &str, points: &[Vec3]) -> GeometryId;
    fn set_points(&mut self, id: GeometryId, points: &[Vec3]);
    fn destroy(&mut self, id: GeometryId);
    fn request_redraw(&mut self);
}

/// Per-object wrapper around a reusable measurement graph, exposing its
/// declared inputs as named, typed values.
pub trait WrapperService {
    /// Build a wrapper for `asset` on `geometry` and return the inputs it declares.
    fn attach(&mut self, geometry: GeometryId, asset: &str) -> MeasureResult<Vec<InputDecl>>;
    fn detach(&mut self, geometry: GeometryId);
    fn read(&self, geometry: GeometryId, identifier: &str) -> Option<InputValue>;
    fn write(&mut self, geometry: GeometryId, identifier: &str, value: InputValue)
    -> MeasureResult<()>;
    fn set_active(&mut self, geometry: GeometryId, active: bool);
}

/// Services lent to the active tool for the duration of one frame.
pub struct Host<'a> {
    pub scene: &'a mut dyn SceneQuery,
    pub view: &'a dyn ViewProjection,
    pub geometry: &'a mut dyn GeometryService,
    pub wrappers: &'a mut dyn WrapperService,
}
