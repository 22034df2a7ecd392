use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, VertexAttributeValues};

use crate::measure::host::{RaycastHit, SceneQuery, SurfaceRef};

/// Reference point whose depth is used for pointer samples that miss every surface.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SceneCursor {
    pub location: Vec3,
}

/// Active unit system. `scale` is the length of one display unit in world units.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct UnitSettings {
    pub scale: Option<f32>,
}

/// Mesh entities in the world, queried through mesh ray casting.
pub struct BevyScene<'a, 'w, 's> {
    pub ray_cast: &'a mut MeshRayCast<'w, 's>,
    pub surfaces: &'a Query<'w, 's, (&'static Mesh3d, &'static GlobalTransform)>,
    pub meshes: &'a Assets<Mesh>,
    pub cursor: SceneCursor,
    pub units: UnitSettings,
}

impl SceneQuery for BevyScene<'_, '_, '_> {
    fn raycast(&mut self, ray: Ray3d) -> Option<RaycastHit> {
        let settings = MeshRayCastSettings::default();
        let (entity, hit) = self.ray_cast.cast_ray(ray, &settings).first()?.clone();
        let (_, transform) = self.surfaces.get(entity).ok()?;
        Some(RaycastHit {
            point: hit.point,
            normal: hit.normal.normalize_or_zero(),
            face_index: hit.triangle_index,
            surface: SurfaceRef(entity.to_bits()),
            surface_transform: transform.compute_matrix(),
        })
    }

    fn face_vertices(&self, surface: SurfaceRef, face_index: usize) -> Option<Vec<Vec3>> {
        let entity = Entity::try_from_bits(surface.0).ok()?;
        let (mesh, _) = self.surfaces.get(entity).ok()?;
        let mesh = self.meshes.get(&mesh.0)?;
        face_polygon(mesh, face_index)
    }

    fn cursor_location(&self) -> Vec3 {
        self.cursor.location
    }

    fn unit_scale(&self) -> Option<f32> {
        self.units.scale
    }
}

/// Local-space corners of triangle `index` of a triangle-list mesh.
pub fn triangle_positions(mesh: &Mesh, index: usize) -> Option<[Vec3; 3]> {
    let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return None;
    };
    let corner = |i: usize| -> Option<usize> {
        match mesh.indices() {
            Some(Indices::U16(indices)) => indices.get(i).map(|&v| v as usize),
            Some(Indices::U32(indices)) => indices.get(i).map(|&v| v as usize),
            None => Some(i),
        }
    };
    let base = index * 3;
    let mut corners = [Vec3::ZERO; 3];
    for (offset, slot) in corners.iter_mut().enumerate() {
        let vertex = corner(base + offset)?;
        *slot = Vec3::from_array(*positions.get(vertex)?);
    }
    Some(corners)
}

fn triangle_count(mesh: &Mesh) -> usize {
    match mesh.indices() {
        Some(indices) => indices.len() / 3,
        None => mesh.count_vertices() / 3,
    }
}

/// Corners of the polygon containing triangle `index`, in winding order.
///
/// Meshes only store triangles, so a quad face arrives as two halves. When a
/// coplanar neighbour shares an edge with the triangle, that edge is the
/// triangulation diagonal and the neighbour's far corner is spliced in.
pub fn face_polygon(mesh: &Mesh, index: usize) -> Option<Vec<Vec3>> {
    let triangle = triangle_positions(mesh, index)?;
    let Some(normal) = triangle_normal(&triangle) else {
        return Some(triangle.to_vec());
    };

    for other in (0..triangle_count(mesh)).filter(|&i| i != index) {
        let Some(neighbour) = triangle_positions(mesh, other) else {
            continue;
        };
        if triangle_normal(&neighbour).is_none_or(|n| n.dot(normal) < 1.0 - COPLANAR_EPSILON) {
            continue;
        }
        for edge in 0..3 {
            let (p, q) = (triangle[edge], triangle[(edge + 1) % 3]);
            let Some(far) = far_corner(&neighbour, p, q) else {
                continue;
            };
            let mut polygon = Vec::with_capacity(4);
            for (i, &corner) in triangle.iter().enumerate() {
                polygon.push(corner);
                if i == edge {
                    polygon.push(far);
                }
            }
            return Some(polygon);
        }
    }
    Some(triangle.to_vec())
}

const COPLANAR_EPSILON: f32 = 1e-4;
const SAME_POINT_EPSILON: f32 = 1e-6;

fn triangle_normal([a, b, c]: &[Vec3; 3]) -> Option<Vec3> {
    (*b - *a).cross(*c - *a).try_normalize()
}

/// The corner of `triangle` opposite edge `p`-`q`, if the triangle has that edge.
fn far_corner(triangle: &[Vec3; 3], p: Vec3, q: Vec3) -> Option<Vec3> {
    let same = |a: Vec3, b: Vec3| a.abs_diff_eq(b, SAME_POINT_EPSILON);
    let has_p = triangle.iter().any(|&v| same(v, p));
    let has_q = triangle.iter().any(|&v| same(v, q));
    if !(has_p && has_q) {
        return None;
    }
    triangle.iter().copied().find(|&v| !same(v, p) && !same(v, q))
}
