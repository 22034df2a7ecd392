use bevy::prelude::*;
use bevy::window::RequestRedraw;

use crate::measure::host::{GeometryId, GeometryService};

/// Backing geometry of a measurement: a point chain joined by edges.
#[derive(Component, Debug, Clone, Default)]
pub struct MeasurementObject {
    pub points: Vec<Vec3>,
}

impl MeasurementObject {
    pub fn geometry_id(entity: Entity) -> GeometryId {
        GeometryId(entity.to_bits())
    }
}

pub fn geometry_entity(id: GeometryId) -> Option<Entity> {
    Entity::try_from_bits(id.0).ok()
}

/// Measurement geometry stored as entities, mutated through deferred commands.
pub struct BevyGeometry<'a, 'w, 's, 'e> {
    pub commands: &'a mut Commands<'w, 's>,
    pub redraw: &'a mut EventWriter<'e, RequestRedraw>,
}

impl GeometryService for BevyGeometry<'_, '_, '_, '_> {
    fn create(&mut self, name: &str, points: &[Vec3]) -> GeometryId {
        let entity = self
            .commands
            .spawn((
                Name::new(name.to_string()),
                MeasurementObject {
                    points: points.to_vec(),
                },
                Transform::default(),
            ))
            .id();
        info!("Created '{name}' ({entity})");
        MeasurementObject::geometry_id(entity)
    }

    fn set_points(&mut self, id: GeometryId, points: &[Vec3]) {
        let Some(entity) = geometry_entity(id) else {
            return;
        };
        self.commands.entity(entity).try_insert(MeasurementObject {
            points: points.to_vec(),
        });
    }

    fn destroy(&mut self, id: GeometryId) {
        if let Some(entity) = geometry_entity(id) {
            self.commands.entity(entity).try_despawn();
        }
    }

    fn request_redraw(&mut self) {
        self.redraw.write(RequestRedraw);
    }
}
