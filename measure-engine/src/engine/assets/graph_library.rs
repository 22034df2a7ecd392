use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MeasureError, MeasureResult};
use crate::measure::host::{GeometryId, WrapperService};
use crate::measure::params::{InputDecl, InputValue, SocketKind};

/// A reusable measurement graph: the inputs it exposes to the tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub inputs: Vec<InputDecl>,
}

/// A set of graph definitions loaded from one `*.graphs.json` file.
#[derive(Asset, TypePath, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementGraphLibrary {
    pub graphs: Vec<GraphDefinition>,
}

impl MeasurementGraphLibrary {
    pub fn find(&self, name: &str) -> Option<&GraphDefinition> {
        self.graphs.iter().find(|g| g.name == name)
    }
}

/// One graph instance attached to a measurement's geometry.
#[derive(Debug, Clone)]
pub struct GraphWrapper {
    pub asset: String,
    pub inputs: Vec<InputDecl>,
    values: HashMap<String, InputValue>,
    pub active: bool,
    /// Number of times the wrapper has been (re)activated.
    pub evaluations: u32,
}

impl GraphWrapper {
    fn new(definition: &GraphDefinition) -> Self {
        Self {
            asset: definition.name.clone(),
            inputs: definition.inputs.clone(),
            values: HashMap::new(),
            active: true,
            evaluations: 1,
        }
    }

    fn decl(&self, identifier: &str) -> Option<&InputDecl> {
        self.inputs.iter().find(|d| d.identifier == identifier)
    }

    pub fn value(&self, identifier: &str) -> Option<InputValue> {
        let decl = self.decl(identifier)?;
        self.values.get(identifier).copied().or(decl.default)
    }

    /// Current value of the input whose display name is `name`, as a float.
    pub fn value_named(&self, name: &str) -> Option<f64> {
        let decl = self.inputs.iter().find(|d| d.name.eq_ignore_ascii_case(name))?;
        self.value(&decl.identifier).map(InputValue::as_f64)
    }

    fn validate(&self, identifier: &str, value: InputValue) -> Result<(), String> {
        let decl = self.decl(identifier).ok_or("unknown input")?;
        match (decl.kind, value) {
            (SocketKind::Bool | SocketKind::Menu | SocketKind::Vector, _) => {
                Err("not a numeric input".to_string())
            }
            (SocketKind::IntUnsigned, InputValue::Int(v)) if v < 0 => {
                Err("value must not be negative".to_string())
            }
            (kind, InputValue::Float(_)) if kind.is_integer() => {
                Err("integer input given a float".to_string())
            }
            (kind, InputValue::Int(_)) if !kind.is_integer() => {
                Err("float input given an integer".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Wrapper service backed by the loaded graph libraries.
#[derive(Resource, Default)]
pub struct WrapperRegistry {
    /// Searched in order; the first library declaring a graph wins.
    pub libraries: Vec<MeasurementGraphLibrary>,
    wrappers: HashMap<GeometryId, GraphWrapper>,
}

impl WrapperRegistry {
    pub fn find_graph(&self, name: &str) -> Option<&GraphDefinition> {
        self.libraries.iter().find_map(|library| library.find(name))
    }

    pub fn wrapper(&self, geometry: GeometryId) -> Option<&GraphWrapper> {
        self.wrappers.get(&geometry)
    }

    /// Drop wrappers whose geometry no longer exists.
    pub fn retain(&mut self, mut alive: impl FnMut(GeometryId) -> bool) {
        self.wrappers.retain(|id, _| alive(*id));
    }
}

impl WrapperService for WrapperRegistry {
    fn attach(&mut self, geometry: GeometryId, asset: &str) -> MeasureResult<Vec<InputDecl>> {
        let definition = self
            .find_graph(asset)
            .ok_or_else(|| MeasureError::AssetMissing(asset.to_string()))?;
        let wrapper = GraphWrapper::new(definition);
        let inputs = wrapper.inputs.clone();
        debug!("attached '{asset}' to geometry {}", geometry.0);
        self.wrappers.insert(geometry, wrapper);
        Ok(inputs)
    }

    fn detach(&mut self, geometry: GeometryId) {
        if let Some(wrapper) = self.wrappers.remove(&geometry) {
            debug!("detached '{}' from geometry {}", wrapper.asset, geometry.0);
        }
    }

    fn read(&self, geometry: GeometryId, identifier: &str) -> Option<InputValue> {
        self.wrappers.get(&geometry)?.value(identifier)
    }

    fn write(&mut self, geometry: GeometryId, identifier: &str, value: InputValue) -> MeasureResult<()> {
        let rejected = |reason: String| MeasureError::WriteRejected {
            name: identifier.to_string(),
            reason,
        };
        let wrapper = self
            .wrappers
            .get_mut(&geometry)
            .ok_or_else(|| rejected("geometry has no wrapper".to_string()))?;
        wrapper.validate(identifier, value).map_err(rejected)?;
        wrapper.values.insert(identifier.to_string(), value);
        Ok(())
    }

    fn set_active(&mut self, geometry: GeometryId, active: bool) {
        if let Some(wrapper) = self.wrappers.get_mut(&geometry) {
            if active && !wrapper.active {
                wrapper.evaluations += 1;
            }
            wrapper.active = active;
        }
    }
}
