//! Named, typed inputs of a measurement graph and the scroll/alignment edits applied to them.
//!
//! The graph's input layout is defined by the asset, not by this crate, so
//! parameters are addressed by name. An [`InputTable`] is built once per
//! wrapper attachment and resolves a keyword in two passes: a case-insensitive
//! exact match first, then a case-insensitive substring match. Only inputs
//! whose declared kind is in the caller's accepted set are considered.

use bevy::log::warn;
use constants::interaction::ALIGN_FLIP_DEGREES;
use serde::{Deserialize, Serialize};

use super::host::{GeometryId, GeometryService, WrapperService};
use crate::error::{MeasureError, MeasureResult};

/// Declared type of a graph input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketKind {
    Int,
    IntUnsigned,
    Float,
    FloatAngle,
    FloatDistance,
    FloatFactor,
    Bool,
    Menu,
    Vector,
}

impl SocketKind {
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int | Self::IntUnsigned)
    }
}

/// Kinds accepted for length-like parameters (offset, radius).
pub const FLOAT_KINDS: &[SocketKind] = &[
    SocketKind::Float,
    SocketKind::FloatDistance,
    SocketKind::FloatFactor,
];

/// Kinds accepted for degree-stepped parameters (rotation, text rotation).
pub const INT_KINDS: &[SocketKind] = &[
    SocketKind::Int,
    SocketKind::Float,
    SocketKind::IntUnsigned,
    SocketKind::FloatAngle,
];

/// A stored input value. The variant is the value's numeric kind and never changes on write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Int(i64),
    Float(f64),
}

impl InputValue {
    pub fn zero_for(kind: SocketKind) -> Self {
        if kind.is_integer() {
            Self::Int(0)
        } else {
            Self::Float(0.0)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Same numeric kind as `self`, holding `value`. Integers round half away from zero.
    pub fn with_value(self, value: f64) -> Self {
        match self {
            Self::Int(_) => Self::Int(value.round() as i64),
            Self::Float(_) => Self::Float(value),
        }
    }
}

impl std::fmt::Display for InputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.4}"),
        }
    }
}

/// One input declared by a measurement graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDecl {
    pub identifier: String,
    pub name: String,
    pub kind: SocketKind,
    #[serde(default)]
    pub default: Option<InputValue>,
}

/// What a modifier + scroll combination adjusts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBinding {
    pub keyword: &'static str,
    pub step: f64,
    pub accepted: &'static [SocketKind],
}

struct TableEntry {
    normalized: String,
    decl: InputDecl,
}

/// Lookup table over a wrapper's declared inputs, in declaration order.
pub struct InputTable {
    entries: Vec<TableEntry>,
}

impl InputTable {
    pub fn new(decls: Vec<InputDecl>) -> Self {
        let entries = decls
            .into_iter()
            .map(|decl| TableEntry {
                normalized: decl.name.to_lowercase(),
                decl,
            })
            .collect();
        Self { entries }
    }

    pub fn resolve(&self, keyword: &str, accepted: &[SocketKind]) -> Option<&InputDecl> {
        let needle = keyword.to_lowercase();
        let candidates = move || {
            self.entries
                .iter()
                .filter(move |e| accepted.contains(&e.decl.kind))
        };
        candidates()
            .find(|e| e.normalized == needle)
            .or_else(|| candidates().find(|e| e.normalized.contains(&needle)))
            .map(|e| &e.decl)
    }
}

/// A successful parameter write.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub name: String,
    pub value: InputValue,
}

/// The graph wrapper attached to one measurement, with the services needed to edit it.
pub struct ParameterTarget<'a> {
    pub geometry_id: GeometryId,
    pub table: &'a InputTable,
    pub wrappers: &'a mut dyn WrapperService,
    pub geometry: &'a mut dyn GeometryService,
}

impl ParameterTarget<'_> {
    fn current_value(&self, decl: &InputDecl) -> InputValue {
        self.wrappers
            .read(self.geometry_id, &decl.identifier)
            .or(decl.default)
            .unwrap_or_else(|| InputValue::zero_for(decl.kind))
    }

    fn lookup(&self, keyword: &str, accepted: &[SocketKind]) -> MeasureResult<InputDecl> {
        self.table
            .resolve(keyword, accepted)
            .cloned()
            .ok_or_else(|| MeasureError::Lookup {
                keyword: keyword.to_string(),
            })
    }

    /// Add `step` to the input matching `keyword`.
    pub fn adjust(
        &mut self,
        keyword: &str,
        step: f64,
        accepted: &[SocketKind],
    ) -> MeasureResult<Applied> {
        let decl = self.lookup(keyword, accepted)?;
        let current = self.current_value(&decl);
        self.write(&decl, current, current.as_f64() + step)
    }

    /// Write `value` to the input matching `keyword`.
    ///
    /// With `toggle_flip`, writing a value the input already holds (mod 360)
    /// stores it turned by a half turn instead, and any other value is stored
    /// as given. Both sides are compared as whole degrees.
    pub fn set(
        &mut self,
        keyword: &str,
        value: f64,
        accepted: &[SocketKind],
        toggle_flip: bool,
    ) -> MeasureResult<Applied> {
        let decl = self.lookup(keyword, accepted)?;
        let current = self.current_value(&decl);

        let value = if toggle_flip {
            let current_deg = current.as_f64().round() as i64;
            let target_deg = value.round() as i64;
            if (current_deg - target_deg).rem_euclid(360) == 0 {
                (target_deg + ALIGN_FLIP_DEGREES) as f64
            } else {
                target_deg as f64
            }
        } else {
            value
        };

        self.write(&decl, current, value)
    }

    fn write(&mut self, decl: &InputDecl, current: InputValue, value: f64) -> MeasureResult<Applied> {
        let new_value = current.with_value(value);
        self.wrappers
            .write(self.geometry_id, &decl.identifier, new_value)?;

        // A value write alone does not re-evaluate the graph.
        self.wrappers.set_active(self.geometry_id, false);
        self.wrappers.set_active(self.geometry_id, true);
        self.geometry.request_redraw();

        Ok(Applied {
            name: decl.name.clone(),
            value: new_value,
        })
    }
}

/// Log a failed best-effort parameter edit. Never fatal to the session.
pub fn log_failure(context: &str, err: &MeasureError) {
    warn!("{context} skipped: {err}");
}
