//! Symbol library: bounding box sizes and named port offsets.
//!
//! Definitions are pure geometry. How a symbol is drawn is a rendering
//! concern and lives with the rendering collaborator, keyed by symbol name.

use crate::error::CoreError;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named connection point on a symbol.
///
/// The offset is in local, unrotated units relative to the symbol's
/// top-left origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDef {
    pub id: String,
    pub offset: Point,
}

impl PortDef {
    /// Create a port definition.
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            offset: Point::new(x, y),
        }
    }
}

/// Geometric definition of a symbol: size and ports.
///
/// The first entry in `ports` is the symbol's primary port; the geometry
/// engine keeps it on a grid intersection across moves and rotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    pub width: f64,
    pub height: f64,
    pub ports: Vec<PortDef>,
}

impl SymbolDef {
    /// Create a symbol definition.
    pub fn new(width: f64, height: f64, ports: Vec<PortDef>) -> Self {
        Self {
            width,
            height,
            ports,
        }
    }

    /// The geometric center in local coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Look up a port by id.
    pub fn port(&self, id: &str) -> Option<&PortDef> {
        self.ports.iter().find(|p| p.id == id)
    }

    /// The primary port used for grid alignment, if the symbol has ports.
    pub fn primary_port(&self) -> Option<&PortDef> {
        self.ports.first()
    }
}

/// Read-only registry mapping symbol names to their definitions.
///
/// Built once at construction; there is no mutation API afterwards.
#[derive(Debug, Clone)]
pub struct SymbolLibrary {
    defs: HashMap<String, SymbolDef>,
}

impl SymbolLibrary {
    /// Build a library from an explicit set of definitions.
    pub fn new(defs: impl IntoIterator<Item = (String, SymbolDef)>) -> Self {
        Self {
            defs: defs.into_iter().collect(),
        }
    }

    /// The standard circuit symbol catalog.
    pub fn standard() -> Self {
        let defs = [
            (
                "resistor".to_string(),
                SymbolDef::new(
                    100.0,
                    40.0,
                    vec![PortDef::new("A", 0.0, 0.0), PortDef::new("B", 100.0, 0.0)],
                ),
            ),
            (
                "capacitor".to_string(),
                SymbolDef::new(
                    80.0,
                    40.0,
                    vec![PortDef::new("A", 0.0, 0.0), PortDef::new("B", 80.0, 0.0)],
                ),
            ),
            (
                "inductor".to_string(),
                SymbolDef::new(
                    100.0,
                    40.0,
                    vec![PortDef::new("A", 0.0, 0.0), PortDef::new("B", 100.0, 0.0)],
                ),
            ),
            (
                "vsource".to_string(),
                SymbolDef::new(
                    60.0,
                    80.0,
                    vec![PortDef::new("+", 30.0, 0.0), PortDef::new("-", 30.0, 80.0)],
                ),
            ),
            (
                "ground".to_string(),
                SymbolDef::new(40.0, 50.0, vec![PortDef::new("GND", 20.0, 0.0)]),
            ),
        ];
        Self::new(defs)
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Result<&SymbolDef, CoreError> {
        self.defs
            .get(name)
            .ok_or_else(|| CoreError::UnknownSymbolType(name.to_string()))
    }

    /// Check whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Enumerate registered symbol names (for a palette UI).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }
}
