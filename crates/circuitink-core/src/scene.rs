//! Scene model: placed elements, wires, and the current selection.

use crate::error::CoreError;
use crate::geometry::{self, GRID_SIZE, Rotation, rect_contains_inclusive};
use crate::routing::{OrthogonalPath, best_orthogonal_path};
use crate::symbols::SymbolLibrary;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a placed element.
pub type ElementId = Uuid;
/// Unique identifier for a wire.
pub type WireId = Uuid;

/// Radius of the port circles a renderer draws; also the base hit size.
pub const PORT_RADIUS: f64 = 4.0;
/// Pointer tolerance for hitting a port circle.
pub const PORT_HIT_TOLERANCE: f64 = 6.0;
/// Extra margin around an element's bounding box for pointer hits.
pub const HIT_MARGIN: f64 = 10.0;

/// A placed symbol instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Name of the symbol definition in the library.
    pub symbol: String,
    /// World position of the unrotated top-left corner. Kept aligned so the
    /// symbol's primary port sits on a grid intersection.
    pub origin: Point,
    pub rotation: Rotation,
}

/// One end of a wire: an element and a port on its symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEndpoint {
    pub element: ElementId,
    pub port: String,
}

impl WireEndpoint {
    /// Create an endpoint.
    pub fn new(element: ElementId, port: impl Into<String>) -> Self {
        Self {
            element,
            port: port.into(),
        }
    }
}

/// A connection between two ports.
///
/// Duplicate wires and wires between two ports of the same element are
/// allowed; topology validation is not this model's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    pub id: WireId,
    pub a: WireEndpoint,
    pub b: WireEndpoint,
}

impl Wire {
    /// Check whether either endpoint references the given element.
    pub fn touches(&self, element: ElementId) -> bool {
        self.a.element == element || self.b.element == element
    }
}

/// A wire with endpoints resolved to world positions and a routed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireView {
    pub id: WireId,
    pub a: Point,
    pub b: Point,
    pub path: OrthogonalPath,
}

/// What a world-space pointer position lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    Background,
    Element(ElementId),
    Port(ElementId, String),
}

/// The authoritative in-memory model of the schematic.
///
/// Mutated only by the interaction layer; a rendering collaborator reads it
/// between input events and always sees a consistent snapshot, since every
/// mutation runs to completion on the input thread.
#[derive(Debug, Clone)]
pub struct Scene {
    library: SymbolLibrary,
    elements: HashMap<ElementId, Element>,
    /// Insertion order; drives enumeration and hit-test stacking (later
    /// elements are on top).
    order: Vec<ElementId>,
    wires: Vec<Wire>,
    selection: Vec<ElementId>,
}

impl Scene {
    /// Create an empty scene over the given library.
    pub fn new(library: SymbolLibrary) -> Self {
        Self {
            library,
            elements: HashMap::new(),
            order: Vec::new(),
            wires: Vec::new(),
            selection: Vec::new(),
        }
    }

    /// Create an empty scene over the standard symbol catalog.
    pub fn standard() -> Self {
        Self::new(SymbolLibrary::standard())
    }

    /// The symbol library backing this scene.
    pub fn library(&self) -> &SymbolLibrary {
        &self.library
    }

    /// Place a new element, aligning the proposed origin so the primary
    /// port lands on the grid. Fails if the symbol name is unregistered.
    pub fn add_element(&mut self, symbol: &str, proposed: Point) -> Result<ElementId, CoreError> {
        let def = self.library.get(symbol)?;
        let origin = geometry::align_origin_for_ports(def, Rotation::R0, proposed, GRID_SIZE);
        let element = Element {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            origin,
            rotation: Rotation::R0,
        };
        let id = element.id;
        self.order.push(id);
        self.elements.insert(id, element);
        Ok(id)
    }

    /// Remove elements by id, cascading every wire that touches one of them
    /// and pruning the selection. Unknown ids are ignored.
    pub fn remove_elements(&mut self, ids: &[ElementId]) {
        let before = self.wires.len();
        for &id in ids {
            self.elements.remove(&id);
        }
        self.order.retain(|id| self.elements.contains_key(id));
        self.selection.retain(|id| self.elements.contains_key(id));
        self.wires
            .retain(|w| !ids.contains(&w.a.element) && !ids.contains(&w.b.element));
        let dropped = before - self.wires.len();
        if dropped > 0 {
            log::debug!("cascade-removed {dropped} wire(s) with deleted endpoints");
        }
    }

    /// Remove every wire with an endpoint on any of the given elements.
    pub fn remove_wires_touching(&mut self, ids: &[ElementId]) {
        self.wires
            .retain(|w| !ids.contains(&w.a.element) && !ids.contains(&w.b.element));
    }

    /// Connect two ports. Both endpoints must resolve to an existing
    /// element and a port on its symbol definition.
    pub fn add_wire(&mut self, a: WireEndpoint, b: WireEndpoint) -> Result<WireId, CoreError> {
        self.validate_endpoint(&a)?;
        self.validate_endpoint(&b)?;
        let id = Uuid::new_v4();
        log::debug!(
            "wire {id} connects {}:{} to {}:{}",
            a.element,
            a.port,
            b.element,
            b.port
        );
        self.wires.push(Wire { id, a, b });
        Ok(id)
    }

    /// Remove a wire by id (direct pick).
    pub fn remove_wire(&mut self, id: WireId) -> Option<Wire> {
        let pos = self.wires.iter().position(|w| w.id == id)?;
        Some(self.wires.remove(pos))
    }

    fn validate_endpoint(&self, endpoint: &WireEndpoint) -> Result<(), CoreError> {
        let Some(element) = self.elements.get(&endpoint.element) else {
            return Err(CoreError::InvalidWireEndpoint(format!(
                "no element {}",
                endpoint.element
            )));
        };
        let def = self.library.get(&element.symbol)?;
        if def.port(&endpoint.port).is_none() {
            return Err(CoreError::InvalidWireEndpoint(format!(
                "no port {:?} on element {}",
                endpoint.port, endpoint.element
            )));
        }
        Ok(())
    }

    /// Move an element to a proposed origin with the given rotation. The
    /// origin is realigned internally, so the port-alignment invariant
    /// cannot be broken by a caller. Returns false for an unknown id.
    pub fn place_element(&mut self, id: ElementId, proposed: Point, rotation: Rotation) -> bool {
        let Some(element) = self.elements.get(&id) else {
            return false;
        };
        let Ok(def) = self.library.get(&element.symbol) else {
            return false;
        };
        let origin = geometry::align_origin_for_ports(def, rotation, proposed, GRID_SIZE);
        if let Some(element) = self.elements.get_mut(&id) {
            element.origin = origin;
            element.rotation = rotation;
        }
        true
    }

    /// Replace the selection. Ids not present in the model are silently
    /// dropped; duplicates are collapsed.
    pub fn set_selection(&mut self, ids: Vec<ElementId>) {
        self.selection.clear();
        for id in ids {
            if self.elements.contains_key(&id) && !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    /// The currently selected element ids.
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Check whether an element is selected.
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    /// Get an element by id.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Elements in placement order (later elements render on top).
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// All wires, in creation order.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Number of placed elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check whether the scene has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// World position of a port on a placed element.
    pub fn port_position(&self, id: ElementId, port: &str) -> Result<Point, CoreError> {
        let Some(element) = self.elements.get(&id) else {
            return Err(CoreError::InvalidWireEndpoint(format!("no element {id}")));
        };
        let def = self.library.get(&element.symbol)?;
        geometry::port_world_position(def, element.origin, element.rotation, port, GRID_SIZE)
    }

    /// The unrotated bounding box of an element at its origin.
    ///
    /// Hit regions use this box even for rotated elements, matching the
    /// grab area of the reference editor.
    pub fn element_bounds(&self, element: &Element) -> Result<Rect, CoreError> {
        let def = self.library.get(&element.symbol)?;
        Ok(Rect::new(
            element.origin.x,
            element.origin.y,
            element.origin.x + def.width,
            element.origin.y + def.height,
        ))
    }

    /// Wires with endpoints resolved to world positions and routed paths.
    /// A wire whose endpoint no longer resolves is skipped; the cascade on
    /// element removal keeps that from happening in normal operation.
    pub fn wire_views(&self) -> Vec<WireView> {
        self.wires
            .iter()
            .filter_map(|w| {
                let a = self.port_position(w.a.element, &w.a.port).ok()?;
                let b = self.port_position(w.b.element, &w.b.port).ok()?;
                Some(WireView {
                    id: w.id,
                    a,
                    b,
                    path: best_orthogonal_path(a, b),
                })
            })
            .collect()
    }

    /// Resolve a world-space point to what it lands on, topmost first.
    /// Within one element, ports sit above the body.
    pub fn target_at(&self, point: Point) -> PointerTarget {
        for id in self.order.iter().rev() {
            let Some(element) = self.elements.get(id) else {
                continue;
            };
            let Ok(def) = self.library.get(&element.symbol) else {
                continue;
            };
            for port in &def.ports {
                let Ok(pos) = geometry::port_world_position(
                    def,
                    element.origin,
                    element.rotation,
                    &port.id,
                    GRID_SIZE,
                ) else {
                    continue;
                };
                if point.distance(pos) <= PORT_HIT_TOLERANCE {
                    return PointerTarget::Port(*id, port.id.clone());
                }
            }
            let bounds = Rect::new(
                element.origin.x,
                element.origin.y,
                element.origin.x + def.width,
                element.origin.y + def.height,
            )
            .inflate(HIT_MARGIN, HIT_MARGIN);
            if rect_contains_inclusive(bounds, point) {
                return PointerTarget::Element(*id);
            }
        }
        PointerTarget::Background
    }
}
