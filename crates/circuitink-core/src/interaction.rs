//! Pointer-driven interaction state machine and editor facade.

use crate::error::CoreError;
use crate::geometry::{GRID_SIZE, Rotation, rect_contains_inclusive, snap, snap_point};
use crate::routing::{OrthogonalPath, best_orthogonal_path};
use crate::scene::{ElementId, PointerTarget, Scene, WireEndpoint};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Default drop position for palette-added elements.
pub const DEFAULT_DROP_POSITION: Point = Point::new(200.0, 200.0);

/// Modifier keys accompanying a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Keyboard commands understood by the editor. Each is a safe no-op when
/// the state it acts on is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Abandon a pending connection, or strip wires off the selection.
    Cancel,
    /// Remove the selected elements and their wires.
    Delete,
    /// Advance each selected element a quarter turn clockwise.
    Rotate,
}

/// Snapshot of an element's placement at drag start.
///
/// Moves are recomputed from these snapshots on every pointer-move, never
/// accumulated incrementally, so repeated realignment cannot drift.
#[derive(Debug, Clone, Copy)]
pub struct StartPlacement {
    pub id: ElementId,
    pub origin: Point,
    pub rotation: Rotation,
}

/// An in-progress element drag.
#[derive(Debug, Clone)]
pub struct DragState {
    /// Pointer position when the drag began.
    pub anchor: Point,
    /// Placements of every moved element at drag start.
    pub start: Vec<StartPlacement>,
}

/// An in-progress box selection, corners in world coordinates.
#[derive(Debug, Clone, Copy)]
pub struct BoxSelect {
    pub anchor: Point,
    pub corner: Point,
}

impl BoxSelect {
    /// The normalized rectangle spanned by the two corners.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.anchor, self.corner)
    }
}

/// An in-progress port-to-port connection drag.
#[derive(Debug, Clone)]
pub struct ConnectState {
    pub from: WireEndpoint,
    /// Current pointer position for the live preview.
    pub pointer: Point,
}

/// Exactly one interaction mode is active at a time; a pointer-down always
/// begins a new gesture.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    DraggingElements(DragState),
    BoxSelecting(BoxSelect),
    Connecting(ConnectState),
}

/// Owns the scene and routes pointer and keyboard input to it.
///
/// All mutation happens synchronously inside the handlers below; events are
/// processed strictly in arrival order.
#[derive(Debug, Clone)]
pub struct Editor {
    pub scene: Scene,
    state: InteractionState,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Scene::standard())
    }
}

impl Editor {
    /// Create an editor over the given scene.
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            state: InteractionState::Idle,
        }
    }

    /// Create an editor with the standard library and one of each symbol
    /// placed at the reference starting positions.
    pub fn with_demo_scene() -> Result<Self, CoreError> {
        let mut scene = Scene::standard();
        scene.add_element("resistor", Point::new(200.0, 160.0))?;
        scene.add_element("capacitor", Point::new(420.0, 160.0))?;
        scene.add_element("inductor", Point::new(640.0, 160.0))?;
        scene.add_element("vsource", Point::new(200.0, 360.0))?;
        scene.add_element("ground", Point::new(640.0, 360.0))?;
        Ok(Self::new(scene))
    }

    /// The current interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Add an element of the given symbol at the default drop position.
    pub fn add_element(&mut self, symbol: &str) -> Result<ElementId, CoreError> {
        self.scene.add_element(symbol, DEFAULT_DROP_POSITION)
    }

    /// Handle a pointer-down, beginning a new gesture.
    pub fn pointer_down(&mut self, point: Point, target: PointerTarget, modifiers: Modifiers) {
        self.state = match target {
            PointerTarget::Background => InteractionState::BoxSelecting(BoxSelect {
                anchor: point,
                corner: point,
            }),
            PointerTarget::Element(id) => {
                let was_selected = self.scene.is_selected(id);
                if !was_selected {
                    if modifiers.shift {
                        let mut ids = self.scene.selection().to_vec();
                        ids.push(id);
                        self.scene.set_selection(ids);
                    } else {
                        self.scene.set_selection(vec![id]);
                    }
                }
                // The whole selection moves only if the pressed element was
                // already part of it.
                let move_ids: Vec<ElementId> = if was_selected {
                    self.scene.selection().to_vec()
                } else {
                    vec![id]
                };
                let start = move_ids
                    .iter()
                    .filter_map(|&id| {
                        self.scene.element(id).map(|e| StartPlacement {
                            id,
                            origin: e.origin,
                            rotation: e.rotation,
                        })
                    })
                    .collect();
                InteractionState::DraggingElements(DragState {
                    anchor: point,
                    start,
                })
            }
            PointerTarget::Port(element, port) => InteractionState::Connecting(ConnectState {
                from: WireEndpoint::new(element, port),
                pointer: point,
            }),
        };
    }

    /// Handle a pointer-move.
    pub fn pointer_move(&mut self, point: Point) {
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::DraggingElements(drag) => {
                let dx = snap(point.x - drag.anchor.x, GRID_SIZE);
                let dy = snap(point.y - drag.anchor.y, GRID_SIZE);
                let moves: Vec<(ElementId, Point, Rotation)> = drag
                    .start
                    .iter()
                    .map(|s| {
                        (
                            s.id,
                            Point::new(s.origin.x + dx, s.origin.y + dy),
                            s.rotation,
                        )
                    })
                    .collect();
                for (id, proposed, rotation) in moves {
                    self.scene.place_element(id, proposed, rotation);
                }
            }
            InteractionState::BoxSelecting(select) => select.corner = point,
            InteractionState::Connecting(connect) => connect.pointer = point,
        }
    }

    /// Handle a pointer-up, ending the current gesture.
    pub fn pointer_up(&mut self, point: Point, target: PointerTarget) {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => {}
            // Positions were committed during pointer-move.
            InteractionState::DraggingElements(_) => {}
            InteractionState::BoxSelecting(mut select) => {
                select.corner = point;
                let rect = select.rect();
                let ids: Vec<ElementId> = self
                    .scene
                    .elements_ordered()
                    .filter(|e| rect_contains_inclusive(rect, e.origin))
                    .map(|e| e.id)
                    .collect();
                self.scene.set_selection(ids);
            }
            InteractionState::Connecting(connect) => {
                if let PointerTarget::Port(element, port) = target {
                    let to = WireEndpoint::new(element, port);
                    if to == connect.from {
                        log::debug!("connection released on its own source port, cancelled");
                    } else if let Err(err) = self.scene.add_wire(connect.from, to) {
                        // The source element can vanish mid-gesture (Delete
                        // key); drop the gesture rather than surface it.
                        log::debug!("connection abandoned: {err}");
                    }
                }
            }
        }
    }

    /// Handle a keyboard command.
    pub fn command(&mut self, command: Command) {
        match command {
            Command::Cancel => {
                if matches!(self.state, InteractionState::Connecting(_)) {
                    self.state = InteractionState::Idle;
                } else {
                    let selected = self.scene.selection().to_vec();
                    self.scene.remove_wires_touching(&selected);
                }
            }
            Command::Delete => {
                let selected = self.scene.selection().to_vec();
                self.scene.remove_elements(&selected);
            }
            Command::Rotate => {
                let turns: Vec<(ElementId, Point, Rotation)> = self
                    .scene
                    .selection()
                    .iter()
                    .filter_map(|&id| {
                        self.scene
                            .element(id)
                            .map(|e| (id, e.origin, e.rotation.rotated_cw()))
                    })
                    .collect();
                for (id, origin, rotation) in turns {
                    self.scene.place_element(id, origin, rotation);
                }
            }
        }
    }

    /// The box-select rectangle, if a box selection is in progress.
    pub fn box_select_rect(&self) -> Option<Rect> {
        match &self.state {
            InteractionState::BoxSelecting(select) => Some(select.rect()),
            _ => None,
        }
    }

    /// The source endpoint of a pending connection, if any.
    pub fn connection_source(&self) -> Option<&WireEndpoint> {
        match &self.state {
            InteractionState::Connecting(connect) => Some(&connect.from),
            _ => None,
        }
    }

    /// The routed preview path from the pending connection's source port to
    /// the snapped pointer position, for rendering only.
    pub fn connection_preview(&self) -> Option<OrthogonalPath> {
        let InteractionState::Connecting(connect) = &self.state else {
            return None;
        };
        let from = self
            .scene
            .port_position(connect.from.element, &connect.from.port)
            .ok()?;
        let to = snap_point(connect.pointer, GRID_SIZE);
        Some(best_orthogonal_path(from, to))
    }
}
