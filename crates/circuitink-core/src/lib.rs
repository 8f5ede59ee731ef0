//! CircuitInk Core Library
//!
//! Platform-agnostic geometry and interaction engine for the CircuitInk
//! schematic editor. The core owns the spatial model (elements, wires,
//! selection) and the pointer-driven interactions upon it; drawing symbols
//! and converting screen coordinates to world space belong to external
//! collaborators.

pub mod error;
pub mod geometry;
pub mod interaction;
pub mod routing;
pub mod scene;
pub mod symbols;

pub use error::CoreError;
pub use geometry::{
    GRID_SIZE, Rotation, align_origin_for_ports, port_world_position, rotate_point_around_center,
    snap, snap_point,
};
pub use interaction::{
    BoxSelect, Command, ConnectState, DragState, Editor, InteractionState, Modifiers,
    StartPlacement,
};
pub use routing::{OrthogonalPath, best_orthogonal_path};
pub use scene::{
    Element, ElementId, PORT_RADIUS, PointerTarget, Scene, Wire, WireEndpoint, WireId, WireView,
};
pub use symbols::{PortDef, SymbolDef, SymbolLibrary};
