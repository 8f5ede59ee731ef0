//! Grid snapping and rotation-aware port positioning.

use crate::error::CoreError;
use crate::symbols::SymbolDef;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Grid unit for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Snap a scalar to the nearest multiple of `grid`.
pub fn snap(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

/// Snap both axes of a point to the grid.
pub fn snap_point(point: Point, grid: f64) -> Point {
    Point::new(snap(point.x, grid), snap(point.y, grid))
}

/// Quarter-turn rotation of a placed element, clockwise in screen
/// coordinates (y increases downward).
///
/// Only the four permitted angles are representable; arbitrary-angle math
/// stays in [`rotate_point_around_center`], which takes raw degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// The angle in degrees.
    pub fn degrees(self) -> f64 {
        match self {
            Rotation::R0 => 0.0,
            Rotation::R90 => 90.0,
            Rotation::R180 => 180.0,
            Rotation::R270 => 270.0,
        }
    }

    /// The angle in radians.
    pub fn radians(self) -> f64 {
        self.degrees().to_radians()
    }

    /// Advance by a quarter turn clockwise, wrapping at 360°.
    pub fn rotated_cw(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }
}

/// Rotate a local point about the symbol's geometric center.
///
/// `degrees` is clockwise with y down, the standard screen convention.
/// Valid for any angle, though elements only ever use multiples of 90°.
pub fn rotate_point_around_center(local: Point, def: &SymbolDef, degrees: f64) -> Point {
    let rad = degrees.to_radians();
    let (sin, cos) = rad.sin_cos();
    let c = def.center();
    let dx = local.x - c.x;
    let dy = local.y - c.y;
    Point::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos)
}

/// Resolve a named port to its world position.
///
/// The local offset is rotated about the symbol center, translated by the
/// element's origin, then snapped to the grid.
pub fn port_world_position(
    def: &SymbolDef,
    origin: Point,
    rotation: Rotation,
    port_id: &str,
    grid: f64,
) -> Result<Point, CoreError> {
    let port = def
        .port(port_id)
        .ok_or_else(|| CoreError::UnknownPort(port_id.to_string()))?;
    let rotated = rotate_point_around_center(port.offset, def, rotation.degrees());
    Ok(snap_point(
        Point::new(origin.x + rotated.x, origin.y + rotated.y),
        grid,
    ))
}

/// Shift a proposed origin so the symbol's primary port lands exactly on a
/// grid intersection.
///
/// Snapping the origin alone is not enough: ports are offset from the
/// origin, and rotation changes that offset. Must run after every move or
/// rotation of an element. A symbol without ports falls back to snapping
/// the origin itself.
pub fn align_origin_for_ports(
    def: &SymbolDef,
    rotation: Rotation,
    proposed: Point,
    grid: f64,
) -> Point {
    let Some(first) = def.primary_port() else {
        return snap_point(proposed, grid);
    };
    let rotated = rotate_point_around_center(first.offset, def, rotation.degrees());
    let world = Point::new(proposed.x + rotated.x, proposed.y + rotated.y);
    let want = snap_point(world, grid);
    Point::new(
        proposed.x + (want.x - world.x),
        proposed.y + (want.y - world.y),
    )
}

/// Point-in-rect test that is inclusive on all four edges.
///
/// `kurbo::Rect::contains` is half-open on the max edges, which would drop
/// elements sitting exactly on a selection boundary.
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolLibrary;

    #[test]
    fn test_snap_to_multiples() {
        assert!((snap(23.0, GRID_SIZE) - 20.0).abs() < f64::EPSILON);
        assert!((snap(31.0, GRID_SIZE) - 40.0).abs() < f64::EPSILON);
        assert!((snap(-27.0, GRID_SIZE) + 20.0).abs() < f64::EPSILON);
        assert!((snap(40.0, GRID_SIZE) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_properties() {
        for &v in &[0.0, 3.7, -12.2, 151.0, 169.9, -0.4, 1234.5] {
            let s = snap(v, GRID_SIZE);
            // Snapped values sit on a grid multiple within half a grid
            // unit of the input, and re-snapping changes nothing.
            assert!((s % GRID_SIZE).abs() < 1e-9);
            assert!((snap(s, GRID_SIZE) - s).abs() < 1e-9);
            assert!((s - v).abs() <= GRID_SIZE / 2.0 + 1e-9);
        }
    }

    #[test]
    fn test_rotation_order_four() {
        let mut r = Rotation::R0;
        for _ in 0..4 {
            r = r.rotated_cw();
        }
        assert_eq!(r, Rotation::R0);
        assert!((Rotation::R270.degrees() - 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let lib = SymbolLibrary::standard();
        let def = lib.get("resistor").unwrap();

        // Port A at local (0,0), center (50,20). 90° clockwise sends the
        // offset (-50,-20) to (20,-50).
        let p = rotate_point_around_center(Point::new(0.0, 0.0), def, 90.0);
        assert!((p.x - 70.0).abs() < 1e-9);
        assert!((p.y - (-30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_resistor_port_positions() {
        let lib = SymbolLibrary::standard();
        let def = lib.get("resistor").unwrap();
        let origin = Point::new(200.0, 160.0);

        let a = port_world_position(def, origin, Rotation::R0, "A", GRID_SIZE).unwrap();
        let b = port_world_position(def, origin, Rotation::R0, "B", GRID_SIZE).unwrap();
        assert_eq!(a, Point::new(200.0, 160.0));
        assert_eq!(b, Point::new(300.0, 160.0));
    }

    #[test]
    fn test_unknown_port() {
        let lib = SymbolLibrary::standard();
        let def = lib.get("resistor").unwrap();
        let err =
            port_world_position(def, Point::ZERO, Rotation::R0, "Z", GRID_SIZE).unwrap_err();
        assert_eq!(err, CoreError::UnknownPort("Z".to_string()));
    }

    #[test]
    fn test_align_keeps_primary_port_on_grid() {
        let lib = SymbolLibrary::standard();
        for name in ["resistor", "capacitor", "inductor", "vsource", "ground"] {
            let def = lib.get(name).unwrap();
            for rotation in [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270] {
                let proposed = Point::new(203.7, 361.4);
                let origin = align_origin_for_ports(def, rotation, proposed, GRID_SIZE);
                let first = def.primary_port().unwrap().id.clone();
                let pos =
                    port_world_position(def, origin, rotation, &first, GRID_SIZE).unwrap();
                assert!((pos.x % GRID_SIZE).abs() < 1e-9, "{name} x off grid");
                assert!((pos.y % GRID_SIZE).abs() < 1e-9, "{name} y off grid");
            }
        }
    }

    #[test]
    fn test_four_rotations_restore_origin() {
        let lib = SymbolLibrary::standard();
        let def = lib.get("vsource").unwrap();

        let mut rotation = Rotation::R0;
        let mut origin = align_origin_for_ports(def, rotation, Point::new(200.0, 360.0), GRID_SIZE);
        let start = origin;

        for _ in 0..4 {
            rotation = rotation.rotated_cw();
            origin = align_origin_for_ports(def, rotation, origin, GRID_SIZE);
        }

        assert_eq!(rotation, Rotation::R0);
        assert!((origin.x - start.x).abs() < 1e-9);
        assert!((origin.y - start.y).abs() < 1e-9);
    }

    #[test]
    fn test_rect_contains_inclusive_edges() {
        let rect = Rect::new(150.0, 150.0, 450.0, 250.0);
        assert!(rect_contains_inclusive(rect, Point::new(150.0, 150.0)));
        assert!(rect_contains_inclusive(rect, Point::new(450.0, 250.0)));
        assert!(!rect_contains_inclusive(rect, Point::new(450.1, 250.0)));
    }
}
