// SPDX-License-Identifier: MIT OR Apache-2.0

use nalgebra::{Point2, Vector2};
use vello::kurbo::Rect;

/// Anchor point of a rectangle.
///
/// Used both for the point of the source rectangle a popup is attached to and
/// for the corner of the popup window that is placed on that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gravity {
    /// Top-left corner
    #[default]
    NorthWest,
    /// Top edge midpoint
    North,
    /// Top-right corner
    NorthEast,
    /// Left edge midpoint
    West,
    /// Center of the rectangle
    Center,
    /// Right edge midpoint
    East,
    /// Bottom-left corner
    SouthWest,
    /// Bottom edge midpoint
    South,
    /// Bottom-right corner
    SouthEast,
}

impl Gravity {
    /// All nine gravities, row by row.
    pub const ALL: [Gravity; 9] = [
        Gravity::NorthWest,
        Gravity::North,
        Gravity::NorthEast,
        Gravity::West,
        Gravity::Center,
        Gravity::East,
        Gravity::SouthWest,
        Gravity::South,
        Gravity::SouthEast,
    ];

    /// Whether this gravity refers to the right edge of a rectangle.
    pub fn is_east(self) -> bool {
        matches!(self, Gravity::East | Gravity::NorthEast | Gravity::SouthEast)
    }

    /// Whether this gravity refers to the bottom edge of a rectangle.
    pub fn is_south(self) -> bool {
        matches!(self, Gravity::South | Gravity::SouthWest | Gravity::SouthEast)
    }
}

/// A rectangle in integer screen (or surface) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width, never negative in practice.
    pub width: i32,
    /// Height, never negative in practice.
    pub height: i32,
}

impl ScreenRect {
    /// Create a new rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A zero-size rectangle at the given point.
    pub fn at(point: Point2<i32>) -> Self {
        Self::new(point.x, point.y, 0, 0)
    }

    /// A rectangle from an origin and a size.
    pub fn from_origin_size(origin: Point2<i32>, size: Vector2<i32>) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// The exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// The exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// The top-left corner.
    pub fn origin(&self) -> Point2<i32> {
        Point2::new(self.x, self.y)
    }

    /// The size as a vector.
    pub fn size(&self) -> Vector2<i32> {
        Vector2::new(self.width, self.height)
    }

    /// The same rectangle moved by the given offset.
    pub fn translate(&self, offset: Vector2<i32>) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Whether the point lies inside the rectangle, edges included.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.x as f64
            && point.y >= self.y as f64
            && point.x <= self.right() as f64
            && point.y <= self.bottom() as f64
    }

    /// Convert to a kurbo rectangle for drawing.
    pub fn to_kurbo(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.right() as f64,
            self.bottom() as f64,
        )
    }
}

/// The point of `rect` that a popup attaches to for the given source gravity.
///
/// Only east-leaning gravities move the point to the right edge and only
/// south-leaning gravities move it to the bottom edge; `North`, `Center` and
/// the like keep the left/top coordinate.
pub fn anchor_point(rect: ScreenRect, source_gravity: Gravity) -> Point2<i32> {
    let mut x = rect.x;
    let mut y = rect.y;

    if source_gravity.is_east() {
        x += rect.width;
    }

    if source_gravity.is_south() {
        y += rect.height;
    }

    Point2::new(x, y)
}

/// Pull `origin` back so a box of `size` does not cross the right or bottom
/// edge of `work_area`.
///
/// The left and top edges are not clamped against.
pub fn clamp_to_work_area(
    origin: Point2<i32>,
    size: Vector2<i32>,
    work_area: ScreenRect,
) -> Point2<i32> {
    let mut x = origin.x;
    let mut y = origin.y;

    if x + size.x > work_area.right() {
        x = work_area.right() - size.x;
    }

    if y + size.y > work_area.bottom() {
        y = work_area.bottom() - size.y;
    }

    Point2::new(x, y)
}
