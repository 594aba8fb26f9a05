//! Geometry primitives and the clamped-manipulation helpers used by
//! window-management policies.
//!
//! All coordinates are integer display-space pixels. Rectangles are
//! half-open: a point on the right or bottom edge is outside.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A position in display space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangular extent. Sizes are kept signed so that clamping
/// arithmetic stays total; negative values never escape the helpers
/// below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn to_displacement(self) -> Displacement {
        Displacement {
            dx: self.width,
            dy: self.height,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The difference between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Displacement {
    pub dx: i32,
    pub dy: i32,
}

impl Displacement {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl Sub for Point {
    type Output = Displacement;

    fn sub(self, rhs: Point) -> Displacement {
        Displacement {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

impl Add<Displacement> for Point {
    type Output = Point;

    fn add(self, rhs: Displacement) -> Point {
        Point {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

impl AddAssign<Displacement> for Point {
    fn add_assign(&mut self, rhs: Displacement) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

/// An axis-aligned rectangle in display space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub top_left: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            top_left: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub const fn from_parts(top_left: Point, size: Size) -> Self {
        Self { top_left, size }
    }

    /// The first point past the bottom-right corner.
    pub const fn bottom_right(self) -> Point {
        Point {
            x: self.top_left.x + self.size.width,
            y: self.top_left.y + self.size.height,
        }
    }

    pub const fn is_empty(self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }

    pub const fn contains(self, point: Point) -> bool {
        point.x >= self.top_left.x
            && point.x < self.top_left.x + self.size.width
            && point.y >= self.top_left.y
            && point.y < self.top_left.y + self.size.height
    }

    pub const fn contains_rect(self, other: Rect) -> bool {
        other.top_left.x >= self.top_left.x
            && other.top_left.y >= self.top_left.y
            && other.bottom_right().x <= self.bottom_right().x
            && other.bottom_right().y <= self.bottom_right().y
    }

    pub const fn intersects(self, other: Rect) -> bool {
        self.top_left.x < other.bottom_right().x
            && other.top_left.x < self.bottom_right().x
            && self.top_left.y < other.bottom_right().y
            && other.top_left.y < self.bottom_right().y
    }

    /// Overlap of two rectangles, or `None` if they are disjoint.
    pub fn intersection(self, other: Rect) -> Option<Rect> {
        let x = self.top_left.x.max(other.top_left.x);
        let y = self.top_left.y.max(other.top_left.y);
        let right = self.bottom_right().x.min(other.bottom_right().x);
        let bottom = self.bottom_right().y.min(other.bottom_right().y);

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.size, self.top_left)
    }
}

/// The set of active display rectangles.
///
/// Duplicates are ignored on `add`; `remove` erases an exact match.
#[derive(Debug, Clone, Default)]
pub struct Rectangles {
    rects: Vec<Rect>,
}

impl Rectangles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rect: Rect) {
        if !self.rects.contains(&rect) {
            self.rects.push(rect);
        }
    }

    pub fn remove(&mut self, rect: Rect) {
        if let Some(pos) = self.rects.iter().position(|r| *r == rect) {
            self.rects.remove(pos);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.rects.iter()
    }

    /// Smallest rectangle covering every display, or `None` if there
    /// are no displays.
    pub fn bounding_rectangle(&self) -> Option<Rect> {
        let first = self.rects.first()?;
        let mut x = first.top_left.x;
        let mut y = first.top_left.y;
        let mut right = first.bottom_right().x;
        let mut bottom = first.bottom_right().y;

        for rect in &self.rects[1..] {
            x = x.min(rect.top_left.x);
            y = y.min(rect.top_left.y);
            right = right.max(rect.bottom_right().x);
            bottom = bottom.max(rect.bottom_right().y);
        }

        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Clamp a drag movement so `rect` stays inside `bounds`.
///
/// Each axis is capped independently: leftward/upward movement by the
/// distance to the bound's top-left, rightward/downward movement by
/// the distance from the rectangle's bottom-right to the bound's.
pub fn clamp_drag(rect: Rect, movement: Displacement, bounds: Rect) -> Displacement {
    let mut movement = movement;
    let top_left = rect.top_left;
    let bottom_right = rect.bottom_right();

    if movement.dx < 0 {
        movement.dx = movement.dx.max(bounds.top_left.x - top_left.x);
    }
    if movement.dy < 0 {
        movement.dy = movement.dy.max(bounds.top_left.y - top_left.y);
    }
    if movement.dx > 0 {
        movement.dx = movement.dx.min(bounds.bottom_right().x - bottom_right.x);
    }
    if movement.dy > 0 {
        movement.dy = movement.dy.min(bounds.bottom_right().y - bottom_right.y);
    }

    movement
}

/// Scale `rect` about its top-left corner by the ratio of the cursor
/// offsets, clamped so the result stays inside `bounds`.
///
/// The old offset is floored at 1.0 per axis to avoid a division
/// blow-up right at the corner. Returns `None` (size unchanged) for
/// non-positive scale factors.
pub fn scale_resize(rect: Rect, from: Point, to: Point, bounds: Rect) -> Option<Size> {
    let old_offset = from - rect.top_left;
    let new_offset = to - rect.top_left;

    let scale_x = new_offset.dx as f32 / (old_offset.dx as f32).max(1.0);
    let scale_y = new_offset.dy as f32 / (old_offset.dy as f32).max(1.0);

    if scale_x <= 0.0 || scale_y <= 0.0 {
        return None;
    }

    let mut size = Size::new(
        (scale_x * rect.size.width as f32) as i32,
        (scale_y * rect.size.height as f32) as i32,
    );

    let limit = bounds.bottom_right() - rect.top_left;
    size.width = size.width.min(limit.dx);
    size.height = size.height.min(limit.dy);

    Some(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(10, 10, 100, 50);
        assert!(rect.contains(Point::new(10, 10)));
        assert!(rect.contains(Point::new(109, 59)));
        assert!(!rect.contains(Point::new(110, 10)));
        assert!(!rect.contains(Point::new(10, 60)));
    }

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.intersection(b), Some(Rect::new(50, 50, 50, 50)));
        assert!(a.intersects(b));
    }

    #[test]
    fn intersection_of_disjoint_rects_is_none() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert_eq!(a.intersection(b), None);
        assert!(!a.intersects(b));
    }

    #[test]
    fn bounding_rectangle_covers_all_displays() {
        let mut displays = Rectangles::new();
        displays.add(Rect::new(0, 0, 1920, 1080));
        displays.add(Rect::new(1920, 0, 1280, 1024));
        assert_eq!(
            displays.bounding_rectangle(),
            Some(Rect::new(0, 0, 3200, 1080))
        );

        displays.remove(Rect::new(1920, 0, 1280, 1024));
        assert_eq!(
            displays.bounding_rectangle(),
            Some(Rect::new(0, 0, 1920, 1080))
        );
    }

    #[test]
    fn duplicate_displays_are_ignored() {
        let mut displays = Rectangles::new();
        displays.add(Rect::new(0, 0, 800, 600));
        displays.add(Rect::new(0, 0, 800, 600));
        assert_eq!(displays.len(), 1);
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let bounds = Rect::new(0, 0, 500, 500);
        let rect = Rect::new(100, 100, 100, 100);

        // Unobstructed movement passes through.
        assert_eq!(
            clamp_drag(rect, Displacement::new(10, -10), bounds),
            Displacement::new(10, -10)
        );
        // Leftward/upward capped at the top-left corner.
        assert_eq!(
            clamp_drag(rect, Displacement::new(-500, -500), bounds),
            Displacement::new(-100, -100)
        );
        // Rightward/downward capped at the bottom-right corner.
        assert_eq!(
            clamp_drag(rect, Displacement::new(900, 900), bounds),
            Displacement::new(300, 300)
        );
    }

    #[test]
    fn resize_rejects_non_positive_scale() {
        let bounds = Rect::new(0, 0, 500, 500);
        let rect = Rect::new(100, 100, 100, 100);

        // Cursor crossed back over the top-left corner.
        assert_eq!(
            scale_resize(rect, Point::new(150, 150), Point::new(90, 150), bounds),
            None
        );
        assert_eq!(
            scale_resize(rect, Point::new(150, 150), Point::new(150, 100), bounds),
            None
        );
    }

    #[test]
    fn resize_scales_and_clamps() {
        let bounds = Rect::new(0, 0, 500, 500);
        let rect = Rect::new(100, 100, 100, 100);

        // Doubling the cursor offset doubles the size.
        assert_eq!(
            scale_resize(rect, Point::new(150, 150), Point::new(200, 200), bounds),
            Some(Size::new(200, 200))
        );

        // A huge offset is clamped to the bound's bottom-right.
        assert_eq!(
            scale_resize(rect, Point::new(150, 150), Point::new(5000, 5000), bounds),
            Some(Size::new(400, 400))
        );
    }
}
