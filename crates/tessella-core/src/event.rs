//! Input events delivered to the engine.
//!
//! These are read-only snapshots produced by the shell's input
//! dispatch; the engine never mutates them.

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Keyboard modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u32 {
        const ALT         = 0b0000_0001;
        const CTRL        = 0b0000_0010;
        const SHIFT       = 0b0000_0100;
        const META        = 0b0000_1000;
        const CAPS_LOCK   = 0b0001_0000;
        const NUM_LOCK    = 0b0010_0000;
        const SCROLL_LOCK = 0b0100_0000;

        /// Modifiers relevant to gestures and shortcuts. Lock-style
        /// modifiers are masked out before comparison.
        const GESTURE_MASK = Self::ALT.bits()
            | Self::CTRL.bits()
            | Self::SHIFT.bits()
            | Self::META.bits();
    }
}

bitflags! {
    /// Pointer button state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u32 {
        const PRIMARY   = 0b001;
        const SECONDARY = 0b010;
        const TERTIARY  = 0b100;
    }
}

/// Linux evdev scan codes for the shortcuts the tiling policy binds.
pub mod scan_code {
    pub const TAB: u32 = 15;
    pub const GRAVE: u32 = 41;
    pub const F4: u32 = 62;
    pub const F11: u32 = 87;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardAction {
    Down,
    Up,
    Repeat,
}

#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub action: KeyboardAction,
    pub scan_code: u32,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    ButtonDown,
    ButtonUp,
    Motion,
    Enter,
    Leave,
}

#[derive(Debug, Clone)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub position: Point,
    pub buttons: Buttons,
    pub modifiers: Modifiers,
}

/// Per-point phase within one touch frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Down,
    Up,
    Change,
}

#[derive(Debug, Clone, Copy)]
pub struct TouchPoint {
    pub action: TouchAction,
    pub x: f32,
    pub y: f32,
}

/// One frame of simultaneous touch points.
#[derive(Debug, Clone)]
pub struct TouchEvent {
    pub points: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Centre of mass of all points, or `None` for an empty frame.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }

        let count = self.points.len() as f32;
        let total_x: f32 = self.points.iter().map(|p| p.x).sum();
        let total_y: f32 = self.points.iter().map(|p| p.y).sum();

        Some(Point::new((total_x / count) as i32, (total_y / count) as i32))
    }
}
