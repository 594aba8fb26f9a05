//! The pluggable window-management policy contract.
//!
//! The engine invokes exactly one hook per public operation, with its
//! mutex already held. Policies reach back into the engine only
//! through the [`Tools`] borrow they are handed; the public locking
//! entry points are structurally out of their reach.

use std::fmt;

use crate::event::{KeyboardEvent, PointerEvent, TouchEvent};
use crate::geometry::{Point, Size};
use crate::registry::{SessionId, SurfaceId};
use crate::tools::Tools;

/// Visual state of a surface.
///
/// The tiling policy only ever applies the first four; the remaining
/// states exist so that a client may request them and be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    Restored,
    Maximized,
    HorizMaximized,
    VertMaximized,
    Fullscreen,
    Minimized,
    Hidden,
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Restored => "restored",
            Self::Maximized => "maximized",
            Self::HorizMaximized => "horiz-maximized",
            Self::VertMaximized => "vert-maximized",
            Self::Fullscreen => "fullscreen",
            Self::Minimized => "minimized",
            Self::Hidden => "hidden",
        };
        f.write_str(name)
    }
}

/// Requested parameters for a new surface. The policy returns the
/// placement actually accepted.
#[derive(Debug, Clone, Default)]
pub struct SurfaceParams {
    pub top_left: Point,
    pub size: Size,
    pub name: String,
    pub parent: Option<SurfaceId>,
}

impl SurfaceParams {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_top_left(mut self, top_left: Point) -> Self {
        self.top_left = top_left;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: SurfaceId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Client-requested attribute changes for an existing surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceSpec {
    pub name: Option<String>,
}

/// Decision-making hooks invoked by the engine.
///
/// Every hook runs with the engine lock held and must not block.
pub trait WindowManagementPolicy: Send {
    /// The session set changed; recompute layout.
    fn handle_session_info_updated(&mut self, tools: &mut Tools<'_>);

    /// The display set changed; recompute layout.
    fn handle_displays_updated(&mut self, tools: &mut Tools<'_>);

    /// Adjust a requested placement before the surface is realized.
    fn handle_place_new_surface(
        &mut self,
        tools: &mut Tools<'_>,
        session: SessionId,
        request: SurfaceParams,
    ) -> SurfaceParams;

    /// A surface was realized; record it under its session.
    fn handle_new_surface(&mut self, tools: &mut Tools<'_>, session: SessionId, surface: SurfaceId);

    /// Apply client-requested attribute changes.
    fn handle_modify_surface(
        &mut self,
        tools: &mut Tools<'_>,
        session: SessionId,
        surface: SurfaceId,
        spec: &SurfaceSpec,
    );

    /// A surface is going away; drop bookkeeping and advance focus if
    /// this empties the focused session.
    fn handle_delete_surface(
        &mut self,
        tools: &mut Tools<'_>,
        session: SessionId,
        surface: SurfaceId,
    );

    /// State-machine transition. Returns the state actually applied,
    /// which may differ from `requested` for disallowed values.
    fn handle_set_state(
        &mut self,
        tools: &mut Tools<'_>,
        surface: SurfaceId,
        requested: SurfaceState,
    ) -> SurfaceState;

    /// Returns whether the event was consumed.
    fn handle_keyboard_event(&mut self, tools: &mut Tools<'_>, event: &KeyboardEvent) -> bool;

    /// Returns whether the event was consumed.
    fn handle_touch_event(&mut self, tools: &mut Tools<'_>, event: &TouchEvent) -> bool;

    /// Returns whether the event was consumed.
    fn handle_pointer_event(&mut self, tools: &mut Tools<'_>, event: &PointerEvent) -> bool;
}
