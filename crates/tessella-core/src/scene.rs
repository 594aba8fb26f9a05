//! Collaborator interfaces consumed by the engine.
//!
//! Sessions and surfaces are owned by the scene layer; the engine only
//! ever holds weak handles to them and addresses them by opaque ID.
//! An expired handle is treated as absent, never an error.

use std::sync::Weak;

use indexmap::IndexSet;

use crate::geometry::{Point, Size};
use crate::policy::SurfaceState;
use crate::registry::{SessionId, SurfaceId};

/// Weak handle to a live session.
pub type SessionHandle = Weak<dyn Session>;

/// Weak handle to a live surface.
pub type SurfaceHandle = Weak<dyn Surface>;

/// An ordered, deduplicated set of surfaces submitted as one atomic
/// raise request.
pub type SurfaceSet = IndexSet<SurfaceId>;

/// One window belonging to a session.
///
/// Implementations use interior mutability; all methods take `&self`
/// so handles can be shared between the scene and the engine.
pub trait Surface: Send + Sync {
    fn top_left(&self) -> Point;
    fn size(&self) -> Size;
    fn move_to(&self, top_left: Point);
    fn resize(&self, size: Size);
    fn rename(&self, name: &str);

    /// The last state applied via [`apply_state`](Surface::apply_state).
    fn state(&self) -> SurfaceState;
    fn apply_state(&self, state: SurfaceState);

    fn input_area_contains(&self, point: Point) -> bool;

    /// Ask the client to close this surface.
    fn request_close(&self);
}

/// One connected client application.
pub trait Session: Send + Sync {
    fn process_id(&self) -> i32;
    fn default_surface(&self) -> Option<SurfaceId>;

    /// The session's next surface after `surface`, cycling.
    fn surface_after(&self, surface: SurfaceId) -> Option<SurfaceId>;
}

/// The focus/raise controller owned by the embedding shell.
pub trait FocusController: Send + Sync {
    fn focused_session(&self) -> Option<SessionId>;
    fn focused_surface(&self) -> Option<SurfaceId>;

    /// Move focus to the next session, in shell-defined order.
    fn focus_next_session(&self);

    fn set_focus_to(&self, session: Option<SessionId>, surface: Option<SurfaceId>);

    /// Top-most surface whose input area contains `point`.
    fn surface_at(&self, point: Point) -> Option<SurfaceId>;

    /// Bring `surfaces` to the top of the stack, preserving their
    /// order within the set.
    fn raise(&self, surfaces: &SurfaceSet);
}
