//! The restricted engine surface exposed to policies.
//!
//! A [`Tools`] value is constructed by the engine for the duration of
//! one policy hook, while the engine mutex is held. Everything here
//! executes under that lock; none of these calls may re-enter the
//! engine's public entry points.

use std::sync::Arc;

use crate::geometry::{Point, Rectangles};
use crate::registry::{Registry, SessionId, SessionInfo, SurfaceId, SurfaceInfo};
use crate::scene::{FocusController, Session, Surface, SurfaceSet};

pub struct Tools<'a> {
    registry: &'a mut Registry,
    focus: &'a dyn FocusController,
}

impl<'a> Tools<'a> {
    pub(crate) fn new(registry: &'a mut Registry, focus: &'a dyn FocusController) -> Self {
        Self { registry, focus }
    }

    // ── Metadata store ───────────────────────────────────────────────

    /// # Panics
    /// If the engine was never notified of `session`.
    pub fn info_for_session(&self, session: SessionId) -> &SessionInfo {
        self.registry.session_info(session)
    }

    /// # Panics
    /// If the engine was never notified of `session`.
    pub fn info_for_session_mut(&mut self, session: SessionId) -> &mut SessionInfo {
        self.registry.session_info_mut(session)
    }

    /// # Panics
    /// If the engine was never notified of `surface`.
    pub fn info_for_surface(&self, surface: SurfaceId) -> &SurfaceInfo {
        self.registry.surface_info(surface)
    }

    /// # Panics
    /// If the engine was never notified of `surface`.
    pub fn info_for_surface_mut(&mut self, surface: SurfaceId) -> &mut SurfaceInfo {
        self.registry.surface_info_mut(surface)
    }

    /// First live session whose info matches `predicate`, in tile
    /// order.
    pub fn find_session(&self, predicate: impl Fn(&SessionInfo) -> bool) -> Option<SessionId> {
        self.registry.find_session(predicate)
    }

    /// Session IDs in tile order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.registry.session_ids().collect()
    }

    pub fn session_count(&self) -> usize {
        self.registry.session_count()
    }

    pub fn displays(&self) -> &Rectangles {
        self.registry.displays()
    }

    // ── Handle resolution ────────────────────────────────────────────

    /// Live handle for `session`, or `None` if it has expired.
    pub fn session(&self, session: SessionId) -> Option<Arc<dyn Session>> {
        self.registry.session_handle(session)
    }

    /// Live handle for `surface`, or `None` if it has expired.
    pub fn surface(&self, surface: SurfaceId) -> Option<Arc<dyn Surface>> {
        self.registry.surface_handle(surface)
    }

    // ── Focus and raise ──────────────────────────────────────────────

    pub fn focused_session(&self) -> Option<SessionId> {
        self.focus.focused_session()
    }

    pub fn focused_surface(&self) -> Option<SurfaceId> {
        self.focus.focused_surface()
    }

    pub fn focus_next_session(&self) {
        self.focus.focus_next_session();
    }

    pub fn set_focus_to(&self, session: Option<SessionId>, surface: Option<SurfaceId>) {
        self.focus.set_focus_to(session, surface);
    }

    pub fn surface_at(&self, point: Point) -> Option<SurfaceId> {
        self.focus.surface_at(point)
    }

    pub fn raise(&self, surfaces: &SurfaceSet) {
        self.focus.raise(surfaces);
    }

    /// Raise `root` and its full descendant tree as one atomic
    /// request. The set is deduplicated, so child cycles cannot
    /// recurse forever.
    pub fn raise_tree(&self, root: SurfaceId) {
        let mut surfaces = SurfaceSet::new();
        let mut pending = vec![root];

        while let Some(surface) = pending.pop() {
            if surfaces.insert(surface) {
                if let Some(info) = self.registry.get_surface_info(surface) {
                    pending.extend(info.children.iter().copied());
                }
            }
        }

        self.focus.raise(&surfaces);
    }
}
