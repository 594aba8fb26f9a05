//! The metadata store: session, surface and display bookkeeping.
//!
//! Entities are addressed by opaque integer IDs assigned by the scene
//! layer. The registry keys its metadata by ID and keeps a side table
//! of weak handles; an entry whose handle has expired is skipped by
//! [`find_session`](Registry::find_session) and resolves to `None`,
//! never dereferenced.
//!
//! Looking up metadata for an ID the engine was never notified about
//! is a caller contract violation and panics.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::geometry::{Rect, Rectangles};
use crate::policy::SurfaceState;
use crate::scene::{Session, SessionHandle, Surface, SurfaceHandle};

/// Opaque identity of a connected client application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Opaque identity of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface:{}", self.0)
    }
}

/// Engine-owned metadata for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    /// Region of display space allocated to this session.
    pub tile: Rect,
    /// The session's surfaces, in creation order.
    pub surfaces: Vec<SurfaceId>,
}

/// Engine-owned metadata for one surface.
#[derive(Debug, Clone)]
pub struct SurfaceInfo {
    /// Owning session. Must remain in the session map for as long as
    /// this entry exists.
    pub session: SessionId,
    /// Current visual state.
    pub state: SurfaceState,
    /// Geometry to return to when leaving a maximized state.
    pub restore_rect: Rect,
    pub parent: Option<SurfaceId>,
    pub children: Vec<SurfaceId>,
}

struct SessionSlot {
    handle: SessionHandle,
    info: SessionInfo,
}

struct SurfaceSlot {
    handle: SurfaceHandle,
    info: SurfaceInfo,
}

/// Thread-unsafe by itself; the engine serializes all access behind
/// its mutex.
#[derive(Default)]
pub struct Registry {
    sessions: IndexMap<SessionId, SessionSlot>,
    surfaces: HashMap<SurfaceId, SurfaceSlot>,
    displays: Rectangles,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub fn add_session(&mut self, id: SessionId, handle: SessionHandle) {
        let previous = self.sessions.insert(
            id,
            SessionSlot {
                handle,
                info: SessionInfo::default(),
            },
        );
        assert!(previous.is_none(), "duplicate add_session for {id}");
    }

    /// Erase a session and any surface metadata still recorded under
    /// it. Surviving surfaces drop parent/child links into the purged
    /// set. Later sessions keep their relative order, so tiles re-pack
    /// deterministically.
    pub fn remove_session(&mut self, id: SessionId) {
        self.sessions.shift_remove(&id);
        self.surfaces.retain(|_, slot| slot.info.session != id);

        let surviving: HashSet<SurfaceId> = self.surfaces.keys().copied().collect();
        for slot in self.surfaces.values_mut() {
            if slot.info.parent.is_some_and(|p| !surviving.contains(&p)) {
                slot.info.parent = None;
            }
            slot.info.children.retain(|c| surviving.contains(c));
        }
    }

    pub fn add_surface(&mut self, id: SurfaceId, handle: SurfaceHandle, info: SurfaceInfo) {
        assert!(
            self.sessions.contains_key(&info.session),
            "add_surface for {id} names unknown {}",
            info.session
        );
        let previous = self.surfaces.insert(id, SurfaceSlot { handle, info });
        assert!(previous.is_none(), "duplicate add_surface for {id}");
    }

    pub fn remove_surface(&mut self, id: SurfaceId) -> Option<SurfaceInfo> {
        self.surfaces.remove(&id).map(|slot| slot.info)
    }

    pub fn add_display(&mut self, area: Rect) {
        self.displays.add(area);
    }

    pub fn remove_display(&mut self, area: Rect) {
        self.displays.remove(area);
    }

    pub fn displays(&self) -> &Rectangles {
        &self.displays
    }

    // ── Metadata access ──────────────────────────────────────────────

    /// # Panics
    /// If the engine was never notified of `id`.
    pub fn session_info(&self, id: SessionId) -> &SessionInfo {
        match self.sessions.get(&id) {
            Some(slot) => &slot.info,
            None => panic!("unknown {id}: missing add_session notification"),
        }
    }

    /// # Panics
    /// If the engine was never notified of `id`.
    pub fn session_info_mut(&mut self, id: SessionId) -> &mut SessionInfo {
        match self.sessions.get_mut(&id) {
            Some(slot) => &mut slot.info,
            None => panic!("unknown {id}: missing add_session notification"),
        }
    }

    /// # Panics
    /// If the engine was never notified of `id`.
    pub fn surface_info(&self, id: SurfaceId) -> &SurfaceInfo {
        match self.surfaces.get(&id) {
            Some(slot) => &slot.info,
            None => panic!("unknown {id}: missing add_surface notification"),
        }
    }

    /// # Panics
    /// If the engine was never notified of `id`.
    pub fn surface_info_mut(&mut self, id: SurfaceId) -> &mut SurfaceInfo {
        match self.surfaces.get_mut(&id) {
            Some(slot) => &mut slot.info,
            None => panic!("unknown {id}: missing add_surface notification"),
        }
    }

    pub fn get_session_info(&self, id: SessionId) -> Option<&SessionInfo> {
        self.sessions.get(&id).map(|slot| &slot.info)
    }

    pub fn get_surface_info(&self, id: SurfaceId) -> Option<&SurfaceInfo> {
        self.surfaces.get(&id).map(|slot| &slot.info)
    }

    pub fn get_surface_info_mut(&mut self, id: SurfaceId) -> Option<&mut SurfaceInfo> {
        self.surfaces.get_mut(&id).map(|slot| &mut slot.info)
    }

    pub fn contains_session(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn contains_surface(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    // ── Handle resolution ────────────────────────────────────────────

    pub fn session_handle(&self, id: SessionId) -> Option<Arc<dyn Session>> {
        self.sessions.get(&id).and_then(|slot| slot.handle.upgrade())
    }

    pub fn surface_handle(&self, id: SurfaceId) -> Option<Arc<dyn Surface>> {
        self.surfaces.get(&id).and_then(|slot| slot.handle.upgrade())
    }

    // ── Iteration ────────────────────────────────────────────────────

    /// Session IDs in insertion order. This is the order tiles are
    /// assigned in.
    pub fn session_ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }

    pub fn iter_sessions(&self) -> impl Iterator<Item = (SessionId, &SessionInfo)> {
        self.sessions.iter().map(|(id, slot)| (*id, &slot.info))
    }

    pub fn iter_surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceInfo)> {
        self.surfaces.iter().map(|(id, slot)| (*id, &slot.info))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Linear scan over sessions with a live handle, in insertion
    /// order; first match wins.
    pub fn find_session(&self, predicate: impl Fn(&SessionInfo) -> bool) -> Option<SessionId> {
        self.sessions
            .iter()
            .filter(|(_, slot)| slot.handle.upgrade().is_some())
            .find(|(_, slot)| predicate(&slot.info))
            .map(|(id, _)| *id)
    }
}
