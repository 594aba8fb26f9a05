//! Tessella Core — policy-driven window-management engine
//!
//! This crate is the window-management core of a compositing display
//! server: it tracks sessions (client applications), surfaces
//! (windows) and displays, and forwards every lifecycle notification
//! and input event to a pluggable [`WindowManagementPolicy`].
//! Rendering, the wire protocol and display mode-setting live
//! elsewhere; the engine only sees opaque IDs, weak handles and the
//! narrow [`scene`] collaborator traits.
//!
//! Two policies ship with the crate: the reference [`TilingPolicy`],
//! which partitions the display area into one vertical strip per
//! session, and the [`FullscreenPolicy`], which stretches every
//! surface over the whole display area and otherwise does nothing.
//!
//! # Quick start
//! ```no_run
//! use std::sync::Arc;
//! use tessella_core::{SurfaceParams, TilingPolicy, WindowManager};
//! use tessella_core::geometry::Rect;
//! use tessella_core::scene::FocusController;
//! # fn scene_focus_controller() -> Arc<dyn FocusController> { unimplemented!() }
//! # fn scene_realize(p: &SurfaceParams) -> (tessella_core::SurfaceId, tessella_core::SurfaceHandle) { unimplemented!() }
//! # fn scene_session_handle() -> tessella_core::SessionHandle { unimplemented!() }
//!
//! let focus: Arc<dyn FocusController> = scene_focus_controller();
//! let wm = WindowManager::new(focus, Box::new(TilingPolicy::new()));
//!
//! wm.add_display(Rect::new(0, 0, 1920, 1080));
//! let session = tessella_core::SessionId(1);
//! wm.add_session(session, scene_session_handle());
//!
//! // The shell realizes the surface with the placement the policy
//! // accepted and hands back the ID and a weak handle.
//! let surface = wm.add_surface(session, SurfaceParams::new(640, 480), scene_realize);
//! # let _ = surface;
//! ```
//!
//! # Concurrency
//! One mutex serializes every public operation, policy callback
//! included. The engine never blocks on anything else and spawns no
//! threads; it is driven synchronously from the shell's dispatch
//! threads. Policies call back through [`tools::Tools`], which is
//! handed to them with the lock already held — they can never reach
//! the locking entry points.

pub mod event;
pub mod fullscreen;
pub mod geometry;
pub mod invariants;
pub mod policy;
pub mod registry;
pub mod scene;
pub mod tiling;
pub mod tools;

pub use fullscreen::FullscreenPolicy;
pub use policy::{SurfaceParams, SurfaceSpec, SurfaceState, WindowManagementPolicy};
pub use registry::{SessionId, SessionInfo, SurfaceId, SurfaceInfo};
pub use scene::{FocusController, SessionHandle, SurfaceHandle, SurfaceSet};
pub use tiling::TilingPolicy;

use std::sync::{Arc, Mutex};

use tracing::debug;

use event::{KeyboardEvent, PointerEvent, TouchEvent};
use geometry::Rect;
use registry::Registry;
use tools::Tools;

struct Inner {
    registry: Registry,
    policy: Box<dyn WindowManagementPolicy>,
}

/// The window-manager engine and façade.
///
/// Owns the metadata store and the lock; the scene layer owns the
/// sessions and surfaces themselves.
pub struct WindowManager {
    focus: Arc<dyn FocusController>,
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager").finish_non_exhaustive()
    }
}

impl WindowManager {
    pub fn new(focus: Arc<dyn FocusController>, policy: Box<dyn WindowManagementPolicy>) -> Self {
        Self {
            focus,
            inner: Mutex::new(Inner {
                registry: Registry::new(),
                policy,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("window manager mutex poisoned")
    }

    fn check_invariants(registry: &Registry, operation: &str) {
        #[cfg(debug_assertions)]
        if let Err(violation) = invariants::validate(registry) {
            tracing::warn!("invariant violation after {operation}: {violation}");
        }
        #[cfg(not(debug_assertions))]
        let _ = (registry, operation);
    }

    // ── Session lifecycle ────────────────────────────────────────────

    pub fn add_session(&self, session: SessionId, handle: SessionHandle) {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;

        registry.add_session(session, handle);
        debug!(%session, "session added");

        policy.handle_session_info_updated(&mut Tools::new(registry, self.focus.as_ref()));
        Self::check_invariants(registry, "add_session");
    }

    pub fn remove_session(&self, session: SessionId) {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;

        registry.remove_session(session);
        debug!(%session, "session removed");

        policy.handle_session_info_updated(&mut Tools::new(registry, self.focus.as_ref()));
        Self::check_invariants(registry, "remove_session");
    }

    // ── Surface lifecycle ────────────────────────────────────────────

    /// Place and realize a new surface.
    ///
    /// The policy first adjusts `params`; `build` then realizes the
    /// surface with the accepted placement and returns its ID and a
    /// weak handle. The restore rectangle is initialized from the
    /// realized surface's geometry.
    pub fn add_surface(
        &self,
        session: SessionId,
        params: SurfaceParams,
        build: impl FnOnce(&SurfaceParams) -> (SurfaceId, SurfaceHandle),
    ) -> SurfaceId {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;

        let placed =
            policy.handle_place_new_surface(&mut Tools::new(registry, self.focus.as_ref()), session, params);
        let (surface, handle) = build(&placed);

        let restore_rect = match handle.upgrade() {
            Some(live) => Rect::from_parts(live.top_left(), live.size()),
            None => Rect::from_parts(placed.top_left, placed.size),
        };
        registry.add_surface(
            surface,
            handle,
            SurfaceInfo {
                session,
                state: SurfaceState::Restored,
                restore_rect,
                parent: placed.parent,
                children: Vec::new(),
            },
        );
        if let Some(parent) = placed.parent {
            registry.surface_info_mut(parent).children.push(surface);
        }
        debug!(%session, %surface, "surface added");

        policy.handle_new_surface(&mut Tools::new(registry, self.focus.as_ref()), session, surface);
        Self::check_invariants(registry, "add_surface");
        surface
    }

    pub fn remove_surface(&self, session: SessionId, surface: SurfaceId) {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;

        policy.handle_delete_surface(&mut Tools::new(registry, self.focus.as_ref()), session, surface);

        if let Some(info) = registry.remove_surface(surface) {
            if let Some(parent) = info.parent {
                if let Some(parent_info) = registry.get_surface_info_mut(parent) {
                    parent_info.children.retain(|&child| child != surface);
                }
            }
            for child in info.children {
                if let Some(child_info) = registry.get_surface_info_mut(child) {
                    child_info.parent = None;
                }
            }
        }
        debug!(%session, %surface, "surface removed");
        Self::check_invariants(registry, "remove_surface");
    }

    /// Apply client-requested attribute changes to a surface.
    pub fn modify_surface(&self, session: SessionId, surface: SurfaceId, spec: &SurfaceSpec) {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;

        policy.handle_modify_surface(
            &mut Tools::new(registry, self.focus.as_ref()),
            session,
            surface,
            spec,
        );
        Self::check_invariants(registry, "modify_surface");
    }

    /// Request a surface state transition. Returns the state actually
    /// applied, which is also recorded on the surface handle.
    pub fn set_surface_state(&self, surface: SurfaceId, requested: SurfaceState) -> SurfaceState {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;

        let applied =
            policy.handle_set_state(&mut Tools::new(registry, self.focus.as_ref()), surface, requested);
        if let Some(live) = registry.surface_handle(surface) {
            live.apply_state(applied);
        }
        Self::check_invariants(registry, "set_surface_state");
        applied
    }

    // ── Display configuration ────────────────────────────────────────

    pub fn add_display(&self, area: Rect) {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;

        registry.add_display(area);
        debug!(display = %area, "display added");

        policy.handle_displays_updated(&mut Tools::new(registry, self.focus.as_ref()));
        Self::check_invariants(registry, "add_display");
    }

    pub fn remove_display(&self, area: Rect) {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;

        registry.remove_display(area);
        debug!(display = %area, "display removed");

        policy.handle_displays_updated(&mut Tools::new(registry, self.focus.as_ref()));
        Self::check_invariants(registry, "remove_display");
    }

    // ── Input dispatch ───────────────────────────────────────────────

    /// Returns whether the event was consumed.
    pub fn handle_keyboard_event(&self, event: &KeyboardEvent) -> bool {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;
        policy.handle_keyboard_event(&mut Tools::new(registry, self.focus.as_ref()), event)
    }

    /// Returns whether the event was consumed.
    pub fn handle_touch_event(&self, event: &TouchEvent) -> bool {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;
        policy.handle_touch_event(&mut Tools::new(registry, self.focus.as_ref()), event)
    }

    /// Returns whether the event was consumed.
    pub fn handle_pointer_event(&self, event: &PointerEvent) -> bool {
        let mut inner = self.lock();
        let Inner { registry, policy } = &mut *inner;
        policy.handle_pointer_event(&mut Tools::new(registry, self.focus.as_ref()), event)
    }

    // ── Introspection ────────────────────────────────────────────────

    /// The tile currently allocated to `session`, if it is tracked.
    pub fn tile_of(&self, session: SessionId) -> Option<Rect> {
        self.lock()
            .registry
            .get_session_info(session)
            .map(|info| info.tile)
    }

    /// The surfaces recorded under `session`, in creation order.
    pub fn surfaces_of(&self, session: SessionId) -> Vec<SurfaceId> {
        self.lock()
            .registry
            .get_session_info(session)
            .map(|info| info.surfaces.clone())
            .unwrap_or_default()
    }
}
