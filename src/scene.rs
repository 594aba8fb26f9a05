//! Headless demo scene
//!
//! An in-memory stand-in for the compositor's scene graph: it owns the
//! sessions and surfaces, tracks focus and stacking order, and hands
//! the engine the opaque IDs and weak handles it expects. There is no
//! rendering; surface geometry is just data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::info;

use tessella_core::geometry::{Point, Rect, Size};
use tessella_core::scene::{FocusController, Session, Surface, SurfaceSet};
use tessella_core::{SessionHandle, SessionId, SurfaceHandle, SurfaceId, SurfaceParams, SurfaceState};

struct DemoSurface {
    geometry: Mutex<Rect>,
    name: Mutex<String>,
    state: Mutex<SurfaceState>,
}

impl DemoSurface {
    fn lock_geometry(&self) -> MutexGuard<'_, Rect> {
        self.geometry.lock().expect("surface geometry mutex poisoned")
    }
}

impl Surface for DemoSurface {
    fn top_left(&self) -> Point {
        self.lock_geometry().top_left
    }

    fn size(&self) -> Size {
        self.lock_geometry().size
    }

    fn move_to(&self, top_left: Point) {
        self.lock_geometry().top_left = top_left;
    }

    fn resize(&self, size: Size) {
        self.lock_geometry().size = size;
    }

    fn rename(&self, name: &str) {
        *self.name.lock().expect("surface name mutex poisoned") = name.to_owned();
    }

    fn state(&self) -> SurfaceState {
        *self.state.lock().expect("surface state mutex poisoned")
    }

    fn apply_state(&self, state: SurfaceState) {
        *self.state.lock().expect("surface state mutex poisoned") = state;
    }

    fn input_area_contains(&self, point: Point) -> bool {
        self.lock_geometry().contains(point)
    }

    fn request_close(&self) {
        let name = self.name.lock().expect("surface name mutex poisoned");
        info!(surface = %*name, "close requested");
    }
}

struct DemoSession {
    pid: i32,
    surfaces: Mutex<Vec<SurfaceId>>,
}

impl Session for DemoSession {
    fn process_id(&self) -> i32 {
        self.pid
    }

    fn default_surface(&self) -> Option<SurfaceId> {
        self.surfaces
            .lock()
            .expect("session surface list mutex poisoned")
            .first()
            .copied()
    }

    fn surface_after(&self, surface: SurfaceId) -> Option<SurfaceId> {
        let surfaces = self
            .surfaces
            .lock()
            .expect("session surface list mutex poisoned");
        let position = surfaces.iter().position(|&s| s == surface)?;
        surfaces.get((position + 1) % surfaces.len()).copied()
    }
}

#[derive(Default)]
struct SceneState {
    sessions: Vec<(SessionId, Arc<DemoSession>)>,
    surfaces: HashMap<SurfaceId, Arc<DemoSurface>>,
    /// Stacking order, bottom to top.
    stack: Vec<SurfaceId>,
    focused_session: Option<SessionId>,
    focused_surface: Option<SurfaceId>,
    next_session: u64,
    next_surface: u64,
}

/// The demo scene. Shared with the engine as its focus controller.
#[derive(Default)]
pub struct HeadlessScene {
    state: Mutex<SceneState>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SceneState> {
        self.state.lock().expect("scene mutex poisoned")
    }

    /// Open a session. Demo sessions all belong to this process.
    pub fn open_session(&self) -> (SessionId, SessionHandle) {
        let mut state = self.lock();
        state.next_session += 1;
        let id = SessionId(state.next_session);
        let session = Arc::new(DemoSession {
            pid: std::process::id() as i32,
            surfaces: Mutex::new(Vec::new()),
        });
        let weak = Arc::downgrade(&session);
        let handle: Weak<dyn Session> = weak;
        state.sessions.push((id, session));
        (id, handle)
    }

    /// Realize a surface with the placement the policy accepted.
    pub fn realize_surface(
        &self,
        session: SessionId,
        params: &SurfaceParams,
    ) -> (SurfaceId, SurfaceHandle) {
        let mut state = self.lock();
        state.next_surface += 1;
        let id = SurfaceId(state.next_surface);
        let surface = Arc::new(DemoSurface {
            geometry: Mutex::new(Rect::from_parts(params.top_left, params.size)),
            name: Mutex::new(params.name.clone()),
            state: Mutex::new(SurfaceState::Restored),
        });
        let weak = Arc::downgrade(&surface);
        let handle: Weak<dyn Surface> = weak;

        state.surfaces.insert(id, surface);
        state.stack.push(id);
        if let Some((_, owner)) = state.sessions.iter().find(|(s, _)| *s == session) {
            owner
                .surfaces
                .lock()
                .expect("session surface list mutex poisoned")
                .push(id);
        }
        (id, handle)
    }

    /// Current geometry of a surface, if it still exists.
    pub fn surface_geometry(&self, surface: SurfaceId) -> Option<Rect> {
        self.lock()
            .surfaces
            .get(&surface)
            .map(|s| *s.lock_geometry())
    }
}

impl FocusController for HeadlessScene {
    fn focused_session(&self) -> Option<SessionId> {
        self.lock().focused_session
    }

    fn focused_surface(&self) -> Option<SurfaceId> {
        self.lock().focused_surface
    }

    fn focus_next_session(&self) {
        let mut state = self.lock();
        if state.sessions.is_empty() {
            state.focused_session = None;
            state.focused_surface = None;
            return;
        }

        let next_index = match state.focused_session {
            Some(current) => state
                .sessions
                .iter()
                .position(|(id, _)| *id == current)
                .map_or(0, |i| (i + 1) % state.sessions.len()),
            None => 0,
        };
        let (id, session) = &state.sessions[next_index];
        let focused = session.default_surface();
        state.focused_session = Some(*id);
        state.focused_surface = focused;
    }

    fn set_focus_to(&self, session: Option<SessionId>, surface: Option<SurfaceId>) {
        let mut state = self.lock();
        state.focused_session = session;
        state.focused_surface = surface;
    }

    fn surface_at(&self, point: Point) -> Option<SurfaceId> {
        let state = self.lock();
        state
            .stack
            .iter()
            .rev()
            .find(|id| {
                state
                    .surfaces
                    .get(id)
                    .is_some_and(|s| s.input_area_contains(point))
            })
            .copied()
    }

    fn raise(&self, surfaces: &SurfaceSet) {
        let mut state = self.lock();
        state.stack.retain(|id| !surfaces.contains(id));
        state.stack.extend(surfaces.iter().copied());
    }
}
