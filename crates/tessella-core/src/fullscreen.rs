//! The fullscreen/null policy.
//!
//! Stretches every new surface to fill the bounding rectangle of the
//! active displays and otherwise stays out of the way: no tiles, no
//! gestures, no state transitions, input never consumed.

use crate::event::{KeyboardEvent, PointerEvent, TouchEvent};
use crate::policy::{SurfaceParams, SurfaceSpec, SurfaceState, WindowManagementPolicy};
use crate::registry::{SessionId, SurfaceId};
use crate::tools::Tools;

#[derive(Default)]
pub struct FullscreenPolicy;

impl FullscreenPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl WindowManagementPolicy for FullscreenPolicy {
    fn handle_session_info_updated(&mut self, _tools: &mut Tools<'_>) {}

    fn handle_displays_updated(&mut self, _tools: &mut Tools<'_>) {}

    fn handle_place_new_surface(
        &mut self,
        tools: &mut Tools<'_>,
        _session: SessionId,
        request: SurfaceParams,
    ) -> SurfaceParams {
        let mut params = request;
        if let Some(bounding) = tools.displays().bounding_rectangle() {
            params.top_left = bounding.top_left;
            params.size = bounding.size;
        }
        params
    }

    fn handle_new_surface(
        &mut self,
        tools: &mut Tools<'_>,
        session: SessionId,
        surface: SurfaceId,
    ) {
        tools.info_for_session_mut(session).surfaces.push(surface);
    }

    fn handle_modify_surface(
        &mut self,
        tools: &mut Tools<'_>,
        _session: SessionId,
        surface: SurfaceId,
        spec: &SurfaceSpec,
    ) {
        if let Some(name) = &spec.name {
            if let Some(surface) = tools.surface(surface) {
                surface.rename(name);
            }
        }
    }

    fn handle_delete_surface(
        &mut self,
        tools: &mut Tools<'_>,
        session: SessionId,
        surface: SurfaceId,
    ) {
        tools
            .info_for_session_mut(session)
            .surfaces
            .retain(|&s| s != surface);
    }

    fn handle_set_state(
        &mut self,
        tools: &mut Tools<'_>,
        surface: SurfaceId,
        _requested: SurfaceState,
    ) -> SurfaceState {
        tools.info_for_surface(surface).state
    }

    fn handle_keyboard_event(&mut self, _tools: &mut Tools<'_>, _event: &KeyboardEvent) -> bool {
        false
    }

    fn handle_touch_event(&mut self, _tools: &mut Tools<'_>, _event: &TouchEvent) -> bool {
        false
    }

    fn handle_pointer_event(&mut self, _tools: &mut Tools<'_>, _event: &PointerEvent) -> bool {
        false
    }
}
