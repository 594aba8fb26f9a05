//! The reference tiling policy.
//!
//! Partitions the bounding rectangle of the active displays into one
//! vertical strip per session, places new surfaces inside their
//! session's tile, and implements click-to-focus, drag-to-move,
//! drag-to-resize and the keyboard shortcuts.
//!
//! Shortcuts (modifier + key, lock modifiers ignored):
//! - Alt-F11 / Shift-F11 / Ctrl-F11: toggle maximized /
//!   vertically-maximized / horizontally-maximized on the focused
//!   session's default surface; toggling the active state restores.
//! - Alt-Tab: focus the next session.
//! - Alt-Grave: focus the session's next surface.
//! - Alt-F4: SIGTERM the focused session's process.
//! - Ctrl-F4: ask the focused session's default surface to close.

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::event::{
    scan_code, Buttons, KeyboardAction, KeyboardEvent, Modifiers, PointerAction, PointerEvent,
    TouchAction, TouchEvent,
};
use crate::geometry::{clamp_drag, scale_resize, Point, Rect, Size};
use crate::policy::{SurfaceParams, SurfaceSpec, SurfaceState, WindowManagementPolicy};
use crate::registry::{SessionId, SurfaceId};
use crate::tools::Tools;

/// Width of tile `index` out of `count` over a strip of `total_width`.
///
/// Returns the half-open span `[x, x')`. Spans exactly partition
/// `[0, total_width)`, with the integer-division remainder absorbed
/// by the rightmost tiles.
fn tile_span(index: usize, count: usize, total_width: i32) -> (i32, i32) {
    let x = (i64::from(total_width) * index as i64 / count as i64) as i32;
    let end = (i64::from(total_width) * (index as i64 + 1) / count as i64) as i32;
    (x, end)
}

#[derive(Default)]
pub struct TilingPolicy {
    old_cursor: Point,
    old_surface: Option<SurfaceId>,
}

impl TilingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Layout ───────────────────────────────────────────────────────

    fn update_tiles(&mut self, tools: &mut Tools<'_>) {
        let sessions = tools.session_ids();
        let Some(bounding) = tools.displays().bounding_rectangle() else {
            return;
        };
        if sessions.is_empty() {
            return;
        }

        let count = sessions.len();
        let total_width = bounding.size.width;
        let total_height = bounding.size.height;

        for (index, session) in sessions.into_iter().enumerate() {
            let (x, end) = tile_span(index, count, total_width);
            let new_tile = Rect::new(x, 0, end - x, total_height);

            let old_tile = tools.info_for_session(session).tile;
            Self::update_surfaces(tools, session, old_tile, new_tile);
            tools.info_for_session_mut(session).tile = new_tile;

            debug!(%session, tile = %new_tile, "tile assigned");
        }
    }

    /// Displace every surface of `session` by the tile movement, then
    /// refit it to the new tile.
    fn update_surfaces(tools: &mut Tools<'_>, session: SessionId, old_tile: Rect, new_tile: Rect) {
        let displacement = new_tile.top_left - old_tile.top_left;
        let surfaces = tools.info_for_session(session).surfaces.clone();

        for id in surfaces {
            if let Some(surface) = tools.surface(id) {
                let old_pos = surface.top_left();
                surface.move_to(old_pos + displacement);

                // Scale if it was filling the tile's width/height;
                // otherwise keep the size but clamp it into the tile.
                let old_size = surface.size();
                let scaled_width = if old_size.width == old_tile.size.width {
                    new_tile.size.width
                } else {
                    old_size.width
                };
                let scaled_height = if old_size.height == old_tile.size.height {
                    new_tile.size.height
                } else {
                    old_size.height
                };

                let offset = surface.top_left() - new_tile.top_left;
                surface.resize(Size::new(
                    scaled_width.min(new_tile.size.width - offset.dx).max(0),
                    scaled_height.min(new_tile.size.height - offset.dy).max(0),
                ));
            }
        }
    }

    fn clip_to_tile(params: &mut SurfaceParams, tile: Rect) {
        let displacement = params.top_left - tile.top_left;
        params.size.width = params
            .size
            .width
            .min(tile.size.width - displacement.dx)
            .max(0);
        params.size.height = params
            .size
            .height
            .min(tile.size.height - displacement.dy)
            .max(0);
    }

    fn session_under(tools: &Tools<'_>, position: Point) -> Option<SessionId> {
        tools.find_session(|info| info.tile.contains(position))
    }

    // ── Gestures ─────────────────────────────────────────────────────

    fn click(&mut self, tools: &mut Tools<'_>, cursor: Point) {
        let session = Self::session_under(tools, cursor);
        let surface = tools.surface_at(cursor);
        tools.set_focus_to(session, surface);
        if let Some(focused) = tools.focused_surface() {
            tools.raise_tree(focused);
        }
        self.old_cursor = cursor;
    }

    fn drag(&mut self, tools: &mut Tools<'_>, cursor: Point) {
        if let Some(session) = Self::session_under(tools, cursor) {
            if Self::session_under(tools, self.old_cursor) == Some(session) {
                let tile = tools.info_for_session(session).tile;

                let mut moved = match self.old_surface {
                    Some(surface) => {
                        Self::drag_surface(tools, surface, cursor, self.old_cursor, tile)
                    }
                    None => false,
                };

                if !moved {
                    if let Some(surface) =
                        tools.session(session).and_then(|s| s.default_surface())
                    {
                        if Self::drag_surface(tools, surface, cursor, self.old_cursor, tile) {
                            self.old_surface = Some(surface);
                            moved = true;
                        }
                    }
                }

                if !moved {
                    // Fall back to the first surface under the old
                    // cursor position.
                    let surfaces = tools.info_for_session(session).surfaces.clone();
                    for surface in surfaces {
                        if Self::drag_surface(tools, surface, cursor, self.old_cursor, tile) {
                            self.old_surface = Some(surface);
                            break;
                        }
                    }
                }
            }
        }

        self.old_cursor = cursor;
    }

    fn drag_surface(
        tools: &Tools<'_>,
        surface: SurfaceId,
        to: Point,
        from: Point,
        bounds: Rect,
    ) -> bool {
        let Some(surface) = tools.surface(surface) else {
            return false;
        };
        if !surface.input_area_contains(from) {
            return false;
        }

        let rect = Rect::from_parts(surface.top_left(), surface.size());
        let movement = clamp_drag(rect, to - from, bounds);
        surface.move_to(rect.top_left + movement);
        true
    }

    fn resize(&mut self, tools: &mut Tools<'_>, cursor: Point) {
        if let Some(session) = Self::session_under(tools, cursor) {
            if Self::session_under(tools, self.old_cursor) == Some(session) {
                let tile = tools.info_for_session(session).tile;

                let resized = match tools.focused_surface() {
                    Some(surface) => {
                        Self::resize_surface(tools, surface, cursor, self.old_cursor, tile)
                    }
                    None => false,
                };

                if !resized {
                    if let Some(surface) = tools.surface_at(self.old_cursor) {
                        if tools.info_for_surface(surface).session == session
                            && Self::resize_surface(tools, surface, cursor, self.old_cursor, tile)
                        {
                            tools.set_focus_to(Some(session), Some(surface));
                            if let Some(focused) = tools.focused_surface() {
                                tools.raise_tree(focused);
                            }
                        }
                    }
                }
            }
        }

        self.old_cursor = cursor;
    }

    fn resize_surface(
        tools: &Tools<'_>,
        surface: SurfaceId,
        cursor: Point,
        old_cursor: Point,
        bounds: Rect,
    ) -> bool {
        let Some(surface) = tools.surface(surface) else {
            return false;
        };
        if !surface.input_area_contains(old_cursor) {
            return false;
        }

        let rect = Rect::from_parts(surface.top_left(), surface.size());
        match scale_resize(rect, old_cursor, cursor, bounds) {
            Some(size) => {
                surface.resize(size);
                true
            }
            None => false,
        }
    }

    // ── State toggles ────────────────────────────────────────────────

    fn toggle(&mut self, tools: &mut Tools<'_>, state: SurfaceState) {
        let Some(session) = tools.focused_session() else {
            return;
        };
        let Some(surface) = tools.session(session).and_then(|s| s.default_surface()) else {
            return;
        };
        let Some(handle) = tools.surface(surface) else {
            return;
        };

        // Toggling the active state requests a restore instead.
        let requested = if handle.state() == state {
            SurfaceState::Restored
        } else {
            state
        };

        let applied = self.handle_set_state(tools, surface, requested);
        handle.apply_state(applied);
    }

    fn terminate_session(tools: &Tools<'_>, session: SessionId) {
        if let Some(handle) = tools.session(session) {
            let pid = handle.process_id();
            if let Err(err) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
                warn!(%session, pid, "failed to signal session: {err}");
            }
        }
    }
}

impl WindowManagementPolicy for TilingPolicy {
    fn handle_session_info_updated(&mut self, tools: &mut Tools<'_>) {
        self.update_tiles(tools);
    }

    fn handle_displays_updated(&mut self, tools: &mut Tools<'_>) {
        self.update_tiles(tools);
    }

    fn handle_place_new_surface(
        &mut self,
        tools: &mut Tools<'_>,
        session: SessionId,
        request: SurfaceParams,
    ) -> SurfaceParams {
        let mut params = request;
        let tile = tools.info_for_session(session).tile;

        params.top_left = params.top_left + (tile.top_left - Point::default());
        Self::clip_to_tile(&mut params, tile);
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
        let surfaces = &mut tools.info_for_session_mut(session).surfaces;
        surfaces.retain(|&s| s != surface);
        let emptied = surfaces.is_empty();

        if self.old_surface == Some(surface) {
            self.old_surface = None;
        }

        if emptied && tools.focused_session() == Some(session) {
            tools.focus_next_session();
            if let Some(focused) = tools.focused_surface() {
                tools.raise_tree(focused);
            }
        }
    }

    fn handle_set_state(
        &mut self,
        tools: &mut Tools<'_>,
        surface: SurfaceId,
        requested: SurfaceState,
    ) -> SurfaceState {
        let current = tools.info_for_surface(surface).state;

        match requested {
            SurfaceState::Restored
            | SurfaceState::Maximized
            | SurfaceState::HorizMaximized
            | SurfaceState::VertMaximized => {}
            // Unsupported request: keep the current state.
            _ => return current,
        }

        let Some(handle) = tools.surface(surface) else {
            return current;
        };

        if current == SurfaceState::Restored {
            let snapshot = Rect::from_parts(handle.top_left(), handle.size());
            tools.info_for_surface_mut(surface).restore_rect = snapshot;
        }

        if current == requested {
            return current;
        }

        let session = tools.info_for_surface(surface).session;
        let tile = tools.info_for_session(session).tile;
        let restore = tools.info_for_surface(surface).restore_rect;

        match requested {
            SurfaceState::Restored => {
                handle.move_to(restore.top_left);
                handle.resize(restore.size);
            }
            SurfaceState::Maximized => {
                handle.move_to(tile.top_left);
                handle.resize(tile.size);
            }
            SurfaceState::HorizMaximized => {
                handle.move_to(Point::new(tile.top_left.x, restore.top_left.y));
                handle.resize(Size::new(
                    tile.size.width,
                    restore.size.height,
                ));
            }
            SurfaceState::VertMaximized => {
                handle.move_to(Point::new(restore.top_left.x, tile.top_left.y));
                handle.resize(Size::new(
                    restore.size.width,
                    tile.size.height,
                ));
            }
            _ => unreachable!("filtered above"),
        }

        tools.info_for_surface_mut(surface).state = requested;
        requested
    }

    fn handle_keyboard_event(&mut self, tools: &mut Tools<'_>, event: &KeyboardEvent) -> bool {
        if event.action != KeyboardAction::Down {
            return false;
        }
        let modifiers = event.modifiers & Modifiers::GESTURE_MASK;

        match event.scan_code {
            scan_code::F11 => match modifiers {
                Modifiers::ALT => {
                    self.toggle(tools, SurfaceState::Maximized);
                    true
                }
                Modifiers::SHIFT => {
                    self.toggle(tools, SurfaceState::VertMaximized);
                    true
                }
                Modifiers::CTRL => {
                    self.toggle(tools, SurfaceState::HorizMaximized);
                    true
                }
                _ => false,
            },

            scan_code::F4 => {
                let Some(session) = tools.focused_session() else {
                    return false;
                };
                match modifiers {
                    Modifiers::ALT => {
                        Self::terminate_session(tools, session);
                        true
                    }
                    Modifiers::CTRL => {
                        if let Some(surface) = tools
                            .session(session)
                            .and_then(|s| s.default_surface())
                            .and_then(|id| tools.surface(id))
                        {
                            surface.request_close();
                            true
                        } else {
                            false
                        }
                    }
                    _ => false,
                }
            }

            scan_code::TAB if modifiers == Modifiers::ALT => {
                tools.focus_next_session();
                if let Some(focused) = tools.focused_surface() {
                    tools.raise_tree(focused);
                }
                true
            }

            scan_code::GRAVE if modifiers == Modifiers::ALT => {
                if let (Some(previous), Some(session)) =
                    (tools.focused_surface(), tools.focused_session())
                {
                    if let Some(next) = tools
                        .session(session)
                        .and_then(|s| s.surface_after(previous))
                    {
                        tools.set_focus_to(Some(session), Some(next));
                        tools.raise_tree(next);
                    }
                }
                true
            }

            _ => false,
        }
    }

    fn handle_touch_event(&mut self, tools: &mut Tools<'_>, event: &TouchEvent) -> bool {
        let Some(cursor) = event.centroid() else {
            return false;
        };

        let mut is_drag = true;
        for point in &event.points {
            match point.action {
                TouchAction::Up => return false,
                TouchAction::Down => is_drag = false,
                TouchAction::Change => {}
            }
        }

        if is_drag && event.points.len() == 3 {
            self.drag(tools, cursor);
            true
        } else {
            self.click(tools, cursor);
            false
        }
    }

    fn handle_pointer_event(&mut self, tools: &mut Tools<'_>, event: &PointerEvent) -> bool {
        let modifiers = event.modifiers & Modifiers::GESTURE_MASK;

        match event.action {
            PointerAction::ButtonDown => {
                self.click(tools, event.position);
                false
            }
            PointerAction::Motion if modifiers == Modifiers::ALT => {
                if event.buttons.contains(Buttons::PRIMARY) {
                    self.drag(tools, event.position);
                    true
                } else if event.buttons.intersects(Buttons::SECONDARY | Buttons::TERTIARY) {
                    self.resize(tools, event.position);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}
