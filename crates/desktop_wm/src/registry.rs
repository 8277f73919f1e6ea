//! The window registry: sole owner of the window collection and the focus
//! counter, and the only component allowed to mutate window state.

use app_catalog::{AppCatalog, ApplicationId};
use serde_json::Value;
use tracing::{debug, trace};

use crate::arrange::{arrangement_targets, Arrangement};
use crate::model::{
    clamp_transparency, DragSession, InteractionState, PointerPosition, ResizeEdge, ResizeSession,
    ShellState, WindowId, WindowPatch, WindowRecord, WindowRect, MAX_TRANSPARENCY,
    MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};
use crate::placement::{PlacementStrategy, RandomPlacement};
use crate::snap::{resolve_snap_zone, SnapPreview};
use crate::time::{Clock, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Side-effect intents emitted by mutating operations for the host shell to
/// execute. The host drains these after every gesture; the core never acts
/// on them itself.
pub enum ShellEffect {
    /// Shell state changed; re-render from [`WindowManager::state`].
    StateChanged,
    /// Move keyboard focus into the window's primary input.
    FocusInput(WindowId),
    /// Clear the desktop transition flag once the delay elapses.
    ClearDesktopTransitionAfter {
        /// Delay in milliseconds before calling
        /// [`WindowManager::clear_desktop_transition`].
        delay_ms: u32,
    },
}

/// Authoritative window/desktop state machine for the shell.
///
/// Constructed by the host and passed by reference to UI code; there are no
/// ambient globals. All operations are synchronous, and every operation that
/// references a missing window id is a silent no-op so UI event races (a
/// close button double-clicked, a drag outliving its window) can never crash
/// the shell.
pub struct WindowManager {
    pub(crate) state: ShellState,
    pub(crate) catalog: AppCatalog,
    pub(crate) placement: Box<dyn PlacementStrategy>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) interaction: InteractionState,
    pub(crate) effects: Vec<ShellEffect>,
}

impl WindowManager {
    /// Manager with the default randomized placement and wall clock.
    pub fn new(catalog: AppCatalog) -> Self {
        Self::with_parts(catalog, Box::new(RandomPlacement::new()), Box::new(SystemClock))
    }

    /// Manager with injected placement and clock, for hosts and tests that
    /// need deterministic behavior.
    pub fn with_parts(
        catalog: AppCatalog,
        placement: Box<dyn PlacementStrategy>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let state = ShellState::new(clock.now());
        Self {
            state,
            catalog,
            placement,
            clock,
            interaction: InteractionState::default(),
            effects: Vec::new(),
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn catalog(&self) -> &AppCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut AppCatalog {
        &mut self.catalog
    }

    /// Takes the queued side-effect intents, leaving the queue empty.
    pub fn drain_effects(&mut self) -> Vec<ShellEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Opens a window for `app_id`, or re-surfaces the existing one.
    ///
    /// When `data` is `Null` and a `Null`-data window for the app already
    /// exists, that instance is un-minimized and focused instead of creating
    /// a duplicate. A non-null `data` payload always creates a fresh
    /// instance. Returns `None` when `app_id` is not in the catalog.
    pub fn open_app(&mut self, app_id: &ApplicationId, data: Value) -> Option<WindowId> {
        let Some(descriptor) = self.catalog.descriptor(app_id).cloned() else {
            trace!(app = %app_id, "open ignored; app not in catalog");
            return None;
        };

        if data.is_null() {
            let existing = self
                .state
                .windows
                .iter()
                .find(|w| w.app_id == *app_id && !w.has_data())
                .map(|w| w.id);
            if let Some(id) = existing {
                if let Some(window) = self.state.window_mut(id) {
                    window.minimized = false;
                }
                self.focus_app(id);
                return Some(id);
            }
        }

        let id = self.allocate_window_id();
        let origin = self.placement.place(id.0);
        let rect = WindowRect {
            x: origin.x,
            y: origin.y,
            w: descriptor.default_width,
            h: descriptor.default_height,
        }
        .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
        let stamp = self.next_focus_stamp();
        self.state.windows.push(WindowRecord {
            id,
            app_id: app_id.clone(),
            title: descriptor.title,
            icon_id: descriptor.icon_id,
            rect,
            restore_rect: None,
            z_index: stamp,
            minimized: false,
            maximized: false,
            always_on_top: false,
            transparency: MAX_TRANSPARENCY,
            flags: descriptor.flags,
            data,
        });

        let now = self.clock.now();
        let active = self.state.active_desktop;
        if let Some(desktop) = self.state.desktop_mut(active) {
            desktop.windows.push(id);
            desktop.updated_at = now;
        }
        self.state.start_menu_open = false;

        debug!(window = ?id, app = %app_id, "opened window");
        self.effects.push(ShellEffect::FocusInput(id));
        self.note_state_changed();
        Some(id)
    }

    /// Removes the window. Tolerates a missing id so double-close is safe.
    pub fn close_app(&mut self, id: WindowId) {
        let Some(window) = self.state.window(id) else {
            return;
        };
        if !window.flags.closable {
            return;
        }

        self.state.windows.retain(|w| w.id != id);
        let now = self.clock.now();
        for desktop in &mut self.state.desktops {
            let before = desktop.windows.len();
            desktop.windows.retain(|w| *w != id);
            if desktop.windows.len() != before {
                desktop.updated_at = now;
            }
        }
        if self.interaction.dragging.as_ref().map(|s| s.window_id) == Some(id) {
            self.interaction.dragging = None;
            self.interaction.snap_preview = None;
        }
        if self.interaction.resizing.as_ref().map(|s| s.window_id) == Some(id) {
            self.interaction.resizing = None;
        }

        debug!(window = ?id, "closed window");
        self.note_state_changed();
    }

    /// Raises the window by stamping it with the next focus-counter value
    /// and closes the start menu. Missing ids consume nothing.
    pub fn focus_app(&mut self, id: WindowId) {
        if self.state.window(id).is_none() {
            return;
        }
        self.state.start_menu_open = false;
        let stamp = self.next_focus_stamp();
        if let Some(window) = self.state.window_mut(id) {
            window.z_index = stamp;
        }
        self.effects.push(ShellEffect::FocusInput(id));
        self.note_state_changed();
    }

    /// Flips the minimized flag. Un-minimizing re-focuses (a fresh stamp);
    /// minimizing keeps the old stamp so restore order stays meaningful and
    /// consumes no counter value.
    pub fn toggle_minimize(&mut self, id: WindowId) {
        let Some(window) = self.state.window(id) else {
            return;
        };
        if window.minimized {
            if let Some(window) = self.state.window_mut(id) {
                window.minimized = false;
            }
            self.focus_app(id);
        } else {
            if !window.flags.minimizable {
                return;
            }
            if let Some(window) = self.state.window_mut(id) {
                window.minimized = true;
            }
            self.note_state_changed();
        }
    }

    /// Flips the maximized flag and re-focuses; both directions consume a
    /// fresh stamp. The restored-state geometry is snapshotted on the way
    /// in and recovered on the way out.
    pub fn toggle_maximize(&mut self, id: WindowId) {
        let Some(window) = self.state.window_mut(id) else {
            return;
        };
        if !window.flags.maximizable {
            return;
        }
        if window.maximized {
            if let Some(rect) = window.restore_rect.take() {
                window.rect = rect;
            }
            window.maximized = false;
        } else {
            if window.restore_rect.is_none() {
                window.restore_rect = Some(window.rect);
            }
            window.maximized = true;
        }
        self.focus_app(id);
    }

    /// Merge-patches the mutable window fields. Position changes honor the
    /// `movable` flag, size changes honor `resizable`, transparency is
    /// clamped, and the id is never patchable.
    pub fn update_window(&mut self, id: WindowId, patch: WindowPatch) {
        let Some(window) = self.state.window_mut(id) else {
            return;
        };
        if window.flags.movable {
            if let Some(x) = patch.x {
                window.rect.x = x;
            }
            if let Some(y) = patch.y {
                window.rect.y = y;
            }
        }
        if window.flags.resizable {
            if let Some(w) = patch.w {
                window.rect.w = w.max(MIN_WINDOW_WIDTH);
            }
            if let Some(h) = patch.h {
                window.rect.h = h.max(MIN_WINDOW_HEIGHT);
            }
        }
        if let Some(title) = patch.title {
            window.title = title;
        }
        if let Some(value) = patch.transparency {
            window.transparency = clamp_transparency(value);
        }
        if let Some(pinned) = patch.always_on_top {
            window.always_on_top = pinned;
        }
        if let Some(flags) = patch.flags {
            window.flags = flags;
        }
        self.note_state_changed();
    }

    /// Snapshots the current geometry into the restore slot.
    pub fn save_window_state(&mut self, id: WindowId) {
        let Some(window) = self.state.window_mut(id) else {
            return;
        };
        window.restore_rect = Some(window.rect);
        self.note_state_changed();
    }

    /// Restores the saved geometry (when present), clears both the
    /// minimized and maximized flags, and re-focuses.
    pub fn restore_window(&mut self, id: WindowId) {
        let Some(window) = self.state.window_mut(id) else {
            return;
        };
        if let Some(rect) = window.restore_rect.take() {
            window.rect = rect;
        }
        window.minimized = false;
        window.maximized = false;
        self.focus_app(id);
    }

    pub fn toggle_always_on_top(&mut self, id: WindowId) {
        let Some(window) = self.state.window_mut(id) else {
            return;
        };
        window.always_on_top = !window.always_on_top;
        self.note_state_changed();
    }

    /// Sets window opacity, clamped to `[0.1, 1.0]`.
    pub fn set_window_transparency(&mut self, id: WindowId, value: f32) {
        let Some(window) = self.state.window_mut(id) else {
            return;
        };
        window.transparency = clamp_transparency(value);
        self.note_state_changed();
    }

    /// Taskbar button behavior: restore when minimized, minimize when
    /// focused, focus otherwise.
    pub fn toggle_taskbar_window(&mut self, id: WindowId) {
        let Some(window) = self.state.window(id) else {
            return;
        };
        if window.minimized || self.state.focused_window_id() == Some(id) {
            self.toggle_minimize(id);
        } else {
            self.focus_app(id);
        }
    }

    pub fn toggle_start_menu(&mut self) {
        self.state.start_menu_open = !self.state.start_menu_open;
        self.note_state_changed();
    }

    pub fn close_start_menu(&mut self) {
        if self.state.start_menu_open {
            self.state.start_menu_open = false;
            self.note_state_changed();
        }
    }

    /// Begins a drag. Non-movable windows are focused but never dragged.
    pub fn begin_move(&mut self, id: WindowId, pointer: PointerPosition) {
        let Some(window) = self.state.window(id) else {
            return;
        };
        let rect_start = window.rect;
        let movable = window.flags.movable;
        self.focus_app(id);
        if movable {
            self.interaction.dragging = Some(DragSession {
                window_id: id,
                pointer_start: pointer,
                rect_start,
            });
        }
    }

    /// Applies the pointer delta to the dragged window and refreshes the
    /// snap ghost-outline preview against `viewport`.
    pub fn update_move(&mut self, pointer: PointerPosition, viewport: WindowRect) {
        let Some(session) = self.interaction.dragging.clone() else {
            return;
        };
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        let Some(window) = self.state.window_mut(session.window_id) else {
            return;
        };
        if window.maximized {
            return;
        }
        window.rect = session.rect_start.offset(dx, dy);
        let resizable = window.flags.resizable;
        let rect = window.rect;
        self.interaction.snap_preview = if resizable {
            resolve_snap_zone(rect, viewport).map(|zone| SnapPreview {
                zone: zone.id,
                rect: zone.rect,
            })
        } else {
            None
        };
        self.note_state_changed();
    }

    /// Ends the drag. An active snap preview commits the zone's rectangle
    /// (after snapshotting the dragged geometry for restore); otherwise the
    /// window keeps its last dragged position.
    pub fn end_move(&mut self) {
        let session = self.interaction.dragging.take();
        let preview = self.interaction.snap_preview.take();
        let Some(session) = session else {
            return;
        };
        if let Some(preview) = preview {
            if let Some(window) = self.state.window_mut(session.window_id) {
                window.restore_rect = Some(window.rect);
                window.rect = preview.rect;
                window.maximized = false;
                debug!(window = ?session.window_id, zone = ?preview.zone, "snapped window on drop");
            }
        }
        self.note_state_changed();
    }

    /// Begins an edge/corner resize. Non-resizable windows are focused but
    /// never resized.
    pub fn begin_resize(&mut self, id: WindowId, edge: ResizeEdge, pointer: PointerPosition) {
        let Some(window) = self.state.window(id) else {
            return;
        };
        let rect_start = window.rect;
        let resizable = window.flags.resizable;
        self.focus_app(id);
        if resizable {
            self.interaction.resizing = Some(ResizeSession {
                window_id: id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
    }

    pub fn update_resize(&mut self, pointer: PointerPosition) {
        let Some(session) = self.interaction.resizing.clone() else {
            return;
        };
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        let Some(window) = self.state.window_mut(session.window_id) else {
            return;
        };
        if window.maximized {
            return;
        }
        window.rect = resize_rect(session.rect_start, session.edge, dx, dy)
            .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
        self.note_state_changed();
    }

    pub fn end_resize(&mut self) {
        if self.interaction.resizing.take().is_some() {
            self.note_state_changed();
        }
    }

    /// Recomputes geometry for every arrangeable window under the given
    /// layout. Cascade also restacks: each arranged window takes a fresh
    /// stamp in collection order, leaving the last one topmost.
    pub fn arrange_windows(&mut self, arrangement: Arrangement, viewport: WindowRect) {
        let targets = arrangement_targets(arrangement, &self.state.windows, viewport);
        if targets.is_empty() {
            return;
        }
        let restack = matches!(arrangement, Arrangement::Cascade);
        for (id, rect) in targets {
            let stamp = if restack {
                Some(self.next_focus_stamp())
            } else {
                None
            };
            if let Some(window) = self.state.window_mut(id) {
                window.rect = rect;
                if let Some(stamp) = stamp {
                    window.z_index = stamp;
                }
            }
        }
        debug!(?arrangement, "arranged windows");
        self.note_state_changed();
    }

    pub(crate) fn note_state_changed(&mut self) {
        self.effects.push(ShellEffect::StateChanged);
    }

    pub(crate) fn next_focus_stamp(&mut self) -> u64 {
        let stamp = self.state.focus_counter;
        self.state.focus_counter = self.state.focus_counter.saturating_add(1);
        stamp
    }

    fn allocate_window_id(&mut self) -> WindowId {
        let id = WindowId(self.state.next_window_id);
        self.state.next_window_id = self.state.next_window_id.saturating_add(1);
        id
    }
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

#[cfg(test)]
mod tests {
    use app_catalog::{AppDescriptor, ApplicationId, WindowFlags};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::placement::GridPlacement;
    use crate::time::FixedClock;

    const VIEWPORT: WindowRect = WindowRect {
        x: 0,
        y: 0,
        w: 1920,
        h: 1080,
    };

    fn notepad_id() -> ApplicationId {
        ApplicationId::trusted("apps.notepad")
    }

    fn manager() -> WindowManager {
        let mut catalog = AppCatalog::new();
        catalog.register(AppDescriptor::new(notepad_id(), "Notepad", "notepad", 420, 300));
        catalog.register(AppDescriptor::new(
            ApplicationId::trusted("apps.gallery"),
            "Gallery",
            "gallery",
            640,
            480,
        ));
        catalog.register(
            AppDescriptor::new(
                ApplicationId::trusted("apps.kiosk"),
                "Kiosk",
                "kiosk",
                800,
                600,
            )
            .with_flags(WindowFlags {
                resizable: false,
                movable: false,
                minimizable: false,
                maximizable: false,
                closable: false,
            }),
        );
        WindowManager::with_parts(
            catalog,
            Box::new(GridPlacement),
            Box::new(FixedClock(chrono::Utc::now())),
        )
    }

    #[test]
    fn open_without_data_reuses_the_existing_instance() {
        let mut wm = manager();
        let first = wm.open_app(&notepad_id(), Value::Null).expect("open");
        let second = wm.open_app(&notepad_id(), Value::Null).expect("reopen");

        assert_eq!(first, second);
        assert_eq!(wm.state().windows.len(), 1);
    }

    #[test]
    fn open_with_data_always_creates_a_fresh_instance() {
        let mut wm = manager();
        let first = wm
            .open_app(&notepad_id(), json!({ "doc_id": 1 }))
            .expect("open");
        let second = wm
            .open_app(&notepad_id(), json!({ "doc_id": 2 }))
            .expect("open");

        assert_ne!(first, second);
        assert_eq!(wm.state().windows.len(), 2);
        assert_eq!(wm.state().window(first).unwrap().data, json!({ "doc_id": 1 }));
        assert_eq!(wm.state().window(second).unwrap().data, json!({ "doc_id": 2 }));
    }

    #[test]
    fn open_for_unknown_app_is_a_silent_noop_until_registered() {
        let mut wm = manager();
        let late = ApplicationId::trusted("apps.late-arrival");
        assert_eq!(wm.open_app(&late, Value::Null), None);
        assert_eq!(wm.state().windows.len(), 0);

        wm.catalog_mut()
            .register(AppDescriptor::new(late.clone(), "Late", "late", 420, 300));
        assert!(wm.open_app(&late, Value::Null).is_some());
        assert_eq!(wm.state().windows.len(), 1);
    }

    #[test]
    fn reopening_a_minimized_instance_unminimizes_and_refocuses() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");
        wm.open_app(&ApplicationId::trusted("apps.gallery"), Value::Null);
        wm.toggle_minimize(id);
        let stamp_before = wm.state().window(id).unwrap().z_index;

        let reopened = wm.open_app(&notepad_id(), Value::Null).expect("reopen");

        assert_eq!(reopened, id);
        let window = wm.state().window(id).unwrap();
        assert!(!window.minimized);
        assert!(window.z_index > stamp_before);
        assert_eq!(wm.state().focused_window_id(), Some(id));
    }

    #[test]
    fn focus_stamps_strictly_increase_even_when_already_on_top() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");

        let first = wm.state().window(id).unwrap().z_index;
        wm.focus_app(id);
        let second = wm.state().window(id).unwrap().z_index;
        wm.focus_app(id);
        let third = wm.state().window(id).unwrap().z_index;

        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn focus_on_missing_id_consumes_no_counter_value() {
        let mut wm = manager();
        wm.open_app(&notepad_id(), Value::Null);
        let counter = wm.state().focus_counter;

        wm.focus_app(WindowId(999));

        assert_eq!(wm.state().focus_counter, counter);
    }

    #[test]
    fn minimize_keeps_the_old_stamp_and_restore_takes_a_newer_one() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");
        let stamp = wm.state().window(id).unwrap().z_index;
        let counter = wm.state().focus_counter;

        wm.toggle_minimize(id);
        let window = wm.state().window(id).unwrap();
        assert!(window.minimized);
        assert_eq!(window.z_index, stamp);
        assert_eq!(wm.state().focus_counter, counter);

        wm.toggle_minimize(id);
        let window = wm.state().window(id).unwrap();
        assert!(!window.minimized);
        assert!(window.z_index > stamp);
    }

    #[test]
    fn maximize_toggle_consumes_a_stamp_in_both_directions() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");
        let original_rect = wm.state().window(id).unwrap().rect;

        wm.toggle_maximize(id);
        let maximized_stamp = wm.state().window(id).unwrap().z_index;
        assert!(wm.state().window(id).unwrap().maximized);
        assert_eq!(wm.state().window(id).unwrap().restore_rect, Some(original_rect));

        wm.toggle_maximize(id);
        let window = wm.state().window(id).unwrap();
        assert!(!window.maximized);
        assert!(window.z_index > maximized_stamp);
        assert_eq!(window.rect, original_rect);
        assert_eq!(window.restore_rect, None);
    }

    #[test]
    fn close_is_idempotent_and_clears_desktop_membership() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");

        wm.close_app(id);
        wm.close_app(id);

        assert_eq!(wm.state().windows.len(), 0);
        assert!(wm
            .state()
            .desktops
            .iter()
            .all(|desktop| !desktop.windows.contains(&id)));
    }

    #[test]
    fn capability_flags_gate_close_minimize_maximize_and_geometry() {
        let mut wm = manager();
        let kiosk = ApplicationId::trusted("apps.kiosk");
        let id = wm.open_app(&kiosk, Value::Null).expect("open");
        let rect = wm.state().window(id).unwrap().rect;

        wm.close_app(id);
        assert_eq!(wm.state().windows.len(), 1);

        wm.toggle_minimize(id);
        assert!(!wm.state().window(id).unwrap().minimized);

        wm.toggle_maximize(id);
        assert!(!wm.state().window(id).unwrap().maximized);

        wm.update_window(
            id,
            WindowPatch {
                x: Some(500),
                w: Some(900),
                ..WindowPatch::default()
            },
        );
        assert_eq!(wm.state().window(id).unwrap().rect, rect);
    }

    #[test]
    fn update_window_clamps_transparency_and_minimum_size() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");

        wm.update_window(
            id,
            WindowPatch {
                w: Some(10),
                h: Some(10),
                transparency: Some(0.02),
                ..WindowPatch::default()
            },
        );

        let window = wm.state().window(id).unwrap();
        assert_eq!(window.rect.w, MIN_WINDOW_WIDTH);
        assert_eq!(window.rect.h, MIN_WINDOW_HEIGHT);
        assert_eq!(window.transparency, 0.1);
    }

    #[test]
    fn transparency_setter_clamps_both_ends() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");

        wm.set_window_transparency(id, -3.0);
        assert_eq!(wm.state().window(id).unwrap().transparency, 0.1);
        wm.set_window_transparency(id, 2.5);
        assert_eq!(wm.state().window(id).unwrap().transparency, 1.0);
    }

    #[test]
    fn save_and_restore_round_trip_geometry_and_flags() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");
        let saved = wm.state().window(id).unwrap().rect;

        wm.save_window_state(id);
        wm.update_window(
            id,
            WindowPatch {
                x: Some(700),
                y: Some(500),
                ..WindowPatch::default()
            },
        );
        wm.toggle_maximize(id);
        wm.restore_window(id);

        let window = wm.state().window(id).unwrap();
        assert_eq!(window.rect, saved);
        assert!(!window.minimized);
        assert!(!window.maximized);
    }

    #[test]
    fn opening_a_window_closes_the_start_menu() {
        let mut wm = manager();
        wm.toggle_start_menu();
        assert!(wm.state().start_menu_open);

        wm.open_app(&notepad_id(), Value::Null);
        assert!(!wm.state().start_menu_open);
    }

    #[test]
    fn focus_closes_the_start_menu() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");
        wm.toggle_start_menu();

        wm.focus_app(id);
        assert!(!wm.state().start_menu_open);
    }

    #[test]
    fn taskbar_toggle_cycles_restore_minimize_focus() {
        let mut wm = manager();
        let notepad = wm.open_app(&notepad_id(), Value::Null).expect("open");
        let gallery = wm
            .open_app(&ApplicationId::trusted("apps.gallery"), Value::Null)
            .expect("open");

        // Unfocused window: focus it.
        wm.toggle_taskbar_window(notepad);
        assert_eq!(wm.state().focused_window_id(), Some(notepad));

        // Focused window: minimize it.
        wm.toggle_taskbar_window(notepad);
        assert!(wm.state().window(notepad).unwrap().minimized);
        assert_eq!(wm.state().focused_window_id(), Some(gallery));

        // Minimized window: restore it.
        wm.toggle_taskbar_window(notepad);
        assert!(!wm.state().window(notepad).unwrap().minimized);
        assert_eq!(wm.state().focused_window_id(), Some(notepad));
    }

    #[test]
    fn drag_updates_geometry_and_commits_snap_zone_on_drop() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");

        wm.begin_move(id, PointerPosition { x: 0, y: 0 });
        // Park the window center on the left-half center (480, 540).
        let rect = wm.state().window(id).unwrap().rect;
        let target = PointerPosition {
            x: 480 - rect.w / 2 - rect.x,
            y: 540 - rect.h / 2 - rect.y,
        };
        wm.update_move(target, VIEWPORT);

        assert!(wm.interaction().is_snapping());
        let dragged = wm.state().window(id).unwrap().rect;

        wm.end_move();
        let window = wm.state().window(id).unwrap();
        assert_eq!(
            window.rect,
            WindowRect {
                x: 0,
                y: 0,
                w: 960,
                h: 1080,
            }
        );
        assert_eq!(window.restore_rect, Some(dragged));
        assert!(!wm.interaction().is_snapping());
    }

    #[test]
    fn drag_far_from_zones_keeps_the_dropped_position() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");

        wm.begin_move(id, PointerPosition { x: 0, y: 0 });
        let rect = wm.state().window(id).unwrap().rect;
        // Center lands at (600, 600): outside every zone threshold.
        let target = PointerPosition {
            x: 600 - rect.w / 2 - rect.x,
            y: 600 - rect.h / 2 - rect.y,
        };
        wm.update_move(target, VIEWPORT);
        assert!(!wm.interaction().is_snapping());

        wm.end_move();
        let window = wm.state().window(id).unwrap();
        assert_eq!(window.rect.center(), (600, 600));
        assert_eq!(window.restore_rect, None);
    }

    #[test]
    fn resize_session_applies_edge_deltas_with_minimum_clamp() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");
        let start = wm.state().window(id).unwrap().rect;

        wm.begin_resize(id, ResizeEdge::SouthEast, PointerPosition { x: 0, y: 0 });
        wm.update_resize(PointerPosition { x: 60, y: -500 });
        wm.end_resize();

        let rect = wm.state().window(id).unwrap().rect;
        assert_eq!(rect.w, start.w + 60);
        assert_eq!(rect.h, MIN_WINDOW_HEIGHT);
    }

    #[test]
    fn cascade_restacks_in_collection_order() {
        let mut wm = manager();
        let notepad = wm.open_app(&notepad_id(), Value::Null).expect("open");
        let gallery = wm
            .open_app(&ApplicationId::trusted("apps.gallery"), Value::Null)
            .expect("open");
        wm.focus_app(notepad);
        assert_eq!(wm.state().focused_window_id(), Some(notepad));

        wm.arrange_windows(Arrangement::Cascade, VIEWPORT);

        // Collection order is creation order, so the gallery window (second
        // in the collection) ends up topmost.
        assert_eq!(wm.state().focused_window_id(), Some(gallery));
        let notepad_z = wm.state().window(notepad).unwrap().z_index;
        let gallery_z = wm.state().window(gallery).unwrap().z_index;
        assert!(gallery_z > notepad_z);
    }

    #[test]
    fn tiling_leaves_stamps_untouched() {
        let mut wm = manager();
        let notepad = wm.open_app(&notepad_id(), Value::Null).expect("open");
        let gallery = wm
            .open_app(&ApplicationId::trusted("apps.gallery"), Value::Null)
            .expect("open");
        let notepad_z = wm.state().window(notepad).unwrap().z_index;
        let gallery_z = wm.state().window(gallery).unwrap().z_index;

        wm.arrange_windows(Arrangement::TileHorizontal, VIEWPORT);

        assert_eq!(wm.state().window(notepad).unwrap().z_index, notepad_z);
        assert_eq!(wm.state().window(gallery).unwrap().z_index, gallery_z);
    }

    #[test]
    fn mutating_operations_queue_effects_for_the_host() {
        let mut wm = manager();
        let id = wm.open_app(&notepad_id(), Value::Null).expect("open");

        let effects = wm.drain_effects();
        assert!(effects.contains(&ShellEffect::FocusInput(id)));
        assert!(effects.contains(&ShellEffect::StateChanged));
        assert_eq!(wm.drain_effects(), Vec::new());
    }

    #[test]
    fn operations_on_missing_ids_never_panic_and_emit_nothing() {
        let mut wm = manager();
        wm.drain_effects();

        let ghost = WindowId(404);
        wm.close_app(ghost);
        wm.focus_app(ghost);
        wm.toggle_minimize(ghost);
        wm.toggle_maximize(ghost);
        wm.update_window(ghost, WindowPatch::default());
        wm.save_window_state(ghost);
        wm.restore_window(ghost);
        wm.toggle_always_on_top(ghost);
        wm.set_window_transparency(ghost, 0.5);
        wm.toggle_taskbar_window(ghost);
        wm.begin_move(ghost, PointerPosition { x: 0, y: 0 });
        wm.begin_resize(ghost, ResizeEdge::East, PointerPosition { x: 0, y: 0 });

        assert_eq!(wm.drain_effects(), Vec::new());
    }
}
