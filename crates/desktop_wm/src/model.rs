use app_catalog::{ApplicationId, WindowFlags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::snap::SnapPreview;

/// Fallback window width when an app declares no preference.
pub const DEFAULT_WINDOW_WIDTH: i32 = 420;
/// Fallback window height when an app declares no preference.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;
/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;
/// Lower clamp bound for window transparency.
pub const MIN_TRANSPARENCY: f32 = 0.1;
/// Upper clamp bound for window transparency.
pub const MAX_TRANSPARENCY: f32 = 1.0;

pub const DEFAULT_WALLPAPER_ID: &str = "teal-solid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DesktopId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    pub fn center(self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 48,
            y: 48,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// One open application surface tracked by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub icon_id: String,
    /// Geometry of the restored state; maximized rendering is the shell's
    /// concern and does not overwrite this.
    pub rect: WindowRect,
    /// Geometry snapshot taken before a snap or explicit save, consumed by
    /// restore.
    pub restore_rect: Option<WindowRect>,
    /// Focus-counter stamp. Strictly increasing across the registry's
    /// lifetime; higher paints above lower.
    pub z_index: u64,
    pub minimized: bool,
    pub maximized: bool,
    pub always_on_top: bool,
    /// Opacity in `[0.1, 1.0]`, clamped on every write.
    pub transparency: f32,
    pub flags: WindowFlags,
    /// Opaque payload forwarded to the hosted app. `Null` means "no payload";
    /// the registry only ever checks it for null-ness when deciding whether
    /// to reuse an instance.
    pub data: Value,
}

impl WindowRecord {
    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }

    /// Ordering key for paint/focus: pinned windows float above everything
    /// non-pinned regardless of numeric stamp.
    pub(crate) fn stack_key(&self) -> (bool, u64) {
        (self.always_on_top, self.z_index)
    }
}

/// Merge-patch of the mutable window fields, applied by
/// [`crate::WindowManager::update_window`]. The id is not patchable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub title: Option<String>,
    pub transparency: Option<f32>,
    pub always_on_top: Option<bool>,
    pub flags: Option<WindowFlags>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconArrangement {
    Grid,
    FreeForm,
}

/// Per-desktop appearance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopSettings {
    pub icon_arrangement: IconArrangement,
    pub show_desktop_icons: bool,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            icon_arrangement: IconArrangement::Grid,
            show_desktop_icons: true,
        }
    }
}

/// A named workspace holding window membership by id. Window records
/// themselves live only in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDesktop {
    pub id: DesktopId,
    pub name: String,
    pub wallpaper_id: String,
    pub windows: Vec<WindowId>,
    pub settings: DesktopSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Authoritative shell state owned by [`crate::WindowManager`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellState {
    pub next_window_id: u64,
    pub next_desktop_id: u64,
    /// Focus counter. Stamps handed out from here never decrease and are
    /// never reused.
    pub focus_counter: u64,
    pub windows: Vec<WindowRecord>,
    pub desktops: Vec<VirtualDesktop>,
    pub active_desktop: DesktopId,
    pub start_menu_open: bool,
    pub is_transitioning: bool,
}

impl ShellState {
    /// Fresh state holding one default desktop; the desktop list is never
    /// allowed to become empty after this.
    pub fn new(now: DateTime<Utc>) -> Self {
        let desktop = VirtualDesktop {
            id: DesktopId(1),
            name: "Desktop 1".to_string(),
            wallpaper_id: DEFAULT_WALLPAPER_ID.to_string(),
            windows: Vec::new(),
            settings: DesktopSettings::default(),
            created_at: now,
            updated_at: now,
        };
        Self {
            next_window_id: 1,
            next_desktop_id: 2,
            focus_counter: 1,
            windows: Vec::new(),
            desktops: vec![desktop],
            active_desktop: DesktopId(1),
            start_menu_open: false,
            is_transitioning: false,
        }
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub(crate) fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub fn desktop(&self, id: DesktopId) -> Option<&VirtualDesktop> {
        self.desktops.iter().find(|d| d.id == id)
    }

    pub(crate) fn desktop_mut(&mut self, id: DesktopId) -> Option<&mut VirtualDesktop> {
        self.desktops.iter_mut().find(|d| d.id == id)
    }

    /// The focused window is the topmost non-minimized window in paint
    /// order; focus is derived, never stored.
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|w| !w.minimized)
            .max_by_key(|w| w.stack_key())
            .map(|w| w.id)
    }

    /// Window ids sorted bottom-to-top for rendering. Pinned windows sort
    /// above all non-pinned ones.
    pub fn paint_order(&self) -> Vec<WindowId> {
        let mut windows: Vec<&WindowRecord> = self.windows.iter().collect();
        windows.sort_by_key(|w| w.stack_key());
        windows.into_iter().map(|w| w.id).collect()
    }

    /// Windows that automatic layout may touch: neither minimized nor
    /// maximized.
    pub fn arrangeable_windows(&self) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|w| !w.minimized && !w.maximized)
            .map(|w| w.id)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

/// Transient pointer-interaction state, kept out of [`ShellState`] so it is
/// never serialized or observed as shell state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
    /// Ghost-outline target while a drag hovers inside a snap zone.
    pub snap_preview: Option<SnapPreview>,
}

impl InteractionState {
    /// Whether the active drag would commit to a snap zone on drop.
    pub fn is_snapping(&self) -> bool {
        self.snap_preview.is_some()
    }
}

pub(crate) fn clamp_transparency(value: f32) -> f32 {
    value.clamp(MIN_TRANSPARENCY, MAX_TRANSPARENCY)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rect_center_uses_integer_midpoint() {
        let rect = WindowRect {
            x: 0,
            y: 0,
            w: 960,
            h: 1080,
        };
        assert_eq!(rect.center(), (480, 540));
    }

    #[test]
    fn transparency_clamps_to_documented_range() {
        assert_eq!(clamp_transparency(0.0), MIN_TRANSPARENCY);
        assert_eq!(clamp_transparency(0.55), 0.55);
        assert_eq!(clamp_transparency(7.0), MAX_TRANSPARENCY);
    }

    #[test]
    fn pinned_windows_outrank_higher_stamps() {
        let mut state = ShellState::new(chrono::Utc::now());
        state.windows.push(window_fixture(WindowId(1), 10, true));
        state.windows.push(window_fixture(WindowId(2), 99, false));

        assert_eq!(state.focused_window_id(), Some(WindowId(1)));
        assert_eq!(state.paint_order(), vec![WindowId(2), WindowId(1)]);
    }

    fn window_fixture(id: WindowId, z_index: u64, always_on_top: bool) -> WindowRecord {
        WindowRecord {
            id,
            app_id: ApplicationId::trusted("apps.fixture"),
            title: "Fixture".to_string(),
            icon_id: "fixture".to_string(),
            rect: WindowRect::default(),
            restore_rect: None,
            z_index,
            minimized: false,
            maximized: false,
            always_on_top,
            transparency: MAX_TRANSPARENCY,
            flags: WindowFlags::default(),
            data: Value::Null,
        }
    }
}
