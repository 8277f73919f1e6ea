//! Virtual desktop management: named workspaces that partition window
//! membership over the single window registry.

use thiserror::Error;
use tracing::debug;

use crate::model::{DesktopId, DesktopSettings, VirtualDesktop, WindowId};
use crate::registry::{ShellEffect, WindowManager};

/// Delay before the host clears the desktop-switch transition flag.
pub const DESKTOP_TRANSITION_MS: u32 = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// The one hard error in the core. Everything else the shell can normalize
/// locally; losing the always-at-least-one-desktop invariant it cannot.
pub enum ShellError {
    /// Refused to delete the only remaining virtual desktop.
    #[error("the last virtual desktop cannot be deleted")]
    LastDesktop,
}

impl WindowManager {
    /// Creates a desktop with empty window membership, appended to the
    /// desktop list.
    pub fn create_desktop(
        &mut self,
        name: impl Into<String>,
        settings: Option<DesktopSettings>,
    ) -> DesktopId {
        let id = self.allocate_desktop_id();
        let now = self.clock.now();
        self.state.desktops.push(VirtualDesktop {
            id,
            name: name.into(),
            wallpaper_id: crate::model::DEFAULT_WALLPAPER_ID.to_string(),
            windows: Vec::new(),
            settings: settings.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        });
        debug!(desktop = ?id, "created desktop");
        self.note_state_changed();
        id
    }

    /// Deletes a desktop, re-homing its member windows to the first
    /// remaining desktop. The active desktop falls back there too.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::LastDesktop`] when `id` names the only
    /// remaining desktop; the desktop list is left unchanged.
    pub fn delete_desktop(&mut self, id: DesktopId) -> Result<(), ShellError> {
        let Some(index) = self.state.desktops.iter().position(|d| d.id == id) else {
            return Ok(());
        };
        if self.state.desktops.len() == 1 {
            return Err(ShellError::LastDesktop);
        }

        let removed = self.state.desktops.remove(index);
        let fallback = self.state.desktops[0].id;
        if !removed.windows.is_empty() {
            let now = self.clock.now();
            if let Some(target) = self.state.desktop_mut(fallback) {
                target.windows.extend(removed.windows.iter().copied());
                target.updated_at = now;
            }
        }
        if self.state.active_desktop == removed.id {
            self.state.active_desktop = fallback;
        }

        debug!(desktop = ?id, "deleted desktop");
        self.note_state_changed();
        Ok(())
    }

    /// Activates a desktop and raises the transient transition flag.
    ///
    /// The flag is timing-only state: the host receives a
    /// [`ShellEffect::ClearDesktopTransitionAfter`] intent and calls
    /// [`Self::clear_desktop_transition`] when the delay elapses.
    pub fn switch_to_desktop(&mut self, id: DesktopId) {
        if self.state.desktop(id).is_none() {
            return;
        }
        self.state.active_desktop = id;
        self.state.is_transitioning = true;
        self.effects.push(ShellEffect::ClearDesktopTransitionAfter {
            delay_ms: DESKTOP_TRANSITION_MS,
        });
        self.note_state_changed();
    }

    /// Clears the transition flag unconditionally.
    ///
    /// No token ties a clear to the switch that scheduled it: when a second
    /// switch lands mid-transition, the first switch's timer still decides
    /// when the flag drops. Known quirk, pinned by a test.
    pub fn clear_desktop_transition(&mut self) {
        if self.state.is_transitioning {
            self.state.is_transitioning = false;
            self.note_state_changed();
        }
    }

    /// Moves a window's membership to `desktop_id`, removing it from every
    /// other desktop so each window belongs to exactly one.
    pub fn move_window_to_desktop(&mut self, window_id: WindowId, desktop_id: DesktopId) {
        if self.state.window(window_id).is_none() || self.state.desktop(desktop_id).is_none() {
            return;
        }
        let now = self.clock.now();
        for desktop in &mut self.state.desktops {
            let before = desktop.windows.len();
            desktop.windows.retain(|w| *w != window_id);
            if desktop.windows.len() != before {
                desktop.updated_at = now;
            }
        }
        if let Some(target) = self.state.desktop_mut(desktop_id) {
            target.windows.push(window_id);
            target.updated_at = now;
        }
        self.note_state_changed();
    }

    /// Clones a desktop's wallpaper and settings into a new desktop with
    /// empty window membership. Windows are never duplicated.
    pub fn duplicate_desktop(&mut self, id: DesktopId, name: Option<String>) -> Option<DesktopId> {
        let source = self.state.desktop(id)?;
        let name = name.unwrap_or_else(|| format!("{} copy", source.name));
        let wallpaper_id = source.wallpaper_id.clone();
        let settings = source.settings.clone();

        let new_id = self.allocate_desktop_id();
        let now = self.clock.now();
        self.state.desktops.push(VirtualDesktop {
            id: new_id,
            name,
            wallpaper_id,
            windows: Vec::new(),
            settings,
            created_at: now,
            updated_at: now,
        });
        self.note_state_changed();
        Some(new_id)
    }

    pub fn rename_desktop(&mut self, id: DesktopId, name: impl Into<String>) {
        let now = self.clock.now();
        let Some(desktop) = self.state.desktop_mut(id) else {
            return;
        };
        desktop.name = name.into();
        desktop.updated_at = now;
        self.note_state_changed();
    }

    pub fn set_desktop_wallpaper(&mut self, id: DesktopId, wallpaper_id: impl Into<String>) {
        let now = self.clock.now();
        let Some(desktop) = self.state.desktop_mut(id) else {
            return;
        };
        desktop.wallpaper_id = wallpaper_id.into();
        desktop.updated_at = now;
        self.note_state_changed();
    }

    pub fn update_desktop_settings(&mut self, id: DesktopId, settings: DesktopSettings) {
        let now = self.clock.now();
        let Some(desktop) = self.state.desktop_mut(id) else {
            return;
        };
        desktop.settings = settings;
        desktop.updated_at = now;
        self.note_state_changed();
    }

    /// Windows belonging to the active desktop, in collection order.
    pub fn windows_on_active_desktop(&self) -> Vec<WindowId> {
        self.state
            .desktop(self.state.active_desktop)
            .map(|desktop| desktop.windows.clone())
            .unwrap_or_default()
    }

    fn allocate_desktop_id(&mut self) -> DesktopId {
        let id = DesktopId(self.state.next_desktop_id);
        self.state.next_desktop_id = self.state.next_desktop_id.saturating_add(1);
        id
    }
}
