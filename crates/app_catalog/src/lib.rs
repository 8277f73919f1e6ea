//! Shared contract between the window-manager core and the host application
//! catalog.
//!
//! The catalog is the host's side of the boundary: it knows which applications
//! exist and what a freshly opened window for each of them should look like
//! (title, icon, preferred size, capability defaults). The window manager only
//! ever reads descriptors from here at window-creation time.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier for an app package/module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` conforms to the
    /// `segment.segment...` policy.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidApplicationId`] when `raw` is not made of at least two
    /// non-empty lowercase dotted segments.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidApplicationId> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidApplicationId(raw))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for compile-time/runtime trusted
    /// constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected application id, with the offending raw string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid application id `{0}`; expected namespaced dotted segments")]
pub struct InvalidApplicationId(pub String);

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }

    let mut count = 0usize;
    for part in raw.split('.') {
        count += 1;
        if part.is_empty() || part.len() > 32 {
            return false;
        }
        let bytes = part.as_bytes();
        if !bytes[0].is_ascii_lowercase() {
            return false;
        }
        if !bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        {
            return false;
        }
        if part.ends_with('-') {
            return false;
        }
    }

    count >= 2
}

/// Per-window capability flags declared by an app and enforced as a contract
/// by the window manager: a `false` flag makes the corresponding operation a
/// no-op for that window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFlags {
    /// Window may be resized by the user.
    pub resizable: bool,
    /// Window may be dragged to a new position.
    pub movable: bool,
    /// Window may be minimized to the taskbar.
    pub minimizable: bool,
    /// Window may be maximized.
    pub maximizable: bool,
    /// Window may be closed.
    pub closable: bool,
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self {
            resizable: true,
            movable: true,
            minimizable: true,
            maximizable: true,
            closable: true,
        }
    }
}

/// Static description of an installable application, consumed by the window
/// manager when it creates a window for the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Canonical application id.
    pub app_id: ApplicationId,
    /// Default window title.
    pub title: String,
    /// Icon asset id rendered by the shell.
    pub icon_id: String,
    /// Preferred initial window width in px.
    pub default_width: i32,
    /// Preferred initial window height in px.
    pub default_height: i32,
    /// Capability defaults for new windows of this app.
    pub flags: WindowFlags,
}

impl AppDescriptor {
    /// Builds a descriptor with default capability flags.
    pub fn new(
        app_id: ApplicationId,
        title: impl Into<String>,
        icon_id: impl Into<String>,
        default_width: i32,
        default_height: i32,
    ) -> Self {
        Self {
            app_id,
            title: title.into(),
            icon_id: icon_id.into(),
            default_width,
            default_height,
            flags: WindowFlags::default(),
        }
    }

    /// Replaces the capability defaults.
    pub fn with_flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Host-populated registry of application descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppCatalog {
    entries: Vec<AppDescriptor>,
}

impl AppCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous entry for the same id.
    pub fn register(&mut self, descriptor: AppDescriptor) {
        self.entries.retain(|entry| entry.app_id != descriptor.app_id);
        self.entries.push(descriptor);
    }

    /// Looks up a descriptor by application id.
    pub fn descriptor(&self, app_id: &ApplicationId) -> Option<&AppDescriptor> {
        self.entries.iter().find(|entry| &entry.app_id == app_id)
    }

    /// Iterates over all registered descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor> {
        self.entries.iter()
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no descriptors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
