//! Headless window-manager core for the web desktop shell: window
//! lifecycle, focus/z-ordering, arrangement layouts, snap geometry, and
//! virtual desktops. Rendering and input plumbing live in the host.

pub mod arrange;
pub mod desktops;
pub mod model;
pub mod placement;
pub mod registry;
pub mod snap;
pub mod time;

pub use app_catalog::{AppCatalog, AppDescriptor, ApplicationId, WindowFlags};
pub use arrange::{arrangement_targets, Arrangement};
pub use desktops::{ShellError, DESKTOP_TRANSITION_MS};
pub use model::*;
pub use placement::{GridPlacement, PlacementStrategy, RandomPlacement};
pub use registry::{resize_rect, ShellEffect, WindowManager};
pub use snap::{candidate_zones, resolve_snap_zone, SnapPreview, SnapZone, SnapZoneId, SNAP_THRESHOLD};
pub use time::{Clock, FixedClock, SystemClock};
