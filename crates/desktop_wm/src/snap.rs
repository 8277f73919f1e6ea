//! Screen-edge snap geometry: candidate half/quarter zones and the
//! center-distance rule that decides when a dragged window locks onto one.

use serde::{Deserialize, Serialize};

use crate::model::WindowRect;

/// Maximum per-axis distance between the window center and a zone center for
/// the zone to match.
pub const SNAP_THRESHOLD: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapZoneId {
    LeftHalf,
    RightHalf,
    TopHalf,
    BottomHalf,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// A predefined target rectangle a dragged window can lock onto. Snapping
/// moves and resizes the window to exactly occupy `rect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapZone {
    pub id: SnapZoneId,
    pub rect: WindowRect,
}

/// Ghost-outline state surfaced to the shell while a drag hovers inside a
/// zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapPreview {
    pub zone: SnapZoneId,
    pub rect: WindowRect,
}

/// The eight candidate zones for `viewport`, in matching order.
///
/// Declaration order is the tie-break: halves (left, right, top, bottom)
/// before quarter corners (top-left, top-right, bottom-left, bottom-right).
/// A window hugging a screen corner can sit within threshold of both a half
/// and a quarter; the first listed zone wins, so it resolves to the half.
pub fn candidate_zones(viewport: WindowRect) -> [SnapZone; 8] {
    let half_w = viewport.w / 2;
    let half_h = viewport.h / 2;
    let mid_x = viewport.x + half_w;
    let mid_y = viewport.y + half_h;

    [
        SnapZone {
            id: SnapZoneId::LeftHalf,
            rect: WindowRect {
                x: viewport.x,
                y: viewport.y,
                w: half_w,
                h: viewport.h,
            },
        },
        SnapZone {
            id: SnapZoneId::RightHalf,
            rect: WindowRect {
                x: mid_x,
                y: viewport.y,
                w: half_w,
                h: viewport.h,
            },
        },
        SnapZone {
            id: SnapZoneId::TopHalf,
            rect: WindowRect {
                x: viewport.x,
                y: viewport.y,
                w: viewport.w,
                h: half_h,
            },
        },
        SnapZone {
            id: SnapZoneId::BottomHalf,
            rect: WindowRect {
                x: viewport.x,
                y: mid_y,
                w: viewport.w,
                h: half_h,
            },
        },
        SnapZone {
            id: SnapZoneId::TopLeft,
            rect: WindowRect {
                x: viewport.x,
                y: viewport.y,
                w: half_w,
                h: half_h,
            },
        },
        SnapZone {
            id: SnapZoneId::TopRight,
            rect: WindowRect {
                x: mid_x,
                y: viewport.y,
                w: half_w,
                h: half_h,
            },
        },
        SnapZone {
            id: SnapZoneId::BottomLeft,
            rect: WindowRect {
                x: viewport.x,
                y: mid_y,
                w: half_w,
                h: half_h,
            },
        },
        SnapZone {
            id: SnapZoneId::BottomRight,
            rect: WindowRect {
                x: mid_x,
                y: mid_y,
                w: half_w,
                h: half_h,
            },
        },
    ]
}

/// Resolves the zone a window at `window` would snap to inside `viewport`,
/// or `None` when the drag stays free-form.
///
/// A zone matches when the window center is within [`SNAP_THRESHOLD`] of the
/// zone center on both axes; the first match in declaration order wins.
pub fn resolve_snap_zone(window: WindowRect, viewport: WindowRect) -> Option<SnapZone> {
    let (cx, cy) = window.center();
    candidate_zones(viewport).into_iter().find(|zone| {
        let (zx, zy) = zone.rect.center();
        (cx - zx).abs() < SNAP_THRESHOLD && (cy - zy).abs() < SNAP_THRESHOLD
    })
}
