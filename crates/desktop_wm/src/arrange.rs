//! Multi-window arrangement: pure target-rect computation for cascade and
//! tiling layouts over the arrangeable set.

use serde::{Deserialize, Serialize};

use crate::model::{WindowId, WindowRecord, WindowRect};

/// Top-left origin of the first cascaded window.
pub const CASCADE_ORIGIN: i32 = 50;
/// Diagonal step between consecutive cascaded windows.
pub const CASCADE_STEP: i32 = 30;
/// Vertical space kept free for the taskbar when tiling.
pub const TASKBAR_RESERVE: i32 = 100;
/// Top offset applied to tiled windows.
pub const TILE_TOP_OFFSET: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arrangement {
    Cascade,
    TileHorizontal,
    TileVertical,
}

/// Target rectangles for arranging `windows` inside `viewport`, in
/// collection order.
///
/// Only the arrangeable set (neither minimized nor maximized) is considered;
/// excluded windows get no entry and are left completely untouched by the
/// caller. An empty arrangeable set yields an empty list, so tiling never
/// divides by zero.
pub fn arrangement_targets(
    arrangement: Arrangement,
    windows: &[WindowRecord],
    viewport: WindowRect,
) -> Vec<(WindowId, WindowRect)> {
    let arrangeable: Vec<&WindowRecord> = windows
        .iter()
        .filter(|w| !w.minimized && !w.maximized)
        .collect();
    if arrangeable.is_empty() {
        return Vec::new();
    }

    match arrangement {
        Arrangement::Cascade => cascade_targets(&arrangeable),
        Arrangement::TileHorizontal => tile_horizontal_targets(&arrangeable, viewport),
        Arrangement::TileVertical => tile_vertical_targets(&arrangeable, viewport),
    }
}

/// Diagonal stack starting at `(50, 50)` with a 30 px step; sizes are left
/// untouched.
fn cascade_targets(windows: &[&WindowRecord]) -> Vec<(WindowId, WindowRect)> {
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let step = CASCADE_STEP * i as i32;
            (
                window.id,
                WindowRect {
                    x: CASCADE_ORIGIN + step,
                    y: CASCADE_ORIGIN + step,
                    w: window.rect.w,
                    h: window.rect.h,
                },
            )
        })
        .collect()
}

/// Even vertical strips across the viewport width. The last strip absorbs
/// the integer-division remainder so the strips tile the full width.
fn tile_horizontal_targets(
    windows: &[&WindowRecord],
    viewport: WindowRect,
) -> Vec<(WindowId, WindowRect)> {
    let count = windows.len() as i32;
    let width = viewport.w / count;
    let height = viewport.h - TASKBAR_RESERVE;
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let i = i as i32;
            let w = if i == count - 1 {
                viewport.w - width * i
            } else {
                width
            };
            (
                window.id,
                WindowRect {
                    x: viewport.x + width * i,
                    y: viewport.y + TILE_TOP_OFFSET,
                    w,
                    h: height,
                },
            )
        })
        .collect()
}

/// Even horizontal strips stacked top-to-bottom, each spanning the full
/// viewport width.
fn tile_vertical_targets(
    windows: &[&WindowRecord],
    viewport: WindowRect,
) -> Vec<(WindowId, WindowRect)> {
    let count = windows.len() as i32;
    let usable = viewport.h - TASKBAR_RESERVE;
    let height = usable / count;
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let i = i as i32;
            let h = if i == count - 1 {
                usable - height * i
            } else {
                height
            };
            (
                window.id,
                WindowRect {
                    x: viewport.x,
                    y: viewport.y + TILE_TOP_OFFSET + height * i,
                    w: viewport.w,
                    h,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use app_catalog::{ApplicationId, WindowFlags};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;
    use crate::model::MAX_TRANSPARENCY;

    const VIEWPORT: WindowRect = WindowRect {
        x: 0,
        y: 0,
        w: 1920,
        h: 1080,
    };

    fn window(id: u64) -> WindowRecord {
        WindowRecord {
            id: WindowId(id),
            app_id: ApplicationId::trusted("apps.fixture"),
            title: "Fixture".to_string(),
            icon_id: "fixture".to_string(),
            rect: WindowRect::default(),
            restore_rect: None,
            z_index: id,
            minimized: false,
            maximized: false,
            always_on_top: false,
            transparency: MAX_TRANSPARENCY,
            flags: WindowFlags::default(),
            data: Value::Null,
        }
    }

    #[test]
    fn cascade_offsets_step_thirty_from_fifty() {
        let windows = vec![window(1), window(2), window(3)];
        let targets = arrangement_targets(Arrangement::Cascade, &windows, VIEWPORT);

        let positions: Vec<(i32, i32)> = targets.iter().map(|(_, r)| (r.x, r.y)).collect();
        assert_eq!(positions, vec![(50, 50), (80, 80), (110, 110)]);
        // Cascade never touches sizes.
        for (_, rect) in &targets {
            assert_eq!((rect.w, rect.h), (420, 300));
        }
    }

    #[test]
    fn tile_horizontal_strips_cover_viewport_width_without_gaps() {
        let windows = vec![window(1), window(2), window(3)];
        let targets = arrangement_targets(Arrangement::TileHorizontal, &windows, VIEWPORT);

        let total: i32 = targets.iter().map(|(_, r)| r.w).sum();
        assert_eq!(total, VIEWPORT.w);
        for pair in targets.windows(2) {
            assert_eq!(pair[0].1.x + pair[0].1.w, pair[1].1.x);
        }
        for (_, rect) in &targets {
            assert_eq!(rect.y, TILE_TOP_OFFSET);
            assert_eq!(rect.h, VIEWPORT.h - TASKBAR_RESERVE);
        }
    }

    #[test]
    fn tile_vertical_strips_stack_full_width() {
        let windows = vec![window(1), window(2)];
        let targets = arrangement_targets(Arrangement::TileVertical, &windows, VIEWPORT);

        let total: i32 = targets.iter().map(|(_, r)| r.h).sum();
        assert_eq!(total, VIEWPORT.h - TASKBAR_RESERVE);
        for pair in targets.windows(2) {
            assert_eq!(pair[0].1.y + pair[0].1.h, pair[1].1.y);
        }
        for (_, rect) in &targets {
            assert_eq!(rect.x, 0);
            assert_eq!(rect.w, VIEWPORT.w);
        }
    }

    #[test]
    fn minimized_and_maximized_windows_are_excluded() {
        let mut minimized = window(1);
        minimized.minimized = true;
        let mut maximized = window(2);
        maximized.maximized = true;
        let windows = vec![minimized, maximized, window(3)];

        let targets = arrangement_targets(Arrangement::TileHorizontal, &windows, VIEWPORT);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0, WindowId(3));
        assert_eq!(targets[0].1.w, VIEWPORT.w);
    }

    #[test]
    fn empty_arrangeable_set_is_a_noop() {
        let mut minimized = window(1);
        minimized.minimized = true;
        let targets = arrangement_targets(Arrangement::TileVertical, &[minimized], VIEWPORT);
        assert_eq!(targets, Vec::new());
    }
}
