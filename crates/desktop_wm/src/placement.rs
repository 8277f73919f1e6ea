//! New-window placement strategies. Placement is a seam so hosts get the
//! randomized scatter while tests inject a deterministic grid.

use crate::model::PointerPosition;

/// Region new windows are scattered over. Keeps every title bar inside a
/// safe on-screen margin even on small viewports.
const PLACEMENT_MIN_X: i32 = 40;
const PLACEMENT_MAX_X: i32 = 180;
const PLACEMENT_MIN_Y: i32 = 48;
const PLACEMENT_MAX_Y: i32 = 188;

/// Chooses the top-left corner for a newly created window.
///
/// `sequence` is the window's creation number (its id), so deterministic
/// strategies can derive stable per-window offsets from it.
pub trait PlacementStrategy {
    fn place(&mut self, sequence: u64) -> PointerPosition;
}

/// Scatters new windows pseudo-randomly inside the safe margin so
/// consecutive opens never stack perfectly.
#[derive(Debug)]
pub struct RandomPlacement {
    rng: fastrand::Rng,
}

impl RandomPlacement {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Seeded variant for reproducible placement.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomPlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementStrategy for RandomPlacement {
    fn place(&mut self, _sequence: u64) -> PointerPosition {
        PointerPosition {
            x: self.rng.i32(PLACEMENT_MIN_X..=PLACEMENT_MAX_X),
            y: self.rng.i32(PLACEMENT_MIN_Y..=PLACEMENT_MAX_Y),
        }
    }
}

/// Deterministic diagonal grid derived from the window's creation number.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridPlacement;

impl PlacementStrategy for GridPlacement {
    fn place(&mut self, sequence: u64) -> PointerPosition {
        let offset = (sequence.saturating_sub(1) % 8) as i32 * 20;
        PointerPosition {
            x: PLACEMENT_MIN_X + offset,
            y: PLACEMENT_MIN_Y + offset,
        }
    }
}
