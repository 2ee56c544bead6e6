//! Tunables shared by the placement systems.

use serde::{Deserialize, Serialize};

/// Largest region a single enclosure flood fill may visit before giving up.
pub const DEFAULT_ENCLOSURE_CELL_CAP: usize = 10_000;

/// Configuration consumed by the placement systems.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cells a flood fill may visit before the region counts as open.
    pub enclosure_cell_cap: usize,
    /// Distinct obstacle labels listed before collapsing the rest.
    pub obstacle_group_limit: usize,
    /// Gap coordinates listed per enclosure before collapsing the rest.
    pub gap_listing_limit: usize,
    /// Whether live dimensions are spoken while the second corner moves.
    pub announce_preview: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enclosure_cell_cap: DEFAULT_ENCLOSURE_CELL_CAP,
            obstacle_group_limit: 3,
            gap_listing_limit: 3,
            announce_preview: true,
        }
    }
}
