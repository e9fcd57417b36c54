use serde::{Deserialize, Serialize};

/// Canonical player-visible state of a single card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed,
    /// Face up after a miss, waiting for the delayed reset to hide it again.
    PendingReset,
    Resolved,
}

impl CellState {
    pub const fn is_face_up(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
