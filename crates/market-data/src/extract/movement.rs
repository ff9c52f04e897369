//! Reconstruction of the prior close from the displayed delta.
//!
//! The quote page shows the current price and the size of the move with a
//! status label, never the prior close itself. The prior close is rebuilt by
//! undoing the move: a fall is added back, a rise is subtracted.

use log::warn;

use crate::models::MAX_PRICE;

/// Status label shown next to the move amount.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveStatus {
    /// `하락` / `하한가`
    Fell,
    /// `상승` / `상한가`
    Rose,
    /// `보합`
    Unchanged,
}

impl MoveStatus {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "하락" | "하한가" => Some(Self::Fell),
            "상승" | "상한가" => Some(Self::Rose),
            "보합" => Some(Self::Unchanged),
            _ => None,
        }
    }
}

/// Direction plus unsigned amount read from the page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PriceMove {
    pub status: MoveStatus,
    pub magnitude: u64,
}

impl PriceMove {
    pub fn new(status: MoveStatus, magnitude: u64) -> Self {
        Self { status, magnitude }
    }

    /// Prior close implied by `current` and this move.
    ///
    /// Returns `None` when the move cannot be undone (a rise larger than the
    /// current price, or a prior close above [`MAX_PRICE`]).
    pub fn prior_close(&self, current: u64) -> Option<u64> {
        match self.status {
            MoveStatus::Fell => current
                .checked_add(self.magnitude)
                .filter(|prior| *prior <= MAX_PRICE),
            MoveStatus::Rose => current.checked_sub(self.magnitude),
            MoveStatus::Unchanged => {
                if self.magnitude != 0 {
                    warn!(
                        "Unchanged status with non-zero move {}, ignoring the amount",
                        self.magnitude
                    );
                }
                Some(current)
            }
        }
    }
}
