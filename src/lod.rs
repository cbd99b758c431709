//! Quality levels and distance based level-of-detail selection.
//!
//! Every instance carries three bundle slots; index 0 is the lowest detail
//! variant and index 2 the highest. A fixed quality level pins the slot,
//! `Auto` degrades with camera distance.

/// Rendering quality, cycled at runtime with a single key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityLevel {
    Low,
    Mid,
    High,
    Auto,
}

impl QualityLevel {
    /// Next level in the runtime cycle: Low -> Mid -> High -> Auto -> Low.
    pub fn cycle(self) -> Self {
        match self {
            QualityLevel::Low => QualityLevel::Mid,
            QualityLevel::Mid => QualityLevel::High,
            QualityLevel::High => QualityLevel::Auto,
            QualityLevel::Auto => QualityLevel::Low,
        }
    }

    /// One-word-ish name used in the toggle acknowledgement line.
    pub fn label(self) -> &'static str {
        match self {
            QualityLevel::Low => "lowest quality",
            QualityLevel::Mid => "mid quality",
            QualityLevel::High => "highest quality",
            QualityLevel::Auto => "automatic",
        }
    }
}

/// Distance beyond which `Auto` drops from the highest detail slot to mid.
pub const DEGRADE_MID: f32 = 15.0;
/// Distance beyond which `Auto` drops to the lowest detail slot.
pub const DEGRADE_FAR: f32 = 30.0;

/// Pick the LOD slot for one instance.
///
/// Fixed levels map directly (Low -> 0, Mid -> 1, High -> 2). `Auto` starts
/// at the highest detail and degrades strictly beyond the thresholds: a
/// distance of exactly 15.0 or 30.0 does not yet degrade.
pub fn select(distance: f32, quality: QualityLevel) -> usize {
    match quality {
        QualityLevel::Low => 0,
        QualityLevel::Mid => 1,
        QualityLevel::High => 2,
        QualityLevel::Auto => {
            let mut slot = 2;
            if distance > DEGRADE_MID {
                slot = 1;
            }
            if distance > DEGRADE_FAR {
                slot = 0;
            }
            slot
        }
    }
}
