pub mod collection;
pub mod side_files;
pub mod time_tier;

pub use collection::{JsonTierStore, TierStore};
pub use side_files::{BackupHook, NoopBackup, SideFileManager, SideFileRole};
pub use time_tier::TimeTier;

use serde::{Deserialize, Serialize};

/// Minimum segment length in seconds enforced by every boundary edit.
pub const MIN_SEGMENT_SECONDS: f32 = 0.5;

/// One half-open time interval `[start, end)` on a tier, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
}

impl Segment {
    /// # Panics
    /// Panics unless `start < end`; an inverted interval is a programming
    /// error.
    pub fn new(start: f32, end: f32) -> Self {
        assert!(start < end, "segment start must precede its end");
        Self { start, end }
    }

    pub fn duration(&self) -> f32 {
        self.end - self.start
    }

    /// Half-open on the left, closed on the right: `start < time <= end`.
    pub fn encloses(&self, time: f32) -> bool {
        time > self.start && time <= self.end
    }
}

/// Outcome of a boundary edit. Policy violations are reported here, never
/// panicked on; the tier is left unchanged unless the result is `Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryModification {
    Success,
    SegmentNotFound,
    SegmentWillBeTooShort,
    NextSegmentWillBeTooShort,
}
