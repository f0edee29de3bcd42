pub mod audio;
pub mod config;
pub mod error;
pub mod score;
pub mod segmenter;
pub mod tier;

pub use config::{Config, SegmenterConfig, SideFileNaming};
pub use error::{Result, SegtierError};
pub use segmenter::{AutoSegmenter, NaturalBreaks};
pub use tier::{
    BoundaryModification, JsonTierStore, Segment, TierStore, TimeTier, MIN_SEGMENT_SECONDS,
};
