#![forbid(unsafe_code)]

pub mod audio;
pub mod error;
pub mod export;
pub mod logging;
pub mod mirror;
pub mod model;
pub mod reconciler;
pub mod store;
pub mod tracker;

pub use audio::{DurationProbe, LoadOutcome, LoadTicket, run_load};
pub use error::{WaError, WaResult};
pub use export::TranscriptExport;
pub use mirror::{EnsureOutcome, RegionMirror, RegionPort};
pub use model::{
    EngineConfig, IntervalPolicy, RegionBounds, Segment, SegmentPatch, SegmentSource, Transcript,
};
pub use reconciler::{EditOutcome, WaveAlignEngine};
pub use tracker::ActiveTracker;
