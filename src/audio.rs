//! The audio load boundary.
//!
//! Obtaining a duration for uploaded bytes is the engine's only asynchronous
//! and only fallible operation. It is modeled as an explicit suspend point:
//! [`WaveAlignEngine::begin_load`] hands out a [`LoadTicket`], the caller
//! awaits the decode however it likes, and [`WaveAlignEngine::complete_load`]
//! resumes with the result. A newer `begin_load` supersedes any ticket still
//! in flight (superseding, not queuing), so a stale completion lands as
//! [`LoadOutcome::Superseded`] instead of clobbering the newer file's state.
//!
//! [`WaveAlignEngine::begin_load`]: crate::reconciler::WaveAlignEngine::begin_load
//! [`WaveAlignEngine::complete_load`]: crate::reconciler::WaveAlignEngine::complete_load

use std::future::Future;

use crate::error::WaResult;
use crate::mirror::RegionPort;
use crate::reconciler::WaveAlignEngine;

/// Collaborator contract for the upload/file source's decode call.
pub trait DurationProbe {
    /// Decode uploaded audio bytes and report the duration in seconds.
    fn decode_duration(&mut self, bytes: &[u8]) -> impl Future<Output = WaResult<f64>> + Send;
}

/// Proof that a load was begun; pass back to `complete_load`.
#[derive(Debug)]
#[must_use = "completing the load requires the ticket"]
pub struct LoadTicket {
    pub(crate) epoch: u64,
    pub(crate) file_name: String,
}

impl LoadTicket {
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Result of a completed (non-failed) load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOutcome {
    Loaded {
        duration_sec: f64,
        /// Whether the transcript was reset (it had no segments) as opposed
        /// to only extending the time horizon.
        transcript_reset: bool,
    },
    /// A newer upload began before this one's decode finished.
    Superseded,
}

/// Drive a full load: begin, await the probe's decode, complete.
///
/// Holding the engine across the await means a caller cannot start a second
/// load through this function while one is in flight; embeddings that let the
/// user re-upload mid-decode should use the ticket API directly and the
/// superseding semantics fall out of the epoch check.
pub async fn run_load<P: DurationProbe>(
    engine: &mut WaveAlignEngine,
    probe: &mut P,
    bytes: &[u8],
    file_name: &str,
    port: &mut dyn RegionPort,
) -> WaResult<LoadOutcome> {
    let ticket = engine.begin_load(file_name);
    let decoded = probe.decode_duration(bytes).await;
    engine.complete_load(ticket, decoded, port)
}
