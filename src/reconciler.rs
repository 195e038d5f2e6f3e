//! Edit Reconciler: the single mutation funnel over the Segment Store, the
//! Region Mirror, and the Active-Segment Tracker.
//!
//! Every user-facing mutation (typing, a time-field edit, a drag commit,
//! segment creation or deletion, an audio load) goes through one
//! [`WaveAlignEngine`] method that updates both the transcript snapshot and
//! the mirror before returning. Partial application (segment updated but
//! region not, or vice versa) is the bug class this funnel exists to
//! prevent; [`WaveAlignEngine::check_consistency`] audits for it.

use uuid::Uuid;

use crate::audio::{LoadOutcome, LoadTicket};
use crate::error::{WaError, WaResult};
use crate::export::TranscriptExport;
use crate::mirror::{RegionMirror, RegionPort};
use crate::model::{
    EngineConfig, IntervalPolicy, RegionBounds, Segment, SegmentPatch, SegmentSource, Transcript,
};
use crate::tracker::ActiveTracker;

/// How a reconciler operation landed. Reconciler methods never fail with an
/// error; this enum is the only signal.
#[derive(Debug)]
pub enum EditOutcome {
    Applied,
    /// The target id does not exist; nothing changed.
    Ignored,
    /// The configured [`IntervalPolicy`] refused the edit; prior bounds kept.
    Rejected(WaError),
}

impl EditOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// The engine: transcript snapshot, region mirror, active tracker, playback
/// position, and audio-load state under one roof, mutated only through the
/// methods below.
#[derive(Debug)]
pub struct WaveAlignEngine {
    config: EngineConfig,
    transcript: Transcript,
    mirror: RegionMirror,
    tracker: ActiveTracker,
    playhead_sec: f64,
    load_epoch: u64,
    audio_ready: bool,
    audio_duration_sec: Option<f64>,
}

impl Default for WaveAlignEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveAlignEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            transcript: Transcript::default(),
            mirror: RegionMirror::new(),
            tracker: ActiveTracker::new(),
            playhead_sec: 0.0,
            load_epoch: 0,
            audio_ready: false,
            audio_duration_sec: None,
        }
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn mirror(&self) -> &RegionMirror {
        &self.mirror
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.tracker.active_id()
    }

    #[must_use]
    pub fn playhead_sec(&self) -> f64 {
        self.playhead_sec
    }

    #[must_use]
    pub fn audio_duration_sec(&self) -> Option<f64> {
        self.audio_duration_sec
    }

    #[must_use]
    pub fn audio_ready(&self) -> bool {
        self.audio_ready
    }

    /// Peripheral JSON-shaped view of the current transcript.
    #[must_use]
    pub fn export(&self) -> TranscriptExport {
        TranscriptExport::from_transcript(&self.transcript)
    }

    // -----------------------------------------------------------------------
    // Text and time-field edits
    // -----------------------------------------------------------------------

    /// Text changed for segment `id`. No mirror action: text never moves a
    /// region.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> EditOutcome {
        if !self.transcript.contains(id) {
            tracing::debug!(%id, "text edit for unknown segment; ignored");
            return EditOutcome::Ignored;
        }
        self.transcript = self.transcript.upsert(&SegmentPatch::new(id).text(text));
        EditOutcome::Applied
    }

    /// Manual `from` field edit. The new start pairs with the segment's
    /// existing end, so a lazily created region never gets a degenerate
    /// default bound.
    pub fn set_segment_start(
        &mut self,
        id: &str,
        value_sec: f64,
        port: &mut dyn RegionPort,
    ) -> EditOutcome {
        let Some(end_sec) = self.transcript.segment(id).map(|s| s.end_sec) else {
            tracing::debug!(%id, "start edit for unknown segment; ignored");
            return EditOutcome::Ignored;
        };
        match self.gate_interval(value_sec, end_sec) {
            Ok((start_sec, end_sec)) => self.apply_bounds(id, start_sec, end_sec, port),
            Err(error) => self.reject(id, error),
        }
    }

    /// Manual `to` field edit; symmetric to [`Self::set_segment_start`].
    pub fn set_segment_end(
        &mut self,
        id: &str,
        value_sec: f64,
        port: &mut dyn RegionPort,
    ) -> EditOutcome {
        let Some(start_sec) = self.transcript.segment(id).map(|s| s.start_sec) else {
            tracing::debug!(%id, "end edit for unknown segment; ignored");
            return EditOutcome::Ignored;
        };
        match self.gate_interval(start_sec, value_sec) {
            Ok((start_sec, end_sec)) => self.apply_bounds(id, start_sec, end_sec, port),
            Err(error) => self.reject(id, error),
        }
    }

    // -----------------------------------------------------------------------
    // Region-side edits
    // -----------------------------------------------------------------------

    /// The overlay committed a drag/resize for region `id` at the given
    /// waveform-relative bounds.
    ///
    /// The overlay already shows the new bounds, so on the accepted path the
    /// mirror only records them and the store is patched. A clamped result
    /// is pushed back to the overlay; a rejected one snaps the region back
    /// to the stored bounds.
    pub fn on_region_committed(
        &mut self,
        id: &str,
        bounds: RegionBounds,
        port: &mut dyn RegionPort,
    ) -> EditOutcome {
        if !self.transcript.contains(id) {
            tracing::warn!(%id, "region commit for unknown segment; ignored");
            return EditOutcome::Ignored;
        }
        let origin = self.transcript.time_origin_sec;
        let abs_start = bounds.start_sec + origin;
        let abs_end = bounds.end_sec + origin;

        match self.gate_interval(abs_start, abs_end) {
            Ok((start_sec, end_sec)) if start_sec == abs_start && end_sec == abs_end => {
                let patch = self.mirror.commit_bounds(id, bounds, origin);
                self.transcript = self.transcript.upsert(&patch);
                EditOutcome::Applied
            }
            Ok((start_sec, end_sec)) => {
                // Clamped: the overlay must be corrected as well.
                self.apply_bounds(id, start_sec, end_sec, port)
            }
            Err(error) => {
                let prior = self.transcript.segment(id).map(|s| (s.start_sec, s.end_sec));
                if let Some((start_sec, end_sec)) = prior {
                    self.mirror
                        .ensure_region(id, start_sec, end_sec, origin, &self.config, port);
                }
                self.reject(id, error)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Creation / deletion
    // -----------------------------------------------------------------------

    /// "Add segment" at waveform time `at_sec`: the region is created first
    /// (the trigger lives on the waveform side), then the segment lands in
    /// sorted position with empty text.
    pub fn add_segment(&mut self, at_sec: f64, port: &mut dyn RegionPort) -> String {
        let id = Uuid::new_v4().to_string();
        let origin = self.transcript.time_origin_sec;
        let start_sec = at_sec + origin;
        let end_sec = at_sec + self.config.new_segment_span_sec + origin;

        self.mirror
            .ensure_region(&id, start_sec, end_sec, origin, &self.config, port);
        self.transcript = self.transcript.insert(Segment {
            id: id.clone(),
            start_sec,
            end_sec,
            text: String::new(),
            source: SegmentSource::UserCreated,
            speaker_id: None,
        });
        tracing::debug!(%id, start_sec, end_sec, "segment added");
        id
    }

    /// "Add segment" at the current playback position.
    pub fn add_segment_at_playhead(&mut self, port: &mut dyn RegionPort) -> String {
        self.add_segment(self.playhead_sec, port)
    }

    /// Delete a segment and its mirrored region; clears the active slot if
    /// it pointed here.
    pub fn remove_segment(&mut self, id: &str, port: &mut dyn RegionPort) -> EditOutcome {
        if !self.transcript.contains(id) {
            tracing::debug!(%id, "remove for unknown segment; ignored");
            return EditOutcome::Ignored;
        }
        self.transcript = self.transcript.remove(id);
        self.mirror.remove_region(id, port);
        self.tracker.on_segment_removed(id);
        EditOutcome::Applied
    }

    /// Replace the whole transcript (e.g. an imported captured transcript).
    /// Existing regions are dropped; if audio is already ready the new
    /// segments are materialized immediately.
    pub fn load_transcript(&mut self, transcript: Transcript, port: &mut dyn RegionPort) {
        self.mirror.clear(port);
        self.tracker.reset();
        self.transcript = transcript.normalized();
        if self.audio_ready {
            self.mirror
                .materialize_all(&self.transcript, &self.config, port);
        }
    }

    // -----------------------------------------------------------------------
    // Playback and overlay events
    // -----------------------------------------------------------------------

    pub fn on_time_update(&mut self, time_sec: f64) {
        self.playhead_sec = time_sec;
    }

    pub fn on_region_enter(&mut self, id: &str) {
        self.tracker.on_region_enter(id);
    }

    pub fn on_region_exit(&mut self, id: &str) {
        self.tracker.on_region_exit(id);
    }

    // -----------------------------------------------------------------------
    // Audio load
    // -----------------------------------------------------------------------

    /// Start loading a new audio file. Any ticket still in flight is
    /// superseded by this call.
    pub fn begin_load(&mut self, file_name: impl Into<String>) -> LoadTicket {
        self.load_epoch += 1;
        LoadTicket {
            epoch: self.load_epoch,
            file_name: file_name.into(),
        }
    }

    /// Resume after the decode finished.
    ///
    /// A stale ticket lands as `Ok(Superseded)` no matter what the decode
    /// produced. A current ticket propagates decode failure without touching
    /// any state; on success the transcript is reset (when it has no
    /// segments) or its horizon extended (when it does).
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        decoded: WaResult<f64>,
        port: &mut dyn RegionPort,
    ) -> WaResult<LoadOutcome> {
        if ticket.epoch != self.load_epoch {
            tracing::warn!(file_name = %ticket.file_name, "audio load superseded by a newer upload");
            return Ok(LoadOutcome::Superseded);
        }
        let duration_sec = match decoded {
            Ok(duration_sec) => duration_sec,
            Err(error @ WaError::DecodeFailure { .. }) => return Err(error),
            Err(error) => {
                return Err(WaError::DecodeFailure {
                    file_name: ticket.file_name,
                    reason: error.to_string(),
                });
            }
        };

        let transcript_reset = self.transcript.is_empty();
        if transcript_reset {
            let horizon = self.transcript.time_horizon_sec.max(duration_sec);
            self.transcript = Transcript::new(0.0, horizon);
            self.mirror.clear(port);
            self.tracker.reset();
        } else {
            let mut next = self.transcript.clone();
            next.time_horizon_sec = next.time_horizon_sec.max(duration_sec);
            self.transcript = next;
        }
        self.audio_duration_sec = Some(duration_sec);
        self.audio_ready = false;
        tracing::debug!(
            file_name = %ticket.file_name,
            duration_sec,
            transcript_reset,
            "audio loaded"
        );
        Ok(LoadOutcome::Loaded {
            duration_sec,
            transcript_reset,
        })
    }

    /// The waveform engine signaled ready: materialize a region for every
    /// segment. Idempotent.
    pub fn on_audio_ready(&mut self, port: &mut dyn RegionPort) {
        self.audio_ready = true;
        self.mirror
            .materialize_all(&self.transcript, &self.config, port);
    }

    // -----------------------------------------------------------------------
    // Audit
    // -----------------------------------------------------------------------

    /// Verify the mirror bijection: no region without a segment, and, once
    /// audio is ready, no segment without a region. Must hold after every
    /// supported operation; the test suite leans on this.
    pub fn check_consistency(&self) -> WaResult<()> {
        for id in self.mirror.region_ids() {
            if !self.transcript.contains(id) {
                return Err(WaError::MirrorDesync(format!(
                    "region `{id}` has no matching segment"
                )));
            }
        }
        if self.audio_ready {
            for segment in &self.transcript.segments {
                if !self.mirror.contains(&segment.id) {
                    return Err(WaError::MirrorDesync(format!(
                        "segment `{}` has no mirrored region",
                        segment.id
                    )));
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Run the configured interval policy over candidate absolute bounds.
    fn gate_interval(&self, start_sec: f64, end_sec: f64) -> Result<(f64, f64), WaError> {
        match self.config.interval_policy {
            IntervalPolicy::Allow => Ok((start_sec, end_sec)),
            IntervalPolicy::Clamp => {
                let start_sec = start_sec.max(0.0);
                let end_sec = end_sec.max(start_sec);
                Ok((start_sec, end_sec))
            }
            IntervalPolicy::Reject => {
                if start_sec < 0.0 {
                    return Err(WaError::NegativeTime {
                        value_sec: start_sec,
                    });
                }
                if end_sec < 0.0 {
                    return Err(WaError::NegativeTime { value_sec: end_sec });
                }
                if end_sec <= start_sec {
                    return Err(WaError::DegenerateInterval { start_sec, end_sec });
                }
                Ok((start_sec, end_sec))
            }
        }
    }

    /// Land gated bounds on both sides: store upsert + re-sort, then mirror.
    fn apply_bounds(
        &mut self,
        id: &str,
        start_sec: f64,
        end_sec: f64,
        port: &mut dyn RegionPort,
    ) -> EditOutcome {
        self.transcript = self
            .transcript
            .upsert(&SegmentPatch::new(id).start(start_sec).end(end_sec));
        self.mirror.ensure_region(
            id,
            start_sec,
            end_sec,
            self.transcript.time_origin_sec,
            &self.config,
            port,
        );
        EditOutcome::Applied
    }

    fn reject(&self, id: &str, error: WaError) -> EditOutcome {
        tracing::warn!(%id, code = error.error_code(), "edit rejected: {error}");
        EditOutcome::Rejected(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullPort;

    impl RegionPort for NullPort {
        fn create_region(&mut self, _: &str, _: RegionBounds, _: bool, _: bool) {}
        fn update_region(&mut self, _: &str, _: RegionBounds) {}
        fn delete_region(&mut self, _: &str) {}
    }

    fn engine_with_segment(id: &str, start_sec: f64, end_sec: f64) -> WaveAlignEngine {
        let mut engine = WaveAlignEngine::new();
        let transcript = Transcript::new(0.0, 60.0).insert(Segment {
            id: id.to_owned(),
            start_sec,
            end_sec,
            text: String::new(),
            source: SegmentSource::Captured,
            speaker_id: None,
        });
        engine.load_transcript(transcript, &mut NullPort);
        engine
    }

    #[test]
    fn reject_policy_keeps_prior_bounds() {
        let mut engine = engine_with_segment("s1", 2.0, 8.0);
        let outcome = engine.set_segment_end("s1", 1.0, &mut NullPort);
        assert!(matches!(
            outcome,
            EditOutcome::Rejected(WaError::DegenerateInterval { .. })
        ));
        let segment = engine.transcript().segment("s1").unwrap();
        assert_eq!((segment.start_sec, segment.end_sec), (2.0, 8.0));
    }

    #[test]
    fn reject_policy_refuses_negative_start() {
        let mut engine = engine_with_segment("s1", 2.0, 8.0);
        let outcome = engine.set_segment_start("s1", -3.0, &mut NullPort);
        assert!(matches!(
            outcome,
            EditOutcome::Rejected(WaError::NegativeTime { .. })
        ));
    }

    #[test]
    fn clamp_policy_pulls_end_up_to_start() {
        let mut engine = WaveAlignEngine::with_config(EngineConfig {
            interval_policy: IntervalPolicy::Clamp,
            ..EngineConfig::default()
        });
        let transcript = Transcript::new(0.0, 60.0).insert(Segment {
            id: "s1".to_owned(),
            start_sec: 5.0,
            end_sec: 9.0,
            text: String::new(),
            source: SegmentSource::Captured,
            speaker_id: None,
        });
        engine.load_transcript(transcript, &mut NullPort);

        assert!(engine.set_segment_end("s1", 3.0, &mut NullPort).is_applied());
        let segment = engine.transcript().segment("s1").unwrap();
        assert_eq!((segment.start_sec, segment.end_sec), (5.0, 5.0));
    }

    #[test]
    fn allow_policy_accepts_inverted_bounds_as_is() {
        let mut engine = WaveAlignEngine::with_config(EngineConfig {
            interval_policy: IntervalPolicy::Allow,
            ..EngineConfig::default()
        });
        let transcript = Transcript::new(0.0, 60.0).insert(Segment {
            id: "s1".to_owned(),
            start_sec: 5.0,
            end_sec: 9.0,
            text: String::new(),
            source: SegmentSource::Captured,
            speaker_id: None,
        });
        engine.load_transcript(transcript, &mut NullPort);

        assert!(engine.set_segment_end("s1", 3.0, &mut NullPort).is_applied());
        let segment = engine.transcript().segment("s1").unwrap();
        assert_eq!((segment.start_sec, segment.end_sec), (5.0, 3.0));
    }

    #[test]
    fn edits_against_unknown_ids_are_ignored() {
        let mut engine = WaveAlignEngine::new();
        assert!(matches!(engine.set_text("ghost", "x"), EditOutcome::Ignored));
        assert!(matches!(
            engine.set_segment_start("ghost", 1.0, &mut NullPort),
            EditOutcome::Ignored
        ));
        assert!(matches!(
            engine.remove_segment("ghost", &mut NullPort),
            EditOutcome::Ignored
        ));
    }
}
