//! Segment Store: pure snapshot operations on [`Transcript`].
//!
//! Every operation takes the current snapshot by reference and returns a new
//! value; callers that hold the old snapshot can detect change by identity.
//! Operations are total: an unknown id is a no-op, never an error.

use crate::model::{Segment, SegmentPatch, Transcript};

impl Transcript {
    /// Apply the present fields of `patch` to the matching segment, then
    /// stable-re-sort by `start_sec`.
    ///
    /// Unknown ids return an unchanged clone; callers that need to
    /// distinguish that case check [`Transcript::contains`] first.
    #[must_use]
    pub fn upsert(&self, patch: &SegmentPatch) -> Self {
        let mut next = self.clone();
        let Some(segment) = next
            .segments
            .iter_mut()
            .find(|segment| segment.id == patch.id)
        else {
            tracing::debug!(id = %patch.id, "upsert target not found; no-op");
            return next;
        };

        if let Some(start_sec) = patch.start_sec {
            segment.start_sec = start_sec;
        }
        if let Some(end_sec) = patch.end_sec {
            segment.end_sec = end_sec;
        }
        if let Some(text) = &patch.text {
            segment.text = text.clone();
        }

        sort_segments(&mut next.segments);
        next
    }

    /// Append `segment` and stable-re-sort. The caller guarantees the id is
    /// fresh; duplicate ids are not checked here.
    #[must_use]
    pub fn insert(&self, segment: Segment) -> Self {
        let mut next = self.clone();
        next.segments.push(segment);
        sort_segments(&mut next.segments);
        next
    }

    /// Delete the segment with `id`. Removal preserves order, so no re-sort
    /// is needed. Unknown ids return an unchanged clone.
    #[must_use]
    pub fn remove(&self, id: &str) -> Self {
        let mut next = self.clone();
        let before = next.segments.len();
        next.segments.retain(|segment| segment.id != id);
        if next.segments.len() == before {
            tracing::debug!(%id, "remove target not found; no-op");
        }
        next
    }

    /// Normalize an externally supplied snapshot: re-sort without touching
    /// any other field. Used when a whole transcript is handed to the engine.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut next = self.clone();
        sort_segments(&mut next.segments);
        next
    }
}

/// Stable ascending sort by `start_sec`; insertion order breaks ties.
fn sort_segments(segments: &mut [Segment]) {
    segments.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));
}
