//! Region Mirror: the one-to-one mapping between segment ids and overlay
//! regions.
//!
//! The mirror owns the id -> bounds table and every offset translation
//! between absolute segment time and waveform-relative region time. Overlay
//! commands go out through [`RegionPort`]; the mirror itself never talks to
//! the Segment Store.

use std::collections::HashMap;

use crate::model::{EngineConfig, RegionBounds, SegmentPatch, Transcript};

/// Commands the engine issues to the external region overlay.
///
/// Implementations are expected to be infallible: the overlay either applies
/// the command or drops it, but has no error channel back into the engine.
pub trait RegionPort {
    fn create_region(&mut self, id: &str, bounds: RegionBounds, draggable: bool, resizable: bool);
    fn update_region(&mut self, id: &str, bounds: RegionBounds);
    fn delete_region(&mut self, id: &str);
}

/// Whether [`RegionMirror::ensure_region`] had to create the region or found
/// one to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    Updated,
}

#[derive(Debug, Default)]
pub struct RegionMirror {
    regions: HashMap<String, RegionBounds>,
}

impl RegionMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region for every segment that does not have one yet.
    ///
    /// Called when the audio engine signals ready. Idempotent: segments that
    /// already have a region are skipped, so a second call creates nothing.
    pub fn materialize_all(
        &mut self,
        transcript: &Transcript,
        config: &EngineConfig,
        port: &mut dyn RegionPort,
    ) {
        let mut created = 0usize;
        for segment in &transcript.segments {
            if self.regions.contains_key(&segment.id) {
                continue;
            }
            let bounds = RegionBounds::new(
                segment.start_sec - transcript.time_origin_sec,
                segment.end_sec - transcript.time_origin_sec,
            );
            self.regions.insert(segment.id.clone(), bounds);
            port.create_region(
                &segment.id,
                bounds,
                config.draggable_regions,
                config.resizable_regions,
            );
            created += 1;
        }
        tracing::debug!(created, total = self.regions.len(), "materialized regions");
    }

    /// Segment -> region direction: make the overlay reflect the given
    /// absolute bounds, creating the region if the segment has none.
    ///
    /// Both bounds are always explicit so a lazily materialized region pairs
    /// the edited bound with the segment's other, unedited bound instead of
    /// a zero default.
    pub fn ensure_region(
        &mut self,
        id: &str,
        start_sec: f64,
        end_sec: f64,
        time_origin_sec: f64,
        config: &EngineConfig,
        port: &mut dyn RegionPort,
    ) -> EnsureOutcome {
        let bounds = RegionBounds::new(start_sec - time_origin_sec, end_sec - time_origin_sec);
        if let Some(existing) = self.regions.get_mut(id) {
            *existing = bounds;
            port.update_region(id, bounds);
            EnsureOutcome::Updated
        } else {
            self.regions.insert(id.to_owned(), bounds);
            port.create_region(
                id,
                bounds,
                config.draggable_regions,
                config.resizable_regions,
            );
            EnsureOutcome::Created
        }
    }

    /// Region -> segment direction: record bounds the overlay already applied
    /// visually (drag/resize commit) and return the equivalent absolute-time
    /// patch for the Segment Store. No overlay command is issued.
    pub fn commit_bounds(
        &mut self,
        id: &str,
        bounds: RegionBounds,
        time_origin_sec: f64,
    ) -> SegmentPatch {
        if self.regions.insert(id.to_owned(), bounds).is_none() {
            tracing::debug!(%id, "commit for untracked region; now tracked");
        }
        SegmentPatch::new(id)
            .start(bounds.start_sec + time_origin_sec)
            .end(bounds.end_sec + time_origin_sec)
    }

    /// Drop the region from the table and the overlay. Returns `false` if the
    /// id had no region.
    pub fn remove_region(&mut self, id: &str, port: &mut dyn RegionPort) -> bool {
        if self.regions.remove(id).is_some() {
            port.delete_region(id);
            true
        } else {
            tracing::debug!(%id, "remove for untracked region; no-op");
            false
        }
    }

    /// Delete every region, in id order for deterministic command streams.
    pub fn clear(&mut self, port: &mut dyn RegionPort) {
        let mut ids: Vec<String> = self.regions.keys().cloned().collect();
        ids.sort();
        for id in &ids {
            port.delete_region(id);
        }
        self.regions.clear();
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    #[must_use]
    pub fn bounds(&self, id: &str) -> Option<RegionBounds> {
        self.regions.get(id).copied()
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct NullPort;

    impl RegionPort for NullPort {
        fn create_region(&mut self, _: &str, _: RegionBounds, _: bool, _: bool) {}
        fn update_region(&mut self, _: &str, _: RegionBounds) {}
        fn delete_region(&mut self, _: &str) {}
    }

    #[test]
    fn ensure_then_commit_round_trips_exactly() {
        let mut mirror = RegionMirror::new();
        let config = EngineConfig::default();
        let origin = 7.25;

        let outcome = mirror.ensure_region("s1", 10.5, 15.75, origin, &config, &mut NullPort);
        assert_eq!(outcome, EnsureOutcome::Created);

        let region = mirror.bounds("s1").unwrap();
        let patch = mirror.commit_bounds("s1", region, origin);
        assert_eq!(patch.start_sec, Some(10.5));
        assert_eq!(patch.end_sec, Some(15.75));
    }

    #[test]
    fn ensure_on_existing_region_updates_in_place() {
        let mut mirror = RegionMirror::new();
        let config = EngineConfig::default();

        mirror.ensure_region("s1", 1.0, 2.0, 0.0, &config, &mut NullPort);
        let outcome = mirror.ensure_region("s1", 3.0, 8.0, 0.0, &config, &mut NullPort);
        assert_eq!(outcome, EnsureOutcome::Updated);
        assert_eq!(mirror.bounds("s1").unwrap(), RegionBounds::new(3.0, 8.0));
        assert_eq!(mirror.len(), 1);
    }

    #[test]
    fn commit_translates_region_time_to_absolute_time() {
        let mut mirror = RegionMirror::new();
        let patch = mirror.commit_bounds("s1", RegionBounds::new(2.0, 4.0), 10.0);
        assert_eq!(patch.id, "s1");
        assert_eq!(patch.start_sec, Some(12.0));
        assert_eq!(patch.end_sec, Some(14.0));
        assert!(patch.text.is_none());
        // The commit is recorded in the table even without a prior ensure.
        assert!(mirror.contains("s1"));
    }

    #[test]
    fn remove_region_reports_whether_anything_was_dropped() {
        let mut mirror = RegionMirror::new();
        let config = EngineConfig::default();
        mirror.ensure_region("s1", 0.0, 1.0, 0.0, &config, &mut NullPort);

        assert!(mirror.remove_region("s1", &mut NullPort));
        assert!(!mirror.remove_region("s1", &mut NullPort));
        assert!(mirror.is_empty());
    }
}
