#![allow(dead_code)]

use wavealign::{RegionBounds, RegionPort, Segment, SegmentSource, Transcript};

/// One command the engine issued to the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCall {
    Create {
        id: String,
        bounds: RegionBounds,
        draggable: bool,
        resizable: bool,
    },
    Update {
        id: String,
        bounds: RegionBounds,
    },
    Delete {
        id: String,
    },
}

/// Recording overlay port: captures every command for assertion.
#[derive(Debug, Default)]
pub struct MockOverlay {
    pub calls: Vec<OverlayCall>,
}

impl MockOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, OverlayCall::Create { .. }))
            .count()
    }

    pub fn update_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, OverlayCall::Update { .. }))
            .count()
    }

    pub fn delete_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, OverlayCall::Delete { .. }))
            .count()
    }

    pub fn created_ids(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                OverlayCall::Create { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Bounds from the most recent create or update for `id`.
    pub fn last_bounds_for(&self, id: &str) -> Option<RegionBounds> {
        self.calls.iter().rev().find_map(|call| match call {
            OverlayCall::Create {
                id: call_id,
                bounds,
                ..
            }
            | OverlayCall::Update {
                id: call_id,
                bounds,
            } if call_id == id => Some(*bounds),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RegionPort for MockOverlay {
    fn create_region(&mut self, id: &str, bounds: RegionBounds, draggable: bool, resizable: bool) {
        self.calls.push(OverlayCall::Create {
            id: id.to_owned(),
            bounds,
            draggable,
            resizable,
        });
    }

    fn update_region(&mut self, id: &str, bounds: RegionBounds) {
        self.calls.push(OverlayCall::Update {
            id: id.to_owned(),
            bounds,
        });
    }

    fn delete_region(&mut self, id: &str) {
        self.calls.push(OverlayCall::Delete { id: id.to_owned() });
    }
}

/// Build a captured segment with empty text.
pub fn seg(id: &str, start_sec: f64, end_sec: f64) -> Segment {
    Segment {
        id: id.to_owned(),
        start_sec,
        end_sec,
        text: String::new(),
        source: SegmentSource::Captured,
        speaker_id: None,
    }
}

/// Build a sorted transcript from `(id, start, end)` triples.
pub fn transcript_with(
    time_origin_sec: f64,
    time_horizon_sec: f64,
    segments: &[(&str, f64, f64)],
) -> Transcript {
    let mut transcript = Transcript::new(time_origin_sec, time_horizon_sec);
    for (id, start_sec, end_sec) in segments {
        transcript = transcript.insert(seg(id, *start_sec, *end_sec));
    }
    transcript
}

/// Assert the sort invariant: non-decreasing `start_sec` everywhere.
pub fn assert_sorted(transcript: &Transcript) {
    let starts: Vec<f64> = transcript
        .segments
        .iter()
        .map(|segment| segment.start_sec)
        .collect();
    for window in starts.windows(2) {
        assert!(
            window[0] <= window[1],
            "segments out of order: {starts:?}"
        );
    }
}
