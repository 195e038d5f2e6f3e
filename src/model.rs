use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// Where a transcript segment came from.
///
/// Carried for display and policy decisions only; the engine never branches
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSource {
    /// Produced from the captured audio (initial transcript import).
    Captured,
    /// Created interactively via "add segment".
    UserCreated,
}

impl SegmentSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Captured => "captured",
            Self::UserCreated => "user_created",
        }
    }
}

/// A transcript block spanning an absolute time interval.
///
/// `start_sec < end_sec` is expected by consumers but may be transiently
/// violated while a drag is in progress; commit paths run the configured
/// [`IntervalPolicy`] before the bounds land here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Opaque stable identifier. Assigned at creation, never reused,
    /// never changes.
    pub id: String,
    /// Absolute transcript-relative start, seconds.
    pub start_sec: f64,
    /// Absolute transcript-relative end, seconds.
    pub end_sec: f64,
    /// Free-form transcript text.
    #[serde(default)]
    pub text: String,
    pub source: SegmentSource,
    /// Opaque speaker tag, passed through unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<i64>,
}

/// Partial update for a single segment; absent fields leave the segment
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SegmentPatch {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn start(mut self, start_sec: f64) -> Self {
        self.start_sec = Some(start_sec);
        self
    }

    #[must_use]
    pub fn end(mut self, end_sec: f64) -> Self {
        self.end_sec = Some(end_sec);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// The full transcript snapshot.
///
/// `segments` is sorted ascending by `start_sec` at every observation point;
/// ties keep insertion order. Mutation happens only through the snapshot
/// operations in [`crate::store`], each of which returns a fresh value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Offset subtracted from segment bounds to obtain waveform-relative
    /// region bounds.
    pub time_origin_sec: f64,
    /// Soft upper bound on segment ends; extended when audio loads.
    pub time_horizon_sec: f64,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Transcript {
    #[must_use]
    pub fn new(time_origin_sec: f64, time_horizon_sec: f64) -> Self {
        Self {
            time_origin_sec,
            time_horizon_sec,
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.segment(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Waveform-relative bounds of a mirrored region.
///
/// Always `segment bound - time_origin_sec`; the mirror owns the translation
/// in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub start_sec: f64,
    pub end_sec: f64,
}

impl RegionBounds {
    #[must_use]
    pub const fn new(start_sec: f64, end_sec: f64) -> Self {
        Self { start_sec, end_sec }
    }
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

/// How the reconciler treats an edit whose resulting bounds are degenerate
/// (`end <= start`) or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalPolicy {
    /// Accept the bounds as-is (the original system's behavior).
    Allow,
    /// Pull the offending bound back to the nearest legal value: negative
    /// times to zero, an end before its start up to the start.
    Clamp,
    /// Refuse the edit and keep the prior bounds.
    Reject,
}

impl IntervalPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Clamp => "clamp",
            Self::Reject => "reject",
        }
    }
}

/// Tunables for [`crate::reconciler::WaveAlignEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Span of a freshly added segment, seconds.
    pub new_segment_span_sec: f64,
    pub interval_policy: IntervalPolicy,
    /// Forwarded to the overlay when a region is created.
    pub draggable_regions: bool,
    pub resizable_regions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            new_segment_span_sec: 5.0,
            interval_policy: IntervalPolicy::Reject,
            draggable_regions: true,
            resizable_regions: true,
        }
    }
}
