//! Active-Segment Tracker: derives the single "active" segment from region
//! enter/exit events.
//!
//! Two states: idle (no active id) and active on exactly one id. Overlapping
//! regions make enter/exit interleave, so the transitions are deliberately
//! asymmetric: the most recent enter always wins the active slot, and an exit
//! only clears the slot when it names the currently active id. A stale exit
//! from an already-demoted region must not blank a still-relevant selection.

#[derive(Debug, Clone, Default)]
pub struct ActiveTracker {
    active: Option<String>,
}

impl ActiveTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The playback cursor entered a region. Last enter wins; a previously
    /// active id is demoted without a synthetic exit.
    pub fn on_region_enter(&mut self, id: &str) {
        if let Some(previous) = &self.active {
            if previous != id {
                tracing::debug!(%previous, entered = %id, "active segment demoted by overlap");
            }
        }
        self.active = Some(id.to_owned());
    }

    /// The playback cursor left a region. Ignored unless `id` is the active
    /// one.
    pub fn on_region_exit(&mut self, id: &str) {
        match &self.active {
            Some(active) if active == id => {
                self.active = None;
            }
            Some(_) => {
                tracing::debug!(exited = %id, "stale region exit ignored");
            }
            None => {}
        }
    }

    /// A segment was deleted; if it held the active slot, clear it.
    pub fn on_segment_removed(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    /// Back to idle. Used when the transcript is replaced wholesale.
    pub fn reset(&mut self) {
        self.active = None;
    }
}
