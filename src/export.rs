//! Peripheral JSON export of a transcript.
//!
//! The `startTime`/`endTime`/`blocks[]` shape is what the surrounding editor
//! persists; none of it is load-bearing for the engine, so the envelope
//! carries its own schema version for forward evolution.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::WaResult;
use crate::model::{SegmentSource, Transcript};

pub const EXPORT_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptExport {
    pub schema_version: String,
    pub exported_at_rfc3339: String,
    pub start_time: f64,
    pub end_time: f64,
    pub blocks: Vec<ExportBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBlock {
    pub id: String,
    pub from: f64,
    pub to: f64,
    pub text: String,
    pub source: SegmentSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<i64>,
}

impl TranscriptExport {
    /// Snapshot the transcript in export shape; blocks keep store order.
    #[must_use]
    pub fn from_transcript(transcript: &Transcript) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_owned(),
            exported_at_rfc3339: Utc::now().to_rfc3339(),
            start_time: transcript.time_origin_sec,
            end_time: transcript.time_horizon_sec,
            blocks: transcript
                .segments
                .iter()
                .map(|segment| ExportBlock {
                    id: segment.id.clone(),
                    from: segment.start_sec,
                    to: segment.end_sec,
                    text: segment.text.clone(),
                    source: segment.source,
                    speaker_id: segment.speaker_id,
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> WaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
