//! Report encoding
//!
//! Wraps an [`AnalyticsReport`] in a response envelope carrying producer metadata.
//! The report itself is deterministic; only the envelope's instance id and
//! computation timestamp vary between calls.

use crate::error::AnalyticsError;
use crate::types::AnalyticsReport;
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current envelope schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Envelope around one analytics report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub schema_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub report: AnalyticsReport,
}

/// Encoder for analytics report envelopes
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap a report in an envelope
    pub fn encode(&self, report: AnalyticsReport) -> ReportEnvelope {
        ReportEnvelope {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            report,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(&self, report: AnalyticsReport) -> Result<String, AnalyticsError> {
        let envelope = self.encode(report);
        serde_json::to_string_pretty(&envelope)
            .map_err(|e| AnalyticsError::EncodingError(e.to_string()))
    }
}
