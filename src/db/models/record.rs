//! Persisted OEE records.
//!
//! The numeric part of a record is stored as a self-describing JSON object so
//! that records written by other tools, or with fields missing, can still be
//! read and averaged field by field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::oee::{MeasurementInput, OeeResult};

/// Name given to records appended without a usable process name.
pub const DEFAULT_PROCESS_NAME: &str = "Simulation Model";

/// A stored snapshot of inputs and ratios. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub process_name: String,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Numeric value of a payload field, if present and numeric.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Value::as_f64)
    }

    fn count(&self, field: &str) -> Option<u64> {
        self.fields.get(field).and_then(Value::as_u64)
    }

    pub fn measurement(&self) -> Option<MeasurementInput> {
        Some(MeasurementInput {
            total_time: self.value("total_time")?,
            downtime: self.value("downtime")?,
            completed_simulations: self.count("completed_simulations")?,
            ideal_time_per_simulation: self.value("ideal_time_per_simulation")?,
            total_simulations: self.count("total_simulations")?,
            valid_simulations: self.count("valid_simulations")?,
        })
    }

    pub fn result(&self) -> Option<OeeResult> {
        Some(OeeResult {
            availability: self.value("availability")?,
            efficiency: self.value("efficiency")?,
            quality: self.value("quality")?,
            effectiveness: self.value("effectiveness")?,
        })
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    #[serde(flatten)]
    input: &'a MeasurementInput,
    #[serde(flatten)]
    result: &'a OeeResult,
}

/// Input to `Database::append`.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub process_name: String,
    pub input: MeasurementInput,
    pub result: OeeResult,
    pub notes: Option<String>,
    /// Save time is used when unset.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewRecord {
    pub fn new(process_name: impl Into<String>, input: MeasurementInput, result: OeeResult) -> Self {
        Self {
            process_name: process_name.into(),
            input,
            result,
            notes: None,
            created_at: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub(crate) fn resolved_process_name(&self) -> String {
        // Stored verbatim; lookups and deletes match the exact string.
        if self.process_name.trim().is_empty() {
            DEFAULT_PROCESS_NAME.to_string()
        } else {
            self.process_name.clone()
        }
    }

    pub(crate) fn payload_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Payload {
            input: &self.input,
            result: &self.result,
        })
    }
}
