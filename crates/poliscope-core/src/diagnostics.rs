//! Silent decode diagnostics.
//!
//! Malformed wire data never fails a decode; it is absorbed by the defaulting
//! rules and recorded here. Records are logged at debug level when captured
//! and are never shown to the end user.

use tracing::debug;

/// Why a wire value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// Present but not the expected JSON type.
    WrongType,
    /// Numeric slot whose value was NaN, infinite, or unparseable.
    NotFinite,
    /// Number outside its documented range (clamped or dropped).
    OutOfRange,
    /// Entry in a nested list could not be decoded and was dropped.
    EntryDropped,
    /// Discriminant missing or not one of the known answer tags.
    UnknownTag,
    /// Verdict string not one of the six known codes.
    UnknownVerdict,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::WrongType => "wrong_type",
            AnomalyKind::NotFinite => "not_finite",
            AnomalyKind::OutOfRange => "out_of_range",
            AnomalyKind::EntryDropped => "entry_dropped",
            AnomalyKind::UnknownTag => "unknown_tag",
            AnomalyKind::UnknownVerdict => "unknown_verdict",
        }
    }
}

/// One absorbed anomaly: where it happened and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeAnomaly {
    /// Decode context, either an answer tag or an envelope section
    /// ("limits", "analysis", "decision_trace", ...).
    pub context: String,
    /// Field within the context.
    pub field: String,
    pub kind: AnomalyKind,
}

/// Accumulates anomalies over one decode pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<DecodeAnomaly>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, context: &str, field: &str, kind: AnomalyKind) {
        debug!(
            context = %context,
            field = %field,
            kind = kind.as_str(),
            "absorbed malformed wire field"
        );
        self.records.push(DecodeAnomaly {
            context: context.to_string(),
            field: field.to_string(),
            kind,
        });
    }

    pub fn records(&self) -> &[DecodeAnomaly] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DecodeAnomaly> {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
