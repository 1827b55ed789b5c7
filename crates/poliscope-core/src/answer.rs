//! Typed answer variants decoded from the backend's `structured_answer` payload.
//!
//! The wire value is a discriminated union keyed by `answer_type` with a
//! different field set per tag. [`crate::decode`] maps it onto this closed
//! enum; everything downstream matches exhaustively, so a new tag is a
//! compile-time extension rather than a silent fallthrough at render time.

use serde_json::{Map, Value};

/// One limit clause with the figures scanned out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitEntry {
    pub description: String,
    /// Percentage figures, e.g. `[20.0, 30.0]` for "20% ... 30%".
    pub percentages: Vec<f64>,
    /// Monetary amounts kept as formatted strings ("$5,000").
    pub amounts: Vec<String>,
    /// (magnitude, unit) pairs, e.g. `(3.0, "months")`.
    pub durations: Vec<(f64, String)>,
}

/// One deductible/co-pay/claim-ceiling/reimbursement line.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialEntry {
    pub description: String,
    pub percentage: Option<f64>,
    /// Formatted amount string ("$500"), kept verbatim.
    pub amount: Option<String>,
}

/// Which financial wire tag a [`AnswerVariant::Financial`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialKind {
    Deductible,
    Copay,
    MaximumClaim,
    Reimbursement,
}

impl FinancialKind {
    /// The wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialKind::Deductible => "deductible",
            FinancialKind::Copay => "copay",
            FinancialKind::MaximumClaim => "maximum_claim",
            FinancialKind::Reimbursement => "reimbursement",
        }
    }

    /// Human heading for display.
    pub fn label(&self) -> &'static str {
        match self {
            FinancialKind::Deductible => "Deductible",
            FinancialKind::Copay => "Co-pay",
            FinancialKind::MaximumClaim => "Maximum Claim",
            FinancialKind::Reimbursement => "Reimbursement",
        }
    }
}

/// A fully-decoded answer payload.
///
/// Field defaults follow the decoding rules: list fields are empty rather
/// than absent, required strings are empty rather than absent, and optional
/// fields are `None` only when the wire carried nothing usable.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerVariant {
    /// Direct yes/no coverage answer.
    CoverageCheck {
        verdict: bool,
        headline: String,
        key_points: Vec<String>,
        next_step: Option<String>,
    },
    /// Coverage limit clauses with scanned figures.
    Limits {
        summary: String,
        items: Vec<LimitEntry>,
    },
    /// Exclusion clauses that apply to the question.
    Exclusions {
        warning: String,
        excluded_items: Vec<String>,
        recommendation: Option<String>,
    },
    /// Documents, approvals, and notices the policyholder must produce.
    Requirements {
        documents: Vec<String>,
        approvals: Vec<String>,
        notices: Vec<String>,
        other: Vec<String>,
    },
    /// Conditions attached to coverage.
    Conditions {
        warning: Option<String>,
        conditions_list: Vec<String>,
    },
    /// Deductible/co-pay/maximum-claim/reimbursement details; the four wire
    /// tags share one shape and collapse into this variant.
    Financial {
        kind: FinancialKind,
        message: Option<String>,
        details: Vec<FinancialEntry>,
    },
    /// Clauses flagged as high or medium risk for the asked scenario.
    RiskAnalysis {
        high_risk: Vec<String>,
        medium_risk: Vec<String>,
    },
    /// Clauses too ambiguous to answer from.
    AmbiguityAlert {
        recommendation: String,
        ambiguous_clauses: Vec<String>,
    },
    /// Escape hatch for tags this build does not know. `original_tag` holds
    /// the wire discriminant (empty when it was missing or not a string);
    /// `raw_payload` holds the remaining fields for diagnostic display only.
    Unknown {
        original_tag: String,
        raw_payload: Map<String, Value>,
    },
}

impl AnswerVariant {
    /// Canonical tag for this variant; the financial subtypes report their
    /// own wire tag.
    pub fn tag(&self) -> &'static str {
        match self {
            AnswerVariant::CoverageCheck { .. } => "coverage_check",
            AnswerVariant::Limits { .. } => "limits",
            AnswerVariant::Exclusions { .. } => "exclusions",
            AnswerVariant::Requirements { .. } => "requirements",
            AnswerVariant::Conditions { .. } => "conditions",
            AnswerVariant::Financial { kind, .. } => kind.as_str(),
            AnswerVariant::RiskAnalysis { .. } => "risk_analysis",
            AnswerVariant::AmbiguityAlert { .. } => "ambiguity_alert",
            AnswerVariant::Unknown { .. } => "unknown",
        }
    }
}
