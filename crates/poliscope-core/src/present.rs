//! Presentation normalisation: shaping decoded values for display.
//!
//! Everything a view prints is computed here: truncation to fixed character
//! budgets, preview caps, label resolution, percentage rounding, and the
//! pre-joined chip strings for scanned figures. Views match on the card enum
//! and print fields; they never branch on wire or decoded data.

use serde_json::Value;

use crate::answer::{AnswerVariant, FinancialEntry, LimitEntry};
use crate::decision::{ClassificationMetadata, Evidence, PolicyDecision, SourceRef};
use crate::labels;

/// Character budget for clause-like text in compact lists.
pub const CLAUSE_PREVIEW_CHARS: usize = 100;
/// Character budget for document/approval/notice items.
pub const ITEM_PREVIEW_CHARS: usize = 80;
/// Appended when text is cut at a budget.
pub const TRUNCATION_MARKER: &str = "...";
/// Item cap for preview lists (exclusions, ambiguous clauses, sections).
pub const MAX_PREVIEW_ITEMS: usize = 5;
/// Item cap for focus-area tags.
pub const MAX_FOCUS_AREAS: usize = 6;

// ── Shared rules ──

/// Truncate to `budget` characters, appending the marker when cut.
///
/// Counted in characters, so multi-byte text is never split mid-character.
/// Idempotent: re-truncating output returns it unchanged, because the first
/// `budget` characters of a truncated string are the same characters that
/// produced it.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let cut: String = text.chars().take(budget).collect();
    format!("{cut}{TRUNCATION_MARKER}")
}

/// Round-half-up percentage for a confidence in [0, 1].
///
/// Double-clamped to [0, 100] so an out-of-range upstream value still
/// yields a sane display width.
pub fn confidence_percent(confidence: f64) -> u8 {
    if !confidence.is_finite() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Compact "first item + total count" view of a list bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPreview {
    /// First item, clause-truncated; `None` when the bucket is empty.
    pub first: Option<String>,
    pub total: usize,
}

impl BucketPreview {
    /// Build from any bucket by projecting each item to its display text.
    pub fn of<'a, I>(mut bucket: I) -> Self
    where
        I: ExactSizeIterator<Item = &'a str>,
    {
        let total = bucket.len();
        let first = bucket
            .next()
            .map(|text| truncate(text, CLAUSE_PREVIEW_CHARS));
        Self { first, total }
    }
}

/// Render 20.0 as "20" and 7.5 as "7.5".
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|n| format_number(*n))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Answer cards ──

/// Render-ready card for one answer variant. One shape per tag; the view
/// matches exhaustively and prints fields.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerCard {
    Coverage(CoverageCard),
    Limits(LimitsCard),
    Exclusions(ExclusionsCard),
    Requirements(RequirementsCard),
    Conditions(ConditionsCard),
    Financial(FinancialCard),
    Risk(RiskCard),
    Ambiguity(AmbiguityCard),
    Unknown(UnknownCard),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageCard {
    pub covered: bool,
    pub headline: String,
    pub key_points: Vec<String>,
    pub next_step: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimitsCard {
    pub summary: String,
    pub entries: Vec<LimitLine>,
    pub preview: BucketPreview,
}

/// One limit clause with its figure chips pre-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitLine {
    pub description: String,
    /// "20%" or "20, 30%".
    pub percent_chip: Option<String>,
    /// "$5,000" or "$5,000, $10,000".
    pub amount_chip: Option<String>,
    /// "3 months" or "3 months, 2 years".
    pub duration_chip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionsCard {
    pub warning: String,
    /// First five items, clause-truncated.
    pub preview_items: Vec<String>,
    pub total: usize,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementsCard {
    pub documents: Vec<String>,
    pub approvals: Vec<String>,
    pub notices: Vec<String>,
    pub other: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionsCard {
    pub warning: Option<String>,
    pub conditions: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialCard {
    /// "Deductible", "Co-pay", "Maximum Claim", or "Reimbursement".
    pub kind_label: &'static str,
    pub message: Option<String>,
    pub entries: Vec<FinancialLine>,
    pub preview: BucketPreview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialLine {
    pub description: String,
    pub percent_chip: Option<String>,
    pub amount_chip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskCard {
    pub high: BucketPreview,
    pub medium: BucketPreview,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguityCard {
    pub recommendation: String,
    /// First five clauses, clause-truncated.
    pub preview_clauses: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCard {
    pub original_tag: String,
    /// Pretty-printed payload, for diagnostic display only.
    pub payload_json: String,
}

/// Shape a decoded variant for display.
pub fn normalize(variant: &AnswerVariant) -> AnswerCard {
    match variant {
        AnswerVariant::CoverageCheck {
            verdict,
            headline,
            key_points,
            next_step,
        } => AnswerCard::Coverage(CoverageCard {
            covered: *verdict,
            headline: headline.clone(),
            key_points: key_points
                .iter()
                .map(|p| truncate(p, CLAUSE_PREVIEW_CHARS))
                .collect(),
            next_step: next_step.clone(),
        }),
        AnswerVariant::Limits { summary, items } => AnswerCard::Limits(LimitsCard {
            summary: summary.clone(),
            entries: items.iter().map(limit_line).collect(),
            preview: BucketPreview::of(items.iter().map(|e| e.description.as_str())),
        }),
        AnswerVariant::Exclusions {
            warning,
            excluded_items,
            recommendation,
        } => AnswerCard::Exclusions(ExclusionsCard {
            warning: warning.clone(),
            preview_items: excluded_items
                .iter()
                .take(MAX_PREVIEW_ITEMS)
                .map(|item| truncate(item, CLAUSE_PREVIEW_CHARS))
                .collect(),
            total: excluded_items.len(),
            recommendation: recommendation.clone(),
        }),
        AnswerVariant::Requirements {
            documents,
            approvals,
            notices,
            other,
        } => AnswerCard::Requirements(RequirementsCard {
            documents: item_list(documents),
            approvals: item_list(approvals),
            notices: item_list(notices),
            other: item_list(other),
            total: documents.len() + approvals.len() + notices.len() + other.len(),
        }),
        AnswerVariant::Conditions {
            warning,
            conditions_list,
        } => AnswerCard::Conditions(ConditionsCard {
            warning: warning.clone(),
            conditions: conditions_list
                .iter()
                .map(|c| truncate(c, CLAUSE_PREVIEW_CHARS))
                .collect(),
            total: conditions_list.len(),
        }),
        AnswerVariant::Financial {
            kind,
            message,
            details,
        } => AnswerCard::Financial(FinancialCard {
            kind_label: kind.label(),
            message: message.clone(),
            entries: details.iter().map(financial_line).collect(),
            preview: BucketPreview::of(details.iter().map(|d| d.description.as_str())),
        }),
        AnswerVariant::RiskAnalysis {
            high_risk,
            medium_risk,
        } => AnswerCard::Risk(RiskCard {
            high: BucketPreview::of(high_risk.iter().map(|s| s.as_str())),
            medium: BucketPreview::of(medium_risk.iter().map(|s| s.as_str())),
            total: high_risk.len() + medium_risk.len(),
        }),
        AnswerVariant::AmbiguityAlert {
            recommendation,
            ambiguous_clauses,
        } => AnswerCard::Ambiguity(AmbiguityCard {
            recommendation: recommendation.clone(),
            preview_clauses: ambiguous_clauses
                .iter()
                .take(MAX_PREVIEW_ITEMS)
                .map(|c| truncate(c, CLAUSE_PREVIEW_CHARS))
                .collect(),
            total: ambiguous_clauses.len(),
        }),
        AnswerVariant::Unknown {
            original_tag,
            raw_payload,
        } => AnswerCard::Unknown(UnknownCard {
            original_tag: original_tag.clone(),
            payload_json: serde_json::to_string_pretty(&Value::Object(raw_payload.clone()))
                .unwrap_or_else(|_| "{}".to_string()),
        }),
    }
}

fn item_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| truncate(item, ITEM_PREVIEW_CHARS))
        .collect()
}

fn limit_line(entry: &LimitEntry) -> LimitLine {
    LimitLine {
        description: truncate(&entry.description, CLAUSE_PREVIEW_CHARS),
        percent_chip: (!entry.percentages.is_empty())
            .then(|| format!("{}%", join_numbers(&entry.percentages))),
        amount_chip: (!entry.amounts.is_empty()).then(|| entry.amounts.join(", ")),
        duration_chip: (!entry.durations.is_empty()).then(|| {
            entry
                .durations
                .iter()
                .map(|(n, unit)| format!("{} {}", format_number(*n), unit))
                .collect::<Vec<_>>()
                .join(", ")
        }),
    }
}

fn financial_line(entry: &FinancialEntry) -> FinancialLine {
    FinancialLine {
        description: truncate(&entry.description, CLAUSE_PREVIEW_CHARS),
        percent_chip: entry.percentage.map(|p| format!("{}%", format_number(p))),
        amount_chip: entry.amount.clone(),
    }
}

// ── Whole-decision presentation ──

/// Render-ready view of a whole decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionPresentation {
    pub question: String,
    pub verdict_label: &'static str,
    pub confidence_percent: u8,
    /// Coverage / Exclusions / Limits / Conditions clause sections.
    pub sections: Vec<SectionView>,
    pub answer: Option<AnswerCard>,
    pub classification: Option<MetadataCard>,
    pub evidence: Vec<EvidenceLine>,
    pub sources: Vec<String>,
    pub trace: TraceView,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub title: &'static str,
    /// First five clauses, clause-truncated.
    pub clauses: Vec<String>,
    pub total: usize,
}

impl SectionView {
    fn new(title: &'static str, clauses: &[String]) -> Self {
        Self {
            title,
            clauses: clauses
                .iter()
                .take(MAX_PREVIEW_ITEMS)
                .map(|c| truncate(c, CLAUSE_PREVIEW_CHARS))
                .collect(),
            total: clauses.len(),
        }
    }
}

/// Classification metadata with labels resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataCard {
    pub category: String,
    pub use_case: String,
    pub confidence_percent: u8,
    /// Capped at [`MAX_FOCUS_AREAS`].
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceLine {
    pub clause: String,
    /// "policy.pdf, p. 12" when the wire carried a locator.
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceView {
    pub mode: Option<String>,
    pub reason: Option<String>,
    pub similarity_percent: Option<u8>,
    /// (section, clause count) pairs in fixed order.
    pub clause_counts: Vec<(&'static str, usize)>,
}

/// Shape a whole decoded decision for display.
pub fn present_decision(decision: &PolicyDecision) -> DecisionPresentation {
    let summary = &decision.summary;
    DecisionPresentation {
        question: decision.question.clone(),
        verdict_label: summary.verdict.label(),
        confidence_percent: confidence_percent(summary.confidence),
        sections: vec![
            SectionView::new("Coverage", &summary.coverage),
            SectionView::new("Exclusions", &summary.exclusions),
            SectionView::new("Limits", &summary.limits),
            SectionView::new("Conditions", &summary.conditions),
        ],
        answer: summary.answer.as_ref().map(normalize),
        classification: decision.classification.as_ref().map(metadata_card),
        evidence: decision.evidence.iter().map(evidence_line).collect(),
        sources: decision.sources.iter().map(source_line).collect(),
        trace: TraceView {
            mode: decision.trace.mode.clone(),
            reason: decision.trace.reason.clone(),
            similarity_percent: decision.trace.top_similarity.map(confidence_percent),
            clause_counts: vec![
                ("coverage", decision.trace.coverage_clauses),
                ("limits", decision.trace.limit_clauses),
                ("conditions", decision.trace.condition_clauses),
                ("exclusions", decision.trace.exclusion_clauses),
            ],
        },
        note: decision.note.clone(),
    }
}

fn metadata_card(metadata: &ClassificationMetadata) -> MetadataCard {
    MetadataCard {
        category: labels::category_label(&metadata.category).to_string(),
        use_case: labels::use_case_label(&metadata.use_case).to_string(),
        confidence_percent: confidence_percent(metadata.confidence),
        focus_areas: metadata
            .focus_areas
            .iter()
            .take(MAX_FOCUS_AREAS)
            .cloned()
            .collect(),
    }
}

fn evidence_line(evidence: &Evidence) -> EvidenceLine {
    EvidenceLine {
        clause: truncate(&evidence.clause, CLAUSE_PREVIEW_CHARS),
        reference: source_reference(evidence.source.as_deref(), evidence.page),
    }
}

fn source_line(source: &SourceRef) -> String {
    let name = (!source.source.is_empty()).then_some(source.source.as_str());
    source_reference(name, source.page).unwrap_or_default()
}

/// "policy.pdf, p. 12" / "policy.pdf" / "p. 12".
fn source_reference(source: Option<&str>, page: Option<u32>) -> Option<String> {
    match (source, page) {
        (Some(s), Some(p)) => Some(format!("{s}, p. {p}")),
        (Some(s), None) => Some(s.to_string()),
        (None, Some(p)) => Some(format!("p. {p}")),
        (None, None) => None,
    }
}
