//! The decision envelope the backend returns for each question.
//!
//! Everything here is produced by [`crate::decode::decode_decision`]; fields
//! follow the same defaulting rules as the answer variants, so consumers
//! branch on emptiness, never on presence.

use crate::answer::AnswerVariant;

/// Final verdict over the asked question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Covered,
    Limited,
    Conditional,
    Excluded,
    NotSpecified,
    OutOfScope,
}

impl Verdict {
    /// The wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Covered => "covered",
            Verdict::Limited => "limited",
            Verdict::Conditional => "conditional",
            Verdict::Excluded => "excluded",
            Verdict::NotSpecified => "not_specified",
            Verdict::OutOfScope => "out_of_scope",
        }
    }

    /// Badge text shown beside the answer.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Covered => "Covered",
            Verdict::Limited => "Limited Coverage",
            Verdict::Conditional => "Conditional",
            Verdict::Excluded => "Excluded",
            Verdict::NotSpecified => "Not Specified",
            Verdict::OutOfScope => "Out of Scope",
        }
    }

    /// Parse a wire code. Exact match only; callers decide the fallback.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "covered" => Some(Verdict::Covered),
            "limited" => Some(Verdict::Limited),
            "conditional" => Some(Verdict::Conditional),
            "excluded" => Some(Verdict::Excluded),
            "not_specified" => Some(Verdict::NotSpecified),
            "out_of_scope" => Some(Verdict::OutOfScope),
            _ => None,
        }
    }
}

/// Per-question analysis summary.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSummary {
    pub verdict: Verdict,
    /// Clauses supporting coverage.
    pub coverage: Vec<String>,
    /// Clauses excluding the scenario.
    pub exclusions: Vec<String>,
    /// Clauses limiting coverage.
    pub limits: Vec<String>,
    /// Clauses conditioning coverage.
    pub conditions: Vec<String>,
    /// Backend confidence in [0, 1].
    pub confidence: f64,
    /// Category-shaped answer payload, when the backend produced one.
    pub answer: Option<AnswerVariant>,
}

/// How the verdict was reached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecisionTrace {
    pub mode: Option<String>,
    pub reason: Option<String>,
    /// Best retrieval similarity in [0, 1].
    pub top_similarity: Option<f64>,
    pub coverage_clauses: usize,
    pub limit_clauses: usize,
    pub condition_clauses: usize,
    pub exclusion_clauses: usize,
}

/// A clause cited in support of the decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub clause: String,
    pub page: Option<u32>,
    pub source: Option<String>,
}

/// A document reference the answer drew on.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRef {
    pub source: String,
    pub page: Option<u32>,
}

/// Query classification attached by the backend.
///
/// `category` and `use_case` are raw codes; [`crate::labels`] resolves them
/// to human labels at presentation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationMetadata {
    pub category: String,
    pub use_case: String,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
    pub focus_areas: Vec<String>,
}

/// Everything the backend returns for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDecision {
    pub session_id: String,
    /// The question as the backend understood it.
    pub question: String,
    pub summary: DecisionSummary,
    pub trace: DecisionTrace,
    pub evidence: Vec<Evidence>,
    pub sources: Vec<SourceRef>,
    pub classification: Option<ClassificationMetadata>,
    /// Category-specific guidance sentence, shown verbatim when present.
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_parse_known_codes() {
        assert_eq!(Verdict::parse("covered"), Some(Verdict::Covered));
        assert_eq!(Verdict::parse("limited"), Some(Verdict::Limited));
        assert_eq!(Verdict::parse("conditional"), Some(Verdict::Conditional));
        assert_eq!(Verdict::parse("excluded"), Some(Verdict::Excluded));
        assert_eq!(Verdict::parse("not_specified"), Some(Verdict::NotSpecified));
        assert_eq!(Verdict::parse("out_of_scope"), Some(Verdict::OutOfScope));
    }

    #[test]
    fn verdict_parse_rejects_unknown() {
        assert_eq!(Verdict::parse("maybe"), None);
        assert_eq!(Verdict::parse("Covered"), None);
        assert_eq!(Verdict::parse(""), None);
    }

    #[test]
    fn verdict_roundtrip() {
        for verdict in [
            Verdict::Covered,
            Verdict::Limited,
            Verdict::Conditional,
            Verdict::Excluded,
            Verdict::NotSpecified,
            Verdict::OutOfScope,
        ] {
            assert_eq!(Verdict::parse(verdict.as_str()), Some(verdict));
        }
    }

    #[test]
    fn verdict_badge_labels() {
        assert_eq!(Verdict::Covered.label(), "Covered");
        assert_eq!(Verdict::Limited.label(), "Limited Coverage");
        assert_eq!(Verdict::NotSpecified.label(), "Not Specified");
        assert_eq!(Verdict::OutOfScope.label(), "Out of Scope");
    }
}
