//! Best-effort decoding of backend responses.
//!
//! Every function here is total: malformed wire data is absorbed by the
//! defaulting rules (lists become empty, required strings become empty,
//! numbers become absent) and recorded as a [`DecodeAnomaly`], never raised.
//! Absent and null fields take their defaults silently; only wrong-typed or
//! unparseable values are recorded. This module is the only place wire field
//! names appear; everything downstream consumes the typed model.

use serde_json::{Map, Value};

use crate::answer::{AnswerVariant, FinancialEntry, FinancialKind, LimitEntry};
use crate::decision::{
    ClassificationMetadata, DecisionSummary, DecisionTrace, Evidence, PolicyDecision, SourceRef,
    Verdict,
};
use crate::diagnostics::{AnomalyKind, DecodeAnomaly, Diagnostics};

/// Decode one `structured_answer` payload. Total: any JSON value, including
/// non-objects, produces a variant.
pub fn decode(raw: &Value) -> AnswerVariant {
    let mut diags = Diagnostics::new();
    decode_answer(raw, &mut diags)
}

/// [`decode`], also returning the anomalies absorbed along the way.
pub fn decode_with_diagnostics(raw: &Value) -> (AnswerVariant, Vec<DecodeAnomaly>) {
    let mut diags = Diagnostics::new();
    let variant = decode_answer(raw, &mut diags);
    (variant, diags.into_records())
}

/// Decode a full `/ask` response body. Total.
pub fn decode_decision(raw: &Value) -> PolicyDecision {
    let mut diags = Diagnostics::new();
    decode_decision_inner(raw, &mut diags)
}

/// [`decode_decision`], also returning the anomalies absorbed along the way.
pub fn decode_decision_with_diagnostics(raw: &Value) -> (PolicyDecision, Vec<DecodeAnomaly>) {
    let mut diags = Diagnostics::new();
    let decision = decode_decision_inner(raw, &mut diags);
    (decision, diags.into_records())
}

// ── Field extraction ──

/// Reader over one wire object: pulls typed values with defaulting and
/// records anomalies as it goes. `'m` is the wire data, `'d` the recorder,
/// kept separate so borrowed sub-objects outlive the reader.
struct Fields<'m, 'd> {
    context: &'static str,
    map: &'m Map<String, Value>,
    diags: &'d mut Diagnostics,
}

impl<'m, 'd> Fields<'m, 'd> {
    fn new(
        context: &'static str,
        map: &'m Map<String, Value>,
        diags: &'d mut Diagnostics,
    ) -> Self {
        Self {
            context,
            map,
            diags,
        }
    }

    fn reject(&mut self, field: &str, kind: AnomalyKind) {
        self.diags.record(self.context, field, kind);
    }

    /// Raw value, with absent and null folded together.
    fn value(&self, key: &str) -> Option<&'m Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    /// Required string; absent/null becomes empty.
    fn string(&mut self, key: &str) -> String {
        match self.value(key) {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                String::new()
            }
        }
    }

    /// Optional string; wrong-typed values are recorded and dropped.
    fn opt_string(&mut self, key: &str) -> Option<String> {
        match self.value(key) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                None
            }
        }
    }

    /// Boolean; absent/null becomes false.
    fn boolean(&mut self, key: &str) -> bool {
        match self.value(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                false
            }
        }
    }

    /// Optional finite number; accepts JSON numbers and numeric strings.
    fn opt_number(&mut self, key: &str) -> Option<f64> {
        let v = self.value(key)?;
        match coerce_number(v) {
            Some(n) => Some(n),
            None => {
                let kind = if matches!(v, Value::Number(_) | Value::String(_)) {
                    AnomalyKind::NotFinite
                } else {
                    AnomalyKind::WrongType
                };
                self.reject(key, kind);
                None
            }
        }
    }

    /// Confidence in [0, 1]; out-of-range values are recorded, then clamped.
    fn confidence(&mut self, key: &str) -> f64 {
        match self.opt_number(key) {
            None => 0.0,
            Some(n) if (0.0..=1.0).contains(&n) => n,
            Some(n) => {
                self.reject(key, AnomalyKind::OutOfRange);
                n.clamp(0.0, 1.0)
            }
        }
    }

    /// Non-negative integer count; absent/malformed becomes 0.
    fn count(&mut self, key: &str) -> usize {
        match self.opt_number(key) {
            None => 0,
            Some(n) if n >= 0.0 => n.round() as usize,
            Some(_) => {
                self.reject(key, AnomalyKind::OutOfRange);
                0
            }
        }
    }

    /// Optional page number; negative input is recorded and dropped.
    fn opt_page(&mut self, key: &str) -> Option<u32> {
        match self.opt_number(key) {
            None => None,
            Some(n) if n >= 0.0 => Some(n.round() as u32),
            Some(_) => {
                self.reject(key, AnomalyKind::OutOfRange);
                None
            }
        }
    }

    /// Sub-object; wrong-typed values are recorded and treated as absent.
    fn object(&mut self, key: &str) -> Option<&'m Map<String, Value>> {
        match self.value(key) {
            None => None,
            Some(Value::Object(m)) => Some(m),
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                None
            }
        }
    }

    /// List of strings; non-list becomes empty, non-string items are dropped.
    fn string_list(&mut self, key: &str) -> Vec<String> {
        match self.value(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => out.push(s.clone()),
                        _ => self.reject(key, AnomalyKind::EntryDropped),
                    }
                }
                out
            }
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                Vec::new()
            }
        }
    }

    /// List of finite numbers; unparseable items are dropped.
    fn number_list(&mut self, key: &str) -> Vec<f64> {
        match self.value(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match coerce_number(item) {
                        Some(n) => out.push(n),
                        None => self.reject(key, AnomalyKind::EntryDropped),
                    }
                }
                out
            }
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                Vec::new()
            }
        }
    }

    /// List of (magnitude, unit) pairs; malformed pairs are dropped.
    fn duration_list(&mut self, key: &str) -> Vec<(f64, String)> {
        match self.value(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match decode_duration(item) {
                        Some(pair) => out.push(pair),
                        None => self.reject(key, AnomalyKind::EntryDropped),
                    }
                }
                out
            }
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                Vec::new()
            }
        }
    }

    /// List of limit entries; non-object items are dropped, object items
    /// decode field-by-field with the usual defaults.
    fn limit_entries(&mut self, key: &str) -> Vec<LimitEntry> {
        match self.value(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_object() {
                        Some(obj) => out.push(decode_limit_entry(obj, self.diags)),
                        None => self.reject(key, AnomalyKind::EntryDropped),
                    }
                }
                out
            }
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                Vec::new()
            }
        }
    }

    /// List of financial entries; same drop rules as [`Self::limit_entries`].
    fn financial_entries(&mut self, key: &str) -> Vec<FinancialEntry> {
        match self.value(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_object() {
                        Some(obj) => out.push(decode_financial_entry(obj, self.diags)),
                        None => self.reject(key, AnomalyKind::EntryDropped),
                    }
                }
                out
            }
            Some(_) => {
                self.reject(key, AnomalyKind::WrongType);
                Vec::new()
            }
        }
    }

    /// Verdict code; anything but the six known codes maps to NotSpecified
    /// with a recorded warning.
    fn verdict(&mut self, key: &str) -> Verdict {
        match self.value(key).and_then(Value::as_str).and_then(Verdict::parse) {
            Some(v) => v,
            None => {
                self.reject(key, AnomalyKind::UnknownVerdict);
                Verdict::NotSpecified
            }
        }
    }
}

/// Accept finite JSON numbers and numeric strings ("20", "87.5").
fn coerce_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// `[3, "months"]`; elements past the first two are ignored.
fn decode_duration(v: &Value) -> Option<(f64, String)> {
    let items = v.as_array()?;
    let magnitude = coerce_number(items.first()?)?;
    let unit = items.get(1)?.as_str()?.to_string();
    Some((magnitude, unit))
}

fn decode_limit_entry(fields: &Map<String, Value>, diags: &mut Diagnostics) -> LimitEntry {
    let mut f = Fields::new("limit_entry", fields, diags);
    LimitEntry {
        description: f.string("description"),
        percentages: f.number_list("percentages"),
        amounts: f.string_list("amounts"),
        durations: f.duration_list("durations"),
    }
}

fn decode_financial_entry(fields: &Map<String, Value>, diags: &mut Diagnostics) -> FinancialEntry {
    let mut f = Fields::new("financial_entry", fields, diags);
    FinancialEntry {
        description: f.string("description"),
        percentage: f.opt_number("percentage"),
        amount: f.opt_string("amount"),
    }
}

// ── Answer dispatch ──

fn decode_answer(raw: &Value, diags: &mut Diagnostics) -> AnswerVariant {
    let Some(fields) = raw.as_object() else {
        diags.record("answer", "answer_type", AnomalyKind::UnknownTag);
        return AnswerVariant::Unknown {
            original_tag: String::new(),
            raw_payload: Map::new(),
        };
    };

    match fields.get("answer_type").and_then(Value::as_str) {
        Some("coverage_check") => decode_coverage_check(fields, diags),
        Some("limits") => decode_limits(fields, diags),
        Some("exclusions") => decode_exclusions(fields, diags),
        Some("requirements") => decode_requirements(fields, diags),
        Some("conditions") => decode_conditions(fields, diags),
        Some("deductible") => decode_financial(FinancialKind::Deductible, fields, diags),
        Some("copay") => decode_financial(FinancialKind::Copay, fields, diags),
        Some("maximum_claim") => decode_financial(FinancialKind::MaximumClaim, fields, diags),
        Some("reimbursement") => decode_financial(FinancialKind::Reimbursement, fields, diags),
        Some("risk_analysis") => decode_risk_analysis(fields, diags),
        Some("ambiguity_alert") => decode_ambiguity_alert(fields, diags),
        Some(other) => {
            diags.record("answer", "answer_type", AnomalyKind::UnknownTag);
            unknown_variant(other, fields)
        }
        None => {
            diags.record("answer", "answer_type", AnomalyKind::UnknownTag);
            unknown_variant("", fields)
        }
    }
}

/// Preserve the payload for diagnostic display, minus the consumed tag key.
fn unknown_variant(original_tag: &str, fields: &Map<String, Value>) -> AnswerVariant {
    let mut raw_payload = fields.clone();
    raw_payload.remove("answer_type");
    AnswerVariant::Unknown {
        original_tag: original_tag.to_string(),
        raw_payload,
    }
}

fn decode_coverage_check(fields: &Map<String, Value>, diags: &mut Diagnostics) -> AnswerVariant {
    let mut f = Fields::new("coverage_check", fields, diags);
    AnswerVariant::CoverageCheck {
        verdict: f.boolean("verdict"),
        headline: f.string("headline"),
        key_points: f.string_list("key_points"),
        next_step: f.opt_string("next_step"),
    }
}

fn decode_limits(fields: &Map<String, Value>, diags: &mut Diagnostics) -> AnswerVariant {
    let mut f = Fields::new("limits", fields, diags);
    AnswerVariant::Limits {
        summary: f.string("summary"),
        items: f.limit_entries("items"),
    }
}

fn decode_exclusions(fields: &Map<String, Value>, diags: &mut Diagnostics) -> AnswerVariant {
    let mut f = Fields::new("exclusions", fields, diags);
    AnswerVariant::Exclusions {
        warning: f.string("warning"),
        excluded_items: f.string_list("excluded_items"),
        recommendation: f.opt_string("recommendation"),
    }
}

fn decode_requirements(fields: &Map<String, Value>, diags: &mut Diagnostics) -> AnswerVariant {
    let mut f = Fields::new("requirements", fields, diags);
    AnswerVariant::Requirements {
        documents: f.string_list("documents"),
        approvals: f.string_list("approvals"),
        notices: f.string_list("notices"),
        other: f.string_list("other"),
    }
}

fn decode_conditions(fields: &Map<String, Value>, diags: &mut Diagnostics) -> AnswerVariant {
    let mut f = Fields::new("conditions", fields, diags);
    AnswerVariant::Conditions {
        warning: f.opt_string("warning"),
        conditions_list: f.string_list("conditions_list"),
    }
}

fn decode_financial(
    kind: FinancialKind,
    fields: &Map<String, Value>,
    diags: &mut Diagnostics,
) -> AnswerVariant {
    let mut f = Fields::new(kind.as_str(), fields, diags);
    AnswerVariant::Financial {
        kind,
        message: f.opt_string("message"),
        details: f.financial_entries("details"),
    }
}

fn decode_risk_analysis(fields: &Map<String, Value>, diags: &mut Diagnostics) -> AnswerVariant {
    let mut f = Fields::new("risk_analysis", fields, diags);
    AnswerVariant::RiskAnalysis {
        high_risk: f.string_list("high_risk"),
        medium_risk: f.string_list("medium_risk"),
    }
}

fn decode_ambiguity_alert(fields: &Map<String, Value>, diags: &mut Diagnostics) -> AnswerVariant {
    let mut f = Fields::new("ambiguity_alert", fields, diags);
    AnswerVariant::AmbiguityAlert {
        recommendation: f.string("recommendation"),
        ambiguous_clauses: f.string_list("ambiguous_clauses"),
    }
}

// ── Decision envelope ──

fn decode_decision_inner(raw: &Value, diags: &mut Diagnostics) -> PolicyDecision {
    let empty = Map::new();
    let fields = match raw.as_object() {
        Some(m) => m,
        None => {
            diags.record("decision", "response", AnomalyKind::WrongType);
            &empty
        }
    };

    let mut f = Fields::new("decision", fields, diags);
    let session_id = f.string("session_id");
    let question = f.string("question");
    let confidence = f.confidence("confidence");
    let note = f.opt_string("important_note");
    let analysis = f.object("analysis");
    let trace = f.object("decision_trace");
    let classification = f.object("classification_metadata");
    let evidence_raw = f.value("evidence");
    let sources_raw = f.value("sources");

    let summary = decode_summary(analysis.unwrap_or(&empty), confidence, diags);
    let trace = trace
        .map(|m| decode_trace(m, diags))
        .unwrap_or_default();
    let classification = classification.map(|m| decode_classification(m, diags));
    let evidence = decode_evidence_list(evidence_raw, diags);
    let sources = decode_source_list(sources_raw, diags);

    PolicyDecision {
        session_id,
        question,
        summary,
        trace,
        evidence,
        sources,
        classification,
        note,
    }
}

fn decode_summary(
    fields: &Map<String, Value>,
    confidence: f64,
    diags: &mut Diagnostics,
) -> DecisionSummary {
    let mut f = Fields::new("analysis", fields, diags);
    let verdict = f.verdict("verdict");
    let coverage = f.string_list("coverage");
    let exclusions = f.string_list("exclusions");
    let limits = f.string_list("limits");
    let conditions = f.string_list("conditions");
    let answer_raw = f.value("structured_answer");

    let answer = answer_raw.map(|v| decode_answer(v, diags));

    DecisionSummary {
        verdict,
        coverage,
        exclusions,
        limits,
        conditions,
        confidence,
        answer,
    }
}

fn decode_trace(fields: &Map<String, Value>, diags: &mut Diagnostics) -> DecisionTrace {
    let mut f = Fields::new("decision_trace", fields, diags);
    DecisionTrace {
        mode: f.opt_string("mode"),
        reason: f.opt_string("reason"),
        top_similarity: f.opt_number("top_similarity"),
        coverage_clauses: f.count("coverage_clauses"),
        limit_clauses: f.count("limit_clauses"),
        condition_clauses: f.count("condition_clauses"),
        exclusion_clauses: f.count("exclusion_clauses"),
    }
}

fn decode_classification(
    fields: &Map<String, Value>,
    diags: &mut Diagnostics,
) -> ClassificationMetadata {
    let mut f = Fields::new("classification_metadata", fields, diags);
    ClassificationMetadata {
        category: f.string("category"),
        use_case: f.string("use_case"),
        confidence: f.confidence("confidence"),
        focus_areas: f.string_list("focus_areas"),
    }
}

fn decode_evidence_list(raw: Option<&Value>, diags: &mut Diagnostics) -> Vec<Evidence> {
    let Some(items) = raw.and_then(Value::as_array) else {
        if raw.is_some() {
            diags.record("decision", "evidence", AnomalyKind::WrongType);
        }
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_object() {
            Some(obj) => {
                let mut f = Fields::new("evidence", obj, diags);
                out.push(Evidence {
                    clause: f.string("clause"),
                    page: f.opt_page("page"),
                    source: f.opt_string("source"),
                });
            }
            None => diags.record("decision", "evidence", AnomalyKind::EntryDropped),
        }
    }
    out
}

fn decode_source_list(raw: Option<&Value>, diags: &mut Diagnostics) -> Vec<SourceRef> {
    let Some(items) = raw.and_then(Value::as_array) else {
        if raw.is_some() {
            diags.record("decision", "sources", AnomalyKind::WrongType);
        }
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_object() {
            Some(obj) => {
                let mut f = Fields::new("sources", obj, diags);
                out.push(SourceRef {
                    source: f.string("source"),
                    page: f.opt_page("page"),
                });
            }
            None => diags.record("decision", "sources", AnomalyKind::EntryDropped),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_coverage_check() {
        let variant = decode(&json!({
            "answer_type": "coverage_check",
            "verdict": true,
            "headline": "Yes, covered",
            "key_points": ["Hospitalisation covered after 30 days", "Cashless at network hospitals"],
            "next_step": "File a pre-authorisation request"
        }));
        assert_eq!(
            variant,
            AnswerVariant::CoverageCheck {
                verdict: true,
                headline: "Yes, covered".into(),
                key_points: vec![
                    "Hospitalisation covered after 30 days".into(),
                    "Cashless at network hospitals".into(),
                ],
                next_step: Some("File a pre-authorisation request".into()),
            }
        );
    }

    #[test]
    fn decodes_limits_with_entries() {
        let variant = decode(&json!({
            "answer_type": "limits",
            "summary": "Found 2 limit clauses",
            "items": [
                {
                    "description": "Room rent capped at 1% of sum insured",
                    "percentages": [1],
                    "amounts": ["$5,000"],
                    "durations": [[3, "months"]]
                },
                {
                    "description": "Co-pay applies above age 60",
                    "percentages": [20, 30]
                }
            ]
        }));
        let AnswerVariant::Limits { summary, items } = variant else {
            panic!("expected limits variant");
        };
        assert_eq!(summary, "Found 2 limit clauses");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].percentages, vec![1.0]);
        assert_eq!(items[0].amounts, vec!["$5,000".to_string()]);
        assert_eq!(items[0].durations, vec![(3.0, "months".to_string())]);
        assert_eq!(items[1].percentages, vec![20.0, 30.0]);
        assert!(items[1].amounts.is_empty());
    }

    #[test]
    fn limits_defaults_when_fields_absent() {
        let variant = decode(&json!({"answer_type": "limits"}));
        assert_eq!(
            variant,
            AnswerVariant::Limits {
                summary: String::new(),
                items: vec![],
            }
        );
    }

    #[test]
    fn unknown_tag_preserves_payload() {
        let variant = decode(&json!({"answer_type": "foo", "x": 1}));
        let AnswerVariant::Unknown {
            original_tag,
            raw_payload,
        } = variant
        else {
            panic!("expected unknown variant");
        };
        assert_eq!(original_tag, "foo");
        assert_eq!(raw_payload.len(), 1);
        assert_eq!(raw_payload["x"], json!(1));
    }

    #[test]
    fn total_on_malformed_inputs() {
        for raw in [
            json!(null),
            json!(42),
            json!("answer"),
            json!([1, 2, 3]),
            json!({}),
            json!({"answer_type": 7}),
            json!({"answer_type": null}),
        ] {
            let (variant, diags) = decode_with_diagnostics(&raw);
            assert_eq!(variant.tag(), "unknown");
            assert!(!diags.is_empty());
        }
    }

    #[test]
    fn wrong_typed_fields_take_defaults() {
        let (variant, diags) = decode_with_diagnostics(&json!({
            "answer_type": "coverage_check",
            "verdict": "yes",
            "headline": 12,
            "key_points": "not a list",
            "next_step": {"nested": true}
        }));
        assert_eq!(
            variant,
            AnswerVariant::CoverageCheck {
                verdict: false,
                headline: String::new(),
                key_points: vec![],
                next_step: None,
            }
        );
        assert_eq!(diags.len(), 4);
        assert!(diags.iter().all(|a| a.kind == AnomalyKind::WrongType));
        assert!(diags.iter().all(|a| a.context == "coverage_check"));
    }

    #[test]
    fn null_fields_default_silently() {
        let (variant, diags) = decode_with_diagnostics(&json!({
            "answer_type": "exclusions",
            "warning": null,
            "excluded_items": null,
            "recommendation": null
        }));
        assert_eq!(
            variant,
            AnswerVariant::Exclusions {
                warning: String::new(),
                excluded_items: vec![],
                recommendation: None,
            }
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn malformed_list_entries_dropped_individually() {
        let (variant, diags) = decode_with_diagnostics(&json!({
            "answer_type": "limits",
            "items": [
                {"description": "valid clause"},
                42,
                "not an entry",
                {"description": "another valid clause"}
            ]
        }));
        let AnswerVariant::Limits { items, .. } = variant else {
            panic!("expected limits variant");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "valid clause");
        assert_eq!(items[1].description, "another valid clause");
        assert_eq!(
            diags
                .iter()
                .filter(|a| a.kind == AnomalyKind::EntryDropped)
                .count(),
            2
        );
    }

    #[test]
    fn numeric_strings_coerce() {
        let variant = decode(&json!({
            "answer_type": "limits",
            "items": [{
                "description": "scanner output",
                "percentages": ["20", 30, "7.5"]
            }]
        }));
        let AnswerVariant::Limits { items, .. } = variant else {
            panic!("expected limits variant");
        };
        assert_eq!(items[0].percentages, vec![20.0, 30.0, 7.5]);
    }

    #[test]
    fn non_finite_numbers_dropped() {
        let (variant, diags) = decode_with_diagnostics(&json!({
            "answer_type": "limits",
            "items": [{
                "description": "bad figures",
                "percentages": ["NaN", "inf", "x", 5]
            }]
        }));
        let AnswerVariant::Limits { items, .. } = variant else {
            panic!("expected limits variant");
        };
        assert_eq!(items[0].percentages, vec![5.0]);
        assert_eq!(
            diags
                .iter()
                .filter(|a| a.kind == AnomalyKind::EntryDropped)
                .count(),
            3
        );
    }

    #[test]
    fn duration_pairs_decode_and_drop() {
        let variant = decode(&json!({
            "answer_type": "limits",
            "items": [{
                "description": "waiting periods",
                "durations": [[3, "months"], [2], "junk", ["4", "years", "extra"]]
            }]
        }));
        let AnswerVariant::Limits { items, .. } = variant else {
            panic!("expected limits variant");
        };
        assert_eq!(
            items[0].durations,
            vec![(3.0, "months".to_string()), (4.0, "years".to_string())]
        );
    }

    #[test]
    fn financial_tags_share_one_variant() {
        for (tag, kind) in [
            ("deductible", FinancialKind::Deductible),
            ("copay", FinancialKind::Copay),
            ("maximum_claim", FinancialKind::MaximumClaim),
            ("reimbursement", FinancialKind::Reimbursement),
        ] {
            let variant = decode(&json!({
                "answer_type": tag,
                "message": "Found 1 clause",
                "details": [{"description": "You pay 20% of each claim", "percentage": 20}]
            }));
            let AnswerVariant::Financial {
                kind: decoded_kind,
                message,
                details,
            } = variant
            else {
                panic!("expected financial variant for {tag}");
            };
            assert_eq!(decoded_kind, kind);
            assert_eq!(message.as_deref(), Some("Found 1 clause"));
            assert_eq!(details.len(), 1);
            assert_eq!(details[0].percentage, Some(20.0));
            assert_eq!(details[0].amount, None);
        }
    }

    #[test]
    fn decodes_requirements_and_conditions() {
        let variant = decode(&json!({
            "answer_type": "requirements",
            "documents": ["Discharge summary", "Itemised bill"],
            "approvals": ["Pre-authorisation"],
            "notices": [],
            "other": ["Claim within 30 days"]
        }));
        let AnswerVariant::Requirements {
            documents,
            approvals,
            notices,
            other,
        } = variant
        else {
            panic!("expected requirements variant");
        };
        assert_eq!(documents.len(), 2);
        assert_eq!(approvals, vec!["Pre-authorisation".to_string()]);
        assert!(notices.is_empty());
        assert_eq!(other.len(), 1);

        let variant = decode(&json!({
            "answer_type": "conditions",
            "conditions_list": ["Subject to 48-month waiting period"]
        }));
        let AnswerVariant::Conditions {
            warning,
            conditions_list,
        } = variant
        else {
            panic!("expected conditions variant");
        };
        assert_eq!(warning, None);
        assert_eq!(conditions_list.len(), 1);
    }

    #[test]
    fn decodes_risk_and_ambiguity() {
        let variant = decode(&json!({
            "answer_type": "risk_analysis",
            "high_risk": ["Pre-existing conditions excluded for 48 months"],
            "medium_risk": ["Room rent cap may apply", "Co-pay above 60"]
        }));
        let AnswerVariant::RiskAnalysis {
            high_risk,
            medium_risk,
        } = variant
        else {
            panic!("expected risk variant");
        };
        assert_eq!(high_risk.len(), 1);
        assert_eq!(medium_risk.len(), 2);

        let variant = decode(&json!({
            "answer_type": "ambiguity_alert",
            "recommendation": "Confirm with the insurer in writing",
            "ambiguous_clauses": ["Coverage subject to reasonable and customary charges"]
        }));
        let AnswerVariant::AmbiguityAlert {
            recommendation,
            ambiguous_clauses,
        } = variant
        else {
            panic!("expected ambiguity variant");
        };
        assert_eq!(recommendation, "Confirm with the insurer in writing");
        assert_eq!(ambiguous_clauses.len(), 1);
    }

    // ── Decision envelope tests ──

    #[test]
    fn decodes_full_decision() {
        let decision = decode_decision(&json!({
            "session_id": "abc-123",
            "question": "Is cancer covered?",
            "analysis": {
                "verdict": "covered",
                "coverage": ["Cancer treatment covered up to sum insured"],
                "exclusions": [],
                "limits": [],
                "conditions": [],
                "structured_answer": {
                    "answer_type": "coverage_check",
                    "verdict": true,
                    "headline": "Yes, covered"
                }
            },
            "confidence": 0.87,
            "decision_trace": {
                "mode": "clause_match",
                "reason": "matched 3 coverage clauses",
                "top_similarity": 0.91,
                "coverage_clauses": 3,
                "limit_clauses": 0,
                "condition_clauses": 1,
                "exclusion_clauses": 0
            },
            "evidence": [
                {"clause": "Section 4.2 covers oncology treatment", "page": 12, "source": "policy.pdf"}
            ],
            "sources": [{"source": "policy.pdf", "page": 12}],
            "classification_metadata": {
                "category": "coverage_check",
                "use_case": "family",
                "confidence": 0.93,
                "focus_areas": ["coverage", "waiting periods"]
            },
            "important_note": "Verify waiting periods before claiming."
        }));

        assert_eq!(decision.session_id, "abc-123");
        assert_eq!(decision.question, "Is cancer covered?");
        assert_eq!(decision.summary.verdict, Verdict::Covered);
        assert_eq!(decision.summary.confidence, 0.87);
        assert_eq!(decision.summary.coverage.len(), 1);
        assert_eq!(
            decision.summary.answer,
            Some(AnswerVariant::CoverageCheck {
                verdict: true,
                headline: "Yes, covered".into(),
                key_points: vec![],
                next_step: None,
            })
        );
        assert_eq!(decision.trace.coverage_clauses, 3);
        assert_eq!(decision.trace.top_similarity, Some(0.91));
        assert_eq!(decision.evidence.len(), 1);
        assert_eq!(decision.evidence[0].page, Some(12));
        assert_eq!(decision.sources.len(), 1);
        let classification = decision.classification.expect("classification decoded");
        assert_eq!(classification.category, "coverage_check");
        assert_eq!(classification.focus_areas.len(), 2);
        assert_eq!(
            decision.note.as_deref(),
            Some("Verify waiting periods before claiming.")
        );
    }

    #[test]
    fn empty_decision_defaults() {
        let (decision, diags) = decode_decision_with_diagnostics(&json!({}));
        assert_eq!(decision.summary.verdict, Verdict::NotSpecified);
        assert_eq!(decision.summary.confidence, 0.0);
        assert!(decision.summary.answer.is_none());
        assert!(decision.evidence.is_empty());
        assert!(decision.classification.is_none());
        assert_eq!(decision.trace, DecisionTrace::default());
        // Missing verdict is the one recorded anomaly.
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, AnomalyKind::UnknownVerdict);
    }

    #[test]
    fn unrecognised_verdict_maps_to_not_specified() {
        let (decision, diags) = decode_decision_with_diagnostics(&json!({
            "analysis": {"verdict": "maybe"},
            "confidence": 0.5
        }));
        assert_eq!(decision.summary.verdict, Verdict::NotSpecified);
        assert!(
            diags
                .iter()
                .any(|a| a.kind == AnomalyKind::UnknownVerdict && a.field == "verdict")
        );
    }

    #[test]
    fn out_of_range_confidence_clamped_and_recorded() {
        let (decision, diags) = decode_decision_with_diagnostics(&json!({
            "analysis": {"verdict": "covered"},
            "confidence": 1.7
        }));
        assert_eq!(decision.summary.confidence, 1.0);
        assert!(
            diags
                .iter()
                .any(|a| a.kind == AnomalyKind::OutOfRange && a.field == "confidence")
        );

        let (decision, _) = decode_decision_with_diagnostics(&json!({
            "analysis": {"verdict": "covered"},
            "confidence": -0.2
        }));
        assert_eq!(decision.summary.confidence, 0.0);
    }

    #[test]
    fn evidence_entries_drop_malformed() {
        let decision = decode_decision(&json!({
            "analysis": {"verdict": "covered"},
            "confidence": 0.5,
            "evidence": [
                {"clause": "valid", "page": 3},
                "junk",
                {"clause": "no page"}
            ]
        }));
        assert_eq!(decision.evidence.len(), 2);
        assert_eq!(decision.evidence[0].page, Some(3));
        assert_eq!(decision.evidence[1].page, None);
    }

    #[test]
    fn trace_counts_tolerate_garbage() {
        let decision = decode_decision(&json!({
            "analysis": {"verdict": "covered"},
            "confidence": 0.5,
            "decision_trace": {
                "coverage_clauses": "4",
                "limit_clauses": -2,
                "condition_clauses": {"weird": true},
                "exclusion_clauses": 1
            }
        }));
        assert_eq!(decision.trace.coverage_clauses, 4);
        assert_eq!(decision.trace.limit_clauses, 0);
        assert_eq!(decision.trace.condition_clauses, 0);
        assert_eq!(decision.trace.exclusion_clauses, 1);
    }

    #[test]
    fn structured_answer_non_object_becomes_unknown() {
        let decision = decode_decision(&json!({
            "analysis": {"verdict": "covered", "structured_answer": "surprise"},
            "confidence": 0.5
        }));
        let Some(AnswerVariant::Unknown { original_tag, .. }) = decision.summary.answer else {
            panic!("expected unknown answer variant");
        };
        assert_eq!(original_tag, "");
    }
}
