//! Vertical card display for policy decisions.
//!
//! A pure function of [`DecisionPresentation`]: truncation, caps, and label
//! lookups already happened in the core, so rendering is printing fields
//! with no branching on raw or decoded data.

use poliscope_core::present::{
    AmbiguityCard, AnswerCard, BucketPreview, ConditionsCard, CoverageCard, DecisionPresentation,
    ExclusionsCard, FinancialCard, LimitsCard, RequirementsCard, RiskCard, SectionView, TraceView,
    UnknownCard,
};

/// Cell count of the confidence bar.
const BAR_WIDTH: usize = 20;

// ── Public API ──

/// Print one decision as a vertical card.
pub fn print_decision(decision: &DecisionPresentation) {
    println!("=== {} ===", decision.question);
    println!("  {:<14} {}", "Verdict", decision.verdict_label);
    println!(
        "  {:<14} {} {}%",
        "Confidence",
        confidence_bar(decision.confidence_percent),
        decision.confidence_percent
    );
    println!();

    for section in &decision.sections {
        print_section(section);
    }

    if let Some(answer) = &decision.answer {
        print_answer(answer);
    }

    if let Some(metadata) = &decision.classification {
        println!("Classification");
        println!("  {:<14} {}", "Category", metadata.category);
        println!("  {:<14} {}", "Use case", metadata.use_case);
        println!(
            "  {:<14} {}%",
            "Confidence", metadata.confidence_percent
        );
        if !metadata.focus_areas.is_empty() {
            println!("  {:<14} {}", "Focus areas", metadata.focus_areas.join(", "));
        }
        println!();
    }

    if !decision.evidence.is_empty() {
        println!("Evidence ({})", decision.evidence.len());
        for line in &decision.evidence {
            match &line.reference {
                Some(reference) => println!("  - {} [{}]", line.clause, reference),
                None => println!("  - {}", line.clause),
            }
        }
        println!();
    }

    if !decision.sources.is_empty() {
        println!("Sources");
        for source in &decision.sources {
            println!("  - {source}");
        }
        println!();
    }

    print_trace(&decision.trace);

    if let Some(note) = &decision.note {
        println!("Note: {note}");
    }
}

// ── Sections ──

fn print_section(section: &SectionView) {
    if section.total == 0 {
        return;
    }
    println!("{} ({})", section.title, section.total);
    for clause in &section.clauses {
        println!("  - {clause}");
    }
    if section.total > section.clauses.len() {
        println!("  ... and {} more", section.total - section.clauses.len());
    }
    println!();
}

fn print_trace(trace: &TraceView) {
    let counts: Vec<String> = trace
        .clause_counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| format!("{name}: {count}"))
        .collect();
    if trace.mode.is_none() && trace.reason.is_none() && counts.is_empty() {
        return;
    }

    println!("Decision Trace");
    if let Some(mode) = &trace.mode {
        println!("  {:<14} {}", "Mode", mode);
    }
    if let Some(reason) = &trace.reason {
        println!("  {:<14} {}", "Reason", reason);
    }
    if let Some(similarity) = trace.similarity_percent {
        println!("  {:<14} {}%", "Similarity", similarity);
    }
    if !counts.is_empty() {
        println!("  {:<14} {}", "Clauses", counts.join(", "));
    }
    println!();
}

// ── Answer cards ──

fn print_answer(answer: &AnswerCard) {
    match answer {
        AnswerCard::Coverage(card) => print_coverage(card),
        AnswerCard::Limits(card) => print_limits(card),
        AnswerCard::Exclusions(card) => print_exclusions(card),
        AnswerCard::Requirements(card) => print_requirements(card),
        AnswerCard::Conditions(card) => print_conditions(card),
        AnswerCard::Financial(card) => print_financial(card),
        AnswerCard::Risk(card) => print_risk(card),
        AnswerCard::Ambiguity(card) => print_ambiguity(card),
        AnswerCard::Unknown(card) => print_unknown(card),
    }
    println!();
}

fn print_coverage(card: &CoverageCard) {
    println!(
        "Coverage Check: {}",
        if card.covered { "yes" } else { "no" }
    );
    if !card.headline.is_empty() {
        println!("  {}", card.headline);
    }
    for point in &card.key_points {
        println!("  - {point}");
    }
    if let Some(next_step) = &card.next_step {
        println!("  Next step: {next_step}");
    }
}

fn print_limits(card: &LimitsCard) {
    println!("Limits ({})", card.entries.len());
    if !card.summary.is_empty() {
        println!("  {}", card.summary);
    }
    for entry in &card.entries {
        let chips: Vec<&str> = [
            entry.percent_chip.as_deref(),
            entry.amount_chip.as_deref(),
            entry.duration_chip.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if chips.is_empty() {
            println!("  - {}", entry.description);
        } else {
            println!("  - {} [{}]", entry.description, chips.join(" | "));
        }
    }
}

fn print_exclusions(card: &ExclusionsCard) {
    println!("Exclusions ({})", card.total);
    if !card.warning.is_empty() {
        println!("  {}", card.warning);
    }
    for item in &card.preview_items {
        println!("  - {item}");
    }
    if card.total > card.preview_items.len() {
        println!("  ... and {} more", card.total - card.preview_items.len());
    }
    if let Some(recommendation) = &card.recommendation {
        println!("  Recommendation: {recommendation}");
    }
}

fn print_requirements(card: &RequirementsCard) {
    println!("Requirements ({})", card.total);
    print_requirement_group("Documents", &card.documents);
    print_requirement_group("Approvals", &card.approvals);
    print_requirement_group("Notices", &card.notices);
    print_requirement_group("Other", &card.other);
}

fn print_requirement_group(name: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {name}:");
    for item in items {
        println!("    - {item}");
    }
}

fn print_conditions(card: &ConditionsCard) {
    println!("Conditions ({})", card.total);
    if let Some(warning) = &card.warning {
        println!("  {warning}");
    }
    for condition in &card.conditions {
        println!("  - {condition}");
    }
}

fn print_financial(card: &FinancialCard) {
    println!("{} ({})", card.kind_label, card.entries.len());
    if let Some(message) = &card.message {
        println!("  {message}");
    }
    for entry in &card.entries {
        let chips: Vec<&str> = [entry.percent_chip.as_deref(), entry.amount_chip.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if chips.is_empty() {
            println!("  - {}", entry.description);
        } else {
            println!("  - {} [{}]", entry.description, chips.join(" | "));
        }
    }
}

fn print_risk(card: &RiskCard) {
    println!("Risk Analysis ({})", card.total);
    print_bucket("High risk", &card.high);
    print_bucket("Medium risk", &card.medium);
}

fn print_bucket(name: &str, bucket: &BucketPreview) {
    let Some(first) = &bucket.first else {
        return;
    };
    if bucket.total > 1 {
        println!("  {} ({}): {}", name, bucket.total, first);
    } else {
        println!("  {name}: {first}");
    }
}

fn print_ambiguity(card: &AmbiguityCard) {
    println!("Ambiguity Alert ({})", card.total);
    for clause in &card.preview_clauses {
        println!("  - {clause}");
    }
    if card.total > card.preview_clauses.len() {
        println!("  ... and {} more", card.total - card.preview_clauses.len());
    }
    if !card.recommendation.is_empty() {
        println!("  Recommendation: {}", card.recommendation);
    }
}

fn print_unknown(card: &UnknownCard) {
    println!("Unrecognised answer type \"{}\"", card.original_tag);
    for line in card.payload_json.lines() {
        println!("  {line}");
    }
}

// ── Helpers ──

/// Proportional bar, e.g. `[#################...]` at 87%.
fn confidence_bar(percent: u8) -> String {
    let filled = (percent as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
