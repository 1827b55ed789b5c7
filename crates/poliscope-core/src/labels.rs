//! Human labels for backend classification codes.
//!
//! Two independent tables, one per axis. Unknown codes pass through verbatim
//! so a new backend code degrades to its raw form instead of failing the
//! lookup.

/// Human label for a query category code.
pub fn category_label(code: &str) -> &str {
    match code {
        "coverage_check" => "Coverage Check",
        "eligibility" => "Eligibility",
        "exclusions" => "Exclusions",
        "limits" => "Limits",
        "deductible" => "Deductible",
        "copay" => "Co-pay",
        "conditions" => "Conditions",
        "requirements" => "Requirements",
        "claim_process" => "Claim Process",
        "network" => "Network",
        "pre_auth" => "Pre-Authorization",
        "waiting_period" => "Waiting Period",
        "obligations" => "Obligations",
        "gaps" => "Coverage Gaps",
        "ambiguity" => "Ambiguity",
        "risk_assessment" => "Risk Assessment",
        _ => code,
    }
}

/// Human label for a use-case code.
pub fn use_case_label(code: &str) -> &str {
    match code {
        "hospital_tpa" => "Hospital/TPA",
        "employer" => "Employer",
        "bank" => "Financial Institution",
        "legal" => "Legal",
        "broker" => "Broker",
        "family" => "Family",
        "vendor" => "Vendor",
        "due_diligence" => "Due Diligence",
        "auditor" => "Auditor",
        "data_protection" => "Data Protection",
        _ => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category_codes() {
        assert_eq!(category_label("coverage_check"), "Coverage Check");
        assert_eq!(category_label("pre_auth"), "Pre-Authorization");
        assert_eq!(category_label("gaps"), "Coverage Gaps");
        assert_eq!(category_label("risk_assessment"), "Risk Assessment");
    }

    #[test]
    fn known_use_case_codes() {
        assert_eq!(use_case_label("hospital_tpa"), "Hospital/TPA");
        assert_eq!(use_case_label("bank"), "Financial Institution");
        assert_eq!(use_case_label("due_diligence"), "Due Diligence");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(category_label("xyz_unknown"), "xyz_unknown");
        assert_eq!(use_case_label("xyz_unknown"), "xyz_unknown");
    }

    #[test]
    fn empty_code_passes_through() {
        assert_eq!(category_label(""), "");
        assert_eq!(use_case_label(""), "");
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert_eq!(category_label("Coverage_Check"), "Coverage_Check");
    }
}
