//! Diagnosis rule table.
//!
//! Keyed by code prefix (text before the '.'): mandatory referral
//! specialty, minimum follow-up interval, and a regex set of codes that
//! must be marked chronic.

use std::collections::HashMap;

use regex::Regex;

/// Requirements attached to a diagnosis-code prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisRule {
    /// Specialty the diagnosis must be referred to, if any
    pub mandatory_specialty: Option<String>,
    /// Minimum follow-up interval in months, if any
    pub min_follow_up_months: Option<u32>,
}

/// Rule table consulted by `DiagnosisValidator`.
pub struct DiagnosisRuleTable {
    rules: HashMap<String, DiagnosisRule>,
    chronic_patterns: Vec<Regex>,
}

impl Default for DiagnosisRuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosisRuleTable {
    /// Create a table with the default curated rules.
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
            chronic_patterns: Self::default_chronic_patterns(),
        }
    }

    /// Rule for a code, looked up by its normalized prefix.
    pub fn rule_for(&self, code: &str) -> Option<&DiagnosisRule> {
        let code = code.trim().to_uppercase();
        self.rules.get(prefix_of(&code))
    }

    /// Whether the code matches the chronic-code pattern set.
    pub fn is_chronic_code(&self, code: &str) -> bool {
        let code = code.trim().to_uppercase();
        self.chronic_patterns.iter().any(|p| p.is_match(&code))
    }

    fn default_rules() -> HashMap<String, DiagnosisRule> {
        let mut map = HashMap::new();

        let mut add = |prefix: &str, specialty: Option<&str>, months: Option<u32>| {
            map.insert(
                prefix.to_string(),
                DiagnosisRule {
                    mandatory_specialty: specialty.map(String::from),
                    min_follow_up_months: months,
                },
            );
        };

        // Acute coronary events go straight to cardiology
        add("I21", Some("CARDIOLOGÍA"), Some(1));
        add("I50", Some("CARDIOLOGÍA"), Some(3));

        // Malignancies
        add("C50", Some("ONCOLOGÍA"), Some(1));
        add("C61", Some("ONCOLOGÍA"), Some(1));

        // Psychiatry
        add("F20", Some("PSIQUIATRÍA"), Some(1));
        add("F31", Some("PSIQUIATRÍA"), Some(2));

        // Chronic conditions with mandated follow-up only
        add("I10", None, Some(6));
        add("E10", None, Some(3));
        add("E11", None, Some(3));
        add("J44", Some("NEUMOLOGÍA"), Some(6));
        add("N18", Some("NEFROLOGÍA"), Some(3));
        add("B20", Some("INFECTOLOGÍA"), Some(6));

        map
    }

    fn default_chronic_patterns() -> Vec<Regex> {
        // Diabetes, hypertension, COPD/asthma, CKD, HIV
        ["^E1[0-4]", "^I1[0-5]", "^J4[45]", "^N18", "^B20"]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    }
}

fn prefix_of(code: &str) -> &str {
    code.trim().split('.').next().unwrap_or(code)
}
