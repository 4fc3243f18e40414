//! Interconsultation routing rules.
//!
//! Keyed by diagnosis-code prefix: which specialties a referral may go
//! to, and the priority the table recommends. Separately, a per-specialty
//! table of required evidence fields.

use std::collections::{HashMap, HashSet};

use crate::models::Priority;

/// Routing constraints for a diagnosis-code prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralRule {
    /// Allowed target specialties; empty set means unconstrained
    pub allowed_specialties: HashSet<String>,
    /// Priority the table recommends for this diagnosis
    pub recommended_priority: Priority,
}

/// Rule table consulted by `InterconsultationValidator`.
pub struct InterconsultationRuleTable {
    rules: HashMap<String, ReferralRule>,
    /// specialty → evidence fields the referral must carry
    required_fields: HashMap<String, Vec<&'static str>>,
}

impl Default for InterconsultationRuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InterconsultationRuleTable {
    /// Create a table with the default curated rules.
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
            required_fields: Self::default_required_fields(),
        }
    }

    /// Routing rule for a diagnosis code, looked up by prefix.
    pub fn rule_for(&self, diagnosis_code: &str) -> Option<&ReferralRule> {
        let code = diagnosis_code.trim().to_uppercase();
        let prefix = code.split('.').next().unwrap_or(&code);
        self.rules.get(prefix)
    }

    /// Evidence fields required for a specialty. Unlisted specialties
    /// require only the motive.
    pub fn required_fields_for(&self, specialty: &str) -> &[&'static str] {
        self.required_fields
            .get(&specialty.trim().to_uppercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    fn default_rules() -> HashMap<String, ReferralRule> {
        let mut map = HashMap::new();

        let mut add = |prefix: &str, specialties: &[&str], priority: Priority| {
            map.insert(
                prefix.to_string(),
                ReferralRule {
                    allowed_specialties: specialties.iter().map(|s| s.to_string()).collect(),
                    recommended_priority: priority,
                },
            );
        };

        add("I21", &["CARDIOLOGÍA", "MEDICINA INTERNA"], Priority::Urgente);
        add("I50", &["CARDIOLOGÍA"], Priority::Alta);
        add(
            "I10",
            &["CARDIOLOGÍA", "MEDICINA INTERNA", "NEFROLOGÍA"],
            Priority::Media,
        );
        add(
            "E11",
            &["ENDOCRINOLOGÍA", "MEDICINA INTERNA", "NUTRICIÓN"],
            Priority::Media,
        );
        add("E10", &["ENDOCRINOLOGÍA"], Priority::Alta);
        add("F20", &["PSIQUIATRÍA", "PSICOLOGÍA"], Priority::Alta);
        add("F31", &["PSIQUIATRÍA"], Priority::Alta);
        add("C50", &["ONCOLOGÍA", "CIRUGÍA ONCOLÓGICA"], Priority::Urgente);
        add("C61", &["ONCOLOGÍA", "UROLOGÍA"], Priority::Urgente);
        add("N18", &["NEFROLOGÍA"], Priority::Alta);
        add("J44", &["NEUMOLOGÍA"], Priority::Media);
        add("B20", &["INFECTOLOGÍA"], Priority::Alta);

        map
    }

    fn default_required_fields() -> HashMap<String, Vec<&'static str>> {
        let mut map = HashMap::new();
        map.insert(
            "CARDIOLOGÍA".to_string(),
            vec!["exams_performed", "relevant_findings"],
        );
        map.insert(
            "ONCOLOGÍA".to_string(),
            vec!["exams_performed", "relevant_findings"],
        );
        map.insert(
            "NEUROLOGÍA".to_string(),
            vec!["relevant_findings", "specific_question"],
        );
        map.insert(
            "PSIQUIATRÍA".to_string(),
            vec!["relevant_findings", "specific_question"],
        );
        map
    }
}
