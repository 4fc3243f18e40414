//! Single-referral validator.

use tracing::debug;

use crate::models::{Interconsultation, Priority};
use crate::rules::InterconsultationRuleTable;
use crate::{ValidationError, ValidationResult};

/// Fail-fast validator for one specialist referral, given the diagnosis
/// code that motivated it.
pub struct InterconsultationValidator {
    rules: InterconsultationRuleTable,
}

impl Default for InterconsultationValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl InterconsultationValidator {
    pub fn new() -> Self {
        Self {
            rules: InterconsultationRuleTable::new(),
        }
    }

    pub fn with_table(rules: InterconsultationRuleTable) -> Self {
        Self { rules }
    }

    pub fn validate(
        &self,
        referral: &Interconsultation,
        diagnosis_code: Option<&str>,
    ) -> ValidationResult<()> {
        let code = diagnosis_code
            .or(referral.related_diagnosis_code.as_deref())
            .unwrap_or("");

        if let Some(rule) = self.rules.rule_for(code) {
            let specialty = referral.specialty_normalized();
            if !rule.allowed_specialties.is_empty()
                && !rule.allowed_specialties.contains(&specialty)
            {
                return Err(ValidationError::RuleTable(format!(
                    "la especialidad {} no es adecuada para el diagnóstico {}",
                    referral.specialty, code
                )));
            }

            if rule.recommended_priority == Priority::Urgente
                && referral.priority != Priority::Urgente
            {
                return Err(ValidationError::RuleTable(format!(
                    "el diagnóstico {} requiere interconsulta con prioridad URGENTE",
                    code
                )));
            }
        }

        self.check_required_fields(referral)?;
        debug!(specialty = %referral.specialty, "interconsulta válida");
        Ok(())
    }

    fn check_required_fields(&self, referral: &Interconsultation) -> ValidationResult<()> {
        if referral.motive.trim().is_empty() {
            return Err(ValidationError::Coherence(
                "una interconsulta requiere motivo".to_string(),
            ));
        }

        for field in self.rules.required_fields_for(&referral.specialty) {
            let present = match *field {
                "exams_performed" => is_filled(&referral.exams_performed),
                "relevant_findings" => is_filled(&referral.relevant_findings),
                "specific_question" => is_filled(&referral.specific_question),
                _ => true,
            };
            if !present {
                return Err(ValidationError::Coherence(format!(
                    "la especialidad {} requiere el campo '{}'",
                    referral.specialty_normalized(),
                    field
                )));
            }
        }

        Ok(())
    }
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).is_some_and(|v| !v.is_empty())
}
