//! Single-diagnosis validator.

use tracing::debug;

use crate::catalog::CodeCatalog;
use crate::models::{Diagnosis, Severity};
use crate::rules::DiagnosisRuleTable;
use crate::{ValidationError, ValidationResult};

/// Fail-fast validator for one diagnosis.
///
/// Step order: code format, required fields by type/chronicity, field
/// coherence, rule-table compliance. The first violated rule wins.
pub struct DiagnosisValidator {
    catalog: CodeCatalog,
    rules: DiagnosisRuleTable,
}

impl Default for DiagnosisValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosisValidator {
    pub fn new() -> Self {
        Self {
            catalog: CodeCatalog::new(),
            rules: DiagnosisRuleTable::new(),
        }
    }

    pub fn with_tables(catalog: CodeCatalog, rules: DiagnosisRuleTable) -> Self {
        Self { catalog, rules }
    }

    /// Strict validation used at diagnosis creation time.
    pub fn validate(&self, diagnosis: &Diagnosis) -> ValidationResult<()> {
        self.check_code(diagnosis)?;
        self.check_required_fields(diagnosis)?;
        self.check_coherence(diagnosis)?;
        self.check_rule_table(diagnosis)?;
        debug!(code = %diagnosis.code, "diagnóstico válido");
        Ok(())
    }

    /// Advisory variant: run every step and collect the failures instead
    /// of stopping at the first. An unknown code must not hide a
    /// coherence or rule-table violation in the same diagnosis.
    pub fn findings(&self, diagnosis: &Diagnosis) -> Vec<ValidationError> {
        let mut found = Vec::new();
        if let Err(e) = self.check_code(diagnosis) {
            found.push(e);
        }
        if let Err(e) = self.check_required_fields(diagnosis) {
            found.push(e);
        }
        if let Err(e) = self.check_coherence(diagnosis) {
            found.push(e);
        }
        if let Err(e) = self.check_rule_table(diagnosis) {
            found.push(e);
        }
        found
    }

    /// Format is a hard error; an unknown code is a hard error here and
    /// only a warning during whole-encounter review.
    fn check_code(&self, diagnosis: &Diagnosis) -> ValidationResult<()> {
        if !self.catalog.is_valid_format(&diagnosis.code) {
            return Err(ValidationError::Format(format!(
                "código diagnóstico '{}' no cumple el formato CIE-10",
                diagnosis.code.trim()
            )));
        }
        if self.catalog.description(&diagnosis.code).is_none() {
            return Err(ValidationError::CatalogLookup(
                diagnosis.code.trim().to_uppercase(),
            ));
        }
        Ok(())
    }

    fn check_required_fields(&self, diagnosis: &Diagnosis) -> ValidationResult<()> {
        if diagnosis.is_principal() && diagnosis.severity.is_none() {
            return Err(ValidationError::Coherence(
                "un diagnóstico principal requiere severidad".to_string(),
            ));
        }

        if diagnosis.is_chronic == Some(true) {
            if diagnosis.requires_follow_up.is_none() {
                return Err(ValidationError::Coherence(
                    "un diagnóstico crónico debe indicar si requiere seguimiento".to_string(),
                ));
            }
            if diagnosis.follow_up_months.is_none() {
                return Err(ValidationError::Coherence(
                    "un diagnóstico crónico requiere intervalo de seguimiento en meses".to_string(),
                ));
            }
            if diagnosis
                .follow_up_plan
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
            {
                return Err(ValidationError::Coherence(
                    "un diagnóstico crónico requiere plan de seguimiento".to_string(),
                ));
            }
        }

        if diagnosis.requires_interconsultation == Some(true)
            && diagnosis.recommended_specialty.is_none()
        {
            return Err(ValidationError::Coherence(
                "si requiere interconsulta debe indicar la especialidad recomendada".to_string(),
            ));
        }

        Ok(())
    }

    fn check_coherence(&self, diagnosis: &Diagnosis) -> ValidationResult<()> {
        if diagnosis.severity == Some(Severity::Severo)
            && diagnosis.clinical_manifestations.is_empty()
        {
            return Err(ValidationError::Coherence(
                "severidad SEVERO requiere manifestaciones clínicas".to_string(),
            ));
        }

        if diagnosis.is_chronic == Some(true) && diagnosis.requires_follow_up == Some(false) {
            return Err(ValidationError::Coherence(
                "un diagnóstico crónico requiere seguimiento".to_string(),
            ));
        }

        if diagnosis.requires_interconsultation == Some(true)
            && diagnosis
                .recommended_specialty
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(ValidationError::Coherence(
                "la especialidad recomendada no puede estar en blanco".to_string(),
            ));
        }

        Ok(())
    }

    fn check_rule_table(&self, diagnosis: &Diagnosis) -> ValidationResult<()> {
        if let Some(rule) = self.rules.rule_for(&diagnosis.code) {
            if let Some(mandated) = &rule.mandatory_specialty {
                if diagnosis.requires_interconsultation != Some(true) {
                    return Err(ValidationError::RuleTable(format!(
                        "el código {} requiere interconsulta obligatoria a {}",
                        diagnosis.code_base(),
                        mandated
                    )));
                }
                let declared = diagnosis
                    .recommended_specialty
                    .as_deref()
                    .map(|s| s.trim().to_uppercase())
                    .unwrap_or_default();
                if declared != mandated.to_uppercase() {
                    return Err(ValidationError::RuleTable(format!(
                        "el código {} debe referirse a {} (se indicó '{}')",
                        diagnosis.code_base(),
                        mandated,
                        diagnosis.recommended_specialty.as_deref().unwrap_or("")
                    )));
                }
            }

            if let Some(min_months) = rule.min_follow_up_months {
                match diagnosis.follow_up_months {
                    Some(months) if months >= min_months => {}
                    _ => {
                        return Err(ValidationError::RuleTable(format!(
                            "el código {} requiere seguimiento de al menos {} meses",
                            diagnosis.code_base(),
                            min_months
                        )));
                    }
                }
            }
        }

        if self.rules.is_chronic_code(&diagnosis.code) && diagnosis.is_chronic != Some(true) {
            return Err(ValidationError::RuleTable(format!(
                "el código {} corresponde a una condición crónica y debe marcarse como tal",
                diagnosis.code_base()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiagnosisType;

    fn chronic_hypertension() -> Diagnosis {
        let mut dx = Diagnosis::new("I10", "Hipertensión esencial", DiagnosisType::Principal);
        dx.severity = Some(Severity::Moderado);
        dx.is_chronic = Some(true);
        dx.requires_follow_up = Some(true);
        dx.follow_up_months = Some(6);
        dx.follow_up_plan = Some("Control de presión mensual".into());
        dx
    }

    #[test]
    fn test_valid_chronic_diagnosis_passes() {
        let validator = DiagnosisValidator::new();
        assert!(validator.validate(&chronic_hypertension()).is_ok());
    }

    #[test]
    fn test_bad_format_fails_first() {
        let validator = DiagnosisValidator::new();
        let mut dx = chronic_hypertension();
        dx.code = "HTA".into();
        assert!(matches!(
            validator.validate(&dx),
            Err(ValidationError::Format(_))
        ));
    }

    #[test]
    fn test_unknown_code_is_hard_error_here() {
        let validator = DiagnosisValidator::new();
        let mut dx = chronic_hypertension();
        dx.code = "Z99".into();
        assert!(matches!(
            validator.validate(&dx),
            Err(ValidationError::CatalogLookup(_))
        ));
    }

    #[test]
    fn test_principal_requires_severity() {
        let validator = DiagnosisValidator::new();
        let mut dx = chronic_hypertension();
        dx.severity = None;
        let err = validator.validate(&dx).unwrap_err();
        assert!(matches!(err, ValidationError::Coherence(_)));
        assert!(err.to_string().contains("severidad"));
    }

    #[test]
    fn test_severe_requires_manifestations() {
        let validator = DiagnosisValidator::new();
        let mut dx = chronic_hypertension();
        dx.severity = Some(Severity::Severo);
        dx.clinical_manifestations.clear();
        let err = validator.validate(&dx).unwrap_err();
        assert!(matches!(err, ValidationError::Coherence(_)));

        dx.clinical_manifestations.push("Cefalea intensa".into());
        assert!(validator.validate(&dx).is_ok());
    }

    #[test]
    fn test_chronic_with_follow_up_denied_is_incoherent() {
        let validator = DiagnosisValidator::new();
        let mut dx = chronic_hypertension();
        dx.requires_follow_up = Some(false);
        assert!(matches!(
            validator.validate(&dx),
            Err(ValidationError::Coherence(_))
        ));
    }

    #[test]
    fn test_chronic_requires_plan() {
        let validator = DiagnosisValidator::new();
        let mut dx = chronic_hypertension();
        dx.follow_up_plan = Some("   ".into());
        assert!(matches!(
            validator.validate(&dx),
            Err(ValidationError::Coherence(_))
        ));
    }

    #[test]
    fn test_infarction_requires_mandatory_interconsultation() {
        let validator = DiagnosisValidator::new();
        let mut dx = Diagnosis::new("I21", "Infarto agudo de miocardio", DiagnosisType::Principal);
        dx.severity = Some(Severity::Severo);
        dx.clinical_manifestations.push("Dolor torácico opresivo".into());
        dx.is_chronic = Some(true);
        dx.requires_follow_up = Some(true);
        dx.follow_up_months = Some(1);
        dx.follow_up_plan = Some("Control post-infarto".into());
        dx.requires_interconsultation = Some(false);

        let err = validator.validate(&dx).unwrap_err();
        assert!(matches!(err, ValidationError::RuleTable(_)));
        assert!(err.to_string().contains("interconsulta obligatoria"));
    }

    #[test]
    fn test_mandated_specialty_must_match_case_insensitively() {
        let validator = DiagnosisValidator::new();
        let mut dx = Diagnosis::new("I21", "Infarto agudo de miocardio", DiagnosisType::Secundario);
        dx.is_chronic = Some(true);
        dx.requires_follow_up = Some(true);
        dx.follow_up_months = Some(1);
        dx.follow_up_plan = Some("Control post-infarto".into());
        dx.requires_interconsultation = Some(true);
        dx.recommended_specialty = Some("cardiología".into());
        assert!(validator.validate(&dx).is_ok());

        dx.recommended_specialty = Some("DERMATOLOGÍA".into());
        assert!(matches!(
            validator.validate(&dx),
            Err(ValidationError::RuleTable(_))
        ));
    }

    #[test]
    fn test_minimum_follow_up_months_enforced() {
        let validator = DiagnosisValidator::new();
        let mut dx = chronic_hypertension();
        dx.follow_up_months = Some(2); // I10 mandates at least 6
        let err = validator.validate(&dx).unwrap_err();
        assert!(matches!(err, ValidationError::RuleTable(_)));
        assert!(err.to_string().contains("6 meses"));
    }

    #[test]
    fn test_chronic_code_must_be_marked_chronic() {
        let validator = DiagnosisValidator::new();
        let mut dx = Diagnosis::new("J45", "Asma", DiagnosisType::Secundario);
        dx.is_chronic = Some(false);
        assert!(matches!(
            validator.validate(&dx),
            Err(ValidationError::RuleTable(_))
        ));
    }

    #[test]
    fn test_findings_collects_across_steps() {
        let validator = DiagnosisValidator::new();
        let mut dx = Diagnosis::new("Z99", "Condición desconocida", DiagnosisType::Principal);
        dx.severity = Some(Severity::Severo);

        // Fail-fast validate stops at the unknown code
        assert!(matches!(
            validator.validate(&dx),
            Err(ValidationError::CatalogLookup(_))
        ));

        // The advisory variant still surfaces the coherence violation
        let findings = validator.findings(&dx);
        assert!(findings
            .iter()
            .any(|f| matches!(f, ValidationError::CatalogLookup(_))));
        assert!(findings
            .iter()
            .any(|f| matches!(f, ValidationError::Coherence(_))));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = DiagnosisValidator::new();
        let dx = chronic_hypertension();
        assert_eq!(validator.validate(&dx), validator.validate(&dx));
    }
}
