//! Single-prescription validator.

use tracing::{debug, warn};

use crate::models::{PatientProfile, PatientSex, Prescription};
use crate::rules::{doses_per_day, parse_dose_mg, DosageRuleTable, DrugInteractionGraph};
use crate::{ValidationError, ValidationResult};

/// Aspirin spellings for the Reye-risk contraindication.
const ASPIRIN_KEYWORDS: &[&str] = &[
    "aspirina",
    "ácido acetilsalicílico",
    "acido acetilsalicilico",
];

/// Fail-fast validator for one prescription against the rest of the
/// encounter's prescriptions and the patient context.
///
/// Step order: dosage by age, interactions, contraindications, duration,
/// mandatory fields by category. The first violated rule aborts the call.
pub struct PrescriptionValidator {
    dosage: DosageRuleTable,
    interactions: DrugInteractionGraph,
}

impl Default for PrescriptionValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PrescriptionValidator {
    pub fn new() -> Self {
        Self {
            dosage: DosageRuleTable::new(),
            interactions: DrugInteractionGraph::new(),
        }
    }

    pub fn with_tables(dosage: DosageRuleTable, interactions: DrugInteractionGraph) -> Self {
        Self { dosage, interactions }
    }

    pub fn validate(
        &self,
        prescription: &Prescription,
        existing: &[Prescription],
        patient: &PatientProfile,
    ) -> ValidationResult<()> {
        let age = patient.age_years();
        self.validate_at_age(prescription, existing, patient.sex, age)
    }

    /// Age passed explicitly so callers (and tests) can pin the reference
    /// date; `validate` derives it from the birth date.
    pub fn validate_at_age(
        &self,
        prescription: &Prescription,
        existing: &[Prescription],
        sex: PatientSex,
        age_years: u32,
    ) -> ValidationResult<()> {
        self.check_dosage(prescription, age_years)?;
        self.check_interactions(prescription, existing)?;
        self.check_contraindications(prescription, sex, age_years)?;
        self.check_duration(prescription)?;
        self.check_mandatory_fields(prescription)?;
        debug!(drug = %prescription.drug_name, "prescripción válida");
        Ok(())
    }

    fn check_dosage(&self, prescription: &Prescription, age_years: u32) -> ValidationResult<()> {
        let limit = self
            .dosage
            .limit_for(&prescription.drug_name, age_years)
            .map_err(ValidationError::Contraindication)?;

        let limit = match limit {
            Some(l) => l,
            None => return Ok(()), // no table covers this drug
        };

        let dose_mg = match parse_dose_mg(&prescription.dose) {
            Some(d) => d,
            None => return Ok(()), // unparseable dose, nothing to compare
        };

        if dose_mg > limit.max_single_mg {
            return Err(ValidationError::RuleTable(format!(
                "dosis de {} mg de {} excede el máximo por toma ({} mg) para {} años",
                dose_mg, prescription.drug_name, limit.max_single_mg, age_years
            )));
        }

        if let Some(per_day) = doses_per_day(&prescription.frequency) {
            let daily = dose_mg * per_day as f64;
            if daily > limit.max_daily_mg {
                return Err(ValidationError::RuleTable(format!(
                    "dosis diaria de {} mg de {} excede el máximo ({} mg) para {} años",
                    daily, prescription.drug_name, limit.max_daily_mg, age_years
                )));
            }
        }

        Ok(())
    }

    fn check_interactions(
        &self,
        prescription: &Prescription,
        existing: &[Prescription],
    ) -> ValidationResult<()> {
        let existing_names: Vec<String> =
            existing.iter().map(|p| p.drug_name.clone()).collect();
        let found = self
            .interactions
            .interactions_for(&prescription.drug_name, &existing_names);
        if !found.is_empty() {
            warn!(drug = %prescription.drug_name, count = found.len(), "interacciones detectadas");
            return Err(ValidationError::Interaction(found.join("; ")));
        }
        Ok(())
    }

    /// The pregnancy rule is a coarse heuristic: it triggers on sex and
    /// age range alone, with no pregnancy flag in the model. Kept as-is;
    /// a modeling limitation, not a confirmed-pregnancy check.
    fn check_contraindications(
        &self,
        prescription: &Prescription,
        sex: PatientSex,
        age_years: u32,
    ) -> ValidationResult<()> {
        let name = prescription.name_lower();

        if age_years < 12 && ASPIRIN_KEYWORDS.iter().any(|k| name.contains(k)) {
            return Err(ValidationError::Contraindication(
                "aspirina contraindicada en menores de 12 años (riesgo de síndrome de Reye)"
                    .to_string(),
            ));
        }

        if sex == PatientSex::Femenino
            && (15..=50).contains(&age_years)
            && (prescription.is_nsaid()
                || prescription.is_anticoagulant()
                || prescription.is_statin())
        {
            return Err(ValidationError::Contraindication(format!(
                "{} requiere descartar embarazo en mujeres de 15 a 50 años",
                prescription.drug_name
            )));
        }

        Ok(())
    }

    fn check_duration(&self, prescription: &Prescription) -> ValidationResult<()> {
        if prescription.duration_days == 0 {
            return Err(ValidationError::RuleTable(
                "la duración del tratamiento debe ser mayor a cero días".to_string(),
            ));
        }

        if prescription.is_corticosteroid()
            && prescription.duration_days > 14
            && prescription.justification.is_none()
        {
            return Err(ValidationError::RuleTable(
                "corticoide por más de 14 días requiere justificación".to_string(),
            ));
        }

        if prescription.is_antibiotic() && prescription.duration_days < 3 {
            return Err(ValidationError::RuleTable(
                "un antibiótico requiere al menos 3 días de tratamiento".to_string(),
            ));
        }

        if prescription.is_controlled() && prescription.duration_days > 30 {
            return Err(ValidationError::RuleTable(
                "una sustancia controlada no puede prescribirse por más de 30 días".to_string(),
            ));
        }

        Ok(())
    }

    fn check_mandatory_fields(&self, prescription: &Prescription) -> ValidationResult<()> {
        if prescription.is_controlled() {
            if prescription
                .justification
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
            {
                return Err(ValidationError::Coherence(
                    "una sustancia controlada requiere justificación".to_string(),
                ));
            }
            if prescription.requires_special_prescription == Some(true)
                && prescription.concentration.is_none()
            {
                return Err(ValidationError::Coherence(
                    "una receta especial requiere indicar la concentración".to_string(),
                ));
            }
        }

        if prescription.is_antibiotic() {
            if prescription.route.as_deref().map(str::trim).unwrap_or("").is_empty() {
                return Err(ValidationError::Coherence(
                    "un antibiótico requiere vía de administración".to_string(),
                ));
            }
            if prescription
                .indications
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
            {
                return Err(ValidationError::Coherence(
                    "un antibiótico requiere indicaciones de uso".to_string(),
                ));
            }
        }

        Ok(())
    }
}
