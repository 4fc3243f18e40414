//! Whole-encounter coherence review.
//!
//! Advisory pass over a complete encounter: every finding is collected
//! instead of aborting on the first, because this review protects an
//! encounter about to be submitted, not a single mutating command.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::CodeCatalog;
use crate::models::{Encounter, PatientProfile, Prescription, Priority};
use crate::rules::DrugInteractionGraph;
use crate::triage::{BloodPressureCategory, VitalSignsClassifier};
use crate::ValidationError;

use super::{DiagnosisValidator, InterconsultationValidator, PrescriptionValidator};

/// A referral the engine recommends adding to the encounter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedInterconsultation {
    pub specialty: String,
    pub priority: Priority,
    pub reason: String,
}

/// Structured result of the whole-encounter review.
///
/// Empty `errors` means the encounter is acceptable for persistence;
/// warnings never block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EncounterReview {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    pub suggested_interconsultations: Vec<SuggestedInterconsultation>,
}

impl EncounterReview {
    pub fn is_acceptable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Serialize for the external command handler.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Orchestrator over all entity validators plus the vital-sign triage.
pub struct EncounterCoherenceValidator {
    catalog: CodeCatalog,
    classifier: VitalSignsClassifier,
    interactions: DrugInteractionGraph,
    diagnosis_validator: DiagnosisValidator,
    prescription_validator: PrescriptionValidator,
    interconsultation_validator: InterconsultationValidator,
    /// code base → drug keywords usually prescribed for it
    expected_treatments: HashMap<String, Vec<&'static str>>,
    /// code base → referral the condition warrants on its own
    referral_triggers: HashMap<String, (&'static str, Priority)>,
}

impl Default for EncounterCoherenceValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl EncounterCoherenceValidator {
    pub fn new() -> Self {
        Self {
            catalog: CodeCatalog::new(),
            classifier: VitalSignsClassifier::new(),
            interactions: DrugInteractionGraph::new(),
            diagnosis_validator: DiagnosisValidator::new(),
            prescription_validator: PrescriptionValidator::new(),
            interconsultation_validator: InterconsultationValidator::new(),
            expected_treatments: Self::default_expected_treatments(),
            referral_triggers: Self::default_referral_triggers(),
        }
    }

    /// Review a whole encounter. Pure: same inputs, same findings.
    pub fn review(&self, encounter: &Encounter, patient: &PatientProfile) -> EncounterReview {
        let mut review = EncounterReview::default();

        self.review_diagnoses(encounter, &mut review);
        self.review_prescriptions(encounter, patient, &mut review);
        self.review_coverage(encounter, &mut review);
        self.review_interconsultations(encounter, &mut review);
        self.review_vital_signs(encounter, patient, &mut review);
        self.suggest_from_diagnoses(encounter, &mut review);

        debug!(
            errors = review.errors.len(),
            warnings = review.warnings.len(),
            suggestions = review.suggested_interconsultations.len(),
            "revisión de encuentro completada"
        );
        review
    }

    fn review_diagnoses(&self, encounter: &Encounter, review: &mut EncounterReview) {
        let principals = encounter.principal_count();
        if principals != 1 {
            review.errors.push(ValidationError::Coherence(format!(
                "el encuentro debe tener exactamente un diagnóstico principal (tiene {})",
                principals
            )));
        }

        for dx in &encounter.diagnoses {
            // Collect-all pass: an unknown code degrades to a warning but
            // must not swallow the remaining checks for that diagnosis.
            for finding in self.diagnosis_validator.findings(dx) {
                match finding {
                    ValidationError::CatalogLookup(code) => {
                        let mut warning =
                            format!("Código {} no encontrado en el catálogo de referencia", code);
                        if let Some(suggestion) = self.catalog.closest_known(&code) {
                            warning.push_str(&format!(" (¿quiso decir {}?)", suggestion));
                        }
                        review.warnings.push(warning);
                    }
                    err => review.errors.push(err),
                }
            }
        }
    }

    /// Pairwise-incremental pass: prescription i is checked against the
    /// prescriptions 0..i that already validated cleanly, so each
    /// interacting pair is reported exactly once.
    fn review_prescriptions(
        &self,
        encounter: &Encounter,
        patient: &PatientProfile,
        review: &mut EncounterReview,
    ) {
        let mut accepted: Vec<Prescription> = Vec::new();
        for prescription in &encounter.prescriptions {
            match self
                .prescription_validator
                .validate(prescription, &accepted, patient)
            {
                Ok(()) => accepted.push(prescription.clone()),
                Err(err) => {
                    warn!(drug = %prescription.drug_name, %err, "prescripción rechazada en revisión");
                    review.errors.push(err);
                }
            }
        }
    }

    /// Diagnoses without a recognizably compatible prescription get a
    /// warning, never an error.
    fn review_coverage(&self, encounter: &Encounter, review: &mut EncounterReview) {
        for dx in &encounter.diagnoses {
            let expected = match self.expected_treatments.get(dx.code_base()) {
                Some(keywords) => keywords,
                None => continue,
            };
            let covered = encounter.prescriptions.iter().any(|p| {
                let name = DrugInteractionGraph::normalize(&p.drug_name);
                expected.iter().any(|k| name.contains(k))
            });
            if !covered {
                review.warnings.push(format!(
                    "El diagnóstico {} ({}) no tiene prescripción asociada reconocida",
                    dx.code_base(),
                    dx.description
                ));
            }
        }
    }

    fn review_interconsultations(&self, encounter: &Encounter, review: &mut EncounterReview) {
        for referral in &encounter.interconsultations {
            if let Err(err) = self.interconsultation_validator.validate(referral, None) {
                review.errors.push(err);
            }
        }
    }

    fn review_vital_signs(
        &self,
        encounter: &Encounter,
        patient: &PatientProfile,
        review: &mut EncounterReview,
    ) {
        let signs = match &encounter.vital_signs {
            Some(signs) => signs,
            None => return,
        };

        review.warnings.extend(self.classifier.collect_alerts(signs));
        review
            .warnings
            .extend(self.classifier.validate_for_age(signs, patient.birth_date));

        let category = self.classifier.classify_pressure_text(signs.blood_pressure.as_deref());
        if category == BloodPressureCategory::HypertensiveCrisis {
            self.suggest(
                review,
                "CARDIOLOGÍA",
                Priority::Urgente,
                "Crisis hipertensiva detectada en signos vitales",
            );
        }
        if category == BloodPressureCategory::Hypotension {
            if let Some((sys, _)) = signs
                .blood_pressure
                .as_deref()
                .and_then(VitalSignsClassifier::parse_blood_pressure)
            {
                if sys < 90.0 {
                    self.suggest(
                        review,
                        "MEDICINA INTERNA",
                        Priority::Urgente,
                        "Hipotensión severa detectada en signos vitales",
                    );
                }
            }
        }
        if let Some(spo2) = signs.oxygen_saturation {
            if spo2 < 90.0 {
                self.suggest(
                    review,
                    "NEUMOLOGÍA",
                    Priority::Urgente,
                    "Saturación de oxígeno menor a 90%",
                );
            }
        }
        if let Some(hr) = signs.heart_rate {
            if !(40.0..=150.0).contains(&hr) {
                self.suggest(
                    review,
                    "CARDIOLOGÍA",
                    Priority::Alta,
                    "Frecuencia cardíaca extrema",
                );
            }
        }
        if let Some(temp) = signs.temperature {
            if temp > 39.5 {
                self.suggest(
                    review,
                    "INFECTOLOGÍA",
                    Priority::Alta,
                    "Fiebre mayor a 39.5°C",
                );
            }
        }
    }

    fn suggest_from_diagnoses(&self, encounter: &Encounter, review: &mut EncounterReview) {
        for dx in &encounter.diagnoses {
            if let Some((specialty, priority)) = self.referral_triggers.get(dx.code_base()) {
                self.suggest(
                    review,
                    specialty,
                    *priority,
                    &format!("Condición {} requiere valoración por especialista", dx.code_base()),
                );
            }
        }
    }

    /// De-duplicated by specialty, keeping the most urgent priority.
    fn suggest(
        &self,
        review: &mut EncounterReview,
        specialty: &str,
        priority: Priority,
        reason: &str,
    ) {
        if let Some(existing) = review
            .suggested_interconsultations
            .iter_mut()
            .find(|s| s.specialty == specialty)
        {
            if priority > existing.priority {
                existing.priority = priority;
                existing.reason = reason.to_string();
            }
            return;
        }
        review.suggested_interconsultations.push(SuggestedInterconsultation {
            specialty: specialty.to_string(),
            priority,
            reason: reason.to_string(),
        });
    }

    fn default_expected_treatments() -> HashMap<String, Vec<&'static str>> {
        let mut map = HashMap::new();
        map.insert(
            "I10".to_string(),
            vec!["enalapril", "captopril", "losartán", "losartan", "amlodipino", "hidroclorotiazida"],
        );
        map.insert(
            "E11".to_string(),
            vec!["metformina", "insulina", "glibenclamida", "sitagliptina"],
        );
        map.insert(
            "J45".to_string(),
            vec!["salbutamol", "budesonida", "fluticasona", "montelukast"],
        );
        map.insert(
            "J44".to_string(),
            vec!["salbutamol", "ipratropio", "tiotropio"],
        );
        map.insert(
            "J02".to_string(),
            vec!["amoxicilina", "penicilina", "azitromicina", "paracetamol"],
        );
        map.insert(
            "F20".to_string(),
            vec!["risperidona", "olanzapina", "quetiapina", "haloperidol"],
        );
        map
    }

    fn default_referral_triggers() -> HashMap<String, (&'static str, Priority)> {
        let mut map = HashMap::new();
        map.insert("I10".to_string(), ("CARDIOLOGÍA", Priority::Media));
        map.insert("E10".to_string(), ("ENDOCRINOLOGÍA", Priority::Media));
        map.insert("E11".to_string(), ("ENDOCRINOLOGÍA", Priority::Media));
        map.insert("N18".to_string(), ("NEFROLOGÍA", Priority::Alta));
        map.insert("J44".to_string(), ("NEUMOLOGÍA", Priority::Media));
        map.insert("J45".to_string(), ("NEUMOLOGÍA", Priority::Media));
        map
    }
}
