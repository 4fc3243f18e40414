//! Encounter aggregate view.

use serde::{Deserialize, Serialize};

use super::{Diagnosis, Interconsultation, Prescription, VitalSigns};

/// The slice of an outpatient encounter this engine validates.
///
/// Owned and persisted by the external command handler; passed by value
/// into the validators and never mutated by them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Encounter {
    /// Unique encounter ID
    pub encounter_id: String,
    /// Diagnoses (exactly one must be PRINCIPAL)
    pub diagnoses: Vec<Diagnosis>,
    /// Prescriptions issued during the encounter
    pub prescriptions: Vec<Prescription>,
    /// Specialist referrals requested during the encounter
    pub interconsultations: Vec<Interconsultation>,
    /// Vital signs recorded at triage
    pub vital_signs: Option<VitalSigns>,
    /// Creation timestamp
    pub created_at: String,
}

impl Encounter {
    /// Create an empty encounter.
    pub fn new() -> Self {
        Self {
            encounter_id: uuid::Uuid::new_v4().to_string(),
            diagnoses: Vec::new(),
            prescriptions: Vec::new(),
            interconsultations: Vec::new(),
            vital_signs: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Number of diagnoses marked PRINCIPAL.
    pub fn principal_count(&self) -> usize {
        self.diagnoses.iter().filter(|d| d.is_principal()).count()
    }
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new()
    }
}
