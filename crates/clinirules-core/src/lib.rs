//! Clinirules Core Library
//!
//! Clinical validation and risk-scoring engine for outpatient encounters.
//!
//! # Architecture
//!
//! ```text
//! Encounter command handler (external)
//!         │
//!         │  diagnoses / prescriptions / interconsultations / vital signs
//!         ▼
//! ┌───────────────────────────────────────────────┐
//! │        EncounterCoherenceValidator            │
//! │  (advisory pass: collect errors + warnings,   │
//! │   derive suggested interconsultations)        │
//! └───────┬───────────────┬───────────────┬───────┘
//!         │               │               │
//!         ▼               ▼               ▼
//!  DiagnosisValidator PrescriptionValidator InterconsultationValidator
//!         │               │               │          (fail-fast, used
//!         ▼               ▼               ▼           at command time)
//!  DiagnosisRuleTable DrugInteractionGraph InterconsultationRuleTable
//!  CodeCatalog        dosage-by-age table  VitalSignsClassifier
//! ```
//!
//! # Core Principle
//!
//! **Rule tables are built once and never mutated.** Every validator is a
//! pure function over immutable inputs: same inputs, same findings. The
//! encounter aggregate is owned by the caller and passed in by value.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Diagnosis, Prescription, VitalSigns, etc.)
//! - [`catalog`]: CIE-10 code catalog with format check and lookup cache
//! - [`rules`]: Immutable rule tables (interactions, dosage, referrals)
//! - [`triage`]: Vital-sign classification and age-banded range checks
//! - [`validators`]: Entity validators and the encounter orchestrator

pub mod catalog;
pub mod models;
pub mod rules;
pub mod triage;
pub mod validators;

// Re-export commonly used types
pub use catalog::{CachedCodeCatalog, CodeCatalog};
pub use models::{
    Diagnosis, DiagnosisType, Encounter, Interconsultation, PatientProfile, PatientSex,
    Prescription, Priority, ReferralStatus, Severity, VitalSigns,
};
pub use rules::{DiagnosisRuleTable, DrugInteractionGraph, InterconsultationRuleTable};
pub use triage::{BloodPressureCategory, VitalSignsClassifier};
pub use validators::{
    DiagnosisValidator, EncounterCoherenceValidator, EncounterReview, InterconsultationValidator,
    PrescriptionValidator, SuggestedInterconsultation,
};

use serde::{Deserialize, Serialize};

// =========================================================================
// Error Taxonomy
// =========================================================================

/// Validation failure raised by the single-entity validators.
///
/// Single-entity validators fail fast: the first violated rule wins and
/// aborts the remaining checks for that entity. The whole-encounter
/// orchestrator collects these instead of raising, so callers can branch
/// on the kind while still surfacing the reason string verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// A code or string fails a structural pattern. Always a hard error.
    #[error("Formato inválido: {0}")]
    Format(String),

    /// A code is missing from the reference catalog. Hard error at
    /// single-diagnosis validation, degraded to a warning at
    /// whole-encounter review.
    #[error("Código no encontrado en el catálogo: {0}")]
    CatalogLookup(String),

    /// Two fields of the same entity contradict each other.
    #[error("Incoherencia clínica: {0}")]
    Coherence(String),

    /// The entity does not meet a mandatory rule-table requirement.
    #[error("Incumplimiento de regla clínica: {0}")]
    RuleTable(String),

    /// A cross-prescription drug interaction.
    #[error("Interacción medicamentosa: {0}")]
    Interaction(String),

    /// A patient-context safety violation (age, sex).
    #[error("Contraindicación: {0}")]
    Contraindication(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
