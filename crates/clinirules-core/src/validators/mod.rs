//! Entity validators and the whole-encounter orchestrator.
//!
//! The single-entity validators fail fast: they protect a single
//! mutating command, so the first violated rule aborts the call with a
//! typed reason. The orchestrator runs in advisory mode instead,
//! collecting every finding over the whole encounter.

mod diagnosis;
mod encounter;
mod interconsultation;
mod prescription;

pub use diagnosis::DiagnosisValidator;
pub use encounter::{EncounterCoherenceValidator, EncounterReview, SuggestedInterconsultation};
pub use interconsultation::InterconsultationValidator;
pub use prescription::PrescriptionValidator;
