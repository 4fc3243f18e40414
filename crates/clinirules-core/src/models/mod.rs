//! Domain models for clinical encounters.

mod diagnosis;
mod encounter;
mod interconsultation;
mod patient;
mod prescription;
mod vital_signs;

pub use diagnosis::{Diagnosis, DiagnosisType, Severity};
pub use encounter::Encounter;
pub use interconsultation::{Interconsultation, Priority, ReferralStatus};
pub use patient::{age_in_years, PatientProfile, PatientSex};
pub use prescription::Prescription;
pub use vital_signs::VitalSigns;
