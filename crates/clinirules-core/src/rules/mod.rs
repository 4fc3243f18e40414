//! Immutable rule tables.
//!
//! Built once at process start, read-only thereafter: safe to share
//! across arbitrarily many concurrent validations without locking.

mod diagnosis_rules;
mod dosage;
mod interactions;
mod interconsultation_rules;

pub use diagnosis_rules::{DiagnosisRule, DiagnosisRuleTable};
pub use dosage::{doses_per_day, parse_dose_mg, DosageLimit, DosageRuleTable};
pub use interactions::DrugInteractionGraph;
pub use interconsultation_rules::{InterconsultationRuleTable, ReferralRule};
