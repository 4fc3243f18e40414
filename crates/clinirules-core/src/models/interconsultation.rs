//! Interconsultation (specialist referral) model.

use serde::{Deserialize, Serialize};

/// Referral priority, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Baja,
    Media,
    Alta,
    Urgente,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Baja => "BAJA",
            Priority::Media => "MEDIA",
            Priority::Alta => "ALTA",
            Priority::Urgente => "URGENTE",
        }
    }
}

/// Lifecycle status of a referral.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReferralStatus {
    Solicitada,
    Agendada,
    Completada,
    Rechazada,
}

/// A specialist referral attached to an encounter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interconsultation {
    /// Target specialty (e.g. "CARDIOLOGÍA")
    pub specialty: String,
    /// Reason for the referral
    pub motive: String,
    /// Requested priority
    pub priority: Priority,
    /// Lifecycle status
    pub status: ReferralStatus,
    /// Diagnosis code that motivated the referral
    pub related_diagnosis_code: Option<String>,
    /// Exams already performed (required by some specialties)
    pub exams_performed: Option<String>,
    /// Results of those exams
    pub exam_results: Option<String>,
    /// Relevant clinical findings
    pub relevant_findings: Option<String>,
    /// Specific question to the specialist
    pub specific_question: Option<String>,
}

impl Interconsultation {
    /// Create a referral with the required fields only.
    pub fn new(specialty: impl Into<String>, motive: impl Into<String>, priority: Priority) -> Self {
        Self {
            specialty: specialty.into(),
            motive: motive.into(),
            priority,
            status: ReferralStatus::Solicitada,
            related_diagnosis_code: None,
            exams_performed: None,
            exam_results: None,
            relevant_findings: None,
            specific_question: None,
        }
    }

    /// Specialty normalized for case-insensitive comparison.
    pub fn specialty_normalized(&self) -> String {
        self.specialty.trim().to_uppercase()
    }
}
