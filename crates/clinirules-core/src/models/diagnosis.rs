//! Diagnosis model.

use serde::{Deserialize, Serialize};

/// Role of a diagnosis within the encounter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiagnosisType {
    /// Primary reason for the encounter (exactly one per encounter)
    Principal,
    Secundario,
    Presuntivo,
    Confirmado,
}

/// Clinical severity of a diagnosis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Leve,
    Moderado,
    Severo,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Leve => "LEVE",
            Severity::Moderado => "MODERADO",
            Severity::Severo => "SEVERO",
        }
    }
}

/// A single diagnosis attached to an encounter.
///
/// Value object: validators read it, never mutate it. Field coherence
/// (severity vs manifestations, chronicity vs follow-up) is enforced by
/// `DiagnosisValidator`, not at construction, so that incomplete drafts
/// coming from the command handler can still be inspected and rejected
/// with a precise reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnosis {
    /// CIE-10-like code (e.g. "I10", "E11.9")
    pub code: String,
    /// Free-text description
    pub description: String,
    /// Role within the encounter
    pub diagnosis_type: DiagnosisType,
    /// Clinical severity
    pub severity: Option<Severity>,
    /// Whether the condition is chronic
    pub is_chronic: Option<bool>,
    /// Whether follow-up is required
    pub requires_follow_up: Option<bool>,
    /// Follow-up interval in months
    pub follow_up_months: Option<u32>,
    /// Free-text follow-up plan
    pub follow_up_plan: Option<String>,
    /// Whether a specialist referral is required
    pub requires_interconsultation: Option<bool>,
    /// Specialty the referral should go to
    pub recommended_specialty: Option<String>,
    /// Ordered clinical manifestations supporting the diagnosis
    pub clinical_manifestations: Vec<String>,
    /// Known risk factors
    pub risk_factors: Vec<String>,
}

impl Diagnosis {
    /// Create a diagnosis with the required fields only.
    pub fn new(code: impl Into<String>, description: impl Into<String>, diagnosis_type: DiagnosisType) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            diagnosis_type,
            severity: None,
            is_chronic: None,
            requires_follow_up: None,
            follow_up_months: None,
            follow_up_plan: None,
            requires_interconsultation: None,
            recommended_specialty: None,
            clinical_manifestations: Vec::new(),
            risk_factors: Vec::new(),
        }
    }

    /// Code base: the part before the '.' (rule tables key on this).
    pub fn code_base(&self) -> &str {
        self.code.split('.').next().unwrap_or(&self.code).trim()
    }

    pub fn is_principal(&self) -> bool {
        self.diagnosis_type == DiagnosisType::Principal
    }
}
