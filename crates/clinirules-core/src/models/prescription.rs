//! Prescription model and drug-category heuristics.

use serde::{Deserialize, Serialize};

/// Controlled substances recognized by keyword.
const CONTROLLED_KEYWORDS: &[&str] = &[
    "tramadol",
    "morfina",
    "fentanilo",
    "codeína",
    "codeina",
    "oxicodona",
    "diazepam",
    "alprazolam",
    "clonazepam",
    "midazolam",
    "fenobarbital",
    "metilfenidato",
];

/// Antibiotics recognized by keyword.
const ANTIBIOTIC_KEYWORDS: &[&str] = &[
    "amoxicilina",
    "ampicilina",
    "penicilina",
    "azitromicina",
    "claritromicina",
    "eritromicina",
    "ciprofloxacino",
    "levofloxacino",
    "cefalexina",
    "ceftriaxona",
    "cefuroxima",
    "doxiciclina",
    "clindamicina",
    "metronidazol",
    "trimetoprim",
    "nitrofurantoína",
    "nitrofurantoina",
];

/// Analgesics recognized by keyword.
const ANALGESIC_KEYWORDS: &[&str] = &[
    "paracetamol",
    "acetaminofén",
    "acetaminofen",
    "ibuprofeno",
    "naproxeno",
    "diclofenaco",
    "ketorolaco",
    "aspirina",
    "ácido acetilsalicílico",
    "acido acetilsalicilico",
    "tramadol",
    "morfina",
];

/// NSAIDs (subset of analgesics relevant to contraindication rules).
const NSAID_KEYWORDS: &[&str] = &[
    "ibuprofeno",
    "naproxeno",
    "diclofenaco",
    "ketorolaco",
    "aspirina",
    "ácido acetilsalicílico",
    "acido acetilsalicilico",
    "piroxicam",
    "meloxicam",
];

const ANTICOAGULANT_KEYWORDS: &[&str] = &[
    "warfarina",
    "acenocumarol",
    "heparina",
    "enoxaparina",
    "rivaroxabán",
    "rivaroxaban",
    "apixabán",
    "apixaban",
    "dabigatrán",
    "dabigatran",
];

const STATIN_KEYWORDS: &[&str] = &[
    "simvastatina",
    "atorvastatina",
    "rosuvastatina",
    "lovastatina",
    "pravastatina",
];

const CORTICOSTEROID_KEYWORDS: &[&str] = &[
    "prednisona",
    "prednisolona",
    "dexametasona",
    "hidrocortisona",
    "betametasona",
    "metilprednisolona",
    "corticoide",
];

/// A prescribed medication within an encounter.
///
/// Dose and frequency are free text as captured at the point of care; the
/// dosage rules parse them heuristically (digits for the dose, keyword
/// match for the frequency).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// Drug name as prescribed (free text)
    pub drug_name: String,
    /// Dose as written (e.g. "500 mg")
    pub dose: String,
    /// Frequency as written (e.g. "cada 8 horas")
    pub frequency: String,
    /// Route of administration
    pub route: Option<String>,
    /// Treatment duration in days
    pub duration_days: u32,
    /// Clinical justification (mandatory for controlled substances)
    pub justification: Option<String>,
    /// Indications for use (mandatory for antibiotics)
    pub indications: Option<String>,
    /// Drug concentration (e.g. "250mg/5mL")
    pub concentration: Option<String>,
    /// Explicit flag for special (controlled) prescription forms
    pub requires_special_prescription: Option<bool>,
}

impl Prescription {
    /// Create a prescription with the required fields only.
    pub fn new(
        drug_name: impl Into<String>,
        dose: impl Into<String>,
        frequency: impl Into<String>,
        duration_days: u32,
    ) -> Self {
        Self {
            drug_name: drug_name.into(),
            dose: dose.into(),
            frequency: frequency.into(),
            route: None,
            duration_days,
            justification: None,
            indications: None,
            concentration: None,
            requires_special_prescription: None,
        }
    }

    /// Lower-cased drug name used by all keyword heuristics.
    pub fn name_lower(&self) -> String {
        self.drug_name.to_lowercase()
    }

    /// Controlled substance: explicit flag or keyword match.
    ///
    /// Substring matching is a documented heuristic that tolerates false
    /// positives (e.g. brand names embedding a keyword); do not tighten to
    /// exact matching without revisiting the tests.
    pub fn is_controlled(&self) -> bool {
        if self.requires_special_prescription == Some(true) {
            return true;
        }
        contains_any(&self.name_lower(), CONTROLLED_KEYWORDS)
    }

    pub fn is_antibiotic(&self) -> bool {
        contains_any(&self.name_lower(), ANTIBIOTIC_KEYWORDS)
    }

    pub fn is_analgesic(&self) -> bool {
        contains_any(&self.name_lower(), ANALGESIC_KEYWORDS)
    }

    pub fn is_nsaid(&self) -> bool {
        contains_any(&self.name_lower(), NSAID_KEYWORDS)
    }

    pub fn is_anticoagulant(&self) -> bool {
        contains_any(&self.name_lower(), ANTICOAGULANT_KEYWORDS)
    }

    pub fn is_statin(&self) -> bool {
        contains_any(&self.name_lower(), STATIN_KEYWORDS)
    }

    pub fn is_corticosteroid(&self) -> bool {
        contains_any(&self.name_lower(), CORTICOSTEROID_KEYWORDS)
    }
}

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| name.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controlled_by_keyword() {
        let p = Prescription::new("Tramadol 50mg", "50 mg", "cada 8 horas", 5);
        assert!(p.is_controlled());
        assert!(p.is_analgesic());
        assert!(!p.is_antibiotic());
    }

    #[test]
    fn test_controlled_by_explicit_flag() {
        let mut p = Prescription::new("Fármaco experimental", "10 mg", "cada 24 horas", 7);
        assert!(!p.is_controlled());
        p.requires_special_prescription = Some(true);
        assert!(p.is_controlled());
    }

    #[test]
    fn test_antibiotic_keyword_is_case_insensitive() {
        let p = Prescription::new("AMOXICILINA 500", "500 mg", "cada 8 horas", 7);
        assert!(p.is_antibiotic());
    }

    #[test]
    fn test_nsaid_and_analgesic_overlap() {
        let p = Prescription::new("Ibuprofeno", "400 mg", "cada 8 horas", 3);
        assert!(p.is_nsaid());
        assert!(p.is_analgesic());
        assert!(!p.is_controlled());
    }

    #[test]
    fn test_aspirin_spelled_out() {
        let p = Prescription::new("Ácido acetilsalicílico 100mg", "100 mg", "cada 24 horas", 30);
        assert!(p.is_nsaid());
    }

    #[test]
    fn test_corticosteroid_detection() {
        let p = Prescription::new("Prednisona 20mg", "20 mg", "cada 24 horas", 21);
        assert!(p.is_corticosteroid());
    }
}
