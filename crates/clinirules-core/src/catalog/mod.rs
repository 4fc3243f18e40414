//! CIE-10 code catalog.
//!
//! Format check, description lookup and specialized-care membership for
//! diagnosis codes. The table is curated, illustrative and deliberately
//! incomplete: the contract is "apply the table that exists, consistently",
//! not "be medically exhaustive".

mod cache;

pub use cache::CachedCodeCatalog;

use std::collections::{HashMap, HashSet};

use regex::Regex;
use strsim::jaro_winkler;

use crate::ValidationError;

/// Minimum similarity for a nearest-known-code suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.80;

/// Reference catalog of diagnosis codes.
pub struct CodeCatalog {
    format: Regex,
    descriptions: HashMap<String, String>,
    /// Code bases whose conditions are managed in specialized care
    specialized_care: HashSet<String>,
}

impl Default for CodeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeCatalog {
    /// Create a catalog with the default curated tables.
    pub fn new() -> Self {
        Self {
            // One letter, two digits, optional dot + 1-2 digits
            format: Regex::new(r"^[A-Z][0-9]{2}(\.[0-9]{1,2})?$")
                .unwrap_or_else(|e| unreachable!("static regex: {e}")),
            descriptions: Self::default_descriptions(),
            specialized_care: Self::default_specialized_care(),
        }
    }

    /// Check the CIE-10-like structural format. Blank input is invalid.
    pub fn is_valid_format(&self, code: &str) -> bool {
        let code = code.trim();
        !code.is_empty() && self.format.is_match(code)
    }

    /// Look up the description for a code (trim + uppercase before lookup).
    pub fn description(&self, code: &str) -> Option<String> {
        self.descriptions.get(&normalize_code(code)).cloned()
    }

    /// Whether the code belongs to the fixed specialized-care set.
    ///
    /// Membership is tested on the code base (part before '.').
    pub fn requires_specialized_care(&self, code: &str) -> bool {
        self.specialized_care.contains(code_base(&normalize_code(code)))
    }

    /// Full validation: format issue plus catalog-membership issue, when
    /// applicable. An empty list means the code is fully valid.
    pub fn full_validation(&self, code: &str) -> Vec<ValidationError> {
        let mut issues = Vec::new();
        if !self.is_valid_format(code) {
            issues.push(ValidationError::Format(format!(
                "código diagnóstico '{}' no cumple el formato CIE-10",
                code.trim()
            )));
        }
        if self.description(code).is_none() {
            issues.push(ValidationError::CatalogLookup(normalize_code(code)));
        }
        issues
    }

    /// Nearest known code for an unknown one, if any is similar enough.
    ///
    /// Used to enrich unknown-code warnings with a suggestion.
    pub fn closest_known(&self, code: &str) -> Option<String> {
        let query = normalize_code(code);
        if query.is_empty() || self.descriptions.contains_key(&query) {
            return None;
        }
        self.descriptions
            .keys()
            .map(|k| (k, jaro_winkler(&query, k)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(k, _)| k.clone())
    }

    /// Default code descriptions.
    fn default_descriptions() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Cardiovascular
        map.insert("I10".into(), "Hipertensión esencial (primaria)".into());
        map.insert("I11".into(), "Enfermedad cardíaca hipertensiva".into());
        map.insert("I20".into(), "Angina de pecho".into());
        map.insert("I21".into(), "Infarto agudo de miocardio".into());
        map.insert("I25".into(), "Enfermedad isquémica crónica del corazón".into());
        map.insert("I50".into(), "Insuficiencia cardíaca".into());

        // Endocrine / metabolic
        map.insert("E10".into(), "Diabetes mellitus tipo 1".into());
        map.insert("E11".into(), "Diabetes mellitus tipo 2".into());
        map.insert("E11.9".into(), "Diabetes mellitus tipo 2 sin complicaciones".into());
        map.insert("E66".into(), "Obesidad".into());
        map.insert("E78".into(), "Trastornos del metabolismo de lipoproteínas".into());

        // Respiratory
        map.insert("J02".into(), "Faringitis aguda".into());
        map.insert("J03".into(), "Amigdalitis aguda".into());
        map.insert("J18".into(), "Neumonía, organismo no especificado".into());
        map.insert("J44".into(), "Enfermedad pulmonar obstructiva crónica".into());
        map.insert("J45".into(), "Asma".into());

        // Renal
        map.insert("N18".into(), "Enfermedad renal crónica".into());
        map.insert("N39".into(), "Infección de vías urinarias".into());

        // Mental health
        map.insert("F20".into(), "Esquizofrenia".into());
        map.insert("F31".into(), "Trastorno afectivo bipolar".into());
        map.insert("F32".into(), "Episodio depresivo".into());
        map.insert("F41".into(), "Trastornos de ansiedad".into());

        // Oncology
        map.insert("C50".into(), "Tumor maligno de la mama".into());
        map.insert("C61".into(), "Tumor maligno de la próstata".into());

        // Infectious
        map.insert("A90".into(), "Fiebre del dengue".into());
        map.insert("B20".into(), "Enfermedad por VIH".into());

        // Musculoskeletal / other
        map.insert("M54".into(), "Dorsalgia".into());
        map.insert("K29".into(), "Gastritis y duodenitis".into());
        map.insert("R50".into(), "Fiebre de origen desconocido".into());

        map
    }

    /// Code bases managed in specialized care.
    fn default_specialized_care() -> HashSet<String> {
        ["I21", "I50", "C50", "C61", "F20", "F31", "N18", "B20"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

/// Trim + uppercase, the canonical form for lookups.
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Part of the code before the '.'.
pub(crate) fn code_base(code: &str) -> &str {
    code.split('.').next().unwrap_or(code)
}
