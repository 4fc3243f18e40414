//! Dosage-by-age rule table.
//!
//! Doses arrive as free text ("500 mg") and frequencies as phrases
//! ("cada 8 horas"); both are parsed heuristically before being compared
//! against age-banded absolute and daily maxima.

use tracing::debug;

/// Maximum single dose and daily total, in mg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DosageLimit {
    pub max_single_mg: f64,
    pub max_daily_mg: f64,
}

/// Parse the numeric portion of a free-text dose, in mg.
///
/// Takes the first run of digits (with optional decimal part); everything
/// else in the string is ignored.
pub fn parse_dose_mg(dose: &str) -> Option<f64> {
    let mut number = String::new();
    let mut seen_digit = false;
    for c in dose.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            seen_digit = true;
        } else if (c == '.' || c == ',') && seen_digit && !number.contains('.') {
            number.push('.');
        } else if seen_digit {
            break;
        }
    }
    number.parse().ok()
}

/// Parse a frequency phrase ("cada N horas") into doses per day.
///
/// The hour count is parsed as a whole token, so "cada 48 horas" is an
/// unrecognized interval rather than a match on "cada 4".
pub fn doses_per_day(frequency: &str) -> Option<u32> {
    let lower = frequency.to_lowercase();
    if lower.contains("una vez al día") || lower.contains("una vez al dia") {
        return Some(1);
    }
    let rest = lower.split("cada").nth(1)?;
    let hours: u32 = rest.split_whitespace().next()?.parse().ok()?;
    match hours {
        4 => Some(6),
        6 => Some(4),
        8 => Some(3),
        12 => Some(2),
        24 => Some(1),
        _ => None,
    }
}

/// Drug families with age-banded dosage limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DosageFamily {
    Paracetamol,
    Ibuprofen,
    Antibiotic,
    Controlled,
}

/// Age-banded dosage maxima, dispatched by drug-name keyword.
pub struct DosageRuleTable;

impl Default for DosageRuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DosageRuleTable {
    pub fn new() -> Self {
        Self
    }

    /// Limit for a drug at a given age, or `None` when no table covers it.
    ///
    /// Returns an error string when the drug is forbidden outright at
    /// that age (ibuprofen under 6, controlled substances under 12).
    pub fn limit_for(&self, drug_name: &str, age_years: u32) -> Result<Option<DosageLimit>, String> {
        let family = match Self::classify(drug_name) {
            Some(f) => f,
            None => return Ok(None),
        };
        debug!(drug = %drug_name, age = age_years, ?family, "límite de dosis consultado");

        match family {
            DosageFamily::Paracetamol => Ok(Some(Self::paracetamol_limit(age_years))),
            DosageFamily::Ibuprofen => {
                if age_years < 6 {
                    Err("ibuprofeno contraindicado en menores de 6 años".to_string())
                } else {
                    Ok(Some(Self::ibuprofen_limit(age_years)))
                }
            }
            DosageFamily::Antibiotic => Ok(Some(Self::antibiotic_limit(age_years))),
            DosageFamily::Controlled => {
                if age_years < 12 {
                    Err("sustancia controlada contraindicada en menores de 12 años".to_string())
                } else {
                    Ok(Some(DosageLimit {
                        max_single_mg: 100.0,
                        max_daily_mg: 400.0,
                    }))
                }
            }
        }
    }

    fn classify(drug_name: &str) -> Option<DosageFamily> {
        let lower = drug_name.to_lowercase();
        if lower.contains("paracetamol") || lower.contains("acetaminof") {
            Some(DosageFamily::Paracetamol)
        } else if lower.contains("ibuprofeno") {
            Some(DosageFamily::Ibuprofen)
        } else if ["amoxicilina", "azitromicina", "cefalexina", "ciprofloxacino", "icilina"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Some(DosageFamily::Antibiotic)
        } else if ["tramadol", "morfina", "codeína", "codeina", "fentanilo"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Some(DosageFamily::Controlled)
        } else {
            None
        }
    }

    fn paracetamol_limit(age: u32) -> DosageLimit {
        match age {
            0..=1 => DosageLimit { max_single_mg: 120.0, max_daily_mg: 480.0 },
            2..=5 => DosageLimit { max_single_mg: 250.0, max_daily_mg: 1000.0 },
            6..=11 => DosageLimit { max_single_mg: 500.0, max_daily_mg: 2000.0 },
            _ => DosageLimit { max_single_mg: 1000.0, max_daily_mg: 4000.0 },
        }
    }

    fn ibuprofen_limit(age: u32) -> DosageLimit {
        match age {
            6..=11 => DosageLimit { max_single_mg: 200.0, max_daily_mg: 800.0 },
            _ => DosageLimit { max_single_mg: 800.0, max_daily_mg: 3200.0 },
        }
    }

    fn antibiotic_limit(age: u32) -> DosageLimit {
        if age < 12 {
            DosageLimit { max_single_mg: 500.0, max_daily_mg: 2000.0 }
        } else {
            DosageLimit { max_single_mg: 2000.0, max_daily_mg: 6000.0 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dose_takes_first_number() {
        assert_eq!(parse_dose_mg("500 mg"), Some(500.0));
        assert_eq!(parse_dose_mg("2000mg"), Some(2000.0));
        assert_eq!(parse_dose_mg("1 tableta de 500"), Some(1.0));
        assert_eq!(parse_dose_mg("2.5 mg"), Some(2.5));
        assert_eq!(parse_dose_mg("2,5 mg"), Some(2.5));
        assert_eq!(parse_dose_mg("una tableta"), None);
    }

    #[test]
    fn test_doses_per_day_keywords() {
        assert_eq!(doses_per_day("cada 4 horas"), Some(6));
        assert_eq!(doses_per_day("cada 6 horas"), Some(4));
        assert_eq!(doses_per_day("Cada 8 horas"), Some(3));
        assert_eq!(doses_per_day("cada 12 horas"), Some(2));
        assert_eq!(doses_per_day("cada 24 horas"), Some(1));
        assert_eq!(doses_per_day("una vez al día"), Some(1));
        assert_eq!(doses_per_day("según necesidad"), None);
    }

    #[test]
    fn test_multi_day_intervals_are_not_misread() {
        // "cada 48 horas" must not parse as "cada 4"
        assert_eq!(doses_per_day("cada 48 horas"), None);
        assert_eq!(doses_per_day("cada 72 horas"), None);
    }

    #[test]
    fn test_adult_paracetamol_limit() {
        let table = DosageRuleTable::new();
        let limit = table.limit_for("Paracetamol", 35).unwrap().unwrap();
        assert_eq!(limit.max_single_mg, 1000.0);
        assert_eq!(limit.max_daily_mg, 4000.0);
    }

    #[test]
    fn test_pediatric_paracetamol_bands() {
        let table = DosageRuleTable::new();
        assert_eq!(table.limit_for("paracetamol", 1).unwrap().unwrap().max_single_mg, 120.0);
        assert_eq!(table.limit_for("paracetamol", 4).unwrap().unwrap().max_single_mg, 250.0);
        assert_eq!(table.limit_for("paracetamol", 10).unwrap().unwrap().max_single_mg, 500.0);
        assert_eq!(table.limit_for("paracetamol", 12).unwrap().unwrap().max_single_mg, 1000.0);
    }

    #[test]
    fn test_ibuprofen_forbidden_under_six() {
        let table = DosageRuleTable::new();
        assert!(table.limit_for("Ibuprofeno", 4).is_err());
        assert!(table.limit_for("Ibuprofeno", 6).is_ok());
    }

    #[test]
    fn test_controlled_forbidden_under_twelve() {
        let table = DosageRuleTable::new();
        assert!(table.limit_for("Tramadol", 10).is_err());
        let limit = table.limit_for("Tramadol", 30).unwrap().unwrap();
        assert_eq!(limit.max_daily_mg, 400.0);
    }

    #[test]
    fn test_unknown_drug_has_no_limit() {
        let table = DosageRuleTable::new();
        assert_eq!(table.limit_for("Loratadina", 30).unwrap(), None);
    }
}
