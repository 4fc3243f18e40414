//! Vital-sign classification and triage.
//!
//! Pure functions over one set of readings: blood-pressure category,
//! urgent-care flag, ordered textual alerts, and age-banded normal-range
//! checks.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{age_in_years, VitalSigns};

/// Blood-pressure classification.
///
/// `InvalidFormat` (unparseable reading) is distinct from `NotRecorded`
/// (no reading at all).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BloodPressureCategory {
    Hypotension,
    Normal,
    Elevated,
    Stage1,
    Stage2,
    HypertensiveCrisis,
    InvalidFormat,
    NotRecorded,
}

/// Stateless classifier over vital-sign readings.
pub struct VitalSignsClassifier;

impl Default for VitalSignsClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl VitalSignsClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Parse a "systolic/diastolic" reading.
    pub fn parse_blood_pressure(text: &str) -> Option<(f64, f64)> {
        let mut parts = text.trim().split('/');
        let sys = parts.next()?.trim().parse().ok()?;
        let dia = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some((sys, dia))
    }

    /// Classify numeric readings with the ordered thresholds.
    pub fn classify_blood_pressure(&self, systolic: f64, diastolic: f64) -> BloodPressureCategory {
        if diastolic < 60.0 || systolic < 90.0 {
            BloodPressureCategory::Hypotension
        } else if systolic < 120.0 && diastolic < 80.0 {
            BloodPressureCategory::Normal
        } else if systolic < 130.0 && diastolic < 80.0 {
            BloodPressureCategory::Elevated
        } else if systolic < 140.0 || diastolic < 90.0 {
            BloodPressureCategory::Stage1
        } else if systolic < 180.0 || diastolic < 120.0 {
            BloodPressureCategory::Stage2
        } else {
            BloodPressureCategory::HypertensiveCrisis
        }
    }

    /// Classify the textual reading of a vital-signs record.
    pub fn classify_pressure_text(&self, blood_pressure: Option<&str>) -> BloodPressureCategory {
        match blood_pressure {
            None => BloodPressureCategory::NotRecorded,
            Some(text) if text.trim().is_empty() => BloodPressureCategory::NotRecorded,
            Some(text) => match Self::parse_blood_pressure(text) {
                Some((sys, dia)) => self.classify_blood_pressure(sys, dia),
                None => BloodPressureCategory::InvalidFormat,
            },
        }
    }

    /// Whether the readings demand urgent care.
    pub fn requires_urgent_care(&self, signs: &VitalSigns) -> bool {
        let category = self.classify_pressure_text(signs.blood_pressure.as_deref());
        if category == BloodPressureCategory::HypertensiveCrisis {
            return true;
        }
        if let Some(spo2) = signs.oxygen_saturation {
            if spo2 < 90.0 {
                return true;
            }
        }
        if let Some((sys, _)) = signs
            .blood_pressure
            .as_deref()
            .and_then(Self::parse_blood_pressure)
        {
            if sys < 90.0 {
                return true;
            }
        }
        if let Some(temp) = signs.temperature {
            if !(35.0..=40.0).contains(&temp) {
                return true;
            }
        }
        false
    }

    /// Ordered, de-duplicated textual alerts: pressure first, then
    /// oxygen saturation, temperature, and heart rate.
    pub fn collect_alerts(&self, signs: &VitalSigns) -> Vec<String> {
        let mut alerts: Vec<String> = Vec::new();
        let mut push = |alert: String| {
            if !alerts.contains(&alert) {
                alerts.push(alert);
            }
        };

        match self.classify_pressure_text(signs.blood_pressure.as_deref()) {
            BloodPressureCategory::HypertensiveCrisis => {
                warn!("crisis hipertensiva detectada");
                push("Crisis hipertensiva: requiere atención inmediata".to_string());
            }
            BloodPressureCategory::Hypotension => {
                push("Hipotensión: presión por debajo del umbral seguro".to_string());
            }
            BloodPressureCategory::InvalidFormat => {
                push("Registro de presión arterial ilegible".to_string());
            }
            _ => {}
        }

        if let Some(spo2) = signs.oxygen_saturation {
            if spo2 < 90.0 {
                warn!(spo2, "hipoxemia detectada");
                push("Hipoxemia: saturación de oxígeno menor a 90%".to_string());
            }
        }

        if let Some(temp) = signs.temperature {
            if temp < 35.0 {
                push("Hipotermia: temperatura menor a 35°C".to_string());
            } else if temp > 40.0 {
                push("Hipertermia severa: temperatura mayor a 40°C".to_string());
            } else if temp > 38.0 {
                push("Fiebre".to_string());
            }
        }

        if let Some(hr) = signs.heart_rate {
            if hr > 100.0 {
                push("Taquicardia".to_string());
            } else if hr < 60.0 {
                push("Bradicardia".to_string());
            }
        }

        alerts
    }

    /// Age-banded normal-range check against today's date.
    pub fn validate_for_age(&self, signs: &VitalSigns, birth_date: NaiveDate) -> Vec<String> {
        self.validate_for_age_at(signs, birth_date, Utc::now().date_naive())
    }

    /// Age-banded normal-range check against a reference date
    /// (deterministic for tests).
    pub fn validate_for_age_at(
        &self,
        signs: &VitalSigns,
        birth_date: NaiveDate,
        on: NaiveDate,
    ) -> Vec<String> {
        let age = age_in_years(birth_date, on);
        let mut findings = Vec::new();

        if age < 1 {
            if let Some(hr) = signs.heart_rate {
                if !(100.0..=160.0).contains(&hr) {
                    findings.push(format!(
                        "Frecuencia cardíaca fuera de rango para lactante (100-160): {}",
                        hr
                    ));
                }
            }
            if let Some(rr) = signs.respiratory_rate {
                if !(30.0..=60.0).contains(&rr) {
                    findings.push(format!(
                        "Frecuencia respiratoria fuera de rango para lactante (30-60): {}",
                        rr
                    ));
                }
            }
        } else if age < 12 {
            // Pediatric band narrows with age
            let min_hr = (90 - 2 * age as i64) as f64;
            let max_hr = (120 - age as i64) as f64;
            if let Some(hr) = signs.heart_rate {
                if hr < min_hr || hr > max_hr {
                    findings.push(format!(
                        "Frecuencia cardíaca fuera de rango pediátrico ({}-{}): {}",
                        min_hr, max_hr, hr
                    ));
                }
            }
        } else if age < 65 {
            findings.extend(self.adult_range_findings(signs, 140.0, 60.0));
        } else {
            // Widened systolic threshold and lower bradycardia floor
            findings.extend(self.adult_range_findings(signs, 150.0, 50.0));
        }

        findings
    }

    fn adult_range_findings(
        &self,
        signs: &VitalSigns,
        systolic_limit: f64,
        bradycardia_limit: f64,
    ) -> Vec<String> {
        let mut findings = Vec::new();

        if let Some((sys, dia)) = signs
            .blood_pressure
            .as_deref()
            .and_then(Self::parse_blood_pressure)
        {
            if sys >= systolic_limit || dia >= 90.0 {
                findings.push(format!("Hipertensión: {}/{}", sys, dia));
            } else if sys < 90.0 {
                findings.push(format!("Hipotensión: {}/{}", sys, dia));
            }
        }

        if let Some(temp) = signs.temperature {
            if temp >= 38.0 {
                findings.push(format!("Fiebre: {}°C", temp));
            }
        }

        if let Some(hr) = signs.heart_rate {
            if hr > 100.0 {
                findings.push(format!("Taquicardia: {} lpm", hr));
            } else if hr < bradycardia_limit {
                findings.push(format!("Bradicardia: {} lpm", hr));
            }
        }

        if let Some(spo2) = signs.oxygen_saturation {
            if spo2 < 95.0 {
                findings.push(format!("Saturación de oxígeno baja: {}%", spo2));
            }
        }

        findings
    }
}
