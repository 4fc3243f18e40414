//! Vital-sign readings with plausibility bounds.

use serde::{Deserialize, Serialize};

use crate::{ValidationError, ValidationResult};

/// One set of vital-sign readings for an encounter.
///
/// All readings are optional; a missing reading is "not recorded", which
/// the classifier treats differently from a malformed one. Construction
/// through [`VitalSigns::new`] rejects values outside clinically
/// plausible bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VitalSigns {
    /// Blood pressure as "systolic/diastolic" (e.g. "120/80")
    pub blood_pressure: Option<String>,
    /// Heart rate in beats per minute
    pub heart_rate: Option<f64>,
    /// Respiratory rate in breaths per minute
    pub respiratory_rate: Option<f64>,
    /// Body temperature in °C
    pub temperature: Option<f64>,
    /// Oxygen saturation in percent
    pub oxygen_saturation: Option<f64>,
}

impl VitalSigns {
    /// Create a bounds-checked set of readings.
    pub fn new(
        blood_pressure: Option<String>,
        heart_rate: Option<f64>,
        respiratory_rate: Option<f64>,
        temperature: Option<f64>,
        oxygen_saturation: Option<f64>,
    ) -> ValidationResult<Self> {
        check_bounds("frecuencia cardíaca", heart_rate, 30.0, 200.0)?;
        check_bounds("frecuencia respiratoria", respiratory_rate, 5.0, 60.0)?;
        check_bounds("temperatura", temperature, 30.0, 45.0)?;
        check_bounds("saturación de oxígeno", oxygen_saturation, 50.0, 100.0)?;

        Ok(Self {
            blood_pressure,
            heart_rate,
            respiratory_rate,
            temperature,
            oxygen_saturation,
        })
    }

    /// Whether any reading was recorded at all.
    pub fn has_any_reading(&self) -> bool {
        self.blood_pressure.is_some()
            || self.heart_rate.is_some()
            || self.respiratory_rate.is_some()
            || self.temperature.is_some()
            || self.oxygen_saturation.is_some()
    }
}

fn check_bounds(label: &str, value: Option<f64>, min: f64, max: f64) -> ValidationResult<()> {
    if let Some(v) = value {
        if !(min..=max).contains(&v) {
            return Err(ValidationError::Format(format!(
                "{} fuera de rango plausible ({}-{}): {}",
                label, min, max, v
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_readings_accepted() {
        let vs = VitalSigns::new(Some("120/80".into()), Some(72.0), Some(16.0), Some(36.6), Some(98.0));
        assert!(vs.is_ok());
        assert!(vs.unwrap().has_any_reading());
    }

    #[test]
    fn test_implausible_heart_rate_rejected() {
        let vs = VitalSigns::new(None, Some(250.0), None, None, None);
        assert!(matches!(vs, Err(ValidationError::Format(_))));
    }

    #[test]
    fn test_implausible_temperature_rejected() {
        let vs = VitalSigns::new(None, None, None, Some(50.0), None);
        assert!(matches!(vs, Err(ValidationError::Format(_))));
    }

    #[test]
    fn test_empty_readings_are_valid() {
        let vs = VitalSigns::new(None, None, None, None, None).unwrap();
        assert!(!vs.has_any_reading());
    }
}
