//! Patient context needed by the age- and sex-dependent rules.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Patient sex as registered on the encounter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatientSex {
    Femenino,
    Masculino,
}

/// The slice of patient data the validators need.
///
/// The full patient record lives with the external encounter owner; only
/// birth date and sex reach this engine (dosage bands, contraindications).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientProfile {
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Registered sex
    pub sex: PatientSex,
}

impl PatientProfile {
    pub fn new(birth_date: NaiveDate, sex: PatientSex) -> Self {
        Self { birth_date, sex }
    }

    /// Completed years of age as of today.
    pub fn age_years(&self) -> u32 {
        age_in_years(self.birth_date, Utc::now().date_naive())
    }

    /// Completed years of age as of a reference date (deterministic for tests).
    pub fn age_years_at(&self, on: NaiveDate) -> u32 {
        age_in_years(self.birth_date, on)
    }
}

/// Completed years between `birth` and `on`.
pub fn age_in_years(birth: NaiveDate, on: NaiveDate) -> u32 {
    if on < birth {
        return 0;
    }
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}
