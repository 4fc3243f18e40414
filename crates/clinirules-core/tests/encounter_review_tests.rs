//! End-to-end scenarios for the validation engine.
//!
//! Each case exercises the public API the way the encounter command
//! handler would: build the entities, run the validator, assert on the
//! structured outcome.

use chrono::NaiveDate;

use clinirules_core::{
    CodeCatalog, Diagnosis, DiagnosisType, DrugInteractionGraph, Encounter,
    EncounterCoherenceValidator, Interconsultation, PatientProfile, PatientSex, Prescription,
    PrescriptionValidator, Priority, Severity, ValidationError, VitalSigns,
    VitalSignsClassifier,
};

fn adult_male() -> PatientProfile {
    PatientProfile::new(
        NaiveDate::from_ymd_opt(1985, 3, 20).unwrap(),
        PatientSex::Masculino,
    )
}

fn hypertension_dx() -> Diagnosis {
    let mut dx = Diagnosis::new("I10", "Hipertensión esencial", DiagnosisType::Principal);
    dx.severity = Some(Severity::Moderado);
    dx.is_chronic = Some(true);
    dx.requires_follow_up = Some(true);
    dx.follow_up_months = Some(6);
    dx.follow_up_plan = Some("Control de presión arterial mensual".into());
    dx
}

#[test]
fn scenario_i10_format_valid_but_not_specialized() {
    let catalog = CodeCatalog::new();
    assert!(catalog.is_valid_format("I10"));
    assert!(!catalog.requires_specialized_care("I10"));
}

#[test]
fn scenario_adult_paracetamol_overdose() {
    let validator = PrescriptionValidator::new();
    let prescription = Prescription::new("Paracetamol", "2000 mg", "cada 4 horas", 5);
    let err = validator
        .validate_at_age(&prescription, &[], PatientSex::Masculino, 40)
        .unwrap_err();
    assert!(matches!(err, ValidationError::RuleTable(_)));
}

#[test]
fn scenario_warfarina_aspirina_interaction() {
    let graph = DrugInteractionGraph::new();
    let found = graph.interactions_for("Aspirina 100 mg", &["Warfarina 5 mg".to_string()]);
    assert!(!found.is_empty());
    let description = found[0].to_lowercase();
    assert!(description.contains("warfarina"));
    assert!(description.contains("aspirina"));
}

#[test]
fn scenario_infarction_without_referral_rejected() {
    let validator = EncounterCoherenceValidator::new();
    let mut enc = Encounter::new();

    let mut dx = Diagnosis::new("I21", "Infarto agudo de miocardio", DiagnosisType::Principal);
    dx.severity = Some(Severity::Severo);
    dx.clinical_manifestations.push("Dolor torácico opresivo".into());
    dx.is_chronic = Some(true);
    dx.requires_follow_up = Some(true);
    dx.follow_up_months = Some(1);
    dx.follow_up_plan = Some("Control post-infarto".into());
    dx.requires_interconsultation = Some(false);
    enc.diagnoses.push(dx);

    let review = validator.review(&enc, &adult_male());
    assert!(!review.is_acceptable());
    assert!(review.errors.iter().any(|e| {
        matches!(e, ValidationError::RuleTable(_))
            && e.to_string().contains("interconsulta obligatoria")
    }));
}

#[test]
fn scenario_hypertensive_crisis_suggests_urgent_cardiology() {
    let classifier = VitalSignsClassifier::new();
    assert_eq!(
        classifier.classify_blood_pressure(200.0, 120.0),
        clinirules_core::BloodPressureCategory::HypertensiveCrisis
    );

    let signs = VitalSigns {
        blood_pressure: Some("200/120".into()),
        ..VitalSigns::default()
    };
    assert!(classifier.requires_urgent_care(&signs));

    let validator = EncounterCoherenceValidator::new();
    let mut enc = Encounter::new();
    enc.diagnoses.push(hypertension_dx());
    enc.vital_signs = Some(signs);

    let review = validator.review(&enc, &adult_male());
    let suggestion = review
        .suggested_interconsultations
        .iter()
        .find(|s| s.specialty == "CARDIOLOGÍA")
        .expect("expected a cardiology suggestion");
    assert_eq!(suggestion.priority, Priority::Urgente);
}

#[test]
fn scenario_schizophrenia_referred_to_oncology_rejected() {
    let validator = EncounterCoherenceValidator::new();
    let mut enc = Encounter::new();

    let mut dx = Diagnosis::new("F20", "Esquizofrenia", DiagnosisType::Principal);
    dx.severity = Some(Severity::Severo);
    dx.clinical_manifestations.push("Alucinaciones auditivas".into());
    dx.requires_interconsultation = Some(true);
    dx.recommended_specialty = Some("PSIQUIATRÍA".into());
    enc.diagnoses.push(dx);

    let mut referral = Interconsultation::new("ONCOLOGÍA", "Evaluación", Priority::Alta);
    referral.related_diagnosis_code = Some("F20".into());
    referral.exams_performed = Some("Ninguno".into());
    referral.relevant_findings = Some("Síntomas psicóticos".into());
    enc.interconsultations.push(referral);

    let review = validator.review(&enc, &adult_male());
    assert!(review
        .errors
        .iter()
        .any(|e| e.to_string().contains("no es adecuada")));
}

#[test]
fn full_encounter_review_happy_path() {
    let validator = EncounterCoherenceValidator::new();
    let mut enc = Encounter::new();
    enc.diagnoses.push(hypertension_dx());
    enc.prescriptions
        .push(Prescription::new("Enalapril", "10 mg", "cada 12 horas", 30));
    enc.vital_signs = Some(VitalSigns {
        blood_pressure: Some("118/76".into()),
        heart_rate: Some(72.0),
        temperature: Some(36.7),
        oxygen_saturation: Some(98.0),
        ..VitalSigns::default()
    });

    let review = validator.review(&enc, &adult_male());
    assert!(review.is_acceptable(), "unexpected errors: {:?}", review.errors);
    // Warnings never block; the review still serializes for the handler
    let json = review.to_json().unwrap();
    assert!(json.contains("errors"));
}

#[test]
fn warnings_do_not_block_acceptance() {
    let validator = EncounterCoherenceValidator::new();
    let mut enc = Encounter::new();
    enc.diagnoses.push(hypertension_dx());
    // No prescription: coverage warning, no error

    let review = validator.review(&enc, &adult_male());
    assert!(review.is_acceptable());
    assert!(!review.warnings.is_empty());
}

#[test]
fn pediatric_aspirin_blocked_in_full_review() {
    let validator = EncounterCoherenceValidator::new();
    let child = PatientProfile::new(
        NaiveDate::from_ymd_opt(2019, 7, 1).unwrap(),
        PatientSex::Femenino,
    );

    let mut enc = Encounter::new();
    let mut dx = Diagnosis::new("J02", "Faringitis aguda", DiagnosisType::Principal);
    dx.severity = Some(Severity::Leve);
    enc.diagnoses.push(dx);
    enc.prescriptions
        .push(Prescription::new("Aspirina", "100 mg", "cada 8 horas", 3));

    let review = validator.review(&enc, &child);
    assert!(review.errors.iter().any(|e| {
        matches!(e, ValidationError::Contraindication(_)) && e.to_string().contains("Reye")
    }));
}
