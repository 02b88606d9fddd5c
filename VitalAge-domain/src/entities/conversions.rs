use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

use crate::entities::intake::{AssessmentForm, LifestyleForm};
use crate::entities::patient::{Biomarker, BiomarkerPanel, Gender, Lifestyle, PatientData};

/// Conversion functions from the raw questionnaire to scoring inputs.
/// These follow the pattern convert_[source]_to_[target].

/// Errors raised while turning a questionnaire into a patient record
#[derive(Debug, Error)]
pub enum IntakeError {
    /// A field is outside its accepted range
    #[error("Validation error: {0}")]
    Validation(String),

    /// The gender answer is not recognised
    #[error("Invalid gender: {0}")]
    InvalidGender(String),

    /// The date of birth is after the assessment date
    #[error("Date of birth {0} is after the assessment date")]
    BirthDateInFuture(NaiveDate),
}

/// Render validator errors as one message, ordered by field name
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| {
                    if let Some(msg) = &err.message {
                        msg.to_string()
                    } else {
                        format!("Invalid {}", field)
                    }
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

/// Whole years between the date of birth and the assessment date, capped at 120
pub fn age_on(date_of_birth: NaiveDate, assessed_on: NaiveDate) -> Result<u32, IntakeError> {
    assessed_on
        .years_since(date_of_birth)
        .map(|years| years.min(120))
        .ok_or(IntakeError::BirthDateInFuture(date_of_birth))
}

/// Build the biomarker panel from the free-form biomarker answers.
///
/// Unknown names are ignored; blank answers are absent; unparseable
/// answers are absent and logged.
pub fn convert_form_to_panel(form: &AssessmentForm) -> BiomarkerPanel {
    let mut entries: Vec<_> = form.biomarkers.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut panel = BiomarkerPanel::new();
    for (name, answer) in entries {
        let marker = match name.parse::<Biomarker>() {
            Ok(marker) => marker,
            Err(_) => {
                debug!(field = %name, "Ignoring unknown biomarker field");
                continue;
            }
        };

        let Some(answer) = answer else { continue };
        match answer.to_number() {
            Some(value) => {
                panel.set(marker, value);
            }
            None if answer.is_blank() => {}
            None => warn!(biomarker = %marker, "Discarding unparseable biomarker answer"),
        }
    }
    panel
}

/// Convert the lifestyle section
pub fn convert_form_to_lifestyle(form: &LifestyleForm) -> Lifestyle {
    Lifestyle {
        exercise_days_per_week: form.exercise_days_per_week,
        diet_quality: form.diet_quality,
        alcohol_drinks_per_week: form.alcohol_drinks_per_week,
        education_years: form.education_years,
        family_history_diabetes: form.family_history_diabetes,
        family_history_cancer: form.family_history_cancer,
        family_history_stroke: form.family_history_stroke,
    }
}

/// Validate a questionnaire and convert it into the scoring inputs
pub fn convert_form_to_patient(form: &AssessmentForm) -> Result<(PatientData, Lifestyle), IntakeError> {
    form.validate()
        .map_err(|e| IntakeError::Validation(describe_validation_errors(&e)))?;
    form.lifestyle
        .validate()
        .map_err(|e| IntakeError::Validation(describe_validation_errors(&e)))?;

    let gender = form
        .gender
        .parse::<Gender>()
        .map_err(|_| IntakeError::InvalidGender(form.gender.clone()))?;

    let assessed_on = form.assessment_date.unwrap_or_else(|| Utc::now().date_naive());
    let age = age_on(form.date_of_birth, assessed_on)?;

    let patient = PatientData {
        age,
        gender,
        height_cm: form.height_cm,
        weight_kg: form.weight_kg,
        systolic_bp: form.systolic_bp,
        diastolic_bp: form.diastolic_bp,
        biomarkers: convert_form_to_panel(form),
    };

    Ok((patient, convert_form_to_lifestyle(&form.lifestyle)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::intake::FormValue;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_form() -> AssessmentForm {
        let mut biomarkers = HashMap::new();
        biomarkers.insert("glucose".to_string(), Some(FormValue::Text("104".to_string())));
        biomarkers.insert("smoking".to_string(), Some(FormValue::Text("no".to_string())));
        biomarkers.insert("ldl_cholesterol".to_string(), Some(FormValue::Text("".to_string())));
        biomarkers.insert("hba1c".to_string(), Some(FormValue::Text("pending".to_string())));
        biomarkers.insert("vitamin_d".to_string(), Some(FormValue::Number(30.0)));
        biomarkers.insert("crp".to_string(), Some(FormValue::Number(1.2)));
        biomarkers.insert("insulin".to_string(), None);

        AssessmentForm {
            date_of_birth: date(1970, 6, 15),
            assessment_date: Some(date(2024, 6, 14)),
            gender: "Female".to_string(),
            height_cm: 168.0,
            weight_kg: 64.0,
            systolic_bp: Some(122.0),
            diastolic_bp: Some(78.0),
            biomarkers,
            lifestyle: LifestyleForm {
                exercise_days_per_week: Some(4.0),
                family_history_diabetes: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        assert_eq!(age_on(date(1970, 6, 15), date(2024, 6, 14)).unwrap(), 53);
        assert_eq!(age_on(date(1970, 6, 15), date(2024, 6, 15)).unwrap(), 54);
        assert!(matches!(
            age_on(date(2030, 1, 1), date(2024, 1, 1)),
            Err(IntakeError::BirthDateInFuture(_))
        ));
    }

    #[test]
    fn test_convert_form_to_patient() {
        let (patient, lifestyle) = convert_form_to_patient(&create_test_form()).unwrap();

        assert_eq!(patient.age, 53);
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.systolic_bp, Some(122.0));
        assert_eq!(patient.biomarkers.get(Biomarker::Glucose), Some(104.0));
        assert_eq!(patient.biomarkers.get(Biomarker::Smoking), Some(0.0));
        assert_eq!(patient.biomarkers.get(Biomarker::CReactiveProtein), Some(1.2));
        assert!(!patient.biomarkers.contains(Biomarker::LdlCholesterol));
        assert!(!patient.biomarkers.contains(Biomarker::Hba1c));
        assert!(!patient.biomarkers.contains(Biomarker::Insulin));
        assert_eq!(patient.biomarkers.present_count(), 3);

        assert_eq!(lifestyle.exercise_days_per_week, Some(4.0));
        assert!(lifestyle.family_history_diabetes);
    }

    #[test]
    fn test_convert_rejects_unknown_gender() {
        let mut form = create_test_form();
        form.gender = "robot".to_string();
        let result = convert_form_to_patient(&form);
        assert!(matches!(result, Err(IntakeError::InvalidGender(_))));
    }

    #[test]
    fn test_convert_rejects_out_of_range_vitals() {
        let mut form = create_test_form();
        form.systolic_bp = Some(400.0);
        let error = convert_form_to_patient(&form).unwrap_err().to_string();
        assert!(error.contains("Systolic"), "unexpected message: {}", error);
    }

    #[test]
    fn test_convert_rejects_invalid_lifestyle() {
        let mut form = create_test_form();
        form.lifestyle.exercise_days_per_week = Some(9.0);
        assert!(matches!(convert_form_to_patient(&form), Err(IntakeError::Validation(_))));
    }
}
