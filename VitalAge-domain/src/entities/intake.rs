use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One raw answer from the questionnaire.
///
/// Browsers post everything as text, JSON clients may send numbers or
/// booleans; all three shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    /// Numeric answer
    Number(f64),
    /// Checkbox answer
    Flag(bool),
    /// Free text answer
    Text(String),
}

impl FormValue {
    /// Whether the answer was left empty
    pub fn is_blank(&self) -> bool {
        matches!(self, FormValue::Text(text) if text.trim().is_empty())
    }

    /// Interpret the answer as a number. Yes/no answers become 1/0; blank
    /// or unparseable text yields `None`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) => Some(*n),
            FormValue::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            FormValue::Text(text) => {
                let text = text.trim();
                match text.to_ascii_lowercase().as_str() {
                    "" => None,
                    "yes" | "y" | "true" | "on" => Some(1.0),
                    "no" | "n" | "false" | "off" => Some(0.0),
                    _ => text.parse::<f64>().ok(),
                }
            }
        }
    }
}

/// Lifestyle section of the questionnaire
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LifestyleForm {
    /// Days per week with at least 30 minutes of activity
    #[validate(range(min = 0.0, max = 7.0, message = "Exercise days must be between 0 and 7"))]
    pub exercise_days_per_week: Option<f64>,

    /// Self-rated diet quality
    #[validate(range(min = 1, max = 5, message = "Diet quality must be between 1 and 5"))]
    pub diet_quality: Option<u8>,

    /// Alcoholic drinks per week
    #[validate(range(min = 0.0, max = 200.0, message = "Alcohol intake must be between 0 and 200 drinks per week"))]
    pub alcohol_drinks_per_week: Option<f64>,

    /// Completed years of education
    #[validate(range(min = 0.0, max = 30.0, message = "Education must be between 0 and 30 years"))]
    pub education_years: Option<f64>,

    #[serde(default)]
    pub family_history_diabetes: bool,

    #[serde(default)]
    pub family_history_cancer: bool,

    #[serde(default)]
    pub family_history_stroke: bool,
}

/// A submitted assessment questionnaire
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssessmentForm {
    /// Date of birth
    pub date_of_birth: NaiveDate,

    /// Date of the assessment. Defaults to today (UTC) if not provided.
    pub assessment_date: Option<NaiveDate>,

    /// Gender as entered
    pub gender: String,

    /// Height in centimetres
    #[validate(range(min = 50.0, max = 250.0, message = "Height must be between 50 and 250 cm"))]
    pub height_cm: f64,

    /// Weight in kilograms
    #[validate(range(min = 20.0, max = 400.0, message = "Weight must be between 20 and 400 kg"))]
    pub weight_kg: f64,

    /// Systolic blood pressure (the higher number)
    #[validate(range(min = 60.0, max = 260.0, message = "Systolic must be between 60 and 260"))]
    pub systolic_bp: Option<f64>,

    /// Diastolic blood pressure (the lower number)
    #[validate(range(min = 30.0, max = 160.0, message = "Diastolic must be between 30 and 160"))]
    pub diastolic_bp: Option<f64>,

    /// Laboratory results keyed by biomarker name
    #[serde(default)]
    pub biomarkers: HashMap<String, Option<FormValue>>,

    /// Lifestyle answers
    #[serde(default)]
    pub lifestyle: LifestyleForm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_value_parsing() {
        assert_eq!(FormValue::Number(5.5).to_number(), Some(5.5));
        assert_eq!(FormValue::Flag(true).to_number(), Some(1.0));
        assert_eq!(FormValue::Text(" 126 ".to_string()).to_number(), Some(126.0));
        assert_eq!(FormValue::Text("Yes".to_string()).to_number(), Some(1.0));
        assert_eq!(FormValue::Text("off".to_string()).to_number(), Some(0.0));
        assert_eq!(FormValue::Text("".to_string()).to_number(), None);
        assert_eq!(FormValue::Text("n/a".to_string()).to_number(), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(FormValue::Text("   ".to_string()).is_blank());
        assert!(!FormValue::Text("n/a".to_string()).is_blank());
        assert!(!FormValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_form_deserializes_mixed_values() {
        let json = r#"{
            "date_of_birth": "1970-05-01",
            "gender": "female",
            "height_cm": 165,
            "weight_kg": 62,
            "biomarkers": { "glucose": "98", "smoking": false, "hba1c": 5.4, "insulin": null, "ldl": "" }
        }"#;

        let form: AssessmentForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.biomarkers.len(), 5);
        assert_eq!(form.biomarkers["glucose"].as_ref().unwrap().to_number(), Some(98.0));
        assert_eq!(form.biomarkers["smoking"].as_ref().unwrap().to_number(), Some(0.0));
        assert!(form.biomarkers["insulin"].is_none());
        assert!(form.biomarkers["ldl"].as_ref().unwrap().is_blank());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_form_validation_ranges() {
        let json = r#"{ "date_of_birth": "1970-05-01", "gender": "male", "height_cm": 20, "weight_kg": 70 }"#;
        let form: AssessmentForm = serde_json::from_str(json).unwrap();
        assert!(form.validate().is_err());

        let lifestyle = LifestyleForm { diet_quality: Some(9), ..Default::default() };
        assert!(lifestyle.validate().is_err());
    }
}
