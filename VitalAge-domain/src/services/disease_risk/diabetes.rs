use crate::entities::patient::{Biomarker, ClinicalSex, Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment, RiskLevel};
use crate::services::disease_risk::{band_for, has_treated_hypertension, RiskScorer, ScoreBand};

const REFERENCE: &str = "Lindström J, Tuomilehto J. The Diabetes Risk Score. Diabetes Care 2003;26(3):725-731";

/// FINDRISC point totals to ten-year type 2 diabetes risk
static FINDRISC_BANDS: [ScoreBand; 5] = [
    ScoreBand { below: 7.0, ten_year_risk: 1.0, level: RiskLevel::Low },
    ScoreBand { below: 12.0, ten_year_risk: 4.0, level: RiskLevel::Moderate },
    ScoreBand { below: 15.0, ten_year_risk: 17.0, level: RiskLevel::High },
    ScoreBand { below: 21.0, ten_year_risk: 33.0, level: RiskLevel::VeryHigh },
    ScoreBand { below: f64::INFINITY, ten_year_risk: 50.0, level: RiskLevel::VeryHigh },
];

/// Waist circumference tiers (cm) scoring +3 and +4
fn waist_thresholds(sex: ClinicalSex) -> (f64, f64) {
    match sex {
        ClinicalSex::Male => (94.0, 102.0),
        ClinicalSex::Female => (80.0, 88.0),
    }
}

/// FINDRISC points for a patient
pub fn findrisc_points(patient: &PatientData, lifestyle: &Lifestyle) -> u32 {
    let panel = &patient.biomarkers;
    let mut points = 0;

    points += match patient.age {
        0..=44 => 0,
        45..=54 => 2,
        55..=64 => 3,
        _ => 4,
    };

    if let Some(bmi) = patient.bmi() {
        if bmi >= 30.0 {
            points += 3;
        } else if bmi >= 25.0 {
            points += 1;
        }
    }

    if let Some(waist) = panel.get(Biomarker::WaistCircumference) {
        let (lower, upper) = waist_thresholds(patient.clinical_sex());
        if waist > upper {
            points += 4;
        } else if waist >= lower {
            points += 3;
        }
    }

    if lifestyle.is_less_active_than(3.0) {
        points += 2;
    }
    if lifestyle.has_poor_diet() {
        points += 1;
    }

    // Glucose and HbA1c are scored independently
    if panel.get(Biomarker::Glucose).map_or(false, |g| g > 100.0) {
        points += 5;
    }
    if panel.get(Biomarker::Hba1c).map_or(false, |a| a > 5.7) {
        points += 5;
    }

    if has_treated_hypertension(patient) {
        points += 2;
    }
    if lifestyle.family_history_diabetes {
        points += 5;
    }

    points
}

/// Ten-year type 2 diabetes risk (FINDRISC)
pub fn calculate_diabetes_risk(patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment {
    let points = findrisc_points(patient, lifestyle);
    let band = band_for(f64::from(points), &FINDRISC_BANDS);

    RiskAssessment::new(
        DiseaseCategory::Diabetes,
        f64::from(points),
        band.level,
        band.ten_year_risk,
        "FINDRISC",
        REFERENCE,
    )
}

/// Diabetes scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct FindriscScorer;

impl RiskScorer for FindriscScorer {
    fn category(&self) -> DiseaseCategory {
        DiseaseCategory::Diabetes
    }

    fn assess(&self, patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment {
        calculate_diabetes_risk(patient, lifestyle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::patient::{BiomarkerPanel, Gender};
    use crate::testing::high_risk_male;

    #[test]
    fn test_findrisc_very_high_profile() {
        let (patient, lifestyle) = high_risk_male();
        // age +4, BMI +3, waist +4, inactive +2, glucose +5, hypertension +2, family +5
        assert!(findrisc_points(&patient, &lifestyle) >= 21);

        let result = calculate_diabetes_risk(&patient, &lifestyle);
        assert_eq!(result.ten_year_risk, 50.0);
        assert_eq!(result.risk_level, RiskLevel::VeryHigh);
    }

    #[test]
    fn test_findrisc_young_healthy_is_low() {
        let patient = PatientData::new(30, Gender::Female, 165.0, 58.0)
            .with_blood_pressure(112.0, 72.0)
            .with_biomarkers(BiomarkerPanel::new().with(Biomarker::Glucose, 85.0));
        let lifestyle = Lifestyle { exercise_days_per_week: Some(5.0), ..Default::default() };

        let result = calculate_diabetes_risk(&patient, &lifestyle);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.ten_year_risk, 1.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_findrisc_glucose_and_hba1c_stack() {
        let patient = PatientData::new(30, Gender::Male, 180.0, 70.0).with_biomarkers(
            BiomarkerPanel::new()
                .with(Biomarker::Glucose, 105.0)
                .with(Biomarker::Hba1c, 5.9),
        );
        assert_eq!(findrisc_points(&patient, &Lifestyle::default()), 10);
        let result = calculate_diabetes_risk(&patient, &Lifestyle::default());
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.ten_year_risk, 4.0);
    }

    #[test]
    fn test_findrisc_waist_thresholds_by_sex() {
        let waist = |gender, cm| {
            PatientData::new(30, gender, 170.0, 60.0)
                .with_biomarkers(BiomarkerPanel::new().with(Biomarker::WaistCircumference, cm))
        };
        let none = Lifestyle::default();

        assert_eq!(findrisc_points(&waist(Gender::Male, 90.0), &none), 0);
        assert_eq!(findrisc_points(&waist(Gender::Male, 94.0), &none), 3);
        assert_eq!(findrisc_points(&waist(Gender::Male, 103.0), &none), 4);
        assert_eq!(findrisc_points(&waist(Gender::Female, 85.0), &none), 3);
        assert_eq!(findrisc_points(&waist(Gender::Female, 90.0), &none), 4);
        assert_eq!(findrisc_points(&waist(Gender::Other, 85.0), &none), 3);
    }

    #[test]
    fn test_findrisc_band_edges() {
        // 55-64 age band (+3), BMI 25-30 (+1), poor diet (+1), hypertension (+2) = 7
        let patient = PatientData::new(60, Gender::Female, 160.0, 70.0)
            .with_biomarkers(BiomarkerPanel::new().with(Biomarker::BpMedication, 1.0));
        let lifestyle = Lifestyle { diet_quality: Some(2), ..Default::default() };

        assert_eq!(findrisc_points(&patient, &lifestyle), 7);
        assert_eq!(calculate_diabetes_risk(&patient, &lifestyle).risk_level, RiskLevel::Moderate);
    }
}
