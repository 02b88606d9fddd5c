use tracing::debug;

use crate::entities::patient::{Biomarker, ClinicalSex, Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment, RiskLevel};
use crate::services::disease_risk::{band_for, RiskScorer, ScoreBand};

const REFERENCE: &str = "Kivipelto M et al. Lancet Neurol 2006;5(9):735-741 (CAIDE); \
the 20-year dementia risk is reported as a ten-year proxy, approximation";

/// Below this age the score is not applied
pub const CAIDE_MIN_AGE: u32 = 40;

/// 251 mg/dL is the 6.5 mmol/L CAIDE cut-off
const CHOLESTEROL_CUTOFF: f64 = 251.0;

static CAIDE_BANDS: [ScoreBand; 5] = [
    ScoreBand { below: 6.0, ten_year_risk: 1.0, level: RiskLevel::Low },
    ScoreBand { below: 8.0, ten_year_risk: 1.9, level: RiskLevel::Moderate },
    ScoreBand { below: 10.0, ten_year_risk: 4.2, level: RiskLevel::Moderate },
    ScoreBand { below: 12.0, ten_year_risk: 7.4, level: RiskLevel::High },
    ScoreBand { below: f64::INFINITY, ten_year_risk: 16.4, level: RiskLevel::VeryHigh },
];

/// CAIDE points. Unreported education or activity scores nothing.
pub fn caide_points(patient: &PatientData, lifestyle: &Lifestyle) -> u32 {
    let mut points = match patient.age {
        0..=46 => 0,
        47..=53 => 3,
        _ => 4,
    };

    points += match lifestyle.education_years {
        Some(years) if years <= 6.0 => 3,
        Some(years) if years < 10.0 => 2,
        _ => 0,
    };

    points += match patient.clinical_sex() {
        ClinicalSex::Male => 1,
        ClinicalSex::Female => 0,
    };

    if patient.systolic().map_or(false, |sbp| sbp > 140.0) {
        points += 2;
    }
    if patient.bmi().map_or(false, |bmi| bmi > 30.0) {
        points += 2;
    }
    if patient
        .biomarkers
        .get(Biomarker::TotalCholesterol)
        .map_or(false, |tc| tc > CHOLESTEROL_CUTOFF)
    {
        points += 2;
    }
    if lifestyle.is_less_active_than(2.0) {
        points += 1;
    }

    points
}

/// Cognitive decline risk (CAIDE-style)
pub fn calculate_cognitive_decline_risk(patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment {
    if patient.age < CAIDE_MIN_AGE {
        debug!(age = patient.age, "Cognitive decline score not applied below 40");
        return RiskAssessment::insufficient_data(
            DiseaseCategory::CognitiveDecline,
            "CAIDE (age below 40)",
            REFERENCE,
        );
    }

    let points = caide_points(patient, lifestyle);
    let band = band_for(f64::from(points), &CAIDE_BANDS);

    RiskAssessment::new(
        DiseaseCategory::CognitiveDecline,
        f64::from(points),
        band.level,
        band.ten_year_risk,
        "CAIDE",
        REFERENCE,
    )
}

/// Cognitive decline scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct CognitiveDeclineScorer;

impl RiskScorer for CognitiveDeclineScorer {
    fn category(&self) -> DiseaseCategory {
        DiseaseCategory::CognitiveDecline
    }

    fn assess(&self, patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment {
        calculate_cognitive_decline_risk(patient, lifestyle)
    }
}
