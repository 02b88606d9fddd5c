use tracing::debug;

use crate::entities::patient::{Biomarker, Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment, RiskLevel};
use crate::services::disease_risk::{band_for, has_diabetes, RiskScorer, ScoreBand};

const REFERENCE: &str = "Points adapted from the Framingham Stroke Risk Profile (Wolf PA et al. Stroke 1991); \
approximation, not the published point table";

pub const STROKE_MIN_AGE: u32 = 40;

static STROKE_BANDS: [ScoreBand; 4] = [
    ScoreBand { below: 3.0, ten_year_risk: 2.0, level: RiskLevel::Low },
    ScoreBand { below: 6.0, ten_year_risk: 5.0, level: RiskLevel::Moderate },
    ScoreBand { below: 9.0, ten_year_risk: 12.0, level: RiskLevel::High },
    ScoreBand { below: f64::INFINITY, ten_year_risk: 25.0, level: RiskLevel::VeryHigh },
];

/// Stroke risk factor points
pub fn stroke_points(patient: &PatientData, lifestyle: &Lifestyle) -> u32 {
    let panel = &patient.biomarkers;
    let mut points = match patient.age {
        0..=54 => 0,
        55..=64 => 1,
        65..=74 => 2,
        _ => 3,
    };

    points += match patient.systolic() {
        Some(sbp) if sbp >= 160.0 => 3,
        Some(sbp) if sbp >= 140.0 => 2,
        Some(sbp) if sbp >= 130.0 => 1,
        _ => 0,
    };

    if panel.flag(Biomarker::BpMedication) {
        points += 1;
    }
    if has_diabetes(patient) {
        points += 2;
    }
    if panel.flag(Biomarker::Smoking) {
        points += 2;
    }
    if lifestyle.family_history_stroke {
        points += 1;
    }

    points
}

/// Ten-year stroke risk
pub fn calculate_stroke_risk(patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment {
    if patient.age < STROKE_MIN_AGE {
        debug!(age = patient.age, "Stroke score not applied below 40");
        return RiskAssessment::insufficient_data(
            DiseaseCategory::StrokeRisk,
            "Framingham-style stroke points (age below 40)",
            REFERENCE,
        );
    }

    let points = stroke_points(patient, lifestyle);
    let band = band_for(f64::from(points), &STROKE_BANDS);

    RiskAssessment::new(
        DiseaseCategory::StrokeRisk,
        f64::from(points),
        band.level,
        band.ten_year_risk,
        "Framingham-style stroke points",
        REFERENCE,
    )
}

/// Stroke scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct StrokeScorer;

impl RiskScorer for StrokeScorer {
    fn category(&self) -> DiseaseCategory {
        DiseaseCategory::StrokeRisk
    }

    fn assess(&self, patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment {
        calculate_stroke_risk(patient, lifestyle)
    }
}
