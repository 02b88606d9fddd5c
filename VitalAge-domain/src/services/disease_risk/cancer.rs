use crate::entities::patient::{Biomarker, Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment, RiskLevel};
use crate::services::disease_risk::{band_for, RiskScorer, ScoreBand};

const REFERENCE: &str = "Additive screen over established risk factors (age, tobacco, obesity, inflammation, \
alcohol, family history); approximation, not a validated cancer risk model";

static CANCER_BANDS: [ScoreBand; 4] = [
    ScoreBand { below: 2.0, ten_year_risk: 2.0, level: RiskLevel::Low },
    ScoreBand { below: 4.0, ten_year_risk: 5.0, level: RiskLevel::Moderate },
    ScoreBand { below: 6.0, ten_year_risk: 10.0, level: RiskLevel::High },
    ScoreBand { below: f64::INFINITY, ten_year_risk: 20.0, level: RiskLevel::VeryHigh },
];

/// Risk factor points
pub fn cancer_points(patient: &PatientData, lifestyle: &Lifestyle) -> u32 {
    let panel = &patient.biomarkers;
    let mut points = match patient.age {
        0..=49 => 0,
        50..=59 => 1,
        60..=69 => 2,
        _ => 3,
    };

    if panel.flag(Biomarker::Smoking) {
        points += 3;
    }
    if patient.bmi().map_or(false, |bmi| bmi >= 30.0) {
        points += 1;
    }
    if panel.get(Biomarker::CReactiveProtein).map_or(false, |crp| crp > 3.0) {
        points += 1;
    }
    if lifestyle.alcohol_drinks_per_week.map_or(false, |drinks| drinks > 14.0) {
        points += 1;
    }
    if lifestyle.family_history_cancer {
        points += 2;
    }

    points
}

/// General cancer risk screen
pub fn calculate_cancer_risk(patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment {
    let points = cancer_points(patient, lifestyle);
    let band = band_for(f64::from(points), &CANCER_BANDS);

    RiskAssessment::new(
        DiseaseCategory::CancerRisk,
        f64::from(points),
        band.level,
        band.ten_year_risk,
        "Additive risk factor screen",
        REFERENCE,
    )
}

/// Cancer scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct CancerScorer;

impl RiskScorer for CancerScorer {
    fn category(&self) -> DiseaseCategory {
        DiseaseCategory::CancerRisk
    }

    fn assess(&self, patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment {
        calculate_cancer_risk(patient, lifestyle)
    }
}
