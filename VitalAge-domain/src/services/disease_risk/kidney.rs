use tracing::debug;

use crate::entities::patient::{Biomarker, Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment, RiskLevel};
use crate::services::disease_risk::RiskScorer;

const REFERENCE: &str = "KDIGO 2012 Clinical Practice Guideline for CKD (GFR and albuminuria categories); \
ten-year figure is a simplified proxy, not a validated percentage";

/// Cap of the proxy ten-year percentage
const MAX_PROXY_RISK: f64 = 50.0;

/// GFR category score, 1 (G1, ≥90) to 6 (G5, <15)
pub fn egfr_band(egfr: f64) -> u32 {
    if egfr >= 90.0 {
        1
    } else if egfr >= 60.0 {
        2
    } else if egfr >= 45.0 {
        3
    } else if egfr >= 30.0 {
        4
    } else if egfr >= 15.0 {
        5
    } else {
        6
    }
}

/// Albuminuria category score, 1 (A1, <30 mg/g) to 3 (A3, ≥300 mg/g)
pub fn albuminuria_band(ratio: f64) -> u32 {
    if ratio < 30.0 {
        1
    } else if ratio < 300.0 {
        2
    } else {
        3
    }
}

/// Classify a combined KDIGO score
pub fn kidney_risk_level(score: u32) -> RiskLevel {
    match score {
        0..=3 => RiskLevel::Low,
        4..=5 => RiskLevel::Moderate,
        6..=7 => RiskLevel::High,
        _ => RiskLevel::VeryHigh,
    }
}

/// Chronic kidney disease risk from eGFR and albuminuria.
///
/// Requires eGFR. Albuminuria uses the albumin-creatinine ratio, then
/// proteinuria, and scores zero when neither is measured.
pub fn calculate_kidney_disease_risk(patient: &PatientData) -> RiskAssessment {
    let panel = &patient.biomarkers;

    let Some(egfr) = panel.get(Biomarker::Egfr) else {
        debug!("Kidney risk skipped without eGFR");
        return RiskAssessment::insufficient_data(DiseaseCategory::KidneyDisease, "KDIGO (no eGFR)", REFERENCE);
    };

    let (albuminuria_score, source) = match (
        panel.get(Biomarker::AlbuminCreatinineRatio),
        panel.get(Biomarker::Proteinuria),
    ) {
        (Some(acr), _) => (albuminuria_band(acr), "eGFR + ACR"),
        (None, Some(protein)) => (albuminuria_band(protein), "eGFR + proteinuria"),
        (None, None) => (0, "eGFR only"),
    };

    let score = egfr_band(egfr) + albuminuria_score;
    let ten_year_risk = (f64::from(score) * 5.0).min(MAX_PROXY_RISK);

    RiskAssessment::new(
        DiseaseCategory::KidneyDisease,
        f64::from(score),
        kidney_risk_level(score),
        ten_year_risk,
        format!("KDIGO ({})", source),
        REFERENCE,
    )
}

/// Kidney disease scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct KidneyScorer;

impl RiskScorer for KidneyScorer {
    fn category(&self) -> DiseaseCategory {
        DiseaseCategory::KidneyDisease
    }

    fn assess(&self, patient: &PatientData, _lifestyle: &Lifestyle) -> RiskAssessment {
        calculate_kidney_disease_risk(patient)
    }
}
