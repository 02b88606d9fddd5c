use tracing::debug;

use crate::entities::patient::{Biomarker, ClinicalSex, Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment, RiskLevel};
use crate::services::coefficients::{pooled_cohort_coefficients, PooledCohortInputs};
use crate::services::disease_risk::{has_diabetes, has_treated_hypertension, RiskScorer};

const REFERENCE: &str = "Goff DC Jr et al. 2013 ACC/AHA Pooled Cohort Equations; 2018 AHA/ACC Cholesterol Guideline";

/// Age range the pooled cohort equations were validated on
pub const ASCVD_MIN_AGE: u32 = 40;
pub const ASCVD_MAX_AGE: u32 = 79;

pub const DEFAULT_TOTAL_CHOLESTEROL: f64 = 200.0;
pub const DEFAULT_HDL_CHOLESTEROL: f64 = 50.0;
pub const DEFAULT_SYSTOLIC_BP: f64 = 120.0;

/// Classify a ten-year ASCVD percentage
pub fn ascvd_risk_level(ten_year_risk: f64) -> RiskLevel {
    if ten_year_risk < 5.0 {
        RiskLevel::Low
    } else if ten_year_risk < 7.5 {
        RiskLevel::Moderate
    } else if ten_year_risk < 20.0 {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}

/// Ten-year atherosclerotic cardiovascular disease risk.
///
/// Only defined for ages 40 to 79; outside that band the result is the
/// low-risk sentinel. Missing lipids and blood pressure use population
/// defaults, which `algorithm_used` lists.
pub fn calculate_ascvd_risk(patient: &PatientData) -> RiskAssessment {
    if !(ASCVD_MIN_AGE..=ASCVD_MAX_AGE).contains(&patient.age) {
        debug!(age = patient.age, "ASCVD age outside validated range");
        return RiskAssessment::insufficient_data(
            DiseaseCategory::Cardiovascular,
            "Pooled Cohort Equations (age outside 40-79 range)",
            REFERENCE,
        );
    }

    let panel = &patient.biomarkers;
    let mut assumed = Vec::new();
    let mut measured_or_default = |value: Option<f64>, default: f64, name: &'static str| {
        value.filter(|v| *v > 0.0).unwrap_or_else(|| {
            assumed.push(name);
            default
        })
    };

    let inputs = PooledCohortInputs {
        age: f64::from(patient.age),
        total_cholesterol: measured_or_default(
            panel.get(Biomarker::TotalCholesterol),
            DEFAULT_TOTAL_CHOLESTEROL,
            "total cholesterol",
        ),
        hdl_cholesterol: measured_or_default(
            panel.get(Biomarker::HdlCholesterol),
            DEFAULT_HDL_CHOLESTEROL,
            "HDL",
        ),
        systolic_bp: measured_or_default(patient.systolic(), DEFAULT_SYSTOLIC_BP, "systolic BP"),
        treated_hypertension: has_treated_hypertension(patient),
        smoker: panel.flag(Biomarker::Smoking),
        diabetic: has_diabetes(patient),
    };

    let sex = patient.clinical_sex();
    let coefficients = pooled_cohort_coefficients(sex);
    let score = coefficients.linear_score(&inputs);
    let ten_year_risk = coefficients.ten_year_risk(score).clamp(0.0, 100.0);

    let branch = match sex {
        ClinicalSex::Male => "male",
        ClinicalSex::Female => "female",
    };
    let mut algorithm = format!("Pooled Cohort Equations ({} coefficients)", branch);
    if !assumed.is_empty() {
        algorithm.push_str(&format!(" [assumed {}]", assumed.join(", ")));
    }

    RiskAssessment::new(
        DiseaseCategory::Cardiovascular,
        score,
        ascvd_risk_level(ten_year_risk),
        ten_year_risk,
        algorithm,
        REFERENCE,
    )
}

/// Cardiovascular scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct AscvdScorer;

impl RiskScorer for AscvdScorer {
    fn category(&self) -> DiseaseCategory {
        DiseaseCategory::Cardiovascular
    }

    fn assess(&self, patient: &PatientData, _lifestyle: &Lifestyle) -> RiskAssessment {
        calculate_ascvd_risk(patient)
    }
}
