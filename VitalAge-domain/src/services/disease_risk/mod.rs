// Disease risk scoring
// One pure function per category, each wrapped by a RiskScorer so the
// assessment service can run any subset of categories.

pub mod cancer;
pub mod cardiovascular;
pub mod cognitive;
pub mod diabetes;
pub mod kidney;
pub mod metabolic_syndrome;
pub mod stroke;

pub use cancer::{calculate_cancer_risk, CancerScorer};
pub use cardiovascular::{calculate_ascvd_risk, AscvdScorer};
pub use cognitive::{calculate_cognitive_decline_risk, CognitiveDeclineScorer};
pub use diabetes::{calculate_diabetes_risk, FindriscScorer};
pub use kidney::{calculate_kidney_disease_risk, KidneyScorer};
pub use metabolic_syndrome::{calculate_metabolic_syndrome_risk, MetabolicSyndromeScorer};
pub use stroke::{calculate_stroke_risk, StrokeScorer};

use crate::entities::patient::{Biomarker, Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment, RiskLevel};

/// Trait for disease risk scorers
#[cfg_attr(test, mockall::automock)]
pub trait RiskScorer: Send + Sync {
    /// Category this scorer produces
    fn category(&self) -> DiseaseCategory;

    /// Score one patient. Never fails; insufficient inputs give a low-risk
    /// result whose `algorithm_used` names the missing data.
    fn assess(&self, patient: &PatientData, lifestyle: &Lifestyle) -> RiskAssessment;
}

/// Create one scorer per category, in report order
pub fn create_default_risk_scorers() -> Vec<Box<dyn RiskScorer>> {
    DiseaseCategory::ALL.iter().map(|category| scorer_for(*category)).collect()
}

/// Create the scorer for a category
pub fn scorer_for(category: DiseaseCategory) -> Box<dyn RiskScorer> {
    match category {
        DiseaseCategory::Cardiovascular => Box::new(AscvdScorer),
        DiseaseCategory::Diabetes => Box::new(FindriscScorer),
        DiseaseCategory::KidneyDisease => Box::new(KidneyScorer),
        DiseaseCategory::CancerRisk => Box::new(CancerScorer),
        DiseaseCategory::CognitiveDecline => Box::new(CognitiveDeclineScorer),
        DiseaseCategory::MetabolicSyndrome => Box::new(MetabolicSyndromeScorer),
        DiseaseCategory::StrokeRisk => Box::new(StrokeScorer),
    }
}

/// Points range mapped to a ten-year risk and level
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScoreBand {
    /// Exclusive upper bound of the band
    pub below: f64,
    pub ten_year_risk: f64,
    pub level: RiskLevel,
}

/// First band whose upper bound exceeds the score; the last band is open-ended
pub(crate) fn band_for(score: f64, bands: &'static [ScoreBand]) -> &'static ScoreBand {
    bands
        .iter()
        .find(|band| score < band.below)
        .unwrap_or(&bands[bands.len() - 1])
}

/// Diagnosed diabetes, or fasting glucose in the diabetic range
pub(crate) fn has_diabetes(patient: &PatientData) -> bool {
    let panel = &patient.biomarkers;
    panel.flag(Biomarker::Diabetes) || panel.get(Biomarker::Glucose).map_or(false, |g| g > 126.0)
}

/// On antihypertensive medication, or systolic pressure above 140
pub(crate) fn has_treated_hypertension(patient: &PatientData) -> bool {
    patient.biomarkers.flag(Biomarker::BpMedication)
        || patient.systolic().map_or(false, |sbp| sbp > 140.0)
}
