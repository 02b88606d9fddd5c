use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::AssessmentConfig;
use crate::entities::biological_age::BiologicalAgeResult;
use crate::entities::conversions::{convert_form_to_patient, IntakeError};
use crate::entities::intake::AssessmentForm;
use crate::entities::patient::{Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment};
use crate::services::biological_age::calculate_biological_age;
use crate::services::disease_risk::{create_default_risk_scorers, scorer_for, RiskScorer};

/// Complete result of one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier
    pub id: Uuid,

    /// When the report was produced
    pub generated_at: DateTime<Utc>,

    /// Chronological age in whole years
    pub chronological_age: u32,

    /// Body mass index, when height and weight are usable
    pub bmi: Option<f64>,

    /// Biological age estimates
    pub biological_age: BiologicalAgeResult,

    /// One assessment per enabled category, in report order
    pub risks: Vec<RiskAssessment>,
}

impl AssessmentReport {
    /// The assessment with the greatest risk level; the first wins on a tie
    pub fn highest_risk(&self) -> Option<&RiskAssessment> {
        self.risks.iter().fold(None, |highest, risk| match highest {
            Some(current) if current.risk_level >= risk.risk_level => Some(current),
            _ => Some(risk),
        })
    }

    /// The assessment for a category, if it was scored
    pub fn risk_for(&self, category: DiseaseCategory) -> Option<&RiskAssessment> {
        self.risks.iter().find(|risk| risk.category == category)
    }
}

/// Trait for assessment service operations
pub trait AssessmentServiceTrait {
    /// Estimate biological age and score every enabled category
    fn assess(&self, patient: &PatientData, lifestyle: &Lifestyle) -> AssessmentReport;

    /// Convert a questionnaire and assess it
    fn assess_form(&self, form: &AssessmentForm) -> Result<AssessmentReport, IntakeError> {
        let (patient, lifestyle) = convert_form_to_patient(form)?;
        Ok(self.assess(&patient, &lifestyle))
    }
}

/// Assessment service combining biological age and disease risk scoring
pub struct AssessmentService {
    scorers: Vec<Box<dyn RiskScorer>>,
}

impl AssessmentService {
    /// Create a service running the given scorers in order
    pub fn new(scorers: Vec<Box<dyn RiskScorer>>) -> Self {
        Self { scorers }
    }

    /// Create a service for the configured categories
    pub fn from_config(config: &AssessmentConfig) -> Self {
        Self::new(config.categories.iter().map(|category| scorer_for(*category)).collect())
    }

    /// Categories this service scores
    pub fn categories(&self) -> Vec<DiseaseCategory> {
        self.scorers.iter().map(|scorer| scorer.category()).collect()
    }
}

impl AssessmentServiceTrait for AssessmentService {
    fn assess(&self, patient: &PatientData, lifestyle: &Lifestyle) -> AssessmentReport {
        let biological_age = calculate_biological_age(patient);
        let risks: Vec<RiskAssessment> = self
            .scorers
            .iter()
            .map(|scorer| scorer.assess(patient, lifestyle))
            .collect();

        let report = AssessmentReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            chronological_age: patient.age,
            bmi: patient.bmi(),
            biological_age,
            risks,
        };

        info!(
            id = %report.id,
            age = report.chronological_age,
            biological_age = report.biological_age.average_biological_age,
            categories = report.risks.len(),
            "Completed assessment"
        );

        report
    }
}

/// Factory function to create the default assessment service
pub fn create_default_assessment_service() -> impl AssessmentServiceTrait + Send + Sync {
    AssessmentService::new(create_default_risk_scorers())
}
