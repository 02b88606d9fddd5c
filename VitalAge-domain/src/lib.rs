// VitalAge Domain
// This crate contains the biological age and disease risk scoring logic

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Environment configuration
pub mod config;

// Testing fixtures - only available in unit tests or with the mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;

// Re-export the types most callers need
pub use config::{AssessmentConfig, ConfigError};
pub use entities::conversions::{convert_form_to_patient, IntakeError};
pub use entities::{
    AgeMethod, AssessmentForm, BiologicalAgeResult, Biomarker, BiomarkerPanel, DiseaseCategory, Gender,
    Lifestyle, PatientData, RiskAssessment, RiskLevel,
};
pub use services::{AssessmentReport, AssessmentService, AssessmentServiceTrait};
