// Domain entities and value objects
pub mod biological_age;
pub mod conversions;
pub mod intake;
pub mod patient;
pub mod risk;

// Re-export common types for easier imports
pub use biological_age::{AgeMethod, BiologicalAgeResult};
pub use intake::{AssessmentForm, FormValue, LifestyleForm};
pub use patient::{Biomarker, BiomarkerPanel, ClinicalSex, Gender, Lifestyle, PatientData};
pub use risk::{DiseaseCategory, RiskAssessment, RiskLevel};
