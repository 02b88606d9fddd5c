pub mod assessment;
pub mod biological_age;
pub mod coefficients;
pub mod disease_risk;

// Domain services
// Scoring is pure; the assessment service packages the results.

// Re-export service traits and factory functions
pub use assessment::{
    create_default_assessment_service, AssessmentReport, AssessmentService, AssessmentServiceTrait,
};
pub use biological_age::calculate_biological_age;
pub use disease_risk::{create_default_risk_scorers, scorer_for, RiskScorer};
