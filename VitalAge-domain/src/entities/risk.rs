use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Disease categories covered by the risk report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseCategory {
    /// Atherosclerotic cardiovascular disease
    Cardiovascular,
    /// Type 2 diabetes
    Diabetes,
    /// Chronic kidney disease
    KidneyDisease,
    /// Cancer
    CancerRisk,
    /// Cognitive decline and dementia
    CognitiveDecline,
    /// Metabolic syndrome
    MetabolicSyndrome,
    /// Stroke
    StrokeRisk,
}

impl DiseaseCategory {
    /// Every category, in report order
    pub const ALL: [DiseaseCategory; 7] = [
        DiseaseCategory::Cardiovascular,
        DiseaseCategory::Diabetes,
        DiseaseCategory::KidneyDisease,
        DiseaseCategory::CancerRisk,
        DiseaseCategory::CognitiveDecline,
        DiseaseCategory::MetabolicSyndrome,
        DiseaseCategory::StrokeRisk,
    ];

    /// Canonical snake_case name
    pub fn name(self) -> &'static str {
        match self {
            DiseaseCategory::Cardiovascular => "cardiovascular",
            DiseaseCategory::Diabetes => "diabetes",
            DiseaseCategory::KidneyDisease => "kidney_disease",
            DiseaseCategory::CancerRisk => "cancer_risk",
            DiseaseCategory::CognitiveDecline => "cognitive_decline",
            DiseaseCategory::MetabolicSyndrome => "metabolic_syndrome",
            DiseaseCategory::StrokeRisk => "stroke_risk",
        }
    }
}

impl FromStr for DiseaseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        DiseaseCategory::ALL
            .iter()
            .copied()
            .find(|category| category.name() == key)
            .ok_or_else(|| format!("Unknown disease category: {}", s))
    }
}

impl fmt::Display for DiseaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Moderate risk, monitoring recommended
    Moderate,
    /// High risk, intervention recommended
    High,
    /// Very high risk, prompt consultation advised
    VeryHigh,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
            Self::VeryHigh => write!(f, "very_high"),
        }
    }
}

/// Outcome of one disease risk score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Disease category
    pub category: DiseaseCategory,

    /// Raw score in the algorithm's own units; not comparable across categories
    pub risk_score: f64,

    /// Risk classification
    pub risk_level: RiskLevel,

    /// Estimated 10-year risk, percent in [0, 100]
    pub ten_year_risk: f64,

    /// Algorithm and the computation path taken
    pub algorithm_used: String,

    /// Literature reference, or a note that the score is an approximation
    pub reference: String,
}

impl RiskAssessment {
    /// Create an assessment; the ten-year risk is clamped to [0, 100]
    pub fn new(
        category: DiseaseCategory,
        risk_score: f64,
        risk_level: RiskLevel,
        ten_year_risk: f64,
        algorithm_used: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        let ten_year_risk = if ten_year_risk.is_finite() {
            ten_year_risk.clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            category,
            risk_score,
            risk_level,
            ten_year_risk,
            algorithm_used: algorithm_used.into(),
            reference: reference.into(),
        }
    }

    /// Zero/low result for a category whose inputs were insufficient
    pub fn insufficient_data(
        category: DiseaseCategory,
        algorithm_used: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self::new(category, 0.0, RiskLevel::Low, 0.0, algorithm_used, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::VeryHigh);
    }

    #[test]
    fn test_risk_level_serializes_snake_case() {
        let json = serde_json::to_string(&RiskLevel::VeryHigh).unwrap();
        assert_eq!(json, "\"very_high\"");
        assert_eq!(RiskLevel::VeryHigh.to_string(), "very_high");
    }

    #[test]
    fn test_category_parsing() {
        for category in DiseaseCategory::ALL {
            assert_eq!(category.name().parse::<DiseaseCategory>().unwrap(), category);
        }
        assert!("liver".parse::<DiseaseCategory>().is_err());
    }

    #[test]
    fn test_ten_year_risk_is_clamped() {
        let high = RiskAssessment::new(DiseaseCategory::Diabetes, 1.0, RiskLevel::High, 140.0, "x", "y");
        assert_eq!(high.ten_year_risk, 100.0);

        let nan = RiskAssessment::new(DiseaseCategory::Diabetes, 1.0, RiskLevel::High, f64::NAN, "x", "y");
        assert_eq!(nan.ten_year_risk, 0.0);
    }

    #[test]
    fn test_insufficient_data_sentinel() {
        let result = RiskAssessment::insufficient_data(DiseaseCategory::KidneyDisease, "KDIGO (no eGFR)", "ref");
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.ten_year_risk, 0.0);
        assert!(result.algorithm_used.contains("no eGFR"));
    }
}
