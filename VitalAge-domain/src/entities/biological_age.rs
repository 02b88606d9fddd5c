use serde::{Deserialize, Serialize};
use std::fmt;

/// Biological age estimation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeMethod {
    /// Levine phenotypic age
    Phenotypic,
    /// Klemera-Doubal method
    KlemeraDoubal,
    /// Rule-based metabolic age
    Metabolic,
    /// Telomere length based age
    Telomere,
}

impl fmt::Display for AgeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeMethod::Phenotypic => write!(f, "Phenotypic Age"),
            AgeMethod::KlemeraDoubal => write!(f, "Klemera-Doubal Age"),
            AgeMethod::Metabolic => write!(f, "Metabolic Age"),
            AgeMethod::Telomere => write!(f, "Telomere Age"),
        }
    }
}

/// Biological age estimates for one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiologicalAgeResult {
    /// Chronological age the estimates are compared against
    pub chronological_age: f64,

    /// Phenotypic age (Levine 2018), or the simplified estimate on fallback
    pub phenotypic_age: f64,

    /// Klemera-Doubal age, or the simplified estimate on fallback
    pub klemera_doubal_age: f64,

    /// Metabolic age
    pub metabolic_age: f64,

    /// Telomere age; never computed since no telomere assay is collected
    pub telomere_age: Option<f64>,

    /// Mean of the computed estimates
    pub average_biological_age: f64,

    /// Chronological minus average biological age. Positive means the
    /// patient's biology looks younger than their calendar age.
    pub age_advantage: f64,

    /// Methods that had too little data and used the simplified estimate
    pub fallbacks: Vec<AgeMethod>,
}

impl BiologicalAgeResult {
    /// The computed estimates, by method
    pub fn estimates(&self) -> Vec<(AgeMethod, f64)> {
        let mut estimates = vec![
            (AgeMethod::Phenotypic, self.phenotypic_age),
            (AgeMethod::KlemeraDoubal, self.klemera_doubal_age),
            (AgeMethod::Metabolic, self.metabolic_age),
        ];
        if let Some(telomere_age) = self.telomere_age {
            estimates.push((AgeMethod::Telomere, telomere_age));
        }
        estimates
    }

    /// Whether the given method fell back to the simplified estimate
    pub fn used_fallback(&self, method: AgeMethod) -> bool {
        self.fallbacks.contains(&method)
    }

    /// Whether the average biological age is below the chronological age
    pub fn is_younger_than_chronological(&self) -> bool {
        self.age_advantage > 0.0
    }
}
