use std::env;

use thiserror::Error;
use tracing::debug;

use crate::entities::risk::DiseaseCategory;

/// Environment variable selecting the risk categories to score
pub const RISK_CATEGORIES_ENV: &str = "VITALAGE_RISK_CATEGORIES";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A category name is not part of the vocabulary
    #[error("Unknown risk category '{0}' in VITALAGE_RISK_CATEGORIES")]
    UnknownCategory(String),
}

/// Assessment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentConfig {
    /// Categories to score, in report order
    pub categories: Vec<DiseaseCategory>,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            categories: DiseaseCategory::ALL.to_vec(),
        }
    }
}

impl AssessmentConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let categories = match lookup(RISK_CATEGORIES_ENV) {
            Some(raw) => parse_categories(&raw)?,
            None => DiseaseCategory::ALL.to_vec(),
        };

        debug!(categories = ?categories, "Loaded assessment configuration");
        Ok(Self { categories })
    }

    /// Whether a category is scored
    pub fn is_enabled(&self, category: DiseaseCategory) -> bool {
        self.categories.contains(&category)
    }
}

/// Parse a comma-separated category list.
///
/// Blank input selects every category. Duplicates are dropped and the
/// result keeps declaration order.
pub fn parse_categories(raw: &str) -> Result<Vec<DiseaseCategory>, ConfigError> {
    let mut selected = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let category = name
            .parse::<DiseaseCategory>()
            .map_err(|_| ConfigError::UnknownCategory(name.to_string()))?;
        selected.push(category);
    }

    if selected.is_empty() {
        return Ok(DiseaseCategory::ALL.to_vec());
    }

    Ok(DiseaseCategory::ALL
        .iter()
        .copied()
        .filter(|category| selected.contains(category))
        .collect())
}
