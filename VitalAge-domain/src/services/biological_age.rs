//! Biological age estimation.
//!
//! Every estimator follows the same pipeline: check that enough biomarkers
//! are present, compute or fall back to the simplified estimate, clamp.

use tracing::debug;

use crate::entities::biological_age::{AgeMethod, BiologicalAgeResult};
use crate::entities::patient::{Biomarker, BiomarkerPanel, PatientData};
use crate::services::coefficients::{
    KDM_MARKERS, PHENOTYPIC_AGE_COEFFICIENT, PHENOTYPIC_GAMMA, PHENOTYPIC_HORIZON_MONTHS,
    PHENOTYPIC_INTERCEPT, PHENOTYPIC_INVERSE_OFFSET, PHENOTYPIC_INVERSE_RATE,
    PHENOTYPIC_INVERSE_SCALE, PHENOTYPIC_TERMS,
};

pub const MIN_AGE: f64 = 0.0;
pub const MAX_AGE: f64 = 120.0;

/// Minimum phenotypic-age biomarkers before the formula is trusted
pub const PHENOTYPIC_MIN_MARKERS: usize = 6;

/// Minimum Klemera-Doubal biomarkers before the formula is trusted
pub const KDM_MIN_MARKERS: usize = 3;

/// Panels smaller than this get a flat penalty in the simplified estimate
const SPARSE_PANEL_SIZE: usize = 5;

/// The nine phenotypic age biomarkers
pub const PHENOTYPIC_MARKERS: [Biomarker; 9] = [
    Biomarker::Albumin,
    Biomarker::Creatinine,
    Biomarker::Glucose,
    Biomarker::CReactiveProtein,
    Biomarker::LymphocytePercent,
    Biomarker::AlkalinePhosphatase,
    Biomarker::WhiteBloodCells,
    Biomarker::MeanCellVolume,
    Biomarker::RedCellDistributionWidth,
];

/// Bound an age to [0, 120]
pub fn clamp_age(age: f64) -> f64 {
    age.clamp(MIN_AGE, MAX_AGE)
}

/// Natural log of the model's 10-year mortality probability for a linear predictor
fn mortality_score(linear_predictor: f64) -> f64 {
    let horizon = (PHENOTYPIC_HORIZON_MONTHS * PHENOTYPIC_GAMMA).exp_m1() / PHENOTYPIC_GAMMA;
    let mortality = -(-linear_predictor.exp() * horizon).exp_m1();
    mortality.ln()
}

/// Phenotypic age, or `None` when too few markers are present or the
/// inverse is numerically undefined
fn phenotypic_age_estimate(age: f64, biomarkers: &BiomarkerPanel) -> Option<f64> {
    let present = biomarkers.count_present(&PHENOTYPIC_MARKERS);
    if present < PHENOTYPIC_MIN_MARKERS {
        debug!(present, required = PHENOTYPIC_MIN_MARKERS, "Too few phenotypic age biomarkers");
        return None;
    }

    // Absent markers contribute nothing; they are not imputed
    let linear_predictor = PHENOTYPIC_TERMS.iter().fold(
        PHENOTYPIC_INTERCEPT + PHENOTYPIC_AGE_COEFFICIENT * age,
        |acc, term| acc + biomarkers.get(term.biomarker).map_or(0.0, |v| term.contribution(v)),
    );

    let score = mortality_score(linear_predictor);
    let phenotypic_age = PHENOTYPIC_INVERSE_OFFSET
        + (PHENOTYPIC_INVERSE_SCALE * (1.0 - score.exp()).ln()).ln() / PHENOTYPIC_INVERSE_RATE;

    if !phenotypic_age.is_finite() {
        debug!(linear_predictor, score, "Phenotypic age inverse undefined");
        return None;
    }
    Some(clamp_age(phenotypic_age))
}

/// Klemera-Doubal age, or `None` when too few markers are present
fn klemera_doubal_estimate(age: f64, biomarkers: &BiomarkerPanel) -> Option<f64> {
    let (weighted_ages, total_weight, used) = KDM_MARKERS
        .iter()
        .filter_map(|marker| biomarkers.get(marker.biomarker).map(|value| (marker, value)))
        .fold((0.0, 0.0, 0usize), |(sum, weights, n), (marker, value)| {
            let weight = marker.weight();
            (sum + weight * marker.implied_age(age, value), weights + weight, n + 1)
        });

    if used < KDM_MIN_MARKERS {
        debug!(present = used, required = KDM_MIN_MARKERS, "Too few Klemera-Doubal biomarkers");
        return None;
    }

    let kdm_age = weighted_ages / total_weight;
    if !kdm_age.is_finite() {
        return None;
    }
    Some(clamp_age(kdm_age))
}

/// Phenotypic age (Levine 2018) from nine clinical biomarkers.
///
/// Falls back to [`calculate_simplified_biological_age`] with fewer than
/// six markers or when the mortality inverse is undefined.
pub fn calculate_phenotypic_age(age: f64, biomarkers: &BiomarkerPanel) -> f64 {
    phenotypic_age_estimate(age, biomarkers)
        .unwrap_or_else(|| calculate_simplified_biological_age(age, biomarkers))
}

/// Klemera-Doubal age: the coefficient²-weighted mean of per-marker implied ages.
///
/// Falls back to [`calculate_simplified_biological_age`] with fewer than
/// three markers.
pub fn calculate_klemera_doubal_age(age: f64, biomarkers: &BiomarkerPanel) -> f64 {
    klemera_doubal_estimate(age, biomarkers)
        .unwrap_or_else(|| calculate_simplified_biological_age(age, biomarkers))
}

/// Metabolic age: chronological age adjusted by band rules per biomarker.
///
/// Within one biomarker the bands are exclusive; rules for different
/// biomarkers stack. Absent biomarkers adjust nothing.
pub fn calculate_metabolic_age(age: f64, biomarkers: &BiomarkerPanel, bmi: Option<f64>) -> f64 {
    let mut adjustment = 0.0;

    if let Some(glucose) = biomarkers.get(Biomarker::Glucose) {
        adjustment += if glucose > 126.0 {
            5.0
        } else if glucose > 100.0 {
            2.0
        } else if glucose < 70.0 {
            1.0
        } else {
            0.0
        };
    }

    if let Some(hba1c) = biomarkers.get(Biomarker::Hba1c) {
        adjustment += if hba1c > 6.5 {
            5.0
        } else if hba1c > 5.7 {
            3.0
        } else {
            0.0
        };
    }

    if let Some(insulin) = biomarkers.get(Biomarker::Insulin) {
        adjustment += if insulin > 20.0 {
            3.0
        } else if insulin < 3.0 {
            -1.0
        } else {
            0.0
        };
    }

    if let Some(triglycerides) = biomarkers.get(Biomarker::Triglycerides) {
        adjustment += if triglycerides > 200.0 {
            2.0
        } else if triglycerides < 100.0 {
            -1.0
        } else {
            0.0
        };
    }

    if let Some(hdl) = biomarkers.get(Biomarker::HdlCholesterol) {
        adjustment += if hdl < 40.0 {
            2.0
        } else if hdl > 60.0 {
            -2.0
        } else {
            0.0
        };
    }

    if let Some(ldl) = biomarkers.get(Biomarker::LdlCholesterol) {
        adjustment += if ldl > 160.0 {
            3.0
        } else if ldl < 100.0 {
            -1.0
        } else {
            0.0
        };
    }

    if let Some(bmi) = bmi.filter(|b| b.is_finite()) {
        adjustment += if bmi > 30.0 {
            3.0
        } else if bmi >= 25.0 {
            1.0
        } else if bmi < 18.5 {
            1.0
        } else {
            0.0
        };
    }

    clamp_age(age + adjustment)
}

/// Simplified estimate used when a full method lacks data
pub fn calculate_simplified_biological_age(age: f64, biomarkers: &BiomarkerPanel) -> f64 {
    let mut estimate = age;

    if let Some(glucose) = biomarkers.get(Biomarker::Glucose) {
        if glucose > 126.0 {
            estimate += 3.0;
        } else if glucose > 100.0 {
            estimate += 1.0;
        }
    }
    if biomarkers.get(Biomarker::Creatinine).map_or(false, |v| v > 1.3) {
        estimate += 2.0;
    }
    if biomarkers.get(Biomarker::CReactiveProtein).map_or(false, |v| v > 3.0) {
        estimate += 2.0;
    }
    if biomarkers.present_count() < SPARSE_PANEL_SIZE {
        estimate += 1.0;
    }

    clamp_age(estimate)
}

/// Compute every biological age estimate for a patient.
///
/// The telomere method is never computed: no telomere assay is collected.
pub fn calculate_biological_age(patient: &PatientData) -> BiologicalAgeResult {
    let age = patient.age_years();
    let panel = patient.effective_panel();
    let bmi = patient.bmi();
    let mut fallbacks = Vec::new();

    let phenotypic_age = phenotypic_age_estimate(age, &panel).unwrap_or_else(|| {
        fallbacks.push(AgeMethod::Phenotypic);
        calculate_simplified_biological_age(age, &panel)
    });
    let klemera_doubal_age = klemera_doubal_estimate(age, &panel).unwrap_or_else(|| {
        fallbacks.push(AgeMethod::KlemeraDoubal);
        calculate_simplified_biological_age(age, &panel)
    });
    let metabolic_age = calculate_metabolic_age(age, &panel, bmi);
    let telomere_age: Option<f64> = None;

    let estimates: Vec<f64> = [Some(phenotypic_age), Some(klemera_doubal_age), Some(metabolic_age), telomere_age]
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();

    let average_biological_age = if estimates.is_empty() {
        age
    } else {
        estimates.iter().sum::<f64>() / estimates.len() as f64
    };

    debug!(
        phenotypic_age,
        klemera_doubal_age,
        metabolic_age,
        average_biological_age,
        fallbacks = fallbacks.len(),
        "Biological age computed"
    );

    BiologicalAgeResult {
        chronological_age: age,
        phenotypic_age,
        klemera_doubal_age,
        metabolic_age,
        telomere_age,
        average_biological_age,
        age_advantage: age - average_biological_age,
        fallbacks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::patient::Gender;
    use crate::testing::{complete_phenotypic_panel, unhealthy_phenotypic_panel};

    #[test]
    fn test_phenotypic_age_healthy_reference() {
        let age = calculate_phenotypic_age(50.0, &complete_phenotypic_panel());
        assert!((age - 46.58).abs() < 0.05, "phenotypic age {}", age);
    }

    #[test]
    fn test_phenotypic_age_unhealthy_reference() {
        let age = calculate_phenotypic_age(50.0, &unhealthy_phenotypic_panel());
        assert!((age - 100.87).abs() < 0.05, "phenotypic age {}", age);
    }

    #[test]
    fn test_phenotypic_age_crp_in_mg_per_litre() {
        let low = calculate_phenotypic_age(50.0, &complete_phenotypic_panel().with(Biomarker::CReactiveProtein, 0.5));
        let high = calculate_phenotypic_age(50.0, &complete_phenotypic_panel().with(Biomarker::CReactiveProtein, 3.0));
        assert!((low - 46.28).abs() < 0.05, "phenotypic age {}", low);
        assert!((high - 47.30).abs() < 0.05, "phenotypic age {}", high);
    }

    #[test]
    fn test_phenotypic_age_sparse_panel_falls_back() {
        let panel = BiomarkerPanel::new()
            .with(Biomarker::Albumin, 4.5)
            .with(Biomarker::Creatinine, 1.5)
            .with(Biomarker::Glucose, 130.0)
            .with(Biomarker::CReactiveProtein, 5.0)
            .with(Biomarker::LymphocytePercent, 30.0);

        let expected = calculate_simplified_biological_age(50.0, &panel);
        assert_eq!(calculate_phenotypic_age(50.0, &panel), expected);
        // glucose +3, creatinine +2, CRP +2; five markers is not sparse
        assert_eq!(expected, 57.0);
    }

    #[test]
    fn test_phenotypic_inverse_overflow_falls_back() {
        // An absurd predictor saturates the mortality probability at 1
        let panel = complete_phenotypic_panel().with(Biomarker::RedCellDistributionWidth, 500.0);
        assert_eq!(phenotypic_age_estimate(50.0, &panel), None);
        assert_eq!(
            calculate_phenotypic_age(50.0, &panel),
            calculate_simplified_biological_age(50.0, &panel)
        );
    }

    #[test]
    fn test_klemera_doubal_at_population_means() {
        let panel: BiomarkerPanel = KDM_MARKERS.iter().map(|m| (m.biomarker, m.mean)).collect();
        let age = calculate_klemera_doubal_age(47.0, &panel);
        assert!((age - 47.0).abs() < 1e-9);
    }

    #[test]
    fn test_klemera_doubal_weighted_mean() {
        // Glucose one SD high, albumin one SD low, systolic at mean
        let panel = BiomarkerPanel::new()
            .with(Biomarker::Glucose, 116.0)
            .with(Biomarker::Albumin, 3.98)
            .with(Biomarker::SystolicBp, 122.0);

        // implied ages: 50 + 1/0.30, 50 + (-1)/(-0.25), 50; weights 0.09, 0.0625, 0.1225
        let expected = (0.09 * (50.0 + 1.0 / 0.30) + 0.0625 * 54.0 + 0.1225 * 50.0) / (0.09 + 0.0625 + 0.1225);
        let age = calculate_klemera_doubal_age(50.0, &panel);
        assert!((age - expected).abs() < 1e-9, "{} vs {}", age, expected);
    }

    #[test]
    fn test_klemera_doubal_two_markers_falls_back() {
        let panel = BiomarkerPanel::new()
            .with(Biomarker::Glucose, 140.0)
            .with(Biomarker::Hemoglobin, 13.0);
        assert_eq!(
            calculate_klemera_doubal_age(60.0, &panel),
            calculate_simplified_biological_age(60.0, &panel)
        );
    }

    #[test]
    fn test_metabolic_age_rules_stack() {
        let panel = BiomarkerPanel::new()
            .with(Biomarker::Glucose, 130.0) // +5
            .with(Biomarker::Hba1c, 6.0) // +3
            .with(Biomarker::Insulin, 2.0) // -1
            .with(Biomarker::Triglycerides, 250.0) // +2
            .with(Biomarker::HdlCholesterol, 65.0) // -2
            .with(Biomarker::LdlCholesterol, 170.0); // +3

        assert_eq!(calculate_metabolic_age(40.0, &panel, Some(31.0)), 40.0 + 5.0 + 3.0 - 1.0 + 2.0 - 2.0 + 3.0 + 3.0);
        assert_eq!(calculate_metabolic_age(40.0, &panel, None), 50.0);
    }

    #[test]
    fn test_metabolic_age_bmi_bands() {
        let panel = BiomarkerPanel::new();
        assert_eq!(calculate_metabolic_age(40.0, &panel, Some(22.0)), 40.0);
        assert_eq!(calculate_metabolic_age(40.0, &panel, Some(25.0)), 41.0);
        assert_eq!(calculate_metabolic_age(40.0, &panel, Some(30.0)), 41.0);
        assert_eq!(calculate_metabolic_age(40.0, &panel, Some(30.5)), 43.0);
        assert_eq!(calculate_metabolic_age(40.0, &panel, Some(17.0)), 41.0);
    }

    #[test]
    fn test_metabolic_age_is_clamped() {
        let panel = BiomarkerPanel::new()
            .with(Biomarker::Glucose, 200.0)
            .with(Biomarker::Hba1c, 9.0);
        assert_eq!(calculate_metabolic_age(118.0, &panel, None), MAX_AGE);

        let lean = BiomarkerPanel::new()
            .with(Biomarker::HdlCholesterol, 80.0)
            .with(Biomarker::Triglycerides, 60.0);
        assert_eq!(calculate_metabolic_age(1.0, &lean, None), MIN_AGE);
    }

    #[test]
    fn test_simplified_sparse_penalty() {
        assert_eq!(calculate_simplified_biological_age(30.0, &BiomarkerPanel::new()), 31.0);
        let panel = BiomarkerPanel::new().with(Biomarker::Glucose, 110.0);
        assert_eq!(calculate_simplified_biological_age(30.0, &panel), 32.0);
    }

    #[test]
    fn test_biological_age_complete_panel() {
        let patient = PatientData::new(50, Gender::Female, 165.0, 60.0)
            .with_blood_pressure(118.0, 76.0)
            .with_biomarkers(
                complete_phenotypic_panel()
                    .with(Biomarker::TotalCholesterol, 185.0)
                    .with(Biomarker::Hemoglobin, 13.8),
            );

        let result = calculate_biological_age(&patient);
        assert!(result.fallbacks.is_empty());
        assert_eq!(result.telomere_age, None);
        assert_eq!(result.estimates().len(), 3);
        assert_eq!(result.age_advantage, result.chronological_age - result.average_biological_age);
        assert!(result.is_younger_than_chronological());
    }

    #[test]
    fn test_biological_age_empty_panel_reports_fallbacks() {
        let patient = PatientData::new(35, Gender::Male, 180.0, 75.0);
        let result = calculate_biological_age(&patient);

        assert!(result.used_fallback(AgeMethod::Phenotypic));
        assert!(result.used_fallback(AgeMethod::KlemeraDoubal));
        assert!(!result.used_fallback(AgeMethod::Metabolic));
        // 36 (sparse penalty) twice and 35 metabolic
        assert!((result.average_biological_age - (36.0 + 36.0 + 35.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fallback_estimates_are_reported_as_values() {
        let patient = PatientData::new(35, Gender::Male, 180.0, 75.0);
        let result = calculate_biological_age(&patient);
        let simplified = calculate_simplified_biological_age(35.0, &BiomarkerPanel::new());

        assert_eq!(result.phenotypic_age, simplified);
        assert_eq!(result.klemera_doubal_age, simplified);
        assert_eq!(
            result.estimates(),
            vec![
                (AgeMethod::Phenotypic, simplified),
                (AgeMethod::KlemeraDoubal, simplified),
                (AgeMethod::Metabolic, 35.0),
            ]
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["phenotypic_age"], serde_json::json!(simplified));
        assert!(json["telomere_age"].is_null());

        let with_telomere = BiologicalAgeResult { telomere_age: Some(33.0), ..result };
        assert_eq!(with_telomere.estimates().len(), 4);
    }
}
