//! Published constants used by the scoring formulas.
//!
//! Kept as static tables so guideline updates touch one place.

use crate::entities::patient::{Biomarker, ClinicalSex};

/// One term of the phenotypic age linear predictor
#[derive(Debug, Clone, Copy)]
pub struct PhenotypicTerm {
    pub biomarker: Biomarker,
    pub coefficient: f64,
    /// Converts the panel's conventional unit into the unit the coefficient expects
    pub unit_scale: f64,
    /// Enter as ln(value + 1)
    pub log_transform: bool,
}

impl PhenotypicTerm {
    /// Contribution of one measured value to the linear predictor
    pub fn contribution(&self, value: f64) -> f64 {
        let scaled = value * self.unit_scale;
        let x = if self.log_transform { (scaled + 1.0).ln() } else { scaled };
        self.coefficient * x
    }
}

/// Levine et al. 2018, Aging 10(4):573-591
pub const PHENOTYPIC_TERMS: [PhenotypicTerm; 9] = [
    // g/dL -> g/L
    PhenotypicTerm { biomarker: Biomarker::Albumin, coefficient: -0.0336, unit_scale: 10.0, log_transform: false },
    // mg/dL -> µmol/L
    PhenotypicTerm { biomarker: Biomarker::Creatinine, coefficient: 0.0095, unit_scale: 88.42, log_transform: false },
    // mg/dL -> mmol/L
    PhenotypicTerm { biomarker: Biomarker::Glucose, coefficient: 0.1953, unit_scale: 1.0 / 18.0, log_transform: false },
    // mg/L as measured, ln(value + 1)
    PhenotypicTerm { biomarker: Biomarker::CReactiveProtein, coefficient: 0.0954, unit_scale: 1.0, log_transform: true },
    PhenotypicTerm { biomarker: Biomarker::LymphocytePercent, coefficient: -0.0120, unit_scale: 1.0, log_transform: false },
    PhenotypicTerm { biomarker: Biomarker::MeanCellVolume, coefficient: 0.0268, unit_scale: 1.0, log_transform: false },
    PhenotypicTerm { biomarker: Biomarker::RedCellDistributionWidth, coefficient: 0.3306, unit_scale: 1.0, log_transform: false },
    PhenotypicTerm { biomarker: Biomarker::AlkalinePhosphatase, coefficient: 0.00188, unit_scale: 1.0, log_transform: false },
    PhenotypicTerm { biomarker: Biomarker::WhiteBloodCells, coefficient: 0.0554, unit_scale: 1.0, log_transform: false },
];

pub const PHENOTYPIC_INTERCEPT: f64 = -19.907;
pub const PHENOTYPIC_AGE_COEFFICIENT: f64 = 0.0804;
/// Gompertz rate of the mortality model
pub const PHENOTYPIC_GAMMA: f64 = 0.0076927;
/// Mortality horizon of the model, months
pub const PHENOTYPIC_HORIZON_MONTHS: f64 = 120.0;

/// `age = OFFSET + ln(SCALE * ln(1 - e^score)) / RATE`
pub const PHENOTYPIC_INVERSE_OFFSET: f64 = 141.50;
pub const PHENOTYPIC_INVERSE_SCALE: f64 = -0.00553;
pub const PHENOTYPIC_INVERSE_RATE: f64 = 0.09165;

/// Klemera-Doubal biomarker with its age regression and population distribution
#[derive(Debug, Clone, Copy)]
pub struct KdmMarker {
    pub biomarker: Biomarker,
    /// Standardised change per year of age; negative for markers that fall with age
    pub coefficient: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl KdmMarker {
    /// Age implied by this marker alone
    pub fn implied_age(&self, chronological_age: f64, value: f64) -> f64 {
        let standardized = (value - self.mean) / self.std_dev;
        chronological_age + standardized / self.coefficient
    }

    /// Weight of the marker in the aggregate
    pub fn weight(&self) -> f64 {
        self.coefficient * self.coefficient
    }
}

/// Klemera & Doubal 2006; distributions from NHANES III adults
pub const KDM_MARKERS: [KdmMarker; 7] = [
    KdmMarker { biomarker: Biomarker::SystolicBp, coefficient: 0.35, mean: 122.0, std_dev: 17.0 },
    KdmMarker { biomarker: Biomarker::TotalCholesterol, coefficient: 0.25, mean: 195.0, std_dev: 38.0 },
    KdmMarker { biomarker: Biomarker::Glucose, coefficient: 0.30, mean: 98.0, std_dev: 18.0 },
    KdmMarker { biomarker: Biomarker::Creatinine, coefficient: 0.20, mean: 0.95, std_dev: 0.22 },
    KdmMarker { biomarker: Biomarker::Albumin, coefficient: -0.25, mean: 4.3, std_dev: 0.32 },
    KdmMarker { biomarker: Biomarker::Hemoglobin, coefficient: -0.15, mean: 14.2, std_dev: 1.4 },
    KdmMarker { biomarker: Biomarker::WhiteBloodCells, coefficient: 0.15, mean: 6.8, std_dev: 1.9 },
];

/// Sex-specific pooled cohort equation coefficients
#[derive(Debug, Clone, Copy)]
pub struct PooledCohortCoefficients {
    pub ln_age: f64,
    pub ln_age_squared: f64,
    pub ln_total_cholesterol: f64,
    pub ln_age_x_ln_total_cholesterol: f64,
    pub ln_hdl: f64,
    pub ln_age_x_ln_hdl: f64,
    pub ln_treated_systolic: f64,
    pub ln_untreated_systolic: f64,
    pub smoker: f64,
    pub ln_age_x_smoker: f64,
    pub diabetes: f64,
    pub baseline_survival: f64,
    pub mean_score: f64,
}

/// Inputs to the pooled cohort equations, already defaulted
#[derive(Debug, Clone, Copy)]
pub struct PooledCohortInputs {
    pub age: f64,
    pub total_cholesterol: f64,
    pub hdl_cholesterol: f64,
    pub systolic_bp: f64,
    pub treated_hypertension: bool,
    pub smoker: bool,
    pub diabetic: bool,
}

impl PooledCohortCoefficients {
    /// Individual sum of coefficient × value
    pub fn linear_score(&self, inputs: &PooledCohortInputs) -> f64 {
        let ln_age = inputs.age.ln();
        let ln_tc = inputs.total_cholesterol.ln();
        let ln_hdl = inputs.hdl_cholesterol.ln();
        let ln_sbp = inputs.systolic_bp.ln();
        let indicator = |flag: bool| if flag { 1.0 } else { 0.0 };

        let systolic_coefficient = if inputs.treated_hypertension {
            self.ln_treated_systolic
        } else {
            self.ln_untreated_systolic
        };

        self.ln_age * ln_age
            + self.ln_age_squared * ln_age * ln_age
            + self.ln_total_cholesterol * ln_tc
            + self.ln_age_x_ln_total_cholesterol * ln_age * ln_tc
            + self.ln_hdl * ln_hdl
            + self.ln_age_x_ln_hdl * ln_age * ln_hdl
            + systolic_coefficient * ln_sbp
            + (self.smoker + self.ln_age_x_smoker * ln_age) * indicator(inputs.smoker)
            + self.diabetes * indicator(inputs.diabetic)
    }

    /// Ten-year risk in percent for a linear score
    pub fn ten_year_risk(&self, score: f64) -> f64 {
        (1.0 - self.baseline_survival.powf((score - self.mean_score).exp())) * 100.0
    }
}

/// Goff et al. 2013 ACC/AHA pooled cohort equations, white men
pub const ASCVD_MALE: PooledCohortCoefficients = PooledCohortCoefficients {
    ln_age: 12.344,
    ln_age_squared: 0.0,
    ln_total_cholesterol: 11.853,
    ln_age_x_ln_total_cholesterol: -2.664,
    ln_hdl: -7.990,
    ln_age_x_ln_hdl: 1.769,
    ln_treated_systolic: 1.797,
    ln_untreated_systolic: 1.764,
    smoker: 7.837,
    ln_age_x_smoker: -1.795,
    diabetes: 0.658,
    baseline_survival: 0.9144,
    mean_score: 61.18,
};

/// Goff et al. 2013 ACC/AHA pooled cohort equations, white women
pub const ASCVD_FEMALE: PooledCohortCoefficients = PooledCohortCoefficients {
    ln_age: -29.799,
    ln_age_squared: 4.884,
    ln_total_cholesterol: 13.540,
    ln_age_x_ln_total_cholesterol: -3.114,
    ln_hdl: -13.578,
    ln_age_x_ln_hdl: 3.149,
    ln_treated_systolic: 2.019,
    ln_untreated_systolic: 1.957,
    smoker: 7.574,
    ln_age_x_smoker: -1.665,
    diabetes: 0.661,
    baseline_survival: 0.9665,
    mean_score: -29.18,
};

/// Coefficient set for a clinical sex
pub fn pooled_cohort_coefficients(sex: ClinicalSex) -> &'static PooledCohortCoefficients {
    match sex {
        ClinicalSex::Male => &ASCVD_MALE,
        ClinicalSex::Female => &ASCVD_FEMALE,
    }
}
