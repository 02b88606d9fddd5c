use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Patient gender as recorded on the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Any other answer, including "prefer not to say"
    Other,
}

/// Coefficient branch of a sex-specific clinical equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalSex {
    /// Male coefficients
    Male,
    /// Female coefficients
    Female,
}

/// Branch used for `Gender::Other`.
///
/// The published equations only define male and female coefficients.
pub const OTHER_GENDER_BRANCH: ClinicalSex = ClinicalSex::Female;

impl Gender {
    /// Select the coefficient branch for sex-specific formulas
    pub fn coefficient_branch(self) -> ClinicalSex {
        match self {
            Gender::Male => ClinicalSex::Male,
            Gender::Female => ClinicalSex::Female,
            Gender::Other => OTHER_GENDER_BRANCH,
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "non-binary" | "nonbinary" | "x" => Ok(Gender::Other),
            other => Err(format!("Unrecognised gender: {}", other)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

/// Fixed biomarker vocabulary accepted by the scoring engine.
///
/// Values are expected in conventional US units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biomarker {
    /// Fasting glucose, mg/dL
    Glucose,
    /// Glycated haemoglobin, %
    Hba1c,
    /// Fasting insulin, µIU/mL
    Insulin,
    /// mg/dL
    TotalCholesterol,
    /// mg/dL
    HdlCholesterol,
    /// mg/dL
    LdlCholesterol,
    /// mg/dL
    Triglycerides,
    /// Serum creatinine, mg/dL
    Creatinine,
    /// mL/min/1.73m²
    Egfr,
    /// Serum albumin, g/dL
    Albumin,
    /// Urine albumin-to-creatinine ratio, mg/g
    AlbuminCreatinineRatio,
    /// mg/L
    CReactiveProtein,
    /// 10³ cells/µL
    WhiteBloodCells,
    /// %
    LymphocytePercent,
    /// g/dL
    Hemoglobin,
    /// fL
    MeanCellVolume,
    /// %
    RedCellDistributionWidth,
    /// U/L
    AlkalinePhosphatase,
    /// mmHg
    SystolicBp,
    /// mmHg
    DiastolicBp,
    /// Current smoker flag (1 = yes)
    Smoking,
    /// Diagnosed diabetes flag (1 = yes)
    Diabetes,
    /// Antihypertensive medication flag (1 = yes)
    BpMedication,
    /// cm
    WaistCircumference,
    /// Urine protein, mg/g
    Proteinuria,
}

impl Biomarker {
    /// Every biomarker in the vocabulary
    pub const ALL: [Biomarker; 25] = [
        Biomarker::Glucose,
        Biomarker::Hba1c,
        Biomarker::Insulin,
        Biomarker::TotalCholesterol,
        Biomarker::HdlCholesterol,
        Biomarker::LdlCholesterol,
        Biomarker::Triglycerides,
        Biomarker::Creatinine,
        Biomarker::Egfr,
        Biomarker::Albumin,
        Biomarker::AlbuminCreatinineRatio,
        Biomarker::CReactiveProtein,
        Biomarker::WhiteBloodCells,
        Biomarker::LymphocytePercent,
        Biomarker::Hemoglobin,
        Biomarker::MeanCellVolume,
        Biomarker::RedCellDistributionWidth,
        Biomarker::AlkalinePhosphatase,
        Biomarker::SystolicBp,
        Biomarker::DiastolicBp,
        Biomarker::Smoking,
        Biomarker::Diabetes,
        Biomarker::BpMedication,
        Biomarker::WaistCircumference,
        Biomarker::Proteinuria,
    ];

    /// Canonical snake_case name
    pub fn name(self) -> &'static str {
        match self {
            Biomarker::Glucose => "glucose",
            Biomarker::Hba1c => "hba1c",
            Biomarker::Insulin => "insulin",
            Biomarker::TotalCholesterol => "total_cholesterol",
            Biomarker::HdlCholesterol => "hdl_cholesterol",
            Biomarker::LdlCholesterol => "ldl_cholesterol",
            Biomarker::Triglycerides => "triglycerides",
            Biomarker::Creatinine => "creatinine",
            Biomarker::Egfr => "egfr",
            Biomarker::Albumin => "albumin",
            Biomarker::AlbuminCreatinineRatio => "albumin_creatinine_ratio",
            Biomarker::CReactiveProtein => "c_reactive_protein",
            Biomarker::WhiteBloodCells => "white_blood_cells",
            Biomarker::LymphocytePercent => "lymphocyte_percent",
            Biomarker::Hemoglobin => "hemoglobin",
            Biomarker::MeanCellVolume => "mean_cell_volume",
            Biomarker::RedCellDistributionWidth => "red_cell_distribution_width",
            Biomarker::AlkalinePhosphatase => "alkaline_phosphatase",
            Biomarker::SystolicBp => "systolic_bp",
            Biomarker::DiastolicBp => "diastolic_bp",
            Biomarker::Smoking => "smoking",
            Biomarker::Diabetes => "diabetes",
            Biomarker::BpMedication => "bp_medication",
            Biomarker::WaistCircumference => "waist_circumference",
            Biomarker::Proteinuria => "proteinuria",
        }
    }
}

impl FromStr for Biomarker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        // Common lab-report abbreviations
        let canonical = match key.as_str() {
            "crp" => "c_reactive_protein",
            "hdl" => "hdl_cholesterol",
            "ldl" => "ldl_cholesterol",
            "wbc" => "white_blood_cells",
            "mcv" => "mean_cell_volume",
            "rdw" => "red_cell_distribution_width",
            "alp" => "alkaline_phosphatase",
            "acr" => "albumin_creatinine_ratio",
            other => other,
        };

        Biomarker::ALL
            .iter()
            .copied()
            .find(|marker| marker.name() == canonical)
            .ok_or_else(|| format!("Unknown biomarker: {}", s))
    }
}

impl fmt::Display for Biomarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Biomarker measurements for one assessment.
///
/// A missing entry means "not measured" and is distinct from zero. Only
/// finite, non-negative values are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Biomarker, f64>", into = "BTreeMap<Biomarker, f64>")]
pub struct BiomarkerPanel {
    values: BTreeMap<Biomarker, f64>,
}

impl BiomarkerPanel {
    /// Create an empty panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`BiomarkerPanel::set`]
    pub fn with(mut self, marker: Biomarker, value: f64) -> Self {
        self.set(marker, value);
        self
    }

    /// Record a measurement. Malformed values (NaN, infinite, negative)
    /// are treated as absent and clear any previous entry.
    ///
    /// Returns whether the value was stored.
    pub fn set(&mut self, marker: Biomarker, value: f64) -> bool {
        if value.is_finite() && value >= 0.0 {
            self.values.insert(marker, value);
            true
        } else {
            debug!(biomarker = %marker, value, "Discarding malformed biomarker value");
            self.values.remove(&marker);
            false
        }
    }

    /// Get a measurement
    pub fn get(&self, marker: Biomarker) -> Option<f64> {
        self.values.get(&marker).copied()
    }

    /// Whether a measurement is present
    pub fn contains(&self, marker: Biomarker) -> bool {
        self.values.contains_key(&marker)
    }

    /// Read a yes/no biomarker. Absent counts as "no".
    pub fn flag(&self, marker: Biomarker) -> bool {
        self.get(marker).map_or(false, |v| v > 0.0)
    }

    /// Number of measurements present in the whole panel
    pub fn present_count(&self) -> usize {
        self.values.len()
    }

    /// Number of the given biomarkers that are present
    pub fn count_present(&self, markers: &[Biomarker]) -> usize {
        markers.iter().filter(|m| self.contains(**m)).count()
    }
}

impl FromIterator<(Biomarker, f64)> for BiomarkerPanel {
    fn from_iter<I: IntoIterator<Item = (Biomarker, f64)>>(iter: I) -> Self {
        let mut panel = BiomarkerPanel::new();
        for (marker, value) in iter {
            panel.set(marker, value);
        }
        panel
    }
}

// Deserialised maps go through `set` so malformed values are dropped
impl From<BTreeMap<Biomarker, f64>> for BiomarkerPanel {
    fn from(values: BTreeMap<Biomarker, f64>) -> Self {
        values.into_iter().collect()
    }
}

impl From<BiomarkerPanel> for BTreeMap<Biomarker, f64> {
    fn from(panel: BiomarkerPanel) -> Self {
        panel.values
    }
}

/// Demographics, vital signs and biomarkers of one patient at assessment time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientData {
    /// Chronological age in whole years
    pub age: u32,

    /// Questionnaire gender
    pub gender: Gender,

    /// Height in centimetres
    pub height_cm: f64,

    /// Weight in kilograms
    pub weight_kg: f64,

    /// Measured systolic blood pressure, mmHg
    pub systolic_bp: Option<f64>,

    /// Measured diastolic blood pressure, mmHg
    pub diastolic_bp: Option<f64>,

    /// Laboratory panel and questionnaire flags
    pub biomarkers: BiomarkerPanel,
}

impl PatientData {
    /// Create a patient record without vitals or biomarkers
    pub fn new(age: u32, gender: Gender, height_cm: f64, weight_kg: f64) -> Self {
        Self {
            age,
            gender,
            height_cm,
            weight_kg,
            systolic_bp: None,
            diastolic_bp: None,
            biomarkers: BiomarkerPanel::new(),
        }
    }

    /// Set the measured blood pressure
    pub fn with_blood_pressure(mut self, systolic: f64, diastolic: f64) -> Self {
        self.systolic_bp = Some(systolic);
        self.diastolic_bp = Some(diastolic);
        self
    }

    /// Replace the biomarker panel
    pub fn with_biomarkers(mut self, biomarkers: BiomarkerPanel) -> Self {
        self.biomarkers = biomarkers;
        self
    }

    /// Chronological age as a float, bounded to [0, 120]
    pub fn age_years(&self) -> f64 {
        f64::from(self.age.min(120))
    }

    /// Body mass index, or `None` when height or weight is unusable
    pub fn bmi(&self) -> Option<f64> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.height_cm) || !valid(self.weight_kg) {
            return None;
        }
        let height_m = self.height_cm / 100.0;
        Some(self.weight_kg / (height_m * height_m))
    }

    /// Systolic pressure from the vitals, falling back to the panel
    pub fn systolic(&self) -> Option<f64> {
        usable(self.systolic_bp).or_else(|| self.biomarkers.get(Biomarker::SystolicBp))
    }

    /// Diastolic pressure from the vitals, falling back to the panel
    pub fn diastolic(&self) -> Option<f64> {
        usable(self.diastolic_bp).or_else(|| self.biomarkers.get(Biomarker::DiastolicBp))
    }

    /// Coefficient branch for sex-specific equations
    pub fn clinical_sex(&self) -> ClinicalSex {
        self.gender.coefficient_branch()
    }

    /// The biomarker panel with the measured vitals written over its
    /// blood pressure entries, matching [`PatientData::systolic`]
    pub fn effective_panel(&self) -> BiomarkerPanel {
        let mut panel = self.biomarkers.clone();
        if let Some(systolic) = self.systolic() {
            panel.set(Biomarker::SystolicBp, systolic);
        }
        if let Some(diastolic) = self.diastolic() {
            panel.set(Biomarker::DiastolicBp, diastolic);
        }
        panel
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Self-reported lifestyle answers used by some risk scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lifestyle {
    /// Days per week with at least 30 minutes of physical activity
    pub exercise_days_per_week: Option<f64>,

    /// Self-rated diet quality, 1 (poor) to 5 (excellent)
    pub diet_quality: Option<u8>,

    /// Alcoholic drinks per week
    pub alcohol_drinks_per_week: Option<f64>,

    /// Completed years of formal education
    pub education_years: Option<f64>,

    /// First-degree relative with diabetes
    #[serde(default)]
    pub family_history_diabetes: bool,

    /// First-degree relative with cancer
    #[serde(default)]
    pub family_history_cancer: bool,

    /// First-degree relative with stroke
    #[serde(default)]
    pub family_history_stroke: bool,
}

impl Lifestyle {
    /// Reported activity below `min_days` per week. Unreported is not sedentary.
    pub fn is_less_active_than(&self, min_days: f64) -> bool {
        self.exercise_days_per_week.map_or(false, |days| days < min_days)
    }

    /// Diet self-rated below average
    pub fn has_poor_diet(&self) -> bool {
        self.diet_quality.map_or(false, |quality| quality < 3)
    }
}
