use crate::entities::patient::{Biomarker, ClinicalSex, Lifestyle, PatientData};
use crate::entities::risk::{DiseaseCategory, RiskAssessment, RiskLevel};
use crate::services::disease_risk::RiskScorer;

const REFERENCE: &str = "NCEP ATP III criteria (Grundy SM et al. Circulation 2005;112:2735-2752); \
ten-year figure is an approximation by criteria count";

/// Ten-year proxy by number of criteria met (0 to 5)
const PROXY_RISK_BY_COUNT: [f64; 6] = [2.0, 5.0, 10.0, 20.0, 30.0, 40.0];

/// ATP III criteria; `None` when the criterion cannot be assessed
pub fn metabolic_syndrome_criteria(patient: &PatientData) -> [Option<bool>; 5] {
    let panel = &patient.biomarkers;
    let sex = patient.clinical_sex();

    let (waist_cutoff, hdl_cutoff) = match sex {
        ClinicalSex::Male => (102.0, 40.0),
        ClinicalSex::Female => (88.0, 50.0),
    };

    let waist = panel.get(Biomarker::WaistCircumference).map(|w| w > waist_cutoff);
    let triglycerides = panel.get(Biomarker::Triglycerides).map(|tg| tg >= 150.0);
    let hdl = panel.get(Biomarker::HdlCholesterol).map(|h| h < hdl_cutoff);

    let systolic = patient.systolic();
    let diastolic = patient.diastolic();
    let blood_pressure = if systolic.is_some() || diastolic.is_some() || panel.contains(Biomarker::BpMedication) {
        Some(
            systolic.map_or(false, |s| s >= 130.0)
                || diastolic.map_or(false, |d| d >= 85.0)
                || panel.flag(Biomarker::BpMedication),
        )
    } else {
        None
    };

    let glucose = match (panel.get(Biomarker::Glucose), panel.contains(Biomarker::Diabetes)) {
        (None, false) => None,
        (value, _) => Some(value.map_or(false, |g| g >= 100.0) || panel.flag(Biomarker::Diabetes)),
    };

    [waist, triglycerides, hdl, blood_pressure, glucose]
}

/// Classify a count of criteria met
pub fn metabolic_syndrome_level(criteria_met: usize) -> RiskLevel {
    match criteria_met {
        0..=1 => RiskLevel::Low,
        2 => RiskLevel::Moderate,
        3..=4 => RiskLevel::High,
        _ => RiskLevel::VeryHigh,
    }
}

/// Metabolic syndrome risk. Unassessable criteria count as not met.
pub fn calculate_metabolic_syndrome_risk(patient: &PatientData) -> RiskAssessment {
    let criteria = metabolic_syndrome_criteria(patient);
    let assessable = criteria.iter().filter(|c| c.is_some()).count();
    if assessable == 0 {
        return RiskAssessment::insufficient_data(
            DiseaseCategory::MetabolicSyndrome,
            "NCEP ATP III (no criteria assessable)",
            REFERENCE,
        );
    }

    let met = criteria.iter().filter(|c| **c == Some(true)).count();

    RiskAssessment::new(
        DiseaseCategory::MetabolicSyndrome,
        met as f64,
        metabolic_syndrome_level(met),
        PROXY_RISK_BY_COUNT[met.min(5)],
        format!("NCEP ATP III ({} of 5 criteria assessable)", assessable),
        REFERENCE,
    )
}

/// Metabolic syndrome scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct MetabolicSyndromeScorer;

impl RiskScorer for MetabolicSyndromeScorer {
    fn category(&self) -> DiseaseCategory {
        DiseaseCategory::MetabolicSyndrome
    }

    fn assess(&self, patient: &PatientData, _lifestyle: &Lifestyle) -> RiskAssessment {
        calculate_metabolic_syndrome_risk(patient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::patient::{BiomarkerPanel, Gender};

    #[test]
    fn test_no_criteria_assessable() {
        let patient = PatientData::new(45, Gender::Male, 180.0, 80.0);
        let result = calculate_metabolic_syndrome_risk(&patient);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.ten_year_risk, 0.0);
        assert!(result.algorithm_used.contains("no criteria"));
    }

    #[test]
    fn test_full_syndrome() {
        let patient = PatientData::new(55, Gender::Female, 162.0, 85.0)
            .with_blood_pressure(135.0, 80.0)
            .with_biomarkers(
                BiomarkerPanel::new()
                    .with(Biomarker::WaistCircumference, 96.0)
                    .with(Biomarker::Triglycerides, 180.0)
                    .with(Biomarker::HdlCholesterol, 45.0)
                    .with(Biomarker::Glucose, 104.0),
            );

        let result = calculate_metabolic_syndrome_risk(&patient);
        assert_eq!(result.risk_score, 5.0);
        assert_eq!(result.risk_level, RiskLevel::VeryHigh);
        assert_eq!(result.ten_year_risk, 40.0);
        assert_eq!(result.algorithm_used, "NCEP ATP III (5 of 5 criteria assessable)");
    }

    #[test]
    fn test_hdl_cutoff_is_sex_specific() {
        let panel = BiomarkerPanel::new().with(Biomarker::HdlCholesterol, 45.0);
        let male = PatientData::new(50, Gender::Male, 180.0, 80.0).with_biomarkers(panel.clone());
        let female = PatientData::new(50, Gender::Female, 165.0, 60.0).with_biomarkers(panel);

        assert_eq!(metabolic_syndrome_criteria(&male)[2], Some(false));
        assert_eq!(metabolic_syndrome_criteria(&female)[2], Some(true));
    }

    #[test]
    fn test_partial_assessment() {
        let patient = PatientData::new(50, Gender::Male, 180.0, 80.0).with_biomarkers(
            BiomarkerPanel::new()
                .with(Biomarker::Triglycerides, 210.0)
                .with(Biomarker::Diabetes, 1.0),
        );
        let result = calculate_metabolic_syndrome_risk(&patient);
        assert_eq!(result.risk_score, 2.0);
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert!(result.algorithm_used.contains("2 of 5"));
    }
}
