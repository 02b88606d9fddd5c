// Testing fixtures for the domain layer
// Only available in unit tests or with the "mock" feature

use crate::entities::patient::{Biomarker, BiomarkerPanel, Gender, Lifestyle, PatientData};

/// All nine phenotypic age markers at healthy values
pub fn complete_phenotypic_panel() -> BiomarkerPanel {
    BiomarkerPanel::new()
        .with(Biomarker::Albumin, 4.5)
        .with(Biomarker::Creatinine, 0.9)
        .with(Biomarker::Glucose, 90.0)
        .with(Biomarker::CReactiveProtein, 1.0)
        .with(Biomarker::LymphocytePercent, 30.0)
        .with(Biomarker::MeanCellVolume, 90.0)
        .with(Biomarker::RedCellDistributionWidth, 13.0)
        .with(Biomarker::AlkalinePhosphatase, 70.0)
        .with(Biomarker::WhiteBloodCells, 6.0)
}

/// All nine phenotypic age markers at markedly abnormal values
pub fn unhealthy_phenotypic_panel() -> BiomarkerPanel {
    BiomarkerPanel::new()
        .with(Biomarker::Albumin, 3.2)
        .with(Biomarker::Creatinine, 2.0)
        .with(Biomarker::Glucose, 200.0)
        .with(Biomarker::CReactiveProtein, 20.0)
        .with(Biomarker::LymphocytePercent, 15.0)
        .with(Biomarker::MeanCellVolume, 100.0)
        .with(Biomarker::RedCellDistributionWidth, 17.0)
        .with(Biomarker::AlkalinePhosphatase, 150.0)
        .with(Biomarker::WhiteBloodCells, 11.0)
}

/// Normal-weight, normotensive non-smoker with an unremarkable panel
pub fn healthy_adult(age: u32, gender: Gender) -> PatientData {
    let panel = complete_phenotypic_panel()
        .with(Biomarker::TotalCholesterol, 180.0)
        .with(Biomarker::HdlCholesterol, 60.0)
        .with(Biomarker::LdlCholesterol, 100.0)
        .with(Biomarker::Triglycerides, 90.0)
        .with(Biomarker::Hemoglobin, 14.0)
        .with(Biomarker::Egfr, 95.0)
        .with(Biomarker::AlbuminCreatinineRatio, 10.0)
        .with(Biomarker::WaistCircumference, 78.0)
        .with(Biomarker::Smoking, 0.0)
        .with(Biomarker::Diabetes, 0.0)
        .with(Biomarker::BpMedication, 0.0);

    PatientData::new(age, gender, 170.0, 65.0)
        .with_blood_pressure(118.0, 76.0)
        .with_biomarkers(panel)
}

/// Older obese hypertensive smoker with impaired kidney function
pub fn high_risk_male() -> (PatientData, Lifestyle) {
    let panel = BiomarkerPanel::new()
        .with(Biomarker::WaistCircumference, 105.0)
        .with(Biomarker::Glucose, 110.0)
        .with(Biomarker::BpMedication, 1.0)
        .with(Biomarker::TotalCholesterol, 240.0)
        .with(Biomarker::HdlCholesterol, 35.0)
        .with(Biomarker::Smoking, 1.0)
        .with(Biomarker::Egfr, 25.0)
        .with(Biomarker::AlbuminCreatinineRatio, 400.0)
        .with(Biomarker::Triglycerides, 220.0)
        .with(Biomarker::CReactiveProtein, 5.0);

    let patient = PatientData::new(70, Gender::Male, 175.0, 98.0)
        .with_blood_pressure(150.0, 95.0)
        .with_biomarkers(panel);

    let lifestyle = Lifestyle {
        exercise_days_per_week: Some(0.0),
        family_history_diabetes: true,
        ..Default::default()
    };

    (patient, lifestyle)
}
