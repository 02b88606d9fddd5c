use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use dotenv::dotenv;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vital_age_domain::{AssessmentConfig, AssessmentForm, AssessmentService, AssessmentServiceTrait};

/// Read the questionnaire JSON from the path argument, or stdin when the
/// argument is absent or "-"
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            fs::read_to_string(path).with_context(|| format!("Failed to read assessment form from {}", path))
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read assessment form from stdin")?;
            Ok(buffer)
        }
    }
}

/// Score one questionnaire and print the report as JSON on stdout.
///
/// Usage: `vital_age [FORM.json]`. Logs go to stderr and are filtered
/// with `RUST_LOG`; `VITALAGE_RISK_CATEGORIES` limits the scored categories.
fn main() -> Result<()> {
    // Load environment variables from .env file
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    // Initialize tracing for structured logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(env_filter)
        .init();

    let path = std::env::args().nth(1);
    let config = AssessmentConfig::from_env().context("Invalid assessment configuration")?;
    debug!(categories = ?config.categories, "Using risk categories");

    let input = read_input(path.as_deref())?;
    let form: AssessmentForm = serde_json::from_str(&input).context("Assessment form is not valid JSON")?;

    let service = AssessmentService::from_config(&config);
    let report = service.assess_form(&form).context("Assessment form was rejected")?;

    if report.biological_age.fallbacks.len() > 1 {
        warn!(
            fallbacks = report.biological_age.fallbacks.len(),
            "Most biological age methods lacked data; estimates are approximate"
        );
    }
    if let Some(highest) = report.highest_risk() {
        info!(category = %highest.category, level = %highest.risk_level, "Highest risk");
    }

    let output = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", output);

    Ok(())
}
