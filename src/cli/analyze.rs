use std::path::Path;

use crate::config::DlpConfig;
use crate::detect::PatternEngine;
use crate::error::Result;
use crate::service::DlpService;

use super::{print_success, read_input};

/// Structured PII analysis. Prints the AnalysisResult as-is.
pub fn run_analyze(text: Option<String>, file: Option<&Path>) -> Result<()> {
    let input = read_input(text, file)?;
    let engine = PatternEngine::default_engine()?;
    let result = engine.analyze(&input)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Similarity decision against the persisted index.
pub async fn run_decide(config: &DlpConfig, text: Option<String>, file: Option<&Path>) -> Result<()> {
    let input = read_input(text, file)?;
    let service = DlpService::new(config)?;
    let result = service.decide_similarity(&input).await?;
    eprintln!(
        "dlp-guard: {} ({} flagged neighbor(s))",
        result.action,
        result.matches.len()
    );
    print_success(result)
}
