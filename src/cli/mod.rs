pub mod analyze;
pub mod extract;
pub mod index;

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::DlpConfig;
use crate::error::{DlpError, Result};

/// Caller-facing result envelope printed on stdout.
#[derive(Debug, Serialize)]
pub struct Report<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

/// Body of an index operation report.
#[derive(Debug, Serialize)]
pub struct FilesBody {
    pub files: Vec<String>,
    pub message: String,
}

/// Body of a failure report.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Print a success report as pretty JSON.
pub fn print_success<T: Serialize>(body: T) -> Result<()> {
    let report = Report {
        success: true,
        body,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print a failure report as pretty JSON.
pub fn print_failure(error: &DlpError) {
    let report = Report {
        success: false,
        body: ErrorBody {
            error: error.to_string(),
        },
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(_) => println!(r#"{{"success": false}}"#),
    }
}

/// Load config from an explicit path, else from the working directory.
pub fn load_config(path: Option<&Path>) -> Result<DlpConfig> {
    match path {
        Some(p) => {
            if !p.exists() {
                return Err(DlpError::ConfigParse {
                    path: p.to_path_buf(),
                    reason: "file not found".into(),
                });
            }
            DlpConfig::load_from(p)
        }
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            DlpConfig::load_project(&cwd)
        }
    }
}

/// Input text from the argument, a file, or stdin, in that order.
pub fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(file) = file {
        return Ok(std::fs::read_to_string(file)?);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
