//! Error handling for marginminer
//!
//! Defines the typed failures that can leave the loader and configuration
//! layers, plus a unified Result type using anyhow for context chaining.
//! Formatting and input parsing never surface errors; they degrade locally.

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for screener operations
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("load error in {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for screener operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = ScreenerError::Config("missing data dir".to_string());
        assert_eq!(err.to_string(), "config error: missing data dir");
    }

    #[test]
    fn test_load_error_names_the_file() {
        let err = ScreenerError::Load {
            path: PathBuf::from("data/csv/fii/Tijolo.csv"),
            message: "ticker column not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Tijolo.csv"));
        assert!(msg.contains("ticker column not found"));
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(anyhow::anyhow!("original error")).context("failed to load dataset");
        match result {
            Err(e) => {
                assert!(e.to_string().contains("failed to load dataset"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("original error"));
            }
            Ok(_) => panic!("expected error"),
        }
    }
}
