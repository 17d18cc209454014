//! Error taxonomy for the form controllers
//!
//! Constraint violations are ordinary values handed back to the page; only
//! document loading can fail hard.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons the selection page refuses to submit
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionViolation {
    #[error("Please select exactly {capacity} states/UTs. You selected {selected}.")]
    WrongCount { capacity: usize, selected: usize },
    #[error("Your native state cannot be selected as a target state. Please uncheck it.")]
    NativeSelected { native: String },
}

/// Unsatisfied groups on the response page
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseViolation {
    #[error("familiarity rating missing")]
    MissingFamiliarity,
    #[error("annotation missing for question index {index}")]
    MissingAnnotation { index: usize },
    #[error("offensiveness rating missing for stereotype at question index {index}")]
    MissingRating { index: usize },
}

/// Failures while loading a markup document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question index {0} appears more than once")]
    DuplicateQuestion(usize),
    #[error("selectable item {0} appears more than once")]
    DuplicateItem(String),
}
