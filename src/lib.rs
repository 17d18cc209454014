//! Stereotype quiz form controllers
//!
//! Keeps the two quiz pages consistent while a respondent works through them:
//! the selection page enforces "exactly N targets, never the native one", the
//! response page ties each rating to its classification, and both pages run
//! a final gate check on submit.

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod state;
pub mod surface;
pub mod validation;

pub use app::{App, PageEvent, PageSummary, Reaction, SubmissionPayload};
pub use config::{FormConfig, FormRules};
pub use document::Document;
pub use surface::{HeadlessSurface, Surface};
