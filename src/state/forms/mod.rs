//! Form domain layer
//!
//! Radio-style fields, the response page blocks and the controller that
//! keeps conditional ratings consistent with their classification.

mod field;
mod form_state;
mod requirement;

pub use field::{rating_scale, ChoiceField};
pub use form_state::{FormState, PrimaryChoice, QuestionBlock, RequirementGroup, ResponseForm};
pub use requirement::{wire_controllers, PrimaryChange, RequirementController};
