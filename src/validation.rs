//! Submission validator for the response page
//!
//! Required-ness is re-derived from the checked classification of every
//! block, never from the live `is_required` flags. Groups are scanned in
//! document order and the first unsatisfied one is recorded exactly once.

use crate::config::FormRules;
use crate::error::ResponseViolation;
use crate::state::{ChoiceField, QuestionBlock, ResponseForm};
use serde::Serialize;

/// A validation group on the response page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "group", content = "question", rename_all = "snake_case")]
pub enum GroupRef {
    /// Top-level familiarity fieldset
    Familiarity,
    /// Classification fieldset of a question
    Annotation(usize),
    /// Rating fieldset inside a question's container
    Rating(usize),
}

impl GroupRef {
    /// The radio group backing this validation group
    pub fn field<'a>(&self, form: &'a ResponseForm) -> Option<&'a ChoiceField> {
        match *self {
            GroupRef::Familiarity => form.familiarity.as_ref(),
            GroupRef::Annotation(index) => form.block(index).map(|b| &b.primary),
            GroupRef::Rating(index) => form
                .block(index)
                .and_then(|b| b.secondary.as_ref())
                .map(|g| &g.field),
        }
    }
}

/// Outcome of one submit attempt; recomputed every time
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormValidationResult {
    pub passed: bool,
    pub first_failing_group: Option<GroupRef>,
    /// Every unsatisfied group, in document order
    pub failures: Vec<(GroupRef, ResponseViolation)>,
}

impl FormValidationResult {
    fn record(&mut self, group: GroupRef, violation: ResponseViolation) {
        tracing::warn!(?group, "validation failed: {violation}");
        self.passed = false;
        if self.first_failing_group.is_none() {
            self.first_failing_group = Some(group);
        }
        self.failures.push((group, violation));
    }

    pub fn failing_groups(&self) -> impl Iterator<Item = GroupRef> + '_ {
        self.failures.iter().map(|(group, _)| *group)
    }
}

/// Check every required group of the response page
pub fn validate_response(form: &ResponseForm, rules: &FormRules) -> FormValidationResult {
    let mut result = FormValidationResult {
        passed: true,
        ..Default::default()
    };

    if let Some(familiarity) = &form.familiarity {
        if !familiarity.has_selection() {
            result.record(GroupRef::Familiarity, ResponseViolation::MissingFamiliarity);
        }
    }

    for block in &form.blocks {
        check_block(block, rules, &mut result);
    }

    result
}

fn check_block(block: &QuestionBlock, rules: &FormRules, result: &mut FormValidationResult) {
    let index = block.index;
    let Some(value) = block.primary.selected_value() else {
        result.record(
            GroupRef::Annotation(index),
            ResponseViolation::MissingAnnotation { index },
        );
        return;
    };
    if value != rules.trigger_value {
        return;
    }
    let Some(group) = &block.secondary else {
        tracing::error!(
            question = index,
            container = %rules.rating_container_id(index),
            "cannot find rating container for validation"
        );
        return;
    };
    if !group.field.has_selection() {
        result.record(
            GroupRef::Rating(index),
            ResponseViolation::MissingRating { index },
        );
    }
}
