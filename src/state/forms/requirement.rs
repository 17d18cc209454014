//! Conditional requirement controller
//!
//! One controller per question block. It keeps the block's rating group
//! visible and required exactly while the classification equals the trigger
//! value, and clears the rating whenever the requirement goes away.

use super::form_state::{QuestionBlock, ResponseForm};
use crate::config::FormRules;

/// A change event raised inside a primary choice group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryChange {
    /// Question index of the fieldset the input belongs to
    pub question_index: usize,
    pub value: String,
    /// Whether the input is now checked
    pub checked: bool,
}

/// Watches a single block's primary choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementController {
    question_index: usize,
    trigger_value: String,
}

impl RequirementController {
    /// Wire a controller for a block.
    /// Returns `None` when the block has no rating container to drive.
    pub fn wire(block: &QuestionBlock, rules: &FormRules) -> Option<Self> {
        if block.secondary.is_none() {
            tracing::debug!(
                question = block.index,
                container = %rules.rating_container_id(block.index),
                "rating container not found, skipping wiring"
            );
            return None;
        }
        Some(Self {
            question_index: block.index,
            trigger_value: rules.trigger_value.clone(),
        })
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Evaluate whatever the block was loaded with (e.g. restored by the
    /// browser's history navigation).
    pub fn initialize(&self, block: &mut QuestionBlock) {
        self.apply(block);
    }

    /// Handle a change event. Returns false if the event does not belong to
    /// this block or names a value the group does not offer.
    ///
    /// The requirement follows the block's resulting selection, so unchecking
    /// a value that was not selected leaves it untouched.
    pub fn on_change(&self, block: &mut QuestionBlock, change: &PrimaryChange) -> bool {
        if change.question_index != self.question_index || block.index != self.question_index {
            return false;
        }
        if !block.primary.has_option(&change.value) {
            return false;
        }
        if change.checked {
            block.primary.select(&change.value);
        } else if block.primary.is_selected(&change.value) {
            block.primary.clear();
        }
        self.apply(block);
        true
    }

    fn apply(&self, block: &mut QuestionBlock) {
        let triggered = block.primary.is_selected(&self.trigger_value);
        let Some(group) = block.secondary.as_mut() else {
            return;
        };
        if triggered {
            group.activate();
        } else {
            group.deactivate();
        }
        tracing::debug!(
            question = self.question_index,
            required = group.is_required,
            "rating requirement updated"
        );
    }
}

/// Wire and initialize a controller for every block that has a container
pub fn wire_controllers(form: &mut ResponseForm, rules: &FormRules) -> Vec<RequirementController> {
    form.blocks
        .iter_mut()
        .filter_map(|block| {
            let controller = RequirementController::wire(block, rules)?;
            controller.initialize(block);
            Some(controller)
        })
        .collect()
}
