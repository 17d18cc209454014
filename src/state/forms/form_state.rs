//! Response page state and the per-page form enum

use super::field::ChoiceField;
use crate::state::SelectionState;
use serde::Serialize;

/// Classification a respondent gives an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimaryChoice {
    Stereotype,
    NotStereotype,
    NotSure,
}

impl PrimaryChoice {
    pub const ALL: [PrimaryChoice; 3] = [Self::Stereotype, Self::NotStereotype, Self::NotSure];

    /// Value submitted by the radio input
    pub fn as_value(&self) -> &'static str {
        match self {
            Self::Stereotype => "Stereotype",
            Self::NotStereotype => "Not a Stereotype",
            Self::NotSure => "Not sure",
        }
    }

    /// Radio options in page order
    pub fn options() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_value().to_string()).collect()
    }
}

/// Secondary rating that is only required for some classifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementGroup {
    /// Id of the container element
    pub container_id: String,
    pub field: ChoiceField,
    pub is_required: bool,
    pub is_visible: bool,
    /// Required-field asterisk in the legend
    pub marker_visible: bool,
}

impl RequirementGroup {
    pub fn new(container_id: &str, field: ChoiceField) -> Self {
        Self {
            container_id: container_id.to_string(),
            field,
            is_required: false,
            is_visible: false,
            marker_visible: false,
        }
    }

    /// Show the group and make it required
    pub fn activate(&mut self) {
        self.set_active(true);
    }

    /// Hide the group, drop the requirement and clear the whole selection
    pub fn deactivate(&mut self) {
        self.set_active(false);
        self.field.clear();
    }

    fn set_active(&mut self, active: bool) {
        self.is_required = active;
        self.is_visible = active;
        self.marker_visible = active;
        self.field.required = active;
    }
}

/// One quiz question: classification plus optional conditional rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBlock {
    pub index: usize,
    pub primary: ChoiceField,
    /// `None` when the page has no rating container for this question
    pub secondary: Option<RequirementGroup>,
}

impl QuestionBlock {
    pub fn new(index: usize, primary: ChoiceField, secondary: Option<RequirementGroup>) -> Self {
        Self {
            index,
            primary,
            secondary,
        }
    }

    /// Secondary rating value, if one is checked
    pub fn rating(&self) -> Option<&str> {
        self.secondary
            .as_ref()
            .and_then(|group| group.field.selected_value())
    }
}

/// All groups of the response page in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseForm {
    /// Top-level familiarity rating, absent on pages without it
    pub familiarity: Option<ChoiceField>,
    pub blocks: Vec<QuestionBlock>,
}

impl ResponseForm {
    pub fn new(familiarity: Option<ChoiceField>, blocks: Vec<QuestionBlock>) -> Self {
        Self {
            familiarity,
            blocks,
        }
    }

    pub fn block(&self, index: usize) -> Option<&QuestionBlock> {
        self.blocks.iter().find(|b| b.index == index)
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut QuestionBlock> {
        self.blocks.iter_mut().find(|b| b.index == index)
    }

    /// Question indices whose rating container is missing
    pub fn unwired_blocks(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .filter(|b| b.secondary.is_none())
            .map(|b| b.index)
            .collect()
    }
}

/// Enum representing the page currently loaded
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    None,
    Selection(SelectionState),
    Response(ResponseForm),
}

impl FormState {
    pub fn page_name(&self) -> &'static str {
        match self {
            FormState::None => "none",
            FormState::Selection(_) => "selection",
            FormState::Response(_) => "response",
        }
    }

    pub fn as_selection(&self) -> Option<&SelectionState> {
        match self {
            FormState::Selection(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_response(&self) -> Option<&ResponseForm> {
        match self {
            FormState::Response(r) => Some(r),
            _ => None,
        }
    }
}
