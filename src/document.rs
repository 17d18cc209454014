//! Markup document model
//!
//! A document describes the inputs a rendered page exposes: the native
//! select and checkbox group on the selection page, or the familiarity
//! fieldset, question fieldsets, rating containers and subset toggles on the
//! response page. Loading it produces the owned form state.

use crate::config::FormRules;
use crate::error::DocumentError;
use crate::state::{
    rating_scale, ChoiceField, FormState, PrimaryChoice, QuestionBlock, RequirementGroup,
    ResponseForm, SelectableItem, SelectionState, SubsetToggle,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

pub const FAMILIARITY_INPUT_NAME: &str = "familiarity_rating";
pub const NATIVE_INPUT_NAME: &str = "native_state";
pub const QUESTION_COUNT_INPUT_NAME: &str = "num_quiz_items";

pub fn annotation_input_name(index: usize) -> String {
    format!("annotation_{index}")
}

pub fn rating_input_name(index: usize) -> String {
    format!("offensiveness_{index}")
}

/// A page as served to the respondent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Document {
    Selection(SelectionDocument),
    Response(ResponseDocument),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDocument {
    /// Current value of the native select; empty when unset
    #[serde(default)]
    pub native_value: String,
    pub items: Vec<ItemMarkup>,
}

/// One checkbox input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMarkup {
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    /// Input name; defaults to the selection group name
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDocument {
    #[serde(default)]
    pub familiarity: Option<RadioMarkup>,
    pub questions: Vec<QuestionMarkup>,
    /// Rating containers, matched to questions by id
    #[serde(default)]
    pub containers: Vec<ContainerMarkup>,
    #[serde(default)]
    pub toggles: Vec<ToggleMarkup>,
    /// Ids of the subset regions toggles can expand
    #[serde(default)]
    pub regions: Vec<String>,
}

/// A radio group; options default to the 0-5 scale
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RadioMarkup {
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMarkup {
    pub index: usize,
    /// Classification options; default to the three standard ones
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMarkup {
    pub id: String,
    #[serde(flatten)]
    pub rating: RadioMarkup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleMarkup {
    pub target: String,
}

/// Everything built from a document
#[derive(Debug, Clone, Default)]
pub struct LoadedPage {
    pub form: FormState,
    pub toggles: Vec<SubsetToggle>,
    pub regions: BTreeSet<String>,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Build the owned form state. Controllers are not run here.
    pub fn build(&self, rules: &FormRules) -> Result<LoadedPage, DocumentError> {
        match self {
            Document::Selection(doc) => Ok(LoadedPage {
                form: FormState::Selection(doc.build(rules)?),
                ..Default::default()
            }),
            Document::Response(doc) => doc.build(rules),
        }
    }
}

impl SelectionDocument {
    fn build(&self, rules: &FormRules) -> Result<SelectionState, DocumentError> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for markup in &self.items {
            let name = markup
                .name
                .as_deref()
                .unwrap_or(&rules.selection_input_name);
            if name != rules.selection_input_name {
                tracing::debug!(value = %markup.value, name, "checkbox outside selection group");
                continue;
            }
            if !seen.insert(markup.value.as_str()) {
                return Err(DocumentError::DuplicateItem(markup.value.clone()));
            }
            items.push(SelectableItem {
                is_checked: markup.checked,
                ..SelectableItem::new(&markup.value)
            });
        }
        Ok(SelectionState::new(items, &self.native_value, rules.capacity))
    }
}

impl RadioMarkup {
    fn field(&self, name: &str, default_options: impl FnOnce() -> Vec<String>) -> ChoiceField {
        let options = self.options.clone().unwrap_or_else(default_options);
        ChoiceField::with_selected(name, options, self.selected.clone())
    }
}

impl ResponseDocument {
    fn build(&self, rules: &FormRules) -> Result<LoadedPage, DocumentError> {
        let containers: HashMap<&str, &ContainerMarkup> = self
            .containers
            .iter()
            .map(|c| (c.id.as_str(), c))
            .collect();

        let mut indices = HashSet::new();
        let mut blocks = Vec::with_capacity(self.questions.len());
        for question in &self.questions {
            if !indices.insert(question.index) {
                return Err(DocumentError::DuplicateQuestion(question.index));
            }
            let primary = ChoiceField::with_selected(
                &annotation_input_name(question.index),
                question.options.clone().unwrap_or_else(PrimaryChoice::options),
                question.selected.clone(),
            );
            let container_id = rules.rating_container_id(question.index);
            let secondary = containers.get(container_id.as_str()).map(|c| {
                RequirementGroup::new(
                    &container_id,
                    c.rating
                        .field(&rating_input_name(question.index), rating_scale),
                )
            });
            blocks.push(QuestionBlock::new(question.index, primary, secondary));
        }

        let familiarity = self
            .familiarity
            .as_ref()
            .map(|markup| markup.field(FAMILIARITY_INPUT_NAME, rating_scale));

        Ok(LoadedPage {
            form: FormState::Response(ResponseForm::new(familiarity, blocks)),
            toggles: self
                .toggles
                .iter()
                .map(|t| SubsetToggle::new(&t.target))
                .collect(),
            regions: self.regions.iter().cloned().collect(),
        })
    }
}
