//! Radio-style field value objects

use serde::Serialize;

/// Options of a 0-5 rating scale
pub fn rating_scale() -> Vec<String> {
    (0..=5).map(|n| n.to_string()).collect()
}

/// A group of mutually exclusive options sharing one input name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceField {
    pub name: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub required: bool,
}

impl ChoiceField {
    /// Create a new field with nothing selected
    pub fn new(name: &str, options: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            options,
            selected: None,
            required: false,
        }
    }

    /// Create a new field with an initial selection (e.g. restored by history navigation)
    ///
    /// A value that is not one of the options is dropped.
    pub fn with_selected(name: &str, options: Vec<String>, selected: Option<String>) -> Self {
        let mut field = Self::new(name, options);
        if let Some(value) = selected {
            field.select(&value);
        }
        field
    }

    /// Whether a value is one of this field's options
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }

    /// Check an option, unchecking whatever was checked before.
    /// Returns false if the value is not an option.
    pub fn select(&mut self, value: &str) -> bool {
        if !self.has_option(value) {
            return false;
        }
        self.selected = Some(value.to_string());
        true
    }

    /// Uncheck every option
    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.as_deref() == Some(value)
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// First interactive control of the group, used as a focus target
    pub fn first_option(&self) -> Option<&str> {
        self.options.first().map(String::as_str)
    }
}
