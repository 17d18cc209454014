//! Show/hide toggles for attribute subset regions

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// A "Show Details" button and the region it expands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetToggle {
    pub target_id: String,
    pub expanded: bool,
}

impl SubsetToggle {
    /// Regions start collapsed
    pub fn new(target_id: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            expanded: false,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn label(&self) -> &'static str {
        if self.expanded {
            "Hide Details"
        } else {
            "Show Details"
        }
    }

    /// `aria-expanded` on the button
    pub fn aria_expanded(&self) -> &'static str {
        if self.expanded {
            "true"
        } else {
            "false"
        }
    }

    /// `aria-hidden` on the region
    pub fn aria_hidden(&self) -> &'static str {
        if self.expanded {
            "false"
        } else {
            "true"
        }
    }
}

/// Serialized with the derived button label and aria attributes
impl Serialize for SubsetToggle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SubsetToggle", 5)?;
        state.serialize_field("target_id", &self.target_id)?;
        state.serialize_field("expanded", &self.expanded)?;
        state.serialize_field("label", self.label())?;
        state.serialize_field("aria_expanded", self.aria_expanded())?;
        state.serialize_field("aria_hidden", self.aria_hidden())?;
        state.end()
    }
}
