//! Target selection state for the index page
//!
//! The respondent picks exactly `capacity` items while the item equal to the
//! chosen native value stays unchecked and disabled. Every change runs the
//! same full recompute, so the order of native changes and item toggles does
//! not matter.

use crate::error::SelectionViolation;
use serde::Serialize;

/// One checkbox in the selection group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectableItem {
    pub id: String,
    /// Equal to the current native value; never checked while set
    pub is_reserved_excluded: bool,
    pub is_checked: bool,
    pub is_disabled: bool,
}

impl SelectableItem {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            is_reserved_excluded: false,
            is_checked: false,
            is_disabled: false,
        }
    }

    pub fn checked(id: &str) -> Self {
        Self {
            is_checked: true,
            ..Self::new(id)
        }
    }
}

/// Derived readout after a recompute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub checked_count: usize,
    pub capacity: usize,
    /// "Selected: <count> / <capacity>"
    pub progress_text: String,
    /// Progress is shown in the "complete" colour
    pub progress_complete: bool,
    pub submit_enabled: bool,
    /// Why the submit control is disabled
    pub submit_reason: Option<String>,
}

/// Items, native value and capacity of the selection page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub items: Vec<SelectableItem>,
    /// Empty when no native value is chosen
    pub native_value: String,
    pub capacity: usize,
}

impl SelectionState {
    pub fn new(items: Vec<SelectableItem>, native_value: &str, capacity: usize) -> Self {
        Self {
            items,
            native_value: native_value.to_string(),
            capacity,
        }
    }

    /// The chosen native value, if any
    pub fn native(&self) -> Option<&str> {
        Some(self.native_value.as_str()).filter(|v| !v.is_empty())
    }

    pub fn item(&self, id: &str) -> Option<&SelectableItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Ids of checked items in page order
    pub fn checked_ids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|item| item.is_checked)
            .map(|item| item.id.as_str())
    }

    /// Re-apply every constraint from scratch.
    ///
    /// First pass releases all items, force-unchecks and disables the reserved
    /// one, and counts the remaining checked items. Second pass caps the
    /// unchecked items once the count reaches capacity.
    pub fn recompute(&mut self) -> SelectionSummary {
        let native = self.native_value.clone();
        let mut count = 0;

        for item in &mut self.items {
            item.is_disabled = false;
            item.is_reserved_excluded = !native.is_empty() && item.id == native;
            if item.is_reserved_excluded {
                item.is_checked = false;
                item.is_disabled = true;
            }
            if item.is_checked && !item.is_disabled {
                count += 1;
            }
        }

        if count >= self.capacity {
            for item in &mut self.items {
                if !item.is_checked && !item.is_disabled {
                    item.is_disabled = true;
                }
            }
        }

        let summary = self.summarize(count);
        tracing::debug!(
            checked = summary.checked_count,
            capacity = summary.capacity,
            native = %self.native_value,
            "selection recomputed"
        );
        summary
    }

    /// Change the native value and recompute
    pub fn set_native(&mut self, value: &str) -> SelectionSummary {
        self.native_value = value.to_string();
        self.recompute()
    }

    /// Check or uncheck an item and recompute.
    ///
    /// Returns `None` when the item is unknown or disabled; a disabled control
    /// does not accept input.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> Option<SelectionSummary> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        if item.is_disabled {
            return None;
        }
        item.is_checked = checked;
        Some(self.recompute())
    }

    /// Readout for the current state without mutating it
    pub fn summary(&self) -> SelectionSummary {
        let count = self
            .items
            .iter()
            .filter(|item| item.is_checked && !item.is_disabled)
            .count();
        self.summarize(count)
    }

    fn summarize(&self, count: usize) -> SelectionSummary {
        let complete = count == self.capacity;
        SelectionSummary {
            checked_count: count,
            capacity: self.capacity,
            progress_text: format!("Selected: {} / {}", count, self.capacity),
            progress_complete: complete,
            submit_enabled: complete,
            submit_reason: (!complete)
                .then(|| format!("Please select exactly {} states", self.capacity)),
        }
    }

    /// Submit gate, derived from checked values only.
    ///
    /// Disabled flags are advisory; a restored page can carry stale ones.
    pub fn check_submission(&self) -> Result<(), SelectionViolation> {
        let selected = self.checked_ids().count();
        if selected != self.capacity {
            return Err(SelectionViolation::WrongCount {
                capacity: self.capacity,
                selected,
            });
        }
        if let Some(native) = self.native() {
            if self.checked_ids().any(|id| id == native) {
                return Err(SelectionViolation::NativeSelected {
                    native: native.to_string(),
                });
            }
        }
        Ok(())
    }
}
