//! Host page effects
//!
//! The controllers never touch markup directly. Everything visible beyond
//! field state goes through [`Surface`], which can be mocked in tests.

use crate::validation::GroupRef;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// An element the host can highlight, scroll to or emphasize
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "element", content = "target", rename_all = "snake_case")]
pub enum ElementRef {
    /// Error region of the selection page
    SelectionError,
    Group(GroupRef),
}

/// Where input focus lands after a blocked submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "focus", rename_all = "snake_case")]
pub enum FocusTarget {
    /// Error region of the selection page
    SelectionError,
    /// First interactive control inside the group
    Control { group: GroupRef, value: String },
    /// The group itself when it has no controls
    Region { group: GroupRef },
}

/// Effects the page host applies on behalf of the controllers
#[cfg_attr(test, mockall::automock)]
pub trait Surface {
    /// Remove every persistent error highlight
    fn clear_highlights(&mut self);

    /// Persistently mark an element as failing until the next submit attempt
    fn highlight(&mut self, target: ElementRef);

    /// Show the aggregate notice for a blocked submit
    fn show_notice(&mut self, message: &str);

    fn show_selection_error(&mut self, message: &str);

    fn hide_selection_error(&mut self);

    fn scroll_into_view(&mut self, target: ElementRef);

    /// Strong emphasis that clears itself after `duration`
    fn emphasize(&mut self, target: ElementRef, duration: Duration);

    /// Move input focus without scrolling again
    fn focus(&mut self, target: FocusTarget);
}

/// Everything a headless host has been asked to show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub highlighted: BTreeSet<ElementRef>,
    pub emphasized: Option<ElementRef>,
    pub notices: Vec<String>,
    pub selection_error: Option<String>,
    pub scrolled_to: Option<ElementRef>,
    pub focused: Option<FocusTarget>,
}

/// Surface that records effects instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    presentation: Arc<Mutex<Presentation>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current presentation
    pub fn snapshot(&self) -> Presentation {
        lock(&self.presentation).clone()
    }

    fn update(&self, f: impl FnOnce(&mut Presentation)) {
        f(&mut lock(&self.presentation));
    }
}

fn lock(presentation: &Mutex<Presentation>) -> MutexGuard<'_, Presentation> {
    // Presentation is plain data; a panic mid-update cannot leave it invalid
    presentation
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Surface for HeadlessSurface {
    fn clear_highlights(&mut self) {
        self.update(|p| p.highlighted.clear());
    }

    fn highlight(&mut self, target: ElementRef) {
        tracing::debug!(?target, "highlight");
        self.update(|p| {
            p.highlighted.insert(target);
        });
    }

    fn show_notice(&mut self, message: &str) {
        tracing::info!("notice: {message}");
        self.update(|p| p.notices.push(message.to_string()));
    }

    fn show_selection_error(&mut self, message: &str) {
        tracing::info!("selection error: {message}");
        self.update(|p| p.selection_error = Some(message.to_string()));
    }

    fn hide_selection_error(&mut self) {
        self.update(|p| p.selection_error = None);
    }

    fn scroll_into_view(&mut self, target: ElementRef) {
        self.update(|p| p.scrolled_to = Some(target));
    }

    fn emphasize(&mut self, target: ElementRef, duration: Duration) {
        self.update(|p| p.emphasized = Some(target));

        // Fire and forget. A clear left over from an earlier submit may land
        // after a newer emphasis of the same element; the persistent
        // highlight is unaffected.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime, emphasis stays until next submit");
            return;
        };
        let presentation = Arc::clone(&self.presentation);
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            let mut p = lock(&presentation);
            if p.emphasized == Some(target) {
                p.emphasized = None;
            }
        });
    }

    fn focus(&mut self, target: FocusTarget) {
        tracing::debug!(?target, "focus");
        self.update(|p| p.focused = Some(target));
    }
}
