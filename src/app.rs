//! Page dispatcher and core reactions
//!
//! One [`App`] per loaded page. Every input event goes through
//! [`App::handle_event`], which routes it to the handler for the current
//! page and returns a [`Reaction`] the host can act on.

use crate::config::FormRules;
use crate::document::{
    annotation_input_name, rating_input_name, Document, LoadedPage, FAMILIARITY_INPUT_NAME,
    NATIVE_INPUT_NAME, QUESTION_COUNT_INPUT_NAME,
};
use crate::error::DocumentError;
use crate::state::{
    wire_controllers, FormState, PrimaryChange, RequirementController, ResponseForm,
    SelectionState, SelectionSummary, SubsetToggle,
};
use crate::surface::{ElementRef, FocusTarget, Surface};
use crate::validation::{validate_response, GroupRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Aggregate notice shown when the response page refuses to submit
pub const RESPONSE_NOTICE: &str =
    "Please complete all required fields (*).\nLook for the highlighted sections.";

/// Input events a page can receive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PageEvent {
    NativeChanged {
        value: String,
    },
    ItemToggled {
        id: String,
        checked: bool,
    },
    FamiliarityChanged {
        value: String,
    },
    PrimaryChanged {
        question: usize,
        value: String,
        #[serde(default = "checked_by_default")]
        checked: bool,
    },
    RatingChanged {
        question: usize,
        value: String,
    },
    SubsetToggled {
        target: String,
    },
    SubmitRequested,
}

fn checked_by_default() -> bool {
    true
}

/// Per-question readout of the response page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSummary {
    pub index: usize,
    pub choice: Option<String>,
    pub rating_required: bool,
    pub rating_visible: bool,
    pub rating: Option<String>,
}

/// Readout of the current page after a reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageSummary {
    None,
    Selection(SelectionSummary),
    Response {
        familiarity: Option<String>,
        questions: Vec<QuestionSummary>,
    },
}

impl PageSummary {
    fn of(form: &FormState) -> Self {
        match form {
            FormState::None => PageSummary::None,
            FormState::Selection(state) => PageSummary::Selection(state.summary()),
            FormState::Response(form) => PageSummary::Response {
                familiarity: form
                    .familiarity
                    .as_ref()
                    .and_then(|f| f.selected_value())
                    .map(str::to_string),
                questions: form
                    .blocks
                    .iter()
                    .map(|block| QuestionSummary {
                        index: block.index,
                        choice: block.primary.selected_value().map(str::to_string),
                        rating_required: block.secondary.as_ref().is_some_and(|g| g.is_required),
                        rating_visible: block.secondary.as_ref().is_some_and(|g| g.is_visible),
                        rating: block.rating().map(str::to_string),
                    })
                    .collect(),
            },
        }
    }
}

/// The form post that goes out when submission is allowed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SubmissionPayload {
    /// `(name, value)` pairs in document order
    pub fields: Vec<(String, String)>,
}

impl SubmissionPayload {
    fn push(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    pub fn get<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        self.get_all(name).next()
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn for_selection(state: &SelectionState, rules: &FormRules) -> Self {
        let mut payload = Self::default();
        payload.push(NATIVE_INPUT_NAME, &state.native_value);
        for id in state.checked_ids() {
            payload.push(&rules.selection_input_name, id);
        }
        payload
    }

    fn for_response(form: &ResponseForm, rules: &FormRules) -> Self {
        let mut payload = Self::default();
        if let Some(value) = form.familiarity.as_ref().and_then(|f| f.selected_value()) {
            payload.push(FAMILIARITY_INPUT_NAME, value);
        }
        payload.push(QUESTION_COUNT_INPUT_NAME, &form.blocks.len().to_string());
        for block in &form.blocks {
            let Some(choice) = block.primary.selected_value() else {
                continue;
            };
            payload.push(&annotation_input_name(block.index), choice);
            if choice == rules.trigger_value {
                if let Some(rating) = block.rating() {
                    payload.push(&rating_input_name(block.index), rating);
                }
            }
        }
        payload
    }
}

/// What the host should do after an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reaction", rename_all = "snake_case")]
pub enum Reaction {
    /// Field state changed; re-render from the summary
    Updated { summary: PageSummary },
    /// A subset region was shown or hidden
    Toggled { toggle: SubsetToggle },
    /// The event did not apply to the current page
    Ignored,
    /// Let the native submission proceed
    SubmitAllowed { payload: SubmissionPayload },
    /// Prevent the default submit action
    SubmitBlocked {
        message: String,
        first_failure: Option<ElementRef>,
    },
}

/// Dispatcher owning one page's state
pub struct App<S: Surface> {
    form: FormState,
    rules: FormRules,
    controllers: Vec<RequirementController>,
    toggles: Vec<SubsetToggle>,
    regions: BTreeSet<String>,
    surface: S,
}

impl<S: Surface> App<S> {
    /// Take over a loaded page and run the initial pass: a full recompute on
    /// the selection page, controller initialization on the response page.
    pub fn load(page: LoadedPage, rules: FormRules, surface: S) -> Self {
        let mut app = Self {
            form: page.form,
            rules,
            controllers: Vec::new(),
            toggles: page.toggles,
            regions: page.regions,
            surface,
        };
        match &mut app.form {
            FormState::None => {}
            FormState::Selection(state) => {
                state.recompute();
                app.surface.hide_selection_error();
            }
            FormState::Response(form) => {
                app.controllers = wire_controllers(form, &app.rules);
                tracing::info!(
                    wired = app.controllers.len(),
                    skipped = ?form.unwired_blocks(),
                    "response page loaded"
                );
            }
        }
        app
    }

    pub fn from_document(
        document: &Document,
        rules: FormRules,
        surface: S,
    ) -> Result<Self, DocumentError> {
        let page = document.build(&rules)?;
        Ok(Self::load(page, rules, surface))
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn rules(&self) -> &FormRules {
        &self.rules
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn toggles(&self) -> &[SubsetToggle] {
        &self.toggles
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary::of(&self.form)
    }

    /// Route an event to the handler for the current page
    pub fn handle_event(&mut self, event: PageEvent) -> Reaction {
        tracing::trace!(?event, page = self.form.page_name(), "dispatch");
        match event {
            PageEvent::NativeChanged { value } => self.on_native_changed(&value),
            PageEvent::ItemToggled { id, checked } => self.on_item_toggled(&id, checked),
            PageEvent::FamiliarityChanged { value } => self.on_familiarity_changed(&value),
            PageEvent::PrimaryChanged {
                question,
                value,
                checked,
            } => self.on_primary_changed(PrimaryChange {
                question_index: question,
                value,
                checked,
            }),
            PageEvent::RatingChanged { question, value } => {
                self.on_rating_changed(question, &value)
            }
            PageEvent::SubsetToggled { target } => self.on_subset_toggled(&target),
            PageEvent::SubmitRequested => match self.form {
                FormState::Selection(_) => self.submit_selection(),
                FormState::Response(_) => self.submit_response(),
                FormState::None => self.not_applicable("submit_requested"),
            },
        }
    }

    fn not_applicable(&self, event: &str) -> Reaction {
        tracing::debug!(event, page = self.form.page_name(), "event does not apply");
        Reaction::Ignored
    }

    fn on_native_changed(&mut self, value: &str) -> Reaction {
        let FormState::Selection(state) = &mut self.form else {
            return self.not_applicable("native_changed");
        };
        state.set_native(value);
        self.surface.hide_selection_error();
        self.updated()
    }

    fn on_item_toggled(&mut self, id: &str, checked: bool) -> Reaction {
        let FormState::Selection(state) = &mut self.form else {
            return self.not_applicable("item_toggled");
        };
        if state.set_checked(id, checked).is_none() {
            tracing::debug!(id, "item unknown or disabled");
            return Reaction::Ignored;
        }
        self.surface.hide_selection_error();
        self.updated()
    }

    fn on_familiarity_changed(&mut self, value: &str) -> Reaction {
        let FormState::Response(form) = &mut self.form else {
            return self.not_applicable("familiarity_changed");
        };
        let applied = form
            .familiarity
            .as_mut()
            .is_some_and(|field| field.select(value));
        if applied {
            self.updated()
        } else {
            Reaction::Ignored
        }
    }

    fn on_primary_changed(&mut self, change: PrimaryChange) -> Reaction {
        let FormState::Response(form) = &mut self.form else {
            return self.not_applicable("primary_changed");
        };
        if Self::change_primary(form, &self.controllers, &change) {
            self.updated()
        } else {
            tracing::warn!(question = change.question_index, "primary change not applied");
            Reaction::Ignored
        }
    }

    fn on_rating_changed(&mut self, question: usize, value: &str) -> Reaction {
        let FormState::Response(form) = &mut self.form else {
            return self.not_applicable("rating_changed");
        };
        // A hidden rating cannot be clicked
        let applied = form
            .block_mut(question)
            .and_then(|block| block.secondary.as_mut())
            .filter(|group| group.is_visible)
            .is_some_and(|group| group.field.select(value));
        if applied {
            self.updated()
        } else {
            tracing::debug!(question, "rating not selectable");
            Reaction::Ignored
        }
    }

    fn on_subset_toggled(&mut self, target: &str) -> Reaction {
        if !matches!(self.form, FormState::Response(_)) {
            return self.not_applicable("subset_toggled");
        }
        if !self.regions.contains(target) {
            tracing::error!("could not find subset target element with id: {target}");
            return Reaction::Ignored;
        }
        match self.toggles.iter_mut().find(|t| t.target_id == target) {
            Some(toggle) => {
                toggle.toggle();
                Reaction::Toggled {
                    toggle: toggle.clone(),
                }
            }
            None => Reaction::Ignored,
        }
    }

    fn updated(&self) -> Reaction {
        Reaction::Updated {
            summary: self.summary(),
        }
    }

    fn change_primary(
        form: &mut ResponseForm,
        controllers: &[RequirementController],
        change: &PrimaryChange,
    ) -> bool {
        let Some(block) = form.block_mut(change.question_index) else {
            return false;
        };
        match controllers
            .iter()
            .find(|c| c.question_index() == change.question_index)
        {
            Some(controller) => controller.on_change(block, change),
            // Unwired block: the classification still counts for validation
            None if change.checked => block.primary.select(&change.value),
            None => {
                if block.primary.is_selected(&change.value) {
                    block.primary.clear();
                }
                true
            }
        }
    }

    fn submit_selection(&mut self) -> Reaction {
        let FormState::Selection(state) = &self.form else {
            return Reaction::Ignored;
        };
        match state.check_submission() {
            Ok(()) => {
                self.surface.hide_selection_error();
                tracing::info!(native = %state.native_value, "selection submitted");
                Reaction::SubmitAllowed {
                    payload: SubmissionPayload::for_selection(state, &self.rules),
                }
            }
            Err(violation) => {
                let message = violation.to_string();
                tracing::info!("selection submit blocked: {message}");
                self.surface.show_selection_error(&message);
                self.surface.scroll_into_view(ElementRef::SelectionError);
                self.surface.focus(FocusTarget::SelectionError);
                Reaction::SubmitBlocked {
                    message,
                    first_failure: Some(ElementRef::SelectionError),
                }
            }
        }
    }

    fn submit_response(&mut self) -> Reaction {
        let FormState::Response(form) = &self.form else {
            return Reaction::Ignored;
        };

        self.surface.clear_highlights();
        let result = validate_response(form, &self.rules);
        if result.passed {
            tracing::info!(questions = form.blocks.len(), "response submitted");
            return Reaction::SubmitAllowed {
                payload: SubmissionPayload::for_response(form, &self.rules),
            };
        }

        for group in result.failing_groups() {
            self.surface.highlight(ElementRef::Group(group));
        }
        self.surface.show_notice(RESPONSE_NOTICE);

        let first_failure = result.first_failing_group.map(ElementRef::Group);
        if let Some(group) = result.first_failing_group {
            let target = ElementRef::Group(group);
            self.surface.scroll_into_view(target);
            self.surface.emphasize(target, self.rules.emphasis);
            self.surface.focus(focus_target(form, group));
        }
        tracing::info!(
            failures = result.failures.len(),
            first = ?result.first_failing_group,
            "response submit blocked"
        );
        Reaction::SubmitBlocked {
            message: RESPONSE_NOTICE.to_string(),
            first_failure,
        }
    }
}

/// First control inside the failing group, or the group itself
fn focus_target(form: &ResponseForm, group: GroupRef) -> FocusTarget {
    match group.field(form).and_then(|field| field.first_option()) {
        Some(value) => FocusTarget::Control {
            group,
            value: value.to_string(),
        },
        None => FocusTarget::Region { group },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{HeadlessSurface, MockSurface};
    use mockall::predicate::eq;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;

    const SELECTION: &str = r#"{
        "page": "selection",
        "items": [
            {"value": "Assam"}, {"value": "Bihar"}, {"value": "Goa"},
            {"value": "Kerala"}, {"value": "Punjab"}, {"value": "Sikkim"},
            {"value": "X"}
        ]
    }"#;

    const RESPONSE: &str = r#"{
        "page": "response",
        "familiarity": {},
        "questions": [{"index": 0}, {"index": 1}, {"index": 2}, {"index": 3}],
        "containers": [
            {"id": "rating_container_0"},
            {"id": "rating_container_1"},
            {"id": "rating_container_2"},
            {"id": "rating_container_3"}
        ],
        "toggles": [{"target": "subsets_0"}, {"target": "subsets_9"}],
        "regions": ["subsets_0"]
    }"#;

    fn headless(json: &str) -> App<HeadlessSurface> {
        let document = Document::from_json(json).unwrap();
        App::from_document(&document, FormRules::default(), HeadlessSurface::new()).unwrap()
    }

    fn toggle(id: &str) -> PageEvent {
        PageEvent::ItemToggled {
            id: id.to_string(),
            checked: true,
        }
    }

    fn primary(question: usize, value: &str) -> PageEvent {
        PageEvent::PrimaryChanged {
            question,
            value: value.to_string(),
            checked: true,
        }
    }

    fn rating(question: usize, value: &str) -> PageEvent {
        PageEvent::RatingChanged {
            question,
            value: value.to_string(),
        }
    }

    fn familiarity(value: &str) -> PageEvent {
        PageEvent::FamiliarityChanged {
            value: value.to_string(),
        }
    }

    mod selection_page {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_five_items_submit_with_payload() {
            // Scenario A
            let mut app = headless(SELECTION);
            app.handle_event(PageEvent::NativeChanged {
                value: "X".to_string(),
            });
            for id in ["Assam", "Bihar", "Goa", "Kerala", "Punjab"] {
                app.handle_event(toggle(id));
            }

            let reaction = app.handle_event(PageEvent::SubmitRequested);

            let Reaction::SubmitAllowed { payload } = reaction else {
                panic!("expected submit to proceed, got {reaction:?}");
            };
            assert_eq!(payload.get(NATIVE_INPUT_NAME), Some("X"));
            assert_eq!(
                payload.get_all("selected_states").collect::<Vec<_>>(),
                vec!["Assam", "Bihar", "Goa", "Kerala", "Punjab"]
            );
            assert!(app.surface().snapshot().selection_error.is_none());
        }

        #[test]
        fn test_four_items_block_with_count_message() {
            let mut app = headless(SELECTION);
            for id in ["Assam", "Bihar", "Goa", "Kerala"] {
                app.handle_event(toggle(id));
            }

            let reaction = app.handle_event(PageEvent::SubmitRequested);

            assert_eq!(
                reaction,
                Reaction::SubmitBlocked {
                    message: "Please select exactly 5 states/UTs. You selected 4.".to_string(),
                    first_failure: Some(ElementRef::SelectionError),
                }
            );
            let shown = app.surface().snapshot();
            assert_eq!(shown.scrolled_to, Some(ElementRef::SelectionError));
            assert_eq!(shown.focused, Some(FocusTarget::SelectionError));
            assert!(shown.selection_error.is_some());
        }

        #[test]
        fn test_sixth_item_is_ignored() {
            let mut app = headless(SELECTION);
            for id in ["Assam", "Bihar", "Goa", "Kerala", "Punjab"] {
                app.handle_event(toggle(id));
            }
            assert_eq!(app.handle_event(toggle("Sikkim")), Reaction::Ignored);
        }

        #[test]
        fn test_native_change_after_check_unchecks_item() {
            // Scenario C
            let mut app = headless(SELECTION);
            app.handle_event(toggle("X"));

            let reaction = app.handle_event(PageEvent::NativeChanged {
                value: "X".to_string(),
            });

            let Reaction::Updated {
                summary: PageSummary::Selection(summary),
            } = reaction
            else {
                panic!("expected selection update");
            };
            assert_eq!(summary.checked_count, 0);
            let state = app.form().as_selection().unwrap();
            assert!(!state.item("X").unwrap().is_checked);
            assert!(state.item("X").unwrap().is_disabled);
        }

        #[test]
        fn test_response_events_are_ignored() {
            let mut app = headless(SELECTION);
            assert_eq!(app.handle_event(primary(0, "Stereotype")), Reaction::Ignored);
        }

        #[test]
        fn test_submit_effects_in_order() {
            let document = Document::from_json(SELECTION).unwrap();
            let mut surface = MockSurface::new();
            let mut seq = Sequence::new();
            surface
                .expect_hide_selection_error()
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_show_selection_error()
                .withf(|message: &str| message == "Please select exactly 5 states/UTs. You selected 0.")
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_scroll_into_view()
                .with(eq(ElementRef::SelectionError))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_focus()
                .with(eq(FocusTarget::SelectionError))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());

            let mut app = App::from_document(&document, FormRules::default(), surface).unwrap();
            app.handle_event(PageEvent::SubmitRequested);
        }
    }

    mod response_page {
        use super::*;
        use pretty_assertions::assert_eq;

        fn complete(app: &mut App<HeadlessSurface>) {
            app.handle_event(familiarity("2"));
            app.handle_event(primary(0, "Stereotype"));
            app.handle_event(rating(0, "4"));
            app.handle_event(primary(1, "Not a Stereotype"));
            app.handle_event(primary(2, "Not sure"));
            app.handle_event(primary(3, "Stereotype"));
            app.handle_event(rating(3, "1"));
        }

        #[test]
        fn test_complete_form_submits_payload() {
            let mut app = headless(RESPONSE);
            complete(&mut app);

            let Reaction::SubmitAllowed { payload } = app.handle_event(PageEvent::SubmitRequested)
            else {
                panic!("expected submit to proceed");
            };
            assert_eq!(
                payload.fields,
                vec![
                    ("familiarity_rating".to_string(), "2".to_string()),
                    ("num_quiz_items".to_string(), "4".to_string()),
                    ("annotation_0".to_string(), "Stereotype".to_string()),
                    ("offensiveness_0".to_string(), "4".to_string()),
                    ("annotation_1".to_string(), "Not a Stereotype".to_string()),
                    ("annotation_2".to_string(), "Not sure".to_string()),
                    ("annotation_3".to_string(), "Stereotype".to_string()),
                    ("offensiveness_3".to_string(), "1".to_string()),
                ]
            );
        }

        #[test]
        fn test_rating_hidden_until_stereotype() {
            let mut app = headless(RESPONSE);
            assert_eq!(app.handle_event(rating(0, "3")), Reaction::Ignored);

            app.handle_event(primary(0, "Stereotype"));
            assert!(matches!(
                app.handle_event(rating(0, "3")),
                Reaction::Updated { .. }
            ));
        }

        #[test]
        fn test_switching_away_clears_rating() {
            // Scenario D
            let mut app = headless(RESPONSE);
            app.handle_event(primary(3, "Stereotype"));
            app.handle_event(rating(3, "5"));

            let reaction = app.handle_event(primary(3, "Not sure"));

            let Reaction::Updated {
                summary: PageSummary::Response { questions, .. },
            } = reaction
            else {
                panic!("expected response update");
            };
            let q3 = &questions[3];
            assert!(!q3.rating_required);
            assert!(!q3.rating_visible);
            assert_eq!(q3.rating, None);
        }

        #[test]
        fn test_uncheck_of_unselected_choice_keeps_rating_required() {
            let mut app = headless(RESPONSE);
            app.handle_event(primary(0, "Stereotype"));
            app.handle_event(rating(0, "3"));

            let reaction = app.handle_event(PageEvent::PrimaryChanged {
                question: 0,
                value: "Not sure".to_string(),
                checked: false,
            });

            let Reaction::Updated {
                summary: PageSummary::Response { questions, .. },
            } = reaction
            else {
                panic!("expected response update");
            };
            let q0 = &questions[0];
            assert_eq!(q0.choice.as_deref(), Some("Stereotype"));
            assert!(q0.rating_required);
            assert!(q0.rating_visible);
            assert_eq!(q0.rating.as_deref(), Some("3"));

            assert!(matches!(
                app.handle_event(rating(0, "5")),
                Reaction::Updated { .. }
            ));
            let form = app.form().as_response().unwrap();
            assert!(validate_response(form, app.rules())
                .failing_groups()
                .all(|group| group != GroupRef::Rating(0)));
        }

        #[test]
        fn test_first_failure_is_highlighted_and_focused() {
            // Scenario E
            let mut app = headless(RESPONSE);
            app.handle_event(familiarity("0"));
            app.handle_event(primary(0, "Not sure"));
            app.handle_event(primary(1, "Not sure"));
            app.handle_event(primary(3, "Stereotype"));

            let reaction = app.handle_event(PageEvent::SubmitRequested);

            let first = ElementRef::Group(GroupRef::Annotation(2));
            assert_eq!(
                reaction,
                Reaction::SubmitBlocked {
                    message: RESPONSE_NOTICE.to_string(),
                    first_failure: Some(first),
                }
            );
            let shown = app.surface().snapshot();
            assert_eq!(shown.scrolled_to, Some(first));
            assert_eq!(shown.emphasized, Some(first));
            assert_eq!(
                shown.focused,
                Some(FocusTarget::Control {
                    group: GroupRef::Annotation(2),
                    value: "Stereotype".to_string(),
                })
            );
            assert!(shown.highlighted.contains(&first));
            assert!(shown
                .highlighted
                .contains(&ElementRef::Group(GroupRef::Rating(3))));
        }

        #[test]
        fn test_resubmit_resets_highlights() {
            let mut app = headless(RESPONSE);
            app.handle_event(PageEvent::SubmitRequested);
            assert!(!app.surface().snapshot().highlighted.is_empty());

            complete(&mut app);
            let reaction = app.handle_event(PageEvent::SubmitRequested);

            assert!(matches!(reaction, Reaction::SubmitAllowed { .. }));
            assert!(app.surface().snapshot().highlighted.is_empty());
        }

        #[test]
        fn test_missing_familiarity_blocks_first() {
            let mut app = headless(RESPONSE);
            app.handle_event(primary(0, "Not sure"));
            let reaction = app.handle_event(PageEvent::SubmitRequested);
            assert!(matches!(
                reaction,
                Reaction::SubmitBlocked {
                    first_failure: Some(ElementRef::Group(GroupRef::Familiarity)),
                    ..
                }
            ));
        }

        #[test]
        fn test_blocked_submit_effects_in_order() {
            let json = r#"{
                "page": "response",
                "questions": [{"index": 0}, {"index": 1, "selected": "Stereotype"}],
                "containers": [{"id": "rating_container_1"}]
            }"#;
            let document = Document::from_json(json).unwrap();
            let first = ElementRef::Group(GroupRef::Annotation(0));

            let mut surface = MockSurface::new();
            let mut seq = Sequence::new();
            surface
                .expect_clear_highlights()
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_highlight()
                .with(eq(first))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_highlight()
                .with(eq(ElementRef::Group(GroupRef::Rating(1))))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_show_notice()
                .withf(|message: &str| message == RESPONSE_NOTICE)
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_scroll_into_view()
                .with(eq(first))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_emphasize()
                .withf(move |target, duration| {
                    *target == first && duration.as_millis() == 3500
                })
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            surface
                .expect_focus()
                .with(eq(FocusTarget::Control {
                    group: GroupRef::Annotation(0),
                    value: "Stereotype".to_string(),
                }))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());

            let mut app = App::from_document(&document, FormRules::default(), surface).unwrap();
            app.handle_event(PageEvent::SubmitRequested);
        }

        #[test]
        fn test_passing_submit_touches_only_highlights() {
            let json = r#"{"page": "response", "questions": [{"index": 0, "selected": "Not sure"}]}"#;
            let document = Document::from_json(json).unwrap();
            let mut surface = MockSurface::new();
            surface.expect_clear_highlights().times(1).return_const(());

            let mut app = App::from_document(&document, FormRules::default(), surface).unwrap();
            assert!(matches!(
                app.handle_event(PageEvent::SubmitRequested),
                Reaction::SubmitAllowed { .. }
            ));
        }

        #[test]
        fn test_focus_falls_back_to_region() {
            let json = r#"{
                "page": "response",
                "questions": [{"index": 0, "selected": "Stereotype"}],
                "containers": [{"id": "rating_container_0", "options": []}]
            }"#;
            let document = Document::from_json(json).unwrap();
            let mut app =
                App::from_document(&document, FormRules::default(), HeadlessSurface::new())
                    .unwrap();

            app.handle_event(PageEvent::SubmitRequested);

            assert_eq!(
                app.surface().snapshot().focused,
                Some(FocusTarget::Region {
                    group: GroupRef::Rating(0)
                })
            );
        }

        #[test]
        fn test_restored_stereotype_is_required_on_load() {
            let json = r#"{
                "page": "response",
                "questions": [{"index": 0, "selected": "Stereotype"}],
                "containers": [{"id": "rating_container_0"}]
            }"#;
            let app = headless(json);
            let PageSummary::Response { questions, .. } = app.summary() else {
                panic!("expected response summary");
            };
            assert!(questions[0].rating_required);
            assert!(questions[0].rating_visible);
        }

        #[test]
        fn test_unwired_block_still_validated() {
            let json = r#"{
                "page": "response",
                "questions": [{"index": 0}, {"index": 1}],
                "containers": [{"id": "rating_container_1"}]
            }"#;
            let mut app = headless(json);
            assert!(matches!(
                app.handle_event(primary(0, "Stereotype")),
                Reaction::Updated { .. }
            ));
            app.handle_event(primary(1, "Not sure"));

            // Block 0 has no container: its rating check is skipped
            assert!(matches!(
                app.handle_event(PageEvent::SubmitRequested),
                Reaction::SubmitAllowed { .. }
            ));
        }

        #[test]
        fn test_unknown_question_is_ignored() {
            let mut app = headless(RESPONSE);
            assert_eq!(app.handle_event(primary(42, "Stereotype")), Reaction::Ignored);
        }
    }

    mod subset_toggles {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_toggle_expands_region() {
            let mut app = headless(RESPONSE);
            let reaction = app.handle_event(PageEvent::SubsetToggled {
                target: "subsets_0".to_string(),
            });
            let Reaction::Toggled { toggle } = reaction else {
                panic!("expected toggle");
            };
            assert!(toggle.expanded);
            assert_eq!(toggle.label(), "Hide Details");
        }

        #[test]
        fn test_toggle_with_missing_region_is_ignored() {
            let mut app = headless(RESPONSE);
            let reaction = app.handle_event(PageEvent::SubsetToggled {
                target: "subsets_9".to_string(),
            });
            assert_eq!(reaction, Reaction::Ignored);
            assert!(app.toggles().iter().all(|t| !t.expanded));
        }

        #[test]
        fn test_toggled_reaction_reports_label_and_aria() {
            let mut app = headless(RESPONSE);
            let reaction = app.handle_event(PageEvent::SubsetToggled {
                target: "subsets_0".to_string(),
            });
            let value = serde_json::to_value(&reaction).unwrap();
            assert_eq!(value["reaction"], "toggled");
            assert_eq!(value["toggle"]["label"], "Hide Details");
            assert_eq!(value["toggle"]["aria_expanded"], "true");
            assert_eq!(value["toggle"]["aria_hidden"], "false");
        }
    }

    #[test]
    fn test_events_deserialize_from_script() {
        let json = r#"[
            {"event": "native_changed", "value": "Goa"},
            {"event": "item_toggled", "id": "Assam", "checked": true},
            {"event": "primary_changed", "question": 2, "value": "Stereotype"},
            {"event": "submit_requested"}
        ]"#;
        let events: Vec<PageEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[2], primary(2, "Stereotype"));
        assert_eq!(events[3], PageEvent::SubmitRequested);
    }
}
