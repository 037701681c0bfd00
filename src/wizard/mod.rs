//! Recommendation wizard state machine.
//!
//! A wizard walks through three steps: collect up to five titles, pick optional
//! preferences, then show results. All transitions go through [`apply`], which
//! takes the current state and an event and returns the next state plus any
//! side effect the caller has to run (the recommendation request). The
//! `&mut self` helpers on [`WizardState`] wrap it for callers that hold the
//! state in place.

pub mod domain;
pub mod preferences;
pub mod titles;

use thiserror::Error;

use crate::client::models::Recommendation;
use crate::client::FetchOutcome;

pub use domain::{Domain, Flow};
pub use preferences::{PreferenceField, Preferences};
pub use titles::{TitleList, MAX_TITLES};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Collecting,
    DetailsEntry,
    Results,
}

impl Step {
    pub fn all() -> &'static [Step] {
        &[Self::Collecting, Self::DetailsEntry, Self::Results]
    }

    /// 1-based position shown in the step indicator.
    pub fn number(&self) -> usize {
        match self {
            Self::Collecting => 1,
            Self::DetailsEntry => 2,
            Self::Results => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Collecting => "Favorites",
            Self::DetailsEntry => "Preferences",
            Self::Results => "Results",
        }
    }
}

/// Reasons an event was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("title is empty")]
    EmptyInput,

    #[error("at most {} titles can be added", MAX_TITLES)]
    CapacityExceeded,

    #[error("no titles provided")]
    NoTitlesProvided,

    #[error("cannot {event} during {step:?}")]
    InvalidTransition { step: Step, event: &'static str },
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// Type a character into the draft title
    Input(char),
    /// Delete the last draft character
    Backspace,
    /// Add the draft title (Enter)
    Confirm,
    /// Add a title directly
    Add(String),
    /// Remove the title at an index
    Remove(usize),
    SetPreference(PreferenceField, String),
    Continue,
    Back,
    Submit,
    /// A request finished
    Resolved { request_id: u64, outcome: FetchOutcome },
    Restart,
}

impl WizardEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Input(_) | Self::Backspace => "edit the title",
            Self::Confirm | Self::Add(_) => "add a title",
            Self::Remove(_) => "remove a title",
            Self::SetPreference(..) => "set a preference",
            Self::Continue => "continue",
            Self::Back => "go back",
            Self::Submit => "submit",
            Self::Resolved { .. } => "resolve a request",
            Self::Restart => "restart",
        }
    }
}

/// A request the caller must issue on behalf of the wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub request_id: u64,
    pub titles: Vec<String>,
    pub preferences: Preferences,
}

/// Side effects produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(FetchRequest),
}

/// Result of applying one event.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: WizardState,
    pub effect: Option<Effect>,
    pub rejected: Option<WizardError>,
}

impl Transition {
    fn ok(state: WizardState) -> Self {
        Self {
            state,
            effect: None,
            rejected: None,
        }
    }

    fn reject(state: WizardState, error: WizardError) -> Self {
        Self {
            state,
            effect: None,
            rejected: Some(error),
        }
    }
}

/// Full state of one wizard instance.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    /// Which flow this wizard belongs to
    pub flow: Flow,

    /// Current step
    pub step: Step,

    /// Collected titles
    pub titles: TitleList,

    /// Title being typed
    pub draft: String,

    /// Preference selections
    pub preferences: Preferences,

    /// Last add/continue attempt was invalid
    pub input_error: Option<WizardError>,

    /// The title list is at its ceiling
    pub capacity_reached: bool,

    /// A recommendation request is in flight
    pub loading: bool,

    /// Results of the last request
    pub recommendations: Vec<Recommendation>,

    /// Why the last request failed, when it did
    pub service_unavailable: Option<String>,

    /// Id of the most recent request; completions for older ids are dropped
    request_id: u64,
}

impl WizardState {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            ..Default::default()
        }
    }

    /// Apply an event in place, returning the effect to run.
    pub fn dispatch(&mut self, event: WizardEvent) -> Result<Option<Effect>, WizardError> {
        let transition = apply(std::mem::take(self), event);
        *self = transition.state;
        match transition.rejected {
            Some(error) => Err(error),
            None => Ok(transition.effect),
        }
    }

    pub fn add(&mut self, candidate: impl Into<String>) -> Result<(), WizardError> {
        self.dispatch(WizardEvent::Add(candidate.into())).map(drop)
    }

    pub fn remove(&mut self, index: usize) -> Result<(), WizardError> {
        self.dispatch(WizardEvent::Remove(index)).map(drop)
    }

    pub fn set_preference(
        &mut self,
        field: PreferenceField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.dispatch(WizardEvent::SetPreference(field, value.into()))
            .map(drop)
    }

    pub fn proceed(&mut self) -> Result<(), WizardError> {
        self.dispatch(WizardEvent::Continue).map(drop)
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        self.dispatch(WizardEvent::Back).map(drop)
    }

    /// Start a request. Returns what to fetch.
    pub fn submit(&mut self) -> Result<FetchRequest, WizardError> {
        match self.dispatch(WizardEvent::Submit)? {
            Some(Effect::Fetch(request)) => Ok(request),
            None => Err(WizardError::InvalidTransition {
                step: self.step,
                event: "submit",
            }),
        }
    }

    pub fn resolve(&mut self, request_id: u64, outcome: FetchOutcome) -> Result<(), WizardError> {
        self.dispatch(WizardEvent::Resolved {
            request_id,
            outcome,
        })
        .map(drop)
    }

    pub fn restart(&mut self) {
        // Restart is legal from every step.
        let _ = self.dispatch(WizardEvent::Restart);
    }

    /// Whether the shown results came from the fallback path.
    pub fn is_fallback(&self) -> bool {
        self.step == Step::Results && self.service_unavailable.is_some()
    }
}

/// Apply `event` to `state`.
pub fn apply(mut state: WizardState, event: WizardEvent) -> Transition {
    let step = state.step;
    let invalid = WizardError::InvalidTransition {
        step,
        event: event.name(),
    };

    match event {
        WizardEvent::Restart => {
            let request_id = state.request_id;
            let mut fresh = WizardState::new(state.flow);
            fresh.request_id = request_id;
            Transition::ok(fresh)
        }

        WizardEvent::SetPreference(field, value) => {
            state.preferences.set(field, value);
            Transition::ok(state)
        }

        WizardEvent::Input(c) if step == Step::Collecting => {
            state.draft.push(c);
            state.input_error = None;
            Transition::ok(state)
        }

        WizardEvent::Backspace if step == Step::Collecting => {
            state.draft.pop();
            state.input_error = None;
            Transition::ok(state)
        }

        WizardEvent::Confirm if step == Step::Collecting => {
            let draft = std::mem::take(&mut state.draft);
            let mut transition = add_title(state, &draft);
            if transition.rejected.is_some() {
                transition.state.draft = draft;
            }
            transition
        }

        WizardEvent::Add(candidate) if step == Step::Collecting => add_title(state, &candidate),

        WizardEvent::Remove(index) if step == Step::Collecting => {
            if state.titles.remove(index).is_none() {
                tracing::debug!("Ignoring removal of missing title index {}", index);
            }
            state.capacity_reached = false;
            Transition::ok(state)
        }

        WizardEvent::Continue if step == Step::Collecting => {
            if state.titles.is_empty() {
                state.input_error = Some(WizardError::NoTitlesProvided);
                return Transition::reject(state, WizardError::NoTitlesProvided);
            }
            state.input_error = None;
            state.step = Step::DetailsEntry;
            Transition::ok(state)
        }

        WizardEvent::Back if step == Step::DetailsEntry && !state.loading => {
            state.step = Step::Collecting;
            Transition::ok(state)
        }

        WizardEvent::Submit if step == Step::DetailsEntry && !state.loading => {
            state.loading = true;
            state.service_unavailable = None;
            state.request_id += 1;
            let request = FetchRequest {
                request_id: state.request_id,
                titles: state.titles.to_vec(),
                preferences: state.preferences.clone(),
            };
            Transition {
                state,
                effect: Some(Effect::Fetch(request)),
                rejected: None,
            }
        }

        WizardEvent::Resolved {
            request_id,
            outcome,
        } => {
            if step != Step::DetailsEntry || !state.loading || request_id != state.request_id {
                tracing::debug!(
                    "Dropping stale completion for request {} (current {})",
                    request_id,
                    state.request_id
                );
                return Transition::ok(state);
            }

            state.loading = false;
            match outcome {
                FetchOutcome::Fresh(recommendations) => {
                    state.recommendations = recommendations;
                    state.service_unavailable = None;
                    state.step = Step::Results;
                }
                FetchOutcome::ServiceUnavailable { reason, fallback } => {
                    state.recommendations = fallback;
                    state.service_unavailable = Some(reason);
                    state.step = Step::Results;
                }
                FetchOutcome::Failed { reason } => {
                    state.service_unavailable = Some(reason);
                }
            }
            Transition::ok(state)
        }

        _ => Transition::reject(state, invalid),
    }
}

fn add_title(mut state: WizardState, candidate: &str) -> Transition {
    match state.titles.push(candidate) {
        Ok(count) => {
            state.input_error = None;
            if count >= MAX_TITLES {
                state.capacity_reached = true;
            }
            Transition::ok(state)
        }
        Err(error) => {
            match error {
                WizardError::CapacityExceeded => state.capacity_reached = true,
                _ => state.input_error = Some(error),
            }
            Transition::reject(state, error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fallback::sample_recommendations;

    fn collecting_with(titles: &[&str]) -> WizardState {
        let mut state = WizardState::new(Flow::Books);
        for title in titles {
            state.add(*title).unwrap();
        }
        state
    }

    #[test]
    fn test_add_empty_input() {
        let mut state = WizardState::new(Flow::Books);

        assert_eq!(state.add(""), Err(WizardError::EmptyInput));
        assert_eq!(state.add("   "), Err(WizardError::EmptyInput));
        assert!(state.titles.is_empty());
        assert!(state.input_error.is_some());
    }

    #[test]
    fn test_successful_add_clears_input_error() {
        let mut state = WizardState::new(Flow::Books);
        let _ = state.add(" ");
        state.add("Dune").unwrap();

        assert!(!state.input_error.is_some());
        assert_eq!(state.titles.get(0), Some("Dune"));
    }

    #[test]
    fn test_fifth_add_sets_capacity_reached() {
        let mut state = collecting_with(&["a", "b", "c", "d"]);
        assert!(!state.capacity_reached);

        state.add("e").unwrap();
        assert!(state.capacity_reached);

        assert_eq!(state.add("f"), Err(WizardError::CapacityExceeded));
        assert_eq!(state.titles.len(), MAX_TITLES);
        assert!(state.capacity_reached);
    }

    #[test]
    fn test_count_never_exceeds_max() {
        let mut state = WizardState::new(Flow::Anime);
        for i in 0..20 {
            let _ = state.add(format!("title {}", i));
            if i % 7 == 3 {
                state.remove(0).unwrap();
            }
            assert!(state.titles.len() <= MAX_TITLES);
        }
    }

    #[test]
    fn test_remove_reopens_input() {
        let mut state = WizardState::new(Flow::Anime);
        for title in ["Naruto", "Bleach", "Monster", "Mushishi", "Haikyuu"] {
            state.add(title).unwrap();
        }
        assert!(state.capacity_reached);

        state.remove(0).unwrap();
        assert!(!state.capacity_reached);
        assert_eq!(state.titles.len(), 4);

        state.add("Frieren").unwrap();
        assert_eq!(state.titles.len(), MAX_TITLES);
        assert!(state.capacity_reached);
        assert_eq!(state.titles.get(4), Some("Frieren"));
    }

    #[test]
    fn test_remove_out_of_range_still_clears_flag() {
        let mut state = collecting_with(&["a", "b", "c", "d", "e"]);
        state.remove(9).unwrap();

        assert!(!state.capacity_reached);
        assert_eq!(state.titles.len(), MAX_TITLES);
    }

    #[test]
    fn test_confirm_adds_draft() {
        let mut state = WizardState::new(Flow::Movies);
        for c in " Heat ".chars() {
            state.dispatch(WizardEvent::Input(c)).unwrap();
        }
        state.dispatch(WizardEvent::Confirm).unwrap();

        assert_eq!(state.titles.get(0), Some("Heat"));
        assert!(state.draft.is_empty());
    }

    #[test]
    fn test_failed_confirm_keeps_draft_and_typing_clears_error() {
        let mut state = WizardState::new(Flow::Movies);
        state.dispatch(WizardEvent::Input(' ')).unwrap();

        assert_eq!(
            state.dispatch(WizardEvent::Confirm),
            Err(WizardError::EmptyInput)
        );
        assert_eq!(state.draft, " ");
        assert!(state.input_error.is_some());

        state.dispatch(WizardEvent::Backspace).unwrap();
        assert!(!state.input_error.is_some());
    }

    #[test]
    fn test_continue_requires_titles() {
        let mut state = WizardState::new(Flow::Books);

        assert_eq!(state.proceed(), Err(WizardError::NoTitlesProvided));
        assert_eq!(state.step, Step::Collecting);
        assert_eq!(state.input_error, Some(WizardError::NoTitlesProvided));

        state.add("Dune").unwrap();
        state.proceed().unwrap();
        assert_eq!(state.step, Step::DetailsEntry);
        assert!(!state.input_error.is_some());
    }

    #[test]
    fn test_back_returns_to_collecting() {
        let mut state = collecting_with(&["Dune"]);
        state.proceed().unwrap();
        state.back().unwrap();

        assert_eq!(state.step, Step::Collecting);
        assert_eq!(state.titles.len(), 1);
    }

    #[test]
    fn test_submit_only_from_details() {
        let mut state = collecting_with(&["Dune"]);

        assert!(matches!(
            state.submit(),
            Err(WizardError::InvalidTransition {
                step: Step::Collecting,
                ..
            })
        ));
        assert!(!state.loading);
    }

    #[test]
    fn test_submit_builds_request() {
        let mut state = collecting_with(&["Dune", "1984"]);
        state.proceed().unwrap();
        state.set_preference(PreferenceField::Genre, "scifi").unwrap();

        let request = state.submit().unwrap();

        assert!(state.loading);
        assert_eq!(state.step, Step::DetailsEntry);
        assert_eq!(request.request_id, 1);
        assert_eq!(request.titles, vec!["Dune", "1984"]);
        assert_eq!(request.preferences.genre.as_deref(), Some("scifi"));
        assert_eq!(request.preferences.era, None);
    }

    #[test]
    fn test_second_submit_while_loading_is_rejected() {
        let mut state = collecting_with(&["Dune"]);
        state.proceed().unwrap();
        state.submit().unwrap();

        assert!(state.submit().is_err());
        assert!(state.back().is_err());
        assert_eq!(state.step, Step::DetailsEntry);
    }

    #[test]
    fn test_network_failure_scenario_shows_fallback_books() {
        let mut state = WizardState::new(Flow::Books);
        state.add("Dune").unwrap();
        state.add("1984").unwrap();
        state.proceed().unwrap();
        state.set_preference(PreferenceField::Genre, "scifi").unwrap();
        let request = state.submit().unwrap();

        let outcome = FetchOutcome::ServiceUnavailable {
            reason: String::from("HTTP request failed: connection refused"),
            fallback: sample_recommendations(Domain::Books),
        };
        state.resolve(request.request_id, outcome).unwrap();

        assert_eq!(state.step, Step::Results);
        assert!(!state.loading);
        assert!(state.is_fallback());
        assert_eq!(state.recommendations.len(), 5);
        let ids: Vec<String> = state
            .recommendations
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(state.recommendations[0].title(), "The Great Gatsby");
    }

    #[test]
    fn test_fresh_results() {
        let mut state = collecting_with(&["Dune"]);
        state.proceed().unwrap();
        let request = state.submit().unwrap();

        state
            .resolve(request.request_id, FetchOutcome::Fresh(Vec::new()))
            .unwrap();

        assert_eq!(state.step, Step::Results);
        assert!(state.recommendations.is_empty());
        assert!(!state.is_fallback());
    }

    #[test]
    fn test_any_outcome_reaches_results() {
        let outcomes = [
            FetchOutcome::Fresh(sample_recommendations(Domain::Movies)),
            FetchOutcome::ServiceUnavailable {
                reason: String::from("Server returned 500: boom"),
                fallback: Vec::new(),
            },
        ];

        for outcome in outcomes {
            let mut state = collecting_with(&["Heat"]);
            state.proceed().unwrap();
            let request = state.submit().unwrap();
            state.resolve(request.request_id, outcome).unwrap();

            assert_eq!(state.step, Step::Results);
            assert!(!state.loading);
        }
    }

    #[test]
    fn test_legacy_failure_stays_on_details() {
        let mut state = WizardState::new(Flow::LegacyTv);
        state.add("Lost").unwrap();
        state.proceed().unwrap();
        let request = state.submit().unwrap();

        state
            .resolve(
                request.request_id,
                FetchOutcome::Failed {
                    reason: String::from("Server returned 503"),
                },
            )
            .unwrap();

        assert_eq!(state.step, Step::DetailsEntry);
        assert!(!state.loading);
        assert!(state.service_unavailable.is_some());

        // The user can try again.
        assert!(state.submit().is_ok());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut state = collecting_with(&["Dune"]);
        state.proceed().unwrap();
        let request = state.submit().unwrap();
        state.restart();

        state
            .resolve(
                request.request_id,
                FetchOutcome::Fresh(sample_recommendations(Domain::Books)),
            )
            .unwrap();

        assert_eq!(state.step, Step::Collecting);
        assert!(state.recommendations.is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = collecting_with(&["Dune", "1984"]);
        state.proceed().unwrap();
        state.set_preference(PreferenceField::Mood, "light").unwrap();
        let request = state.submit().unwrap();
        state
            .resolve(
                request.request_id,
                FetchOutcome::Fresh(sample_recommendations(Domain::Books)),
            )
            .unwrap();

        state.restart();

        assert_eq!(state.step, Step::Collecting);
        assert_eq!(state.flow, Flow::Books);
        assert!(state.titles.is_empty());
        assert_eq!(state.preferences, Preferences::default());
        assert!(state.recommendations.is_empty());
        assert!(!state.loading && !state.capacity_reached && !state.input_error.is_some());

        assert_eq!(state.proceed(), Err(WizardError::NoTitlesProvided));
    }

    #[test]
    fn test_illegal_events_leave_state_unchanged() {
        let mut state = collecting_with(&["Dune"]);
        assert!(state.back().is_err());

        state.proceed().unwrap();
        assert!(state.proceed().is_err());
        assert!(state.add("1984").is_err());
        assert!(state.remove(0).is_err());
        assert_eq!(state.titles.len(), 1);
        assert_eq!(state.step, Step::DetailsEntry);
    }

    #[test]
    fn test_apply_is_pure_over_values() {
        let state = collecting_with(&["Dune"]);
        let transition = apply(state.clone(), WizardEvent::Continue);

        assert_eq!(transition.state.step, Step::DetailsEntry);
        assert_eq!(state.step, Step::Collecting);
        assert!(transition.effect.is_none());
        assert!(transition.rejected.is_none());
    }
}
