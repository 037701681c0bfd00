//! Application actions/events that drive state changes.

use crate::client::FetchOutcome;
use crate::wizard::Flow;

/// Actions that can be dispatched to update application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application lifecycle
    Quit,
    Tick,

    // Flow tabs
    SwitchFlow(Flow),
    NextFlow,
    PrevFlow,

    // Title entry
    TitleInput(char),
    TitleBackspace,
    ConfirmTitle,
    RemoveSelectedTitle,
    AcceptSuggestion,
    NextSuggestion,
    PrevSuggestion,

    // Navigation
    NavigateUp,
    NavigateDown,

    // Wizard steps
    Continue,
    Back,
    Submit,
    Restart,

    // Preferences
    CyclePreference { forward: bool },
    ClearPreference,

    // Service responses
    RecommendationsLoaded {
        flow: Flow,
        request_id: u64,
        outcome: FetchOutcome,
    },
    SuggestionsLoaded {
        query: String,
        titles: Vec<String>,
    },

    // Covers
    LoadCover(String),
    CoverLoaded(String, Vec<u8>),

    // Overlays
    ShowHelp,
    HideHelp,

    // Errors
    ClearError,

    // No-op
    None,
}
