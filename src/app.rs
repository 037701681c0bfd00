//! Main application state and logic.

use color_eyre::Result;
use ratatui_image::picker::Picker;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::client::{LegacyTvClient, RecommendationClient};
use crate::config::Config;
use crate::ui::{CollectState, DetailsState, ResultsState};
use crate::wizard::{Effect, FetchRequest, Flow, Step, WizardEvent, WizardState};

/// One tab: a wizard plus the view state of its three steps.
pub struct FlowPanel {
    pub wizard: WizardState,
    pub collect: CollectState,
    pub details: DetailsState,
    pub results: ResultsState,
}

impl FlowPanel {
    pub fn new(flow: Flow) -> Self {
        Self {
            wizard: WizardState::new(flow),
            collect: CollectState::new(),
            details: DetailsState::new(),
            results: ResultsState::new(),
        }
    }

    /// Clear the wizard and every view.
    fn restart(&mut self) {
        self.wizard.restart();
        self.collect = CollectState::new();
        self.details = DetailsState::new();
        self.results.reset(0);
    }
}

/// The independent wizard instances, one per flow.
pub struct Panels {
    books: FlowPanel,
    anime: FlowPanel,
    movies: FlowPanel,
    legacy_tv: FlowPanel,
}

impl Panels {
    fn new() -> Self {
        Self {
            books: FlowPanel::new(Flow::Books),
            anime: FlowPanel::new(Flow::Anime),
            movies: FlowPanel::new(Flow::Movies),
            legacy_tv: FlowPanel::new(Flow::LegacyTv),
        }
    }

    pub fn get(&self, flow: Flow) -> &FlowPanel {
        match flow {
            Flow::Books => &self.books,
            Flow::Anime => &self.anime,
            Flow::Movies => &self.movies,
            Flow::LegacyTv => &self.legacy_tv,
        }
    }

    pub fn get_mut(&mut self, flow: Flow) -> &mut FlowPanel {
        match flow {
            Flow::Books => &mut self.books,
            Flow::Anime => &mut self.anime,
            Flow::Movies => &mut self.movies,
            Flow::LegacyTv => &mut self.legacy_tv,
        }
    }
}

/// Main application state.
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,

    /// Configuration
    pub config: Config,

    /// Unified recommendation client
    pub client: RecommendationClient,

    /// Legacy TV client
    pub legacy: LegacyTvClient,

    /// Active tab
    pub flow: Flow,

    /// Tabs shown in the tab bar
    pub flows: Vec<Flow>,

    /// Wizard state per tab
    pub panels: Panels,

    /// Image picker for terminal graphics
    pub picker: Option<Picker>,

    /// Help overlay visible
    pub show_help: bool,

    /// Error message to display
    pub error_message: Option<String>,

    /// Action sender for async operations
    pub action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let client =
            RecommendationClient::new(&config.server.url, config.recommendations.fallback);
        let legacy = LegacyTvClient::new(&config.server.legacy_url);
        let flows = config.enabled_flows();
        let flow = Flow::from(config.ui.default_domain);

        Self {
            should_quit: false,
            config,
            client,
            legacy,
            flow,
            flows,
            panels: Panels::new(),
            picker: None,
            show_help: false,
            error_message: None,
            action_tx,
        }
    }

    /// Initialize terminal-dependent state. Call after the terminal is set up.
    pub fn init(&mut self) {
        if self.config.ui.show_covers {
            self.picker = Picker::from_query_stdio().ok();
            if self.picker.is_none() {
                tracing::info!("Terminal graphics unavailable, covers disabled");
            }
        }

        if !self.config.is_valid() {
            self.error_message = Some(String::from(
                "Invalid configuration. Service URLs must start with http:// or https://",
            ));
        }

        tracing::info!(
            "Using recommendation service at {} (legacy TV: {})",
            self.client.base_url(),
            if self.config.recommendations.legacy_tv {
                self.config.server.legacy_url.as_str()
            } else {
                "disabled"
            }
        );
    }

    /// The active tab's panel.
    pub fn panel(&self) -> &FlowPanel {
        self.panels.get(self.flow)
    }

    fn panel_mut(&mut self) -> &mut FlowPanel {
        self.panels.get_mut(self.flow)
    }

    /// Handle an action and update state.
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }

            Action::Tick => {
                for flow in Flow::all() {
                    let panel = self.panels.get_mut(*flow);
                    if panel.wizard.loading {
                        panel.details.tick();
                    }
                }

                // Debounced title search for the legacy flow
                if self.flow == Flow::LegacyTv {
                    let panel = self.panels.get(Flow::LegacyTv);
                    if panel.wizard.step == Step::Collecting
                        && panel.collect.should_search(&panel.wizard.draft)
                    {
                        self.search_titles();
                    }
                }
            }

            // Tabs
            Action::SwitchFlow(flow) => {
                if self.flows.contains(&flow) {
                    self.flow = flow;
                    self.request_cover()?;
                } else {
                    tracing::debug!("Ignoring switch to disabled flow {:?}", flow);
                }
            }

            Action::NextFlow => {
                self.flow = self.flow.next_in(&self.flows);
                self.request_cover()?;
            }

            Action::PrevFlow => {
                self.flow = self.flow.prev_in(&self.flows);
                self.request_cover()?;
            }

            // Title entry
            Action::TitleInput(c) => {
                if !self.panel().wizard.capacity_reached
                    && self.dispatch(WizardEvent::Input(c)).is_some()
                {
                    self.panel_mut().collect.draft_changed();
                }
            }

            Action::TitleBackspace => {
                if self.dispatch(WizardEvent::Backspace).is_some() {
                    self.panel_mut().collect.draft_changed();
                }
            }

            Action::ConfirmTitle => {
                if self.dispatch(WizardEvent::Confirm).is_some() {
                    let panel = self.panel_mut();
                    panel.collect.clear_suggestions();
                    panel.collect.clamp_selection(panel.wizard.titles.len());
                }
            }

            Action::RemoveSelectedTitle => {
                let panel = self.panel();
                if panel.wizard.step != Step::Collecting || panel.wizard.titles.is_empty() {
                    return Ok(());
                }
                let index = panel.collect.list_state.selected().unwrap_or(0);
                if self.dispatch(WizardEvent::Remove(index)).is_some() {
                    let panel = self.panel_mut();
                    panel.collect.clamp_selection(panel.wizard.titles.len());
                }
            }

            Action::AcceptSuggestion => {
                let Some(title) = self.panel().collect.selected_suggestion().map(String::from)
                else {
                    return Ok(());
                };
                if self.dispatch(WizardEvent::Add(title)).is_some() {
                    let panel = self.panel_mut();
                    panel.wizard.draft.clear();
                    panel.collect.clear_suggestions();
                    panel.collect.clamp_selection(panel.wizard.titles.len());
                }
            }

            Action::NextSuggestion => {
                self.panel_mut().collect.next_suggestion();
            }

            Action::PrevSuggestion => {
                self.panel_mut().collect.prev_suggestion();
            }

            // Navigation
            Action::NavigateUp => {
                let panel = self.panel_mut();
                match panel.wizard.step {
                    Step::Collecting => panel.collect.select_previous(panel.wizard.titles.len()),
                    Step::DetailsEntry => panel.details.select_previous(),
                    Step::Results => {
                        panel
                            .results
                            .select_previous(panel.wizard.recommendations.len());
                        self.request_cover()?;
                    }
                }
            }

            Action::NavigateDown => {
                let panel = self.panel_mut();
                match panel.wizard.step {
                    Step::Collecting => panel.collect.select_next(panel.wizard.titles.len()),
                    Step::DetailsEntry => panel.details.select_next(),
                    Step::Results => {
                        panel.results.select_next(panel.wizard.recommendations.len());
                        self.request_cover()?;
                    }
                }
            }

            // Wizard steps
            Action::Continue => {
                if self.dispatch(WizardEvent::Continue).is_some() {
                    self.panel_mut().collect.clear_suggestions();
                }
            }

            Action::Back => {
                self.dispatch(WizardEvent::Back);
            }

            Action::Submit => {
                if let Some(Some(Effect::Fetch(request))) = self.dispatch(WizardEvent::Submit) {
                    self.spawn_fetch(self.flow, request);
                }
            }

            Action::Restart => {
                self.panel_mut().restart();
                tracing::debug!("Restarted {:?} wizard", self.flow);
            }

            // Preferences
            Action::CyclePreference { forward } => {
                let panel = self.panel();
                let field = panel.details.field;
                let next = panel.wizard.flow.cycle_choice(
                    field,
                    panel.wizard.preferences.get(field),
                    forward,
                );
                if panel.wizard.step == Step::DetailsEntry && !panel.wizard.loading {
                    self.dispatch(WizardEvent::SetPreference(field, next.to_string()));
                }
            }

            Action::ClearPreference => {
                let panel = self.panel();
                let field = panel.details.field;
                if panel.wizard.step == Step::DetailsEntry && !panel.wizard.loading {
                    self.dispatch(WizardEvent::SetPreference(field, String::new()));
                }
            }

            // Service responses
            Action::RecommendationsLoaded {
                flow,
                request_id,
                outcome,
            } => {
                let panel = self.panels.get_mut(flow);
                let was_loading = panel.wizard.loading;
                if let Err(e) = panel.wizard.resolve(request_id, outcome) {
                    tracing::warn!("Failed to apply {:?} results: {}", flow, e);
                    return Ok(());
                }
                if was_loading && panel.wizard.step == Step::Results {
                    panel.results.reset(panel.wizard.recommendations.len());
                    if flow == self.flow {
                        self.request_cover()?;
                    }
                }
            }

            Action::SuggestionsLoaded { query, titles } => {
                self.panels
                    .get_mut(Flow::LegacyTv)
                    .collect
                    .set_suggestions(&query, titles);
            }

            // Covers
            Action::LoadCover(url) => {
                self.load_cover(url);
            }

            Action::CoverLoaded(url, data) => {
                if let Some(picker) = &self.picker {
                    for flow in Flow::all() {
                        self.panels
                            .get_mut(*flow)
                            .results
                            .set_cover(picker, &url, &data);
                    }
                }
            }

            // Overlays
            Action::ShowHelp => {
                self.show_help = true;
            }

            Action::HideHelp => {
                self.show_help = false;
            }

            Action::ClearError => {
                self.error_message = None;
            }

            Action::None => {}
        }

        Ok(())
    }

    /// Apply a wizard event to the active tab. Returns the effect on success.
    fn dispatch(&mut self, event: WizardEvent) -> Option<Option<Effect>> {
        let flow = self.flow;
        match self.panel_mut().wizard.dispatch(event) {
            Ok(effect) => Some(effect),
            Err(e) => {
                tracing::debug!("{:?} wizard rejected event: {}", flow, e);
                None
            }
        }
    }

    /// Run a recommendation request in the background.
    fn spawn_fetch(&self, flow: Flow, request: FetchRequest) {
        let tx = self.action_tx.clone();
        let FetchRequest {
            request_id,
            titles,
            preferences,
        } = request;

        match flow.domain() {
            Some(domain) => {
                let client = self.client.clone();
                tokio::spawn(async move {
                    let outcome = client.recommend(domain, &titles, &preferences).await;
                    if tx
                        .send(Action::RecommendationsLoaded {
                            flow,
                            request_id,
                            outcome,
                        })
                        .is_err()
                    {
                        tracing::debug!("Dropping {:?} results after shutdown", flow);
                    }
                });
            }
            None => {
                let legacy = self.legacy.clone();
                tokio::spawn(async move {
                    let outcome = legacy.recommend(&titles, &preferences).await;
                    if tx
                        .send(Action::RecommendationsLoaded {
                            flow,
                            request_id,
                            outcome,
                        })
                        .is_err()
                    {
                        tracing::debug!("Dropping {:?} results after shutdown", flow);
                    }
                });
            }
        }
    }

    /// Search legacy show titles for the current draft.
    fn search_titles(&mut self) {
        let panel = self.panels.get_mut(Flow::LegacyTv);
        let query = panel.wizard.draft.trim().to_string();
        panel.collect.mark_search_started(&query);

        let legacy = self.legacy.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let titles = match legacy.search(&query).await {
                Ok(titles) => titles,
                Err(e) => {
                    tracing::warn!("Title search failed: {}", e);
                    Vec::new()
                }
            };
            let _ = tx.send(Action::SuggestionsLoaded { query, titles });
        });
    }

    /// Ask for the selected card's cover if it changed.
    fn request_cover(&mut self) -> Result<()> {
        if self.picker.is_none() || !self.config.ui.show_covers {
            return Ok(());
        }

        let panel = self.panels.get_mut(self.flow);
        if panel.wizard.step != Step::Results {
            return Ok(());
        }
        let url = panel
            .results
            .list_state
            .selected()
            .and_then(|i| panel.wizard.recommendations.get(i))
            .and_then(|rec| rec.image_url());

        if panel.results.want_cover(url.clone()) {
            if let Some(url) = url {
                self.action_tx.send(Action::LoadCover(url))?;
            }
        }
        Ok(())
    }

    /// Fetch cover bytes in the background.
    fn load_cover(&self, url: String) {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let bytes = match reqwest::get(&url).await {
                Ok(response) if response.status().is_success() => response.bytes().await,
                Ok(response) => {
                    tracing::warn!("Failed to load cover {}: {}", url, response.status());
                    return;
                }
                Err(e) => Err(e),
            };
            match bytes {
                Ok(bytes) => {
                    let _ = tx.send(Action::CoverLoaded(url, bytes.to_vec()));
                }
                Err(e) => {
                    tracing::warn!("Failed to load cover {}: {}", url, e);
                }
            }
        });
    }
}
