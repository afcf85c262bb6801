//! The autocomplete search interaction.
//!
//! [`SearchController`] is a pure state machine: it consumes [`SearchEvent`]s and answers with
//! [`Effect`]s for its host to carry out (arm a timer, fetch suggestions, navigate). It never
//! sleeps or performs I/O itself, which keeps it independent of any UI runtime.
//! [`session::SearchSession`] is the tokio host used by the TUI.
//!
//! Race safety relies on two rules:
//! - every keystroke replaces the pending debounce timer (tagged with a [`Generation`]), so only
//!   the last keystroke can trigger a lookup;
//! - every lookup is tagged with a [`Sequence`] and its response is only applied if it is the
//!   latest one issued and nothing was typed since.

use std::fmt;
use std::time::Duration;

use crate::api::ApiError;
use crate::model::Suggestion;
use crate::options::EgotOptions;

pub mod session;

pub use session::SearchSession;

/// Identifies a debounce timer
pub type Generation = u64;
/// Identifies an autocomplete request
pub type Sequence = u64;

/// Lifecycle of the search interaction
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing pending and no panel shown
    #[default]
    Idle,
    /// A keystroke is waiting for the debounce delay
    Debouncing,
    /// A lookup has been issued for the current query
    AwaitingSuggestions,
    /// The latest lookup returned suggestions and the panel shows them
    SuggestionsShown,
    /// A celebrity has been chosen; the host is navigating away
    Submitting,
}

/// Keys with a meaning for the suggestion panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// Move the highlight down
    Down,
    /// Move the highlight up, back to the raw query past the first row
    Up,
    /// Commit the highlighted suggestion, or submit the query
    Enter,
    /// Hide the panel
    Escape,
}

/// Inputs of the search interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The input text changed
    Input(String),
    /// A debounce timer expired
    DebounceElapsed(Generation),
    /// An autocomplete request completed
    SuggestionsLoaded {
        /// The request this answers
        seq: Sequence,
        /// Suggestions, or why there are none
        result: Result<Vec<Suggestion>, ApiError>,
    },
    /// A key was pressed in the input
    Key(SearchKey),
    /// A suggestion row was clicked
    Click(usize),
    /// The form was submitted
    Submit,
    /// The input gained focus
    Focus,
    /// Interaction outside both the input and the panel
    Dismiss,
    /// The host is going away
    Teardown,
}

/// Work the host must carry out on behalf of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the debounce timer, replacing any pending one
    ScheduleLookup {
        /// Tag to report back in [`SearchEvent::DebounceElapsed`]
        generation: Generation,
        /// How long to wait
        delay: Duration,
    },
    /// Disarm the debounce timer and forget in-flight lookups
    CancelLookup,
    /// Fetch suggestions, answering with [`SearchEvent::SuggestionsLoaded`]
    FetchSuggestions {
        /// Tag of the request
        seq: Sequence,
        /// Text to complete
        query: String,
    },
    /// Leave the search for a celebrity's page
    Navigate(Navigation),
}

/// A move to a celebrity's detail page.
///
/// The display name is the lookup key: two celebrities sharing a name share a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    name: String,
    route: String,
}

impl Navigation {
    /// Navigation to the detail page of `name`
    pub fn celebrity(name: &str) -> Self {
        Self {
            name: name.to_string(),
            route: format!("/celebrity/{}", urlencoding::encode(name)),
        }
    }

    /// Parse a `/celebrity/<name>` route back into a navigation
    pub fn from_route(route: &str) -> Option<Self> {
        let encoded = route.strip_prefix("/celebrity/")?;
        let name = urlencoding::decode(encoded).ok()?;
        if name.trim().is_empty() {
            return None;
        }
        Some(Self::celebrity(&name))
    }

    /// The celebrity display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The route, with the name percent-encoded
    pub fn route(&self) -> &str {
        &self.route
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route)
    }
}

/// State of the search input and its suggestion panel
#[derive(Debug, Clone)]
pub struct SearchController {
    query: String,
    suggestions: Vec<Suggestion>,
    selected: Option<usize>,
    panel_visible: bool,
    is_submitting: bool,
    phase: Phase,
    generation: Generation,
    latest_seq: Sequence,
    torn_down: bool,
    debounce: Duration,
    min_query_length: usize,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), 2)
    }
}

impl SearchController {
    /// A controller waiting `debounce` after the last keystroke, and looking up queries of at
    /// least `min_query_length` characters
    pub fn new(debounce: Duration, min_query_length: usize) -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            selected: None,
            panel_visible: false,
            is_submitting: false,
            phase: Phase::Idle,
            generation: 0,
            latest_seq: 0,
            torn_down: false,
            debounce,
            min_query_length,
        }
    }

    /// A controller using the timings of `options`
    pub fn from_options(options: &EgotOptions) -> Self {
        Self::new(options.debounce(), options.min_query_length)
    }

    /// The input text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The suggestions of the last applied lookup, shown or not
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// The suggestions to draw: empty while the panel is hidden
    pub fn visible_suggestions(&self) -> &[Suggestion] {
        if self.panel_visible {
            &self.suggestions
        } else {
            &[]
        }
    }

    /// The highlighted row, `None` meaning the raw query
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The highlighted row, -1 meaning the raw query
    pub fn selected_index(&self) -> isize {
        self.selected.map_or(-1, |i| i as isize)
    }

    /// Whether the suggestion panel is shown
    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible && !self.suggestions.is_empty()
    }

    /// Whether a commit already happened
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Feed an event, returning the effects to carry out in order
    pub fn handle(&mut self, event: SearchEvent) -> Vec<Effect> {
        if self.torn_down {
            trace!("search torn down, ignoring {event:?}");
            return Vec::new();
        }
        match event {
            SearchEvent::Input(text) => self.on_input(text),
            SearchEvent::DebounceElapsed(generation) => self.on_debounce(generation),
            SearchEvent::SuggestionsLoaded { seq, result } => {
                self.on_suggestions(seq, result);
                Vec::new()
            }
            SearchEvent::Key(key) => self.on_key(key),
            SearchEvent::Click(index) => {
                if self.is_panel_visible() && index < self.suggestions.len() {
                    self.commit(index)
                } else {
                    Vec::new()
                }
            }
            SearchEvent::Submit => self.submit(),
            SearchEvent::Focus => {
                if !self.suggestions.is_empty() && !self.is_submitting {
                    self.panel_visible = true;
                    if self.phase == Phase::Idle {
                        self.phase = Phase::SuggestionsShown;
                    }
                }
                Vec::new()
            }
            SearchEvent::Dismiss => {
                self.hide_panel();
                Vec::new()
            }
            SearchEvent::Teardown => {
                self.torn_down = true;
                vec![Effect::CancelLookup]
            }
        }
    }

    fn on_input(&mut self, text: String) -> Vec<Effect> {
        if self.is_submitting {
            return Vec::new();
        }
        self.query = text;
        self.generation += 1;
        self.phase = Phase::Debouncing;
        vec![Effect::ScheduleLookup {
            generation: self.generation,
            delay: self.debounce,
        }]
    }

    fn on_debounce(&mut self, generation: Generation) -> Vec<Effect> {
        if generation != self.generation || self.phase != Phase::Debouncing {
            trace!("stale debounce timer {generation}, latest is {}", self.generation);
            return Vec::new();
        }
        if self.query.trim().chars().count() >= self.min_query_length {
            self.latest_seq += 1;
            self.phase = Phase::AwaitingSuggestions;
            debug!("looking up suggestions #{} for {:?}", self.latest_seq, self.query);
            vec![Effect::FetchSuggestions {
                seq: self.latest_seq,
                query: self.query.clone(),
            }]
        } else {
            self.clear_suggestions();
            self.phase = Phase::Idle;
            Vec::new()
        }
    }

    fn on_suggestions(&mut self, seq: Sequence, result: Result<Vec<Suggestion>, ApiError>) {
        if seq != self.latest_seq || self.phase != Phase::AwaitingSuggestions {
            debug!("dropping stale suggestions #{seq}, latest is #{}", self.latest_seq);
            return;
        }
        match result {
            Ok(suggestions) => {
                debug!("got {} suggestions for {:?}", suggestions.len(), self.query);
                self.panel_visible = !suggestions.is_empty();
                self.phase = if suggestions.is_empty() {
                    Phase::Idle
                } else {
                    Phase::SuggestionsShown
                };
                self.suggestions = suggestions;
                self.selected = None;
            }
            Err(e) => {
                warn!("autocomplete failed for {:?}: {e}", self.query);
                self.clear_suggestions();
                self.phase = Phase::Idle;
            }
        }
    }

    fn on_key(&mut self, key: SearchKey) -> Vec<Effect> {
        if !self.is_panel_visible() {
            return match key {
                SearchKey::Enter => self.submit(),
                _ => Vec::new(),
            };
        }
        let last = self.suggestions.len() - 1;
        match key {
            SearchKey::Down => {
                self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
            }
            SearchKey::Up => {
                self.selected = self.selected.and_then(|i| i.checked_sub(1));
            }
            SearchKey::Enter => {
                return match self.selected {
                    Some(index) => self.commit(index),
                    None => self.submit(),
                };
            }
            SearchKey::Escape => self.hide_panel(),
        }
        Vec::new()
    }

    fn commit(&mut self, index: usize) -> Vec<Effect> {
        let name = self.suggestions[index].name.clone();
        debug!("committing suggestion {index}: {name}");
        self.query = name;
        self.panel_visible = false;
        self.navigate()
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.is_submitting || self.query.trim().is_empty() {
            return Vec::new();
        }
        self.query = self.query.trim().to_string();
        self.panel_visible = false;
        self.navigate()
    }

    fn navigate(&mut self) -> Vec<Effect> {
        self.is_submitting = true;
        self.phase = Phase::Submitting;
        vec![Effect::CancelLookup, Effect::Navigate(Navigation::celebrity(&self.query))]
    }

    /// Hide the panel, keeping suggestions and selection for a later focus
    fn hide_panel(&mut self) {
        self.panel_visible = false;
        if self.phase == Phase::SuggestionsShown {
            self.phase = Phase::Idle;
        }
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.selected = None;
        self.panel_visible = false;
    }
}
