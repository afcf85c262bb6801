//! The celebrity detail page: a bounded lookup with a progressing loading indicator.
//!
//! Looking a new celebrity up can take a while on the API side, so while the request is pending
//! the page steps through a fixed list of messages, one per loading interval, and stops at the
//! last one. The fetch itself is bounded by the request timeout.

use std::time::Duration;

use tokio::time::{Instant, interval_at, timeout};

use crate::aggregate::{AwardGroups, EgotStatus, compute_egot_status, group_awards_by_type};
use crate::api::{ApiError, CelebrityApi};
use crate::model::Celebrity;
use crate::options::EgotOptions;
use crate::search::Navigation;

/// Messages shown while a celebrity is loading, in order
pub const LOADING_MESSAGES: [&str; 5] = [
    "Searching the archives...",
    "Checking our records...",
    "Fetching from Wikidata...",
    "Gathering award history...",
    "Almost there...",
];

/// Shown under the loading message once the lookup is slow
pub const SLOW_HINT: &str = "New celebrity - fetching from Wikidata may take a moment...";

const SLOW_FROM: usize = 2;
const MAX_FILL: f64 = 0.9;
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Position in [`LOADING_MESSAGES`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadingProgress {
    index: usize,
}

impl LoadingProgress {
    /// Index of the current message
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current message
    pub fn message(&self) -> &'static str {
        LOADING_MESSAGES[self.index]
    }

    /// Move to the next message, staying on the last one
    pub fn advance(&mut self) {
        self.index = (self.index + 1).min(LOADING_MESSAGES.len() - 1);
    }

    /// Whether [`SLOW_HINT`] should be shown
    pub fn shows_slow_hint(&self) -> bool {
        self.index >= SLOW_FROM
    }

    /// Fill of the progress bar, between 0 and 0.9
    pub fn fill_fraction(&self) -> f64 {
        ((self.index + 1) as f64 / LOADING_MESSAGES.len() as f64).min(MAX_FILL)
    }
}

/// Where a detail page stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// The lookup is pending
    Loading(LoadingProgress),
    /// The celebrity was found
    Loaded(Celebrity),
    /// The lookup failed or timed out
    Failed(ApiError),
}

/// The detail page of one celebrity
#[derive(Debug, Clone)]
pub struct DetailPage {
    name: String,
    state: DetailState,
    interval: Duration,
    timeout: Duration,
}

impl DetailPage {
    /// A page for `name`, with a 2 s loading interval and a 30 s timeout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: DetailState::Loading(LoadingProgress::default()),
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
        }
    }

    /// A page for `name` with the timings of `options`
    pub fn from_options(name: impl Into<String>, options: &EgotOptions) -> Self {
        Self::new(name).with_timings(options.loading_interval(), options.request_timeout())
    }

    /// The page a search navigated to
    pub fn from_navigation(navigation: &Navigation, options: &EgotOptions) -> Self {
        Self::from_options(navigation.name(), options)
    }

    /// Override the loading interval and the lookup timeout.
    ///
    /// The interval is at least one millisecond.
    pub fn with_timings(mut self, interval: Duration, timeout: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self.timeout = timeout;
        self
    }

    /// The name being looked up
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state
    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Whether the lookup is pending
    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading(_))
    }

    /// The celebrity, once loaded
    pub fn celebrity(&self) -> Option<&Celebrity> {
        match &self.state {
            DetailState::Loaded(celebrity) => Some(celebrity),
            _ => None,
        }
    }

    /// The failure, if the lookup failed
    pub fn error(&self) -> Option<&ApiError> {
        match &self.state {
            DetailState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// EGOT status of the loaded celebrity
    pub fn status(&self) -> Option<EgotStatus> {
        self.celebrity().map(|c| compute_egot_status(&c.awards))
    }

    /// Awards of the loaded celebrity, grouped by type
    pub fn groups(&self) -> Option<AwardGroups> {
        self.celebrity().map(|c| group_awards_by_type(&c.awards))
    }

    /// Look the celebrity up.
    ///
    /// `on_progress` is called with the initial progress and then on every loading interval
    /// until the lookup completes. The page always ends up loaded or failed; a lookup still
    /// pending after the timeout fails with [`ApiError::Timeout`].
    pub async fn load<C, F>(&mut self, client: &C, mut on_progress: F) -> &DetailState
    where
        C: CelebrityApi,
        F: FnMut(&LoadingProgress),
    {
        let mut progress = LoadingProgress::default();
        self.state = DetailState::Loading(progress);
        on_progress(&progress);
        debug!("loading celebrity {:?}", self.name);

        let fetch = timeout(self.timeout, client.search_celebrity(&self.name));
        tokio::pin!(fetch);
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);

        let result = loop {
            tokio::select! {
                result = &mut fetch => break result.unwrap_or(Err(ApiError::Timeout)),
                _ = ticker.tick() => {
                    progress.advance();
                    trace!("loading {:?}: {}", self.name, progress.message());
                    self.state = DetailState::Loading(progress);
                    on_progress(&progress);
                }
            }
        };

        self.state = match result {
            Ok(celebrity) => {
                info!("loaded {} with {} awards", celebrity.name, celebrity.awards.len());
                DetailState::Loaded(celebrity)
            }
            Err(e) => {
                warn!("failed to load {:?}: {e}", self.name);
                DetailState::Failed(e)
            }
        };
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_caps_at_last_message() {
        let mut progress = LoadingProgress::default();
        assert_eq!(progress.message(), "Searching the archives...");
        for _ in 0..10 {
            progress.advance();
        }
        assert_eq!(progress.index(), 4);
        assert_eq!(progress.message(), "Almost there...");
    }

    #[test]
    fn slow_hint_from_third_message() {
        let mut progress = LoadingProgress::default();
        let mut hints = Vec::new();
        for _ in 0..5 {
            hints.push(progress.shows_slow_hint());
            progress.advance();
        }
        assert_eq!(hints, vec![false, false, true, true, true]);
    }

    #[test]
    fn fill_fraction_is_capped() {
        let mut progress = LoadingProgress::default();
        let mut fills = Vec::new();
        for _ in 0..6 {
            fills.push(progress.fill_fraction());
            progress.advance();
        }
        assert_eq!(fills, vec![0.2, 0.4, 0.6, 0.8, 0.9, 0.9]);
    }

    #[test]
    fn new_page_is_loading() {
        let page = DetailPage::new("Audra McDonald");
        assert!(page.is_loading());
        assert_eq!(page.name(), "Audra McDonald");
        assert!(page.celebrity().is_none());
        assert!(page.status().is_none());
    }

    #[test]
    fn timings_from_options() {
        let options = EgotOptions {
            loading_interval_ms: 500,
            request_timeout_secs: 5,
            ..Default::default()
        };
        let page = DetailPage::from_navigation(&Navigation::celebrity("Mel Brooks"), &options);
        assert_eq!(page.name(), "Mel Brooks");
        assert_eq!(page.interval, Duration::from_millis(500));
        assert_eq!(page.timeout, Duration::from_secs(5));
    }
}
