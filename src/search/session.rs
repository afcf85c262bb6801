//! Tokio host of the [`SearchController`].
//!
//! The session owns the single debounce timer and the in-flight lookups. Lookups are polled on
//! the caller's task rather than spawned, so the client does not need to be `Send` and dropping
//! the session drops every pending request with it.

use std::pin::Pin;

use futures::StreamExt;
use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Sleep;

use super::{Effect, Generation, Navigation, SearchController, SearchEvent};
use crate::api::CelebrityApi;
use crate::options::EgotOptions;

/// Drives a [`SearchController`] against a [`CelebrityApi`]
pub struct SearchSession<'c, C: CelebrityApi> {
    client: &'c C,
    controller: SearchController,
    timer: Option<(Generation, Pin<Box<Sleep>>)>,
    inflight: FuturesUnordered<LocalBoxFuture<'c, SearchEvent>>,
    navigation: Option<Navigation>,
}

impl<'c, C: CelebrityApi> SearchSession<'c, C> {
    /// Host `controller`, fetching suggestions from `client`
    pub fn new(client: &'c C, controller: SearchController) -> Self {
        Self {
            client,
            controller,
            timer: None,
            inflight: FuturesUnordered::new(),
            navigation: None,
        }
    }

    /// A session with a controller configured from `options`
    pub fn from_options(client: &'c C, options: &EgotOptions) -> Self {
        Self::new(client, SearchController::from_options(options))
    }

    /// The hosted controller, for rendering
    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    /// Whether neither a timer nor a lookup is pending
    pub fn is_idle(&self) -> bool {
        self.timer.is_none() && self.inflight.is_empty()
    }

    /// Apply an event and carry out the resulting effects.
    ///
    /// Returns the navigation if the event committed a choice.
    pub fn dispatch(&mut self, event: SearchEvent) -> Option<Navigation> {
        for effect in self.controller.handle(event) {
            self.apply(effect);
        }
        self.navigation.take()
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleLookup { generation, delay } => {
                // replacing the timer drops the previous one
                self.timer = Some((generation, Box::pin(tokio::time::sleep(delay))));
            }
            Effect::CancelLookup => {
                self.timer = None;
                self.inflight.clear();
            }
            Effect::FetchSuggestions { seq, query } => {
                let client = self.client;
                self.inflight.push(
                    async move {
                        let result = client.autocomplete(&query).await;
                        SearchEvent::SuggestionsLoaded { seq, result }
                    }
                    .boxed_local(),
                );
            }
            Effect::Navigate(navigation) => self.navigation = Some(navigation),
        }
    }

    /// Wait for the debounce timer or a lookup to complete and apply the outcome.
    ///
    /// Pending forever when the session is idle. Cancel safe: nothing is lost if the future is
    /// dropped before completion, so it can be used as a `tokio::select!` branch next to the
    /// input source.
    pub async fn tick(&mut self) -> Option<Navigation> {
        let event = self.next_event().await;
        self.dispatch(event)
    }

    async fn next_event(&mut self) -> SearchEvent {
        let Self { timer, inflight, .. } = self;
        let timer_fired = async {
            match timer.as_mut() {
                Some((generation, sleep)) => {
                    sleep.as_mut().await;
                    *generation
                }
                None => future::pending().await,
            }
        };
        tokio::select! {
            generation = timer_fired => {
                *timer = None;
                SearchEvent::DebounceElapsed(generation)
            }
            Some(event) = inflight.next(), if !inflight.is_empty() => event,
        }
    }

    /// Run until a choice is committed, or `events` is closed.
    ///
    /// Closing the channel tears the search down and returns `None`.
    pub async fn run(&mut self, mut events: UnboundedReceiver<SearchEvent>) -> Option<Navigation> {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if let Some(navigation) = self.dispatch(event) {
                            return Some(navigation);
                        }
                    }
                    None => {
                        debug!("search input closed");
                        self.dispatch(SearchEvent::Teardown);
                        return None;
                    }
                },
                navigation = self.tick() => {
                    if navigation.is_some() {
                        return navigation;
                    }
                }
            }
        }
    }
}
