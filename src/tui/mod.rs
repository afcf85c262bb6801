//! Interactive terminal front-end.
//!
//! The search screen hosts a [`SearchSession`]; committing a suggestion (or submitting the
//! query) opens the celebrity's detail page, which shows the loading progress until the lookup
//! ends. From the detail page the user can go back to the search or quit.

use std::cell::Cell;

use color_eyre::eyre::{OptionExt, Result, bail};

pub use app::{App, Screen};
pub use backend::Tui;
pub use event::Event;

use crate::api::CelebrityApi;
use crate::detail::{DetailPage, LoadingProgress};
use crate::options::EgotOptions;
use crate::search::{Navigation, SearchEvent, SearchSession};

mod app;
mod backend;
/// Terminal events
pub mod event;
mod input;

/// Outcome of an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiOutput {
    /// The search input when leaving
    pub query: String,
    /// The last celebrity navigated to
    pub navigation: Option<Navigation>,
    /// Whether the user left without ever choosing a celebrity
    pub is_abort: bool,
}

/// Run the interactive search until the user quits
pub async fn run<C: CelebrityApi>(options: &EgotOptions, client: &C) -> Result<TuiOutput> {
    let mut tui = Tui::new(!options.no_mouse)?;
    tui.enter()?;
    let mut app = App::new(options.query.as_deref().unwrap_or_default());
    let mut last_navigation = None;

    loop {
        let Some(navigation) = search(&mut tui, &mut app, client, options).await? else {
            break;
        };
        debug!("navigating to {navigation}");
        let mut page = DetailPage::from_navigation(&navigation, options);
        last_navigation = Some(navigation);

        app.screen = Screen::Loading;
        if load(&mut tui, &mut app, client, &mut page).await? {
            app.screen = Screen::Detail;
            show_detail(&mut tui, &mut app, &page).await?;
        }
        if app.should_quit {
            break;
        }
        app.back_to_search();
    }

    tui.exit()?;
    Ok(TuiOutput {
        query: app.query().to_string(),
        is_abort: last_navigation.is_none(),
        navigation: last_navigation,
    })
}

async fn search<C: CelebrityApi>(
    tui: &mut Tui,
    app: &mut App,
    client: &C,
    options: &EgotOptions,
) -> Result<Option<Navigation>> {
    let mut session = SearchSession::from_options(client, options);
    if !app.query().is_empty() {
        session.dispatch(SearchEvent::Input(app.query().to_string()));
    }

    loop {
        tui.draw(|f| app.render_search(f, session.controller()))?;
        let events = tokio::select! {
            event = tui.next() => {
                match event.ok_or_eyre("Could not acquire next event")? {
                    Event::Key(key) => app.handle_search_key(&key, session.controller()),
                    Event::Mouse(mouse) => app.handle_search_mouse(&mouse, session.controller()),
                    Event::Paste(text) => app.handle_paste(&text),
                    Event::Error(msg) => bail!(msg),
                    Event::Quit => {
                        app.should_quit = true;
                        Vec::new()
                    }
                    Event::Render | Event::Resize => Vec::new(),
                }
            }
            navigation = session.tick() => {
                if navigation.is_some() {
                    app.sync_query(session.controller());
                    return Ok(navigation);
                }
                Vec::new()
            }
        };

        for event in events {
            if let Some(navigation) = session.dispatch(event) {
                app.sync_query(session.controller());
                return Ok(Some(navigation));
            }
        }
        if app.should_quit {
            session.dispatch(SearchEvent::Teardown);
            return Ok(None);
        }
    }
}

/// Returns false if the user left before the lookup ended
async fn load<C: CelebrityApi>(tui: &mut Tui, app: &mut App, client: &C, page: &mut DetailPage) -> Result<bool> {
    let name = page.name().to_string();
    let progress = Cell::new(LoadingProgress::default());
    let loading = page.load(client, |p| progress.set(*p));
    tokio::pin!(loading);

    loop {
        tui.draw(|f| app.render_loading(f, &name, &progress.get()))?;
        tokio::select! {
            _ = &mut loading => return Ok(true),
            event = tui.next() => match event.ok_or_eyre("Could not acquire next event")? {
                Event::Key(key) => app.handle_detail_key(&key),
                Event::Error(msg) => bail!(msg),
                Event::Quit => app.should_quit = true,
                _ => {}
            }
        }
        if app.should_quit || app.should_go_back {
            debug!("lookup of {name} abandoned");
            return Ok(false);
        }
    }
}

async fn show_detail(tui: &mut Tui, app: &mut App, page: &DetailPage) -> Result<()> {
    loop {
        tui.draw(|f| app.render_detail(f, page))?;
        match tui.next().await.ok_or_eyre("Could not acquire next event")? {
            Event::Key(key) => app.handle_detail_key(&key),
            Event::Mouse(mouse) => app.handle_detail_mouse(&mouse),
            Event::Error(msg) => bail!(msg),
            Event::Quit => app.should_quit = true,
            Event::Render | Event::Resize | Event::Paste(_) => {}
        }
        if app.should_quit || app.should_go_back {
            return Ok(());
        }
    }
}
