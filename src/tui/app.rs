use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Flex, Position};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap};

use super::input::QueryInput;
use crate::aggregate::{compute_egot_status, group_awards_by_type};
use crate::detail::{DetailPage, DetailState, LoadingProgress, SLOW_HINT};
use crate::model::{Award, AwardType, Celebrity};
use crate::search::{SearchController, SearchEvent, SearchKey};

const TITLE: &str = " EGOT Tracker ";
const PLACEHOLDER: &str = "Search for a celebrity...";

/// What the terminal currently shows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The search input with its suggestions
    #[default]
    Search,
    /// A celebrity is being looked up
    Loading,
    /// A lookup ended, loaded or failed
    Detail,
}

/// View state of the interactive front-end
#[derive(Debug, Default)]
pub struct App {
    pub(crate) input: QueryInput,
    /// The current screen
    pub screen: Screen,
    /// Leave the application
    pub should_quit: bool,
    /// Go back from the detail page to the search
    pub should_go_back: bool,
    scroll: u16,
    input_area: Rect,
    suggestions_area: Rect,
}

impl App {
    /// An app showing the search, with `query` already typed
    pub fn new(query: &str) -> Self {
        Self {
            input: QueryInput::new(query),
            ..Default::default()
        }
    }

    /// The text of the search input
    pub fn query(&self) -> &str {
        self.input.value()
    }

    /// Take over the controller's query, e.g. the name of a committed suggestion
    pub fn sync_query(&mut self, controller: &SearchController) {
        if self.input.value() != controller.query() {
            self.input.set(controller.query());
        }
    }

    /// Return to the search screen, keeping the query
    pub fn back_to_search(&mut self) {
        self.screen = Screen::Search;
        self.should_go_back = false;
        self.scroll = 0;
    }

    /// Translate a key on the search screen into search events
    pub fn handle_search_key(&mut self, key: &KeyEvent, controller: &SearchController) -> Vec<SearchEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let before = self.input.value().to_string();
        let event = match (key.code, ctrl) {
            (KeyCode::Char('c'), true) | (KeyCode::Char('q'), true) => {
                self.should_quit = true;
                None
            }
            (KeyCode::Esc, _) => {
                if controller.is_panel_visible() {
                    Some(SearchEvent::Key(SearchKey::Escape))
                } else {
                    self.should_quit = true;
                    None
                }
            }
            (KeyCode::Down, _) | (KeyCode::Tab, _) | (KeyCode::Char('n'), true) | (KeyCode::Char('j'), true) => {
                Some(SearchEvent::Key(SearchKey::Down))
            }
            (KeyCode::Up, _) | (KeyCode::BackTab, _) | (KeyCode::Char('p'), true) | (KeyCode::Char('k'), true) => {
                Some(SearchEvent::Key(SearchKey::Up))
            }
            (KeyCode::Enter, _) => Some(SearchEvent::Key(SearchKey::Enter)),
            (KeyCode::Char('a'), true) | (KeyCode::Home, _) => {
                self.input.move_to_start();
                None
            }
            (KeyCode::Char('e'), true) | (KeyCode::End, _) => {
                self.input.move_to_end();
                None
            }
            (KeyCode::Char('b'), true) | (KeyCode::Left, _) => {
                self.input.move_left();
                None
            }
            (KeyCode::Char('f'), true) | (KeyCode::Right, _) => {
                self.input.move_right();
                None
            }
            (KeyCode::Char('w'), true) => {
                self.input.delete_backward_to_whitespace();
                None
            }
            (KeyCode::Char('u'), true) => {
                self.input.delete_to_beginning();
                None
            }
            (KeyCode::Backspace, _) | (KeyCode::Char('h'), true) => {
                self.input.delete_backward();
                None
            }
            (KeyCode::Delete, _) | (KeyCode::Char('d'), true) => {
                self.input.delete_forward();
                None
            }
            (KeyCode::Char(c), false) => {
                self.input.insert(c);
                None
            }
            _ => None,
        };
        let mut events = Vec::new();
        if self.input.value() != before {
            events.push(SearchEvent::Input(self.input.value().to_string()));
        }
        events.extend(event);
        events
    }

    /// Insert pasted text in the search input
    pub fn handle_paste(&mut self, text: &str) -> Vec<SearchEvent> {
        let before = self.input.value().to_string();
        self.input.insert_str(text);
        if self.input.value() != before {
            vec![SearchEvent::Input(self.input.value().to_string())]
        } else {
            Vec::new()
        }
    }

    /// Translate a mouse event on the search screen: clicking a row commits it, clicking the
    /// input shows the panel again, clicking anywhere else hides it
    pub fn handle_search_mouse(&mut self, mouse: &MouseEvent, controller: &SearchController) -> Vec<SearchEvent> {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if controller.is_panel_visible() && self.suggestions_area.contains(position) {
                    // one row of border above the list
                    let row = position.y.saturating_sub(self.suggestions_area.y + 1) as usize;
                    vec![SearchEvent::Click(row)]
                } else if self.input_area.contains(position) {
                    vec![SearchEvent::Focus]
                } else {
                    vec![SearchEvent::Dismiss]
                }
            }
            MouseEventKind::ScrollDown => vec![SearchEvent::Key(SearchKey::Down)],
            MouseEventKind::ScrollUp => vec![SearchEvent::Key(SearchKey::Up)],
            _ => Vec::new(),
        }
    }

    /// Keys of the loading and detail screens
    pub fn handle_detail_key(&mut self, key: &KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match (key.code, ctrl) {
            (KeyCode::Char('c'), true) | (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Backspace, _) | (KeyCode::Char('/'), _) | (KeyCode::Left, _) => self.should_go_back = true,
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.scroll = self.scroll.saturating_add(1),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.scroll = self.scroll.saturating_sub(1),
            (KeyCode::PageDown, _) | (KeyCode::Char(' '), _) => self.scroll = self.scroll.saturating_add(10),
            (KeyCode::PageUp, _) => self.scroll = self.scroll.saturating_sub(10),
            (KeyCode::Home, _) | (KeyCode::Char('g'), _) => self.scroll = 0,
            _ => {}
        }
    }

    /// Mouse wheel scrolls the detail page
    pub fn handle_detail_mouse(&mut self, mouse: &MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
    }

    /// Draw the search input and the suggestion panel
    pub fn render_search(&mut self, frame: &mut Frame, controller: &SearchController) {
        let [header_area, input_area, suggestions_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(frame.area());
        self.input_area = input_area;

        frame.render_widget(
            Paragraph::new(Line::from(TITLE).bold()).centered(),
            header_area,
        );

        let block = Block::default().borders(Borders::ALL).title(" Search ");
        let text = if self.input.value().is_empty() {
            Line::from(PLACEHOLDER).dark_gray()
        } else if controller.is_submitting() {
            Line::from(self.input.value()).dim()
        } else {
            Line::from(self.input.value())
        };
        frame.render_widget(Paragraph::new(text).block(block), input_area);
        if !controller.is_submitting() {
            frame.set_cursor_position((input_area.x + 1 + self.input.cursor_offset(), input_area.y + 1));
        }

        let suggestions = controller.visible_suggestions();
        if suggestions.is_empty() {
            self.suggestions_area = Rect::default();
            return;
        }
        let height = (suggestions.len() as u16 + 2).min(suggestions_area.height);
        let [list_area, _] = Layout::vertical([Constraint::Length(height), Constraint::Fill(1)]).areas(suggestions_area);
        self.suggestions_area = list_area;
        let items: Vec<ListItem> = suggestions.iter().map(|s| ListItem::new(s.name.as_str())).collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().reversed())
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(controller.selected());
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    /// Draw the loading message and its progress bar
    pub fn render_loading(&self, frame: &mut Frame, name: &str, progress: &LoadingProgress) {
        let [_, title_area, message_area, gauge_area, hint_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(frame.area());
        let [gauge_area] = Layout::horizontal([Constraint::Percentage(60)])
            .flex(Flex::Center)
            .areas(gauge_area);

        frame.render_widget(Paragraph::new(Line::from(name).bold()).centered(), title_area);
        frame.render_widget(Paragraph::new(progress.message()).centered(), message_area);
        frame.render_widget(
            Gauge::default().ratio(progress.fill_fraction()).label("").gauge_style(Style::default().yellow()),
            gauge_area,
        );
        if progress.shows_slow_hint() {
            frame.render_widget(Paragraph::new(Line::from(SLOW_HINT).dark_gray()).centered(), hint_area);
        }
    }

    /// Draw a finished lookup
    pub fn render_detail(&mut self, frame: &mut Frame, page: &DetailPage) {
        let area = frame.area();
        let text = match page.state() {
            DetailState::Loaded(celebrity) => celebrity_text(celebrity),
            DetailState::Failed(e) => vec![
                Line::from(page.name().to_string()).bold(),
                Line::default(),
                Line::from(e.to_string()).red(),
                Line::from(e.user_hint()).dark_gray(),
            ],
            DetailState::Loading(progress) => {
                self.render_loading(frame, page.name(), progress);
                return;
            }
        };
        let max_scroll = (text.len() as u16).saturating_sub(area.height.saturating_sub(2));
        self.scroll = self.scroll.min(max_scroll);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(TITLE)
            .title_bottom(" / search  q quit ");
        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: false }).scroll((self.scroll, 0)),
            area,
        );
    }
}

fn badge(kind: AwardType, won: bool) -> Span<'static> {
    let letter = format!(" {} ", kind.letter());
    if won {
        Span::raw(letter).black().on_yellow().bold()
    } else {
        Span::raw(letter).dark_gray()
    }
}

fn award_line(award: &Award) -> Line<'static> {
    let year = award.known_year().map_or(String::from("----"), |y| y.to_string());
    let mut spans = vec![Span::raw(format!("  {year}  "))];
    spans.push(if award.is_winner {
        Span::raw("Winner ").green().bold()
    } else {
        Span::raw("Nominee").dark_gray()
    });
    spans.push(Span::raw(format!("  {}", award.category)));
    if let Some(work) = &award.work {
        spans.push(Span::raw(format!(" - {work}")).italic());
    }
    if award.is_upcoming == Some(true) {
        spans.push(Span::raw(" (upcoming)").cyan());
    }
    Line::from(spans)
}

fn celebrity_text(celebrity: &Celebrity) -> Vec<Line<'static>> {
    let status = compute_egot_status(&celebrity.awards);
    let mut lines = vec![Line::from(celebrity.name.clone()).bold(), Line::default()];

    let mut badges: Vec<Span> = AwardType::EGOT_ORDER
        .into_iter()
        .flat_map(|k| [badge(k, status.has(k)), Span::raw(" ")])
        .collect();
    badges.push(Span::raw(format!(" {}/4", status.count)));
    if status.is_egot {
        badges.push(Span::raw("  EGOT").yellow().bold());
    }
    lines.push(Line::from(badges));

    if let Some(summary) = celebrity.summary.as_deref().filter(|s| !s.is_empty()) {
        lines.push(Line::default());
        lines.push(Line::from(summary.to_string()));
    }

    let groups = group_awards_by_type(&celebrity.awards);
    if groups.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from("No awards recorded").dark_gray());
    }
    for (kind, awards) in groups.iter() {
        let wins = awards.iter().filter(|a| a.is_winner).count();
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::raw(kind.to_string()).bold().underlined(),
            Span::raw(format!("  {wins}/{} won", awards.len())).dark_gray(),
        ]));
        lines.extend(awards.iter().map(award_line));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Suggestion;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use uuid::Uuid;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn controller_with(names: &[&str]) -> SearchController {
        let mut controller = SearchController::default();
        controller.handle(SearchEvent::Input(String::from("Ri")));
        controller.handle(SearchEvent::DebounceElapsed(1));
        controller.handle(SearchEvent::SuggestionsLoaded {
            seq: 1,
            result: Ok(names
                .iter()
                .map(|n| Suggestion {
                    id: Uuid::nil(),
                    name: n.to_string(),
                    slug: String::new(),
                    photo_url: None,
                })
                .collect()),
        });
        controller
    }

    #[test]
    fn typing_emits_input() {
        let mut app = App::default();
        let controller = SearchController::default();
        assert_eq!(
            app.handle_search_key(&key(KeyCode::Char('R')), &controller),
            vec![SearchEvent::Input(String::from("R"))]
        );
        // moving the cursor does not change the query
        assert!(app.handle_search_key(&key(KeyCode::Left), &controller).is_empty());
        assert_eq!(
            app.handle_search_key(&ctrl('u'), &controller),
            vec![SearchEvent::Input(String::new())]
        );
    }

    #[test]
    fn escape_hides_panel_then_quits() {
        let mut app = App::new("Ri");
        let controller = controller_with(&["Rita Moreno"]);
        assert_eq!(
            app.handle_search_key(&key(KeyCode::Esc), &controller),
            vec![SearchEvent::Key(SearchKey::Escape)]
        );
        assert!(!app.should_quit);
        let hidden = SearchController::default();
        assert!(app.handle_search_key(&key(KeyCode::Esc), &hidden).is_empty());
        assert!(app.should_quit);
    }

    #[test]
    fn navigation_keys() {
        let mut app = App::new("Ri");
        let controller = controller_with(&["Rita Moreno"]);
        assert_eq!(
            app.handle_search_key(&key(KeyCode::Down), &controller),
            vec![SearchEvent::Key(SearchKey::Down)]
        );
        assert_eq!(
            app.handle_search_key(&ctrl('p'), &controller),
            vec![SearchEvent::Key(SearchKey::Up)]
        );
        assert_eq!(
            app.handle_search_key(&key(KeyCode::Enter), &controller),
            vec![SearchEvent::Key(SearchKey::Enter)]
        );
    }

    #[test]
    fn committed_suggestion_replaces_input() {
        let mut app = App::new("Ri");
        let mut controller = controller_with(&["Rita Moreno", "Rita Wilson"]);
        for code in [KeyCode::Down, KeyCode::Enter] {
            for event in app.handle_search_key(&key(code), &controller) {
                controller.handle(event);
            }
        }
        assert!(controller.is_submitting());
        assert_eq!(app.query(), "Ri");
        app.sync_query(&controller);
        assert_eq!(app.query(), "Rita Moreno");
        // typing resumes at the end of the committed name
        assert_eq!(
            app.handle_search_key(&key(KeyCode::Char('!')), &controller),
            vec![SearchEvent::Input(String::from("Rita Moreno!"))]
        );
    }

    #[test]
    fn detail_keys() {
        let mut app = App::default();
        app.handle_detail_key(&key(KeyCode::Char('/')));
        assert!(app.should_go_back);
        app.back_to_search();
        assert_eq!(app.screen, Screen::Search);
        app.handle_detail_key(&key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn render_suggestions() {
        let mut app = App::new("Ri");
        let controller = controller_with(&["Rita Moreno", "Rita Wilson"]);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| app.render_search(f, &controller)).unwrap();
        let buffer = terminal.backend().buffer();
        let row = |y: u16| (0..40).map(|x| buffer[(x, y)].symbol().to_string()).collect::<String>();
        assert!(row(2).contains("Ri"));
        assert!(row(5).contains("Rita Moreno"));
        assert!(row(6).contains("Rita Wilson"));
        assert_eq!(app.suggestions_area, Rect::new(0, 4, 40, 4));
    }

    #[test]
    fn click_maps_to_row() {
        let mut app = App::new("Ri");
        let controller = controller_with(&["Rita Moreno", "Rita Wilson"]);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| app.render_search(f, &controller)).unwrap();
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        };
        assert_eq!(
            app.handle_search_mouse(&click(3, 6), &controller),
            vec![SearchEvent::Click(1)]
        );
        assert_eq!(app.handle_search_mouse(&click(3, 2), &controller), vec![SearchEvent::Focus]);
        assert_eq!(app.handle_search_mouse(&click(3, 9), &controller), vec![SearchEvent::Dismiss]);
    }
}
