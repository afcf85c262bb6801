use std::io::Stderr;
use std::ops::{Deref, DerefMut};
use std::sync::Once;

use color_eyre::eyre::Result;
use crossterm::cursor;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, KeyEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use futures::{FutureExt as _, StreamExt as _};
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::Event;

const FRAME_RATE: f64 = 10.;
static PANIC_HOOK_SET: Once = Once::new();

/// Fullscreen terminal, drawing on stderr so that stdout stays free for results
pub struct Tui {
    /// The ratatui terminal instance
    pub terminal: ratatui::Terminal<CrosstermBackend<Stderr>>,
    /// Background task handle for event polling
    pub task: Option<JoinHandle<()>>,
    /// Receiver for TUI events
    pub event_rx: UnboundedReceiver<Event>,
    /// Sender for TUI events
    pub event_tx: UnboundedSender<Event>,
    /// Frame rate for rendering (frames per second)
    pub frame_rate: f64,
    /// Token for cancelling background tasks
    pub cancellation_token: CancellationToken,
    /// Whether mouse events are captured
    pub mouse: bool,
}

impl Tui {
    /// Creates a new fullscreen TUI
    pub fn new(mouse: bool) -> Result<Self> {
        let (event_tx, event_rx) = unbounded_channel();
        set_panic_hook();
        Ok(Self {
            terminal: ratatui::Terminal::new(CrosstermBackend::new(std::io::stderr()))?,
            task: None,
            event_rx,
            event_tx,
            frame_rate: FRAME_RATE,
            cancellation_token: CancellationToken::default(),
            mouse,
        })
    }

    /// Enters the TUI by enabling raw mode and starting event handling
    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnterAlternateScreen, EnableBracketedPaste)?;
        if self.mouse {
            crossterm::execute!(std::io::stderr(), EnableMouseCapture)?;
        }
        self.terminal.clear()?;
        self.start();
        Ok(())
    }

    /// Exits the TUI by stopping event handling and disabling raw mode
    pub fn exit(&mut self) -> Result<()> {
        self.stop();
        if crossterm::terminal::is_raw_mode_enabled()? {
            crossterm::execute!(
                std::io::stderr(),
                DisableMouseCapture,
                DisableBracketedPaste,
                LeaveAlternateScreen,
                cursor::Show
            )?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    /// Stops the TUI event loop
    pub fn stop(&self) {
        self.cancellation_token.cancel();
    }

    /// Starts the task turning terminal input into [`Event`]s
    pub fn start(&mut self) {
        let render_delay = std::time::Duration::from_secs_f64(1.0 / self.frame_rate);
        if let Some(task) = self.task.take() {
            self.cancellation_token.cancel();
            task.abort();
            self.cancellation_token = CancellationToken::new();
        }
        let event_tx = self.event_tx.clone();
        let cancellation_token = self.cancellation_token.clone();
        self.task = Some(tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut render_interval = tokio::time::interval(render_delay);
            loop {
                let render_delay = render_interval.tick();
                let crossterm_event = reader.next().fuse();
                tokio::select! {
                    _ = cancellation_token.cancelled() => {
                        break;
                    }
                    maybe_event = crossterm_event => {
                        match maybe_event {
                            Some(Ok(crossterm::event::Event::Key(key))) => {
                                if key.kind == KeyEventKind::Press {
                                    _ = event_tx.send(Event::Key(key));
                                }
                            }
                            Some(Ok(crossterm::event::Event::Mouse(mouse))) => {
                                _ = event_tx.send(Event::Mouse(mouse));
                            }
                            Some(Ok(crossterm::event::Event::Paste(text))) => {
                                _ = event_tx.send(Event::Paste(text));
                            }
                            Some(Ok(crossterm::event::Event::Resize(_, _))) => {
                                _ = event_tx.send(Event::Resize);
                            }
                            Some(Err(e)) => {
                                _ = event_tx.send(Event::Error(e.to_string()));
                            }
                            None => {
                                _ = event_tx.send(Event::Quit);
                                break;
                            }
                            Some(Ok(_)) => {}
                        }
                    }
                    _ = render_delay => {
                        _ = event_tx.send(Event::Render);
                    }
                }
            }
        }));
    }

    /// Gets the next event from the event queue
    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

impl Deref for Tui {
    type Target = ratatui::Terminal<CrosstermBackend<Stderr>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Some(t) = self.task.take() {
            t.abort();
        }
        let _ = self.exit();
    }
}

fn set_panic_hook() {
    PANIC_HOOK_SET.call_once(|| {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            ratatui::restore(); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    });
}
