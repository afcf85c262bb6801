use crossterm::event::{KeyEvent, MouseEvent};

/// Events produced by the terminal
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Reading the terminal failed
    Error(String),
    /// Time to redraw
    Render,
    /// A key was pressed
    Key(KeyEvent),
    /// Text was pasted (bracketed paste)
    Paste(String),
    /// A mouse event occurred
    Mouse(MouseEvent),
    /// The terminal was resized
    Resize,
    /// Leave the application
    Quit,
}
