//! Interactive node picker
//!
//! A full-screen list of nodes with incremental filtering and an "add host"
//! form. The loop blocks on the next terminal event, so every key runs to
//! completion before the next one is read.

mod form;
mod state;
mod ui;

pub use form::{Form, FormError, FormOutcome};
pub use state::{Effect, FilterState, Mode, Picker};

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use vs_core::{Node, NodeSource};

/// Raw mode plus alternate screen, undone on drop
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Show the picker and return the chosen node, or `None` on cancel
///
/// New hosts are handed to `source` for saving. The terminal is restored
/// before this returns, whatever the outcome.
pub fn run(nodes: Vec<Node>, source: &dyn NodeSource) -> Result<Option<Node>> {
    let mut guard = TerminalGuard::enter().context("set up terminal")?;
    let mut picker = Picker::new(nodes);

    loop {
        guard
            .terminal
            .draw(|frame| ui::draw(frame, &picker))
            .context("draw picker")?;

        // Resize and other events just trigger a redraw
        let key = match event::read().context("read terminal event")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        match picker.handle_key(key) {
            Some(Effect::Select(node)) => return Ok(Some(node)),
            Some(Effect::Cancel) => return Ok(None),
            Some(Effect::Persist(node)) => persist_best_effort(&mut picker, source, &node),
            None => {}
        }
    }
}

/// Save a node added in the picker without letting failure end the run
///
/// The node is already in the picker's list and stays there. A write error
/// is reported on the status line and then dropped on purpose: the host is
/// usable for this run even if it will be gone next time.
pub fn persist_best_effort(picker: &mut Picker, source: &dyn NodeSource, node: &Node) {
    match source.append(node) {
        Ok(()) => picker.set_status(format!("Saved {}", node.name)),
        Err(e) => {
            tracing::debug!("Could not save {}: {}", node.name, e);
            picker.set_status(format!("{} added for this session only ({})", node.name, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::cell::RefCell;
    use vs_core::SourceError;

    /// Records appends, optionally failing them
    struct RecordingSource {
        fail: bool,
        appended: RefCell<Vec<Node>>,
    }

    impl RecordingSource {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                appended: RefCell::new(Vec::new()),
            }
        }
    }

    impl NodeSource for RecordingSource {
        fn kind(&self) -> &'static str {
            "test"
        }

        fn load(&self) -> Result<Vec<Node>, SourceError> {
            Ok(Vec::new())
        }

        fn append(&self, node: &Node) -> Result<(), SourceError> {
            if self.fail {
                return Err(SourceError::ReadOnly("test"));
            }
            self.appended.borrow_mut().push(node.clone());
            Ok(())
        }
    }

    /// Drive a picker through the add-host form and apply its effect
    fn add_host(picker: &mut Picker, source: &dyn NodeSource, name: &str, address: &str) {
        let mut keys = vec![KeyCode::Char('a')];
        keys.extend(name.chars().map(KeyCode::Char));
        keys.push(KeyCode::Tab);
        keys.extend(address.chars().map(KeyCode::Char));
        keys.push(KeyCode::Enter);

        for code in keys {
            if let Some(Effect::Persist(node)) =
                picker.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            {
                persist_best_effort(picker, source, &node);
            }
        }
    }

    #[test]
    fn test_added_node_is_saved() {
        let source = RecordingSource::new(false);
        let mut picker = Picker::new(Vec::new());
        add_host(&mut picker, &source, "gamma", "10.0.0.3");

        assert_eq!(*source.appended.borrow(), vec![Node::new("gamma", "10.0.0.3")]);
        assert_eq!(picker.status(), Some("Saved gamma"));
    }

    #[test]
    fn test_failed_save_keeps_node_in_list() {
        let source = RecordingSource::new(true);
        let mut picker = Picker::new(vec![Node::new("alpha", "10.0.0.1")]);
        add_host(&mut picker, &source, "gamma", "10.0.0.3");

        assert!(source.appended.borrow().is_empty());
        assert_eq!(picker.mode(), &Mode::List);
        assert_eq!(picker.nodes().len(), 2);
        assert_eq!(picker.selected_node(), Some(&Node::new("gamma", "10.0.0.3")));
        assert!(picker.status().unwrap().contains("for this session only"));
    }
}
