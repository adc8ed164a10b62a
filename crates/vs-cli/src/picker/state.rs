//! Picker state machine
//!
//! All input goes through [`Picker::handle_key`], which updates the state
//! and hands back at most one [`Effect`] for the event loop to carry out.
//! Nothing here touches the terminal or the filesystem.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vs_core::types::{sort_nodes, sorted_position};
use vs_core::Node;

use super::form::{Form, FormOutcome};

/// Which screen is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Browsing and filtering nodes
    List,
    /// Entering a new node
    Form(Form),
}

/// Progress of the incremental filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// No filter
    Unfiltered,
    /// Keys go to the filter text
    Filtering,
    /// Filter text is fixed, keys navigate the narrowed list
    Applied,
}

/// Work the event loop must do after a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Connect to this node and end the picker
    Select(Node),
    /// End the picker without connecting
    Cancel,
    /// A node was added to the list; store it if possible
    Persist(Node),
}

/// Everything the picker shows and edits
///
/// Nodes are kept sorted by name. `selected` always indexes the filtered
/// view, never the full list.
#[derive(Debug, Clone)]
pub struct Picker {
    nodes: Vec<Node>,
    mode: Mode,
    filter: String,
    filter_state: FilterState,
    /// Index into [`Picker::visible`]
    selected: usize,
    status: Option<String>,
}

impl Picker {
    /// Start in list mode with no filter and the first node highlighted
    ///
    /// # Arguments
    /// * `nodes` - Initial node set, sorted here if the source did not
    pub fn new(mut nodes: Vec<Node>) -> Self {
        sort_nodes(&mut nodes);
        Self {
            nodes,
            mode: Mode::List,
            filter: String::new(),
            filter_state: FilterState::Unfiltered,
            selected: 0,
            status: None,
        }
    }

    /// All nodes, including any added during this run
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The active screen
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Current filter text, empty when unfiltered
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Whether the filter is off, being typed or applied
    pub fn filter_state(&self) -> FilterState {
        self.filter_state
    }

    /// One-line notice shown under the list, such as a save result
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Replace the status notice
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Position of the highlight within [`Picker::visible`]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Nodes passing the current filter, in list order
    pub fn visible(&self) -> Vec<&Node> {
        if self.filter.is_empty() {
            return self.nodes.iter().collect();
        }
        let needle = self.filter.to_lowercase();
        self.nodes
            .iter()
            .filter(|n| n.filter_key().contains(&needle))
            .collect()
    }

    /// Node under the highlight, if any are visible
    pub fn selected_node(&self) -> Option<&Node> {
        self.visible().get(self.selected).copied()
    }

    /// Feed one key press
    ///
    /// # Arguments
    /// * `key` - A key press from the terminal
    ///
    /// # Returns
    /// The effect the event loop must carry out, or `None` when the key only
    /// changed state.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Effect::Cancel);
        }

        if let Mode::Form(form) = &mut self.mode {
            return match form.handle_key(key) {
                FormOutcome::Editing => None,
                FormOutcome::Cancelled => {
                    self.mode = Mode::List;
                    None
                }
                FormOutcome::Submitted(node) => {
                    self.mode = Mode::List;
                    self.insert_node(node.clone());
                    Some(Effect::Persist(node))
                }
            };
        }

        match self.filter_state {
            FilterState::Filtering => {
                self.handle_filter_key(key);
                None
            }
            FilterState::Unfiltered | FilterState::Applied => self.handle_list_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match key.code {
            KeyCode::Esc if self.filter_state == FilterState::Applied => self.clear_filter(),
            KeyCode::Esc | KeyCode::Char('q') => return Some(Effect::Cancel),
            KeyCode::Enter => return self.selected_node().cloned().map(Effect::Select),
            KeyCode::Char('/') => {
                self.filter.clear();
                self.filter_state = FilterState::Filtering;
                self.selected = 0;
            }
            KeyCode::Char('a') => {
                self.status = None;
                self.mode = Mode::Form(Form::new());
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.visible().len().saturating_sub(1);
            }
            _ => {}
        }
        None
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.clear_filter(),
            KeyCode::Enter => {
                self.filter_state = if self.filter.is_empty() {
                    FilterState::Unfiltered
                } else {
                    FilterState::Applied
                };
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.clamp_selection();
            }
            KeyCode::Down => self.move_selection(1),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.filter.push(c);
                self.selected = 0;
            }
            _ => {}
        }
    }

    fn clear_filter(&mut self) {
        self.filter.clear();
        self.filter_state = FilterState::Unfiltered;
        self.clamp_selection();
    }

    /// Move the highlight, wrapping at both ends
    fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected as isize + delta).rem_euclid(len as isize) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Add `node` at its sorted position and highlight it
    ///
    /// Any filter is dropped so the new node is on screen.
    pub fn insert_node(&mut self, node: Node) {
        let at = sorted_position(&self.nodes, &node);
        self.nodes.insert(at, node);
        self.filter.clear();
        self.filter_state = FilterState::Unfiltered;
        self.selected = at;
    }
}
