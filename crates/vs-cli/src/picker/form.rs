//! "Add host" form

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;
use vs_core::Node;

/// Index of each field in [`Form::values`]
pub const NAME: usize = 0;
pub const ADDRESS: usize = 1;
pub const PORT: usize = 2;
pub const USER: usize = 3;
pub const OS: usize = 4;

/// Number of fields on the form
pub const FIELD_COUNT: usize = 5;

/// Labels in field order
pub const FIELD_LABELS: [&str; FIELD_COUNT] = ["Name", "Address", "Port", "User", "OS"];

/// Hints shown in empty fields
pub const PLACEHOLDERS: [&str; FIELD_COUNT] = ["my-server", "192.168.1.1", "22", "root", "linux"];

/// Longest value a field accepts
const CHAR_LIMIT: usize = 128;

/// Why a submission was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("name is required")]
    NameRequired,
    #[error("address is required")]
    AddressRequired,
    #[error("port must be a number between 1 and 65535")]
    InvalidPort,
}

/// Result of feeding one key to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Still editing
    Editing,
    /// Discard everything
    Cancelled,
    /// Input validated into a node
    Submitted(Node),
}

/// Five text fields with one of them focused
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    values: [String; FIELD_COUNT],
    focused: usize,
    error: Option<FormError>,
}

impl Form {
    /// Empty form with the name field focused
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw field text in field order, untrimmed
    pub fn values(&self) -> &[String; FIELD_COUNT] {
        &self.values
    }

    /// Index of the field receiving keys
    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Error from the last refused submission
    pub fn error(&self) -> Option<FormError> {
        self.error
    }

    /// Move focus down, wrapping to the first field
    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % FIELD_COUNT;
    }

    /// Move focus up, wrapping to the last field
    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// Apply one key press
    ///
    /// A refused submit stores the error and keeps editing.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => match self.validate() {
                Ok(node) => return FormOutcome::Submitted(node),
                Err(e) => self.error = Some(e),
            },
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Backspace => {
                self.values[self.focused].pop();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let value = &mut self.values[self.focused];
                if value.chars().count() < CHAR_LIMIT {
                    value.push(c);
                }
            }
            _ => {}
        }
        FormOutcome::Editing
    }

    /// Check the fields and build the node they describe
    pub fn validate(&self) -> Result<Node, FormError> {
        let field = |i: usize| self.values[i].trim();

        if field(NAME).is_empty() {
            return Err(FormError::NameRequired);
        }
        if field(ADDRESS).is_empty() {
            return Err(FormError::AddressRequired);
        }
        let port = match field(PORT) {
            "" => None,
            raw => Some(
                raw.parse::<u16>()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or(FormError::InvalidPort)?,
            ),
        };
        let optional = |i: usize| Some(field(i).to_string()).filter(|v| !v.is_empty());

        Ok(Node {
            name: field(NAME).to_string(),
            address: field(ADDRESS).to_string(),
            port,
            user: optional(USER),
            os: optional(OS),
            dns_name: None,
        })
    }
}
