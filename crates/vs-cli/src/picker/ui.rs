//! Picker rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::form::{Form, FIELD_LABELS, PLACEHOLDERS};
use super::state::{FilterState, Mode, Picker};

const TITLE: &str = "vibessh - select a node";
const LABEL_WIDTH: usize = 10;

fn accent() -> Style {
    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Render the active screen of `picker` into `frame`
pub fn draw(frame: &mut Frame, picker: &Picker) {
    match picker.mode() {
        Mode::List => draw_list(frame, picker),
        Mode::Form(form) => draw_form(frame, form),
    }
}

fn draw_list(frame: &mut Frame, picker: &Picker) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    frame.render_widget(Paragraph::new(Span::styled(TITLE, accent())), chunks[0]);
    draw_filter_line(frame, chunks[1], picker);

    let visible = picker.visible();
    if visible.is_empty() {
        let hint = if picker.nodes().is_empty() {
            "No hosts yet. Press a to add one."
        } else {
            "No hosts match the filter."
        };
        frame.render_widget(Paragraph::new(Span::styled(hint, dim())), chunks[2]);
    } else {
        let items: Vec<ListItem> = visible
            .iter()
            .map(|node| {
                ListItem::new(vec![
                    Line::from(Span::raw(node.name.clone())),
                    Line::from(Span::styled(format!("  {}", node.description()), dim())),
                ])
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Magenta))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(picker.selected()));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let mut footer = vec![Line::from(Span::styled(list_help(picker.filter_state()), dim()))];
    if let Some(status) = picker.status() {
        footer.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }
    frame.render_widget(Paragraph::new(footer), chunks[3]);
}

fn draw_filter_line(frame: &mut Frame, area: Rect, picker: &Picker) {
    let line = match picker.filter_state() {
        FilterState::Filtering => {
            let text = format!("Filter: {}", picker.filter());
            // Cursor sits after the typed text, unless that is off screen
            let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
            let col = area.x.saturating_add(width);
            if col < area.right() && area.height > 0 {
                frame.set_cursor(col, area.y);
            }
            Line::from(vec![Span::styled(text, Style::default().fg(Color::Cyan))])
        }
        FilterState::Applied => Line::from(vec![
            Span::styled(
                format!("Filter: {}", picker.filter()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("  ({} of {})", picker.visible().len(), picker.nodes().len()),
                dim(),
            ),
        ]),
        FilterState::Unfiltered => {
            Line::from(Span::styled(format!("{} hosts", picker.nodes().len()), dim()))
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn list_help(filter_state: FilterState) -> &'static str {
    match filter_state {
        FilterState::Filtering => "enter apply filter • esc clear filter",
        FilterState::Applied => "↑/↓ move • enter connect • / filter • a add host • esc clear filter",
        FilterState::Unfiltered => "↑/↓ move • enter connect • / filter • a add host • q quit",
    }
}

fn draw_form(frame: &mut Frame, form: &Form) {
    let area = frame.size();
    let mut lines = vec![Line::from(Span::styled("Add Host", accent())), Line::from("")];

    for (i, value) in form.values().iter().enumerate() {
        let focused = i == form.focused();
        let label_style = if focused {
            Style::default().fg(Color::Magenta)
        } else {
            dim()
        };
        let label = Span::styled(
            format!("{:>width$}  ", FIELD_LABELS[i], width = LABEL_WIDTH),
            label_style,
        );
        let value = if value.is_empty() {
            Span::styled(PLACEHOLDERS[i], dim())
        } else {
            Span::raw(value.clone())
        };
        lines.push(Line::from(vec![label, value]));
    }

    if let Some(err) = form.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "tab/shift+tab navigate • enter submit • esc cancel",
        dim(),
    )));

    frame.render_widget(Paragraph::new(lines), area);

    // Title and blank line come first, then one row per field
    let row = area.y + 2 + form.focused() as u16;
    let col = area.x
        + (LABEL_WIDTH + 2) as u16
        + form.values()[form.focused()].chars().count() as u16;
    if row < area.bottom() && col < area.right() {
        frame.set_cursor(col, row);
    }
}
