use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::shortcut;
use crate::state::MAX_PAGE_SIZE;

/// Numeric items-per-page input with its validation message
pub struct PageSizeInput {
    input: TextInput,
}

pub struct PageSizeInputProps<'a> {
    pub value: &'a str,
    pub warning: Option<&'a str>,
    pub is_focused: bool,
    // Action constructors
    pub on_change: fn(String) -> Action,
    pub on_submit: fn(String) -> Action,
    pub on_step: fn(i8) -> Action,
}

impl Default for PageSizeInput {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl PageSizeInput {
    pub fn new() -> Self {
        Self::default()
    }
}

const LABEL_WIDTH: u16 = 24;
const INPUT_WIDTH: u16 = 6;

impl Component<Action> for PageSizeInput {
    type Props<'a> = PageSizeInputProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if let Some(action) = shortcut::global_action(event) {
            return vec![action];
        }
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if let Some(action) = shortcut::focus_cycle(key) {
            return vec![action];
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('+') => return vec![(props.on_step)(1)],
            KeyCode::Down | KeyCode::Char('-') => return vec![(props.on_step)(-1)],
            KeyCode::Enter => return vec![(props.on_submit)(props.value.to_string())],
            // Numeric input: other printable characters never reach the field
            KeyCode::Char(c) if !c.is_ascii_digit() => return Vec::new(),
            _ => {}
        }

        let input_props = TextInputProps {
            value: props.value,
            placeholder: "",
            is_focused: true,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: None,
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let rows = Layout::vertical([
            Constraint::Length(1), // Label + input
            Constraint::Length(1), // Warning
        ])
        .split(area);
        let cols = Layout::horizontal([
            Constraint::Length(LABEL_WIDTH),
            Constraint::Length(INPUT_WIDTH),
            Constraint::Min(0),
        ])
        .split(rows[0]);

        let label_style = if props.is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let label = Line::from(Span::styled(
            format!("Items per page (1-{MAX_PAGE_SIZE})"),
            label_style,
        ));
        frame.render_widget(Paragraph::new(label), cols[0]);

        let input_props = TextInputProps {
            value: props.value,
            placeholder: "",
            is_focused: props.is_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: Some(Color::Rgb(50, 50, 60)),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, cols[1], input_props);

        if let Some(warning) = props.warning {
            let line = Line::from(Span::styled(
                warning.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(Paragraph::new(line), rows[1]);
        }
    }
}
