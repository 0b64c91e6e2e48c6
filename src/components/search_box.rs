use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Block,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::shortcut::{self, FOCUS_SEARCH_HINT};

/// Search text input, disabled while a fetch is in flight
pub struct SearchBox {
    input: TextInput,
}

pub struct SearchBoxProps<'a> {
    pub value: &'a str,
    pub is_focused: bool,
    pub is_loading: bool,
    // Action constructors
    pub on_change: fn(String) -> Action,
    pub on_submit: fn(String) -> Action,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }
}

fn placeholder(is_loading: bool) -> &'static str {
    if is_loading {
        "Searching..."
    } else {
        "Type a place name and press Enter"
    }
}

impl Component<Action> for SearchBox {
    type Props<'a> = SearchBoxProps<'a>;

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
        if props.is_loading {
            return Vec::new();
        }
        if key.code == KeyCode::Enter {
            return vec![(props.on_submit)(props.value.to_string())];
        }

        let input_props = TextInputProps {
            value: props.value,
            placeholder: placeholder(props.is_loading),
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
        let border = if props.is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_style(border)
            .title(" Search places ")
            .title_top(Line::from(format!(" {FOCUS_SEARCH_HINT} ")).right_aligned());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let input_props = TextInputProps {
            value: props.value,
            placeholder: placeholder(props.is_loading),
            is_focused: props.is_focused && !props.is_loading,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: None,
                    fg: props.is_loading.then_some(Color::DarkGray),
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, inner, input_props);
    }
}
