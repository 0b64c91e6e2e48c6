use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;

/// Previous / Next controls with a "Page X of Y" label
pub struct Pagination;

pub struct PaginationProps {
    pub page: u32,
    pub total_pages: u32,
    /// Controls exist only while there are results to page through
    pub visible: bool,
    pub is_focused: bool,
    pub on_page: fn(u32) -> Action,
}

impl PaginationProps {
    fn prev_enabled(&self) -> bool {
        self.page > 1
    }

    fn next_enabled(&self) -> bool {
        self.page < self.total_pages
    }
}

fn button(label: &'static str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    };
    Span::styled(label, style)
}

impl Component<Action> for Pagination {
    type Props<'a> = PaginationProps;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.visible || !props.is_focused {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Left | KeyCode::Char('p') if props.prev_enabled() => {
                Some((props.on_page)(props.page - 1))
            }
            KeyCode::Right | KeyCode::Char('n') if props.next_enabled() => {
                Some((props.on_page)(props.page + 1))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if !props.visible {
            return;
        }

        let line = Line::from(vec![
            button("◀ Previous", props.prev_enabled()),
            Span::raw(format!("   Page {} of {}   ", props.page, props.total_pages)),
            button("Next ▶", props.next_enabled()),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn props(page: u32, total_pages: u32) -> PaginationProps {
        PaginationProps {
            page,
            total_pages,
            visible: true,
            is_focused: true,
            on_page: Action::PageSet,
        }
    }

    fn press(component: &mut Pagination, code: KeyCode, props: PaginationProps) -> Vec<Action> {
        component
            .handle_event(&EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE)), props)
            .into_iter()
            .collect()
    }

    #[test]
    fn next_and_previous_emit_neighbouring_pages() {
        let mut component = Pagination;

        press(&mut component, KeyCode::Right, props(2, 3)).assert_first(Action::PageSet(3));
        press(&mut component, KeyCode::Left, props(2, 3)).assert_first(Action::PageSet(1));
    }

    #[test]
    fn disabled_buttons_emit_nothing() {
        let mut component = Pagination;

        press(&mut component, KeyCode::Right, props(3, 3)).assert_empty();
        press(&mut component, KeyCode::Left, props(1, 3)).assert_empty();
    }

    #[test]
    fn hidden_controls_render_nothing() {
        let mut render = RenderHarness::new(40, 1);
        let mut component = Pagination;

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                PaginationProps {
                    visible: false,
                    ..props(1, 1)
                },
            );
        });

        assert!(!output.contains("Page"));
    }

    #[test]
    fn renders_page_label() {
        let mut render = RenderHarness::new(50, 1);
        let mut component = Pagination;

        let output = render.render_to_string_plain(|frame| {
            component.render(frame, frame.area(), props(2, 3));
        });

        assert!(output.contains("Previous"));
        assert!(output.contains("Page 2 of 3"));
        assert!(output.contains("Next"));
    }
}
