use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    Component, PageSizeInput, PageSizeInputProps, Pagination, PaginationProps, ResultsTable,
    ResultsTableProps, SearchBox, SearchBoxProps,
};
use crate::action::Action;
use crate::shortcut::{self, FOCUS_SEARCH_HINT};
use crate::state::{AppState, Focus};

/// Props for PlacesView - read-only view of state
pub struct PlacesViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Screen regions, shared with the event router for hit areas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacesLayout {
    pub search: Rect,
    pub loading: Rect,
    pub results: Rect,
    pub pagination: Rect,
    pub page_size: Rect,
    pub help: Rect,
}

impl PlacesLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Search box
            Constraint::Length(1), // Loading indicator
            Constraint::Min(5),    // Results table
            Constraint::Length(1), // Pagination
            Constraint::Length(2), // Page size + warning
            Constraint::Length(1), // Help bar
        ])
        .split(area);
        Self {
            search: chunks[0],
            loading: chunks[1],
            results: chunks[2],
            pagination: chunks[3],
            page_size: chunks[4],
            help: chunks[5],
        }
    }
}

/// The whole search screen
pub struct PlacesView {
    search: SearchBox,
    table: ResultsTable,
    pagination: Pagination,
    page_size: PageSizeInput,
}

impl Default for PlacesView {
    fn default() -> Self {
        Self {
            search: SearchBox::new(),
            table: ResultsTable,
            pagination: Pagination,
            page_size: PageSizeInput::new(),
        }
    }
}

fn search_props(state: &AppState, is_focused: bool) -> SearchBoxProps<'_> {
    SearchBoxProps {
        value: &state.search_input,
        is_focused,
        is_loading: state.is_loading(),
        on_change: Action::SearchInputChange,
        on_submit: Action::SearchSubmit,
    }
}

fn pagination_props(state: &AppState, is_focused: bool) -> PaginationProps {
    PaginationProps {
        page: state.page,
        total_pages: state.total_pages,
        visible: !state.results().is_empty(),
        is_focused,
        on_page: Action::PageSet,
    }
}

fn page_size_props(state: &AppState, is_focused: bool) -> PageSizeInputProps<'_> {
    PageSizeInputProps {
        value: &state.page_size_input,
        warning: state.warning.as_deref(),
        is_focused,
        on_change: Action::PageSizeInputChange,
        on_submit: Action::PageSizeSubmit,
        on_step: Action::PageSizeStep,
    }
}

fn spinner_frame(frame: u8) -> char {
    match frame % 4 {
        0 => '|',
        1 => '/',
        2 => '-',
        _ => '\\',
    }
}

impl PlacesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_search_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        self.search
            .handle_event(event, search_props(state, true))
            .into_iter()
            .collect()
    }

    pub fn handle_results_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        if let Some(action) = shortcut::global_action(event) {
            return vec![action];
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if let Some(action) = shortcut::focus_cycle(key) {
            return vec![action];
        }
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return vec![Action::Quit];
        }

        let table_props = ResultsTableProps {
            state,
            is_focused: true,
        };
        let mut actions: Vec<_> = self
            .table
            .handle_event(event, table_props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            actions.extend(
                self.pagination
                    .handle_event(event, pagination_props(state, true)),
            );
        }
        actions
    }

    pub fn handle_page_size_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        self.page_size
            .handle_event(event, page_size_props(state, true))
            .into_iter()
            .collect()
    }
}

impl Component<Action> for PlacesView {
    type Props<'a> = PlacesViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        match props.state.focus {
            Focus::Search => self.handle_search_event(event, props.state),
            Focus::Results => self.handle_results_event(event, props.state),
            Focus::PageSize => self.handle_page_size_event(event, props.state),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: PlacesViewProps<'_>) {
        let state = props.state;
        let layout = PlacesLayout::new(area);
        let focus = props.is_focused.then_some(state.focus);

        self.search.render(
            frame,
            layout.search,
            search_props(state, focus == Some(Focus::Search)),
        );

        if state.is_loading() {
            let line = Line::from(Span::styled(
                format!(" {} Loading...", spinner_frame(state.spinner_frame)),
                Style::default().fg(Color::Yellow),
            ));
            frame.render_widget(Paragraph::new(line), layout.loading);
        }

        self.table.render(
            frame,
            layout.results,
            ResultsTableProps {
                state,
                is_focused: focus == Some(Focus::Results),
            },
        );
        self.pagination.render(
            frame,
            layout.pagination,
            pagination_props(state, focus == Some(Focus::Results)),
        );
        self.page_size.render(
            frame,
            layout.page_size,
            page_size_props(state, focus == Some(Focus::PageSize)),
        );

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            layout.help,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new(FOCUS_SEARCH_HINT, "search"),
                    StatusBarHint::new("Tab", "focus"),
                    StatusBarHint::new("←/→", "page"),
                    StatusBarHint::new("+/-", "size"),
                    StatusBarHint::new("Ctrl+C", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
