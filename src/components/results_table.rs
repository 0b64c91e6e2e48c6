use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::api;
use crate::state::AppState;

pub const MSG_LOADING: &str = "Loading...";
pub const MSG_START: &str = "Start searching";
pub const MSG_NO_RESULTS: &str = "No result found";

/// Table of the current page of places
pub struct ResultsTable;

pub struct ResultsTableProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// What the table body shows, in priority order
enum TableBody<'a> {
    Message(&'static str),
    Rows(&'a AppState),
}

impl<'a> TableBody<'a> {
    fn from_state(state: &'a AppState) -> Self {
        if state.is_loading() {
            TableBody::Message(MSG_LOADING)
        } else if state.query.is_empty() {
            TableBody::Message(MSG_START)
        } else if state.results().is_empty() {
            TableBody::Message(MSG_NO_RESULTS)
        } else {
            TableBody::Rows(state)
        }
    }
}

fn record_rows(state: &AppState) -> Vec<Row<'static>> {
    state
        .results()
        .iter()
        .enumerate()
        .map(|(i, place)| {
            let country = match api::flag_emoji(&place.country_code) {
                Some(flag) => format!("{flag} {}", place.country),
                None => place.country.clone(),
            };
            Row::new(vec![
                Cell::from(state.global_index(i).to_string()),
                Cell::from(place.city.clone()),
                Cell::from(country),
            ])
        })
        .collect()
}

impl Component<Action> for ResultsTable {
    type Props<'a> = ResultsTableProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.state.results().is_empty() {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionMove(-1)),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered().border_style(border).title(" Results ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Table
            Constraint::Length(1), // Flag of selected row
        ])
        .split(inner);

        let header = Row::new(vec!["#", "Place Name", "Country"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(50),
            Constraint::Fill(1),
        ];

        match TableBody::from_state(props.state) {
            TableBody::Message(message) => {
                let row = Row::new(vec![
                    Cell::from(""),
                    Cell::from(message).style(Style::default().fg(Color::Gray)),
                    Cell::from(""),
                ]);
                let table = Table::new(vec![row], widths).header(header);
                frame.render_widget(table, chunks[0]);
            }
            TableBody::Rows(state) => {
                let table = Table::new(record_rows(state), widths)
                    .header(header)
                    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
                let mut table_state =
                    TableState::default().with_selected(props.is_focused.then_some(state.selected));
                frame.render_stateful_widget(table, chunks[0], &mut table_state);

                if let Some(place) = state.selected_record() {
                    let line = Line::from(vec![
                        Span::styled("Flag: ", Style::default().fg(Color::DarkGray)),
                        Span::raw(api::flag_url(&place.country_code)),
                    ]);
                    frame.render_widget(Paragraph::new(line), chunks[1]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlaceRecord;
    use tui_dispatch::testing::*;
    use tui_dispatch::DataResource;

    fn render(state: &AppState) -> String {
        let mut render = RenderHarness::new(70, 12);
        let mut component = ResultsTable;
        render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                ResultsTableProps {
                    state,
                    is_focused: true,
                },
            );
        })
    }

    #[test]
    fn empty_query_prompts_to_search() {
        let output = render(&AppState::default());

        assert!(output.contains("Place Name"));
        assert!(output.contains(MSG_START));
    }

    #[test]
    fn loading_wins_over_other_messages() {
        let state = AppState {
            places: DataResource::Loading,
            ..AppState::default().with_query("Delhi")
        };

        let output = render(&state);
        assert!(output.contains(MSG_LOADING));
        assert!(!output.contains(MSG_NO_RESULTS));
    }

    #[test]
    fn failure_reads_as_no_results() {
        let state = AppState {
            places: DataResource::Failed("request failed: 503".into()),
            ..AppState::default().with_query("Delhi")
        };

        let output = render(&state);
        assert!(output.contains(MSG_NO_RESULTS));
        assert!(!output.contains("503"));
    }

    #[test]
    fn rows_use_global_index() {
        let mut state = AppState::default().with_query("Delhi");
        state.page = 3;
        state.total_pages = 3;
        state.places = DataResource::Loaded(vec![PlaceRecord {
            id: 42,
            city: "Delhi Cantonment".into(),
            country: "India".into(),
            country_code: "IN".into(),
        }]);

        let output = render(&state);
        let row = output
            .lines()
            .find(|line| line.contains("Delhi Cantonment"))
            .expect("record row rendered");

        assert!(row.trim_start_matches('│').trim_start().starts_with('7'));
        assert!(output.contains("India"));
        assert!(output.contains("flagsapi.com/IN"));
    }

    #[test]
    fn arrows_move_selection_only_with_results() {
        let mut component = ResultsTable;
        let state = AppState::default();

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("j")),
                ResultsTableProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }
}
