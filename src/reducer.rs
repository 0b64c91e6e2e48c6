//! Reducer - pure function: (state, action) -> DispatchResult

use tracing::debug;
use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{
    total_pages, AppState, Focus, PlaceQuery, MAX_PAGE_SIZE, WARN_PAGE_SIZE_NOT_A_NUMBER,
    WARN_PAGE_SIZE_TOO_LARGE, WARN_PAGE_SIZE_TOO_SMALL,
};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            if state.query.is_empty() {
                DispatchResult::unchanged()
            } else {
                reload(state)
            }
        }

        // ===== Search actions =====
        Action::SearchInputChange(text) => {
            if text == state.search_input {
                return DispatchResult::unchanged();
            }
            state.search_input = text;
            DispatchResult::changed()
        }

        Action::SearchSubmit(text) => {
            let query = text.trim().to_string();
            state.search_input = query.clone();
            state.query = query;
            state.page = 1;
            state.selected = 0;
            reload(state)
        }

        Action::SearchFocus => {
            if state.focus == Focus::Search {
                return DispatchResult::unchanged();
            }
            state.focus = Focus::Search;
            DispatchResult::changed()
        }

        // ===== Page actions =====
        Action::PageSet(page) => {
            if page < 1 || page > state.total_pages || page == state.page {
                return DispatchResult::unchanged();
            }
            state.page = page;
            state.selected = 0;
            reload(state)
        }

        Action::PageSizeInputChange(text) => {
            state.page_size_input = text;
            DispatchResult::changed()
        }

        Action::PageSizeSubmit(text) => {
            let text = text.trim();
            match text.parse::<u32>() {
                Ok(size) => set_page_size(state, size),
                // Too many digits for u32 is still a number above the limit
                Err(_) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
                    reject_page_size(state, WARN_PAGE_SIZE_TOO_LARGE)
                }
                Err(_) => reject_page_size(state, WARN_PAGE_SIZE_NOT_A_NUMBER),
            }
        }

        Action::PageSizeSet(size) => set_page_size(state, size),

        Action::PageSizeStep(delta) => {
            let next = (i64::from(state.page_size) + i64::from(delta))
                .clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;
            set_page_size(state, next)
        }

        // ===== Places actions =====
        Action::PlacesDidLoad { seq, results } => {
            if seq != state.request_seq {
                debug!(seq, current = state.request_seq, "dropping stale places response");
                return DispatchResult::unchanged();
            }
            state.total_count = results.total_count;
            state.total_pages = total_pages(results.total_count, state.page_size);
            state.selected = state.selected.min(results.records.len().saturating_sub(1));
            state.places = DataResource::Loaded(results.records);
            DispatchResult::changed()
        }

        Action::PlacesDidError { seq, error } => {
            if seq != state.request_seq {
                debug!(seq, current = state.request_seq, %error, "dropping stale places error");
                return DispatchResult::unchanged();
            }
            reset_paging(state);
            state.places = DataResource::Failed(error);
            DispatchResult::changed()
        }

        // ===== Selection / focus =====
        Action::SelectionMove(delta) => {
            let rows = state.results().len();
            if rows == 0 {
                return DispatchResult::unchanged();
            }
            let last = rows as i64 - 1;
            let next = (state.selected as i64 + i64::from(delta)).clamp(0, last) as usize;
            if next == state.selected {
                return DispatchResult::unchanged();
            }
            state.selected = next;
            DispatchResult::changed()
        }

        Action::FocusNext => {
            state.focus = state.focus.next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            state.focus = state.focus.prev();
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if state.is_loading() {
                state.spinner_frame = state.spinner_frame.wrapping_add(1);
                DispatchResult::changed()
            } else if state.spinner_frame != 0 {
                state.spinner_frame = 0;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Turn the current query, page and page size into a fetch, or reset when
/// there is nothing to search for. Every issued request gets a fresh token.
fn reload(state: &mut AppState) -> DispatchResult<Effect> {
    state.request_seq += 1;

    if state.query.is_empty() {
        reset_paging(state);
        state.places = DataResource::Empty;
        return DispatchResult::changed_with(Effect::CancelFetch);
    }

    state.places = DataResource::Loading;
    state.spinner_frame = 0;
    DispatchResult::changed_with(Effect::FetchPlaces(PlaceQuery {
        seq: state.request_seq,
        name_prefix: state.query.clone(),
        country_ids: state.country.clone(),
        offset: state.offset(),
        limit: state.page_size,
    }))
}

fn set_page_size(state: &mut AppState, size: u32) -> DispatchResult<Effect> {
    if size > MAX_PAGE_SIZE {
        return reject_page_size(state, WARN_PAGE_SIZE_TOO_LARGE);
    }
    if size == 0 {
        return reject_page_size(state, WARN_PAGE_SIZE_TOO_SMALL);
    }

    state.warning = None;
    state.page_size_input = size.to_string();
    if size == state.page_size {
        return DispatchResult::changed();
    }
    state.page_size = size;
    state.selected = 0;
    reload(state)
}

/// Keep the prior page size and show why the new one was refused
fn reject_page_size(state: &mut AppState, warning: &str) -> DispatchResult<Effect> {
    state.warning = Some(warning.to_string());
    state.page_size_input = state.page_size.to_string();
    DispatchResult::changed()
}

fn reset_paging(state: &mut AppState) {
    state.total_count = 0;
    state.total_pages = 1;
    state.selected = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PlaceRecord, ResultSet, DEFAULT_PAGE_SIZE};

    fn place(id: u64, city: &str) -> PlaceRecord {
        PlaceRecord {
            id,
            city: city.into(),
            country: "India".into(),
            country_code: "IN".into(),
        }
    }

    fn fetched(effects: &[Effect]) -> &PlaceQuery {
        match effects.first() {
            Some(Effect::FetchPlaces(query)) => query,
            other => panic!("expected FetchPlaces, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_sets_query_and_fetches_first_page() {
        let mut state = AppState {
            page: 4,
            total_pages: 5,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::SearchSubmit("  Delhi ".into()));

        assert!(result.changed);
        assert_eq!(state.query, "Delhi");
        assert_eq!(state.page, 1);
        assert!(state.is_loading());
        let query = fetched(&result.effects);
        assert_eq!(query.name_prefix, "Delhi");
        assert_eq!(query.country_ids, "IN");
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(query.seq, state.request_seq);
    }

    #[test]
    fn test_empty_submit_resets_without_fetching() {
        let mut state = AppState::default().with_query("Delhi");
        state.places = DataResource::Loaded(vec![place(1, "Delhi")]);
        state.total_pages = 4;

        let result = reducer(&mut state, Action::SearchSubmit("   ".into()));

        assert!(result.changed);
        assert!(state.places.is_empty());
        assert!(state.results().is_empty());
        assert_eq!(state.total_pages, 1);
        assert_eq!(result.effects, vec![Effect::CancelFetch]);
    }

    #[test]
    fn test_page_offset_follows_page_and_size() {
        let mut state = AppState::default().with_query("Delhi");
        state.total_pages = 3;

        let result = reducer(&mut state, Action::PageSet(3));

        let query = fetched(&result.effects);
        assert_eq!(query.offset, 6);
        assert_eq!(query.limit, 3);
    }

    #[test]
    fn test_page_out_of_range_is_noop() {
        let mut state = AppState::default().with_query("Delhi");
        state.total_pages = 3;

        for page in [0, 1, 4] {
            let result = reducer(&mut state, Action::PageSet(page));
            assert!(!result.changed, "page {page} should be rejected");
            assert!(result.effects.is_empty());
        }
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_page_size_above_limit_is_rejected() {
        let mut state = AppState::default().with_query("Delhi");

        let result = reducer(&mut state, Action::PageSizeSubmit("15".into()));

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.page_size, 3);
        assert_eq!(state.page_size_input, "3");
        assert_eq!(state.warning.as_deref(), Some(WARN_PAGE_SIZE_TOO_LARGE));
    }

    #[test]
    fn test_valid_page_size_clears_warning_and_keeps_page() {
        let mut state = AppState::default().with_query("Delhi");
        state.page = 2;
        state.total_pages = 3;
        state.warning = Some(WARN_PAGE_SIZE_TOO_LARGE.into());

        let result = reducer(&mut state, Action::PageSizeSet(5));

        assert_eq!(state.page_size, 5);
        assert_eq!(state.page, 2);
        assert_eq!(state.warning, None);
        let query = fetched(&result.effects);
        assert_eq!(query.offset, 5);
        assert_eq!(query.limit, 5);
    }

    #[test]
    fn test_page_size_zero_and_garbage_are_rejected() {
        let mut state = AppState::default();

        reducer(&mut state, Action::PageSizeSet(0));
        assert_eq!(state.warning.as_deref(), Some(WARN_PAGE_SIZE_TOO_SMALL));

        reducer(&mut state, Action::PageSizeSubmit("ten".into()));
        assert_eq!(state.warning.as_deref(), Some(WARN_PAGE_SIZE_NOT_A_NUMBER));
        assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_size_too_long_for_u32_is_too_large() {
        let mut state = AppState::default().with_query("Delhi");

        for text in ["99999999999", "4294967296", "100000000000000000000000"] {
            let result = reducer(&mut state, Action::PageSizeSubmit(text.into()));

            assert!(result.effects.is_empty());
            assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
            assert_eq!(state.page_size_input, "3");
            assert_eq!(state.warning.as_deref(), Some(WARN_PAGE_SIZE_TOO_LARGE), "{text}");
        }

        reducer(&mut state, Action::PageSizeSubmit("-99999999999".into()));
        assert_eq!(state.warning.as_deref(), Some(WARN_PAGE_SIZE_NOT_A_NUMBER));
    }

    #[test]
    fn test_page_size_step_stays_in_bounds() {
        let mut state = AppState::new("IN", MAX_PAGE_SIZE);

        reducer(&mut state, Action::PageSizeStep(1));
        assert_eq!(state.page_size, MAX_PAGE_SIZE);
        assert_eq!(state.warning, None);

        let mut state = AppState::new("IN", 1);
        reducer(&mut state, Action::PageSizeStep(-1));
        assert_eq!(state.page_size, 1);
    }

    #[test]
    fn test_did_load_computes_total_pages() {
        let mut state = AppState::default().with_query("Delhi");
        let result = reducer(&mut state, Action::Init);
        let seq = fetched(&result.effects).seq;

        reducer(
            &mut state,
            Action::PlacesDidLoad {
                seq,
                results: ResultSet {
                    records: vec![
                        place(1, "Delhi"),
                        place(2, "New Delhi"),
                        place(3, "Delhi Cantonment"),
                    ],
                    total_count: 7,
                },
            },
        );

        assert!(state.places.is_loaded());
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.results().len(), 3);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut state = AppState::default().with_query("Delhi");
        state.total_pages = 3;
        let first = fetched(&reducer(&mut state, Action::PageSet(2)).effects).seq;
        let second = fetched(&reducer(&mut state, Action::PageSet(3)).effects).seq;
        assert!(second > first);

        let result = reducer(
            &mut state,
            Action::PlacesDidLoad {
                seq: first,
                results: ResultSet {
                    records: vec![place(9, "Stale")],
                    total_count: 7,
                },
            },
        );

        assert!(!result.changed);
        assert!(state.is_loading());
        assert!(state.results().is_empty());
    }

    #[test]
    fn test_error_clears_results() {
        let mut state = AppState::default().with_query("Delhi");
        let seq = fetched(&reducer(&mut state, Action::Init).effects).seq;
        state.total_pages = 2;

        reducer(
            &mut state,
            Action::PlacesDidError {
                seq,
                error: "connection refused".into(),
            },
        );

        assert!(state.results().is_empty());
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.places.error(), Some("connection refused"));
    }

    #[test]
    fn test_total_pages_formula() {
        assert_eq!(total_pages(0, 3), 1);
        assert_eq!(total_pages(3, 3), 1);
        assert_eq!(total_pages(7, 3), 3);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn test_focus_cycles() {
        let mut state = AppState::default();
        reducer(&mut state, Action::FocusNext);
        assert_eq!(state.focus, Focus::Results);
        reducer(&mut state, Action::FocusPrev);
        reducer(&mut state, Action::FocusPrev);
        assert_eq!(state.focus, Focus::PageSize);

        let result = reducer(&mut state, Action::SearchFocus);
        assert!(result.changed);
        assert_eq!(state.focus, Focus::Search);
    }

    #[test]
    fn test_tick_only_animates_while_loading() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        state.places = DataResource::Loading;
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.spinner_frame, 1);

        state.places = DataResource::Loaded(Vec::new());
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.spinner_frame, 0);
    }
}
