//! Actions - every way the search state can change

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::ResultSet;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Startup: reload if a query was supplied on the command line
    Init,

    // ===== Search category =====
    /// Search box text changed (not yet submitted)
    SearchInputChange(String),

    /// Submit the search box text as the new query
    SearchSubmit(String),

    /// Move keyboard focus to the search box
    SearchFocus,

    // ===== Page category =====
    /// Go to the given 1-based page
    PageSet(u32),

    /// Page-size box text changed (not yet submitted)
    PageSizeInputChange(String),

    /// Submit the page-size box text
    PageSizeSubmit(String),

    /// Request a new page size
    PageSizeSet(u32),

    /// Nudge the page size up or down by one
    PageSizeStep(i8),

    // ===== Places category =====
    /// Result: a page of places arrived for request `seq`
    PlacesDidLoad { seq: u64, results: ResultSet },

    /// Result: request `seq` failed
    PlacesDidError { seq: u64, error: String },

    // ===== Selection / focus =====
    /// Move the highlighted row by a delta
    SelectionMove(i16),

    FocusNext,

    FocusPrev,

    // ===== Uncategorized (global) =====
    /// Force a re-render (for cursor movement, etc.)
    Render,

    /// Periodic tick for the loading spinner
    Tick,

    /// Exit the application
    Quit,
}
