//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

/// Largest page size the service is asked for.
pub const MAX_PAGE_SIZE: u32 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 3;
/// Country filter sent with every request unless overridden.
pub const DEFAULT_COUNTRY: &str = "IN";

/// Spinner timing for the loading indicator.
pub const SPINNER_TICK_MS: u64 = 100;

pub const WARN_PAGE_SIZE_TOO_LARGE: &str = "Items per page cannot exceed 10.";
pub const WARN_PAGE_SIZE_TOO_SMALL: &str = "Items per page must be at least 1.";
pub const WARN_PAGE_SIZE_NOT_A_NUMBER: &str =
    "Items per page must be a number between 1 and 10.";

/// A place as returned by the places service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlaceRecord {
    pub id: u64,
    pub city: String,
    pub country: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
}

/// One page of results plus the total match count across all pages
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultSet {
    pub records: Vec<PlaceRecord>,
    pub total_count: u32,
}

/// Parameters of one outbound request, tagged with the token it was issued under
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlaceQuery {
    pub seq: u64,
    pub name_prefix: String,
    pub country_ids: String,
    pub offset: u32,
    pub limit: u32,
}

/// Which widget receives keyboard input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Search,
    Results,
    PageSize,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Results,
            Focus::Results => Focus::PageSize,
            Focus::PageSize => Focus::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Search => Focus::PageSize,
            Focus::Results => Focus::Search,
            Focus::PageSize => Focus::Results,
        }
    }
}

/// `max(1, ceil(total_count / page_size))`
pub fn total_pages(total_count: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    total_count.div_ceil(page_size).max(1)
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Search ---
    /// Submitted query; empty means no search has been performed
    #[debug(section = "Search", label = "Query", debug_fmt)]
    pub query: String,

    /// Text currently typed into the search box
    #[debug(section = "Search", label = "Input", debug_fmt)]
    pub search_input: String,

    /// Fixed country filter
    #[debug(section = "Search", label = "Country")]
    pub country: String,

    // --- Paging ---
    #[debug(section = "Paging", label = "Page")]
    pub page: u32,

    #[debug(section = "Paging", label = "Page size")]
    pub page_size: u32,

    #[debug(section = "Paging", label = "Total pages")]
    pub total_pages: u32,

    #[debug(section = "Paging", label = "Total count")]
    pub total_count: u32,

    /// Text currently typed into the page-size box
    #[debug(skip)]
    pub page_size_input: String,

    /// Validation message for the page-size box
    #[debug(section = "Paging", label = "Warning", debug_fmt)]
    pub warning: Option<String>,

    // --- Results ---
    /// Current page lifecycle: Empty → Loading → Loaded/Failed
    #[debug(section = "Results", label = "Places", debug_fmt)]
    pub places: DataResource<Vec<PlaceRecord>>,

    /// Token of the most recently issued request
    #[debug(section = "Results", label = "Request", debug_fmt)]
    pub request_seq: u64,

    /// Highlighted row in the results table
    #[debug(skip)]
    pub selected: usize,

    // --- UI ---
    #[debug(section = "UI", label = "Focus", debug_fmt)]
    pub focus: Focus,

    #[debug(skip)]
    pub spinner_frame: u8,
}

impl AppState {
    pub fn new(country: impl Into<String>, page_size: u32) -> Self {
        Self {
            query: String::new(),
            search_input: String::new(),
            country: country.into(),
            page: 1,
            page_size,
            total_pages: 1,
            total_count: 0,
            page_size_input: page_size.to_string(),
            warning: None,
            places: DataResource::Empty,
            request_seq: 0,
            selected: 0,
            focus: Focus::default(),
            spinner_frame: 0,
        }
    }

    /// Start a session with a query already submitted
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into().trim().to_string();
        self.search_input = query.clone();
        self.query = query;
        self
    }

    /// Offset of the first record on the current page
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1) * self.page_size
    }

    /// 1-based position of a row across all pages
    pub fn global_index(&self, local_index: usize) -> u64 {
        u64::from(self.offset()) + local_index as u64 + 1
    }

    /// Rows of the current page; empty unless a page has loaded
    pub fn results(&self) -> &[PlaceRecord] {
        self.places.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.places.is_loading()
    }

    pub fn selected_record(&self) -> Option<&PlaceRecord> {
        self.results().get(self.selected)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY, DEFAULT_PAGE_SIZE)
    }
}
