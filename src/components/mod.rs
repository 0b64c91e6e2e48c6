pub mod page_size_input;
pub mod pagination;
pub mod places_view;
pub mod results_table;
pub mod search_box;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use page_size_input::{PageSizeInput, PageSizeInputProps};
pub use pagination::{Pagination, PaginationProps};
pub use places_view::{PlacesLayout, PlacesView, PlacesViewProps};
pub use results_table::{ResultsTable, ResultsTableProps};
pub use search_box::{SearchBox, SearchBoxProps};
