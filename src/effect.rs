//! Effects - side effects declared by the reducer

use crate::state::PlaceQuery;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch one page of places; replaces any fetch still in flight
    FetchPlaces(PlaceQuery),
    /// Abort the in-flight fetch, if any
    CancelFetch,
}
