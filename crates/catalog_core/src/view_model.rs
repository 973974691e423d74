use crate::{FetchState, ListingItem, ListingView, StatsSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViewModel {
    pub stats: FetchState<StatsSnapshot>,
    pub listings: Vec<(ListingView, FetchState<Vec<ListingItem>>)>,
    /// No panel is still loading.
    pub settled: bool,
    pub dirty: bool,
}

impl DashboardViewModel {
    pub fn listing(&self, view: ListingView) -> Option<&FetchState<Vec<ListingItem>>> {
        self.listings
            .iter()
            .find(|(v, _)| *v == view)
            .map(|(_, state)| state)
    }
}
