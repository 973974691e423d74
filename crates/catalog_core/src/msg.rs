use crate::{ActivationId, FetchState, ListingItem, ListingView, StatsSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Start a new fetch cycle for every panel.
    Refresh,
    /// Engine finished the stats fan-out for an activation.
    StatsSettled {
        activation: ActivationId,
        state: FetchState<StatsSnapshot>,
    },
    /// Engine finished a listing read for an activation.
    ListingSettled {
        view: ListingView,
        activation: ActivationId,
        state: FetchState<Vec<ListingItem>>,
    },
}
