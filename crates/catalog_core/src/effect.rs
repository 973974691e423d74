use crate::{ActivationId, ListingView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchStats {
        activation: ActivationId,
    },
    FetchListing {
        view: ListingView,
        activation: ActivationId,
    },
}
