//! Catalog core: query contracts, snapshot reconciliation and the dashboard state machine.
mod activation;
mod effect;
mod fetch_state;
mod filter;
mod listing;
mod msg;
mod schema;
mod state;
mod stats;
mod update;
mod view_model;

pub use activation::ActivationId;
pub use effect::Effect;
pub use fetch_state::FetchState;
pub use filter::{Filter, Row};
pub use listing::{
    browse_journals_query, featured_journals_query, journal_item_from_row, ListingItem,
    ListingQuery, ListingQueryBuilder, QueryBuildError, SortSpec,
};
pub use msg::Msg;
pub use schema::{CollectionSchema, EDITORIAL_BOARD, JOURNALS, PROFILES};
pub use state::{DashboardState, ListingView};
pub use stats::{
    dashboard_stat_specs, reconcile_stats, CountOutcome, StatSpec, StatsSnapshot, STAT_EDITORS,
    STAT_JOURNALS, STAT_PEER_REVIEWERS, STAT_RESOURCES,
};
pub use update::update;
pub use view_model::DashboardViewModel;
