use std::collections::BTreeMap;
use std::fmt;

use crate::view_model::DashboardViewModel;
use crate::{ActivationId, FetchState, ListingItem, StatsSnapshot};

/// Listing panels the dashboard knows how to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListingView {
    Featured,
    Browse,
}

impl fmt::Display for ListingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingView::Featured => write!(f, "featured"),
            ListingView::Browse => write!(f, "browse"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Panel<T> {
    pub(crate) activation: Option<ActivationId>,
    pub(crate) state: FetchState<T>,
}

impl<T> Panel<T> {
    fn idle() -> Self {
        Self {
            activation: None,
            state: FetchState::Loading,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    last_activation: ActivationId,
    pub(crate) stats: Panel<StatsSnapshot>,
    pub(crate) listings: BTreeMap<ListingView, Panel<Vec<ListingItem>>>,
    dirty: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new([ListingView::Featured, ListingView::Browse])
    }
}

impl DashboardState {
    pub fn new(views: impl IntoIterator<Item = ListingView>) -> Self {
        Self {
            last_activation: ActivationId::default(),
            stats: Panel::idle(),
            listings: views.into_iter().map(|view| (view, Panel::idle())).collect(),
            dirty: false,
        }
    }

    pub fn view(&self) -> DashboardViewModel {
        let listings: Vec<_> = self
            .listings
            .iter()
            .map(|(view, panel)| (*view, panel.state.clone()))
            .collect();
        let settled = !self.stats.state.is_loading()
            && listings.iter().all(|(_, state)| !state.is_loading());
        DashboardViewModel {
            stats: self.stats.state.clone(),
            listings,
            settled,
            dirty: self.dirty,
        }
    }

    pub fn views(&self) -> impl Iterator<Item = ListingView> + '_ {
        self.listings.keys().copied()
    }

    pub fn last_activation(&self) -> ActivationId {
        self.last_activation
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Issues the next activation and puts every panel back into `Loading`.
    pub(crate) fn begin_activation(&mut self) -> ActivationId {
        self.last_activation = self.last_activation.next();
        let activation = self.last_activation;
        self.stats = Panel {
            activation: Some(activation),
            state: FetchState::Loading,
        };
        for panel in self.listings.values_mut() {
            *panel = Panel {
                activation: Some(activation),
                state: FetchState::Loading,
            };
        }
        self.mark_dirty();
        activation
    }
}
