use std::sync::Once;

use catalog_core::{
    update, ActivationId, DashboardState, Effect, FetchState, ListingItem, ListingView, Msg,
    StatsSnapshot,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(catalog_logging::initialize_for_tests);
}

fn item(id: &str) -> ListingItem {
    ListingItem {
        id: id.to_string(),
        title: format!("Journal {id}"),
        ..ListingItem::default()
    }
}

#[test]
fn refresh_starts_activation_for_every_panel() {
    init_logging();
    let (mut state, effects) = update(DashboardState::default(), Msg::Refresh);

    let activation = ActivationId(1);
    assert_eq!(
        effects,
        vec![
            Effect::FetchStats { activation },
            Effect::FetchListing {
                view: ListingView::Featured,
                activation,
            },
            Effect::FetchListing {
                view: ListingView::Browse,
                activation,
            },
        ]
    );
    let view = state.view();
    assert!(view.stats.is_loading());
    assert!(!view.settled);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn settled_results_make_dashboard_settled() {
    init_logging();
    let (state, _) = update(DashboardState::default(), Msg::Refresh);
    let activation = state.last_activation();
    let snapshot: StatsSnapshot = [("journals", 12)].into_iter().collect();

    let (state, _) = update(
        state,
        Msg::StatsSettled {
            activation,
            state: FetchState::Ready(snapshot.clone()),
        },
    );
    let (state, _) = update(
        state,
        Msg::ListingSettled {
            view: ListingView::Featured,
            activation,
            state: FetchState::Ready(vec![item("1")]),
        },
    );
    assert!(!state.view().settled);

    let (state, effects) = update(
        state,
        Msg::ListingSettled {
            view: ListingView::Browse,
            activation,
            state: FetchState::failed("network error", Vec::new()),
        },
    );
    assert!(effects.is_empty());

    let view = state.view();
    assert!(view.settled);
    assert_eq!(view.stats, FetchState::Ready(snapshot));
    assert_eq!(
        view.listing(ListingView::Featured),
        Some(&FetchState::Ready(vec![item("1")]))
    );
    assert_eq!(
        view.listing(ListingView::Browse).and_then(|s| s.reason()),
        Some("network error")
    );
}

#[test]
fn stale_activation_results_are_discarded() {
    init_logging();
    let (state, _) = update(DashboardState::default(), Msg::Refresh);
    let stale = state.last_activation();
    let (mut state, _) = update(state, Msg::Refresh);
    let current = state.last_activation();
    assert!(current > stale);
    state.consume_dirty();

    let (mut state, _) = update(
        state,
        Msg::StatsSettled {
            activation: stale,
            state: FetchState::Ready(StatsSnapshot::zeroed(["journals"])),
        },
    );
    assert!(state.view().stats.is_loading());
    assert!(!state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::StatsSettled {
            activation: current,
            state: FetchState::failed("timeout", StatsSnapshot::zeroed(["journals"])),
        },
    );
    assert_eq!(state.view().stats.reason(), Some("timeout"));
}

#[test]
fn second_settle_for_same_activation_is_ignored() {
    init_logging();
    let (state, _) = update(DashboardState::new([ListingView::Featured]), Msg::Refresh);
    let activation = state.last_activation();

    let (state, _) = update(
        state,
        Msg::ListingSettled {
            view: ListingView::Featured,
            activation,
            state: FetchState::Ready(vec![item("1")]),
        },
    );
    let (state, _) = update(
        state,
        Msg::ListingSettled {
            view: ListingView::Featured,
            activation,
            state: FetchState::Ready(vec![item("2")]),
        },
    );
    assert_eq!(
        state.view().listing(ListingView::Featured),
        Some(&FetchState::Ready(vec![item("1")]))
    );
}

#[test]
fn unregistered_view_is_ignored() {
    init_logging();
    let (state, effects) = update(DashboardState::new([ListingView::Featured]), Msg::Refresh);
    assert_eq!(effects.len(), 2);
    let activation = state.last_activation();

    let (state, _) = update(
        state,
        Msg::ListingSettled {
            view: ListingView::Browse,
            activation,
            state: FetchState::Ready(Vec::new()),
        },
    );
    assert_eq!(state.view().listing(ListingView::Browse), None);
}
