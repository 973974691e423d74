use catalog_logging::{catalog_debug, catalog_warn};

use crate::state::Panel;
use crate::{ActivationId, DashboardState, Effect, FetchState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: DashboardState, msg: Msg) -> (DashboardState, Vec<Effect>) {
    let effects = match msg {
        Msg::Refresh => {
            let activation = state.begin_activation();
            let mut effects = Vec::with_capacity(1 + state.listings.len());
            effects.push(Effect::FetchStats { activation });
            for view in state.views() {
                effects.push(Effect::FetchListing { view, activation });
            }
            effects
        }
        Msg::StatsSettled {
            activation,
            state: settled,
        } => {
            if settle(&mut state.stats, activation, settled) {
                state.mark_dirty();
            } else {
                catalog_debug!("Discarding stale stats result for activation {}", activation);
            }
            Vec::new()
        }
        Msg::ListingSettled {
            view,
            activation,
            state: settled,
        } => {
            match state.listings.get_mut(&view) {
                Some(panel) => {
                    if settle(panel, activation, settled) {
                        state.mark_dirty();
                    } else {
                        catalog_debug!(
                            "Discarding stale {} listing for activation {}",
                            view,
                            activation
                        );
                    }
                }
                None => catalog_warn!("Listing result for unregistered view {}", view),
            }
            Vec::new()
        }
    };

    (state, effects)
}

/// Applies a settled state only if it belongs to the panel's current, still
/// loading activation.
fn settle<T>(panel: &mut Panel<T>, activation: ActivationId, settled: FetchState<T>) -> bool {
    if panel.activation != Some(activation) || !panel.state.is_loading() || settled.is_loading() {
        return false;
    }
    panel.state = settled;
    true
}
