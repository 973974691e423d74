use std::time::{Duration, Instant};

use catalog_core::{update, DashboardState, DashboardViewModel, Msg};
use catalog_engine::{EngineConfig, EngineError, EngineEvent, EngineHandle};
use catalog_logging::{catalog_info, catalog_warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Feeds engine events through the dashboard state machine.
pub(crate) struct DashboardRunner {
    engine: EngineHandle,
    state: DashboardState,
}

impl DashboardRunner {
    pub(crate) fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let views: Vec<_> = config.listings.iter().map(|(view, _)| *view).collect();
        Ok(Self {
            engine: EngineHandle::new(config)?,
            state: DashboardState::new(views),
        })
    }

    /// Starts a fetch cycle and pumps events until every panel settles or
    /// `timeout` passes. Panels still loading at the deadline render as such.
    pub(crate) fn refresh_and_wait(&mut self, timeout: Duration) -> DashboardViewModel {
        self.apply(Msg::Refresh);
        let deadline = Instant::now() + timeout;

        while !self.state.view().settled {
            let now = Instant::now();
            if now >= deadline {
                catalog_warn!("Dashboard did not settle within {:?}", timeout);
                break;
            }
            if let Some(event) = self.engine.recv_timeout(POLL_INTERVAL.min(deadline - now)) {
                self.apply(event_to_msg(event));
            }
        }

        if self.state.consume_dirty() {
            catalog_info!("Dashboard activation {} rendered", self.state.last_activation());
        }
        self.state.view()
    }

    fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = update(state, msg);
        self.state = next;
        self.engine.dispatch(effects);
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StatsSettled { activation, state } => Msg::StatsSettled { activation, state },
        EngineEvent::ListingSettled {
            view,
            activation,
            state,
        } => Msg::ListingSettled {
            view,
            activation,
            state,
        },
    }
}
