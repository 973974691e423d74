use std::sync::Arc;

use catalog_core::{
    reconcile_stats, ActivationId, CountOutcome, FetchState, StatSpec, StatsSnapshot,
};
use catalog_logging::{catalog_debug, catalog_info, catalog_warn, clip_for_log};
use futures_util::future::join_all;
use tokio::sync::watch;

use crate::{Activation, Activations, QueryError, QueryService, ReaderSettings};

/// Fans out one count query per [`StatSpec`] and reconciles them into a
/// single snapshot.
pub struct AggregateStatsReader {
    service: Arc<dyn QueryService>,
    specs: Vec<StatSpec>,
    settings: ReaderSettings,
    activations: Activations,
    state_tx: watch::Sender<FetchState<StatsSnapshot>>,
}

impl AggregateStatsReader {
    pub fn new(
        service: Arc<dyn QueryService>,
        specs: Vec<StatSpec>,
        settings: ReaderSettings,
    ) -> Self {
        let (state_tx, _) = watch::channel(FetchState::Loading);
        Self {
            service,
            specs,
            settings,
            activations: Activations::new(),
            state_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<StatsSnapshot>> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> FetchState<StatsSnapshot> {
        self.state_tx.borrow().clone()
    }

    /// Runs one fetch cycle under the reader's own numbering.
    ///
    /// Returns `None` when a newer cycle started before this one settled; the
    /// stale result is never published.
    pub async fn fetch(&self) -> Option<FetchState<StatsSnapshot>> {
        let activation = self.activations.begin();
        self.run(activation).await
    }

    /// Runs the cycle for an activation issued by the caller. `None`, without
    /// any remote call, when a newer activation has already been seen.
    pub async fn fetch_for(&self, id: ActivationId) -> Option<FetchState<StatsSnapshot>> {
        let Some(activation) = self.activations.begin_at(id) else {
            catalog_debug!("Stats activation {} refused; newer one already running", id);
            return None;
        };
        self.run(activation).await
    }

    async fn run(&self, activation: Activation) -> Option<FetchState<StatsSnapshot>> {
        self.publish(activation.id, FetchState::Loading);
        catalog_debug!(
            "Stats activation {} counting {} specs",
            activation.id,
            self.specs.len()
        );

        // All counts are polled on this task; none waits on another.
        let counts = join_all(self.specs.iter().map(|spec| self.count_one(spec)));
        let outcomes = tokio::select! {
            _ = activation.token.cancelled() => {
                catalog_debug!("Stats activation {} superseded", activation.id);
                return None;
            }
            outcomes = counts => outcomes,
        };

        let state = reconcile_stats(&self.specs, outcomes);
        match state.reason() {
            Some(reason) => catalog_warn!(
                "Stats activation {} failed: {}",
                activation.id,
                clip_for_log(reason)
            ),
            None => catalog_info!("Stats activation {} ready", activation.id),
        }

        self.publish(activation.id, state.clone()).then_some(state)
    }

    async fn count_one(&self, spec: &StatSpec) -> CountOutcome {
        let call = self.service.count(&spec.collection, &spec.filters);
        let result = match tokio::time::timeout(self.settings.query_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::timeout()),
        };
        result.map_err(|err| {
            catalog_warn!(
                "Count for stat {} on {} failed: {}",
                spec.name,
                spec.collection,
                clip_for_log(&err.to_string())
            );
            err.reason()
        })
    }

    fn publish(&self, id: ActivationId, state: FetchState<StatsSnapshot>) -> bool {
        self.state_tx.send_if_modified(|current| {
            if !self.activations.is_current(id) {
                return false;
            }
            *current = state;
            true
        })
    }
}
