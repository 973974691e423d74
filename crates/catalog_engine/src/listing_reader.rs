use std::sync::Arc;

use catalog_core::{ActivationId, FetchState, ListingQuery, Row};
use catalog_logging::{catalog_debug, catalog_info, catalog_warn, clip_for_log};
use tokio::sync::watch;

use crate::{Activation, Activations, QueryError, QueryService, ReaderSettings};

/// Total row-to-item mapping.
pub type RowMapper<T> = Arc<dyn Fn(&Row) -> T + Send + Sync>;

/// Runs one validated [`ListingQuery`] and maps the rows in remote order.
pub struct FilteredListingReader<T> {
    service: Arc<dyn QueryService>,
    query: ListingQuery,
    mapper: RowMapper<T>,
    settings: ReaderSettings,
    activations: Activations,
    state_tx: watch::Sender<FetchState<Vec<T>>>,
}

impl<T> FilteredListingReader<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        service: Arc<dyn QueryService>,
        query: ListingQuery,
        mapper: impl Fn(&Row) -> T + Send + Sync + 'static,
        settings: ReaderSettings,
    ) -> Self {
        let (state_tx, _) = watch::channel(FetchState::Loading);
        Self {
            service,
            query,
            mapper: Arc::new(mapper),
            settings,
            activations: Activations::new(),
            state_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Vec<T>>> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> FetchState<Vec<T>> {
        self.state_tx.borrow().clone()
    }

    /// Runs one fetch cycle. `None` when superseded by a newer cycle.
    pub async fn fetch(&self) -> Option<FetchState<Vec<T>>> {
        let activation = self.activations.begin();
        self.run(activation).await
    }

    /// Runs the cycle for an activation issued by the caller. `None` when a
    /// newer activation has already been seen.
    pub async fn fetch_for(&self, id: ActivationId) -> Option<FetchState<Vec<T>>> {
        let Some(activation) = self.activations.begin_at(id) else {
            catalog_debug!(
                "Listing activation {} on {} refused; newer one already running",
                id,
                self.query.collection()
            );
            return None;
        };
        self.run(activation).await
    }

    async fn run(&self, activation: Activation) -> Option<FetchState<Vec<T>>> {
        self.publish(activation.id, FetchState::Loading);

        let query = &self.query;
        let call = self.service.select(
            query.collection(),
            query.filters(),
            query.sort(),
            query.limit(),
        );
        let timed = tokio::time::timeout(self.settings.query_timeout, call);
        let result = tokio::select! {
            _ = activation.token.cancelled() => {
                catalog_debug!(
                    "Listing activation {} on {} superseded",
                    activation.id,
                    query.collection()
                );
                return None;
            }
            result = timed => result.unwrap_or_else(|_| Err(QueryError::timeout())),
        };

        let state = match result {
            Ok(rows) => {
                catalog_info!(
                    "Listing activation {} on {} returned {} rows",
                    activation.id,
                    query.collection(),
                    rows.len()
                );
                FetchState::Ready(rows.iter().map(|row| (self.mapper)(row)).collect())
            }
            Err(err) => {
                catalog_warn!(
                    "Listing activation {} on {} failed: {}",
                    activation.id,
                    query.collection(),
                    clip_for_log(&err.to_string())
                );
                FetchState::failed(err.reason(), Vec::new())
            }
        };

        self.publish(activation.id, state.clone()).then_some(state)
    }

    fn publish(&self, id: ActivationId, state: FetchState<Vec<T>>) -> bool {
        self.state_tx.send_if_modified(|current| {
            if !self.activations.is_current(id) {
                return false;
            }
            *current = state;
            true
        })
    }
}
