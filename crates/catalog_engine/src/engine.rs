use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use catalog_core::{
    browse_journals_query, dashboard_stat_specs, featured_journals_query, journal_item_from_row,
    ActivationId, Effect, ListingItem, ListingQuery, ListingView, QueryBuildError, StatSpec,
};
use catalog_logging::{catalog_debug, catalog_info, catalog_warn};
use thiserror::Error;

use crate::{
    AggregateStatsReader, EngineEvent, FilteredListingReader, MemoryQueryService, QueryError,
    QueryService, ReaderSettings, RestQueryService, RestSettings,
};

/// Where the engine sends its queries.
#[derive(Debug, Clone)]
pub enum QueryBackend {
    Rest(RestSettings),
    Memory(Arc<MemoryQueryService>),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend: QueryBackend,
    pub reader: ReaderSettings,
    pub stat_specs: Vec<StatSpec>,
    pub listings: Vec<(ListingView, ListingQuery)>,
}

impl EngineConfig {
    /// The landing dashboard: four counters plus the featured and browse listings.
    pub fn dashboard(
        backend: QueryBackend,
        reader: ReaderSettings,
        featured_limit: usize,
    ) -> Result<Self, QueryBuildError> {
        Ok(Self {
            backend,
            reader,
            stat_specs: dashboard_stat_specs(),
            listings: vec![
                (ListingView::Featured, featured_journals_query(featured_limit)?),
                (ListingView::Browse, browse_journals_query()?),
            ],
        })
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to configure query client: {0}")]
    Client(#[from] QueryError),
}

enum EngineCommand {
    FetchStats { activation: ActivationId },
    FetchListing { view: ListingView, activation: ActivationId },
}

struct Readers {
    stats: AggregateStatsReader,
    listings: HashMap<ListingView, FilteredListingReader<ListingItem>>,
}

/// Executes dashboard effects on a background runtime and reports results as
/// [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let service: Arc<dyn QueryService> = match config.backend {
            QueryBackend::Rest(settings) => Arc::new(RestQueryService::new(settings)?),
            QueryBackend::Memory(service) => service,
        };
        let readers = Arc::new(Readers {
            stats: AggregateStatsReader::new(
                service.clone(),
                config.stat_specs,
                config.reader.clone(),
            ),
            listings: config
                .listings
                .into_iter()
                .map(|(view, query)| {
                    let reader = FilteredListingReader::new(
                        service.clone(),
                        query,
                        journal_item_from_row,
                        config.reader.clone(),
                    );
                    (view, reader)
                })
                .collect(),
        });

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let readers = readers.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&readers, command, event_tx).await;
                });
            }
            catalog_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            let command = match effect {
                Effect::FetchStats { activation } => EngineCommand::FetchStats { activation },
                Effect::FetchListing { view, activation } => {
                    EngineCommand::FetchListing { view, activation }
                }
            };
            let _ = self.cmd_tx.send(command);
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    readers: &Readers,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::FetchStats { activation } => {
            catalog_info!("Fetching stats for activation {}", activation);
            if let Some(state) = readers.stats.fetch_for(activation).await {
                let _ = event_tx.send(EngineEvent::StatsSettled { activation, state });
            }
        }
        EngineCommand::FetchListing { view, activation } => {
            let Some(reader) = readers.listings.get(&view) else {
                catalog_warn!("No listing reader registered for view {}", view);
                return;
            };
            catalog_info!("Fetching {} listing for activation {}", view, activation);
            if let Some(state) = reader.fetch_for(activation).await {
                let _ = event_tx.send(EngineEvent::ListingSettled {
                    view,
                    activation,
                    state,
                });
            }
        }
    }
}
