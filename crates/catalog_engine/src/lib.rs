//! Catalog engine: remote query capability, fan-out readers and effect execution.
mod activation;
mod engine;
mod listing_reader;
mod memory;
mod rest;
mod service;
mod stats_reader;
mod types;

pub use activation::{Activation, Activations};
pub use engine::{EngineConfig, EngineError, EngineHandle, QueryBackend};
pub use listing_reader::{FilteredListingReader, RowMapper};
pub use memory::{demo_catalog, MemoryQueryService};
pub use rest::{RestQueryService, RestSettings};
pub use service::QueryService;
pub use stats_reader::AggregateStatsReader;
pub use types::{EngineEvent, FailureKind, QueryError, ReaderSettings};
