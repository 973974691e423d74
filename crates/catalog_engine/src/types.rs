use std::fmt;
use std::time::Duration;

use catalog_core::{ActivationId, FetchState, ListingItem, ListingView, StatsSnapshot};

/// Per-reader knobs.
#[derive(Debug, Clone)]
pub struct ReaderSettings {
    /// Deadline for each individual remote call.
    pub query_timeout: Duration,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    StatsSettled {
        activation: ActivationId,
        state: FetchState<StatsSnapshot>,
    },
    ListingSettled {
        view: ListingView,
        activation: ActivationId,
        state: FetchState<Vec<ListingItem>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub kind: FailureKind,
    pub message: String,
}

impl QueryError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn timeout() -> Self {
        Self::new(FailureKind::Timeout, "timeout")
    }

    /// Human-readable reason surfaced through `FetchState::Failed`.
    pub fn reason(&self) -> String {
        if self.message.is_empty() {
            self.kind.to_string()
        } else {
            self.message.clone()
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
    UnknownCollection,
    Injected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::UnknownCollection => write!(f, "unknown collection"),
            FailureKind::Injected => write!(f, "injected failure"),
        }
    }
}

impl std::error::Error for QueryError {}
