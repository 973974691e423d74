use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use catalog_core::{Filter, Row, SortSpec};
use serde_json::{json, Value};

use crate::{FailureKind, QueryError, QueryService};

/// In-process query service over named row sets.
///
/// Delays and failures can be injected per collection, which makes it the
/// stand-in for the hosted store in tests and in the offline demo.
#[derive(Debug, Default)]
pub struct MemoryQueryService {
    collections: HashMap<String, Vec<Row>>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MemoryQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, collection: &str, rows: Vec<Row>) -> Self {
        self.collections.insert(collection.to_string(), rows);
        self
    }

    /// Rows from a JSON array of objects; non-object entries are skipped.
    pub fn with_json(self, collection: &str, rows: Value) -> Self {
        let rows = match rows {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(row) => Some(row),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        self.with_rows(collection, rows)
    }

    pub fn with_delay(mut self, collection: &str, delay: Duration) -> Self {
        self.delays.insert(collection.to_string(), delay);
        self
    }

    pub fn with_failure(mut self, collection: &str, reason: impl Into<String>) -> Self {
        self.failures.insert(collection.to_string(), reason.into());
        self
    }

    /// Number of count/select calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    async fn matching(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<&Row>, QueryError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if let Some(delay) = self.delays.get(collection) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(reason) = self.failures.get(collection) {
            return Err(QueryError::new(FailureKind::Injected, reason.clone()));
        }
        let rows = self.collections.get(collection).ok_or_else(|| {
            QueryError::new(
                FailureKind::UnknownCollection,
                format!("relation \"{collection}\" does not exist"),
            )
        })?;
        Ok(rows
            .iter()
            .filter(|row| filters.iter().all(|filter| filter.matches(row)))
            .collect())
    }
}

#[async_trait::async_trait]
impl QueryService for MemoryQueryService {
    async fn count(&self, collection: &str, filters: &[Filter]) -> Result<Option<u64>, QueryError> {
        let rows = self.matching(collection, filters).await?;
        Ok(Some(rows.len() as u64))
    }

    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> Result<Vec<Row>, QueryError> {
        let mut rows = self.matching(collection, filters).await?;
        // Stable sort; nulls last ascending, first descending.
        rows.sort_by(|a, b| {
            let ordering = compare_field(a.get(&sort.field), b.get(&sort.field));
            if sort.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows.into_iter().cloned().collect())
    }
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Small bundled catalog used when the app runs without a remote store.
pub fn demo_catalog() -> MemoryQueryService {
    MemoryQueryService::new()
        .with_json(
            "journals",
            json!([
                {
                    "id": 1, "title": "Annals of Cardiology", "category": "Cardiology",
                    "publisher": "Meridian Press", "issn": "1234-5678", "status": "active",
                    "featured": true, "open_access": true, "views_count": 1840,
                    "citation_count": 312
                },
                {
                    "id": 2, "title": "Journal of Clinical Oncology Reviews",
                    "category": "Oncology",
                    "publisher": "Halden Medical", "status": "active", "featured": true,
                    "views_count": 2310, "citation_count": 540
                },
                {
                    "id": 3, "title": "Pediatric Neurology Letters", "category": "Neurology",
                    "publisher": "Meridian Press", "status": "active", "featured": false,
                    "views_count": 620
                },
                {
                    "id": 4, "title": "Tropical Medicine Quarterly",
                    "category": "Infectious Disease",
                    "status": "archived", "featured": true, "views_count": 95
                },
                {
                    "id": 5, "title": "Dermatology Today", "category": "Dermatology",
                    "publisher": "Northgate", "status": "active", "featured": true,
                    "open_access": true, "views_count": 1205
                }
            ]),
        )
        .with_json(
            "profiles",
            json!([
                {
                    "id": "p1", "full_name": "A. Okafor",
                    "role": "reviewer", "approval": "approved"
                },
                {
                    "id": "p2", "full_name": "L. Brandt",
                    "role": "reviewer", "approval": "pending"
                },
                {
                    "id": "p3", "full_name": "M. Ito",
                    "role": "reviewer", "approval": "approved"
                },
                {
                    "id": "p4", "full_name": "R. Silva",
                    "role": "author", "approval": "approved"
                }
            ]),
        )
        .with_json(
            "editorial_board",
            json!([
                { "id": "e1", "full_name": "S. Novak", "role_type": "chief", "active": true },
                { "id": "e2", "full_name": "D. Mensah", "role_type": "associate", "active": true },
                { "id": "e3", "full_name": "K. Rao", "role_type": "associate", "active": false },
                { "id": "e4", "full_name": "J. Byrne", "role_type": "advisory", "active": true }
            ]),
        )
}
