use catalog_core::{Filter, Row, SortSpec};

use crate::QueryError;

/// Remote query capability shared by every reader.
///
/// Implementations are stateless and reentrant: any number of calls may be in
/// flight at once.
#[async_trait::async_trait]
pub trait QueryService: Send + Sync {
    /// Number of rows in `collection` matching every filter. `None` when the
    /// store answered without a count.
    async fn count(&self, collection: &str, filters: &[Filter]) -> Result<Option<u64>, QueryError>;

    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> Result<Vec<Row>, QueryError>;
}
