use serde_json::Value;
use thiserror::Error;

use crate::filter::{Filter, Row};
use crate::schema::{CollectionSchema, JOURNALS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryBuildError {
    #[error("collection {collection} has no column {field} to sort by")]
    UnknownSortField { collection: String, field: String },
    #[error("collection {collection} has no column {field} to filter on")]
    UnknownFilterField { collection: String, field: String },
    #[error("listing query on {collection} has no sort")]
    MissingSort { collection: String },
}

/// A validated filtered, sorted read against one collection.
///
/// Only obtainable through [`ListingQuery::builder`], so every field it names
/// exists on the target collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    collection: String,
    filters: Vec<Filter>,
    sort: SortSpec,
    limit: Option<usize>,
}

impl ListingQuery {
    pub fn builder(schema: &CollectionSchema) -> ListingQueryBuilder {
        ListingQueryBuilder {
            schema: *schema,
            filters: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// `None` means the remote default applies.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

#[derive(Debug, Clone)]
pub struct ListingQueryBuilder {
    schema: CollectionSchema,
    filters: Vec<Filter>,
    sort: Option<SortSpec>,
    limit: Option<usize>,
}

impl ListingQueryBuilder {
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort = Some(SortSpec {
            field: field.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<ListingQuery, QueryBuildError> {
        let collection = self.schema.name.to_string();
        if let Some(filter) = self
            .filters
            .iter()
            .find(|filter| !self.schema.has_column(filter.field()))
        {
            return Err(QueryBuildError::UnknownFilterField {
                collection,
                field: filter.field().to_string(),
            });
        }
        let sort = self.sort.ok_or_else(|| QueryBuildError::MissingSort {
            collection: collection.clone(),
        })?;
        if !self.schema.has_column(&sort.field) {
            return Err(QueryBuildError::UnknownSortField {
                collection,
                field: sort.field,
            });
        }

        Ok(ListingQuery {
            collection,
            filters: self.filters,
            sort,
            limit: self.limit.filter(|limit| *limit > 0),
        })
    }
}

/// Display-ready journal row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub publisher: String,
    pub issn: String,
    pub image_url: String,
    pub views_count: u64,
    pub citation_count: u64,
    pub featured: bool,
    pub open_access: bool,
}

/// Maps a raw `journals` row. Total: absent or mistyped fields take
/// `""`, `0` or `false`.
pub fn journal_item_from_row(row: &Row) -> ListingItem {
    ListingItem {
        id: text_or_number(row.get("id")),
        title: text(row.get("title")),
        description: text(row.get("description")),
        category: text(row.get("category")),
        publisher: text(row.get("publisher")),
        issn: text(row.get("issn")),
        image_url: text(row.get("image_url")),
        views_count: counter(row.get("views_count")),
        citation_count: counter(row.get("citation_count")),
        featured: flag(row.get("featured")),
        open_access: flag(row.get("open_access")),
    }
}

fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .unwrap_or_default()
}

fn text_or_number(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn counter(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn flag(value: Option<&Value>) -> bool {
    value.and_then(Value::as_bool).unwrap_or(false)
}

/// Landing page carousel: featured, active journals, most viewed first.
pub fn featured_journals_query(limit: usize) -> Result<ListingQuery, QueryBuildError> {
    ListingQuery::builder(&JOURNALS)
        .filter(Filter::eq("featured", true))
        .filter(Filter::eq("status", "active"))
        .sort_by("views_count", false)
        .limit(limit)
        .build()
}

/// Browse page: every active journal, alphabetical.
pub fn browse_journals_query() -> Result<ListingQuery, QueryBuildError> {
    ListingQuery::builder(&JOURNALS)
        .filter(Filter::eq("status", "active"))
        .sort_by("title", true)
        .build()
}
