use crate::filter::Filter;
use crate::schema::{CollectionSchema, EDITORIAL_BOARD, JOURNALS, PROFILES};
use crate::FetchState;

pub const STAT_JOURNALS: &str = "journals";
pub const STAT_RESOURCES: &str = "resources";
pub const STAT_PEER_REVIEWERS: &str = "peerReviewers";
pub const STAT_EDITORS: &str = "editors";

/// One named "count matching rows" query. Never asks for row bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSpec {
    pub name: String,
    pub collection: String,
    pub filters: Vec<Filter>,
}

impl StatSpec {
    pub fn new(name: impl Into<String>, collection: &CollectionSchema) -> Self {
        Self {
            name: name.into(),
            collection: collection.name.to_string(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Settled result of one count query: the (possibly absent) count, or a failure reason.
pub type CountOutcome = Result<Option<u64>, String>;

/// Name -> count mapping in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    entries: Vec<(String, u64)>,
}

impl StatsSnapshot {
    /// Every name present with a count of zero.
    pub fn zeroed<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names.into_iter().map(|name| (name, 0)).collect()
    }

    fn insert(&mut self, name: &str, count: u64) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((name.to_string(), count)),
        }
    }

    /// Count for `name`; absent names read as zero.
    pub fn get(&self, name: &str) -> u64 {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }
}

impl<'a> FromIterator<(&'a str, u64)> for StatsSnapshot {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut snapshot = Self::default();
        for (name, count) in iter {
            snapshot.insert(name, count);
        }
        snapshot
    }
}

/// Folds settled count outcomes into one snapshot state.
///
/// Fail-coarse: any failure yields `Failed` with the first reason (declaration
/// order) and every declared stat zeroed. A missing count is a success of 0.
pub fn reconcile_stats(
    specs: &[StatSpec],
    outcomes: Vec<CountOutcome>,
) -> FetchState<StatsSnapshot> {
    debug_assert_eq!(specs.len(), outcomes.len());
    let mut snapshot = StatsSnapshot::default();
    let mut first_failure: Option<String> = None;

    for (spec, outcome) in specs.iter().zip(outcomes) {
        match outcome {
            Ok(count) => snapshot.insert(&spec.name, count.unwrap_or(0)),
            Err(reason) => {
                snapshot.insert(&spec.name, 0);
                first_failure.get_or_insert(reason);
            }
        }
    }

    match first_failure {
        Some(reason) => FetchState::failed(
            reason,
            StatsSnapshot::zeroed(specs.iter().map(|spec| spec.name.as_str())),
        ),
        None => FetchState::Ready(snapshot),
    }
}

/// The four counters shown on the landing dashboard.
pub fn dashboard_stat_specs() -> Vec<StatSpec> {
    vec![
        StatSpec::new(STAT_JOURNALS, &JOURNALS).filter(Filter::eq("status", "active")),
        StatSpec::new(STAT_RESOURCES, &JOURNALS),
        StatSpec::new(STAT_PEER_REVIEWERS, &PROFILES)
            .filter(Filter::eq("role", "reviewer"))
            .filter(Filter::eq("approval", "approved")),
        StatSpec::new(STAT_EDITORS, &EDITORIAL_BOARD)
            .filter(Filter::one_of("role_type", ["chief", "associate"]))
            .filter(Filter::eq("active", true)),
    ]
}
