use std::sync::Arc;
use std::time::Duration;

use catalog_core::{
    featured_journals_query, journal_item_from_row, Filter, FetchState, ListingQuery, JOURNALS,
};
use catalog_engine::{FilteredListingReader, MemoryQueryService, ReaderSettings};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    catalog_logging::initialize_for_tests();
}

fn journals() -> MemoryQueryService {
    MemoryQueryService::new().with_json(
        "journals",
        json!([
            { "id": 1, "title": "A", "featured": true, "status": "active", "views_count": 100 },
            { "id": 2, "title": "B", "featured": true, "status": "active", "views_count": 50 },
            { "id": 3, "title": "C", "featured": false, "status": "active", "views_count": 900 },
            { "id": 4, "title": "D", "featured": true, "status": "active", "views_count": 75 },
            { "id": 5, "title": "E", "featured": true, "status": "archived", "views_count": 500 }
        ]),
    )
}

#[tokio::test]
async fn featured_listing_is_ordered_by_views_descending() {
    init_logging();
    let query = ListingQuery::builder(&JOURNALS)
        .filter(Filter::eq("featured", true))
        .filter(Filter::eq("status", "active"))
        .sort_by("views_count", false)
        .build()
        .unwrap();
    let reader = FilteredListingReader::new(
        Arc::new(journals()),
        query,
        journal_item_from_row,
        ReaderSettings::default(),
    );

    let state = reader.fetch().await.expect("current activation");
    let views: Vec<u64> = state
        .data()
        .expect("ready")
        .iter()
        .map(|item| item.views_count)
        .collect();
    assert!(state.is_ready());
    assert_eq!(views, vec![100, 75, 50]);
}

#[tokio::test]
async fn empty_result_is_ready_not_failed() {
    init_logging();
    let query = ListingQuery::builder(&JOURNALS)
        .filter(Filter::eq("status", "retracted"))
        .sort_by("title", true)
        .build()
        .unwrap();
    let reader = FilteredListingReader::new(
        Arc::new(journals()),
        query,
        journal_item_from_row,
        ReaderSettings::default(),
    );

    assert_eq!(reader.fetch().await, Some(FetchState::Ready(Vec::new())));
}

#[tokio::test]
async fn failure_yields_empty_fallback_with_reason() {
    init_logging();
    let service = journals().with_failure("journals", "permission denied for table journals");
    let reader = FilteredListingReader::new(
        Arc::new(service),
        featured_journals_query(6).unwrap(),
        journal_item_from_row,
        ReaderSettings::default(),
    );

    let state = reader.fetch().await.expect("current activation");
    assert_eq!(
        state,
        FetchState::failed("permission denied for table journals", Vec::new())
    );
}

#[tokio::test]
async fn same_query_twice_yields_identical_sequences() {
    init_logging();
    let reader = FilteredListingReader::new(
        Arc::new(journals()),
        featured_journals_query(0).unwrap(),
        journal_item_from_row,
        ReaderSettings::default(),
    );

    let first = reader.fetch().await;
    let second = reader.fetch().await;
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[tokio::test]
async fn limit_is_passed_to_the_store() {
    init_logging();
    let reader = FilteredListingReader::new(
        Arc::new(journals()),
        featured_journals_query(2).unwrap(),
        |row: &catalog_core::Row| journal_item_from_row(row).id,
        ReaderSettings::default(),
    );
    assert_eq!(
        reader.fetch().await,
        Some(FetchState::Ready(vec!["1".to_string(), "4".to_string()]))
    );
}

#[tokio::test]
async fn slow_select_times_out() {
    init_logging();
    let service = journals().with_delay("journals", Duration::from_millis(300));
    let reader = FilteredListingReader::new(
        Arc::new(service),
        featured_journals_query(6).unwrap(),
        journal_item_from_row,
        ReaderSettings {
            query_timeout: Duration::from_millis(30),
        },
    );
    let state = reader.fetch().await.expect("current activation");
    assert_eq!(state.reason(), Some("timeout"));
    assert_eq!(state.data(), Some(&Vec::new()));
}

#[tokio::test]
async fn superseded_listing_is_not_published() {
    init_logging();
    let service = journals().with_delay("journals", Duration::from_millis(150));
    let reader = Arc::new(FilteredListingReader::new(
        Arc::new(service),
        featured_journals_query(6).unwrap(),
        journal_item_from_row,
        ReaderSettings::default(),
    ));

    let first = {
        let reader = reader.clone();
        tokio::spawn(async move { reader.fetch().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(reader.state().is_loading());
    let second = reader.fetch().await;

    assert_eq!(first.await.unwrap(), None);
    assert!(second.is_some_and(|state| state.is_ready()));
    assert!(reader.state().is_ready());
}
