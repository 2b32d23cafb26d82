mod common;

use std::sync::atomic::Ordering;

use common::{MemoryStore, record};
use hackwatch::dedup::filter_new;
use hackwatch_core::HackathonRecord;

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn stored_titles_are_filtered_out() {
    let store = MemoryStore::with_records(vec![record("HackX", "Online", "Nov 1")]);

    let new = filter_new(
        vec![
            record("HackX", "Online", "Nov 1"),
            record("HackY", "Offline", "Nov 2"),
        ],
        &store,
    )
    .await
    .expect("lookups succeed");

    assert_eq!(new, vec![record("HackY", "Offline", "Nov 2")]);
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn title_is_the_identity() {
    // Same title, everything else changed: still the same hackathon
    let store = MemoryStore::with_records(vec![record("HackX", "Online", "Nov 1")]);

    let new = filter_new(
        vec![HackathonRecord::new(
            "HackX",
            "https://elsewhere.io",
            "Offline",
            "Dec 24",
        )],
        &store,
    )
    .await
    .expect("lookups succeed");

    assert!(new.is_empty());
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn incomplete_candidates_are_dropped_without_lookup() {
    let store = MemoryStore::default();

    let new = filter_new(
        vec![
            HackathonRecord::new("", "https://a.io", "Online", "Nov 1"),
            HackathonRecord::new("HackB", "", "Online", "Nov 1"),
            HackathonRecord::new("HackC", "https://c.io", " ", "Nov 1"),
            HackathonRecord::new("HackD", "https://d.io", "Online", ""),
            HackathonRecord::new("HackE", "https://e.io", "Online", "Nov 1"),
        ],
        &store,
    )
    .await
    .expect("lookups succeed");

    assert_eq!(
        new,
        vec![HackathonRecord::new("HackE", "https://e.io", "Online", "Nov 1")]
    );
    assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn one_lookup_per_candidate_and_page_duplicates_collapse() {
    let store = MemoryStore::default();

    let new = filter_new(
        vec![
            record("HackA", "Online", "Nov 1"),
            record("HackB", "Online", "Nov 2"),
            record("HackA", "Offline", "Nov 9"),
            record("HackC", "Online", "Nov 3"),
        ],
        &store,
    )
    .await
    .expect("lookups succeed");

    assert_eq!(
        new,
        vec![
            record("HackA", "Online", "Nov 1"),
            record("HackB", "Online", "Nov 2"),
            record("HackC", "Online", "Nov 3"),
        ]
    );
    assert_eq!(store.lookups.load(Ordering::SeqCst), 3);
    assert_eq!(store.insert_calls(), 0, "filtering never writes");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn lookup_failure_is_propagated() {
    let store = MemoryStore::default();
    store.set_failing(true);

    let res = filter_new(vec![record("HackA", "Online", "Nov 1")], &store).await;

    assert!(res.is_err());
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn bot_down_notice_never_passes_the_filter() {
    let store = MemoryStore::default();
    let notice = HackathonRecord::bot_down_notice(time::OffsetDateTime::UNIX_EPOCH)
        .expect("formats");

    let new = filter_new(vec![notice], &store).await.expect("lookups succeed");

    assert!(new.is_empty());
    assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
}
