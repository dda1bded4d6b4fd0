// Upsert coordinator behavior against in-memory collaborators

mod common;

use certwatch::checker::CheckOutcome;
use certwatch::store::{CertStatus, CertificateStore};
use certwatch::upsert::UpsertCoordinator;
use chrono::{TimeZone, Utc};
use common::{MemoryStore, ScriptedProbe};
use std::sync::Arc;

#[tokio::test]
async fn normalizes_before_lookup_and_probe() {
    let store = Arc::new(MemoryStore::new());
    let expires = Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap();
    let probe = Arc::new(
        ScriptedProbe::new().with_outcome("Example.com", CheckOutcome::Valid { expires }),
    );
    let coordinator = UpsertCoordinator::new(store.clone(), probe.clone());

    let record = coordinator
        .upsert("https://www.Example.com/some/path", None, None)
        .await
        .unwrap();

    // Scheme, path and www. are gone; the host's case is untouched
    assert_eq!(record.hostname, "Example.com");
    assert_eq!(probe.calls(), vec!["Example.com"]);
    assert_eq!(record.status, CertStatus::Valid);
    assert_eq!(record.expires, Some(expires));
}

#[tokio::test]
async fn supplied_expiry_skips_the_probe() {
    let store = Arc::new(MemoryStore::new());
    let probe = Arc::new(ScriptedProbe::new());
    let coordinator = UpsertCoordinator::new(store.clone(), probe.clone());

    let expires = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
    let record = coordinator
        .upsert("example.com", Some(expires), Some(CertStatus::Valid))
        .await
        .unwrap();

    assert!(probe.calls().is_empty());
    assert_eq!(record.expires, Some(expires));
    assert_eq!(record.status, CertStatus::Valid);
}

#[tokio::test]
async fn supplied_expiry_without_status_stores_unchecked() {
    let store = Arc::new(MemoryStore::new());
    let probe = Arc::new(ScriptedProbe::new());
    let coordinator = UpsertCoordinator::new(store.clone(), probe);

    let expires = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
    let record = coordinator
        .upsert("example.com", Some(expires), None)
        .await
        .unwrap();

    assert_eq!(record.status, CertStatus::Unchecked);
}

#[tokio::test]
async fn explicit_unchecked_status_is_honored() {
    let store = Arc::new(MemoryStore::new());
    let probe = Arc::new(ScriptedProbe::new());
    let coordinator = UpsertCoordinator::new(store.clone(), probe);

    let expires = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
    let record = coordinator
        .upsert("example.com", Some(expires), Some(CertStatus::Unchecked))
        .await
        .unwrap();

    // Unchecked is a real value, not an absent one
    assert_eq!(record.status, CertStatus::Unchecked);
}

#[tokio::test]
async fn failed_probe_still_persists_the_record() {
    let store = Arc::new(MemoryStore::new());
    let probe = Arc::new(ScriptedProbe::new().with_outcome(
        "down.example",
        CheckOutcome::Failed {
            reason: "connection refused".to_string(),
        },
    ));
    let coordinator = UpsertCoordinator::new(store.clone(), probe);

    let record = coordinator.upsert("down.example", None, None).await.unwrap();

    assert_eq!(record.status, CertStatus::CheckFailed);
    assert_eq!(record.expires, None);
    assert!(store
        .find_by_hostname("down.example")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn timed_out_probe_persists_check_failed() {
    let store = Arc::new(MemoryStore::new());
    let probe =
        Arc::new(ScriptedProbe::new().with_outcome("slow.example", CheckOutcome::TimedOut));
    let coordinator = UpsertCoordinator::new(store.clone(), probe);

    let record = coordinator.upsert("slow.example", None, None).await.unwrap();
    assert_eq!(record.status, CertStatus::CheckFailed);
}

#[tokio::test]
async fn malformed_hostname_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let probe = Arc::new(ScriptedProbe::new());
    let coordinator = UpsertCoordinator::new(store.clone(), probe.clone());

    let result = coordinator.upsert("!!!", None, None).await;

    assert!(result.is_err());
    assert!(probe.calls().is_empty());
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn update_preserves_identity() {
    let store = Arc::new(MemoryStore::new());
    let probe = Arc::new(ScriptedProbe::new());
    let coordinator = UpsertCoordinator::new(store.clone(), probe);

    let first = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let original = coordinator
        .upsert("example.com", Some(first), Some(CertStatus::Valid))
        .await
        .unwrap();

    let renewed = Utc.with_ymd_and_hms(2027, 6, 1, 0, 0, 0).unwrap();
    let updated = coordinator
        .upsert("example.com", Some(renewed), Some(CertStatus::Valid))
        .await
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.expires, Some(renewed));
    assert_eq!(store.snapshot().len(), 1);
}

#[tokio::test]
async fn remove_reports_row_count() {
    let store = Arc::new(MemoryStore::new());
    let probe = Arc::new(ScriptedProbe::new());
    let coordinator = UpsertCoordinator::new(store.clone(), probe);

    let expires = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
    coordinator
        .upsert("example.com", Some(expires), None)
        .await
        .unwrap();

    assert_eq!(coordinator.remove("https://example.com").await.unwrap(), 1);
    assert_eq!(coordinator.remove("example.com").await.unwrap(), 0);
}

#[tokio::test]
async fn refresh_all_isolates_failures() {
    let good_expiry = Utc.with_ymd_and_hms(2027, 3, 1, 0, 0, 0).unwrap();
    let store = Arc::new(MemoryStore::with_records(vec![
        common::record(1, "good.example", None),
        common::record(2, "bad.example", Some(good_expiry)),
    ]));
    let probe = Arc::new(
        ScriptedProbe::new()
            .with_outcome(
                "good.example",
                CheckOutcome::Valid {
                    expires: good_expiry,
                },
            )
            .with_outcome("bad.example", CheckOutcome::TimedOut),
    );
    let coordinator = UpsertCoordinator::new(store.clone(), probe);

    let results = coordinator.refresh_all(4).await.unwrap();
    assert_eq!(results.len(), 2);

    let good = store.find_by_hostname("good.example").await.unwrap().unwrap();
    assert_eq!(good.status, CertStatus::Valid);
    assert_eq!(good.expires, Some(good_expiry));

    // The timed-out host is marked failed but keeps its stale expiry
    let bad = store.find_by_hostname("bad.example").await.unwrap().unwrap();
    assert_eq!(bad.status, CertStatus::CheckFailed);
    assert_eq!(bad.expires, Some(good_expiry));
}
