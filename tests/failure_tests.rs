//! Storage faults and lease hygiene.

mod harness;
mod support;

use std::sync::Arc;
use std::time::Duration;

use parimutuel::adapter::outbound::memory::MemoryStore;
use parimutuel::application::wagering::WagerCoordinator;
use parimutuel::domain::wager::WagerPayload;
use parimutuel::error::WagerError;
use parimutuel::port::outbound::store::{CatalogStore, LedgerStore, StakeStore};
use parimutuel::testkit::fixtures::{funded_user, yes_no};
use parimutuel::testkit::flaky::FlakyStore;

use harness::temp_db::TempDb;

async fn failed_commit_has_no_effect_and_retry_succeeds<S>(inner: S)
where
    S: LedgerStore + CatalogStore,
{
    let store = Arc::new(FlakyStore::new(inner));
    let coordinator = WagerCoordinator::new(Arc::clone(&store), Arc::clone(&store))
        .with_lock_timeout(Duration::from_secs(1));
    let alice = funded_user(&*store, "alice", 100).await;
    let q = yes_no(&*store, alice.id).await;
    let payload = WagerPayload::new(40).with_option(q.options[0].id);

    store.fail_next_commit();
    let err = coordinator
        .place_wager(alice.id, q.id, &payload)
        .await
        .unwrap_err();
    assert!(matches!(err, WagerError::StorageFailure(_)));
    assert!(err.is_retryable());
    assert_eq!(coordinator.balance(alice.id).await.unwrap(), 100);
    assert!(store.wagers_for_question(q.id).await.unwrap().is_empty());

    // The lease was released, so the retry does not time out.
    let wager = coordinator.place_wager(alice.id, q.id, &payload).await.unwrap();
    assert_eq!(wager.amount, 40);
    assert_eq!(coordinator.balance(alice.id).await.unwrap(), 60);
    assert_eq!(store.commit_attempts(), 2);
}

#[tokio::test]
async fn memory_failed_commit_has_no_effect() {
    failed_commit_has_no_effect_and_retry_succeeds(MemoryStore::new()).await;
}

#[tokio::test]
async fn sqlite_failed_commit_has_no_effect() {
    let db = TempDb::create("flaky");
    failed_commit_has_no_effect_and_retry_succeeds(db.store()).await;
}

#[tokio::test]
async fn cancelled_wager_releases_the_lease() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Arc::new(
        WagerCoordinator::new(Arc::clone(&store), Arc::clone(&store))
            .with_lock_timeout(Duration::from_millis(500)),
    );
    let alice = funded_user(&*store, "alice", 100).await;
    let q = yes_no(&*store, alice.id).await;
    let payload = WagerPayload::new(10).with_option(q.options[0].id);

    // Drop an in-flight call at whatever point it reached.
    let pending = {
        let coordinator = Arc::clone(&coordinator);
        let payload = payload.clone();
        let (user, question) = (alice.id, q.id);
        tokio::spawn(async move { coordinator.place_wager(user, question, &payload).await })
    };
    pending.abort();
    let _ = pending.await;

    let balance = coordinator.balance(alice.id).await.unwrap();
    coordinator.place_wager(alice.id, q.id, &payload).await.unwrap();
    assert_eq!(coordinator.balance(alice.id).await.unwrap(), balance - 10);
}

#[tokio::test]
async fn sqlite_debit_is_refused_when_balance_changed_underneath() {
    use diesel::prelude::*;

    let db = TempDb::create("external-writer");
    let store = Arc::new(db.store());
    let alice = funded_user(&*store, "alice", 100).await;
    let q = yes_no(&*store, alice.id).await;

    // A writer outside this process drains the balance after our check.
    {
        let mut conn = db.pool().get().unwrap();
        diesel::sql_query("UPDATE users SET token_balance = 5 WHERE id = ?")
            .bind::<diesel::sql_types::BigInt, _>(alice.id.value())
            .execute(&mut conn)
            .unwrap();
    }

    let wager = parimutuel::domain::wager::Wager::new(
        alice.id,
        q.id,
        parimutuel::domain::wager::ValidatedWager {
            amount: 50,
            selection: parimutuel::domain::wager::Selection::Option(q.options[0].id),
        },
    );
    let err = store.commit_wager(&wager).await.unwrap_err();
    assert!(matches!(err, WagerError::InsufficientBalance { balance: 5, .. }));
    assert!(store.wagers_for_question(q.id).await.unwrap().is_empty());
}
