//! End-to-end wagering scenarios, run against both stores.

mod harness;
mod support;

use parimutuel::adapter::outbound::memory::MemoryStore;
use parimutuel::domain::error::Rejection;
use parimutuel::domain::id::{OptionId, QuestionId, UserId};
use parimutuel::domain::question::QuestionKind;
use parimutuel::domain::wager::{Selection, WagerPayload};
use parimutuel::error::WagerError;
use parimutuel::port::outbound::store::{CatalogStore, LedgerStore, StakeStore};
use parimutuel::testkit::fixtures::{free_form, funded_user, question_with, yes_no};
use rust_decimal::Decimal;
use serde_json::Number;

use harness::temp_db::TempDb;
use support::stores::{probability_sum, services};

async fn full_balance_on_yes_then_one_more<S: LedgerStore + CatalogStore>(store: S) {
    let svc = services(store);
    let alice = funded_user(&*svc.store, "alice", 1000).await;
    let q = yes_no(&*svc.store, alice.id).await;
    let (yes, no) = (q.options[0].id, q.options[1].id);

    let wager = svc
        .wagering
        .place_wager(alice.id, q.id, &WagerPayload::new(1000).with_option(yes))
        .await
        .unwrap();
    assert_eq!(wager.amount, 1000);
    assert_eq!(wager.selection, Selection::Option(yes));
    assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), 0);

    let pool = svc.pools.compute_option_stats(q.id).await.unwrap();
    assert_eq!(pool.option(yes).unwrap().probability, Decimal::ONE);
    assert_eq!(pool.option(no).unwrap().probability, Decimal::ZERO);

    let err = svc
        .wagering
        .place_wager(alice.id, q.id, &WagerPayload::new(1).with_option(no))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WagerError::InsufficientBalance {
            balance: 0,
            requested: 1
        }
    );
    assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), 0);
    assert_eq!(svc.store.wagers_for_question(q.id).await.unwrap().len(), 1);
}

async fn discussion_refuses_wagers<S: LedgerStore + CatalogStore>(store: S) {
    let svc = services(store);
    let alice = funded_user(&*svc.store, "alice", 1000).await;
    let q = free_form(&*svc.store, alice.id, QuestionKind::Discussion).await;

    let err = svc
        .wagering
        .place_wager(alice.id, q.id, &WagerPayload::new(10))
        .await
        .unwrap_err();
    assert_eq!(err, WagerError::Rejected(Rejection::BettingDisabled));

    // An option id does not change the outcome.
    let err = svc
        .wagering
        .place_wager(
            alice.id,
            q.id,
            &WagerPayload::new(10).with_option(OptionId::new(999)),
        )
        .await
        .unwrap_err();
    assert_eq!(err, WagerError::Rejected(Rejection::BettingDisabled));
    assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), 1000);
}

async fn opposite_sides_split_the_pool<S: LedgerStore + CatalogStore>(store: S) {
    let svc = services(store);
    let alice = funded_user(&*svc.store, "alice", 100).await;
    let bob = funded_user(&*svc.store, "bob", 100).await;
    let q = yes_no(&*svc.store, alice.id).await;
    let (yes, no) = (q.options[0].id, q.options[1].id);

    svc.wagering
        .place_wager(alice.id, q.id, &WagerPayload::new(100).with_option(yes))
        .await
        .unwrap();
    svc.wagering
        .place_wager(bob.id, q.id, &WagerPayload::new(100).with_option(no))
        .await
        .unwrap();

    let pool = svc.pools.compute_option_stats(q.id).await.unwrap();
    assert_eq!(pool.total_stake, 200);
    assert_eq!(pool.option(yes).unwrap().total_stake, 100);
    assert_eq!(pool.option(no).unwrap().total_stake, 100);
    assert_eq!(pool.option(yes).unwrap().probability, Decimal::new(5, 1));
    assert_eq!(pool.option(no).unwrap().probability, Decimal::new(5, 1));
    assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), 0);
    assert_eq!(svc.wagering.balance(bob.id).await.unwrap(), 0);
}

async fn multiple_choice_needs_an_option<S: LedgerStore + CatalogStore>(store: S) {
    let svc = services(store);
    let alice = funded_user(&*svc.store, "alice", 500).await;
    let q = question_with(
        &*svc.store,
        alice.id,
        QuestionKind::MultipleChoice,
        &["red", "green", "blue"],
    )
    .await;

    let err = svc
        .wagering
        .place_wager(alice.id, q.id, &WagerPayload::new(50))
        .await
        .unwrap_err();
    assert_eq!(err, WagerError::Rejected(Rejection::MissingOption));
    assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), 500);
}

async fn negative_amount_fails_before_lookup<S: LedgerStore + CatalogStore>(store: S) {
    let svc = services(store);

    // Neither the user nor the question exists: the amount check comes first.
    let err = svc
        .wagering
        .place_wager(
            UserId::new(404),
            QuestionId::new(404),
            &WagerPayload::new(-5),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WagerError::Rejected(Rejection::InvalidAmount {
            amount: Some(Number::from(-5_i64))
        })
    );

    let missing = WagerPayload::default();
    let err = svc
        .wagering
        .place_wager(UserId::new(404), QuestionId::new(404), &missing)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_AMOUNT");

    let fractional: Number = serde_json::from_str("2.5").unwrap();
    let err = svc
        .wagering
        .place_wager(
            UserId::new(404),
            QuestionId::new(404),
            &WagerPayload::with_raw_amount(fractional.clone()),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WagerError::Rejected(Rejection::InvalidAmount {
            amount: Some(fractional)
        })
    );
}

async fn missing_entities_are_reported<S: LedgerStore + CatalogStore>(store: S) {
    let svc = services(store);
    let alice = funded_user(&*svc.store, "alice", 100).await;
    let q = yes_no(&*svc.store, alice.id).await;
    let other = yes_no(&*svc.store, alice.id).await;

    let err = svc
        .wagering
        .place_wager(UserId::new(999), q.id, &WagerPayload::new(1))
        .await
        .unwrap_err();
    assert_eq!(err, WagerError::UserNotFound(UserId::new(999)));

    let err = svc
        .wagering
        .place_wager(alice.id, QuestionId::new(999), &WagerPayload::new(1))
        .await
        .unwrap_err();
    assert_eq!(err, WagerError::QuestionNotFound(QuestionId::new(999)));

    let foreign = other.options[0].id;
    let err = svc
        .wagering
        .place_wager(alice.id, q.id, &WagerPayload::new(1).with_option(foreign))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WagerError::Rejected(Rejection::InvalidOption {
            option: foreign,
            question: q.id
        })
    );
    assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), 100);
}

async fn free_form_wagers_are_recorded<S: LedgerStore + CatalogStore>(store: S) {
    let svc = services(store);
    let alice = funded_user(&*svc.store, "alice", 100).await;
    let numeric = free_form(&*svc.store, alice.id, QuestionKind::Numeric).await;
    let date = free_form(&*svc.store, alice.id, QuestionKind::Date).await;

    let err = svc
        .wagering
        .place_wager(alice.id, numeric.id, &WagerPayload::new(5))
        .await
        .unwrap_err();
    assert_eq!(err, WagerError::Rejected(Rejection::MissingNumericValue));

    let err = svc
        .wagering
        .place_wager(alice.id, date.id, &WagerPayload::new(5).with_date("soon"))
        .await
        .unwrap_err();
    assert_eq!(err, WagerError::Rejected(Rejection::MissingDateValue));

    svc.wagering
        .place_wager(alice.id, numeric.id, &WagerPayload::new(10).with_numeric(42.5))
        .await
        .unwrap();
    svc.wagering
        .place_wager(alice.id, date.id, &WagerPayload::new(20).with_date("2030-06-01"))
        .await
        .unwrap();

    assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), 70);
    let history = svc.wagering.history(alice.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].numeric_value(), Some(42.5));
    assert_eq!(
        history[1].date_value(),
        chrono::NaiveDate::from_ymd_opt(2030, 6, 1)
    );

    // Free-form questions have no options, so the pool is empty.
    let pool = svc.pools.compute_option_stats(numeric.id).await.unwrap();
    assert!(pool.options.is_empty());
}

async fn balance_moves_by_exactly_the_amount<S: LedgerStore + CatalogStore>(store: S) {
    let svc = services(store);
    let alice = funded_user(&*svc.store, "alice", 1000).await;
    let q = question_with(
        &*svc.store,
        alice.id,
        QuestionKind::MultiSelect,
        &["a", "b", "c", "d"],
    )
    .await;

    let mut expected = 1000;
    for (i, amount) in [1_u64, 7, 250, 33, 2].into_iter().enumerate() {
        let option = q.options[i % q.options.len()].id;
        let before = svc.wagering.balance(alice.id).await.unwrap();
        let wagers_before = svc.store.wagers_for_user(alice.id).await.unwrap().len();

        let payload = WagerPayload::new(i64::try_from(amount).unwrap()).with_option(option);
        svc.wagering.place_wager(alice.id, q.id, &payload).await.unwrap();

        expected -= amount;
        assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), before - amount);
        assert_eq!(svc.wagering.balance(alice.id).await.unwrap(), expected);
        let wagers = svc.store.wagers_for_user(alice.id).await.unwrap();
        assert_eq!(wagers.len(), wagers_before + 1);
        assert_eq!(wagers.last().unwrap().amount, amount);
    }

    let pool = svc.pools.compute_option_stats(q.id).await.unwrap();
    assert_eq!(pool.total_stake, 1000 - expected);
    assert!((probability_sum(&pool) - Decimal::ONE).abs() < Decimal::new(1, 20));

    let again = svc.pools.compute_option_stats(q.id).await.unwrap();
    assert_eq!(pool, again);
}

macro_rules! on_both_stores {
    ($($scenario:ident),* $(,)?) => {
        mod memory {
            $(
                #[tokio::test]
                async fn $scenario() {
                    super::$scenario(super::MemoryStore::new()).await;
                }
            )*
        }

        mod sqlite {
            $(
                #[tokio::test]
                async fn $scenario() {
                    let db = super::TempDb::create(stringify!($scenario));
                    super::$scenario(db.store()).await;
                }
            )*
        }
    };
}

on_both_stores!(
    full_balance_on_yes_then_one_more,
    discussion_refuses_wagers,
    opposite_sides_split_the_pool,
    multiple_choice_needs_an_option,
    negative_amount_fails_before_lookup,
    missing_entities_are_reported,
    free_form_wagers_are_recorded,
    balance_moves_by_exactly_the_amount,
);
