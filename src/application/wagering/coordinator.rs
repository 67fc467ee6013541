//! Wagering transaction coordinator.
//!
//! Runs amount check, per-user lease, balance check, question lookup,
//! validation and the atomic commit, in that order. Nothing is mutated
//! until the commit, and the lease is held from the balance read until the
//! commit returns.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::locks::{UserLease, UserLocks};
use crate::domain::id::{QuestionId, UserId};
use crate::domain::money::Tokens;
use crate::domain::validator::{validate, validate_amount};
use crate::domain::wager::{Wager, WagerPayload};
use crate::error::{Result, WagerError};
use crate::port::inbound::identity::IdentityProvider;
use crate::port::outbound::store::{CatalogStore, LedgerStore};

/// Coordinates validated, atomic balance-to-wager transitions.
pub struct WagerCoordinator<L, C> {
    ledger: Arc<L>,
    catalog: Arc<C>,
    locks: UserLocks,
    lock_timeout: Option<Duration>,
}

impl<L, C> WagerCoordinator<L, C>
where
    L: LedgerStore,
    C: CatalogStore,
{
    /// Create a coordinator with no lock timeout.
    pub fn new(ledger: Arc<L>, catalog: Arc<C>) -> Self {
        Self {
            ledger,
            catalog,
            locks: UserLocks::new(),
            lock_timeout: None,
        }
    }

    /// Bound how long a wager waits for exclusive access to its user.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    /// Debit `payload.amount` from `user` and record the wager, atomically.
    ///
    /// # Errors
    /// See [`WagerError`]. Every error leaves balances and stakes untouched.
    pub async fn place_wager(
        &self,
        user: UserId,
        question: QuestionId,
        payload: &WagerPayload,
    ) -> std::result::Result<Wager, WagerError> {
        let result = self.place_wager_inner(user, question, payload).await;
        if let Err(err) = &result {
            if err.is_retryable() {
                warn!(%user, %question, code = err.code(), error = %err, "Wager failed");
            } else {
                debug!(%user, %question, code = err.code(), error = %err, "Wager rejected");
            }
        }
        result
    }

    async fn place_wager_inner(
        &self,
        user: UserId,
        question: QuestionId,
        payload: &WagerPayload,
    ) -> std::result::Result<Wager, WagerError> {
        let amount = validate_amount(payload.amount.as_ref())?;

        let _lease = self.lease(user).await?;
        debug!(%user, "Acquired balance lease");

        let balance = self
            .ledger
            .balance(user)
            .await
            .map_err(WagerError::storage)?
            .ok_or(WagerError::UserNotFound(user))?;
        if balance < amount {
            return Err(WagerError::InsufficientBalance {
                balance,
                requested: amount,
            });
        }

        let snapshot = self
            .catalog
            .snapshot(question)
            .await
            .map_err(WagerError::storage)?
            .ok_or(WagerError::QuestionNotFound(question))?;
        let validated = validate(&snapshot, payload)?;

        let wager = Wager::new(user, question, validated);
        let remaining = self.ledger.commit_wager(&wager).await?;

        info!(
            wager = %wager.id,
            %user,
            %question,
            amount = wager.amount,
            balance = remaining,
            "Wager placed"
        );
        Ok(wager)
    }

    /// Resolve `credential` through `identity`, then place the wager as that user.
    ///
    /// # Errors
    /// `Error::Identity` if the credential is rejected, otherwise as
    /// [`place_wager`](Self::place_wager).
    pub async fn place_wager_as<I: IdentityProvider>(
        &self,
        identity: &I,
        credential: &str,
        question: QuestionId,
        payload: &WagerPayload,
    ) -> Result<Wager> {
        let verified = identity.authenticate(credential)?;
        Ok(self.place_wager(verified.user_id, question, payload).await?)
    }

    /// Current balance of `user`, read straight from the balance store.
    ///
    /// # Errors
    /// `UserNotFound` for unknown users, `StorageFailure` if the read fails.
    pub async fn balance(&self, user: UserId) -> std::result::Result<Tokens, WagerError> {
        self.ledger
            .balance(user)
            .await
            .map_err(WagerError::storage)?
            .ok_or(WagerError::UserNotFound(user))
    }

    /// Every wager `user` has placed, oldest first.
    ///
    /// # Errors
    /// Returns an error if the read fails.
    pub async fn history(&self, user: UserId) -> Result<Vec<Wager>> {
        self.ledger.wagers_for_user(user).await
    }

    async fn lease(&self, user: UserId) -> std::result::Result<UserLease<'_>, WagerError> {
        match self.lock_timeout {
            Some(timeout) => self
                .locks
                .acquire_timeout(user, timeout)
                .await
                .ok_or(WagerError::LockTimeout(user)),
            None => Ok(self.locks.acquire(user).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::identity::TokenRegistry;
    use crate::adapter::outbound::memory::MemoryStore;
    use crate::domain::error::Rejection;
    use crate::domain::id::OptionId;
    use crate::domain::question::{
        default_yes_no_options, LocalizedText, NewQuestion, Question, QuestionKind,
    };
    use crate::error::{Error, IdentityError};
    use crate::port::outbound::store::{BalanceStore, StakeStore};
    use serde_json::Number;

    struct Fixture {
        store: Arc<MemoryStore>,
        coordinator: WagerCoordinator<MemoryStore, MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let coordinator = WagerCoordinator::new(Arc::clone(&store), Arc::clone(&store));
        Fixture { store, coordinator }
    }

    async fn question(store: &MemoryStore, creator: UserId, kind: QuestionKind) -> Question {
        let options = match kind {
            QuestionKind::YesNo => default_yes_no_options(),
            QuestionKind::MultipleChoice | QuestionKind::MultiSelect => vec![
                LocalizedText::en("red"),
                LocalizedText::en("green"),
                LocalizedText::en("blue"),
            ],
            _ => vec![],
        };
        store
            .create_question(&NewQuestion {
                kind,
                creator,
                title: LocalizedText::en("q"),
                description: None,
                options,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn successful_wager_debits_exactly_once() {
        let f = fixture();
        let alice = f.store.open_account("alice", 1000).await.unwrap();
        let q = question(&f.store, alice.id, QuestionKind::YesNo).await;

        let wager = f
            .coordinator
            .place_wager(alice.id, q.id, &WagerPayload::new(250).with_option(q.options[0].id))
            .await
            .unwrap();

        assert_eq!(wager.amount, 250);
        assert_eq!(wager.option_id(), Some(q.options[0].id));
        assert_eq!(f.coordinator.balance(alice.id).await.unwrap(), 750);
        assert_eq!(f.store.wager_count(), 1);
    }

    #[tokio::test]
    async fn invalid_amount_is_rejected_before_any_lookup() {
        let f = fixture();
        // Neither the user nor the question exist; the amount still wins.
        let err = f
            .coordinator
            .place_wager(UserId::new(1), QuestionId::new(1), &WagerPayload::new(-5))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WagerError::Rejected(Rejection::InvalidAmount {
                amount: Some(Number::from(-5_i64))
            })
        );
    }

    #[tokio::test]
    async fn unknown_user_is_reported() {
        let f = fixture();
        let err = f
            .coordinator
            .place_wager(UserId::new(9), QuestionId::new(1), &WagerPayload::new(5))
            .await
            .unwrap_err();
        assert_eq!(err, WagerError::UserNotFound(UserId::new(9)));
    }

    #[tokio::test]
    async fn insufficient_balance_is_checked_before_question_lookup() {
        let f = fixture();
        let alice = f.store.open_account("alice", 10).await.unwrap();
        let err = f
            .coordinator
            .place_wager(alice.id, QuestionId::new(404), &WagerPayload::new(11))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WagerError::InsufficientBalance {
                balance: 10,
                requested: 11
            }
        );
    }

    #[tokio::test]
    async fn unknown_question_is_reported() {
        let f = fixture();
        let alice = f.store.open_account("alice", 10).await.unwrap();
        let err = f
            .coordinator
            .place_wager(alice.id, QuestionId::new(404), &WagerPayload::new(1))
            .await
            .unwrap_err();
        assert_eq!(err, WagerError::QuestionNotFound(QuestionId::new(404)));
    }

    #[tokio::test]
    async fn validator_rejection_is_propagated_verbatim_without_side_effects() {
        let f = fixture();
        let alice = f.store.open_account("alice", 100).await.unwrap();
        let q = question(&f.store, alice.id, QuestionKind::MultipleChoice).await;

        let err = f
            .coordinator
            .place_wager(alice.id, q.id, &WagerPayload::new(10))
            .await
            .unwrap_err();

        assert_eq!(err, WagerError::Rejected(Rejection::MissingOption));
        assert_eq!(f.coordinator.balance(alice.id).await.unwrap(), 100);
        assert_eq!(f.store.wager_count(), 0);
    }

    #[tokio::test]
    async fn option_from_another_question_is_invalid() {
        let f = fixture();
        let alice = f.store.open_account("alice", 100).await.unwrap();
        let q1 = question(&f.store, alice.id, QuestionKind::YesNo).await;
        let q2 = question(&f.store, alice.id, QuestionKind::YesNo).await;

        let err = f
            .coordinator
            .place_wager(alice.id, q1.id, &WagerPayload::new(10).with_option(q2.options[0].id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WagerError::Rejected(Rejection::InvalidOption { .. })
        ));
    }

    #[tokio::test]
    async fn discussion_questions_refuse_wagers() {
        let f = fixture();
        let alice = f.store.open_account("alice", 100).await.unwrap();
        let q = question(&f.store, alice.id, QuestionKind::Discussion).await;

        let err = f
            .coordinator
            .place_wager(alice.id, q.id, &WagerPayload::new(10))
            .await
            .unwrap_err();
        assert_eq!(err, WagerError::Rejected(Rejection::BettingDisabled));
        assert_eq!(f.coordinator.balance(alice.id).await.unwrap(), 100);
        assert!(f.store.wagers_for_question(q.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lease_is_released_after_a_rejection() {
        let f = fixture();
        let alice = f.store.open_account("alice", 100).await.unwrap();
        let q = question(&f.store, alice.id, QuestionKind::Numeric).await;

        let _ = f
            .coordinator
            .place_wager(alice.id, q.id, &WagerPayload::new(10))
            .await;
        assert!(f.coordinator.locks.is_empty());

        f.coordinator
            .place_wager(alice.id, q.id, &WagerPayload::new(10).with_numeric(3.0))
            .await
            .unwrap();
        assert!(f.coordinator.locks.is_empty());
    }

    #[tokio::test]
    async fn held_lease_causes_lock_timeout() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = WagerCoordinator::new(Arc::clone(&store), Arc::clone(&store))
            .with_lock_timeout(Duration::from_millis(20));
        let alice = store.open_account("alice", 100).await.unwrap();
        let q = question(&store, alice.id, QuestionKind::Numeric).await;

        let _held = coordinator.locks.acquire(alice.id).await;
        let err = coordinator
            .place_wager(alice.id, q.id, &WagerPayload::new(10).with_numeric(1.0))
            .await
            .unwrap_err();

        assert_eq!(err, WagerError::LockTimeout(alice.id));
        assert!(err.is_retryable());
        assert_eq!(store.balance(alice.id).await.unwrap(), Some(100));
    }

    #[tokio::test]
    async fn place_wager_as_resolves_identity() {
        let f = fixture();
        let registry = TokenRegistry::new();
        let alice = f.store.open_account("alice", 100).await.unwrap();
        let q = question(&f.store, alice.id, QuestionKind::YesNo).await;
        let token = registry.issue(alice.id);

        let wager = f
            .coordinator
            .place_wager_as(
                &registry,
                &token,
                q.id,
                &WagerPayload::new(5).with_option(q.options[1].id),
            )
            .await
            .unwrap();
        assert_eq!(wager.user_id, alice.id);

        let err = f
            .coordinator
            .place_wager_as(
                &registry,
                "forged",
                q.id,
                &WagerPayload::new(5).with_option(OptionId::new(1)),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Identity(IdentityError::Unauthenticated)
        ));
    }
}
