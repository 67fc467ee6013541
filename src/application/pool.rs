//! Pool aggregator: the read side of the market.
//!
//! Reads stake totals from the stake store and turns them into ordered
//! per-option stats. Never touches balances and takes no locks.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::id::QuestionId;
use crate::domain::money::Tokens;
use crate::domain::pool::{compute_option_stats, OptionStats, PoolSnapshot};
use crate::domain::question::Question;
use crate::error::{CatalogError, Result};
use crate::port::outbound::store::{CatalogStore, StakeStore};

/// A question together with its live pool.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    pub question: Question,
    pub options: Vec<OptionStats>,
    pub total_stake: Tokens,
}

/// Computes per-option totals and pool-share probabilities on demand.
pub struct PoolAggregator<S, C> {
    stakes: Arc<S>,
    catalog: Arc<C>,
}

impl<S, C> PoolAggregator<S, C>
where
    S: StakeStore,
    C: CatalogStore,
{
    pub fn new(stakes: Arc<S>, catalog: Arc<C>) -> Self {
        Self { stakes, catalog }
    }

    /// Per-option stake and probability for `question`, ordered by position.
    ///
    /// # Errors
    /// `CatalogError::QuestionNotFound` for unknown questions, or a storage
    /// error if a read fails.
    pub async fn compute_option_stats(&self, question: QuestionId) -> Result<PoolSnapshot> {
        let snapshot = self
            .catalog
            .snapshot(question)
            .await?
            .ok_or(CatalogError::QuestionNotFound(question))?;
        let totals = self.stakes.stake_totals(question).await?;
        Ok(compute_option_stats(question, snapshot.options(), &totals))
    }

    /// The question plus its pool, as a detail view.
    ///
    /// # Errors
    /// As [`compute_option_stats`](Self::compute_option_stats).
    pub async fn question_detail(&self, id: QuestionId) -> Result<QuestionDetail> {
        let question = self
            .catalog
            .question(id)
            .await?
            .ok_or(CatalogError::QuestionNotFound(id))?;
        let totals = self.stakes.stake_totals(id).await?;
        let pool = compute_option_stats(id, &question.options, &totals);
        Ok(QuestionDetail {
            question,
            options: pool.options,
            total_stake: pool.total_stake,
        })
    }
}
