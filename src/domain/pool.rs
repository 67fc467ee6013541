//! Parimutuel pool math: per-option totals and pool-share probabilities.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::id::{OptionId, QuestionId};
use crate::domain::money::{Probability, Tokens};
use crate::domain::question::{LocalizedText, QuestionOption};

/// Total stake and implied probability for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionStats {
    pub option_id: OptionId,
    pub position: u32,
    pub label: LocalizedText,
    pub total_stake: Tokens,
    pub probability: Probability,
}

/// Pool state for a whole question, options ordered by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    pub question_id: QuestionId,
    pub options: Vec<OptionStats>,
    pub total_stake: Tokens,
}

impl PoolSnapshot {
    /// Stats for a single option, if it belongs to this pool.
    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&OptionStats> {
        self.options.iter().find(|o| o.option_id == id)
    }
}

/// Combine a question's options with the summed stakes per option.
///
/// Options with no stakes get a total of 0. When the pool is empty every
/// probability is 0; no option is favoured by default.
#[must_use]
pub fn compute_option_stats(
    question_id: QuestionId,
    options: &[QuestionOption],
    stakes: &HashMap<OptionId, Tokens>,
) -> PoolSnapshot {
    let mut ordered: Vec<&QuestionOption> = options.iter().collect();
    ordered.sort_by_key(|o| o.position);

    let totals: Vec<Tokens> = ordered
        .iter()
        .map(|o| stakes.get(&o.id).copied().unwrap_or(0))
        .collect();
    let total_stake: Tokens = totals.iter().fold(0, |acc, t| acc.saturating_add(*t));
    let denominator = Decimal::from(total_stake);

    let options = ordered
        .into_iter()
        .zip(totals)
        .map(|(option, stake)| OptionStats {
            option_id: option.id,
            position: option.position,
            label: option.label.clone(),
            total_stake: stake,
            probability: if total_stake > 0 {
                Decimal::from(stake) / denominator
            } else {
                Decimal::ZERO
            },
        })
        .collect();

    PoolSnapshot {
        question_id,
        options,
        total_stake,
    }
}
