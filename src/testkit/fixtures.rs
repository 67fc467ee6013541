//! Seed data for tests.
//!
//! Helpers panic on failure: a broken fixture is a broken test.

use crate::domain::id::UserId;
use crate::domain::money::Tokens;
use crate::domain::question::{
    default_yes_no_options, LocalizedText, NewQuestion, Question, QuestionKind,
};
use crate::port::outbound::store::{Account, BalanceStore, CatalogStore};

/// Register `username` with `balance` tokens.
pub async fn funded_user<S: BalanceStore>(store: &S, username: &str, balance: Tokens) -> Account {
    store
        .open_account(username, balance)
        .await
        .expect("open fixture account")
}

/// Insert a question of `kind` with the given option labels.
pub async fn question_with<S: CatalogStore>(
    store: &S,
    creator: UserId,
    kind: QuestionKind,
    labels: &[&str],
) -> Question {
    store
        .create_question(&NewQuestion {
            kind,
            creator,
            title: LocalizedText::en(format!("{kind} fixture")),
            description: None,
            options: labels.iter().map(|label| LocalizedText::en(*label)).collect(),
        })
        .await
        .expect("create fixture question")
}

/// A yes/no question with the default `Yes`/`No` options.
pub async fn yes_no<S: CatalogStore>(store: &S, creator: UserId) -> Question {
    let labels = default_yes_no_options();
    let labels: Vec<&str> = labels.iter().map(|l| l.en.as_str()).collect();
    question_with(store, creator, QuestionKind::YesNo, &labels).await
}

/// A question of a kind that carries no options.
pub async fn free_form<S: CatalogStore>(
    store: &S,
    creator: UserId,
    kind: QuestionKind,
) -> Question {
    question_with(store, creator, kind, &[]).await
}
