//! Handler for `wager place`.

use serde_json::json;

use super::command::WagerPlaceArgs;
use super::output;
use super::session::Session;
use super::user::describe_selection;
use crate::domain::id::{OptionId, QuestionId, UserId};
use crate::domain::wager::WagerPayload;
use crate::error::{Result, WagerError};
use crate::infrastructure::config::settings::Config;

fn payload(args: &WagerPlaceArgs) -> WagerPayload {
    WagerPayload {
        option: args.option.map(OptionId::new),
        amount: Some(args.amount.clone()),
        numeric_value: args.numeric,
        date_value: args.date.clone(),
    }
}

/// Hint printed beside transient failures. Rejections get none.
fn retry_hint(err: &WagerError) -> Option<&'static str> {
    match err {
        WagerError::LockTimeout(_) => {
            Some("Another wager for this user is in flight; nothing was debited, retry shortly")
        }
        WagerError::StorageFailure(_) => Some("Nothing was debited; the wager can be retried"),
        _ => None,
    }
}

/// Place one wager and report the remaining balance.
pub async fn place(config: &Config, args: &WagerPlaceArgs) -> Result<()> {
    let session = Session::open(config)?;
    let user = UserId::new(args.user);
    let wagering = &session.services.wagering;

    let wager = match wagering
        .place_wager(user, QuestionId::new(args.question), &payload(args))
        .await
    {
        Ok(wager) => wager,
        Err(err) => {
            if let Some(hint) = retry_hint(&err) {
                output::warning(hint);
            }
            return Err(err.into());
        }
    };
    let balance = wagering.balance(user).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "wager.place",
            "wager": wager,
            "balance": balance,
        }));
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Wager", &wager.id);
        output::field("Question", wager.question_id);
        output::field("Selection", describe_selection(&wager.selection));
        output::field("Amount", wager.amount);
        output::field("Balance", output::highlight(balance));
        output::success(&format!("Staked {} tokens", wager.amount));
    }

    session.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Rejection;

    #[test]
    fn only_transient_failures_get_a_retry_hint() {
        assert!(retry_hint(&WagerError::LockTimeout(UserId::new(1)))
            .unwrap()
            .contains("retry"));
        assert!(retry_hint(&WagerError::storage("disk full")).is_some());
        assert!(retry_hint(&WagerError::Rejected(Rejection::BettingDisabled)).is_none());
        assert!(retry_hint(&WagerError::InsufficientBalance {
            balance: 1,
            requested: 2
        })
        .is_none());
    }

    #[test]
    fn fractional_amount_is_passed_through_untouched() {
        let args = WagerPlaceArgs {
            user: 1,
            question: 2,
            amount: serde_json::from_str("2.5").unwrap(),
            option: Some(3),
            numeric: None,
            date: None,
        };
        let payload = payload(&args);
        assert_eq!(payload.amount, Some(args.amount.clone()));
        assert_eq!(payload.option, Some(OptionId::new(3)));
    }
}
