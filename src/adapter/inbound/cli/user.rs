//! Handlers for `user` subcommands.

use serde_json::json;
use tabled::Tabled;

use super::output;
use super::session::Session;
use crate::domain::id::UserId;
use crate::domain::wager::{Selection, Wager};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct WagerRow {
    #[tabled(rename = "Wager")]
    id: String,
    #[tabled(rename = "Question")]
    question: String,
    #[tabled(rename = "Selection")]
    selection: String,
    #[tabled(rename = "Amount")]
    amount: u64,
    #[tabled(rename = "Placed")]
    placed_at: String,
}

/// Human rendering of what a wager is staked on.
pub(crate) fn describe_selection(selection: &Selection) -> String {
    match selection {
        Selection::Option(id) => id.to_string(),
        Selection::Numeric(value) => value.to_string(),
        Selection::Date(date) => date.to_string(),
    }
}

impl From<&Wager> for WagerRow {
    fn from(wager: &Wager) -> Self {
        Self {
            id: wager.id.to_string(),
            question: wager.question_id.to_string(),
            selection: describe_selection(&wager.selection),
            amount: wager.amount,
            placed_at: wager.placed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Register a user.
pub async fn create(config: &Config, username: &str) -> Result<()> {
    let session = Session::open(config)?;
    let account = session.services.catalog.register(username).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "user.create",
            "user": account,
        }));
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Id", account.id.value());
        output::field("Username", &account.username);
        output::field("Balance", account.balance);
        output::success(&format!("Registered {}", account.username));
    }

    session.close();
    Ok(())
}

/// Show a user's balance.
pub async fn balance(config: &Config, id: i64) -> Result<()> {
    let session = Session::open(config)?;
    let user = UserId::new(id);
    let balance = session.services.wagering.balance(user).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "user.balance",
            "user": user,
            "balance": balance,
        }));
    } else if output::is_quiet() {
        println!("{balance}");
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("User", user);
        output::field("Balance", output::highlight(balance));
    }

    session.close();
    Ok(())
}

/// List a user's wagers, oldest first.
pub async fn wagers(config: &Config, id: i64) -> Result<()> {
    let session = Session::open(config)?;
    let user = UserId::new(id);
    // Unknown users are an error, not an empty history.
    session.services.wagering.balance(user).await?;
    let wagers = session.services.wagering.history(user).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "user.wagers",
            "user": user,
            "wagers": wagers,
        }));
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::section(&format!("Wagers by {user}"));
        if wagers.is_empty() {
            output::note("No wagers yet.");
        } else {
            output::table(wagers.iter().map(WagerRow::from));
        }
    }

    session.close();
    Ok(())
}
