//! Handlers for `question` subcommands.

use rust_decimal::Decimal;
use serde_json::json;
use tabled::Tabled;

use super::command::QuestionCreateArgs;
use super::output;
use super::session::Session;
use crate::domain::id::{QuestionId, UserId};
use crate::domain::pool::OptionStats;
use crate::domain::question::{LocalizedText, NewQuestion};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Creator")]
    creator: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "Option")]
    id: i64,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Stake")]
    stake: u64,
    #[tabled(rename = "Probability")]
    probability: String,
}

impl From<&OptionStats> for PoolRow {
    fn from(stats: &OptionStats) -> Self {
        Self {
            id: stats.option_id.value(),
            label: stats.label.en.clone(),
            stake: stats.total_stake,
            probability: percent(stats.probability),
        }
    }
}

fn percent(probability: Decimal) -> String {
    format!("{}%", (probability * Decimal::ONE_HUNDRED).round_dp(2))
}

fn draft(args: QuestionCreateArgs) -> NewQuestion {
    let description = args
        .description
        .map(|en| LocalizedText::new(en, args.description_zh));
    NewQuestion {
        kind: args.kind,
        creator: UserId::new(args.creator),
        title: LocalizedText::new(args.title, args.title_zh),
        description,
        options: args.options.into_iter().map(LocalizedText::en).collect(),
    }
}

/// Create a question.
pub async fn create(config: &Config, args: QuestionCreateArgs) -> Result<()> {
    let session = Session::open(config)?;
    let question = session.services.catalog.create_question(draft(args)).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "question.create",
            "question": question,
        }));
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Id", question.id.value());
        output::field("Kind", question.kind);
        output::field("Title", &question.title.en);
        for option in &question.options {
            output::field("Option", format!("{} {}", option.id.value(), option.label.en));
        }
        output::success(&format!("Created {}", question.id));
    }

    session.close();
    Ok(())
}

/// List the newest questions.
pub async fn list(config: &Config) -> Result<()> {
    let session = Session::open(config)?;
    let questions = session.services.catalog.list_questions().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "question.list",
            "questions": questions,
        }));
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::section("Questions");
        if questions.is_empty() {
            output::note("No questions yet.");
        } else {
            output::table(questions.into_iter().map(|q| SummaryRow {
                id: q.id.value(),
                kind: q.kind.to_string(),
                title: q.title.en,
                creator: q.creator_username,
                created_at: q.created_at.format("%Y-%m-%d %H:%M").to_string(),
            }));
        }
    }

    session.close();
    Ok(())
}

/// Show one question with its pool.
pub async fn show(config: &Config, id: i64) -> Result<()> {
    let session = Session::open(config)?;
    let detail = session
        .services
        .pools
        .question_detail(QuestionId::new(id))
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "question.show",
            "detail": detail,
        }));
    } else {
        let question = &detail.question;
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Id", question.id.value());
        output::field("Kind", question.kind);
        output::field("Title", &question.title.en);
        if let Some(zh) = &question.title.zh {
            output::field("Title (zh)", zh);
        }
        if let Some(description) = &question.description {
            output::field("Description", &description.en);
        }
        output::field("Total stake", output::highlight(detail.total_stake));

        if !question.kind.accepts_wagers() {
            output::note("Betting is disabled for discussion questions.");
        } else if detail.options.is_empty() {
            output::note("Free-form question; stakes are not pooled per option.");
        } else {
            output::section("Pool");
            output::table(detail.options.iter().map(PoolRow::from));
        }
    }

    session.close();
    Ok(())
}
