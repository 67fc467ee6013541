//! Command-line interface definitions.
//!
//! Defines the CLI structure for the parimutuel ledger using `clap`: user
//! registration, question management and wager placement.

use clap::{Args, Parser, Subcommand};
use serde_json::Number;
use std::path::PathBuf;

use crate::domain::question::QuestionKind;

/// Parimutuel prediction market ledger CLI
#[derive(Parser, Debug)]
#[command(name = "parimutuel")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: config.toml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the parimutuel CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database if needed and apply pending migrations
    Migrate,

    /// Register users and inspect balances
    #[command(subcommand)]
    User(UserCommand),

    /// Create and inspect questions
    #[command(subcommand)]
    Question(QuestionCommand),

    /// Place wagers
    #[command(subcommand)]
    Wager(WagerCommand),
}

/// Subcommands for `parimutuel user`.
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a user with the configured starting balance.
    Create {
        /// Unique username.
        username: String,
    },
    /// Show a user's token balance.
    Balance {
        /// User id.
        id: i64,
    },
    /// List every wager a user has placed.
    Wagers {
        /// User id.
        id: i64,
    },
}

/// Subcommands for `parimutuel question`.
#[derive(Subcommand, Debug)]
pub enum QuestionCommand {
    /// Add a question to the catalog.
    Create(QuestionCreateArgs),
    /// List the newest questions.
    List,
    /// Show a question with its live pool.
    Show {
        /// Question id.
        id: i64,
    },
}

/// Arguments for `parimutuel question create`.
#[derive(Args, Debug)]
pub struct QuestionCreateArgs {
    /// Question kind (YES_NO, MULTIPLE_CHOICE, MULTI_SELECT, NUMERIC, DATE, DISCUSSION)
    #[arg(long)]
    pub kind: QuestionKind,

    /// English title
    #[arg(long)]
    pub title: String,

    /// Chinese title
    #[arg(long)]
    pub title_zh: Option<String>,

    /// English description
    #[arg(long)]
    pub description: Option<String>,

    /// Chinese description
    #[arg(long, requires = "description")]
    pub description_zh: Option<String>,

    /// Option label, repeat for each option in display order
    #[arg(long = "option")]
    pub options: Vec<String>,

    /// Id of the creating user
    #[arg(long)]
    pub creator: i64,
}

/// Subcommands for `parimutuel wager`.
#[derive(Subcommand, Debug)]
pub enum WagerCommand {
    /// Stake tokens on a question.
    Place(WagerPlaceArgs),
}

/// Arguments for `parimutuel wager place`.
#[derive(Args, Debug)]
pub struct WagerPlaceArgs {
    /// Id of the wagering user
    #[arg(long)]
    pub user: i64,

    /// Question id
    #[arg(long)]
    pub question: i64,

    /// Tokens to stake, a positive whole number
    #[arg(long, allow_negative_numbers = true, value_parser = parse_amount)]
    pub amount: Number,

    /// Option id, for choice questions
    #[arg(long)]
    pub option: Option<i64>,

    /// Numeric guess, for NUMERIC questions
    #[arg(long, allow_negative_numbers = true)]
    pub numeric: Option<f64>,

    /// Date guess (YYYY-MM-DD), for DATE questions
    #[arg(long)]
    pub date: Option<String>,
}

/// Accept any JSON number so fractional stakes get a proper rejection.
fn parse_amount(raw: &str) -> Result<Number, serde_json::Error> {
    serde_json::from_str(raw.trim())
}
