//! CLI module graph.

pub mod command;
pub mod migrate;
pub mod output;
pub mod question;
pub mod session;
pub mod user;
pub mod wager;

use command::{Commands, QuestionCommand, UserCommand, WagerCommand};

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Run one parsed subcommand against the configured database.
///
/// # Errors
/// Returns whatever the handler fails with; nothing is printed here.
pub async fn execute(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Migrate => migrate::execute(config),
        Commands::User(UserCommand::Create { username }) => {
            user::create(config, &username).await
        }
        Commands::User(UserCommand::Balance { id }) => user::balance(config, id).await,
        Commands::User(UserCommand::Wagers { id }) => user::wagers(config, id).await,
        Commands::Question(QuestionCommand::Create(args)) => question::create(config, args).await,
        Commands::Question(QuestionCommand::List) => question::list(config).await,
        Commands::Question(QuestionCommand::Show { id }) => question::show(config, id).await,
        Commands::Wager(WagerCommand::Place(args)) => wager::place(config, &args).await,
    }
}
