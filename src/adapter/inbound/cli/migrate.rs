//! Handler for the `migrate` command.

use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::storage::Storage;

/// Open the database, which applies any pending migrations.
pub fn execute(config: &Config) -> Result<()> {
    let storage = Storage::open(&config.database)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "migrate",
            "database": storage.url(),
            "status": "ok",
        }));
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Database", storage.url());
        output::success("Migrations applied");
    }

    storage.close();
    Ok(())
}
