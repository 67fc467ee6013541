//! SQLite store implementation.
//!
//! Provides durable storage for balances, wagers, and the question catalog
//! using SQLite and Diesel ORM. A wager commit runs inside an IMMEDIATE
//! transaction: the conditional debit and the insert either both land or
//! are both rolled back.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::BigInt;
use diesel::SqliteConnection;
use tracing::{error, warn};

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    LastInsertRowId, NewOptionRow, NewQuestionRow, NewUserRow, OptionRow, QuestionRow,
    StakeTotalRow, UserRow, WagerRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    question_options, questions, users, wagers,
};
use crate::domain::id::{OptionId, QuestionId, UserId, WagerId};
use crate::domain::money::Tokens;
use crate::domain::question::{
    LocalizedText, NewQuestion, Question, QuestionKind, QuestionOption, QuestionSnapshot,
};
use crate::domain::wager::{Selection, Wager};
use crate::error::{CatalogError, Error, Result, WagerError};
use crate::port::outbound::store::{
    Account, BalanceStore, CatalogStore, LedgerStore, QuestionSummary, StakeStore,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a wager transaction was rolled back.
#[derive(Debug)]
enum CommitFailure {
    Refused(WagerError),
    Database(DieselError),
}

impl From<DieselError> for CommitFailure {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

/// SQLite-backed store.
///
/// Implements [`BalanceStore`], [`StakeStore`], [`LedgerStore`] and
/// [`CatalogStore`] over one connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    /// Database connection pool.
    pool: DbPool,
}

/// Wagers in the order they were committed.
fn insertion_order() -> SqlLiteral<BigInt> {
    diesel::dsl::sql::<BigInt>("wagers.rowid")
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn last_insert_rowid(conn: &mut SqliteConnection) -> QueryResult<i64> {
        diesel::sql_query("SELECT last_insert_rowid() AS id")
            .get_result::<LastInsertRowId>(conn)
            .map(|row| row.id)
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::Parse(e.to_string()))
    }

    fn to_tokens(raw: i64) -> Result<Tokens> {
        Tokens::try_from(raw).map_err(|e| Error::Parse(format!("negative token amount: {e}")))
    }

    fn account_from_row(row: UserRow) -> Result<Account> {
        Ok(Account {
            id: UserId::new(row.id),
            username: row.username,
            balance: Self::to_tokens(row.token_balance)?,
            created_at: Self::parse_timestamp(&row.created_at)?,
        })
    }

    fn option_from_row(row: OptionRow) -> Result<QuestionOption> {
        Ok(QuestionOption {
            id: OptionId::new(row.id),
            question_id: QuestionId::new(row.question_id),
            position: u32::try_from(row.position).map_err(|e| Error::Parse(e.to_string()))?,
            label: LocalizedText::new(row.label_en, row.label_zh),
        })
    }

    fn kind_from_row(raw: &str) -> Result<QuestionKind> {
        raw.parse()
            .map_err(|e: crate::domain::question::UnknownKind| Error::Parse(e.to_string()))
    }

    fn question_from_rows(row: QuestionRow, options: Vec<OptionRow>) -> Result<Question> {
        let description = match (row.description_en, row.description_zh) {
            (None, None) => None,
            (en, zh) => Some(LocalizedText::new(en.unwrap_or_default(), zh)),
        };
        Ok(Question {
            id: QuestionId::new(row.id),
            kind: Self::kind_from_row(&row.kind)?,
            creator: UserId::new(row.creator_id),
            title: LocalizedText::new(row.title_en, row.title_zh),
            description,
            created_at: Self::parse_timestamp(&row.created_at)?,
            options: options
                .into_iter()
                .map(Self::option_from_row)
                .collect::<Result<_>>()?,
        })
    }

    fn wager_to_row(wager: &Wager) -> std::result::Result<WagerRow, WagerError> {
        Ok(WagerRow {
            id: wager.id.to_string(),
            user_id: wager.user_id.value(),
            question_id: wager.question_id.value(),
            option_id: wager.option_id().map(|o| o.value()),
            numeric_value: wager.numeric_value(),
            date_value: wager.date_value().map(|d| d.format(DATE_FORMAT).to_string()),
            amount: i64::try_from(wager.amount).map_err(WagerError::storage)?,
            placed_at: wager.placed_at.to_rfc3339(),
        })
    }

    fn wager_from_row(row: WagerRow) -> Result<Wager> {
        let selection = match (row.option_id, row.numeric_value, row.date_value) {
            (Some(option), _, _) => Selection::Option(OptionId::new(option)),
            (None, Some(value), _) => Selection::Numeric(value),
            (None, None, Some(date)) => Selection::Date(
                NaiveDate::parse_from_str(&date, DATE_FORMAT)
                    .map_err(|e| Error::Parse(e.to_string()))?,
            ),
            (None, None, None) => {
                return Err(Error::Parse(format!("wager {} has no selection", row.id)))
            }
        };
        Ok(Wager {
            id: WagerId::from(row.id),
            user_id: UserId::new(row.user_id),
            question_id: QuestionId::new(row.question_id),
            selection,
            amount: Self::to_tokens(row.amount)?,
            placed_at: Self::parse_timestamp(&row.placed_at)?,
        })
    }

    fn load_options(conn: &mut SqliteConnection, id: i64) -> QueryResult<Vec<OptionRow>> {
        question_options::table
            .filter(question_options::question_id.eq(id))
            .order(question_options::position.asc())
            .select(OptionRow::as_select())
            .load(conn)
    }

    fn load_question(conn: &mut SqliteConnection, id: i64) -> Result<Option<Question>> {
        let row: Option<QuestionRow> = questions::table
            .find(id)
            .select(QuestionRow::as_select())
            .first(conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let options = Self::load_options(conn, id).map_err(|e| Error::Database(e.to_string()))?;
        Self::question_from_rows(row, options).map(Some)
    }

    /// Conditional debit followed by the insert; any error rolls both back.
    fn commit_in_transaction(
        conn: &mut SqliteConnection,
        row: &WagerRow,
    ) -> std::result::Result<i64, CommitFailure> {
        conn.immediate_transaction::<_, CommitFailure, _>(|conn| {
            let debited = diesel::update(
                users::table
                    .filter(users::id.eq(row.user_id))
                    .filter(users::token_balance.ge(row.amount)),
            )
            .set(users::token_balance.eq(users::token_balance - row.amount))
            .execute(conn)?;

            if debited == 0 {
                let balance: Option<i64> = users::table
                    .find(row.user_id)
                    .select(users::token_balance)
                    .first(conn)
                    .optional()?;
                let user = UserId::new(row.user_id);
                return Err(CommitFailure::Refused(match balance {
                    None => WagerError::UserNotFound(user),
                    Some(balance) => WagerError::InsufficientBalance {
                        balance: Tokens::try_from(balance).unwrap_or(0),
                        requested: Tokens::try_from(row.amount).unwrap_or(0),
                    },
                }));
            }

            diesel::insert_into(wagers::table)
                .values(row)
                .execute(conn)?;

            let remaining = users::table
                .find(row.user_id)
                .select(users::token_balance)
                .first::<i64>(conn)?;
            Ok(remaining)
        })
    }
}

impl BalanceStore for SqliteStore {
    async fn open_account(&self, username: &str, initial: Tokens) -> Result<Account> {
        let row = NewUserRow {
            username: username.to_string(),
            token_balance: i64::try_from(initial).map_err(|e| Error::Parse(e.to_string()))?,
            created_at: Utc::now().to_rfc3339(),
        };
        let mut conn = self.conn()?;

        let id = conn
            .transaction::<_, DieselError, _>(|conn| {
                diesel::insert_into(users::table).values(&row).execute(conn)?;
                Self::last_insert_rowid(conn)
            })
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    Error::Catalog(CatalogError::DuplicateUsername {
                        username: username.to_string(),
                    })
                }
                other => Error::Database(other.to_string()),
            })?;

        Ok(Account {
            id: UserId::new(id),
            username: row.username,
            balance: initial,
            created_at: Self::parse_timestamp(&row.created_at)?,
        })
    }

    async fn account(&self, user: UserId) -> Result<Option<Account>> {
        let mut conn = self.conn()?;
        let row: Option<UserRow> = users::table
            .find(user.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        row.map(Self::account_from_row).transpose()
    }

    async fn balance(&self, user: UserId) -> Result<Option<Tokens>> {
        let mut conn = self.conn()?;
        let balance: Option<i64> = users::table
            .find(user.value())
            .select(users::token_balance)
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        balance.map(Self::to_tokens).transpose()
    }
}

impl StakeStore for SqliteStore {
    async fn stake_totals(&self, question: QuestionId) -> Result<HashMap<OptionId, Tokens>> {
        let mut conn = self.conn()?;
        // One aggregate statement, so the read is a single snapshot.
        let rows: Vec<StakeTotalRow> = diesel::sql_query(
            "SELECT option_id, CAST(SUM(amount) AS BIGINT) AS total \
             FROM wagers \
             WHERE question_id = ? AND option_id IS NOT NULL \
             GROUP BY option_id",
        )
        .bind::<diesel::sql_types::BigInt, _>(question.value())
        .load(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter()
            .map(|row| Ok((OptionId::new(row.option_id), Self::to_tokens(row.total)?)))
            .collect()
    }

    async fn wagers_for_user(&self, user: UserId) -> Result<Vec<Wager>> {
        let mut conn = self.conn()?;
        let rows: Vec<WagerRow> = wagers::table
            .filter(wagers::user_id.eq(user.value()))
            .order(insertion_order().asc())
            .select(WagerRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(Self::wager_from_row).collect()
    }

    async fn wagers_for_question(&self, question: QuestionId) -> Result<Vec<Wager>> {
        let mut conn = self.conn()?;
        let rows: Vec<WagerRow> = wagers::table
            .filter(wagers::question_id.eq(question.value()))
            .order(insertion_order().asc())
            .select(WagerRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(Self::wager_from_row).collect()
    }
}

impl LedgerStore for SqliteStore {
    async fn commit_wager(&self, wager: &Wager) -> std::result::Result<Tokens, WagerError> {
        let row = Self::wager_to_row(wager)?;
        let mut conn = self.pool.get().map_err(WagerError::storage)?;

        match Self::commit_in_transaction(&mut conn, &row) {
            Ok(remaining) => Tokens::try_from(remaining).map_err(WagerError::storage),
            Err(CommitFailure::Refused(err)) => {
                warn!(wager = %wager.id, error = %err, "Conditional debit refused at commit");
                Err(err)
            }
            Err(CommitFailure::Database(err)) => {
                error!(wager = %wager.id, error = %err, "Wager transaction rolled back");
                Err(WagerError::storage(err))
            }
        }
    }
}

impl CatalogStore for SqliteStore {
    async fn create_question(&self, draft: &NewQuestion) -> Result<Question> {
        let row = NewQuestionRow {
            creator_id: draft.creator.value(),
            kind: draft.kind.as_str().to_string(),
            title_en: draft.title.en.clone(),
            title_zh: draft.title.zh.clone(),
            description_en: draft.description.as_ref().map(|d| d.en.clone()),
            description_zh: draft.description.as_ref().and_then(|d| d.zh.clone()),
            created_at: Utc::now().to_rfc3339(),
        };
        let mut conn = self.conn()?;

        let id = conn
            .transaction::<_, DieselError, _>(|conn| {
                diesel::insert_into(questions::table)
                    .values(&row)
                    .execute(conn)?;
                let id = Self::last_insert_rowid(conn)?;

                for (position, label) in draft.options.iter().enumerate() {
                    let option = NewOptionRow {
                        question_id: id,
                        label_en: label.en.clone(),
                        label_zh: label.zh.clone(),
                        position: position as i32,
                    };
                    diesel::insert_into(question_options::table)
                        .values(&option)
                        .execute(conn)?;
                }
                Ok(id)
            })
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    Error::Catalog(CatalogError::UserNotFound(draft.creator))
                }
                other => Error::Database(other.to_string()),
            })?;

        Self::load_question(&mut conn, id)?
            .ok_or(Error::Catalog(CatalogError::QuestionNotFound(QuestionId::new(id))))
    }

    async fn question(&self, id: QuestionId) -> Result<Option<Question>> {
        let mut conn = self.conn()?;
        Self::load_question(&mut conn, id.value())
    }

    async fn snapshot(&self, id: QuestionId) -> Result<Option<QuestionSnapshot>> {
        let mut conn = self.conn()?;
        let kind: Option<String> = questions::table
            .find(id.value())
            .select(questions::kind)
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        let Some(kind) = kind else {
            return Ok(None);
        };

        let options = Self::load_options(&mut conn, id.value())
            .map_err(|e| Error::Database(e.to_string()))?
            .into_iter()
            .map(Self::option_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(QuestionSnapshot::new(
            id,
            Self::kind_from_row(&kind)?,
            options,
        )))
    }

    async fn list_questions(&self, limit: usize) -> Result<Vec<QuestionSummary>> {
        let mut conn = self.conn()?;
        let rows: Vec<(QuestionRow, String)> = questions::table
            .inner_join(users::table)
            .order(questions::id.desc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select((QuestionRow::as_select(), users::username))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter()
            .map(|(row, creator_username)| {
                Ok(QuestionSummary {
                    id: QuestionId::new(row.id),
                    kind: Self::kind_from_row(&row.kind)?,
                    title: LocalizedText::new(row.title_en, row.title_zh),
                    creator: UserId::new(row.creator_id),
                    creator_username,
                    created_at: Self::parse_timestamp(&row.created_at)?,
                })
            })
            .collect()
    }
}
