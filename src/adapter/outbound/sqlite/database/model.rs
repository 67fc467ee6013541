//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{question_options, questions, users, wagers};

/// Database row for a user (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub token_balance: i64,
    pub created_at: String,
}

/// Database row for a user (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub username: String,
    pub token_balance: i64,
    pub created_at: String,
}

/// Database row for a question (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuestionRow {
    pub id: i64,
    pub creator_id: i64,
    pub kind: String,
    pub title_en: String,
    pub title_zh: Option<String>,
    pub description_en: Option<String>,
    pub description_zh: Option<String>,
    pub created_at: String,
}

/// Database row for a question (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = questions)]
pub struct NewQuestionRow {
    pub creator_id: i64,
    pub kind: String,
    pub title_en: String,
    pub title_zh: Option<String>,
    pub description_en: Option<String>,
    pub description_zh: Option<String>,
    pub created_at: String,
}

/// Database row for a question option (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = question_options)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OptionRow {
    pub id: i64,
    pub question_id: i64,
    pub label_en: String,
    pub label_zh: Option<String>,
    pub position: i32,
}

/// Database row for a question option (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = question_options)]
pub struct NewOptionRow {
    pub question_id: i64,
    pub label_en: String,
    pub label_zh: Option<String>,
    pub position: i32,
}

/// Database row for a wager.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = wagers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WagerRow {
    pub id: String,
    pub user_id: i64,
    pub question_id: i64,
    pub option_id: Option<i64>,
    pub numeric_value: Option<f64>,
    pub date_value: Option<String>,
    pub amount: i64,
    pub placed_at: String,
}

/// Per-option stake total produced by the aggregate query.
#[derive(QueryableByName, Debug, Clone)]
pub struct StakeTotalRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub option_id: i64,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub total: i64,
}

/// Result of `SELECT last_insert_rowid()`.
#[derive(QueryableByName, Debug, Clone, Copy)]
pub struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub id: i64,
}
