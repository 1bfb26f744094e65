use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, store_now, unique_violation};
use crate::config::DEFAULT_TIME_ZONE;
use crate::db::DatabaseError;
use crate::models::{NewUserAccount, UserAccount};

const COLLECTION: &str = "users";

/// Create an account with schema defaults applied.
///
/// Fails with `DuplicateKey` when the email is already registered.
pub fn create_user(conn: &Connection, new_user: NewUserAccount) -> Result<UserAccount, DatabaseError> {
    let now = store_now();
    let user = UserAccount {
        id: Uuid::new_v4(),
        name: new_user.name,
        email: new_user.email,
        password_hash: new_user.password_hash,
        google_tokens: None,
        time_zone: new_user
            .time_zone
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
        last_calendar_sync: None,
        calendar_sync_enabled: false,
        created_at: now,
        updated_at: now,
    };
    insert_user(conn, &user)?;
    Ok(user)
}

pub fn insert_user(conn: &Connection, user: &UserAccount) -> Result<(), DatabaseError> {
    let google_tokens = user
        .google_tokens
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, google_tokens, time_zone,
         last_calendar_sync, calendar_sync_enabled, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            user.id.to_string(),
            user.name,
            user.email,
            user.password_hash,
            google_tokens,
            user.time_zone,
            user.last_calendar_sync.as_ref().map(format_timestamp),
            user.calendar_sync_enabled as i32,
            format_timestamp(&user.created_at),
            format_timestamp(&user.updated_at),
        ],
    )
    .map_err(|e| unique_violation(e, COLLECTION, "email"))?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<UserAccount>, DatabaseError> {
    conn.query_row(
        "SELECT id, name, email, password_hash, google_tokens, time_zone, last_calendar_sync,
         calendar_sync_enabled, created_at, updated_at
         FROM users WHERE id = ?1",
        params![id.to_string()],
        user_row_from_rusqlite,
    )
    .optional()?
    .map(user_from_row)
    .transpose()
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserAccount>, DatabaseError> {
    conn.query_row(
        "SELECT id, name, email, password_hash, google_tokens, time_zone, last_calendar_sync,
         calendar_sync_enabled, created_at, updated_at
         FROM users WHERE email = ?1",
        params![email],
        user_row_from_rusqlite,
    )
    .optional()?
    .map(user_from_row)
    .transpose()
}

struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    google_tokens: Option<String>,
    time_zone: String,
    last_calendar_sync: Option<String>,
    calendar_sync_enabled: bool,
    created_at: String,
    updated_at: String,
}

fn user_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        google_tokens: row.get(4)?,
        time_zone: row.get(5)?,
        last_calendar_sync: row.get(6)?,
        calendar_sync_enabled: row.get::<_, i32>(7)? != 0,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn user_from_row(row: UserRow) -> Result<UserAccount, DatabaseError> {
    let id = Uuid::parse_str(&row.id).map_err(|e| DatabaseError::InvalidDocument {
        collection: COLLECTION.into(),
        reason: format!("bad id {:?}: {e}", row.id),
    })?;

    Ok(UserAccount {
        id,
        name: row.name,
        email: row.email,
        password_hash: row.password_hash,
        google_tokens: row
            .google_tokens
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?,
        time_zone: row.time_zone,
        last_calendar_sync: row
            .last_calendar_sync
            .as_deref()
            .map(|raw| parse_timestamp(COLLECTION, raw))
            .transpose()?,
        calendar_sync_enabled: row.calendar_sync_enabled,
        created_at: parse_timestamp(COLLECTION, &row.created_at)?,
        updated_at: parse_timestamp(COLLECTION, &row.updated_at)?,
    })
}
