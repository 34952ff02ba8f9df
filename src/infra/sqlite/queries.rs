use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, ErrorCode, OptionalExtension};

use crate::domain::entities::dataset::DatasetConfig;
use crate::domain::entities::ticket::{Ticket, TicketFields, TicketId, TicketStatus};
use crate::domain::normalize::{DateValue, RefValue};
use crate::infra::sqlite::schema::open_connection;
use crate::usecase::ports::repo::StoredUser;

pub fn load_tickets(db_path: &Path, config: &DatasetConfig) -> Result<Vec<Ticket>> {
    let conn = open_connection(db_path)?;
    let sql = format!(
        "SELECT id, {numeric_ref}, {text_ref}, titulo, data_abertura,
                pendencia_retorno, usuario_resp, status, observacao
         FROM {table}
         ORDER BY data_abertura IS NULL, data_abertura ASC, id ASC",
        table = config.table,
        numeric_ref = config.numeric_ref.column,
        text_ref = config.text_ref.column,
    );
    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("failed to prepare ticket query for {}", config.table))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, Option<String>>(8)?,
            ))
        })
        .with_context(|| format!("failed to query tickets from {}", config.table))?;

    let mut tickets = Vec::new();
    for row in rows {
        let (id, numeric_ref, text_ref, title, open_date, pendency, owner, status, notes) =
            row.context("failed to read ticket row")?;
        let status = TicketStatus::parse(&status)
            .ok_or_else(|| anyhow!("unknown status {status:?} on ticket {id}"))?;
        tickets.push(Ticket {
            id: TicketId(id),
            fields: TicketFields {
                numeric_ref: RefValue::from(numeric_ref),
                text_ref: RefValue::from(text_ref),
                title,
                open_date: open_date
                    .as_deref()
                    .map(DateValue::parse)
                    .unwrap_or_default(),
                pendency,
                owner,
                status,
                notes: RefValue::from(notes),
            }
            .normalized(),
        });
    }

    Ok(tickets)
}

pub fn insert_ticket(db_path: &Path, config: &DatasetConfig, fields: &TicketFields) -> Result<i64> {
    let conn = open_connection(db_path)?;
    let sql = format!(
        "INSERT INTO {table}({numeric_ref}, {text_ref}, titulo, data_abertura,
                              pendencia_retorno, usuario_resp, status, observacao)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        table = config.table,
        numeric_ref = config.numeric_ref.column,
        text_ref = config.text_ref.column,
    );
    conn.execute(
        &sql,
        params![
            fields.numeric_ref.as_option(),
            fields.text_ref.as_option(),
            fields.title,
            fields.open_date.canonical(),
            fields.pendency,
            fields.owner,
            fields.status.as_str(),
            fields.notes.as_option(),
        ],
    )
    .with_context(|| format!("failed to insert ticket into {}", config.table))?;
    Ok(conn.last_insert_rowid())
}

/// Returns the number of rows touched: 0 when `id` does not exist.
pub fn update_ticket(
    db_path: &Path,
    config: &DatasetConfig,
    id: i64,
    fields: &TicketFields,
) -> Result<usize> {
    let conn = open_connection(db_path)?;
    let sql = format!(
        "UPDATE {table}
         SET {numeric_ref} = ?1,
             {text_ref} = ?2,
             titulo = ?3,
             data_abertura = ?4,
             pendencia_retorno = ?5,
             usuario_resp = ?6,
             status = ?7,
             observacao = ?8
         WHERE id = ?9",
        table = config.table,
        numeric_ref = config.numeric_ref.column,
        text_ref = config.text_ref.column,
    );
    let updated = conn
        .execute(
            &sql,
            params![
                fields.numeric_ref.as_option(),
                fields.text_ref.as_option(),
                fields.title,
                fields.open_date.canonical(),
                fields.pendency,
                fields.owner,
                fields.status.as_str(),
                fields.notes.as_option(),
                id,
            ],
        )
        .with_context(|| format!("failed to update ticket {id} in {}", config.table))?;
    Ok(updated)
}

pub fn find_user_by_email(db_path: &Path, email: &str) -> Result<Option<StoredUser>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT id, email, password_hash FROM app_user WHERE email = ?1",
        [email],
        |row| {
            Ok(StoredUser {
                id: row.get(0)?,
                email: row.get(1)?,
                password_hash: row.get(2)?,
            })
        },
    )
    .optional()
    .context("failed to query user")
}

/// `None` when the email is already registered.
pub fn insert_user(db_path: &Path, email: &str, password_hash: &str) -> Result<Option<i64>> {
    let conn = open_connection(db_path)?;
    match conn.execute(
        "INSERT INTO app_user(email, password_hash) VALUES (?1, ?2)",
        params![email, password_hash],
    ) {
        Ok(_) => Ok(Some(conn.last_insert_rowid())),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            Ok(None)
        }
        Err(err) => Err(err).context("failed to insert user"),
    }
}
