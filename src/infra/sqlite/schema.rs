use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::domain::entities::dataset::{DatasetConfig, DatasetKind};

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    for dataset in DatasetKind::ALL {
        conn.execute_batch(&ticket_table_sql(dataset.config()))
            .with_context(|| format!("failed to create table {}", dataset.config().table))?;
    }

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS app_user (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )
    .context("failed to initialize user schema")?;

    Ok(())
}

fn ticket_table_sql(config: &DatasetConfig) -> String {
    format!(
        "
        CREATE TABLE IF NOT EXISTS {table} (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            {numeric_ref}     INTEGER,
            {text_ref}        TEXT,
            titulo            TEXT NOT NULL,
            data_abertura     TEXT,
            pendencia_retorno TEXT NOT NULL,
            usuario_resp      TEXT NOT NULL,
            status            TEXT NOT NULL CHECK (status IN ('Aberto', 'Concluído')),
            observacao        TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_data_abertura
            ON {table}(data_abertura, id);
        ",
        table = config.table,
        numeric_ref = config.numeric_ref.column,
        text_ref = config.text_ref.column,
    )
}
