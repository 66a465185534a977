//! Tabular query executor.
//!
//! The rest of the crate only sees the `QueryExecutor` trait and the
//! rectangular `Table` it returns. The concrete driver (SQLite here) is an
//! external collaborator: its handle is injected into each pipeline
//! invocation and dropped when the run ends, never held as process state.
//!
//! There is no retry or timeout policy: a failed or slow query surfaces as an
//! immediate error to the caller.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::error::AppError;

/// One typed cell of a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

impl Field {
    /// Render the cell as display text. `Null` renders empty.
    pub fn display(&self) -> String {
        match self {
            Field::Null => String::new(),
            Field::Int(v) => v.to_string(),
            Field::Real(v) => v.to_string(),
            Field::Text(v) => v.clone(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Field::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// A rectangular result set with named, typed columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Field>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Resolve a required column, with a clear error naming it.
    pub fn require_column(&self, name: &str) -> Result<usize, AppError> {
        self.column_index(name)
            .ok_or_else(|| AppError::query(format!("Coluna ausente no resultado da consulta: '{name}'.")))
    }
}

/// Executes parameterless read queries against some tabular source.
pub trait QueryExecutor {
    fn query(&self, sql: &str) -> Result<Table, AppError>;
}

/// SQLite-backed executor.
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    /// Open a database file read-only. The dataset has no write path.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| AppError::query(format!("Falha ao abrir o banco '{}': {e}", path.display())))?;
        Ok(Self { conn })
    }

    /// Resolve the database path from the environment (`LAUDOS_DB`, `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let path = std::env::var("LAUDOS_DB")
            .map_err(|_| AppError::config("Missing LAUDOS_DB in environment (.env)."))?;
        Self::open(Path::new(&path))
    }

    /// Wrap an already-open connection (used by tests with `:memory:`).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl QueryExecutor for SqliteExecutor {
    fn query(&self, sql: &str) -> Result<Table, AppError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| AppError::query(format!("Falha ao preparar consulta: {e}")))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let n_cols = columns.len();

        let mut rows = Vec::new();
        let mut iter = stmt
            .query([])
            .map_err(|e| AppError::query(format!("Falha ao executar consulta: {e}")))?;
        while let Some(row) = iter
            .next()
            .map_err(|e| AppError::query(format!("Falha ao ler resultado da consulta: {e}")))?
        {
            let mut out = Vec::with_capacity(n_cols);
            for i in 0..n_cols {
                let value = row
                    .get_ref(i)
                    .map_err(|e| AppError::query(format!("Falha ao ler coluna {i}: {e}")))?;
                out.push(match value {
                    ValueRef::Null => Field::Null,
                    ValueRef::Integer(v) => Field::Int(v),
                    ValueRef::Real(v) => Field::Real(v),
                    ValueRef::Text(t) => Field::Text(String::from_utf8_lossy(t).into_owned()),
                    // The reference schema has no blob columns; render as empty.
                    ValueRef::Blob(_) => Field::Null,
                });
            }
            rows.push(out);
        }

        Ok(Table { columns, rows })
    }
}
