//! SQLite-backed company store.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;
use tracing::info;

use super::{CompanyStore, Result, StoreError};
use crate::models::{Company, CompanyPatch, SearchFilters};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS companies (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    code       TEXT NOT NULL,
    country    TEXT NOT NULL,
    website    TEXT NOT NULL,
    phone      TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
);
";

/// Parse a datetime string from the database, defaulting to Unix epoch
/// on error.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn row_to_company(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        country: row.get(3)?,
        website: row.get(4)?,
        phone: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: row
            .get::<_, Option<String>>(7)?
            .map(|s| parse_datetime(&s)),
    })
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.into())
}

/// A `CompanyStore` persisting records in a SQLite database file.
pub struct SqliteCompanyStore {
    conn: Mutex<Connection>,
}

impl SqliteCompanyStore {
    /// Open (or create) the database at `path` and ensure the schema
    /// exists.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %path.display(), "opened company database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database, used by tests.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, code, country, website, phone, created_at, updated_at";

/// Filter columns paired with their optional predicate values.
fn filter_pairs(filters: &SearchFilters) -> Vec<(&'static str, &Option<String>)> {
    vec![
        ("name", &filters.name),
        ("code", &filters.code),
        ("country", &filters.country),
        ("website", &filters.website),
        ("phone", &filters.phone),
    ]
}

#[async_trait]
impl CompanyStore for SqliteCompanyStore {
    async fn get(&self, id: &str) -> Result<Company> {
        let conn = self.conn.lock().await;
        let company = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM companies WHERE id = ?1"),
                params![id],
                row_to_company,
            )
            .optional()
            .map_err(backend)?;
        company.ok_or(StoreError::NotFound)
    }

    async fn insert(&self, company: &Company) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO companies (id, name, code, country, website, phone, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                company.id,
                company.name,
                company.code,
                company.country,
                company.website,
                company.phone,
                company.created_at.to_rfc3339(),
                company.updated_at.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(backend)?;
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        patch: &CompanyPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut sets = vec!["updated_at = ?".to_string()];
        let mut values: Vec<Box<dyn rusqlite::ToSql + Send>> =
            vec![Box::new(updated_at.to_rfc3339())];
        for (column, value) in filter_pairs(patch) {
            if let Some(value) = value {
                sets.push(format!("{column} = ?"));
                values.push(Box::new(value.clone()));
            }
        }
        values.push(Box::new(id.to_string()));

        let sql = format!("UPDATE companies SET {} WHERE id = ?", sets.join(", "));
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(&sql, rusqlite::params_from_iter(values))
            .map_err(backend)?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute("DELETE FROM companies WHERE id = ?1", params![id])
            .map_err(backend)?;
        if removed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn search(
        &self,
        filters: &SearchFilters,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Company>> {
        let mut clauses = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql + Send>> = Vec::new();
        for (column, value) in filter_pairs(filters) {
            if let Some(value) = value {
                clauses.push(format!("{column} = ?"));
                values.push(Box::new(value.clone()));
            }
        }

        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM companies");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY rowid LIMIT ? OFFSET ?");
        values.push(Box::new(limit as i64));
        values.push(Box::new(skip as i64));

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql).map_err(backend)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(values), row_to_company)
            .map_err(backend)?;
        let mut companies = Vec::new();
        for row in rows {
            companies.push(row.map_err(backend)?);
        }
        Ok(companies)
    }
}
