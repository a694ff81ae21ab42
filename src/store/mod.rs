//! Storage layer for company records.
//!
//! The service talks to storage only through the [`CompanyStore`]
//! trait. Backends must report a missing record as
//! [`StoreError::NotFound`], distinct from any other failure.

mod memory;
mod sqlite;

pub use memory::MemoryCompanyStore;
pub use sqlite::SqliteCompanyStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Company, CompanyPatch, SearchFilters};

/// Storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the requested ID.
    #[error("company not found")]
    NotFound,
    /// Any other backend failure.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// CRUD access to company records.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Fetch one record by ID.
    async fn get(&self, id: &str) -> Result<Company>;

    /// Persist a new record. The caller assigns the ID and timestamps.
    async fn insert(&self, company: &Company) -> Result<()>;

    /// Apply a partial patch and stamp `updated_at`. Fails with
    /// `NotFound` when the ID does not exist.
    async fn update(
        &self,
        id: &str,
        patch: &CompanyPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Remove a record. Fails with `NotFound` when the ID does not exist.
    async fn delete(&self, id: &str) -> Result<()>;

    /// List records matching all supplied filters, in storage order,
    /// skipping `skip` rows and returning at most `limit`.
    async fn search(
        &self,
        filters: &SearchFilters,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Company>>;
}
