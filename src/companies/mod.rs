//! Company CRUD orchestration.
//!
//! Maps validated input to storage operations and storage outcomes to
//! the API-facing error taxonomy. Every operation runs under the
//! request's deadline; a storage call abandoned by the deadline
//! surfaces as [`ServiceError::Timeout`] with no retry.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::models::{Company, CompanyFields, CompanyPatch, SearchFilters};
use crate::store::{CompanyStore, StoreError};

/// Failure of a company operation, in API-facing terms.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("company not found")]
    NotFound,
    #[error("operation timed out")]
    Timeout,
    #[error("storage failure: {0}")]
    Upstream(#[source] anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ServiceError::NotFound,
            StoreError::Backend(e) => ServiceError::Upstream(e),
        }
    }
}

/// Orchestrates CRUD operations against the storage collaborator.
#[derive(Clone)]
pub struct CompanyService {
    store: Arc<dyn CompanyStore>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self { store }
    }

    /// List companies matching all supplied filters. Zero matches is a
    /// success with an empty list.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filters: &SearchFilters,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Company>, ServiceError> {
        let results = ctx
            .bound(self.store.search(filters, skip, limit))
            .await
            .map_err(|_| ServiceError::Timeout)??;
        Ok(results)
    }

    /// Fetch one company by ID.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> Result<Company, ServiceError> {
        let company = ctx
            .bound(self.store.get(id))
            .await
            .map_err(|_| ServiceError::Timeout)??;
        Ok(company)
    }

    /// Create a company from validated fields. Assigns a fresh ID and
    /// the creation timestamp; `updated_at` stays unset.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        fields: CompanyFields,
    ) -> Result<String, ServiceError> {
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            code: fields.code,
            country: fields.country,
            website: fields.website,
            phone: fields.phone,
            created_at: Utc::now(),
            updated_at: None,
        };
        ctx.bound(self.store.insert(&company))
            .await
            .map_err(|_| ServiceError::Timeout)??;
        debug!(id = %company.id, "company created");
        Ok(company.id)
    }

    /// Apply a partial patch. Untouched fields keep their stored
    /// values; `updated_at` is stamped with the current time.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: CompanyPatch,
    ) -> Result<(), ServiceError> {
        ctx.bound(self.store.update(id, &patch, Utc::now()))
            .await
            .map_err(|_| ServiceError::Timeout)??;
        Ok(())
    }

    /// Remove a company by ID.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), ServiceError> {
        ctx.bound(self.store.delete(id))
            .await
            .map_err(|_| ServiceError::Timeout)??;
        Ok(())
    }
}
