//! In-memory company store.
//!
//! Backs tests and ad-hoc runs where no database file is wanted.
//! Records are kept in insertion order so listings are stable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{CompanyStore, Result, StoreError};
use crate::models::{Company, CompanyPatch, SearchFilters};

/// A `CompanyStore` holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryCompanyStore {
    companies: RwLock<Vec<Company>>,
}

impl MemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.companies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.companies.read().await.is_empty()
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    async fn get(&self, id: &str) -> Result<Company> {
        self.companies
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, company: &Company) -> Result<()> {
        self.companies.write().await.push(company.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        patch: &CompanyPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut companies = self.companies.write().await;
        let company = companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;
        company.apply_patch(patch);
        company.updated_at = Some(updated_at);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut companies = self.companies.write().await;
        let before = companies.len();
        companies.retain(|c| c.id != id);
        if companies.len() == before {
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
        let companies = self.companies.read().await;
        Ok(companies
            .iter()
            .filter(|c| c.matches(filters))
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(id: &str, country: &str) -> Company {
        Company {
            id: id.into(),
            name: "Valid Name".into(),
            code: "VN".into(),
            country: country.into(),
            website: "http://company.valid/".into(),
            phone: "79991234567".into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryCompanyStore::new();
        store.insert(&company("a", "Cyprus")).await.unwrap();
        let found = store.get("a").await.unwrap();
        assert_eq!(found.id, "a");
        assert!(found.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryCompanyStore::new();
        assert!(matches!(store.get("nope").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_patches_and_stamps() {
        let store = MemoryCompanyStore::new();
        store.insert(&company("a", "Cyprus")).await.unwrap();

        let now = Utc::now();
        let patch = CompanyPatch {
            phone: Some("123".into()),
            ..Default::default()
        };
        store.update("a", &patch, now).await.unwrap();

        let found = store.get("a").await.unwrap();
        assert_eq!(found.phone, "123");
        assert_eq!(found.country, "Cyprus");
        assert_eq!(found.updated_at, Some(now));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryCompanyStore::new();
        let result = store
            .update("nope", &CompanyPatch::default(), Utc::now())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryCompanyStore::new();
        store.insert(&company("a", "Cyprus")).await.unwrap();
        store.delete("a").await.unwrap();
        assert!(store.is_empty().await);
        assert!(matches!(store.delete("a").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_search_filters_and_paginates() {
        let store = MemoryCompanyStore::new();
        store.insert(&company("a", "Cyprus")).await.unwrap();
        store.insert(&company("b", "Germany")).await.unwrap();
        store.insert(&company("c", "Cyprus")).await.unwrap();

        let filters = SearchFilters {
            country: Some("Cyprus".into()),
            ..Default::default()
        };
        let all = store.search(&filters, 0, 20).await.unwrap();
        assert_eq!(all.len(), 2);

        let second = store.search(&filters, 1, 20).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, "c");

        let none = store
            .search(
                &SearchFilters {
                    country: Some("France".into()),
                    ..Default::default()
                },
                0,
                20,
            )
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
