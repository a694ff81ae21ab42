//! Domain models for company records.

mod company;

pub use company::{Company, CompanyFields, CompanyPatch, SearchFilters};
