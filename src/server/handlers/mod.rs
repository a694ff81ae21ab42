//! HTTP handlers.

mod companies;

pub use companies::{
    create_company, delete_company, get_company, list_companies, update_company,
};

use axum::http::StatusCode;

/// Liveness probe. 200 with an empty body.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
