//! Company CRUD endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::companies::ServiceError;
use crate::context::RequestContext;
use crate::models::{Company, CompanyFields, CompanyPatch, SearchFilters};
use crate::server::AppState;
use crate::validate::{
    validate_code, validate_country, validate_name, validate_phone, validate_website,
};

/// Company as returned by the API.
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub country: String,
    pub website: String,
    pub phone: String,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            code: company.code,
            country: company.country,
            website: company.website,
            phone: company.phone,
        }
    }
}

/// Query parameters for company listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    /// Numeric skip offset.
    pub cursor: Option<u64>,
    /// Page size; defaults to 20, must be >= 2 when supplied.
    pub limit: Option<u64>,
}

/// Treat empty query values as absent, like missing parameters.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// List/search companies with exact-match filters and pagination.
pub async fn list_companies(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<ListQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(20);
    if params.limit.is_some() && limit < 2 {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let skip = params.cursor.unwrap_or(0);

    let filters = SearchFilters {
        name: present(params.name),
        code: present(params.code),
        country: present(params.country),
        website: present(params.website),
        phone: present(params.phone),
    };

    match state.companies.search(&ctx, &filters, skip, limit).await {
        Ok(companies) => {
            let results: Vec<CompanyResponse> =
                companies.into_iter().map(CompanyResponse::from).collect();
            Json(serde_json::json!({ "results": results })).into_response()
        }
        Err(err) => {
            error!(error = %err, "companies search error");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Get a single company by ID.
pub async fn get_company(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(company_id): Path<String>,
) -> Response {
    info!(id = %company_id, "fetching company");
    match state.companies.get(&ctx, &company_id).await {
        Ok(company) => Json(CompanyResponse::from(company)).into_response(),
        Err(ServiceError::NotFound) => {
            warn!(id = %company_id, "company not found");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            error!(id = %company_id, error = %err, "unexpected error fetching company");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Creation payload. Missing fields default to empty strings and fail
/// validation, so the caller sees every problem in one response.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub phone: String,
}

/// Create a new company. Geo-gated upstream.
pub async fn create_company(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "couldnt decode create company request");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    info!(
        name = %request.name,
        code = %request.code,
        country = %request.country,
        website = %request.website,
        phone = %request.phone,
        "create company request"
    );

    let mut errors = Vec::new();
    let mut fields = CompanyFields::default();

    match validate_name(&request.name) {
        Ok(name) => fields.name = name,
        Err(err) => errors.push(err.to_string()),
    }
    match validate_code(&request.code) {
        Ok(code) => fields.code = code,
        Err(err) => errors.push(err.to_string()),
    }
    match validate_country(&request.country) {
        Ok(country) => fields.country = country,
        Err(err) => errors.push(err.to_string()),
    }
    match validate_website(&request.website) {
        Ok(website) => fields.website = website,
        Err(err) => errors.push(err.to_string()),
    }
    match validate_phone(&request.phone) {
        Ok(phone) => fields.phone = phone,
        Err(err) => errors.push(err.to_string()),
    }

    if !errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "errors": errors })),
        )
            .into_response();
    }

    match state.companies.create(&ctx, fields).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id })),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "error creating company");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Partial update payload; only supplied fields are validated and
/// applied.
#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

/// Patch an existing company. Any invalid supplied field aborts the
/// whole update.
pub async fn update_company(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(company_id): Path<String>,
    payload: Result<Json<UpdateCompanyRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "couldnt decode company update request");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let mut errors = Vec::new();
    let mut patch = CompanyPatch::default();

    if let Some(name) = &request.name {
        match validate_name(name) {
            Ok(name) => patch.name = Some(name),
            Err(err) => errors.push(err.to_string()),
        }
    }
    if let Some(code) = &request.code {
        match validate_code(code) {
            Ok(code) => patch.code = Some(code),
            Err(err) => errors.push(err.to_string()),
        }
    }
    if let Some(country) = &request.country {
        match validate_country(country) {
            Ok(country) => patch.country = Some(country),
            Err(err) => errors.push(err.to_string()),
        }
    }
    if let Some(website) = &request.website {
        match validate_website(website) {
            Ok(website) => patch.website = Some(website),
            Err(err) => errors.push(err.to_string()),
        }
    }
    if let Some(phone) = &request.phone {
        match validate_phone(phone) {
            Ok(phone) => patch.phone = Some(phone),
            Err(err) => errors.push(err.to_string()),
        }
    }

    if !errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "errors": errors })),
        )
            .into_response();
    }

    match state.companies.update(&ctx, &company_id, patch).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(ServiceError::NotFound) => {
            warn!(id = %company_id, "company to update not found");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            error!(id = %company_id, error = %err, "error updating company");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Delete a company. Geo-gated upstream.
pub async fn delete_company(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(company_id): Path<String>,
) -> Response {
    match state.companies.delete(&ctx, &company_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(ServiceError::NotFound) => {
            warn!(id = %company_id, "company to delete not found");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            error!(id = %company_id, error = %err, "error deleting company");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
