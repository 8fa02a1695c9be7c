// src/handlers/companies.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        company::{Company, ImportCompaniesPayload, ImportSummary, SeedSummary},
        filters::{CompanyFilters, CompanyPage, PaginationOpts},
    },
};

// Tamanho de página do painel quando o cliente não informa
const DEFAULT_PAGE_SIZE: usize = 20;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

// Paginação da listagem. Os filtros vêm de um segundo `Query<CompanyFilters>`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    #[serde(default = "default_page_size")]
    pub num_items: usize,
    /// Cursor devolvido em `continueCursor` na página anterior
    pub cursor: Option<String>,
}

impl From<PageParams> for PaginationOpts {
    fn from(params: PageParams) -> Self {
        PaginationOpts {
            num_items: params.num_items,
            // cursor vazio = primeira página
            cursor: params.cursor.filter(|c| !c.is_empty()),
        }
    }
}

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    params(CompanyFilters, PageParams),
    responses(
        (status = 200, description = "Uma página de empresas", body = CompanyPage),
        (status = 400, description = "Cursor ou tamanho de página inválido")
    )
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<CompanyFilters>,
    Query(page_params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state.company_service
        .list_companies(filters, page_params.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/companies/export
#[utoipa::path(
    get,
    path = "/api/companies/export",
    tag = "Companies",
    params(CompanyFilters),
    responses(
        (status = 200, description = "CSV com todas as empresas filtradas", content_type = "text/csv", body = String)
    )
)]
pub async fn export_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<CompanyFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = app_state.company_service
        .export_companies(filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"empresas.csv\""),
        ],
        csv,
    ))
}

// GET /api/companies/{id}
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Detalhes da empresa", body = Company),
        (status = 404, description = "Empresa não encontrada")
    )
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state.company_service
        .get_company(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?
        .ok_or_else(|| AppError::CompanyNotFound.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(company)))
}

// GET /api/companies/cnpj/{cnpj}
#[utoipa::path(
    get,
    path = "/api/companies/cnpj/{cnpj}",
    tag = "Companies",
    params(("cnpj" = String, Path, description = "CNPJ com ou sem pontuação")),
    responses(
        (status = 200, description = "Detalhes da empresa", body = Company),
        (status = 404, description = "Empresa não encontrada")
    )
)]
pub async fn get_company_by_cnpj(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(cnpj): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state.company_service
        .get_company_by_cnpj(&cnpj)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?
        .ok_or_else(|| AppError::CompanyNotFound.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(company)))
}

// POST /api/companies/import
#[utoipa::path(
    post,
    path = "/api/companies/import",
    tag = "Companies",
    request_body = ImportCompaniesPayload,
    responses(
        (status = 200, description = "Resumo da importação", body = ImportSummary),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn import_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ImportCompaniesPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // Lote com qualquer registro inválido é rejeitado inteiro
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let summary = app_state.company_service
        .import_companies(payload.companies)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/companies/seed
#[utoipa::path(
    post,
    path = "/api/companies/seed",
    tag = "Companies",
    responses(
        (status = 201, description = "Dados de exemplo criados", body = SeedSummary)
    )
)]
pub async fn seed_example_data(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state.company_service
        .seed_example_data()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(summary)))
}
