// src/handlers/dashboard.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    // Importamos os models para referenciar no Swagger
    models::{
        dashboard::{ActivityCount, DashboardStats, MunicipalityCount, StateCount},
        filters::StatsFilters,
    },
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    params(StatsFilters),
    responses(
        (status = 200, description = "Totais, flags e tabelas de frequência", body = DashboardStats)
    )
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<StatsFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state.dashboard_service
        .get_stats(filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/dashboard/cnaes
#[utoipa::path(
    get,
    path = "/api/dashboard/cnaes",
    tag = "Dashboard",
    responses(
        (status = 200, description = "CNAEs distintos, do mais frequente ao menos", body = Vec<ActivityCount>)
    )
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let activities = app_state.dashboard_service
        .unique_activities()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(activities)))
}

// GET /api/dashboard/estados
#[utoipa::path(
    get,
    path = "/api/dashboard/estados",
    tag = "Dashboard",
    responses(
        (status = 200, description = "UFs distintas com contagem", body = Vec<StateCount>)
    )
)]
pub async fn list_states(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let states = app_state.dashboard_service
        .unique_states()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(states)))
}

// GET /api/dashboard/estados/{estado}/municipios
#[utoipa::path(
    get,
    path = "/api/dashboard/estados/{estado}/municipios",
    tag = "Dashboard",
    params(("estado" = String, Path, description = "UF", example = "TO")),
    responses(
        (status = 200, description = "Municípios da UF com contagem", body = Vec<MunicipalityCount>)
    )
)]
pub async fn list_municipalities(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(state): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let municipalities = app_state.dashboard_service
        .municipalities_by_state(&state)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(municipalities)))
}
