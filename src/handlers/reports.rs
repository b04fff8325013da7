// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    models::reports::{ChartEntry, MissingItemsReport, PerformanceEntry},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceQuery {
    // Datas no formato YYYY-MM-DD; o filtro é sobre completed_at.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub client: Option<String>,
}

// GET /api/reports/missing-items
#[utoipa::path(
    get,
    path = "/api/reports/missing-items",
    tag = "Relatórios",
    responses(
        (status = 200, description = "Faltantes agregados por produto sobre as ordens parciais", body = MissingItemsReport)
    )
)]
pub async fn missing_items(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .reports_service
        .missing_items(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/reports/performance
#[utoipa::path(
    get,
    path = "/api/reports/performance",
    tag = "Relatórios",
    params(
        ("startDate" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("endDate" = Option<String>, Query, description = "Data final (YYYY-MM-DD), inclusiva"),
        ("client" = Option<String>, Query, description = "Filtra por cliente; 'all' desliga o filtro")
    ),
    responses(
        (status = 200, description = "Rendimento das ordens concluídas", body = Vec<PerformanceEntry>)
    )
)]
pub async fn performance(
    State(app_state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = query
        .start_date
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc());
    // A data final é inclusiva: fecha no último segundo do dia.
    let end = query
        .end_date
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc());
    let client = query
        .client
        .as_deref()
        .filter(|name| !name.is_empty() && *name != "all");

    let entries = app_state
        .reports_service
        .performance(&app_state.db_pool, start, end, client)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/reports/performance/chart
#[utoipa::path(
    get,
    path = "/api/reports/performance/chart",
    tag = "Relatórios",
    responses(
        (status = 200, description = "Tempo médio por dia, últimos 7 dias com dados", body = Vec<ChartEntry>)
    )
)]
pub async fn performance_chart(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let chart = app_state
        .reports_service
        .performance_chart(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(chart)))
}

// GET /api/reports/clients
#[utoipa::path(
    get,
    path = "/api/reports/clients",
    tag = "Relatórios",
    responses(
        (status = 200, description = "Clientes distintos, em ordem alfabética", body = Vec<String>)
    )
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state
        .reports_service
        .clients(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(clients)))
}
