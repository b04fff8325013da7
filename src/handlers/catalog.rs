// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::catalog::{Product, ProductInput, UploadSummary},
};

// ---
// Payload: UploadProducts (carga do catálogo, já achatada pela UI)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadProductsPayload {
    #[validate(length(min = 1, message = "A carga precisa de pelo menos um produto."), nested)]
    pub products: Vec<ProductInput>,
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catálogo",
    responses(
        (status = 200, description = "Lista de produtos ordenada por marca", body = Vec<Product>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .catalog_service
        .list_products(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto encontrado", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .catalog_service
        .get_product(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .update_product(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto excluído"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Produto em uso por ordens de picking")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_product(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

// POST /api/products/bulk
#[utoipa::path(
    post,
    path = "/api/products/bulk",
    tag = "Catálogo",
    request_body = UploadProductsPayload,
    responses(
        (status = 200, description = "Resumo da carga", body = UploadSummary),
        (status = 400, description = "Payload inválido")
    )
)]
pub async fn upload_products(
    State(app_state): State<AppState>,
    Json(payload): Json<UploadProductsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let summary = app_state
        .catalog_service
        .bulk_upsert(&app_state.db_pool, &payload.products)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
