// src/handlers/picking.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        picking::{
            DocumentRow, FinalizeStatus, IngestionSummary, ItemPickedUpdate, OrderDetail,
            OrderStatus, OrderSummary, ScanResult, SessionView,
        },
        reports::PickingStats,
    },
};

// ---
// Validação customizada: o ajuste manual é sempre de uma unidade.
// ---
fn validate_delta(delta: i32) -> Result<(), ValidationError> {
    if delta != 1 && delta != -1 {
        let mut err = ValidationError::new("delta");
        err.message = Some("O ajuste deve ser +1 ou -1.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "O número da fatura é obrigatório."))]
    #[schema(example = "RUM202505090921")]
    pub invoice_number: String,

    #[serde(default)]
    #[schema(example = "Cliente de Ejemplo")]
    pub client_name: String,

    // Linhas já extraídas do documento de cobrança (código, marca,
    // produto, quantidade). A extração fica fora do núcleo.
    #[validate(nested)]
    pub rows: Vec<DocumentRow>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanPayload {
    #[validate(length(min = 1, message = "O código lido é obrigatório."))]
    #[schema(example = "7861234567890")]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustPayload {
    #[validate(custom(function = "validate_delta"))]
    #[schema(example = 1)]
    pub delta: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizePayload {
    pub status: FinalizeStatus,
    #[validate(nested)]
    pub items: Vec<ItemPickedUpdate>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
}

// ---
// Handlers
// ---

// POST /api/picking/orders
#[utoipa::path(
    post,
    path = "/api/picking/orders",
    tag = "Picking",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Ordem criada em pending", body = IngestionSummary),
        (status = 409, description = "Já existe ordem para esta fatura"),
        (status = 422, description = "Documento sem produtos")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let summary = app_state
        .ingestion_service
        .create_picking_order(
            &app_state.db_pool,
            &payload.invoice_number,
            &payload.client_name,
            &payload.rows,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

// GET /api/picking/orders?status=pending|partial|completed
#[utoipa::path(
    get,
    path = "/api/picking/orders",
    tag = "Picking",
    params(
        ("status" = Option<OrderStatus>, Query, description = "Filtra por status")
    ),
    responses(
        (status = 200, description = "Listagem de ordens (mais recentes primeiro)", body = Vec<OrderSummary>)
    )
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state
        .picking_service
        .list_orders(&app_state.db_pool, query.status)
        .await?;

    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/picking/orders/{id}
#[utoipa::path(
    get,
    path = "/api/picking/orders/{id}",
    tag = "Picking",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Ordem com seus itens", body = OrderDetail),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .picking_service
        .get_order_detail(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// GET /api/picking/orders/{id}/session
#[utoipa::path(
    get,
    path = "/api/picking/orders/{id}/session",
    tag = "Picking",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Cópia de trabalho da sessão, com progresso", body = SessionView),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state
        .picking_service
        .get_session(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(session)))
}

// POST /api/picking/orders/{id}/scan
#[utoipa::path(
    post,
    path = "/api/picking/orders/{id}/scan",
    tag = "Picking",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    request_body = ScanPayload,
    responses(
        (status = 200, description = "Desfecho da leitura (Matched, UnknownCode ou AlreadyFulfilled)", body = ScanResult),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn scan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Código desconhecido e item já completo voltam 200 com o desfecho no
    // corpo: o operador precisa do aviso, a sessão nunca é abortada.
    let result = app_state
        .picking_service
        .scan(&app_state.db_pool, id, &payload.code)
        .await?;

    Ok((StatusCode::OK, Json(result)))
}

// POST /api/picking/orders/{id}/items/{item_id}/adjust
#[utoipa::path(
    post,
    path = "/api/picking/orders/{id}/items/{item_id}/adjust",
    tag = "Picking",
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("item_id" = Uuid, Path, description = "ID do item")
    ),
    request_body = AdjustPayload,
    responses(
        (status = 200, description = "Item após o ajuste (saturado nos limites)"),
        (status = 404, description = "Ordem ou item não encontrado")
    )
)]
pub async fn adjust_item(
    State(app_state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AdjustPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state
        .picking_service
        .adjust(&app_state.db_pool, id, item_id, payload.delta)
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

// POST /api/picking/orders/{id}/finalize
#[utoipa::path(
    post,
    path = "/api/picking/orders/{id}/finalize",
    tag = "Picking",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    request_body = FinalizePayload,
    responses(
        (status = 200, description = "Ordem salva com o status final", body = OrderDetail),
        (status = 404, description = "Ordem não encontrada"),
        (status = 409, description = "Ordem já concluída"),
        (status = 422, description = "Salvamento parcial sem nenhuma unidade separada")
    )
)]
pub async fn finalize_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinalizePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .picking_service
        .finalize(&app_state.db_pool, id, &payload.items, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// GET /api/picking/stats
#[utoipa::path(
    get,
    path = "/api/picking/stats",
    tag = "Picking",
    responses(
        (status = 200, description = "Contadores de ordens e unidades", body = PickingStats)
    )
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state
        .reports_service
        .picking_stats(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(stats)))
}
