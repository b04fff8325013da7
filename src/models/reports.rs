// src/models/reports.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::picking::OrderStatus;

// --- Contadores gerais ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickingStats {
    #[schema(example = 3)]
    pub pending_orders: i64,
    #[schema(example = 2)]
    pub partial_orders: i64,
    #[schema(example = 15)]
    pub completed_orders: i64,
    // Total de unidades pedidas em todas as ordens.
    #[schema(example = 412)]
    pub total_products: i64,
}

// --- Faltantes ---

// Linha crua: um item de ordem parcial com picked < quantity, já com os
// dados do produto. A agregação por produto acontece no service.
#[derive(Debug, Clone, FromRow)]
pub struct MissingItemRow {
    pub order_id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub product_id: Uuid,
    pub code: String,
    pub product: String,
    pub brand: String,
    pub barcode: String,
    pub price: Decimal,
    pub quantity: i32,
    pub picked: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissingOrderRef {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
}

// Faltante agregado por produto sobre todas as ordens parciais.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissingItem {
    pub id: Uuid,
    pub code: String,
    pub product: String,
    pub brand: String,
    pub barcode: String,
    #[schema(example = 6)]
    pub quantity: i64,
    #[schema(example = "45000")]
    pub price: Decimal,
    pub orders: Vec<MissingOrderRef>,
}

// Totais por ordem parcial (inclui itens já completos, para o progresso).
#[derive(Debug, Clone, FromRow)]
pub struct PartialOrderRow {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub total_items: i64,
    pub picked_items: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartialOrderProgress {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    #[schema(example = 3)]
    pub missing_items: i64,
    #[schema(example = 10)]
    pub total_items: i64,
    #[schema(example = 70)]
    pub progress: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissingStats {
    pub total_missing_items: i64,
    pub total_partial_orders: i64,
    #[schema(example = "600000")]
    pub estimated_value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissingItemsReport {
    pub missing_items: Vec<MissingItem>,
    pub partial_orders: Vec<PartialOrderProgress>,
    pub stats: MissingStats,
}

// --- Rendimento ---

#[derive(Debug, Clone, FromRow)]
pub struct PerformanceRow {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub items_count: i64,
    pub picked_items: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    // Duração em minutos, arredondada.
    #[schema(example = 18)]
    pub duration: i64,
    #[schema(example = 42)]
    pub items_count: i64,
    #[schema(example = 42)]
    pub picked_items: i64,
    // Unidades separadas por minuto; 0 quando a duração é 0.
    #[schema(example = 2.33)]
    pub items_per_minute: f64,
}

// Ponto do gráfico de rendimento, agrupado por dia (DD/MM).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChartEntry {
    #[schema(example = "09/05")]
    pub fecha: String,
    #[serde(rename = "tiempoPromedio")]
    #[schema(example = 22)]
    pub tiempo_promedio: i64,
    #[serde(rename = "ordenesCompletadas")]
    #[schema(example = 4)]
    pub ordenes_completadas: i64,
}
