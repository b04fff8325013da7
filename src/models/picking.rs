// src/models/picking.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum OrderStatus {
    Pending,
    Partial,
    Completed,
}

// Estados finais que o operador pode gravar. 'pending' nunca é alvo de um
// salvamento, por isso não aparece aqui.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FinalizeStatus {
    Partial,
    Completed,
}

// --- Structs de domínio ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickingOrder {
    pub id: Uuid,
    #[schema(example = "RUM202505090921")]
    pub invoice_number: String,
    #[schema(example = "Cliente de Ejemplo")]
    pub client_name: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    // Preenchido se e somente se status = completed.
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickingItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = 0)]
    pub picked: i32,
    pub created_at: DateTime<Utc>,
}

// Visão de item usada na sessão de picking: junta os dados do produto que o
// operador precisa ver. O barcode aqui já vem com o fallback para o código.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickingItemView {
    pub id: Uuid,
    #[schema(example = "A2")]
    pub code: String,
    #[schema(example = "RITUAL-BOTANICO")]
    pub brand: String,
    #[schema(example = "KERATINA ORGANICA 250ML R-BOTANICO")]
    pub product: String,
    #[schema(example = "7861234567890")]
    pub barcode: String,
    pub quantity: i32,
    pub picked: i32,
}

// Linha da listagem de ordens (com contagem de itens, sem os itens).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[schema(example = 12)]
    pub item_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: PickingOrder,
    pub items: Vec<PickingItemView>,
}

// --- Ingestão de documento ---

// Uma linha da tabela do documento de cobrança. A quantidade chega como
// texto do documento; valores ilegíveis viram 0 na ingestão.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    #[validate(length(min = 1, message = "O código do produto é obrigatório."))]
    #[schema(example = "A2")]
    pub code: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    #[schema(example = "2")]
    pub quantity: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    pub order_id: Uuid,
    #[schema(example = 12)]
    pub item_count: i64,
}

// --- Sessão de picking (cópia de trabalho) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ScanOutcome {
    Matched,
    UnknownCode,
    AlreadyFulfilled,
}

// Resultado de uma leitura de código. Leituras que não casam ou que já
// estão completas são avisos para o operador, nunca erros HTTP.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub outcome: ScanOutcome,
    pub matched_item_id: Option<Uuid>,
    pub new_picked_count: Option<i32>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub order_id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub status: OrderStatus,
    pub items: Vec<PickingItemView>,
    #[schema(example = 10)]
    pub total_items: i32,
    #[schema(example = 4)]
    pub picked_items: i32,
    #[schema(example = 40)]
    pub progress: i32,
}

// Valor final de 'picked' de um item, enviado no salvamento.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPickedUpdate {
    pub id: Uuid,
    #[validate(range(min = 0, message = "A quantidade separada não pode ser negativa."))]
    pub picked: i32,
}
