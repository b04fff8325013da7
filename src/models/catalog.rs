// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Produto (catálogo) ---
// O código RUUFE é a chave de negócio; o barcode é opcional e, quando
// ausente, o próprio código serve de barcode na leitura.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[serde(rename = "codigoRUUFE")]
    #[schema(example = "A2")]
    pub codigo_ruufe: String,
    #[schema(example = "7861234567890")]
    pub barcode: Option<String>,
    #[schema(example = "KERATINA ORGANICA 250ML R-BOTANICO")]
    pub producto: String,
    #[schema(example = "RITUAL-BOTANICO")]
    pub marca: String,
    #[serde(rename = "precioCOP")]
    #[schema(example = "45000")]
    pub precio_cop: Decimal,
    #[schema(example = "12.5")]
    pub usd_cost: Decimal,
    #[schema(example = "25.0")]
    pub rrp: Decimal,
    #[serde(rename = "pesoGR")]
    #[schema(example = 280)]
    pub peso_gr: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Entrada de produto (upsert em lote e edição) ---
// Campos em branco / zerados não sobrescrevem valores existentes no upsert.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(rename = "codigoRUUFE")]
    #[validate(length(min = 1, message = "O código RUUFE é obrigatório."))]
    pub codigo_ruufe: String,

    #[serde(default)]
    pub barcode: String,

    #[serde(default)]
    pub producto: String,

    #[serde(default)]
    pub marca: String,

    #[serde(default, rename = "precioCOP")]
    pub precio_cop: Decimal,

    #[serde(default)]
    pub usd_cost: Decimal,

    #[serde(default)]
    pub rrp: Decimal,

    #[serde(default, rename = "pesoGR")]
    pub peso_gr: i32,
}

// Resultado de uma carga em lote de produtos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    #[schema(example = 120)]
    pub count: i64,
    #[schema(example = 35)]
    pub created: i64,
    #[schema(example = 85)]
    pub updated: i64,
}
