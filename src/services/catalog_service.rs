// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{Product, ProductInput, UploadSummary},
};

/// Regra de mesclagem do upsert: campo em branco / zerado na entrada não
/// sobrescreve o valor existente. O código RUUFE nunca muda por upsert.
fn merge_product(existing: &Product, incoming: &ProductInput) -> ProductInput {
    ProductInput {
        codigo_ruufe: existing.codigo_ruufe.clone(),
        barcode: prefer_text(&incoming.barcode, existing.barcode.as_deref().unwrap_or("")),
        producto: prefer_text(&incoming.producto, &existing.producto),
        marca: prefer_text(&incoming.marca, &existing.marca),
        precio_cop: prefer_number(incoming.precio_cop, existing.precio_cop),
        usd_cost: prefer_number(incoming.usd_cost, existing.usd_cost),
        rrp: prefer_number(incoming.rrp, existing.rrp),
        peso_gr: if incoming.peso_gr != 0 {
            incoming.peso_gr
        } else {
            existing.peso_gr
        },
    }
}

fn prefer_text(incoming: &str, existing: &str) -> String {
    if incoming.trim().is_empty() {
        existing.to_string()
    } else {
        incoming.to_string()
    }
}

fn prefer_number(incoming: Decimal, existing: Decimal) -> Decimal {
    if incoming.is_zero() {
        existing
    } else {
        incoming
    }
}

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository) -> Self {
        Self { catalog_repo }
    }

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo.get_all_products(executor).await
    }

    pub async fn get_product<'e, E>(&self, executor: E, id: Uuid) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo
            .get_product_by_id(executor, id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &ProductInput,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo.update_product(executor, id, input).await
    }

    /// Exclusão bloqueada enquanto alguma ordem referenciar o produto.
    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if self.catalog_repo.has_item_references(&mut *tx, id).await? {
            return Err(AppError::ProductInUse);
        }

        self.catalog_repo.delete_product(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Carga em lote do catálogo: cria os códigos novos e mescla os
    /// existentes, tudo em uma única transação.
    pub async fn bulk_upsert<'e, E>(
        &self,
        executor: E,
        entries: &[ProductInput],
    ) -> Result<UploadSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut created: i64 = 0;
        let mut updated: i64 = 0;

        for entry in entries {
            match self
                .catalog_repo
                .get_product_by_code(&mut *tx, &entry.codigo_ruufe)
                .await?
            {
                Some(existing) => {
                    let merged = merge_product(&existing, entry);
                    self.catalog_repo
                        .update_product(&mut *tx, existing.id, &merged)
                        .await?;
                    updated += 1;
                }
                None => {
                    self.catalog_repo.create_product(&mut *tx, entry).await?;
                    created += 1;
                }
            }
        }

        tx.commit().await?;

        tracing::info!(
            "Catálogo atualizado: {} produtos criados, {} atualizados",
            created,
            updated
        );

        Ok(UploadSummary {
            count: entries.len() as i64,
            created,
            updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn existing_product() -> Product {
        Product {
            id: Uuid::new_v4(),
            codigo_ruufe: "A2".to_string(),
            barcode: Some("7861234567890".to_string()),
            producto: "KERATINA ORGANICA 250ML".to_string(),
            marca: "RITUAL-BOTANICO".to_string(),
            precio_cop: Decimal::from(45000),
            usd_cost: Decimal::new(125, 1),
            rrp: Decimal::from(25),
            peso_gr: 280,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn empty_input(codigo: &str) -> ProductInput {
        ProductInput {
            codigo_ruufe: codigo.to_string(),
            barcode: String::new(),
            producto: String::new(),
            marca: String::new(),
            precio_cop: Decimal::ZERO,
            usd_cost: Decimal::ZERO,
            rrp: Decimal::ZERO,
            peso_gr: 0,
        }
    }

    #[test]
    fn merge_prefere_valor_novo_quando_preenchido() {
        let existing = existing_product();
        let mut incoming = empty_input("A2");
        incoming.producto = "KERATINA ORGANICA 250ML R-BOTANICO".to_string();
        incoming.precio_cop = Decimal::from(48000);

        let merged = merge_product(&existing, &incoming);
        assert_eq!(merged.producto, "KERATINA ORGANICA 250ML R-BOTANICO");
        assert_eq!(merged.precio_cop, Decimal::from(48000));
        // O resto fica como estava.
        assert_eq!(merged.marca, "RITUAL-BOTANICO");
        assert_eq!(merged.barcode, "7861234567890");
        assert_eq!(merged.peso_gr, 280);
    }

    #[test]
    fn merge_nao_sobrescreve_com_campos_vazios() {
        let existing = existing_product();
        let incoming = empty_input("A2");

        let merged = merge_product(&existing, &incoming);
        assert_eq!(merged.producto, existing.producto);
        assert_eq!(merged.marca, existing.marca);
        assert_eq!(merged.precio_cop, existing.precio_cop);
        assert_eq!(merged.usd_cost, existing.usd_cost);
        assert_eq!(merged.rrp, existing.rrp);
        assert_eq!(merged.peso_gr, existing.peso_gr);
    }

    #[test]
    fn merge_nunca_troca_o_codigo() {
        let existing = existing_product();
        let mut incoming = empty_input("OUTRO");
        incoming.marca = "NOVA MARCA".to_string();

        let merged = merge_product(&existing, &incoming);
        assert_eq!(merged.codigo_ruufe, "A2");
        assert_eq!(merged.marca, "NOVA MARCA");
    }
}
