// src/services/ingestion_service.rs
//
// Transforma as linhas extraídas do documento de cobrança em uma ordem de
// picking com seus itens. A extração do documento em si (HTML, planilha)
// acontece fora daqui; o service recebe linhas já estruturadas.

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{CatalogRepository, PickingRepository},
    models::{
        catalog::ProductInput,
        picking::{DocumentRow, IngestionSummary},
    },
};

/// A quantidade chega como texto do documento. Valor ilegível (ou negativo,
/// que violaria o modelo) vira 0 em vez de rejeitar a linha.
pub fn parse_quantity(raw: &str) -> i32 {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|quantity| *quantity >= 0)
        .unwrap_or(0)
}

#[derive(Clone)]
pub struct IngestionService {
    catalog_repo: CatalogRepository,
    picking_repo: PickingRepository,
}

impl IngestionService {
    pub fn new(catalog_repo: CatalogRepository, picking_repo: PickingRepository) -> Self {
        Self {
            catalog_repo,
            picking_repo,
        }
    }

    /// Cria a ordem em 'pending' com um item por linha, tudo em uma única
    /// transação. Idempotente por número de fatura: duplicata é rejeitada,
    /// nunca mesclada.
    pub async fn create_picking_order<'e, E>(
        &self,
        executor: E,
        invoice_number: &str,
        client_name: &str,
        rows: &[DocumentRow],
    ) -> Result<IngestionSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if rows.is_empty() {
            return Err(AppError::EmptyDocument);
        }

        let mut tx = executor.begin().await?;

        if self
            .picking_repo
            .find_order_by_invoice(&mut *tx, invoice_number)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateOrder(invoice_number.to_string()));
        }

        let order = self
            .picking_repo
            .create_order(&mut *tx, invoice_number, client_name)
            .await?;

        for row in rows {
            // Código fora do catálogo não bloqueia a ordem: criamos um
            // produto básico com os dados da linha e preços zerados.
            let product = match self
                .catalog_repo
                .get_product_by_code(&mut *tx, &row.code)
                .await?
            {
                Some(product) => product,
                None => {
                    self.catalog_repo
                        .create_product(&mut *tx, &placeholder_product(row))
                        .await?
                }
            };

            self.picking_repo
                .create_item(&mut *tx, order.id, product.id, parse_quantity(&row.quantity))
                .await?;
        }

        let item_count = self.picking_repo.count_items(&mut *tx, order.id).await?;

        tx.commit().await?;

        tracing::info!(
            "Ordem de picking criada para a fatura {} ({} itens)",
            invoice_number,
            item_count
        );

        Ok(IngestionSummary {
            order_id: order.id,
            item_count,
        })
    }
}

fn placeholder_product(row: &DocumentRow) -> ProductInput {
    ProductInput {
        codigo_ruufe: row.code.clone(),
        barcode: String::new(),
        producto: row.product.clone(),
        marca: row.brand.clone(),
        precio_cop: Default::default(),
        usd_cost: Default::default(),
        rrp: Default::default(),
        peso_gr: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quantity_aceita_numeros_com_espacos() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 12 "), 12);
        assert_eq!(parse_quantity("0"), 0);
    }

    #[test]
    fn parse_quantity_ilegivel_vira_zero() {
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("2,5"), 0);
    }

    #[test]
    fn parse_quantity_negativa_vira_zero() {
        assert_eq!(parse_quantity("-4"), 0);
    }

    #[test]
    fn placeholder_zera_precos_e_peso() {
        let row = DocumentRow {
            code: "A9".to_string(),
            brand: "MARCA".to_string(),
            product: "PRODUTO NOVO".to_string(),
            quantity: "2".to_string(),
        };

        let input = placeholder_product(&row);
        assert_eq!(input.codigo_ruufe, "A9");
        assert_eq!(input.producto, "PRODUTO NOVO");
        assert_eq!(input.marca, "MARCA");
        assert!(input.barcode.is_empty());
        assert_eq!(input.peso_gr, 0);
        assert!(input.precio_cop.is_zero());
        assert!(input.usd_cost.is_zero());
        assert!(input.rrp.is_zero());
    }
}
