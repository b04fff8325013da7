// src/db/picking_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::picking::{OrderStatus, OrderSummary, PickingItem, PickingItemView, PickingOrder},
};

#[derive(Clone)]
pub struct PickingRepository {
    pool: PgPool,
}

impl PickingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    pub async fn get_order<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<PickingOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order =
            sqlx::query_as::<_, PickingOrder>("SELECT * FROM picking_orders WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(order)
    }

    pub async fn find_order_by_invoice<'e, E>(
        &self,
        executor: E,
        invoice_number: &str,
    ) -> Result<Option<PickingOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PickingOrder>(
            "SELECT * FROM picking_orders WHERE invoice_number = $1",
        )
        .bind(invoice_number)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    /// Itens da ordem já com os dados do produto que o operador vê.
    /// O barcode vem com o fallback para o código RUUFE.
    pub async fn get_order_items<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<PickingItemView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, PickingItemView>(
            r#"
            SELECT i.id,
                   p.codigo_ruufe AS code,
                   p.marca AS brand,
                   p.producto AS product,
                   COALESCE(NULLIF(p.barcode, ''), p.codigo_ruufe) AS barcode,
                   i.quantity,
                   i.picked
            FROM picking_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.order_id = $1
            ORDER BY i.created_at ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id,
                   o.invoice_number,
                   o.client_name,
                   o.status,
                   o.created_at,
                   o.completed_at,
                   CAST(COUNT(i.id) AS BIGINT) AS item_count
            FROM picking_orders o
            LEFT JOIN picking_items i ON i.order_id = o.id
            WHERE ($1::order_status IS NULL OR o.status = $1)
            GROUP BY o.id
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(executor)
        .await?;
        Ok(orders)
    }

    pub async fn count_items<'e, E>(&self, executor: E, order_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM picking_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---
    // Estas usam o padrão genérico 'Executor' para rodar dentro de uma transação.

    /// Cria a ordem em 'pending'. A constraint única da fatura é a segunda
    /// barreira contra duplicatas, depois do pré-check do service.
    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        invoice_number: &str,
        client_name: &str,
    ) -> Result<PickingOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PickingOrder>(
            r#"
            INSERT INTO picking_orders (invoice_number, client_name, status)
            VALUES ($1, $2, 'pending')
            RETURNING *
            "#,
        )
        .bind(invoice_number)
        .bind(client_name)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateOrder(invoice_number.to_string());
                }
            }
            e.into()
        })
    }

    /// Cria um item da ordem com picked = 0.
    pub async fn create_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<PickingItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, PickingItem>(
            r#"
            INSERT INTO picking_items (order_id, product_id, quantity, picked)
            VALUES ($1, $2, $3, 0)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    /// Grava o valor final de 'picked' de um item. O filtro por order_id
    /// impede que um salvamento toque itens de outra ordem.
    pub async fn update_item_picked<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        item_id: Uuid,
        picked: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE picking_items SET picked = $1 WHERE id = $2 AND order_id = $3",
        )
        .bind(picked)
        .bind(item_id)
        .bind(order_id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }

    pub async fn update_order_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: OrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<PickingOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PickingOrder>(
            r#"
            UPDATE picking_orders
            SET status = $2, completed_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(completed_at)
        .fetch_optional(executor)
        .await?;

        order.ok_or(AppError::OrderNotFound)
    }
}
