// src/db/reports_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::reports::{MissingItemRow, PartialOrderRow, PerformanceRow, PickingStats},
};

#[derive(Clone)]
pub struct ReportsRepository {
    pool: PgPool,
}

impl ReportsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Contadores gerais do painel. Roda dentro de uma transação para ter
    /// um snapshot consistente dos quatro números.
    pub async fn get_stats<'e, E>(&self, executor: E) -> Result<PickingStats, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let pending_orders = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM picking_orders WHERE status = 'pending'",
        )
        .fetch_one(&mut *tx)
        .await?;

        let partial_orders = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM picking_orders WHERE status = 'partial'",
        )
        .fetch_one(&mut *tx)
        .await?;

        let completed_orders = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM picking_orders WHERE status = 'completed'",
        )
        .fetch_one(&mut *tx)
        .await?;

        let total_products = sqlx::query_scalar::<_, i64>(
            "SELECT CAST(COALESCE(SUM(quantity), 0) AS BIGINT) FROM picking_items",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PickingStats {
            pending_orders,
            partial_orders,
            completed_orders,
            total_products,
        })
    }

    /// Itens em falta: linhas cruas das ordens parciais com picked < quantity.
    /// A agregação por produto fica no service.
    pub async fn missing_item_rows<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<MissingItemRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MissingItemRow>(
            r#"
            SELECT o.id AS order_id,
                   o.invoice_number,
                   o.client_name,
                   p.id AS product_id,
                   p.codigo_ruufe AS code,
                   p.producto AS product,
                   p.marca AS brand,
                   COALESCE(NULLIF(p.barcode, ''), p.codigo_ruufe) AS barcode,
                   p.precio_cop AS price,
                   i.quantity,
                   i.picked
            FROM picking_orders o
            JOIN picking_items i ON i.order_id = o.id
            JOIN products p ON p.id = i.product_id
            WHERE o.status = 'partial'
              AND i.picked < i.quantity
            ORDER BY o.created_at ASC, i.created_at ASC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Totais por ordem parcial (todos os itens, para calcular o progresso).
    pub async fn partial_order_rows<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<PartialOrderRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, PartialOrderRow>(
            r#"
            SELECT o.id,
                   o.invoice_number,
                   o.client_name,
                   o.created_at,
                   CAST(COALESCE(SUM(i.quantity), 0) AS BIGINT) AS total_items,
                   CAST(COALESCE(SUM(i.picked), 0) AS BIGINT) AS picked_items
            FROM picking_orders o
            LEFT JOIN picking_items i ON i.order_id = o.id
            WHERE o.status = 'partial'
            GROUP BY o.id
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Ordens concluídas com totais por ordem, com filtros opcionais de
    /// período (sobre completed_at) e de cliente.
    pub async fn performance_rows<'e, E>(
        &self,
        executor: E,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        client_name: Option<&str>,
    ) -> Result<Vec<PerformanceRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, PerformanceRow>(
            r#"
            SELECT o.id,
                   o.invoice_number,
                   o.client_name,
                   o.status,
                   o.created_at,
                   o.completed_at,
                   CAST(COALESCE(SUM(i.quantity), 0) AS BIGINT) AS items_count,
                   CAST(COALESCE(SUM(i.picked), 0) AS BIGINT) AS picked_items
            FROM picking_orders o
            LEFT JOIN picking_items i ON i.order_id = o.id
            WHERE o.status = 'completed'
              AND o.completed_at IS NOT NULL
              AND ($1::timestamptz IS NULL OR o.completed_at >= $1)
              AND ($2::timestamptz IS NULL OR o.completed_at <= $2)
              AND ($3::text IS NULL OR o.client_name = $3)
            GROUP BY o.id
            ORDER BY o.completed_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(client_name)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn distinct_clients<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let clients = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT client_name FROM picking_orders ORDER BY client_name ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(clients)
    }
}
