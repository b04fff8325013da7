// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Product, ProductInput},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    pub async fn get_all_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products ORDER BY marca ASC, producto ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn get_product_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn get_product_by_code<'e, E>(
        &self,
        executor: E,
        codigo_ruufe: &str,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE codigo_ruufe = $1")
                .bind(codigo_ruufe)
                .fetch_optional(executor)
                .await?;
        Ok(product)
    }

    /// Verifica se algum item de picking referencia o produto.
    pub async fn has_item_references<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM picking_items WHERE product_id = $1)",
        )
        .bind(product_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    // ---
    // Funções de "Escrita"
    // ---

    /// Cria um produto. Barcode em branco vira NULL no banco; a leitura usa
    /// o código como fallback.
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        input: &ProductInput,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (codigo_ruufe, barcode, producto, marca, precio_cop, usd_cost, rrp, peso_gr)
            VALUES ($1, NULLIF($2, ''), $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&input.codigo_ruufe)
        .bind(&input.barcode)
        .bind(&input.producto)
        .bind(&input.marca)
        .bind(input.precio_cop)
        .bind(input.usd_cost)
        .bind(input.rrp)
        .bind(input.peso_gr)
        .fetch_one(executor)
        .await?;

        Ok(product)
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
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET codigo_ruufe = $2,
                barcode = NULLIF($3, ''),
                producto = $4,
                marca = $5,
                precio_cop = $6,
                usd_cost = $7,
                rrp = $8,
                peso_gr = $9,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.codigo_ruufe)
        .bind(&input.barcode)
        .bind(&input.producto)
        .bind(&input.marca)
        .bind(input.precio_cop)
        .bind(input.usd_cost)
        .bind(input.rrp)
        .bind(input.peso_gr)
        .fetch_optional(executor)
        .await?;

        product.ok_or(AppError::ProductNotFound)
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }
}
