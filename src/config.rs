// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CatalogRepository, PickingRepository, ReportsRepository},
    services::{CatalogService, IngestionService, PickingService, ReportsService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub catalog_service: CatalogService,
    pub ingestion_service: IngestionService,
    pub picking_service: PickingService,
    pub reports_service: ReportsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Uma única pool por processo, criada aqui e injetada em tudo.
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let picking_repo = PickingRepository::new(db_pool.clone());
        let reports_repo = ReportsRepository::new(db_pool.clone());

        let catalog_service = CatalogService::new(catalog_repo.clone());
        let ingestion_service = IngestionService::new(catalog_repo, picking_repo.clone());
        let picking_service = PickingService::new(picking_repo);
        let reports_service = ReportsService::new(reports_repo);

        Ok(Self {
            db_pool,
            catalog_service,
            ingestion_service,
            picking_service,
            reports_service,
        })
    }
}
