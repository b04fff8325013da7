//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Catálogo de produtos
    let product_routes = Router::new()
        .route("/", get(handlers::catalog::list_products))
        .route("/bulk", post(handlers::catalog::upload_products))
        .route(
            "/{id}",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        );

    // Ordens de picking: ingestão, sessão de separação e salvamento
    let picking_routes = Router::new()
        .route(
            "/orders",
            post(handlers::picking::create_order).get(handlers::picking::list_orders),
        )
        .route("/orders/{id}", get(handlers::picking::get_order))
        .route("/orders/{id}/session", get(handlers::picking::get_session))
        .route("/orders/{id}/scan", post(handlers::picking::scan))
        .route(
            "/orders/{id}/items/{item_id}/adjust",
            post(handlers::picking::adjust_item),
        )
        .route(
            "/orders/{id}/finalize",
            post(handlers::picking::finalize_order),
        )
        .route("/stats", get(handlers::picking::get_stats));

    // Relatórios (somente leitura)
    let report_routes = Router::new()
        .route("/missing-items", get(handlers::reports::missing_items))
        .route("/performance", get(handlers::reports::performance))
        .route(
            "/performance/chart",
            get(handlers::reports::performance_chart),
        )
        .route("/clients", get(handlers::reports::list_clients));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/products", product_routes)
        .nest("/api/picking", picking_routes)
        .nest("/api/reports", report_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
