// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Catálogo ---
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,
        handlers::catalog::upload_products,

        // --- Picking ---
        handlers::picking::create_order,
        handlers::picking::list_orders,
        handlers::picking::get_order,
        handlers::picking::get_session,
        handlers::picking::scan,
        handlers::picking::adjust_item,
        handlers::picking::finalize_order,
        handlers::picking::get_stats,

        // --- Relatórios ---
        handlers::reports::missing_items,
        handlers::reports::performance,
        handlers::reports::performance_chart,
        handlers::reports::list_clients,
    ),
    components(
        schemas(
            models::catalog::Product,
            models::catalog::ProductInput,
            models::catalog::UploadSummary,
            models::picking::OrderStatus,
            models::picking::FinalizeStatus,
            models::picking::PickingOrder,
            models::picking::PickingItem,
            models::picking::PickingItemView,
            models::picking::OrderSummary,
            models::picking::OrderDetail,
            models::picking::DocumentRow,
            models::picking::IngestionSummary,
            models::picking::ScanOutcome,
            models::picking::ScanResult,
            models::picking::SessionView,
            models::picking::ItemPickedUpdate,
            models::reports::PickingStats,
            models::reports::MissingOrderRef,
            models::reports::MissingItem,
            models::reports::PartialOrderProgress,
            models::reports::MissingStats,
            models::reports::MissingItemsReport,
            models::reports::PerformanceEntry,
            models::reports::ChartEntry,
            handlers::catalog::UploadProductsPayload,
            handlers::picking::CreateOrderPayload,
            handlers::picking::ScanPayload,
            handlers::picking::AdjustPayload,
            handlers::picking::FinalizePayload,
        )
    ),
    tags(
        (name = "Catálogo", description = "CRUD de produtos e carga em lote"),
        (name = "Picking", description = "Ingestão de faturas, sessão de separação e salvamento"),
        (name = "Relatórios", description = "Faltantes, rendimento e contadores")
    ),
    info(
        title = "Picking Backend",
        description = "Backend de separação de pedidos: ingestão de faturas, sessão de picking com leitura de códigos e relatórios de faltantes/rendimento.",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
