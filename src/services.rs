pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod ingestion_service;
pub use ingestion_service::IngestionService;
pub mod picking_service;
pub use picking_service::PickingService;
pub mod reports_service;
pub use reports_service::ReportsService;
