pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod picking_repo;
pub use picking_repo::PickingRepository;
pub mod reports_repo;
pub use reports_repo::ReportsRepository;
