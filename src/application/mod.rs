// Application layer - Use cases and the storage seam
pub mod cache;
pub mod clock;
pub mod customer_repository;
pub mod customer_service;
pub mod dashboard_service;
pub mod maintenance_service;
