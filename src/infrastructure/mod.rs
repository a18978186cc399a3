// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod couch_repository;
pub mod http_response;
pub mod memory_repository;
