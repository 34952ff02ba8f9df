pub mod auth_service;
pub mod edit_service;
pub mod export_service;
pub mod query_service;
