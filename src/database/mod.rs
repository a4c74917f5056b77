pub mod database_service;
pub mod triage_repository;

pub use database_service::DatabaseService;
pub use triage_repository::{TriageRecord, TriageSummary};
