// Library root for the triage gateway: a thin HTTP front for four
// hosted medical inference services plus a MySQL triage record store.

pub mod api;
pub mod backends;
pub mod config;
pub mod core;
pub mod database;
pub mod utils;

pub use crate::backends::Backends;
pub use crate::config::environment::EnvironmentVariables;
pub use crate::config::state::AppState;
pub use crate::database::DatabaseService;
