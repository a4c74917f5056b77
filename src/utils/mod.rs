// Shared utilities: error handling, response formatting, JSON helpers.

pub mod error_handler;
pub mod json;
pub mod response_handler;
