// Core runtime pieces: logging setup and server assembly.

pub mod logging;
pub mod server;
