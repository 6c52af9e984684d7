pub mod analyze;
pub mod chat;
pub mod config;
pub mod errors;
pub mod prompt;
pub mod response;
pub mod runner;
pub mod util;
