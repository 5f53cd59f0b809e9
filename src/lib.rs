pub mod commands;
pub mod config;
pub mod db;
pub mod edits;
pub mod error;
pub mod llm;
pub mod models;
pub mod session;
pub mod storage;

#[cfg(test)]
mod test_utils;

pub use db::AppState;
pub use error::AppError;
