use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::storage::{LocalStorage, PlanStore};

pub type DbPool = SqlitePool;

/// Application state handed to every command
pub struct AppState {
  pub db: DbPool,
  pub store: PlanStore,
  pub config: Config,
}

impl AppState {
  pub fn new(db: DbPool, config: Config) -> Self {
    let store = PlanStore::new(LocalStorage::new(db.clone()));
    Self { db, store, config }
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, Box<dyn std::error::Error>> {
  // Create directory if it doesn't exist
  if let Some(parent) = db_path.parent() {
    fs::create_dir_all(parent)?;
  }

  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  tracing::debug!(path = %db_path.display(), "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::debug!("Database initialized successfully");

  Ok(pool)
}
