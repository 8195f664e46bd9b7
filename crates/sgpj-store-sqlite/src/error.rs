//! Error type for `sgpj-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] sgpj_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("unknown discriminant: {0:?}")]
  UnknownDiscriminant(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
