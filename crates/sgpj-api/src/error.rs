//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Error bodies are `{code, message, timestamp}`. Note the status mapping:
//! invalid fields surface as 409 CONFLICT, not 400, and state-transition
//! failures as 400 BAD_REQUEST.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  PessoaNotFound(String),

  #[error("{0}")]
  ProcessoNotFound(String),

  #[error("{0}")]
  PessoaAlreadyExists(String),

  #[error("{0}")]
  ProcessoAlreadyExists(String),

  #[error("{0}")]
  InvalidField(String),

  #[error("{0}")]
  InvalidStateTransition(String),

  #[error("{0}")]
  CannotBeArchived(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// The machine-readable code exposed in the error body.
  fn code(&self) -> &'static str {
    match self {
      Self::PessoaNotFound(_) => "PESSOA_NOT_FOUND",
      Self::ProcessoNotFound(_) => "PROCESSO_NOT_FOUND",
      Self::PessoaAlreadyExists(_) => "PESSOA_ALREADY_EXISTS",
      Self::ProcessoAlreadyExists(_) => "PROCESSO_ALREADY_EXISTS",
      Self::InvalidField(_) => "CAMPO_INVALIDO",
      Self::InvalidStateTransition(_) => "PROCESSO_INVALID_STATE_TRANSITION",
      Self::CannotBeArchived(_) => "PROCESSO_CANNOT_BE_ARCHIVED",
      Self::Store(_) => "INTERNAL_ERROR",
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::PessoaNotFound(_) | Self::ProcessoNotFound(_) => {
        StatusCode::NOT_FOUND
      }
      Self::PessoaAlreadyExists(_)
      | Self::ProcessoAlreadyExists(_)
      | Self::InvalidField(_) => StatusCode::CONFLICT,
      Self::InvalidStateTransition(_) | Self::CannotBeArchived(_) => {
        StatusCode::BAD_REQUEST
      }
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<sgpj_core::Error> for ApiError {
  fn from(e: sgpj_core::Error) -> Self {
    use sgpj_core::Error as E;

    let message = e.to_string();
    match e {
      E::PessoaNotFound(_) | E::PessoaNotFoundByCpfCnpj(_) => {
        Self::PessoaNotFound(message)
      }
      E::ProcessoNotFound(_) => Self::ProcessoNotFound(message),
      E::PessoaAlreadyExists(_) => Self::PessoaAlreadyExists(message),
      E::ProcessoAlreadyExists(_) => Self::ProcessoAlreadyExists(message),
      E::InvalidField(_) => Self::InvalidField(message),
      E::InvalidTransition(_) => Self::InvalidStateTransition(message),
      E::CannotArchive => Self::CannotBeArchived(message),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = json!({
      "code": self.code(),
      "message": self.to_string(),
      "timestamp": Utc::now(),
    });
    (status, Json(body)).into_response()
  }
}
