//! JSON REST API for the sgpj case-management backend.
//!
//! Exposes an axum [`Router`] backed by any [`sgpj_core::store::SgpjStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = sgpj_api::api_router(store.clone());
//! ```

pub mod error;
pub mod paging;
pub mod pessoa;
pub mod processo;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use sgpj_core::store::SgpjStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SgpjStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Pessoas
    .route("/pessoa", get(pessoa::list::<S>).post(pessoa::create::<S>))
    .route("/pessoa/search", get(pessoa::search::<S>))
    .route("/pessoa/cpf/{cpf_cnpj}", get(pessoa::get_by_cpf_cnpj::<S>))
    .route(
      "/pessoa/{id}",
      get(pessoa::get_one::<S>).put(pessoa::update::<S>),
    )
    // Processos
    .route(
      "/processo",
      get(processo::list::<S>).post(processo::create::<S>),
    )
    .route("/processo/status/{status}", get(processo::by_status::<S>))
    .route("/processo/data-abertura", get(processo::by_data_abertura::<S>))
    .route(
      "/processo/pessoa/id/{pessoa_id}",
      get(processo::by_pessoa_id::<S>),
    )
    .route(
      "/processo/pessoa/cpf-cnpj/{cpf_cnpj}",
      get(processo::by_pessoa_cpf_cnpj::<S>),
    )
    .route(
      "/processo/{id}",
      get(processo::get_one::<S>).put(processo::update::<S>),
    )
    // Business transitions
    .route("/processo/{id}/ativar", put(processo::ativar::<S>))
    .route("/processo/{id}/suspender", put(processo::suspender::<S>))
    .route("/processo/{id}/arquivar", put(processo::arquivar::<S>))
    // Partes envolvidas
    .route(
      "/processo/{id}/partes-envolvidas",
      post(processo::add_parte::<S>),
    )
    .route(
      "/processo/{id}/partes-envolvidas/batch",
      post(processo::add_partes::<S>),
    )
    .route(
      "/processo/{id}/partes-envolvidas/{parte_id}",
      delete(processo::remove_parte::<S>),
    )
    // Ações
    .route("/processo/{id}/acoes", post(processo::add_acao::<S>))
    .route("/processo/{id}/acoes/batch", post(processo::add_acoes::<S>))
    .route(
      "/processo/{id}/acoes/{acao_id}",
      delete(processo::remove_acao::<S>),
    )
    .with_state(store)
}
