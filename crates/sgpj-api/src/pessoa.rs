//! Handlers for `/pessoa` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/pessoa` | 201; 409 on duplicate CPF/CNPJ or invalid field |
//! | `GET`  | `/pessoa/:id` | 404 if not found |
//! | `PUT`  | `/pessoa/:id` | Full replace; uniqueness re-checked on change |
//! | `GET`  | `/pessoa` | Paged; `?page&size&sortBy&sortDirection` |
//! | `GET`  | `/pessoa/search?nome=` | Paged substring search |
//! | `GET`  | `/pessoa/cpf/:cpf_cnpj` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sgpj_core::{
  pessoa::Pessoa,
  store::{Page, SgpjStore},
  vo::CpfCnpj,
};
use uuid::Uuid;

use crate::{error::ApiError, paging::PagingParams};

// ─── DTOs ────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /pessoa` and `PUT /pessoa/:id`.
///
/// Every field is optional at the wire level; absent or malformed values are
/// rejected by the domain with CAMPO_INVALIDO rather than by the extractor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PessoaBody {
  pub nome_completo: Option<String>,
  pub cpf_cnpj:      Option<String>,
  pub email:         Option<String>,
  pub telefone:      Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PessoaResponse {
  pub id:            Uuid,
  pub nome_completo: String,
  pub cpf_cnpj:      String,
  pub email:         String,
  pub telefone:      String,
}

impl From<&Pessoa> for PessoaResponse {
  fn from(pessoa: &Pessoa) -> Self {
    Self {
      id:            pessoa.id,
      nome_completo: pessoa.nome_completo.clone(),
      cpf_cnpj:      pessoa.cpf_cnpj.value().to_owned(),
      email:         pessoa.email.value().to_owned(),
      telefone:      pessoa.telefone.numero().to_owned(),
    }
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /pessoa` — 201 + the stored pessoa.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<PessoaBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let cpf_cnpj = CpfCnpj::new(body.cpf_cnpj.as_deref())?;
  let exists = store
    .exists_pessoa_by_cpf_cnpj(cpf_cnpj.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if exists {
    return Err(
      sgpj_core::Error::PessoaAlreadyExists(cpf_cnpj.value().to_owned())
        .into(),
    );
  }

  let pessoa = Pessoa::create(
    body.nome_completo.as_deref(),
    body.cpf_cnpj.as_deref(),
    body.email.as_deref(),
    body.telefone.as_deref(),
  )?;
  let saved = store
    .save_pessoa(pessoa)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(PessoaResponse::from(&saved))))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /pessoa/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PessoaResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let pessoa = load_pessoa(store.as_ref(), id).await?;
  Ok(Json(PessoaResponse::from(&pessoa)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /pessoa/:id` — replaces all four fields.
///
/// The uniqueness pre-check is skipped when the CPF/CNPJ is unchanged.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PessoaBody>,
) -> Result<Json<PessoaResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut pessoa = load_pessoa(store.as_ref(), id).await?;

  let cpf_cnpj = CpfCnpj::new(body.cpf_cnpj.as_deref())?;
  if cpf_cnpj != pessoa.cpf_cnpj {
    let exists = store
      .exists_pessoa_by_cpf_cnpj(cpf_cnpj.clone())
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    if exists {
      return Err(
        sgpj_core::Error::PessoaAlreadyExists(cpf_cnpj.value().to_owned())
          .into(),
      );
    }
  }

  pessoa.update(
    body.nome_completo.as_deref(),
    body.cpf_cnpj.as_deref(),
    body.email.as_deref(),
    body.telefone.as_deref(),
  )?;
  let saved = store
    .save_pessoa(pessoa)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(PessoaResponse::from(&saved)))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /pessoa[?page&size&sortBy&sortDirection]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PagingParams>,
) -> Result<Json<Page<PessoaResponse>>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = store
    .list_pessoas(params.into())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(page.map(|p| PessoaResponse::from(&p))))
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub nome: String,
}

/// `GET /pessoa/search?nome=<termo>[&page&size]`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
  Query(paging): Query<PagingParams>,
) -> Result<Json<Page<PessoaResponse>>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = store
    .search_pessoas_by_nome(&params.nome, paging.into())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(page.map(|p| PessoaResponse::from(&p))))
}

// ─── Get by CPF/CNPJ ─────────────────────────────────────────────────────────

/// `GET /pessoa/cpf/:cpf_cnpj` — accepts formatted or bare digits.
pub async fn get_by_cpf_cnpj<S>(
  State(store): State<Arc<S>>,
  Path(cpf_cnpj): Path<String>,
) -> Result<Json<PessoaResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let parsed = CpfCnpj::new(Some(&cpf_cnpj))?;
  let pessoa = store
    .find_pessoa_by_cpf_cnpj(parsed)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::from(sgpj_core::Error::PessoaNotFoundByCpfCnpj(cpf_cnpj))
    })?;
  Ok(Json(PessoaResponse::from(&pessoa)))
}

// ─── Shared ──────────────────────────────────────────────────────────────────

pub(crate) async fn load_pessoa<S>(store: &S, id: Uuid) -> Result<Pessoa, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_pessoa(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::from(sgpj_core::Error::PessoaNotFound(id)))
}
