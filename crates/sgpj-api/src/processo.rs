//! Handlers for `/processo` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/processo` | 201; 409 on duplicate numero |
//! | `GET`    | `/processo/:id` | 404 if not found |
//! | `PUT`    | `/processo/:id` | Partial update; status untouched |
//! | `GET`    | `/processo` | Paged |
//! | `GET`    | `/processo/status/:status` | Paged, filtered |
//! | `GET`    | `/processo/data-abertura?dataInicial&dataFinal` | Paged, inclusive range |
//! | `GET`    | `/processo/pessoa/id/:pessoa_id` | Paged, by related pessoa |
//! | `GET`    | `/processo/pessoa/cpf-cnpj/:cpf_cnpj` | Paged, by parte CPF/CNPJ |
//! | `PUT`    | `/processo/:id/{ativar,suspender,arquivar}` | Lifecycle transitions |
//! | `POST`   | `/processo/:id/partes-envolvidas[/batch]` | Add partes |
//! | `DELETE` | `/processo/:id/partes-envolvidas/:parte_id` | Remove parte (no-op if absent) |
//! | `POST`   | `/processo/:id/acoes[/batch]` | Add ações |
//! | `DELETE` | `/processo/:id/acoes/:acao_id` | Remove ação (no-op if absent) |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sgpj_core::{
  processo::{
    Acao, ParteEnvolvida, Processo, StatusProcesso, TipoAcao,
    TipoParteEnvolvida,
  },
  store::{Page, SgpjStore},
  vo::CpfCnpj,
};
use uuid::Uuid;

use crate::{
  error::ApiError,
  paging::PagingParams,
  pessoa::{PessoaResponse, load_pessoa},
};

// ─── DTOs ────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /processo`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcessoBody {
  pub numero:        String,
  pub descricao:     String,
  /// Defaults to today when absent.
  pub data_abertura: Option<NaiveDate>,
}

/// JSON body accepted by `PUT /processo/:id`. Absent or blank fields leave
/// the current value in place.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcessoBody {
  pub numero:        Option<String>,
  pub descricao:     Option<String>,
  pub data_abertura: Option<NaiveDate>,
}

/// JSON body accepted by the partes-envolvidas endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParteEnvolvidaBody {
  pub pessoa_id: Uuid,
  pub tipo:      TipoParteEnvolvida,
}

/// JSON body accepted by the ações endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcaoBody {
  pub tipo:      TipoAcao,
  #[serde(default)]
  pub descricao: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParteEnvolvidaResponse {
  pub id:     Uuid,
  pub pessoa: PessoaResponse,
  pub tipo:   TipoParteEnvolvida,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcaoResponse {
  pub id:            Uuid,
  pub tipo:          TipoAcao,
  pub descricao:     String,
  pub data_registro: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessoResponse {
  pub id:               Uuid,
  pub numero:           String,
  pub descricao:        String,
  pub data_abertura:    NaiveDate,
  pub status_processo:  StatusProcesso,
  pub partes_envolvidas: Vec<ParteEnvolvidaResponse>,
  pub acoes:            Vec<AcaoResponse>,
}

impl From<&Processo> for ProcessoResponse {
  fn from(processo: &Processo) -> Self {
    Self {
      id:               processo.id,
      numero:           processo.numero.clone(),
      descricao:        processo.descricao.clone(),
      data_abertura:    processo.data_abertura,
      status_processo:  processo.status,
      partes_envolvidas: processo
        .partes
        .iter()
        .map(|parte| ParteEnvolvidaResponse {
          id:     parte.id,
          pessoa: PessoaResponse::from(&parte.pessoa),
          tipo:   parte.tipo,
        })
        .collect(),
      acoes:            processo
        .acoes
        .iter()
        .map(|acao| AcaoResponse {
          id:            acao.id,
          tipo:          acao.tipo,
          descricao:     acao.descricao.clone(),
          data_registro: acao.data_registro,
        })
        .collect(),
    }
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /processo` — 201 + the stored processo.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateProcessoBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_numero_available(store.as_ref(), &body.numero).await?;

  let processo =
    Processo::create(&body.numero, &body.descricao, body.data_abertura);
  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(ProcessoResponse::from(&saved))))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /processo/:id` — partial update of numero, descricao and
/// data abertura. The numero pre-check is skipped when unchanged.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateProcessoBody>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;

  if let Some(numero) = body.numero.as_deref()
    && numero != processo.numero
  {
    ensure_numero_available(store.as_ref(), numero).await?;
  }

  processo.update(
    body.numero.as_deref(),
    body.descricao.as_deref(),
    body.data_abertura,
  );
  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(ProcessoResponse::from(&saved)))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /processo/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let processo = load_processo(store.as_ref(), id).await?;
  Ok(Json(ProcessoResponse::from(&processo)))
}

/// `GET /processo[?page&size&sortBy&sortDirection]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PagingParams>,
) -> Result<Json<Page<ProcessoResponse>>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = store
    .list_processos(params.into())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(page.map(|p| ProcessoResponse::from(&p))))
}

/// `GET /processo/status/:status`
pub async fn by_status<S>(
  State(store): State<Arc<S>>,
  Path(status): Path<StatusProcesso>,
  Query(paging): Query<PagingParams>,
) -> Result<Json<Page<ProcessoResponse>>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = store
    .list_processos_by_status(status, paging.into())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(page.map(|p| ProcessoResponse::from(&p))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
  pub data_inicial: NaiveDate,
  pub data_final:   NaiveDate,
}

/// `GET /processo/data-abertura?dataInicial=<ISO>&dataFinal=<ISO>`
pub async fn by_data_abertura<S>(
  State(store): State<Arc<S>>,
  Query(range): Query<DateRangeParams>,
  Query(paging): Query<PagingParams>,
) -> Result<Json<Page<ProcessoResponse>>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = store
    .list_processos_by_data_abertura(
      range.data_inicial,
      range.data_final,
      paging.into(),
    )
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(page.map(|p| ProcessoResponse::from(&p))))
}

/// `GET /processo/pessoa/id/:pessoa_id`
pub async fn by_pessoa_id<S>(
  State(store): State<Arc<S>>,
  Path(pessoa_id): Path<Uuid>,
  Query(paging): Query<PagingParams>,
) -> Result<Json<Page<ProcessoResponse>>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = store
    .list_processos_by_pessoa(pessoa_id, paging.into())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(page.map(|p| ProcessoResponse::from(&p))))
}

/// `GET /processo/pessoa/cpf-cnpj/:cpf_cnpj`
pub async fn by_pessoa_cpf_cnpj<S>(
  State(store): State<Arc<S>>,
  Path(cpf_cnpj): Path<String>,
  Query(paging): Query<PagingParams>,
) -> Result<Json<Page<ProcessoResponse>>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let parsed = CpfCnpj::new(Some(&cpf_cnpj))?;
  let page = store
    .list_processos_by_parte_cpf_cnpj(parsed, paging.into())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(page.map(|p| ProcessoResponse::from(&p))))
}

// ─── Lifecycle transitions ───────────────────────────────────────────────────

/// `PUT /processo/:id/ativar`
pub async fn ativar<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;
  processo.ativar()?;
  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

/// `PUT /processo/:id/suspender`
pub async fn suspender<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;
  processo.suspender()?;
  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

/// `PUT /processo/:id/arquivar`
///
/// Eligibility is pre-checked so an ineligible aggregate surfaces as
/// PROCESSO_CANNOT_BE_ARCHIVED; a terminal-state attempt still comes back
/// from the state machine as PROCESSO_INVALID_STATE_TRANSITION.
pub async fn arquivar<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;

  if !processo.pode_arquivar() {
    return Err(sgpj_core::Error::CannotArchive.into());
  }

  processo.arquivar()?;
  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

// ─── Partes envolvidas ───────────────────────────────────────────────────────

/// `POST /processo/:id/partes-envolvidas`
pub async fn add_parte<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ParteEnvolvidaBody>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;

  let pessoa = load_pessoa(store.as_ref(), body.pessoa_id).await?;
  processo.add_parte(ParteEnvolvida::create(pessoa, &processo, body.tipo));

  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

/// `POST /processo/:id/partes-envolvidas/batch`
///
/// The first unresolvable pessoa aborts the call before anything is saved.
pub async fn add_partes<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(bodies): Json<Vec<ParteEnvolvidaBody>>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;

  for body in bodies {
    let pessoa = load_pessoa(store.as_ref(), body.pessoa_id).await?;
    processo.add_parte(ParteEnvolvida::create(pessoa, &processo, body.tipo));
  }

  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

/// `DELETE /processo/:id/partes-envolvidas/:parte_id` — a no-op when the
/// parte is absent.
pub async fn remove_parte<S>(
  State(store): State<Arc<S>>,
  Path((id, parte_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;
  processo.remove_parte_by_id(parte_id);

  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

// ─── Ações ───────────────────────────────────────────────────────────────────

/// `POST /processo/:id/acoes`
pub async fn add_acao<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AcaoBody>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;
  processo.adicionar_acao(Acao::create(body.tipo, &body.descricao, &processo));

  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

/// `POST /processo/:id/acoes/batch`
pub async fn add_acoes<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(bodies): Json<Vec<AcaoBody>>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;

  for body in bodies {
    processo.adicionar_acao(Acao::create(body.tipo, &body.descricao, &processo));
  }

  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

/// `DELETE /processo/:id/acoes/:acao_id` — a no-op when the ação is absent.
pub async fn remove_acao<S>(
  State(store): State<Arc<S>>,
  Path((id, acao_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProcessoResponse>, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut processo = load_processo(store.as_ref(), id).await?;
  processo.remove_acao_by_id(acao_id);

  let saved = store
    .save_processo(processo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProcessoResponse::from(&saved)))
}

// ─── Shared ──────────────────────────────────────────────────────────────────

async fn load_processo<S>(store: &S, id: Uuid) -> Result<Processo, ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_processo(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::from(sgpj_core::Error::ProcessoNotFound(id)))
}

async fn ensure_numero_available<S>(
  store: &S,
  numero: &str,
) -> Result<(), ApiError>
where
  S: SgpjStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let exists = store
    .exists_processo_by_numero(numero)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if exists {
    return Err(
      sgpj_core::Error::ProcessoAlreadyExists(numero.to_owned()).into(),
    );
  }
  Ok(())
}
