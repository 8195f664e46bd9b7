//! The `SgpjStore` trait and pagination types.
//!
//! The trait is implemented by storage backends (e.g. `sgpj-store-sqlite`).
//! The api layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  pessoa::Pessoa,
  processo::{Processo, StatusProcesso},
  vo::CpfCnpj,
};

// ─── Pagination ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[serde(alias = "ASC")]
  Asc,
  #[serde(alias = "DESC")]
  Desc,
}

/// Parameters for paged queries. Pages are numbered from zero.
///
/// `sort_by` names a domain field; backends whitelist the columns they can
/// sort on and fall back to their default order for anything else.
#[derive(Debug, Clone)]
pub struct PageRequest {
  pub page:           usize,
  pub size:           usize,
  pub sort_by:        Option<String>,
  pub sort_direction: Option<SortDirection>,
}

impl PageRequest {
  pub const DEFAULT_SIZE: usize = 10;

  pub fn new(page: usize, size: usize) -> Self {
    Self { page, size, sort_by: None, sort_direction: None }
  }

  pub fn offset(&self) -> usize { self.page * self.size }
}

impl Default for PageRequest {
  fn default() -> Self {
    Self::new(0, Self::DEFAULT_SIZE)
  }
}

/// One page of results together with the totals the paged endpoints expose.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items:       Vec<T>,
  pub page:        usize,
  pub size:        usize,
  pub total_items: u64,
  pub total_pages: u64,
}

impl<T> Page<T> {
  pub fn new(
    items: Vec<T>,
    request: &PageRequest,
    total_items: u64,
  ) -> Self {
    let total_pages = if request.size == 0 {
      0
    } else {
      total_items.div_ceil(request.size as u64)
    };
    Self {
      items,
      page: request.page,
      size: request.size,
      total_items,
      total_pages,
    }
  }

  /// Convert the items while keeping the page metadata.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:       self.items.into_iter().map(f).collect(),
      page:        self.page,
      size:        self.size,
      total_items: self.total_items,
      total_pages: self.total_pages,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the persistence backend.
///
/// Loads return fully-hydrated aggregates (a processo together with its
/// child collections); saves are upserts that persist the whole aggregate
/// atomically and return the persisted state. Uniqueness of `cpf_cnpj` and
/// `numero` is enforced by the backend; the `exists_*` checks are the
/// fast path callers use to produce friendly conflict errors.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SgpjStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Pessoas ───────────────────────────────────────────────────────────

  /// Upsert a pessoa and return the persisted state.
  fn save_pessoa(
    &self,
    pessoa: Pessoa,
  ) -> impl Future<Output = Result<Pessoa, Self::Error>> + Send + '_;

  /// Retrieve a pessoa by id. Returns `None` if not found.
  fn get_pessoa(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Pessoa>, Self::Error>> + Send + '_;

  /// Retrieve a pessoa by her normalised CPF/CNPJ.
  fn find_pessoa_by_cpf_cnpj(
    &self,
    cpf_cnpj: CpfCnpj,
  ) -> impl Future<Output = Result<Option<Pessoa>, Self::Error>> + Send + '_;

  fn exists_pessoa_by_cpf_cnpj(
    &self,
    cpf_cnpj: CpfCnpj,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_pessoas(
    &self,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<Pessoa>, Self::Error>> + Send + '_;

  /// Case-insensitive substring search over `nome_completo`.
  fn search_pessoas_by_nome<'a>(
    &'a self,
    nome: &'a str,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<Pessoa>, Self::Error>> + Send + 'a;

  // ── Processos ─────────────────────────────────────────────────────────

  /// Upsert the aggregate: the processo row and both child collections are
  /// persisted in one transaction.
  fn save_processo(
    &self,
    processo: Processo,
  ) -> impl Future<Output = Result<Processo, Self::Error>> + Send + '_;

  /// Retrieve a processo with its children loaded, in insertion order.
  fn get_processo(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Processo>, Self::Error>> + Send + '_;

  fn exists_processo_by_numero<'a>(
    &'a self,
    numero: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn list_processos(
    &self,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<Processo>, Self::Error>> + Send + '_;

  fn list_processos_by_status(
    &self,
    status: StatusProcesso,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<Processo>, Self::Error>> + Send + '_;

  /// Processos whose `data_abertura` falls within the inclusive range.
  fn list_processos_by_data_abertura(
    &self,
    data_inicial: NaiveDate,
    data_final: NaiveDate,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<Processo>, Self::Error>> + Send + '_;

  /// Processos in which the pessoa appears as a parte envolvida.
  fn list_processos_by_pessoa(
    &self,
    pessoa_id: Uuid,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<Processo>, Self::Error>> + Send + '_;

  /// Processos in which a parte envolvida carries the given CPF/CNPJ.
  fn list_processos_by_parte_cpf_cnpj(
    &self,
    cpf_cnpj: CpfCnpj,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<Processo>, Self::Error>> + Send + '_;
}
