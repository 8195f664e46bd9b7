//! Error types for `sgpj-core`.
//!
//! Messages are user-facing and kept in Portuguese; the api layer maps each
//! variant to an error code and HTTP status without rewording.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Pessoa não encontrada com ID: {0}")]
  PessoaNotFound(Uuid),

  #[error("Pessoa não encontrada com CPF/CNPJ: {0}")]
  PessoaNotFoundByCpfCnpj(String),

  #[error("Processo não encontrado com ID: {0}")]
  ProcessoNotFound(Uuid),

  #[error("CPF/CNPJ já está cadastrado: {0}")]
  PessoaAlreadyExists(String),

  #[error("Um processo com número '{0}' já está cadastrado")]
  ProcessoAlreadyExists(String),

  /// A value object rejected its raw input.
  #[error("{0}")]
  InvalidField(String),

  /// A lifecycle transition is not permitted from the current state.
  #[error("{0}")]
  InvalidTransition(String),

  #[error(
    "Processo não pode ser arquivado. Verifique se possui todas as partes \
     obrigatórias (AUTOR, RÉU, ADVOGADO) e ações obrigatórias (PETIÇÃO, \
     AUDIÊNCIA e SENTENÇA ou DESISTÊNCIA)."
  )]
  CannotArchive,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
