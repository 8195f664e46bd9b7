//! The processo lifecycle state machine.
//!
//! Exactly one state is active at a time, derived purely from the persisted
//! status enum; it is recomputed after every load and every transition and
//! never persisted itself. Transitions return the next status, the aggregate
//! writes it back, so the enum stays the single source of truth.

use serde::Serialize;

use crate::{
  Error, Result,
  processo::{Processo, StatusProcesso},
};

/// The state view over [`StatusProcesso`].
///
/// Arquivado is terminal: no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessoState {
  Aberto,
  Suspenso,
  Arquivado,
}

impl ProcessoState {
  /// Derive the state from the persisted status.
  pub fn from_status(status: StatusProcesso) -> Self {
    match status {
      StatusProcesso::Ativo => Self::Aberto,
      StatusProcesso::Suspenso => Self::Suspenso,
      StatusProcesso::Arquivado => Self::Arquivado,
    }
  }

  pub(crate) fn ativar(self) -> Result<StatusProcesso> {
    match self {
      Self::Aberto => Err(Error::InvalidTransition(
        "Não é possível ativar um processo já ativo.".into(),
      )),
      Self::Suspenso => Ok(StatusProcesso::Ativo),
      Self::Arquivado => Err(Error::InvalidTransition(
        "Não é possível ativar um processo arquivado.".into(),
      )),
    }
  }

  pub(crate) fn suspender(self) -> Result<StatusProcesso> {
    match self {
      Self::Aberto => Ok(StatusProcesso::Suspenso),
      Self::Suspenso => Err(Error::InvalidTransition(
        "Não é possível suspender um processo já suspenso.".into(),
      )),
      Self::Arquivado => Err(Error::InvalidTransition(
        "Não é possível suspender um processo arquivado.".into(),
      )),
    }
  }

  /// Archiving additionally requires the aggregate to pass
  /// [`Processo::pode_arquivar`], re-evaluated fresh on every attempt.
  pub(crate) fn arquivar(self, processo: &Processo) -> Result<StatusProcesso> {
    match self {
      Self::Aberto | Self::Suspenso => {
        if processo.pode_arquivar() {
          Ok(StatusProcesso::Arquivado)
        } else {
          Err(Error::InvalidTransition(
            "Não é possível arquivar sem partes e ações obrigatórias.".into(),
          ))
        }
      }
      Self::Arquivado => Err(Error::InvalidTransition(
        "Não é possível arquivar um processo já arquivado.".into(),
      )),
    }
  }
}
