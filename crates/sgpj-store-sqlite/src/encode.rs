//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 strings, UUIDs as hyphenated lowercase
//! strings, enums as their SCREAMING_SNAKE_CASE discriminants. Value objects
//! are stored pre-normalised; decoding re-runs their constructors, which are
//! idempotent on normalised input.

use chrono::NaiveDate;
use sgpj_core::{
  pessoa::Pessoa,
  processo::{
    Acao, ParteEnvolvida, Processo, StatusProcesso, TipoAcao,
    TipoParteEnvolvida,
  },
  vo::{CpfCnpj, Email, Telefone},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<StatusProcesso> {
  match s {
    "ATIVO" => Ok(StatusProcesso::Ativo),
    "SUSPENSO" => Ok(StatusProcesso::Suspenso),
    "ARQUIVADO" => Ok(StatusProcesso::Arquivado),
    other => Err(Error::UnknownDiscriminant(other.to_owned())),
  }
}

pub fn decode_tipo_parte(s: &str) -> Result<TipoParteEnvolvida> {
  match s {
    "AUTOR" => Ok(TipoParteEnvolvida::Autor),
    "REU" => Ok(TipoParteEnvolvida::Reu),
    "ADVOGADO" => Ok(TipoParteEnvolvida::Advogado),
    other => Err(Error::UnknownDiscriminant(other.to_owned())),
  }
}

pub fn decode_tipo_acao(s: &str) -> Result<TipoAcao> {
  match s {
    "PETICAO" => Ok(TipoAcao::Peticao),
    "AUDIENCIA" => Ok(TipoAcao::Audiencia),
    "SENTENCA" => Ok(TipoAcao::Sentenca),
    "DESISTENCIA" => Ok(TipoAcao::Desistencia),
    other => Err(Error::UnknownDiscriminant(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `pessoas` row.
pub struct RawPessoa {
  pub pessoa_id:     String,
  pub nome_completo: String,
  pub cpf_cnpj:      String,
  pub email:         String,
  pub telefone:      String,
}

impl RawPessoa {
  pub fn into_pessoa(self) -> Result<Pessoa> {
    Ok(Pessoa {
      id:            decode_uuid(&self.pessoa_id)?,
      nome_completo: self.nome_completo,
      cpf_cnpj:      CpfCnpj::new(Some(&self.cpf_cnpj))?,
      email:         Email::new(Some(&self.email))?,
      telefone:      Telefone::new(Some(&self.telefone))?,
    })
  }
}

/// Raw strings read from a `partes_envolvidas` row joined with `pessoas`.
pub struct RawParte {
  pub parte_id:    String,
  pub processo_id: String,
  pub tipo:        String,
  pub pessoa:      RawPessoa,
}

impl RawParte {
  pub fn into_parte(self) -> Result<ParteEnvolvida> {
    Ok(ParteEnvolvida {
      id:          decode_uuid(&self.parte_id)?,
      processo_id: decode_uuid(&self.processo_id)?,
      pessoa:      self.pessoa.into_pessoa()?,
      tipo:        decode_tipo_parte(&self.tipo)?,
    })
  }
}

/// Raw strings read directly from an `acoes` row.
pub struct RawAcao {
  pub acao_id:       String,
  pub processo_id:   String,
  pub tipo:          String,
  pub descricao:     String,
  pub data_registro: String,
}

impl RawAcao {
  pub fn into_acao(self) -> Result<Acao> {
    Ok(Acao {
      id:            decode_uuid(&self.acao_id)?,
      processo_id:   decode_uuid(&self.processo_id)?,
      tipo:          decode_tipo_acao(&self.tipo)?,
      descricao:     self.descricao,
      data_registro: decode_date(&self.data_registro)?,
    })
  }
}

/// Raw strings read directly from a `processos` row, before the child
/// collections are attached.
pub struct RawProcesso {
  pub processo_id:   String,
  pub numero:        String,
  pub descricao:     String,
  pub data_abertura: String,
  pub status:        String,
}

/// A processo row with its child rows, as gathered inside one connection
/// closure; decoded into the aggregate outside it.
pub type RawAggregate = (RawProcesso, Vec<RawParte>, Vec<RawAcao>);

pub fn decode_aggregate(raw: RawAggregate) -> Result<Processo> {
  let (processo, partes, acoes) = raw;
  Ok(Processo {
    id:            decode_uuid(&processo.processo_id)?,
    numero:        processo.numero,
    descricao:     processo.descricao,
    data_abertura: decode_date(&processo.data_abertura)?,
    status:        decode_status(&processo.status)?,
    partes:        partes
      .into_iter()
      .map(RawParte::into_parte)
      .collect::<Result<_>>()?,
    acoes:         acoes
      .into_iter()
      .map(RawAcao::into_acao)
      .collect::<Result<_>>()?,
  })
}
