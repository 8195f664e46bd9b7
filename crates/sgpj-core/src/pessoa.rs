//! Pessoa — a natural or legal person registered in the system.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  vo::{CpfCnpj, Email, Telefone},
};

/// A registered person. Identity is the `id`; the other four fields are only
/// replaced wholesale by [`Pessoa::update`].
///
/// Uniqueness of `cpf_cnpj` across all pessoas is the owning service's
/// responsibility, not the entity's.
#[derive(Debug, Clone, Serialize)]
pub struct Pessoa {
  pub id:            Uuid,
  pub nome_completo: String,
  pub cpf_cnpj:      CpfCnpj,
  pub email:         Email,
  pub telefone:      Telefone,
}

impl Pessoa {
  /// Validate the raw fields and build a new person with a fresh id.
  /// Fails on the first rejected field; no partially-built pessoa escapes.
  pub fn create(
    nome_completo: Option<&str>,
    cpf_cnpj: Option<&str>,
    email: Option<&str>,
    telefone: Option<&str>,
  ) -> Result<Self> {
    Ok(Self {
      id:            Uuid::new_v4(),
      nome_completo: required_nome(nome_completo)?,
      cpf_cnpj:      CpfCnpj::new(cpf_cnpj)?,
      email:         Email::new(email)?,
      telefone:      Telefone::new(telefone)?,
    })
  }

  /// Replace all four mutable fields unconditionally. There are no
  /// partial-update semantics here, unlike a processo update.
  ///
  /// Every field is validated before the first assignment, so a rejected
  /// input leaves the pessoa untouched.
  pub fn update(
    &mut self,
    nome_completo: Option<&str>,
    cpf_cnpj: Option<&str>,
    email: Option<&str>,
    telefone: Option<&str>,
  ) -> Result<()> {
    let nome_completo = required_nome(nome_completo)?;
    let cpf_cnpj = CpfCnpj::new(cpf_cnpj)?;
    let email = Email::new(email)?;
    let telefone = Telefone::new(telefone)?;

    self.nome_completo = nome_completo;
    self.cpf_cnpj = cpf_cnpj;
    self.email = email;
    self.telefone = telefone;
    Ok(())
  }
}

fn required_nome(nome: Option<&str>) -> Result<String> {
  nome
    .filter(|n| !n.trim().is_empty())
    .map(str::to_owned)
    .ok_or_else(|| Error::InvalidField("Nome completo é obrigatório".into()))
}
