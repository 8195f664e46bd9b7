//! Processo — the aggregate root for a legal case.
//!
//! A processo owns its partes envolvidas and ações: children are created in
//! the context of the aggregate, appended in insertion order, and removed
//! from its collections. The status enum is the single persisted source of
//! truth for the lifecycle; the state view is derived from it on demand
//! (see [`crate::status`]).

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, pessoa::Pessoa, status::ProcessoState};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Lifecycle status of a processo. ARQUIVADO is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusProcesso {
  Ativo,
  Suspenso,
  Arquivado,
}

impl StatusProcesso {
  /// The discriminant string persisted in the `status` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Ativo => "ATIVO",
      Self::Suspenso => "SUSPENSO",
      Self::Arquivado => "ARQUIVADO",
    }
  }
}

/// The role a pessoa plays in a processo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoParteEnvolvida {
  Autor,
  Reu,
  Advogado,
}

impl TipoParteEnvolvida {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Autor => "AUTOR",
      Self::Reu => "REU",
      Self::Advogado => "ADVOGADO",
    }
  }
}

/// A kind of procedural event recorded against a processo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoAcao {
  Peticao,
  Audiencia,
  Sentenca,
  Desistencia,
}

impl TipoAcao {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Peticao => "PETICAO",
      Self::Audiencia => "AUDIENCIA",
      Self::Sentenca => "SENTENCA",
      Self::Desistencia => "DESISTENCIA",
    }
  }
}

// ─── Children ────────────────────────────────────────────────────────────────

/// A pessoa bound to a processo under a specific role. Owned by the
/// aggregate; carries the parent's identifier (not a live reference) and a
/// snapshot of the pessoa.
#[derive(Debug, Clone, Serialize)]
pub struct ParteEnvolvida {
  pub id:          Uuid,
  pub processo_id: Uuid,
  pub pessoa:      Pessoa,
  pub tipo:        TipoParteEnvolvida,
}

impl ParteEnvolvida {
  /// Bind an existing pessoa to `processo` under `tipo`.
  pub fn create(
    pessoa: Pessoa,
    processo: &Processo,
    tipo: TipoParteEnvolvida,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      processo_id: processo.id,
      pessoa,
      tipo,
    }
  }
}

/// A procedural event. `data_registro` is set at creation and never changes.
#[derive(Debug, Clone, Serialize)]
pub struct Acao {
  pub id:            Uuid,
  pub processo_id:   Uuid,
  pub tipo:          TipoAcao,
  pub descricao:     String,
  pub data_registro: NaiveDate,
}

impl Acao {
  pub fn create(tipo: TipoAcao, descricao: &str, processo: &Processo) -> Self {
    Self {
      id:            Uuid::new_v4(),
      processo_id:   processo.id,
      tipo,
      descricao:     descricao.to_owned(),
      data_registro: Utc::now().date_naive(),
    }
  }
}

// ─── Processo ────────────────────────────────────────────────────────────────

/// The aggregate root. `numero` is unique across all processos
/// (service-enforced, backed by a storage constraint).
#[derive(Debug, Clone, Serialize)]
pub struct Processo {
  pub id:            Uuid,
  pub numero:        String,
  pub descricao:     String,
  pub data_abertura: NaiveDate,
  pub status:        StatusProcesso,
  pub partes:        Vec<ParteEnvolvida>,
  pub acoes:         Vec<Acao>,
}

impl Processo {
  /// Open a new processo as ATIVO, dated `data_abertura` or today.
  pub fn create(
    numero: &str,
    descricao: &str,
    data_abertura: Option<NaiveDate>,
  ) -> Self {
    Self {
      id:            Uuid::new_v4(),
      numero:        numero.to_owned(),
      descricao:     descricao.to_owned(),
      data_abertura: data_abertura.unwrap_or_else(|| Utc::now().date_naive()),
      status:        StatusProcesso::Ativo,
      partes:        Vec::new(),
      acoes:         Vec::new(),
    }
  }

  /// The state view derived from the persisted status. Recomputed on every
  /// call; never stored.
  pub fn state(&self) -> ProcessoState {
    ProcessoState::from_status(self.status)
  }

  // ── Lifecycle transitions ─────────────────────────────────────────────

  pub fn ativar(&mut self) -> Result<()> {
    let next = self.state().ativar()?;
    self.status = next;
    Ok(())
  }

  pub fn suspender(&mut self) -> Result<()> {
    let next = self.state().suspender()?;
    self.status = next;
    Ok(())
  }

  pub fn arquivar(&mut self) -> Result<()> {
    let next = self.state().arquivar(self)?;
    self.status = next;
    Ok(())
  }

  /// Archival eligibility: the partes must cover all three roles and the
  /// ações must contain a PETICAO, an AUDIENCIA, and a SENTENCA or
  /// DESISTENCIA. Order-independent; evaluated fresh on every call.
  pub fn pode_arquivar(&self) -> bool {
    self.tem_partes_obrigatorias() && self.tem_acoes_obrigatorias()
  }

  fn tem_partes_obrigatorias(&self) -> bool {
    let tem = |tipo| self.partes.iter().any(|p| p.tipo == tipo);
    tem(TipoParteEnvolvida::Autor)
      && tem(TipoParteEnvolvida::Reu)
      && tem(TipoParteEnvolvida::Advogado)
  }

  fn tem_acoes_obrigatorias(&self) -> bool {
    let tem = |tipo| self.acoes.iter().any(|a| a.tipo == tipo);
    tem(TipoAcao::Peticao)
      && tem(TipoAcao::Audiencia)
      && (tem(TipoAcao::Sentenca) || tem(TipoAcao::Desistencia))
  }

  // ── Collection management ─────────────────────────────────────────────

  /// Append a parte, binding its back-reference to this processo.
  /// No duplicate detection; insertion order is kept.
  pub fn add_parte(&mut self, mut parte: ParteEnvolvida) {
    parte.processo_id = self.id;
    self.partes.push(parte);
  }

  /// Remove a parte by value; equality is by id.
  pub fn remove_parte(&mut self, parte: &ParteEnvolvida) {
    self.remove_parte_by_id(parte.id);
  }

  /// Remove the parte with `parte_id`, if any. A no-op when absent.
  pub fn remove_parte_by_id(&mut self, parte_id: Uuid) {
    self.partes.retain(|p| p.id != parte_id);
  }

  /// Append an ação, binding its back-reference to this processo.
  /// No duplicate detection; insertion order is kept.
  pub fn adicionar_acao(&mut self, mut acao: Acao) {
    acao.processo_id = self.id;
    self.acoes.push(acao);
  }

  /// Remove an ação by value; equality is by id.
  pub fn remove_acao(&mut self, acao: &Acao) {
    self.remove_acao_by_id(acao.id);
  }

  /// Remove the ação with `acao_id`, if any. A no-op when absent.
  pub fn remove_acao_by_id(&mut self, acao_id: Uuid) {
    self.acoes.retain(|a| a.id != acao_id);
  }

  /// Partial update: each field replaces the current value only when
  /// supplied and, for the strings, non-blank. Status is never touched
  /// here; only the lifecycle transitions change it.
  pub fn update(
    &mut self,
    numero: Option<&str>,
    descricao: Option<&str>,
    data_abertura: Option<NaiveDate>,
  ) {
    if let Some(n) = numero
      && !n.trim().is_empty()
    {
      self.numero = n.to_owned();
    }
    if let Some(d) = descricao
      && !d.trim().is_empty()
    {
      self.descricao = d.to_owned();
    }
    if let Some(data) = data_abertura {
      self.data_abertura = data;
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn pessoa(nome: &str) -> Pessoa {
    Pessoa::create(
      Some(nome),
      Some("123.456.789-09"),
      Some("parte@example.com"),
      Some("11987654321"),
    )
    .expect("valid pessoa")
  }

  fn parte(
    processo: &Processo,
    tipo: TipoParteEnvolvida,
  ) -> ParteEnvolvida {
    ParteEnvolvida::create(pessoa("Parte Teste"), processo, tipo)
  }

  fn acao(processo: &Processo, tipo: TipoAcao) -> Acao {
    Acao::create(tipo, "ação de teste", processo)
  }

  /// A processo satisfying every archival requirement.
  fn processo_arquivavel() -> Processo {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Autor));
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Reu));
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Advogado));
    processo.adicionar_acao(acao(&processo, TipoAcao::Peticao));
    processo.adicionar_acao(acao(&processo, TipoAcao::Audiencia));
    processo.adicionar_acao(acao(&processo, TipoAcao::Sentenca));
    processo
  }

  // ── Creation ──────────────────────────────────────────────────────────

  #[test]
  fn new_processo_is_ativo() {
    let processo = Processo::create("0001", "Processo Teste", None);
    assert_eq!(processo.status, StatusProcesso::Ativo);
    assert_eq!(processo.state(), ProcessoState::Aberto);
    assert!(processo.partes.is_empty());
    assert!(processo.acoes.is_empty());
  }

  #[test]
  fn create_accepts_a_supplied_data_abertura() {
    let data = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let processo = Processo::create("0001", "Processo Teste", Some(data));
    assert_eq!(processo.data_abertura, data);
  }

  // ── Transitions ───────────────────────────────────────────────────────

  #[test]
  fn suspender_then_ativar_round_trips() {
    let mut processo = Processo::create("0001", "Processo Teste", None);

    processo.suspender().unwrap();
    assert_eq!(processo.status, StatusProcesso::Suspenso);
    assert_eq!(processo.state(), ProcessoState::Suspenso);

    processo.ativar().unwrap();
    assert_eq!(processo.status, StatusProcesso::Ativo);
    assert_eq!(processo.state(), ProcessoState::Aberto);
  }

  #[test]
  fn ativar_on_ativo_fails() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    let err = processo.ativar().unwrap_err();
    assert_eq!(
      err.to_string(),
      "Não é possível ativar um processo já ativo."
    );
    assert_eq!(processo.status, StatusProcesso::Ativo);
  }

  #[test]
  fn suspender_on_suspenso_fails() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    processo.suspender().unwrap();
    let err = processo.suspender().unwrap_err();
    assert_eq!(
      err.to_string(),
      "Não é possível suspender um processo já suspenso."
    );
  }

  #[test]
  fn arquivado_is_terminal() {
    let mut processo = processo_arquivavel();
    processo.arquivar().unwrap();

    assert!(matches!(
      processo.ativar().unwrap_err(),
      Error::InvalidTransition(_)
    ));
    assert!(matches!(
      processo.suspender().unwrap_err(),
      Error::InvalidTransition(_)
    ));
    assert_eq!(
      processo.arquivar().unwrap_err().to_string(),
      "Não é possível arquivar um processo já arquivado."
    );
    assert_eq!(processo.status, StatusProcesso::Arquivado);
  }

  #[test]
  fn arquivar_without_requirements_fails_and_keeps_status() {
    let mut processo = Processo::create("0001", "Processo Incompleto", None);
    processo.suspender().unwrap();
    processo.ativar().unwrap();

    let err = processo.arquivar().unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
    assert_eq!(processo.status, StatusProcesso::Ativo);
  }

  #[test]
  fn arquivar_succeeds_with_all_requirements() {
    let mut processo = processo_arquivavel();
    processo.arquivar().unwrap();
    assert_eq!(processo.status, StatusProcesso::Arquivado);
    assert_eq!(processo.state(), ProcessoState::Arquivado);
  }

  #[test]
  fn arquivar_from_suspenso_also_checks_requirements() {
    let mut processo = processo_arquivavel();
    processo.suspender().unwrap();
    processo.arquivar().unwrap();
    assert_eq!(processo.status, StatusProcesso::Arquivado);

    let mut incompleto = Processo::create("0002", "Incompleto", None);
    incompleto.suspender().unwrap();
    assert!(incompleto.arquivar().is_err());
    assert_eq!(incompleto.status, StatusProcesso::Suspenso);
  }

  // ── Archival eligibility ──────────────────────────────────────────────

  #[test]
  fn pode_arquivar_requires_all_three_roles() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    processo.adicionar_acao(acao(&processo, TipoAcao::Peticao));
    processo.adicionar_acao(acao(&processo, TipoAcao::Audiencia));
    processo.adicionar_acao(acao(&processo, TipoAcao::Sentenca));

    processo.add_parte(parte(&processo, TipoParteEnvolvida::Autor));
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Reu));
    assert!(!processo.pode_arquivar());

    processo.add_parte(parte(&processo, TipoParteEnvolvida::Advogado));
    assert!(processo.pode_arquivar());
  }

  #[test]
  fn desistencia_counts_as_terminal_acao() {
    let mut processo = processo_arquivavel();
    let sentenca_ids: Vec<_> = processo
      .acoes
      .iter()
      .filter(|a| a.tipo == TipoAcao::Sentenca)
      .map(|a| a.id)
      .collect();
    for id in sentenca_ids {
      processo.remove_acao_by_id(id);
    }
    assert!(!processo.pode_arquivar());

    processo.adicionar_acao(acao(&processo, TipoAcao::Desistencia));
    assert!(processo.pode_arquivar());

    processo.arquivar().unwrap();
    assert_eq!(processo.status, StatusProcesso::Arquivado);
  }

  #[test]
  fn pode_arquivar_is_order_independent() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    processo.adicionar_acao(acao(&processo, TipoAcao::Sentenca));
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Advogado));
    processo.adicionar_acao(acao(&processo, TipoAcao::Audiencia));
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Autor));
    processo.adicionar_acao(acao(&processo, TipoAcao::Peticao));
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Reu));
    assert!(processo.pode_arquivar());
  }

  // ── Collections ───────────────────────────────────────────────────────

  #[test]
  fn add_binds_the_child_back_reference() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    let outro = Processo::create("0002", "Outro", None);

    // Children created against another aggregate are re-bound on append.
    processo.add_parte(parte(&outro, TipoParteEnvolvida::Autor));
    processo.adicionar_acao(acao(&outro, TipoAcao::Peticao));

    assert_eq!(processo.partes[0].processo_id, processo.id);
    assert_eq!(processo.acoes[0].processo_id, processo.id);
  }

  #[test]
  fn remove_by_absent_id_is_a_no_op() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Autor));
    processo.adicionar_acao(acao(&processo, TipoAcao::Peticao));

    processo.remove_parte_by_id(Uuid::new_v4());
    processo.remove_acao_by_id(Uuid::new_v4());

    assert_eq!(processo.partes.len(), 1);
    assert_eq!(processo.acoes.len(), 1);
  }

  #[test]
  fn remove_by_id_drops_only_the_matching_child() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    let autor = parte(&processo, TipoParteEnvolvida::Autor);
    let autor_id = autor.id;
    processo.add_parte(autor);
    processo.add_parte(parte(&processo, TipoParteEnvolvida::Reu));

    processo.remove_parte_by_id(autor_id);

    assert_eq!(processo.partes.len(), 1);
    assert_eq!(processo.partes[0].tipo, TipoParteEnvolvida::Reu);
  }

  #[test]
  fn remove_by_value_matches_on_id() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    let autor = parte(&processo, TipoParteEnvolvida::Autor);
    let peticao = acao(&processo, TipoAcao::Peticao);
    processo.add_parte(autor.clone());
    processo.adicionar_acao(peticao.clone());

    processo.remove_parte(&autor);
    processo.remove_acao(&peticao);

    assert!(processo.partes.is_empty());
    assert!(processo.acoes.is_empty());
  }

  #[test]
  fn children_keep_insertion_order() {
    let mut processo = Processo::create("0001", "Processo Teste", None);
    processo.adicionar_acao(acao(&processo, TipoAcao::Sentenca));
    processo.adicionar_acao(acao(&processo, TipoAcao::Peticao));
    processo.adicionar_acao(acao(&processo, TipoAcao::Audiencia));

    let tipos: Vec<_> = processo.acoes.iter().map(|a| a.tipo).collect();
    assert_eq!(
      tipos,
      [TipoAcao::Sentenca, TipoAcao::Peticao, TipoAcao::Audiencia]
    );
  }

  // ── Update ────────────────────────────────────────────────────────────

  #[test]
  fn update_ignores_missing_and_blank_fields() {
    let data = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let mut processo = Processo::create("0001", "Descrição", Some(data));

    processo.update(None, Some(""), None);

    assert_eq!(processo.numero, "0001");
    assert_eq!(processo.descricao, "Descrição");
    assert_eq!(processo.data_abertura, data);
  }

  #[test]
  fn update_replaces_supplied_fields() {
    let mut processo = Processo::create("0001", "Descrição", None);
    let data = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

    processo.update(Some("0002"), Some("Nova descrição"), Some(data));

    assert_eq!(processo.numero, "0002");
    assert_eq!(processo.descricao, "Nova descrição");
    assert_eq!(processo.data_abertura, data);
  }

  #[test]
  fn update_never_touches_status() {
    let mut processo = Processo::create("0001", "Descrição", None);
    processo.suspender().unwrap();

    processo.update(Some("0002"), None, None);

    assert_eq!(processo.status, StatusProcesso::Suspenso);
  }
}
