//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use sgpj_core::{
  pessoa::Pessoa,
  processo::{
    Acao, ParteEnvolvida, Processo, StatusProcesso, TipoAcao,
    TipoParteEnvolvida,
  },
  status::ProcessoState,
  store::{PageRequest, SgpjStore, SortDirection},
  vo::CpfCnpj,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn pessoa(nome: &str, cpf_cnpj: &str) -> Pessoa {
  Pessoa::create(
    Some(nome),
    Some(cpf_cnpj),
    Some("parte@example.com"),
    Some("11987654321"),
  )
  .expect("valid pessoa")
}

fn cpf(value: &str) -> CpfCnpj {
  CpfCnpj::new(Some(value)).expect("valid cpf")
}

fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(ano, mes, dia).expect("valid date")
}

// ─── Pessoas ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_get_pessoa() {
  let s = store().await;

  let pessoa = s
    .save_pessoa(pessoa("Fulano da Silva", "123.456.789-09"))
    .await
    .unwrap();

  let fetched = s.get_pessoa(pessoa.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, pessoa.id);
  assert_eq!(fetched.nome_completo, "Fulano da Silva");
  assert_eq!(fetched.cpf_cnpj.value(), "12345678909");
  assert_eq!(fetched.email.value(), "parte@example.com");
  assert_eq!(fetched.telefone.numero(), "11987654321");
}

#[tokio::test]
async fn get_pessoa_missing_returns_none() {
  let s = store().await;
  assert!(s.get_pessoa(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn save_pessoa_twice_updates_in_place() {
  let s = store().await;

  let mut p = s
    .save_pessoa(pessoa("Fulano", "12345678909"))
    .await
    .unwrap();
  p.update(
    Some("Fulano Atualizado"),
    Some("12345678909"),
    Some("novo@example.com"),
    Some("1187654321"),
  )
  .unwrap();
  s.save_pessoa(p.clone()).await.unwrap();

  let fetched = s.get_pessoa(p.id).await.unwrap().unwrap();
  assert_eq!(fetched.nome_completo, "Fulano Atualizado");
  assert_eq!(fetched.email.value(), "novo@example.com");

  let page = s.list_pessoas(PageRequest::default()).await.unwrap();
  assert_eq!(page.total_items, 1);
}

#[tokio::test]
async fn find_and_exists_by_cpf_cnpj() {
  let s = store().await;
  s.save_pessoa(pessoa("Fulano", "123.456.789-09"))
    .await
    .unwrap();

  let found = s
    .find_pessoa_by_cpf_cnpj(cpf("12345678909"))
    .await
    .unwrap();
  assert_eq!(found.unwrap().nome_completo, "Fulano");

  assert!(
    s.exists_pessoa_by_cpf_cnpj(cpf("12345678909"))
      .await
      .unwrap()
  );
  assert!(
    !s.exists_pessoa_by_cpf_cnpj(cpf("99999999999"))
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn duplicate_cpf_cnpj_is_rejected_by_the_schema() {
  let s = store().await;
  s.save_pessoa(pessoa("Fulano", "12345678909")).await.unwrap();

  // Distinct id, same cpf_cnpj: the UNIQUE constraint is the backstop
  // behind the service-level pre-check.
  let err = s.save_pessoa(pessoa("Beltrano", "12345678909")).await;
  assert!(err.is_err());
}

#[tokio::test]
async fn list_pessoas_pages_and_sorts() {
  let s = store().await;
  s.save_pessoa(pessoa("Carla", "11111111111")).await.unwrap();
  s.save_pessoa(pessoa("Ana", "22222222222")).await.unwrap();
  s.save_pessoa(pessoa("Bruno", "33333333333")).await.unwrap();

  let page = s.list_pessoas(PageRequest::new(0, 2)).await.unwrap();
  assert_eq!(page.total_items, 3);
  assert_eq!(page.total_pages, 2);
  // Default order is nome_completo ascending.
  let nomes: Vec<_> =
    page.items.iter().map(|p| p.nome_completo.clone()).collect();
  assert_eq!(nomes, ["Ana", "Bruno"]);

  let rest = s.list_pessoas(PageRequest::new(1, 2)).await.unwrap();
  assert_eq!(rest.items.len(), 1);
  assert_eq!(rest.items[0].nome_completo, "Carla");
}

#[tokio::test]
async fn list_pessoas_honours_sort_direction() {
  let s = store().await;
  s.save_pessoa(pessoa("Ana", "11111111111")).await.unwrap();
  s.save_pessoa(pessoa("Bruno", "22222222222")).await.unwrap();

  let request = PageRequest {
    sort_by: Some("nomeCompleto".into()),
    sort_direction: Some(SortDirection::Desc),
    ..PageRequest::default()
  };
  let page = s.list_pessoas(request).await.unwrap();
  let nomes: Vec<_> =
    page.items.iter().map(|p| p.nome_completo.clone()).collect();
  assert_eq!(nomes, ["Bruno", "Ana"]);
}

#[tokio::test]
async fn search_pessoas_by_nome_is_a_substring_match() {
  let s = store().await;
  s.save_pessoa(pessoa("Maria da Silva", "11111111111"))
    .await
    .unwrap();
  s.save_pessoa(pessoa("João Pereira", "22222222222"))
    .await
    .unwrap();

  let page = s
    .search_pessoas_by_nome("silva", PageRequest::default())
    .await
    .unwrap();
  assert_eq!(page.total_items, 1);
  assert_eq!(page.items[0].nome_completo, "Maria da Silva");
}

// ─── Processos ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_get_processo_aggregate() {
  let s = store().await;

  let autor = s.save_pessoa(pessoa("Autor", "11111111111")).await.unwrap();
  let reu = s.save_pessoa(pessoa("Réu", "22222222222")).await.unwrap();

  let mut processo =
    Processo::create("0001", "Disputa contratual", Some(data(2024, 3, 1)));
  processo.add_parte(ParteEnvolvida::create(
    autor.clone(),
    &processo,
    TipoParteEnvolvida::Autor,
  ));
  processo
    .add_parte(ParteEnvolvida::create(reu, &processo, TipoParteEnvolvida::Reu));
  processo
    .adicionar_acao(Acao::create(TipoAcao::Peticao, "Petição inicial", &processo));
  processo
    .adicionar_acao(Acao::create(TipoAcao::Audiencia, "Audiência", &processo));

  let saved = s.save_processo(processo).await.unwrap();
  let fetched = s.get_processo(saved.id).await.unwrap().unwrap();

  assert_eq!(fetched.numero, "0001");
  assert_eq!(fetched.descricao, "Disputa contratual");
  assert_eq!(fetched.data_abertura, data(2024, 3, 1));
  assert_eq!(fetched.status, StatusProcesso::Ativo);

  // Children come back in insertion order, pessoas rehydrated.
  assert_eq!(fetched.partes.len(), 2);
  assert_eq!(fetched.partes[0].tipo, TipoParteEnvolvida::Autor);
  assert_eq!(fetched.partes[0].pessoa.id, autor.id);
  assert_eq!(fetched.partes[0].pessoa.nome_completo, "Autor");
  assert_eq!(fetched.partes[1].tipo, TipoParteEnvolvida::Reu);

  assert_eq!(fetched.acoes.len(), 2);
  assert_eq!(fetched.acoes[0].tipo, TipoAcao::Peticao);
  assert_eq!(fetched.acoes[1].tipo, TipoAcao::Audiencia);
}

#[tokio::test]
async fn get_processo_missing_returns_none() {
  let s = store().await;
  assert!(s.get_processo(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn saving_again_replaces_children() {
  let s = store().await;
  let p = s.save_pessoa(pessoa("Autor", "11111111111")).await.unwrap();

  let mut processo = Processo::create("0001", "Processo", None);
  processo.add_parte(ParteEnvolvida::create(
    p,
    &processo,
    TipoParteEnvolvida::Autor,
  ));
  processo.adicionar_acao(Acao::create(TipoAcao::Peticao, "Petição", &processo));
  let mut processo = s.save_processo(processo).await.unwrap();

  let acao_id = processo.acoes[0].id;
  processo.remove_acao_by_id(acao_id);
  processo
    .adicionar_acao(Acao::create(TipoAcao::Audiencia, "Audiência", &processo));
  s.save_processo(processo.clone()).await.unwrap();

  let fetched = s.get_processo(processo.id).await.unwrap().unwrap();
  assert_eq!(fetched.partes.len(), 1);
  assert_eq!(fetched.acoes.len(), 1);
  assert_eq!(fetched.acoes[0].tipo, TipoAcao::Audiencia);
}

#[tokio::test]
async fn status_survives_a_reload() {
  let s = store().await;

  let mut processo = Processo::create("0001", "Processo", None);
  processo.suspender().unwrap();
  let saved = s.save_processo(processo).await.unwrap();

  let fetched = s.get_processo(saved.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, StatusProcesso::Suspenso);
  // The state view is derived from the persisted status on load.
  assert_eq!(fetched.state(), ProcessoState::Suspenso);
}

#[tokio::test]
async fn exists_processo_by_numero() {
  let s = store().await;
  s.save_processo(Processo::create("0001", "Processo", None))
    .await
    .unwrap();

  assert!(s.exists_processo_by_numero("0001").await.unwrap());
  assert!(!s.exists_processo_by_numero("0002").await.unwrap());
}

#[tokio::test]
async fn duplicate_numero_is_rejected_by_the_schema() {
  let s = store().await;
  s.save_processo(Processo::create("0001", "Primeiro", None))
    .await
    .unwrap();

  let err = s
    .save_processo(Processo::create("0001", "Segundo", None))
    .await;
  assert!(err.is_err());
}

#[tokio::test]
async fn list_processos_by_status_filters() {
  let s = store().await;

  let ativo = Processo::create("0001", "Ativo", None);
  let mut suspenso = Processo::create("0002", "Suspenso", None);
  suspenso.suspender().unwrap();
  s.save_processo(ativo).await.unwrap();
  s.save_processo(suspenso).await.unwrap();

  let page = s
    .list_processos_by_status(StatusProcesso::Suspenso, PageRequest::default())
    .await
    .unwrap();
  assert_eq!(page.total_items, 1);
  assert_eq!(page.items[0].numero, "0002");
}

#[tokio::test]
async fn list_processos_by_data_abertura_is_inclusive() {
  let s = store().await;
  s.save_processo(Processo::create("0001", "Janeiro", Some(data(2024, 1, 10))))
    .await
    .unwrap();
  s.save_processo(Processo::create("0002", "Março", Some(data(2024, 3, 5))))
    .await
    .unwrap();
  s.save_processo(Processo::create("0003", "Junho", Some(data(2024, 6, 30))))
    .await
    .unwrap();

  let page = s
    .list_processos_by_data_abertura(
      data(2024, 1, 10),
      data(2024, 3, 5),
      PageRequest::default(),
    )
    .await
    .unwrap();

  let numeros: Vec<_> = page.items.iter().map(|p| p.numero.clone()).collect();
  assert_eq!(page.total_items, 2);
  assert!(numeros.contains(&"0001".to_owned()));
  assert!(numeros.contains(&"0002".to_owned()));
}

#[tokio::test]
async fn list_processos_by_pessoa_and_by_cpf() {
  let s = store().await;

  let autora = s
    .save_pessoa(pessoa("Autora", "123.456.789-09"))
    .await
    .unwrap();
  let outra = s
    .save_pessoa(pessoa("Outra", "22222222222"))
    .await
    .unwrap();

  let mut com_autora = Processo::create("0001", "Com autora", None);
  com_autora.add_parte(ParteEnvolvida::create(
    autora.clone(),
    &com_autora,
    TipoParteEnvolvida::Autor,
  ));
  s.save_processo(com_autora).await.unwrap();

  let mut sem_autora = Processo::create("0002", "Sem autora", None);
  sem_autora.add_parte(ParteEnvolvida::create(
    outra,
    &sem_autora,
    TipoParteEnvolvida::Reu,
  ));
  s.save_processo(sem_autora).await.unwrap();

  let por_pessoa = s
    .list_processos_by_pessoa(autora.id, PageRequest::default())
    .await
    .unwrap();
  assert_eq!(por_pessoa.total_items, 1);
  assert_eq!(por_pessoa.items[0].numero, "0001");

  let por_cpf = s
    .list_processos_by_parte_cpf_cnpj(
      cpf("123.456.789-09"),
      PageRequest::default(),
    )
    .await
    .unwrap();
  assert_eq!(por_cpf.total_items, 1);
  assert_eq!(por_cpf.items[0].numero, "0001");
}

#[tokio::test]
async fn list_processos_pages_with_totals() {
  let s = store().await;
  for n in 1..=5 {
    s.save_processo(Processo::create(
      &format!("{n:04}"),
      "Processo",
      Some(data(2024, 1, n as u32)),
    ))
    .await
    .unwrap();
  }

  let request = PageRequest {
    size: 2,
    sort_by: Some("numero".into()),
    sort_direction: Some(SortDirection::Asc),
    ..PageRequest::default()
  };
  let page = s.list_processos(request).await.unwrap();
  assert_eq!(page.total_items, 5);
  assert_eq!(page.total_pages, 3);
  let numeros: Vec<_> = page.items.iter().map(|p| p.numero.clone()).collect();
  assert_eq!(numeros, ["0001", "0002"]);
}
