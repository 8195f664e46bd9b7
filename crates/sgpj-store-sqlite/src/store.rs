//! [`SqliteStore`] — the SQLite implementation of [`SgpjStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, params};
use uuid::Uuid;

use sgpj_core::{
  pessoa::Pessoa,
  processo::{Processo, StatusProcesso},
  store::{Page, PageRequest, SgpjStore, SortDirection},
  vo::CpfCnpj,
};

use crate::{
  Error, Result,
  encode::{
    RawAcao, RawAggregate, RawParte, RawPessoa, RawProcesso, decode_aggregate,
    encode_date, encode_uuid,
  },
  schema::SCHEMA,
};

const PESSOA_COLUMNS: &str =
  "pessoa_id, nome_completo, cpf_cnpj, email, telefone";
const PROCESSO_COLUMNS: &str =
  "processo_id, numero, descricao, data_abertura, status";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A case store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row readers ─────────────────────────────────────────────────────────────

fn read_pessoa_row(row: &rusqlite::Row) -> rusqlite::Result<RawPessoa> {
  Ok(RawPessoa {
    pessoa_id:     row.get(0)?,
    nome_completo: row.get(1)?,
    cpf_cnpj:      row.get(2)?,
    email:         row.get(3)?,
    telefone:      row.get(4)?,
  })
}

fn read_processo_row(row: &rusqlite::Row) -> rusqlite::Result<RawProcesso> {
  Ok(RawProcesso {
    processo_id:   row.get(0)?,
    numero:        row.get(1)?,
    descricao:     row.get(2)?,
    data_abertura: row.get(3)?,
    status:        row.get(4)?,
  })
}

fn select_partes(
  conn: &rusqlite::Connection,
  processo_id: &str,
) -> rusqlite::Result<Vec<RawParte>> {
  let mut stmt = conn.prepare(
    "SELECT pe.parte_id, pe.processo_id, pe.tipo,
            ps.pessoa_id, ps.nome_completo, ps.cpf_cnpj, ps.email, ps.telefone
     FROM partes_envolvidas pe
     JOIN pessoas ps ON ps.pessoa_id = pe.pessoa_id
     WHERE pe.processo_id = ?1
     ORDER BY pe.ordinal",
  )?;
  stmt
    .query_map(params![processo_id], |row| {
      Ok(RawParte {
        parte_id:    row.get(0)?,
        processo_id: row.get(1)?,
        tipo:        row.get(2)?,
        pessoa:      RawPessoa {
          pessoa_id:     row.get(3)?,
          nome_completo: row.get(4)?,
          cpf_cnpj:      row.get(5)?,
          email:         row.get(6)?,
          telefone:      row.get(7)?,
        },
      })
    })?
    .collect()
}

fn select_acoes(
  conn: &rusqlite::Connection,
  processo_id: &str,
) -> rusqlite::Result<Vec<RawAcao>> {
  let mut stmt = conn.prepare(
    "SELECT acao_id, processo_id, tipo, descricao, data_registro
     FROM acoes
     WHERE processo_id = ?1
     ORDER BY ordinal",
  )?;
  stmt
    .query_map(params![processo_id], |row| {
      Ok(RawAcao {
        acao_id:       row.get(0)?,
        processo_id:   row.get(1)?,
        tipo:          row.get(2)?,
        descricao:     row.get(3)?,
        data_registro: row.get(4)?,
      })
    })?
    .collect()
}

fn load_aggregate(
  conn: &rusqlite::Connection,
  raw: RawProcesso,
) -> rusqlite::Result<RawAggregate> {
  let partes = select_partes(conn, &raw.processo_id)?;
  let acoes = select_acoes(conn, &raw.processo_id)?;
  Ok((raw, partes, acoes))
}

/// Run a count + page query pair and gather each page row's children.
/// `binds` covers the shared WHERE clause; limit and offset are appended.
fn page_of_processos(
  conn: &rusqlite::Connection,
  count_sql: &str,
  page_sql: &str,
  binds: &[&dyn rusqlite::ToSql],
  limit: i64,
  offset: i64,
) -> rusqlite::Result<(u64, Vec<RawAggregate>)> {
  let total: i64 = conn.query_row(count_sql, binds, |row| row.get(0))?;

  let mut all_binds: Vec<&dyn rusqlite::ToSql> = binds.to_vec();
  all_binds.push(&limit);
  all_binds.push(&offset);

  let mut stmt = conn.prepare(page_sql)?;
  let rows = stmt
    .query_map(&all_binds[..], read_processo_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut aggregates = Vec::with_capacity(rows.len());
  for raw in rows {
    aggregates.push(load_aggregate(conn, raw)?);
  }
  Ok((total as u64, aggregates))
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

// Sort columns are whitelisted; an unknown `sort_by` falls back to the
// default order. Both the wire name and the column name are accepted.

fn pessoa_order_clause(request: &PageRequest) -> String {
  let column = match request.sort_by.as_deref() {
    Some("nomeCompleto" | "nome_completo") => "nome_completo",
    Some("cpfCnpj" | "cpf_cnpj") => "cpf_cnpj",
    Some("email") => "email",
    _ => return "ORDER BY nome_completo ASC".into(),
  };
  format!("ORDER BY {column} {}", direction(request))
}

fn processo_order_clause(request: &PageRequest) -> String {
  let column = match request.sort_by.as_deref() {
    Some("numero") => "numero",
    Some("descricao") => "descricao",
    Some("dataAbertura" | "data_abertura") => "data_abertura",
    Some("statusProcesso" | "status") => "status",
    _ => return "ORDER BY data_abertura DESC, numero ASC".into(),
  };
  format!("ORDER BY {column} {}", direction(request))
}

fn direction(request: &PageRequest) -> &'static str {
  match request.sort_direction {
    Some(SortDirection::Desc) => "DESC",
    _ => "ASC",
  }
}

// ─── SgpjStore impl ──────────────────────────────────────────────────────────

impl SgpjStore for SqliteStore {
  type Error = Error;

  // ── Pessoas ───────────────────────────────────────────────────────────────

  async fn save_pessoa(&self, pessoa: Pessoa) -> Result<Pessoa> {
    let pessoa_id = encode_uuid(pessoa.id);
    let nome = pessoa.nome_completo.clone();
    let cpf_cnpj = pessoa.cpf_cnpj.value().to_owned();
    let email = pessoa.email.value().to_owned();
    let telefone = pessoa.telefone.numero().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pessoas (pessoa_id, nome_completo, cpf_cnpj, email, telefone)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(pessoa_id) DO UPDATE SET
             nome_completo = excluded.nome_completo,
             cpf_cnpj = excluded.cpf_cnpj,
             email = excluded.email,
             telefone = excluded.telefone",
          params![pessoa_id, nome, cpf_cnpj, email, telefone],
        )?;
        Ok(())
      })
      .await?;

    Ok(pessoa)
  }

  async fn get_pessoa(&self, id: Uuid) -> Result<Option<Pessoa>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPessoa> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PESSOA_COLUMNS} FROM pessoas WHERE pessoa_id = ?1"
              ),
              params![id_str],
              read_pessoa_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPessoa::into_pessoa).transpose()
  }

  async fn find_pessoa_by_cpf_cnpj(
    &self,
    cpf_cnpj: CpfCnpj,
  ) -> Result<Option<Pessoa>> {
    let cpf_str = cpf_cnpj.value().to_owned();

    let raw: Option<RawPessoa> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PESSOA_COLUMNS} FROM pessoas WHERE cpf_cnpj = ?1"
              ),
              params![cpf_str],
              read_pessoa_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPessoa::into_pessoa).transpose()
  }

  async fn exists_pessoa_by_cpf_cnpj(&self, cpf_cnpj: CpfCnpj) -> Result<bool> {
    let cpf_str = cpf_cnpj.value().to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM pessoas WHERE cpf_cnpj = ?1",
              params![cpf_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn list_pessoas(&self, request: PageRequest) -> Result<Page<Pessoa>> {
    let order = pessoa_order_clause(&request);
    let limit = request.size as i64;
    let offset = request.offset() as i64;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        let total: i64 =
          conn.query_row("SELECT COUNT(*) FROM pessoas", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {PESSOA_COLUMNS} FROM pessoas {order} LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(params![limit, offset], read_pessoa_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total as u64, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawPessoa::into_pessoa)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, &request, total))
  }

  async fn search_pessoas_by_nome(
    &self,
    nome: &str,
    request: PageRequest,
  ) -> Result<Page<Pessoa>> {
    let pattern = format!("%{nome}%");
    let order = pessoa_order_clause(&request);
    let limit = request.size as i64;
    let offset = request.offset() as i64;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM pessoas WHERE nome_completo LIKE ?1",
          params![pattern],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {PESSOA_COLUMNS} FROM pessoas
           WHERE nome_completo LIKE ?1 {order} LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(params![pattern, limit, offset], read_pessoa_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total as u64, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawPessoa::into_pessoa)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, &request, total))
  }

  // ── Processos ─────────────────────────────────────────────────────────────

  async fn save_processo(&self, processo: Processo) -> Result<Processo> {
    let processo_id = encode_uuid(processo.id);
    let numero = processo.numero.clone();
    let descricao = processo.descricao.clone();
    let data_abertura = encode_date(processo.data_abertura);
    let status = processo.status.as_str();

    // Partes reference already-persisted pessoas; only the link row and the
    // role are written here.
    let partes: Vec<(String, String, &'static str)> = processo
      .partes
      .iter()
      .map(|p| (encode_uuid(p.id), encode_uuid(p.pessoa.id), p.tipo.as_str()))
      .collect();

    let acoes: Vec<(String, &'static str, String, String)> = processo
      .acoes
      .iter()
      .map(|a| {
        (
          encode_uuid(a.id),
          a.tipo.as_str(),
          a.descricao.clone(),
          encode_date(a.data_registro),
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO processos (processo_id, numero, descricao, data_abertura, status)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(processo_id) DO UPDATE SET
             numero = excluded.numero,
             descricao = excluded.descricao,
             data_abertura = excluded.data_abertura,
             status = excluded.status",
          params![processo_id, numero, descricao, data_abertura, status],
        )?;

        // Children are replaced wholesale; the in-memory aggregate is the
        // truth for both membership and order.
        tx.execute(
          "DELETE FROM partes_envolvidas WHERE processo_id = ?1",
          params![processo_id],
        )?;
        tx.execute(
          "DELETE FROM acoes WHERE processo_id = ?1",
          params![processo_id],
        )?;

        for (ordinal, (parte_id, pessoa_id, tipo)) in partes.iter().enumerate()
        {
          tx.execute(
            "INSERT INTO partes_envolvidas (parte_id, processo_id, pessoa_id, tipo, ordinal)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![parte_id, processo_id, pessoa_id, tipo, ordinal as i64],
          )?;
        }

        for (ordinal, (acao_id, tipo, descricao, data_registro)) in
          acoes.iter().enumerate()
        {
          tx.execute(
            "INSERT INTO acoes (acao_id, processo_id, tipo, descricao, data_registro, ordinal)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![acao_id, processo_id, tipo, descricao, data_registro, ordinal as i64],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(processo)
  }

  async fn get_processo(&self, id: Uuid) -> Result<Option<Processo>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAggregate> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            &format!(
              "SELECT {PROCESSO_COLUMNS} FROM processos WHERE processo_id = ?1"
            ),
            params![id_str],
            read_processo_row,
          )
          .optional()?;

        match row {
          Some(raw) => Ok(Some(load_aggregate(conn, raw)?)),
          None => Ok(None),
        }
      })
      .await?;

    raw.map(decode_aggregate).transpose()
  }

  async fn exists_processo_by_numero(&self, numero: &str) -> Result<bool> {
    let numero = numero.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM processos WHERE numero = ?1",
              params![numero],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn list_processos(
    &self,
    request: PageRequest,
  ) -> Result<Page<Processo>> {
    let order = processo_order_clause(&request);
    let limit = request.size as i64;
    let offset = request.offset() as i64;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        Ok(page_of_processos(
          conn,
          "SELECT COUNT(*) FROM processos",
          &format!(
            "SELECT {PROCESSO_COLUMNS} FROM processos {order} LIMIT ? OFFSET ?"
          ),
          &[],
          limit,
          offset,
        )?)
      })
      .await?;

    let items = raws
      .into_iter()
      .map(decode_aggregate)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, &request, total))
  }

  async fn list_processos_by_status(
    &self,
    status: StatusProcesso,
    request: PageRequest,
  ) -> Result<Page<Processo>> {
    let status_str = status.as_str().to_owned();
    let order = processo_order_clause(&request);
    let limit = request.size as i64;
    let offset = request.offset() as i64;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        Ok(page_of_processos(
          conn,
          "SELECT COUNT(*) FROM processos WHERE status = ?",
          &format!(
            "SELECT {PROCESSO_COLUMNS} FROM processos WHERE status = ? \
             {order} LIMIT ? OFFSET ?"
          ),
          &[&status_str],
          limit,
          offset,
        )?)
      })
      .await?;

    let items = raws
      .into_iter()
      .map(decode_aggregate)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, &request, total))
  }

  async fn list_processos_by_data_abertura(
    &self,
    data_inicial: chrono::NaiveDate,
    data_final: chrono::NaiveDate,
    request: PageRequest,
  ) -> Result<Page<Processo>> {
    // ISO 8601 date strings compare lexicographically in date order.
    let inicial = encode_date(data_inicial);
    let fim = encode_date(data_final);
    let order = processo_order_clause(&request);
    let limit = request.size as i64;
    let offset = request.offset() as i64;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        Ok(page_of_processos(
          conn,
          "SELECT COUNT(*) FROM processos
           WHERE data_abertura >= ? AND data_abertura <= ?",
          &format!(
            "SELECT {PROCESSO_COLUMNS} FROM processos
             WHERE data_abertura >= ? AND data_abertura <= ?
             {order} LIMIT ? OFFSET ?"
          ),
          &[&inicial, &fim],
          limit,
          offset,
        )?)
      })
      .await?;

    let items = raws
      .into_iter()
      .map(decode_aggregate)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, &request, total))
  }

  async fn list_processos_by_pessoa(
    &self,
    pessoa_id: Uuid,
    request: PageRequest,
  ) -> Result<Page<Processo>> {
    let pessoa_id_str = encode_uuid(pessoa_id);
    let order = processo_order_clause(&request);
    let limit = request.size as i64;
    let offset = request.offset() as i64;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        Ok(page_of_processos(
          conn,
          "SELECT COUNT(*) FROM processos p
           WHERE EXISTS (SELECT 1 FROM partes_envolvidas pe
                         WHERE pe.processo_id = p.processo_id
                           AND pe.pessoa_id = ?)",
          &format!(
            "SELECT {PROCESSO_COLUMNS} FROM processos
             WHERE EXISTS (SELECT 1 FROM partes_envolvidas pe
                           WHERE pe.processo_id = processos.processo_id
                             AND pe.pessoa_id = ?)
             {order} LIMIT ? OFFSET ?"
          ),
          &[&pessoa_id_str],
          limit,
          offset,
        )?)
      })
      .await?;

    let items = raws
      .into_iter()
      .map(decode_aggregate)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, &request, total))
  }

  async fn list_processos_by_parte_cpf_cnpj(
    &self,
    cpf_cnpj: CpfCnpj,
    request: PageRequest,
  ) -> Result<Page<Processo>> {
    let cpf_str = cpf_cnpj.value().to_owned();
    let order = processo_order_clause(&request);
    let limit = request.size as i64;
    let offset = request.offset() as i64;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        Ok(page_of_processos(
          conn,
          "SELECT COUNT(*) FROM processos p
           WHERE EXISTS (SELECT 1 FROM partes_envolvidas pe
                         JOIN pessoas ps ON ps.pessoa_id = pe.pessoa_id
                         WHERE pe.processo_id = p.processo_id
                           AND ps.cpf_cnpj = ?)",
          &format!(
            "SELECT {PROCESSO_COLUMNS} FROM processos
             WHERE EXISTS (SELECT 1 FROM partes_envolvidas pe
                           JOIN pessoas ps ON ps.pessoa_id = pe.pessoa_id
                           WHERE pe.processo_id = processos.processo_id
                             AND ps.cpf_cnpj = ?)
             {order} LIMIT ? OFFSET ?"
          ),
          &[&cpf_str],
          limit,
          offset,
        )?)
      })
      .await?;

    let items = raws
      .into_iter()
      .map(decode_aggregate)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, &request, total))
  }
}
