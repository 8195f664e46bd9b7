//! SQL schema for the sgpj SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Uniqueness of `cpf_cnpj` and `numero` is enforced here; the api layer's
/// exists-checks are only the fast path for friendly conflict errors.
/// Child rows carry an `ordinal` column so collection insertion order
/// survives a reload.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS pessoas (
    pessoa_id     TEXT PRIMARY KEY,
    nome_completo TEXT NOT NULL,
    cpf_cnpj      TEXT NOT NULL UNIQUE,  -- normalised digits, length 11 or 14
    email         TEXT NOT NULL,         -- stored lowercase
    telefone      TEXT NOT NULL          -- normalised digits, length 10 or 11
);

CREATE TABLE IF NOT EXISTS processos (
    processo_id   TEXT PRIMARY KEY,
    numero        TEXT NOT NULL UNIQUE,
    descricao     TEXT NOT NULL,
    data_abertura TEXT NOT NULL,         -- ISO 8601 date
    status        TEXT NOT NULL          -- 'ATIVO' | 'SUSPENSO' | 'ARQUIVADO'
);

CREATE TABLE IF NOT EXISTS partes_envolvidas (
    parte_id    TEXT PRIMARY KEY,
    processo_id TEXT NOT NULL REFERENCES processos(processo_id) ON DELETE CASCADE,
    pessoa_id   TEXT NOT NULL REFERENCES pessoas(pessoa_id),
    tipo        TEXT NOT NULL,           -- 'AUTOR' | 'REU' | 'ADVOGADO'
    ordinal     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS acoes (
    acao_id       TEXT PRIMARY KEY,
    processo_id   TEXT NOT NULL REFERENCES processos(processo_id) ON DELETE CASCADE,
    tipo          TEXT NOT NULL,         -- 'PETICAO' | 'AUDIENCIA' | 'SENTENCA' | 'DESISTENCIA'
    descricao     TEXT NOT NULL,
    data_registro TEXT NOT NULL,         -- ISO 8601 date
    ordinal       INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS pessoas_nome_idx      ON pessoas(nome_completo);
CREATE INDEX IF NOT EXISTS processos_status_idx  ON processos(status);
CREATE INDEX IF NOT EXISTS processos_data_idx    ON processos(data_abertura);
CREATE INDEX IF NOT EXISTS partes_processo_idx   ON partes_envolvidas(processo_id);
CREATE INDEX IF NOT EXISTS partes_pessoa_idx     ON partes_envolvidas(pessoa_id);
CREATE INDEX IF NOT EXISTS acoes_processo_idx    ON acoes(processo_id);

PRAGMA user_version = 1;
";
