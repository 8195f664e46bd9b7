//! Value objects guarding every mutation: CPF/CNPJ, email, and phone.
//!
//! Each constructor takes raw (possibly absent) user input and either returns
//! a validated, normalised instance or fails with
//! [`Error::InvalidField`](crate::Error::InvalidField). Instances are
//! immutable after construction; equality is by normalised value.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::{Error, Result};

// ─── CpfCnpj ─────────────────────────────────────────────────────────────────

/// A Brazilian taxpayer identifier: CPF (11 digits) or CNPJ (14 digits).
/// Holds only the digits; all punctuation is stripped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CpfCnpj(String);

impl CpfCnpj {
  pub fn new(value: Option<&str>) -> Result<Self> {
    let value = value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
      Error::InvalidField("CPF/CNPJ não pode ser nulo ou vazio.".into())
    })?;

    let digits: String =
      value.chars().filter(char::is_ascii_digit).collect();

    if digits.len() != 11 && digits.len() != 14 {
      return Err(Error::InvalidField(
        "CPF/CNPJ inválido: deve ter 11 ou 14 dígitos.".into(),
      ));
    }

    Ok(Self(digits))
  }

  /// The normalised digit string (length 11 or 14).
  pub fn value(&self) -> &str { &self.0 }
}

impl fmt::Display for CpfCnpj {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Email ───────────────────────────────────────────────────────────────────

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[\w.-]+@[\w.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// An email address, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
  pub fn new(value: Option<&str>) -> Result<Self> {
    let value = value
      .ok_or_else(|| Error::InvalidField("Email não pode ser nulo.".into()))?;

    if !EMAIL_PATTERN.is_match(value) {
      return Err(Error::InvalidField("Email inválido.".into()));
    }

    Ok(Self(value.to_lowercase()))
  }

  pub fn value(&self) -> &str { &self.0 }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Telefone ────────────────────────────────────────────────────────────────

/// A Brazilian phone number, normalised to 10 (landline) or 11 (mobile)
/// digits including the area code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Telefone(String);

impl Telefone {
  pub fn new(value: Option<&str>) -> Result<Self> {
    let value = value.ok_or_else(|| {
      Error::InvalidField("Telefone não pode ser nulo.".into())
    })?;

    let digits: String =
      value.chars().filter(char::is_ascii_digit).collect();

    if digits.len() != 10 && digits.len() != 11 {
      return Err(Error::InvalidField("Telefone inválido.".into()));
    }

    Ok(Self(digits))
  }

  /// The normalised digit string (length 10 or 11).
  pub fn numero(&self) -> &str { &self.0 }

  /// Render as `(DD) DDDD-DDDD` (10 digits) or `(DD) DDDDD-DDDD` (11).
  pub fn formatado(&self) -> String {
    let n = &self.0;
    match n.len() {
      10 => format!("({}) {}-{}", &n[..2], &n[2..6], &n[6..]),
      11 => format!("({}) {}-{}", &n[..2], &n[2..7], &n[7..]),
      _ => n.clone(),
    }
  }
}

impl fmt::Display for Telefone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.formatado())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  // ── CpfCnpj ───────────────────────────────────────────────────────────

  #[test]
  fn cpf_strips_punctuation() {
    let cpf = CpfCnpj::new(Some("123.456.789-09")).unwrap();
    assert_eq!(cpf.value(), "12345678909");
  }

  #[test]
  fn cnpj_strips_punctuation() {
    let cnpj = CpfCnpj::new(Some("12.345.678/0001-95")).unwrap();
    assert_eq!(cnpj.value(), "12345678000195");
  }

  #[test]
  fn cpf_cnpj_rejects_wrong_digit_count() {
    let err = CpfCnpj::new(Some("12345")).unwrap_err();
    assert_eq!(
      err.to_string(),
      "CPF/CNPJ inválido: deve ter 11 ou 14 dígitos."
    );
  }

  #[test]
  fn cpf_cnpj_rejects_missing_and_blank() {
    for input in [None, Some(""), Some("   ")] {
      let err = CpfCnpj::new(input).unwrap_err();
      assert_eq!(err.to_string(), "CPF/CNPJ não pode ser nulo ou vazio.");
    }
  }

  #[test]
  fn cpf_cnpj_equality_is_by_normalised_value() {
    let a = CpfCnpj::new(Some("123.456.789-09")).unwrap();
    let b = CpfCnpj::new(Some("12345678909")).unwrap();
    assert_eq!(a, b);
  }

  // ── Email ─────────────────────────────────────────────────────────────

  #[test]
  fn email_is_lowercased() {
    let email = Email::new(Some("Fulano.Silva@Example.COM")).unwrap();
    assert_eq!(email.value(), "fulano.silva@example.com");
  }

  #[test]
  fn email_normalisation_is_idempotent() {
    let once = Email::new(Some("Fulano@Example.com")).unwrap();
    let twice = Email::new(Some(once.value())).unwrap();
    assert_eq!(once, twice);
  }

  #[test]
  fn email_rejects_missing() {
    let err = Email::new(None).unwrap_err();
    assert_eq!(err.to_string(), "Email não pode ser nulo.");
  }

  #[test]
  fn email_rejects_malformed() {
    for input in ["fulano", "fulano@", "@example.com", "fulano@example", "a@b.c"]
    {
      let err = Email::new(Some(input)).unwrap_err();
      assert_eq!(err.to_string(), "Email inválido.", "input: {input:?}");
    }
  }

  // ── Telefone ──────────────────────────────────────────────────────────

  #[test]
  fn telefone_strips_punctuation() {
    let tel = Telefone::new(Some("(11) 98765-4321")).unwrap();
    assert_eq!(tel.numero(), "11987654321");
  }

  #[test]
  fn telefone_formats_ten_digits() {
    let tel = Telefone::new(Some("1187654321")).unwrap();
    assert_eq!(tel.formatado(), "(11) 8765-4321");
  }

  #[test]
  fn telefone_formats_eleven_digits() {
    let tel = Telefone::new(Some("11987654321")).unwrap();
    assert_eq!(tel.formatado(), "(11) 98765-4321");
  }

  #[test]
  fn telefone_rejects_wrong_digit_count() {
    let err = Telefone::new(Some("123")).unwrap_err();
    assert_eq!(err.to_string(), "Telefone inválido.");
  }

  #[test]
  fn telefone_rejects_missing() {
    let err = Telefone::new(None).unwrap_err();
    assert_eq!(err.to_string(), "Telefone não pode ser nulo.");
  }

  #[test]
  fn telefone_display_is_formatted() {
    let tel = Telefone::new(Some("11987654321")).unwrap();
    assert_eq!(tel.to_string(), "(11) 98765-4321");
  }
}
