//! Core domain types and trait definitions for the sgpj case-management
//! backend: value objects, the Pessoa and Processo entities, the processo
//! lifecycle state machine, and the persistence abstraction.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod pessoa;
pub mod processo;
pub mod status;
pub mod store;
pub mod vo;

pub use error::{Error, Result};
