//! Core domain model for musicvault.
//!
//! This crate defines the repertoire data model (Raga, Bandish, DiaryEntry,
//! Karyakram and its setlist rows), the SQLite schema, the persistence
//! gateway the rest of the workspace talks to, the catalog services built on
//! top of it, and the shared-secret access gate.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod schema;

pub use access::{AccessGate, Session};
pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{Gateway, MemoryGateway, Record, RecordId, SqliteGateway, Table};
