//! Domainforge
//!
//! A domain-schema compiler: one abstract entity/operation model in, four
//! consistent textual artifacts out. The compiler is stateless between
//! runs and every backend derives names and types from the same model, so
//! the artifacts cannot drift apart in meaning.
//!
//! ## Features
//!
//! - **Tolerant import**: malformed entries are skipped with warnings,
//!   only a missing top-level container aborts
//! - **Total type mapping**: every backend maps unknown types to its
//!   fallback token instead of failing
//! - **Deterministic output**: declaration order follows the model, and
//!   repeated runs are byte-for-byte identical (checksummed)
//! - **Clean aborts**: fatal errors never publish partial artifacts
//!
//! ## Pipeline
//!
//! ```text
//! source document (schema-document | domain-description)
//!        │  import (tolerant, accumulates warnings)
//!        ▼
//!   DomainModel ── validate (relationship + reference targets)
//!        │
//!        ├─ validation backend ──▶ validators.ts
//!        ├─ relational backend ──▶ schema.sql
//!        ├─ interface backend ───▶ types.ts
//!        └─ contract backend ────▶ api.tsp
//! ```

pub mod checksum;
pub mod compiler;
pub mod config;
pub mod emit;
pub mod error;
pub mod import;
pub mod model;
pub mod report;

pub use checksum::Checksum;
pub use compiler::{compile, CompileState, Compiler, DirectorySink, MemorySink, OutputSink};
pub use config::CompilerConfig;
pub use emit::{backends, render, Artifact, Backend, TypeMap};
pub use error::{CompileError, Result};
pub use import::{import, load_document, Imported};
pub use model::{
    Cardinality, DomainModel, Entity, Operation, OperationKind, OperationOutput, Property,
    PropertyType, Relationship,
};
pub use report::{CompileReport, Warning, WarningKind};
