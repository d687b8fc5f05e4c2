//! Inkgate Store - storage layer for the booking policy engine
//!
//! This crate owns the canonical rule, policy-version, warning-template
//! and audit records:
//!
//! - [`traits`]: the store interfaces the SDK is written against
//! - [`memory`]: in-memory store for tests, development and single-node use
//! - [`audit`]: audit entry types and diff computation
//! - [`fs`]: YAML seed loader for bootstrapping a store from disk
//! - `postgres` (feature-gated): PostgreSQL-backed store
//!
//! Every mutation commits together with its audit entry: in the memory
//! store they share one critical section, in the Postgres store one
//! transaction.

pub mod audit;
pub mod error;
pub mod fs;
pub mod memory;
pub mod models;
pub mod traits;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use audit::{
    Actor, AuditAction, AuditEntry, AuditFilter, AuditPage, ChangeSet, FieldChange, NewAuditEntry,
};
pub use error::{StoreError, StoreResult};
pub use fs::{SeedLoader, SeedReport};
pub use memory::MemoryStore;
pub use models::{PolicySettingsDraft, RuleDraft, RulePatch};
pub use traits::{AuditLog, PolicyStore, PolicyVersionStore, RuleStore, WarningCatalog};

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
