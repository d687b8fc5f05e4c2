//! Core trait definitions for the storage layer
//!
//! Four narrow interfaces plus a composite:
//!
//! - [`RuleStore`]: CRUD over policy rules
//! - [`PolicyVersionStore`]: append-only policy-settings versions
//! - [`WarningCatalog`]: warning template lookup and upsert
//! - [`AuditLog`]: append and query audit facts
//! - [`PolicyStore`]: all of the above, what the SDK is written against
//!
//! Every mutation writes exactly one audit entry, atomically with the
//! mutation itself. All implementations must be `Send + Sync` for use
//! across async tasks.

use async_trait::async_trait;
use inkgate_core::{PolicyRule, PolicySettings, Scope, ScopeSelector, WarningTemplate};

use crate::audit::{Actor, AuditEntry, AuditFilter, AuditPage, NewAuditEntry};
use crate::error::StoreResult;
use crate::models::{PolicySettingsDraft, RuleDraft, RulePatch};

/// CRUD over policy rules
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Create a rule; fails with `DuplicateRuleKey` when the key is taken
    /// within the draft's scope
    async fn create_rule(&self, draft: RuleDraft, actor: &Actor) -> StoreResult<PolicyRule>;

    /// Apply a partial update to a rule
    async fn update_rule(&self, id: u64, patch: RulePatch, actor: &Actor)
        -> StoreResult<PolicyRule>;

    /// Enable or disable a rule
    async fn set_rule_enabled(
        &self,
        id: u64,
        enabled: bool,
        actor: &Actor,
    ) -> StoreResult<PolicyRule>;

    /// Delete a rule
    async fn delete_rule(&self, id: u64, actor: &Actor, reason: Option<String>)
        -> StoreResult<()>;

    /// Fetch a rule by id
    async fn get_rule(&self, id: u64) -> StoreResult<PolicyRule>;

    /// All rules, for the admin surface
    async fn list_rules(&self) -> StoreResult<Vec<PolicyRule>>;

    /// Enabled rules whose scope applies to the selector; the resolver's
    /// candidate set
    async fn rules_for(&self, selector: &ScopeSelector) -> StoreResult<Vec<PolicyRule>>;
}

/// Append-only policy-settings versions, exactly one active per scope
#[async_trait]
pub trait PolicyVersionStore: Send + Sync {
    /// Create the next version for a scope, deactivating the current one
    /// in the same critical section/transaction
    ///
    /// `expected_head` is an optimistic check: when provided and the
    /// scope's head version differs, the call fails with
    /// `VersionConflict` instead of silently building on a head the
    /// caller never saw.
    async fn create_version(
        &self,
        scope: Scope,
        draft: PolicySettingsDraft,
        actor: &Actor,
        expected_head: Option<u32>,
    ) -> StoreResult<PolicySettings>;

    /// The scope's active version, if any
    async fn get_active_version(&self, scope: &Scope) -> StoreResult<Option<PolicySettings>>;

    /// All versions for a scope, oldest first
    async fn list_versions(&self, scope: &Scope) -> StoreResult<Vec<PolicySettings>>;
}

/// Read-mostly warning template catalog
#[async_trait]
pub trait WarningCatalog: Send + Sync {
    /// Look up a template by key
    async fn get_warning(&self, key: &str) -> StoreResult<Option<WarningTemplate>>;

    /// Insert or replace a template
    async fn put_warning(
        &self,
        template: WarningTemplate,
        actor: &Actor,
    ) -> StoreResult<WarningTemplate>;

    /// All templates, for the admin surface
    async fn list_warnings(&self) -> StoreResult<Vec<WarningTemplate>>;
}

/// Append-only audit log
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append a fact; entries are never mutated or deleted once written
    async fn record(&self, entry: NewAuditEntry) -> StoreResult<AuditEntry>;

    /// Query facts, newest first, paginated
    async fn query(&self, filter: AuditFilter) -> StoreResult<AuditPage>;
}

/// The full storage surface the SDK is written against
pub trait PolicyStore: RuleStore + PolicyVersionStore + WarningCatalog + AuditLog {}

impl<T> PolicyStore for T where T: RuleStore + PolicyVersionStore + WarningCatalog + AuditLog {}
