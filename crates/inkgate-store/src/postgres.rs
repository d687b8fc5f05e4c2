//! PostgreSQL-backed policy store
//!
//! Each mutation and its audit entry share one transaction, so they
//! commit together or not at all. The "unique rule_key per scope" and
//! "one row per (scope, version)" invariants are backed by unique
//! indexes; a concurrent writer that loses the race gets a retryable
//! conflict error, never a silent overwrite.

use async_trait::async_trait;
use chrono::Utc;
use inkgate_core::{
    PolicyRule, PolicySettings, RuleAction, Scope, ScopeSelector, Severity, WarningTemplate,
};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, Row, Transaction};

use crate::audit::{
    self, Actor, AuditAction, AuditEntry, AuditFilter, AuditPage, ChangeSet, NewAuditEntry,
};
use crate::error::{StoreError, StoreResult};
use crate::models::{PolicySettingsDraft, RuleDraft, RulePatch};
use crate::traits::{AuditLog, PolicyVersionStore, RuleStore, WarningCatalog};

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS policy_rules (
        id BIGSERIAL PRIMARY KEY,
        scope_level TEXT NOT NULL,
        scope_id TEXT NOT NULL DEFAULT '',
        rule_key TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        priority INTEGER NOT NULL,
        enabled BOOLEAN NOT NULL,
        condition JSONB NOT NULL,
        action JSONB NOT NULL,
        warning_key TEXT,
        explain_public TEXT NOT NULL DEFAULT '',
        explain_internal TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT policy_rules_scope_key UNIQUE (scope_level, scope_id, rule_key)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS policy_versions (
        id BIGSERIAL PRIMARY KEY,
        scope_level TEXT NOT NULL,
        scope_id TEXT NOT NULL DEFAULT '',
        version INTEGER NOT NULL,
        is_active BOOLEAN NOT NULL,
        settings JSONB NOT NULL,
        summary_text TEXT NOT NULL DEFAULT '',
        full_text TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT policy_versions_scope_version UNIQUE (scope_level, scope_id, version)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS warning_templates (
        key TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        client_message TEXT NOT NULL,
        severity TEXT NOT NULL,
        enabled BOOLEAN NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS audit_entries (
        id BIGSERIAL PRIMARY KEY,
        entity_type TEXT NOT NULL,
        entity_id TEXT NOT NULL,
        action TEXT NOT NULL,
        changed_by TEXT NOT NULL,
        changed_by_role TEXT NOT NULL,
        changes JSONB,
        reason TEXT,
        metadata JSONB NOT NULL,
        occurred_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE INDEX IF NOT EXISTS audit_entries_occurred_at
        ON audit_entries (occurred_at DESC, id DESC)"#,
];

/// PostgreSQL policy store
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and create the schema if it does not exist yet
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        let store = Self::with_pool(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Use an existing pool; the schema is assumed to exist
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if missing
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn fetch_rule_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: u64,
    ) -> StoreResult<PolicyRule> {
        let row = sqlx::query("SELECT * FROM policy_rules WHERE id = $1 FOR UPDATE")
            .bind(id as i64)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(StoreError::RuleNotFound(id))?;
        rule_from_row(&row)
    }

    async fn store_rule_row(
        tx: &mut Transaction<'_, Postgres>,
        rule: &PolicyRule,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE policy_rules SET name = $2, description = $3, priority = $4, \
             enabled = $5, condition = $6, action = $7, warning_key = $8, \
             explain_public = $9, explain_internal = $10, updated_at = $11 WHERE id = $1",
        )
        .bind(rule.id as i64)
        .bind(&rule.name)
        .bind(&rule.description)
        .bind(rule.priority)
        .bind(rule.enabled)
        .bind(serde_json::to_value(&rule.condition)?)
        .bind(serde_json::to_value(&rule.action)?)
        .bind(&rule.warning_key)
        .bind(&rule.explain_public)
        .bind(&rule.explain_internal)
        .bind(rule.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn insert_audit(
        tx: &mut Transaction<'_, Postgres>,
        entry: NewAuditEntry,
    ) -> StoreResult<AuditEntry> {
        let occurred_at = Utc::now();
        let changes_json = entry
            .changes
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let row = sqlx::query(
            "INSERT INTO audit_entries \
             (entity_type, entity_id, action, changed_by, changed_by_role, changes, reason, metadata, occurred_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(entry.action.as_str())
        .bind(&entry.changed_by)
        .bind(&entry.changed_by_role)
        .bind(changes_json)
        .bind(&entry.reason)
        .bind(&entry.metadata)
        .bind(occurred_at)
        .fetch_one(&mut **tx)
        .await?;

        let id: i64 = row.try_get("id")?;
        Ok(AuditEntry {
            id: id as u64,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            action: entry.action,
            changed_by: entry.changed_by,
            changed_by_role: entry.changed_by_role,
            changes: entry.changes,
            reason: entry.reason,
            metadata: entry.metadata,
            occurred_at,
        })
    }
}

#[async_trait]
impl RuleStore for PostgresStore {
    async fn create_rule(&self, draft: RuleDraft, actor: &Actor) -> StoreResult<PolicyRule> {
        draft.validate()?;
        let now = Utc::now();
        let (scope_level, scope_id) = scope_parts(&draft.scope);

        let mut tx = self.pool.begin().await?;

        let insert = sqlx::query(
            "INSERT INTO policy_rules \
             (scope_level, scope_id, rule_key, name, description, priority, enabled, condition, \
              action, warning_key, explain_public, explain_internal, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13) RETURNING id",
        )
        .bind(scope_level)
        .bind(scope_id)
        .bind(&draft.rule_key)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.priority)
        .bind(draft.enabled)
        .bind(serde_json::to_value(&draft.condition)?)
        .bind(serde_json::to_value(&draft.action)?)
        .bind(&draft.warning_key)
        .bind(&draft.explain_public)
        .bind(&draft.explain_internal)
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        let row = match insert {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::DuplicateRuleKey {
                    scope: draft.scope.key(),
                    rule_key: draft.rule_key,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let id: i64 = row.try_get("id")?;
        let rule = draft.into_rule(id as u64, now);

        Self::insert_audit(
            &mut tx,
            NewAuditEntry::new(
                audit::entity::RULE,
                rule.id.to_string(),
                AuditAction::Created,
                actor,
            )
            .with_changes(ChangeSet::Snapshot(audit::rule_snapshot(&rule))),
        )
        .await?;

        tx.commit().await?;
        tracing::info!(rule_id = rule.id, rule_key = rule.rule_key.as_str(), "rule created");
        Ok(rule)
    }

    async fn update_rule(
        &self,
        id: u64,
        patch: RulePatch,
        actor: &Actor,
    ) -> StoreResult<PolicyRule> {
        let mut tx = self.pool.begin().await?;

        let mut rule = Self::fetch_rule_for_update(&mut tx, id).await?;
        let old_view = audit::rule_diff_view(&rule);

        patch.apply(&mut rule, Utc::now());
        rule.validate()?;

        Self::store_rule_row(&mut tx, &rule).await?;

        let diff = audit::diff_fields(&old_view, &audit::rule_diff_view(&rule));
        Self::insert_audit(
            &mut tx,
            NewAuditEntry::new(
                audit::entity::RULE,
                id.to_string(),
                AuditAction::Updated,
                actor,
            )
            .with_changes(ChangeSet::Diff(diff)),
        )
        .await?;

        tx.commit().await?;
        Ok(rule)
    }

    async fn set_rule_enabled(
        &self,
        id: u64,
        enabled: bool,
        actor: &Actor,
    ) -> StoreResult<PolicyRule> {
        let mut tx = self.pool.begin().await?;

        let mut rule = Self::fetch_rule_for_update(&mut tx, id).await?;
        let old_view = audit::rule_diff_view(&rule);

        rule.enabled = enabled;
        rule.updated_at = Utc::now();
        Self::store_rule_row(&mut tx, &rule).await?;

        let diff = audit::diff_fields(&old_view, &audit::rule_diff_view(&rule));
        Self::insert_audit(
            &mut tx,
            NewAuditEntry::new(
                audit::entity::RULE,
                id.to_string(),
                AuditAction::Updated,
                actor,
            )
            .with_changes(ChangeSet::Diff(diff)),
        )
        .await?;

        tx.commit().await?;
        Ok(rule)
    }

    async fn delete_rule(
        &self,
        id: u64,
        actor: &Actor,
        reason: Option<String>,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let rule = Self::fetch_rule_for_update(&mut tx, id).await?;
        sqlx::query("DELETE FROM policy_rules WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *tx)
            .await?;

        let mut entry = NewAuditEntry::new(
            audit::entity::RULE,
            id.to_string(),
            AuditAction::Deleted,
            actor,
        )
        .with_changes(ChangeSet::Snapshot(audit::rule_snapshot(&rule)));
        if let Some(reason) = reason {
            entry = entry.with_reason(reason);
        }
        Self::insert_audit(&mut tx, entry).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_rule(&self, id: u64) -> StoreResult<PolicyRule> {
        let row = sqlx::query("SELECT * FROM policy_rules WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::RuleNotFound(id))?;
        rule_from_row(&row)
    }

    async fn list_rules(&self) -> StoreResult<Vec<PolicyRule>> {
        let rows = sqlx::query("SELECT * FROM policy_rules ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(rule_from_row).collect()
    }

    async fn rules_for(&self, selector: &ScopeSelector) -> StoreResult<Vec<PolicyRule>> {
        let rows = sqlx::query(
            "SELECT * FROM policy_rules WHERE enabled \
             AND (scope_level = 'global' \
                  OR (scope_level = 'workspace' AND scope_id = $1) \
                  OR (scope_level = 'artist' AND scope_id = $2)) \
             ORDER BY id",
        )
        .bind(&selector.workspace_id)
        .bind(&selector.artist_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(rule_from_row).collect()
    }
}

#[async_trait]
impl PolicyVersionStore for PostgresStore {
    async fn create_version(
        &self,
        scope: Scope,
        draft: PolicySettingsDraft,
        actor: &Actor,
        expected_head: Option<u32>,
    ) -> StoreResult<PolicySettings> {
        let scope_key = scope.key();
        let (scope_level, scope_id) = scope_parts(&scope);
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        // Lock the head row so concurrent saves for this scope serialize;
        // the unique (scope, version) index covers the empty-history race.
        let head: Option<i32> = sqlx::query(
            "SELECT version FROM policy_versions \
             WHERE scope_level = $1 AND scope_id = $2 \
             ORDER BY version DESC LIMIT 1 FOR UPDATE",
        )
        .bind(scope_level)
        .bind(scope_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(|row| row.try_get("version"))
        .transpose()?;

        let active_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM policy_versions \
             WHERE scope_level = $1 AND scope_id = $2 AND is_active",
        )
        .bind(scope_level)
        .bind(scope_id)
        .fetch_one(&mut *tx)
        .await?;
        if active_count > 1 {
            return Err(StoreError::Integrity(format!(
                "{} active versions for scope {}",
                active_count, scope_key
            )));
        }

        let head = head.map(|version| version as u32);
        if let Some(expected) = expected_head {
            if head != Some(expected) {
                return Err(StoreError::VersionConflict {
                    scope: scope_key,
                    expected: Some(expected),
                    found: head,
                });
            }
        }
        let next_version = head.unwrap_or(0) + 1;

        sqlx::query(
            "UPDATE policy_versions SET is_active = FALSE \
             WHERE scope_level = $1 AND scope_id = $2 AND is_active",
        )
        .bind(scope_level)
        .bind(scope_id)
        .execute(&mut *tx)
        .await?;

        let insert = sqlx::query(
            "INSERT INTO policy_versions \
             (scope_level, scope_id, version, is_active, settings, summary_text, full_text, created_at) \
             VALUES ($1, $2, $3, TRUE, $4, $5, $6, $7) RETURNING id",
        )
        .bind(scope_level)
        .bind(scope_id)
        .bind(next_version as i32)
        .bind(serde_json::to_value(&draft.settings)?)
        .bind(&draft.summary_text)
        .bind(&draft.full_text)
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        let row = match insert {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::VersionConflict {
                    scope: scope_key,
                    expected: expected_head,
                    found: head,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let id: i64 = row.try_get("id")?;
        let settings = PolicySettings {
            id: id as u64,
            scope,
            version: next_version,
            is_active: true,
            settings: draft.settings,
            summary_text: draft.summary_text,
            full_text: draft.full_text,
            created_at: now,
        };

        Self::insert_audit(
            &mut tx,
            NewAuditEntry::new(
                audit::entity::POLICY_VERSION,
                scope_key.clone(),
                AuditAction::Created,
                actor,
            )
            .with_changes(ChangeSet::Snapshot(audit::settings_snapshot(&settings))),
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            scope = scope_key.as_str(),
            version = settings.version,
            "policy version created"
        );
        Ok(settings)
    }

    async fn get_active_version(&self, scope: &Scope) -> StoreResult<Option<PolicySettings>> {
        let (scope_level, scope_id) = scope_parts(scope);
        let rows = sqlx::query(
            "SELECT * FROM policy_versions \
             WHERE scope_level = $1 AND scope_id = $2 AND is_active",
        )
        .bind(scope_level)
        .bind(scope_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.len() > 1 {
            tracing::error!(
                scope = scope.key().as_str(),
                count = rows.len(),
                "multiple active policy versions detected"
            );
            return Err(StoreError::Integrity(format!(
                "{} active versions for scope {}",
                rows.len(),
                scope.key()
            )));
        }
        rows.first().map(settings_from_row).transpose()
    }

    async fn list_versions(&self, scope: &Scope) -> StoreResult<Vec<PolicySettings>> {
        let (scope_level, scope_id) = scope_parts(scope);
        let rows = sqlx::query(
            "SELECT * FROM policy_versions \
             WHERE scope_level = $1 AND scope_id = $2 ORDER BY version",
        )
        .bind(scope_level)
        .bind(scope_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(settings_from_row).collect()
    }
}

#[async_trait]
impl WarningCatalog for PostgresStore {
    async fn get_warning(&self, key: &str) -> StoreResult<Option<WarningTemplate>> {
        let row = sqlx::query("SELECT * FROM warning_templates WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(warning_from_row).transpose()
    }

    async fn put_warning(
        &self,
        template: WarningTemplate,
        actor: &Actor,
    ) -> StoreResult<WarningTemplate> {
        let mut tx = self.pool.begin().await?;

        let previous = sqlx::query("SELECT * FROM warning_templates WHERE key = $1 FOR UPDATE")
            .bind(&template.key)
            .fetch_optional(&mut *tx)
            .await?
            .as_ref()
            .map(warning_from_row)
            .transpose()?;

        sqlx::query(
            "INSERT INTO warning_templates (key, title, client_message, severity, enabled) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (key) DO UPDATE SET title = $2, client_message = $3, severity = $4, enabled = $5",
        )
        .bind(&template.key)
        .bind(&template.title)
        .bind(&template.client_message)
        .bind(severity_to_str(template.severity))
        .bind(template.enabled)
        .execute(&mut *tx)
        .await?;

        let entry = match previous {
            Some(previous) => NewAuditEntry::new(
                audit::entity::WARNING,
                template.key.clone(),
                AuditAction::Updated,
                actor,
            )
            .with_changes(ChangeSet::Diff(audit::diff_fields(
                &audit::warning_diff_view(&previous),
                &audit::warning_diff_view(&template),
            ))),
            None => NewAuditEntry::new(
                audit::entity::WARNING,
                template.key.clone(),
                AuditAction::Created,
                actor,
            ),
        };
        Self::insert_audit(&mut tx, entry).await?;

        tx.commit().await?;
        Ok(template)
    }

    async fn list_warnings(&self) -> StoreResult<Vec<WarningTemplate>> {
        let rows = sqlx::query("SELECT * FROM warning_templates ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(warning_from_row).collect()
    }
}

#[async_trait]
impl AuditLog for PostgresStore {
    async fn record(&self, entry: NewAuditEntry) -> StoreResult<AuditEntry> {
        let mut tx = self.pool.begin().await?;
        let recorded = Self::insert_audit(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(recorded)
    }

    async fn query(&self, filter: AuditFilter) -> StoreResult<AuditPage> {
        let action = filter.action.map(|action| action.as_str().to_string());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM audit_entries \
             WHERE ($1::text IS NULL OR entity_type = $1) \
               AND ($2::text IS NULL OR action = $2) \
               AND ($3::text IS NULL OR entity_id ILIKE '%' || $3 || '%' \
                    OR reason ILIKE '%' || $3 || '%')",
        )
        .bind(&filter.entity_type)
        .bind(&action)
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            "SELECT * FROM audit_entries \
             WHERE ($1::text IS NULL OR entity_type = $1) \
               AND ($2::text IS NULL OR action = $2) \
               AND ($3::text IS NULL OR entity_id ILIKE '%' || $3 || '%' \
                    OR reason ILIKE '%' || $3 || '%') \
             ORDER BY occurred_at DESC, id DESC LIMIT $4 OFFSET $5",
        )
        .bind(&filter.entity_type)
        .bind(&action)
        .bind(&filter.search)
        .bind(filter.limit as i64)
        .bind(filter.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .iter()
            .map(audit_from_row)
            .collect::<StoreResult<Vec<AuditEntry>>>()?;
        Ok(AuditPage {
            entries,
            total: total as usize,
        })
    }
}

fn scope_parts(scope: &Scope) -> (&'static str, &str) {
    match scope {
        Scope::Global => ("global", ""),
        Scope::Workspace(id) => ("workspace", id.as_str()),
        Scope::Artist(id) => ("artist", id.as_str()),
    }
}

fn scope_from_parts(level: &str, id: &str) -> StoreResult<Scope> {
    match level {
        "global" => Ok(Scope::Global),
        "workspace" => Ok(Scope::Workspace(id.to_string())),
        "artist" => Ok(Scope::Artist(id.to_string())),
        other => Err(StoreError::Integrity(format!(
            "unknown scope level '{}' in database",
            other
        ))),
    }
}

fn severity_to_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Caution => "caution",
        Severity::Critical => "critical",
    }
}

fn severity_from_str(raw: &str) -> StoreResult<Severity> {
    match raw {
        "info" => Ok(Severity::Info),
        "caution" => Ok(Severity::Caution),
        "critical" => Ok(Severity::Critical),
        other => Err(StoreError::Integrity(format!(
            "unknown severity '{}' in database",
            other
        ))),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn rule_from_row(row: &PgRow) -> StoreResult<PolicyRule> {
    let id: i64 = row.try_get("id")?;
    let scope_level: String = row.try_get("scope_level")?;
    let scope_id: String = row.try_get("scope_id")?;
    let condition: serde_json::Value = row.try_get("condition")?;
    let action: serde_json::Value = row.try_get("action")?;

    Ok(PolicyRule {
        id: id as u64,
        rule_key: row.try_get("rule_key")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        scope: scope_from_parts(&scope_level, &scope_id)?,
        priority: row.try_get("priority")?,
        enabled: row.try_get("enabled")?,
        condition: serde_json::from_value(condition)?,
        action: serde_json::from_value::<RuleAction>(action)?,
        warning_key: row.try_get("warning_key")?,
        explain_public: row.try_get("explain_public")?,
        explain_internal: row.try_get("explain_internal")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn settings_from_row(row: &PgRow) -> StoreResult<PolicySettings> {
    let id: i64 = row.try_get("id")?;
    let scope_level: String = row.try_get("scope_level")?;
    let scope_id: String = row.try_get("scope_id")?;
    let version: i32 = row.try_get("version")?;
    let settings: serde_json::Value = row.try_get("settings")?;

    Ok(PolicySettings {
        id: id as u64,
        scope: scope_from_parts(&scope_level, &scope_id)?,
        version: version as u32,
        is_active: row.try_get("is_active")?,
        settings: serde_json::from_value(settings)?,
        summary_text: row.try_get("summary_text")?,
        full_text: row.try_get("full_text")?,
        created_at: row.try_get("created_at")?,
    })
}

fn warning_from_row(row: &PgRow) -> StoreResult<WarningTemplate> {
    let severity: String = row.try_get("severity")?;
    Ok(WarningTemplate {
        key: row.try_get("key")?,
        title: row.try_get("title")?,
        client_message: row.try_get("client_message")?,
        severity: severity_from_str(&severity)?,
        enabled: row.try_get("enabled")?,
    })
}

fn audit_from_row(row: &PgRow) -> StoreResult<AuditEntry> {
    let id: i64 = row.try_get("id")?;
    let action: String = row.try_get("action")?;
    let changes: Option<serde_json::Value> = row.try_get("changes")?;

    Ok(AuditEntry {
        id: id as u64,
        entity_type: row.try_get("entity_type")?,
        entity_id: row.try_get("entity_id")?,
        action: AuditAction::parse(&action).ok_or_else(|| {
            StoreError::Integrity(format!("unknown audit action '{}' in database", action))
        })?,
        changed_by: row.try_get("changed_by")?,
        changed_by_role: row.try_get("changed_by_role")?,
        changes: changes.map(serde_json::from_value).transpose()?,
        reason: row.try_get("reason")?,
        metadata: row.try_get("metadata")?,
        occurred_at: row.try_get("occurred_at")?,
    })
}
