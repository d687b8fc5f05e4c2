//! Audit entry types and diff computation
//!
//! Audit entries are append-only facts: once written they are never
//! mutated or deleted. Update entries record only the keys whose values
//! actually changed; create/delete entries snapshot a fixed allow-list of
//! key fields to bound entry size while preserving what a human reviewer
//! needs.

use chrono::{DateTime, Utc};
use inkgate_core::{PolicyRule, PolicySettings, WarningTemplate};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Well-known entity type names used in audit entries
pub mod entity {
    pub const RULE: &str = "policy_rule";
    pub const POLICY_VERSION: &str = "policy_settings";
    pub const WARNING: &str = "warning_template";
    pub const DECISION: &str = "decision";
}

/// Who performed a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User or subsystem identifier
    pub changed_by: String,
    /// Role the actor acted under
    pub changed_by_role: String,
}

impl Actor {
    pub fn new(changed_by: impl Into<String>, changed_by_role: impl Into<String>) -> Self {
        Self {
            changed_by: changed_by.into(),
            changed_by_role: changed_by_role.into(),
        }
    }

    /// Actor for seed loading and other internal bootstrap writes
    pub fn seed() -> Self {
        Self::new("system:seed", "system")
    }

    /// Actor for decision outcomes submitted by the intake subsystem
    pub fn intake() -> Self {
        Self::new("intake", "system")
    }
}

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    Approved,
    Rejected,
    /// Configuration warning surfaced by the engine (malformed condition
    /// tree, dangling warning key)
    Flagged,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
            AuditAction::Deleted => "deleted",
            AuditAction::Approved => "approved",
            AuditAction::Rejected => "rejected",
            AuditAction::Flagged => "flagged",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "created" => Some(AuditAction::Created),
            "updated" => Some(AuditAction::Updated),
            "deleted" => Some(AuditAction::Deleted),
            "approved" => Some(AuditAction::Approved),
            "rejected" => Some(AuditAction::Rejected),
            "flagged" => Some(AuditAction::Flagged),
            _ => None,
        }
    }
}

/// Old/new pair for one changed field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: JsonValue,
    pub new: JsonValue,
}

/// Recorded changes: a field diff for updates, a keyed snapshot for
/// create/delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSet {
    Diff(BTreeMap<String, FieldChange>),
    Snapshot(BTreeMap<String, JsonValue>),
}

/// A recorded audit fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Store-assigned id
    pub id: u64,
    /// Kind of entity the fact is about (see [`entity`])
    pub entity_type: String,
    /// Identifier of the entity (rule id, scope key, request id, ...)
    pub entity_id: String,
    /// What happened
    pub action: AuditAction,
    /// Who did it
    pub changed_by: String,
    /// Role they acted under
    pub changed_by_role: String,
    /// Diff or snapshot, when applicable
    #[serde(default)]
    pub changes: Option<ChangeSet>,
    /// Free-form reason supplied by the actor
    #[serde(default)]
    pub reason: Option<String>,
    /// Additional structured context
    #[serde(default)]
    pub metadata: JsonValue,
    /// When the fact was recorded
    pub occurred_at: DateTime<Utc>,
}

/// An audit fact ready to be appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub entity_type: String,
    pub entity_id: String,
    pub action: AuditAction,
    pub changed_by: String,
    pub changed_by_role: String,
    #[serde(default)]
    pub changes: Option<ChangeSet>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub metadata: JsonValue,
}

impl NewAuditEntry {
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        action: AuditAction,
        actor: &Actor,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            action,
            changed_by: actor.changed_by.clone(),
            changed_by_role: actor.changed_by_role.clone(),
            changes: None,
            reason: None,
            metadata: JsonValue::Null,
        }
    }

    pub fn with_changes(mut self, changes: ChangeSet) -> Self {
        self.changes = Some(changes);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Audit query filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Exact match on entity type
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Exact match on action
    #[serde(default)]
    pub action: Option<AuditAction>,
    /// Free-text match against entity_id and reason
    #[serde(default)]
    pub search: Option<String>,
    /// Page size; defaults to 50
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset into the filtered, newest-first ordering
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for AuditFilter {
    fn default() -> Self {
        Self {
            entity_type: None,
            action: None,
            search: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl AuditFilter {
    /// Whether an entry passes the filter (ignoring pagination)
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(entity_type) = &self.entity_type {
            if &entry.entity_type != entity_type {
                return false;
            }
        }
        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_entity_id = entry.entity_id.to_lowercase().contains(&needle);
            let in_reason = entry
                .reason
                .as_ref()
                .map(|r| r.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_entity_id && !in_reason {
                return false;
            }
        }
        true
    }
}

/// One page of audit query results, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    /// Total number of entries matching the filter, across all pages
    pub total: usize,
}

/// Field-by-field diff of two JSON objects
///
/// Deep equality per key; unchanged keys are omitted. Keys absent on one
/// side diff against `null`.
pub fn diff_fields(old: &JsonValue, new: &JsonValue) -> BTreeMap<String, FieldChange> {
    let empty = serde_json::Map::new();
    let old_map = old.as_object().unwrap_or(&empty);
    let new_map = new.as_object().unwrap_or(&empty);

    let mut keys: Vec<&String> = old_map.keys().chain(new_map.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut diff = BTreeMap::new();
    for key in keys {
        let old_value = old_map.get(key).cloned().unwrap_or(JsonValue::Null);
        let new_value = new_map.get(key).cloned().unwrap_or(JsonValue::Null);
        if old_value != new_value {
            diff.insert(
                key.clone(),
                FieldChange {
                    old: old_value,
                    new: new_value,
                },
            );
        }
    }
    diff
}

/// Domain fields of a rule as compared by update diffs
///
/// Timestamps are excluded: they change on every write and would drown
/// the diff in noise.
pub fn rule_diff_view(rule: &PolicyRule) -> JsonValue {
    serde_json::json!({
        "rule_key": rule.rule_key,
        "name": rule.name,
        "description": rule.description,
        "scope": rule.scope.key(),
        "priority": rule.priority,
        "enabled": rule.enabled,
        "condition": rule.condition,
        "decision": rule.action.decision,
        "reason_code": rule.action.reason_code,
        "next_actions": rule.action.next_actions,
        "warning_key": rule.warning_key,
        "explain_public": rule.explain_public,
        "explain_internal": rule.explain_internal,
    })
}

/// Key-field snapshot of a rule for create/delete entries
pub fn rule_snapshot(rule: &PolicyRule) -> BTreeMap<String, JsonValue> {
    let mut snapshot = BTreeMap::new();
    snapshot.insert("name".to_string(), serde_json::json!(rule.name));
    snapshot.insert("rule_key".to_string(), serde_json::json!(rule.rule_key));
    snapshot.insert("scope".to_string(), serde_json::json!(rule.scope.key()));
    snapshot.insert("priority".to_string(), serde_json::json!(rule.priority));
    snapshot.insert("enabled".to_string(), serde_json::json!(rule.enabled));
    snapshot.insert(
        "decision".to_string(),
        serde_json::json!(rule.action.decision),
    );
    snapshot.insert(
        "reason_code".to_string(),
        serde_json::json!(rule.action.reason_code),
    );
    snapshot
}

/// Key-field snapshot of a policy version for create entries
pub fn settings_snapshot(settings: &PolicySettings) -> BTreeMap<String, JsonValue> {
    let mut snapshot = BTreeMap::new();
    snapshot.insert("scope".to_string(), serde_json::json!(settings.scope.key()));
    snapshot.insert("version".to_string(), serde_json::json!(settings.version));
    snapshot.insert(
        "summary_text".to_string(),
        serde_json::json!(settings.summary_text),
    );
    snapshot
}

/// Domain fields of a warning template as compared by update diffs
pub fn warning_diff_view(template: &WarningTemplate) -> JsonValue {
    serde_json::json!({
        "title": template.title,
        "client_message": template.client_message,
        "severity": template.severity,
        "enabled": template.enabled,
    })
}
