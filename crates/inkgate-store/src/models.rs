//! Draft and patch models for store mutations

use chrono::{DateTime, Utc};
use inkgate_core::{
    Condition, CoreError, Decision, PolicyRule, RuleAction, Scope, SettingsPayload,
};
use serde::{Deserialize, Deserializer, Serialize};

/// A rule as submitted by the authoring surface, before the store assigns
/// an id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub rule_key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub scope: Scope,
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub condition: Condition,
    pub action: RuleAction,
    #[serde(default)]
    pub warning_key: Option<String>,
    #[serde(default)]
    pub explain_public: String,
    #[serde(default)]
    pub explain_internal: String,
}

fn default_enabled() -> bool {
    true
}

impl RuleDraft {
    /// Validate ahead of storage; unvalidated input is never accepted
    pub fn validate(&self) -> Result<(), CoreError> {
        self.condition.validate()?;
        if self.action.decision == Decision::AllowWithWarning && self.warning_key.is_none() {
            return Err(CoreError::MissingWarningKey(self.rule_key.clone()));
        }
        Ok(())
    }

    /// Materialize the draft into a stored rule
    pub fn into_rule(self, id: u64, now: DateTime<Utc>) -> PolicyRule {
        PolicyRule {
            id,
            rule_key: self.rule_key,
            name: self.name,
            description: self.description,
            scope: self.scope,
            priority: self.priority,
            enabled: self.enabled,
            condition: self.condition,
            action: self.action,
            warning_key: self.warning_key,
            explain_public: self.explain_public,
            explain_internal: self.explain_internal,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a rule
///
/// `rule_key`, `scope` and `id` are immutable once created; enablement
/// has its own operation. `warning_key` distinguishes "not provided"
/// (no change) from an explicit `null` (clear).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub action: Option<RuleAction>,
    #[serde(default, deserialize_with = "double_option")]
    pub warning_key: Option<Option<String>>,
    #[serde(default)]
    pub explain_public: Option<String>,
    #[serde(default)]
    pub explain_internal: Option<String>,
}

/// Distinguishes an absent field from an explicit null
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl RulePatch {
    /// Apply the patch to a stored rule, bumping `updated_at`
    pub fn apply(&self, rule: &mut PolicyRule, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            rule.name = name.clone();
        }
        if let Some(description) = &self.description {
            rule.description = description.clone();
        }
        if let Some(priority) = self.priority {
            rule.priority = priority;
        }
        if let Some(condition) = &self.condition {
            rule.condition = condition.clone();
        }
        if let Some(action) = &self.action {
            rule.action = action.clone();
        }
        if let Some(warning_key) = &self.warning_key {
            rule.warning_key = warning_key.clone();
        }
        if let Some(explain_public) = &self.explain_public {
            rule.explain_public = explain_public.clone();
        }
        if let Some(explain_internal) = &self.explain_internal {
            rule.explain_internal = explain_internal.clone();
        }
        rule.updated_at = now;
    }
}

/// A policy-settings version as submitted by the settings surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySettingsDraft {
    #[serde(default)]
    pub settings: SettingsPayload,
    #[serde(default)]
    pub summary_text: String,
    #[serde(default)]
    pub full_text: String,
}
