//! Policy rule and scope types

use crate::condition::Condition;
use crate::decision::Decision;
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Governance level a rule or policy version applies to
///
/// Serialized form: `{"level": "global"}`,
/// `{"level": "workspace", "id": "ws_main"}`,
/// `{"level": "artist", "id": "art_joan"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", content = "id", rename_all = "snake_case")]
pub enum Scope {
    /// Applies everywhere
    Global,
    /// Applies to one workspace (studio)
    Workspace(String),
    /// Applies to one artist
    Artist(String),
}

/// Scope level, ordered by specificity: artist > workspace > global
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    Global,
    Workspace,
    Artist,
}

impl Scope {
    /// The scope's level
    pub fn level(&self) -> ScopeLevel {
        match self {
            Scope::Global => ScopeLevel::Global,
            Scope::Workspace(_) => ScopeLevel::Workspace,
            Scope::Artist(_) => ScopeLevel::Artist,
        }
    }

    /// Specificity rank: higher wins over lower when both match
    pub fn specificity(&self) -> u8 {
        match self {
            Scope::Global => 0,
            Scope::Workspace(_) => 1,
            Scope::Artist(_) => 2,
        }
    }

    /// Whether a rule or policy version at this scope governs the given
    /// request selector
    pub fn applies_to(&self, selector: &ScopeSelector) -> bool {
        match self {
            Scope::Global => true,
            Scope::Workspace(id) => selector.workspace_id.as_deref() == Some(id.as_str()),
            Scope::Artist(id) => selector.artist_id.as_deref() == Some(id.as_str()),
        }
    }

    /// Stable key for per-scope maps and lock keys (e.g. "workspace:ws_main")
    pub fn key(&self) -> String {
        match self {
            Scope::Global => "global".to_string(),
            Scope::Workspace(id) => format!("workspace:{}", id),
            Scope::Artist(id) => format!("artist:{}", id),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// The workspace/artist pair a decision request is evaluated under
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSelector {
    /// Workspace (studio) handling the booking, if known
    #[serde(default)]
    pub workspace_id: Option<String>,
    /// Artist the booking is for, if known
    #[serde(default)]
    pub artist_id: Option<String>,
}

impl ScopeSelector {
    /// Selector matching only global rules
    pub fn global() -> Self {
        Self::default()
    }

    /// Selector for a workspace without a specific artist
    pub fn workspace(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
            artist_id: None,
        }
    }

    /// Selector for an artist within a workspace
    pub fn artist(workspace_id: impl Into<String>, artist_id: impl Into<String>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
            artist_id: Some(artist_id.into()),
        }
    }

    /// Scopes governing this selector, most specific first
    /// (artist → workspace → global), used for settings fallback
    pub fn fallback_chain(&self) -> Vec<Scope> {
        let mut chain = Vec::with_capacity(3);
        if let Some(artist) = &self.artist_id {
            chain.push(Scope::Artist(artist.clone()));
        }
        if let Some(workspace) = &self.workspace_id {
            chain.push(Scope::Workspace(workspace.clone()));
        }
        chain.push(Scope::Global);
        chain
    }
}

/// What a matching rule decides, and what should happen next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    /// The decision this rule produces when it matches
    pub decision: Decision,
    /// Machine-readable reason code (e.g. "HIGH_RISK_CLIENT")
    pub reason_code: String,
    /// Follow-up action tags for the booking pipeline
    #[serde(default)]
    pub next_actions: Vec<String>,
}

/// A declarative booking policy rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Store-assigned id; creation order breaks priority ties
    pub id: u64,

    /// Key unique within the rule's scope (e.g. "block_color")
    pub rule_key: String,

    /// Display name
    pub name: String,

    /// Free-form description for rule authors
    #[serde(default)]
    pub description: String,

    /// Governance level this rule applies to
    pub scope: Scope,

    /// Higher priority is evaluated and wins first
    pub priority: i32,

    /// Disabled rules are never candidates
    pub enabled: bool,

    /// The stored predicate evaluated against the decision context
    pub condition: Condition,

    /// Decision and follow-ups when the condition matches
    pub action: RuleAction,

    /// Warning template key; required when decision is ALLOW_WITH_WARNING
    #[serde(default)]
    pub warning_key: Option<String>,

    /// Client-facing explanation copied into matching decisions
    #[serde(default)]
    pub explain_public: String,

    /// Staff-facing explanation copied into matching decisions
    #[serde(default)]
    pub explain_internal: String,

    /// When the rule was created
    pub created_at: DateTime<Utc>,

    /// When the rule was last updated
    pub updated_at: DateTime<Utc>,
}

impl PolicyRule {
    /// Validate the rule ahead of storage: the condition tree must be
    /// well-formed and ALLOW_WITH_WARNING rules must reference a warning
    pub fn validate(&self) -> Result<()> {
        self.condition.validate()?;
        if self.action.decision == Decision::AllowWithWarning && self.warning_key.is_none() {
            return Err(CoreError::MissingWarningKey(self.rule_key.clone()));
        }
        Ok(())
    }
}
