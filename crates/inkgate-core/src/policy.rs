//! Versioned policy settings
//!
//! Policy settings are append-only snapshots per scope. "Active" is not a
//! freely toggleable flag on arbitrary rows: the store maintains it
//! transactionally so that exactly one version per scope is active and
//! history is never rewritten.

use crate::rule::Scope;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deposit/cancellation/timing payload of a policy version
///
/// The well-known knobs are typed; anything else the admin surface stores
/// rides along in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPayload {
    /// Deposit required to confirm a booking, as a percentage of the quote
    #[serde(default)]
    pub deposit_percent: Option<f64>,

    /// Hours before the appointment a client can cancel without penalty
    #[serde(default)]
    pub cancellation_window_hours: Option<u32>,

    /// Minimum lead time between booking and appointment, in hours
    #[serde(default)]
    pub min_lead_time_hours: Option<u32>,

    /// How many times one booking may be rescheduled
    #[serde(default)]
    pub reschedule_limit: Option<u32>,

    /// Pass-through for settings the engine does not interpret
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// An immutable, numbered snapshot of policy settings for one scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Store-assigned id
    pub id: u64,

    /// Scope this version governs
    pub scope: Scope,

    /// Monotonic per scope, starting at 1
    pub version: u32,

    /// Exactly one version per scope is active at any time
    pub is_active: bool,

    /// The settings payload
    pub settings: SettingsPayload,

    /// One-line summary shown in booking flows
    #[serde(default)]
    pub summary_text: String,

    /// Full policy text shown to clients
    #[serde(default)]
    pub full_text: String,

    /// When this version was created
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_payload_defaults_are_engine_defaults() {
        let payload = SettingsPayload::default();
        assert!(payload.deposit_percent.is_none());
        assert!(payload.cancellation_window_hours.is_none());
        assert!(payload.extra.is_empty());
    }

    #[test]
    fn test_settings_payload_keeps_unknown_keys() {
        let raw = r#"{
            "deposit_percent": 25.0,
            "cancellation_window_hours": 48,
            "touch_up_policy": "free within 6 weeks"
        }"#;

        let payload: SettingsPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.deposit_percent, Some(25.0));
        assert_eq!(payload.cancellation_window_hours, Some(48));
        assert_eq!(
            payload.extra.get("touch_up_policy"),
            Some(&serde_json::json!("free within 6 weeks"))
        );

        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back["touch_up_policy"], "free within 6 weeks");
    }

    #[test]
    fn test_policy_settings_serde_round_trip() {
        let settings = PolicySettings {
            id: 7,
            scope: Scope::Workspace("ws_main".to_string()),
            version: 3,
            is_active: true,
            settings: SettingsPayload {
                deposit_percent: Some(30.0),
                ..Default::default()
            },
            summary_text: "30% deposit, 48h cancellation".to_string(),
            full_text: String::new(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&settings).unwrap();
        let back: PolicySettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }
}
