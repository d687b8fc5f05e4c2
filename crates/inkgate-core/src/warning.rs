//! Warning template catalog types

use crate::decision::WarningNotice;
use serde::{Deserialize, Serialize};

/// Severity of a warning shown to a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Caution,
    Critical,
}

/// A reusable warning template referenced by rules via `warning_key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningTemplate {
    /// Catalog key (e.g. "first_tattoo_aftercare")
    pub key: String,
    /// Short title shown to the client
    pub title: String,
    /// Full client-facing message
    pub client_message: String,
    /// Severity of the warning
    pub severity: Severity,
    /// Disabled templates degrade to a generic warning at decision time
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl WarningTemplate {
    /// Render this template into a decision-attached notice
    pub fn notice(&self) -> WarningNotice {
        WarningNotice {
            title: self.title.clone(),
            client_message: self.client_message.clone(),
            severity: self.severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_renders_notice() {
        let template = WarningTemplate {
            key: "first_tattoo_aftercare".to_string(),
            title: "First tattoo".to_string(),
            client_message: "Plan extra time for the aftercare walkthrough.".to_string(),
            severity: Severity::Info,
            enabled: true,
        };

        let notice = template.notice();
        assert_eq!(notice.title, "First tattoo");
        assert_eq!(notice.severity, Severity::Info);
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let raw = r#"{
            "key": "color_fade",
            "title": "Color fading",
            "client_message": "Color work fades faster on hands and feet.",
            "severity": "caution"
        }"#;

        let template: WarningTemplate = serde_json::from_str(raw).unwrap();
        assert!(template.enabled);
        assert_eq!(template.severity, Severity::Caution);
    }
}
