use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Notificator type identifier registered with the build server.
pub const NOTIFICATOR_TYPE: &str = "ChimeNotificator";

/// Human-readable notificator name shown in the build server UI.
pub const NOTIFICATOR_DISPLAY_NAME: &str = "Amazon Chime Notifier";

/// User property holding the recipient's webhook URL.
pub const WEBHOOK_URL_KEY: &str = "chime.WebhookUrl";

/// User property holding the recipient's verbosity flag (`"true"` / `"false"`).
pub const VERBOSE_KEY: &str = "chime.Verbose";

/// Build lifecycle events that can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Started,
    Successful,
    Failed,
    FailedToStart,
    Failing,
    ProbablyHanging,
    LabelingFailed,
}

impl EventCategory {
    pub const ALL: [EventCategory; 7] = [
        EventCategory::Started,
        EventCategory::Successful,
        EventCategory::Failed,
        EventCategory::FailedToStart,
        EventCategory::Failing,
        EventCategory::ProbablyHanging,
        EventCategory::LabelingFailed,
    ];

    /// Status kind and display text for this category.
    pub fn status(self) -> (StatusKind, &'static str) {
        match self {
            EventCategory::Started => (StatusKind::Info, "started"),
            EventCategory::Successful => (StatusKind::Success, "successful"),
            EventCategory::Failed => (StatusKind::Error, "failed"),
            EventCategory::FailedToStart => (StatusKind::Error, "failed to start"),
            EventCategory::Failing => (StatusKind::Error, "failing"),
            EventCategory::ProbablyHanging => (StatusKind::Error, "probably hanging"),
            EventCategory::LabelingFailed => (StatusKind::Error, "labelling failed"),
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Started => write!(f, "started"),
            EventCategory::Successful => write!(f, "successful"),
            EventCategory::Failed => write!(f, "failed"),
            EventCategory::FailedToStart => write!(f, "failed_to_start"),
            EventCategory::Failing => write!(f, "failing"),
            EventCategory::ProbablyHanging => write!(f, "probably_hanging"),
            EventCategory::LabelingFailed => write!(f, "labeling_failed"),
        }
    }
}

/// Message status, rendered as a leading glyph in the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    pub fn glyph(self) -> &'static str {
        match self {
            StatusKind::Info => "\u{1F6E0}\u{FE0F}",
            StatusKind::Success => "\u{2705}",
            StatusKind::Error => "\u{1F525}",
        }
    }
}

/// A single VCS change contained in a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub author: String,
    /// Full commit description; only the first line is displayed.
    pub description: String,
}

impl ChangeRecord {
    pub fn new(author: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            description: description.into(),
        }
    }

    pub fn first_line(&self) -> &str {
        self.description.split('\n').next().unwrap_or_default()
    }
}

/// Snapshot of a build at the time a lifecycle event fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEvent {
    pub build_number: String,
    /// External build configuration id (`buildTypeId` in the build log URL).
    pub build_type_id: String,
    pub full_name: String,
    #[serde(default)]
    pub triggered_by: Option<String>,
    /// Changes in the order supplied by the build server.
    #[serde(default)]
    pub changes: Vec<ChangeRecord>,
}

impl BuildEvent {
    pub fn new(
        build_number: impl Into<String>,
        build_type_id: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            build_number: build_number.into(),
            build_type_id: build_type_id.into(),
            full_name: full_name.into(),
            triggered_by: None,
            changes: Vec::new(),
        }
    }

    pub fn with_trigger(mut self, triggered_by: impl Into<String>) -> Self {
        self.triggered_by = Some(triggered_by.into());
        self
    }

    pub fn with_changes(mut self, changes: Vec<ChangeRecord>) -> Self {
        self.changes = changes;
        self
    }

    /// Check the fields needed to build the build-log link.
    pub fn validate(&self) -> Result<(), String> {
        if self.build_number.trim().is_empty() {
            return Err("build_number must not be empty".to_string());
        }
        if self.build_type_id.trim().is_empty() {
            return Err("build_type_id must not be empty".to_string());
        }
        Ok(())
    }
}

/// Opaque identity of a subscribed user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(pub String);

impl Recipient {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-recipient delivery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientConfig {
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

impl RecipientConfig {
    /// Build a config from the recipient's stored user properties.
    ///
    /// Verbosity is enabled only for a case-insensitive `"true"`.
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        let webhook_url = properties
            .get(WEBHOOK_URL_KEY)
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        let verbose = properties
            .get(VERBOSE_KEY)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        Self {
            webhook_url,
            verbose,
        }
    }

    /// The webhook URL, if one is configured and non-blank.
    pub fn webhook(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// A user-configurable property exposed to the build server settings UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub key: String,
    pub display_name: String,
    pub default_value: Option<String>,
}

/// The properties this notificator registers with the build server.
pub fn user_properties() -> Vec<PropertyInfo> {
    vec![
        PropertyInfo {
            key: WEBHOOK_URL_KEY.to_string(),
            display_name: "Webhook URL".to_string(),
            default_value: None,
        },
        PropertyInfo {
            key: VERBOSE_KEY.to_string(),
            display_name: "Verbose Messages. True or false".to_string(),
            default_value: Some("false".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_status_lookup_is_total() {
        for category in EventCategory::ALL {
            let (kind, text) = category.status();
            match category {
                EventCategory::Started => assert_eq!(kind, StatusKind::Info),
                EventCategory::Successful => assert_eq!(kind, StatusKind::Success),
                _ => assert_eq!(kind, StatusKind::Error),
            }
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn test_category_deserializes_snake_case() {
        let category: EventCategory = serde_json::from_str("\"probably_hanging\"").unwrap();
        assert_eq!(category, EventCategory::ProbablyHanging);
        assert_eq!(category.to_string(), "probably_hanging");
    }

    #[test]
    fn test_first_line() {
        let change = ChangeRecord::new("alice", "Fix parser\n\nLong explanation");
        assert_eq!(change.first_line(), "Fix parser");
        let single = ChangeRecord::new("bob", "One liner");
        assert_eq!(single.first_line(), "One liner");
        assert_eq!(ChangeRecord::new("carol", "").first_line(), "");
    }

    #[test]
    fn test_validate_rejects_missing_build_type() {
        let event = BuildEvent::new("42", "", "MyProj :: Build");
        assert!(event.validate().is_err());
        let event = BuildEvent::new(" ", "bt1", "MyProj :: Build");
        assert!(event.validate().is_err());
        assert!(BuildEvent::new("42", "bt1", "MyProj :: Build").validate().is_ok());
    }

    #[test]
    fn test_config_from_properties() {
        let config = RecipientConfig::from_properties(&props(&[
            (WEBHOOK_URL_KEY, "https://hooks.example.com/abc"),
            (VERBOSE_KEY, "TRUE"),
        ]));
        assert_eq!(config.webhook(), Some("https://hooks.example.com/abc"));
        assert!(config.verbose);
    }

    #[test]
    fn test_config_defaults_when_properties_missing() {
        let config = RecipientConfig::from_properties(&HashMap::new());
        assert_eq!(config, RecipientConfig::default());
        assert_eq!(config.webhook(), None);
        assert!(!config.verbose);
    }

    #[test]
    fn test_config_blank_url_and_non_true_verbose() {
        let config = RecipientConfig::from_properties(&props(&[
            (WEBHOOK_URL_KEY, "   "),
            (VERBOSE_KEY, "yes"),
        ]));
        assert_eq!(config.webhook_url, None);
        assert!(!config.verbose);
    }

    #[test]
    fn test_user_properties_declare_verbose_default() {
        let properties = user_properties();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].key, WEBHOOK_URL_KEY);
        assert_eq!(properties[0].default_value, None);
        assert_eq!(properties[1].key, VERBOSE_KEY);
        assert_eq!(properties[1].default_value.as_deref(), Some("false"));
    }
}
