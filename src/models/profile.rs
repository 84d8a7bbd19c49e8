use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Optional display-name prefix applied to manual node URIs when a profile
/// is shared out under a custom label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub text: String,
}

/// A named, independently shareable curated subset of entries with its own
/// lifecycle and optional converter overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subscriptions: HashSet<String>,
    #[serde(default)]
    pub manual_nodes: HashSet<String>,
    #[serde(default)]
    pub sub_converter: Option<String>,
    #[serde(default)]
    pub sub_config: Option<String>,
    #[serde(default)]
    pub prefix: Option<PrefixSettings>,
}

fn default_enabled() -> bool {
    true
}

impl Profile {
    /// Profiles are addressed by `custom_id` first, falling back to `id`.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        match self.custom_id.as_deref() {
            Some(custom) if !custom.is_empty() && custom == identifier => true,
            _ => self.id == identifier,
        }
    }

    /// Expired iff the wall clock has moved strictly past `expires_at`.
    /// An expired profile is a first-class state, not an error.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires) if now > expires)
    }
}
