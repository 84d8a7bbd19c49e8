use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Telegram notification target. Disabled unless both credentials are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    pub enabled: bool,
    pub bot_token: String,
    pub chat_id: String,
}

impl NotifySettings {
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

/// Merged gateway configuration: stored settings overlaid onto defaults,
/// migrated to the current schema shape before deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Shared secret for direct (full-list) access.
    pub mytoken: String,
    /// Shared secret for profile access.
    pub profile_token: String,
    /// Converter backend host, optionally with an explicit scheme.
    pub sub_converter: String,
    /// Remote config string handed to the converter for rule-based targets.
    pub sub_config: String,
    /// Display name used for the attachment filename.
    pub file_name: String,
    /// Advertised to clients via the Profile-Update-Interval header.
    pub update_interval_hours: u32,
    pub notify: NotifySettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            mytoken: String::new(),
            profile_token: String::new(),
            sub_converter: "api.v1.mk".to_string(),
            sub_config:
                "https://raw.githubusercontent.com/ACL4SSR/ACL4SSR/master/Clash/config/ACL4SSR_Online.ini"
                    .to_string(),
            file_name: "subgate".to_string(),
            update_interval_hours: 6,
            notify: NotifySettings::default(),
        }
    }
}

static ENV_MYTOKEN: std::sync::LazyLock<Option<String>> = std::sync::LazyLock::new(|| {
    std::env::var("SUBGATE_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
});
static ENV_PROFILE_TOKEN: std::sync::LazyLock<Option<String>> = std::sync::LazyLock::new(|| {
    std::env::var("SUBGATE_PROFILE_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
});

impl AppSettings {
    /// Overlay a stored settings object onto defaults and migrate legacy key
    /// names to the current schema shape. Unknown keys are dropped.
    pub fn from_stored(stored: Option<Value>) -> Self {
        let mut merged = serde_json::to_value(AppSettings::default())
            .expect("default settings always serialize");

        if let Some(Value::Object(stored)) = stored.map(migrate_legacy_keys) {
            if let Value::Object(base) = &mut merged {
                for (key, value) in stored {
                    match (base.get_mut(&key), value) {
                        // One level of nesting (notify) merges field-wise.
                        (Some(Value::Object(dst)), Value::Object(src)) => {
                            for (k, v) in src {
                                dst.insert(k, v);
                            }
                        }
                        (_, value) => {
                            base.insert(key, value);
                        }
                    }
                }
            }
        }

        serde_json::from_value(merged).unwrap_or_default()
    }

    /// Environment secrets take precedence over stored ones, captured once
    /// per process.
    pub fn apply_env_overrides(&mut self) {
        if let Some(token) = ENV_MYTOKEN.as_ref() {
            self.mytoken = token.clone();
        }
        if let Some(token) = ENV_PROFILE_TOKEN.as_ref() {
            self.profile_token = token.clone();
        }
    }
}

/// Older deployments stored `guest_token`, `sub_api` and `sub_name`. Rename
/// in place without clobbering values already present under the new names.
fn migrate_legacy_keys(mut stored: Value) -> Value {
    let Some(map) = stored.as_object_mut() else {
        return stored;
    };

    for (old, new) in [
        ("guest_token", "profile_token"),
        ("sub_api", "sub_converter"),
        ("sub_name", "file_name"),
    ] {
        if let Some(value) = map.remove(old) {
            map.entry(new.to_string()).or_insert(value);
        }
    }

    stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_storage_yields_defaults() {
        let settings = AppSettings::from_stored(None);
        assert_eq!(settings, AppSettings::default());
        assert!(!settings.sub_converter.is_empty());
    }

    #[test]
    fn stored_values_overlay_defaults() {
        let settings = AppSettings::from_stored(Some(json!({
            "mytoken": "abc123",
            "file_name": "my-nodes"
        })));
        assert_eq!(settings.mytoken, "abc123");
        assert_eq!(settings.file_name, "my-nodes");
        assert_eq!(
            settings.sub_converter,
            AppSettings::default().sub_converter
        );
    }

    #[test]
    fn legacy_keys_migrate_without_clobbering() {
        let settings = AppSettings::from_stored(Some(json!({
            "guest_token": "legacy-guest",
            "sub_api": "converter.example",
            "sub_name": "old-name"
        })));
        assert_eq!(settings.profile_token, "legacy-guest");
        assert_eq!(settings.sub_converter, "converter.example");
        assert_eq!(settings.file_name, "old-name");

        let both = AppSettings::from_stored(Some(json!({
            "guest_token": "legacy",
            "profile_token": "current"
        })));
        assert_eq!(both.profile_token, "current");
    }

    #[test]
    fn nested_notify_merges_field_wise() {
        let settings = AppSettings::from_stored(Some(json!({
            "notify": { "enabled": true, "bot_token": "123:abc", "chat_id": "42" }
        })));
        assert!(settings.notify.is_usable());

        let partial = AppSettings::from_stored(Some(json!({
            "notify": { "enabled": true }
        })));
        assert!(!partial.notify.is_usable());
    }
}
