use serde::{Deserialize, Serialize};

/// Byte counters reported by a remote subscription provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub upload: u64,
    #[serde(default)]
    pub download: u64,
    #[serde(default)]
    pub total: u64,
}

/// A single stored record: either a remote subscription (HTTP URL) or a
/// manual/static node URI. Owned by the storage collaborator; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionEntry {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

fn default_enabled() -> bool {
    true
}

impl SubscriptionEntry {
    /// An HTTP(S) scheme marks the entry as a remote subscription; anything
    /// else is a manual node URI.
    pub fn is_remote(&self) -> bool {
        let url = self.url.trim_start();
        let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Remaining quota in bytes, 0 when the provider reports no cap.
    pub fn remaining_quota(&self) -> u64 {
        match self.user_info {
            Some(info) if info.total > 0 => {
                info.total.saturating_sub(info.upload.saturating_add(info.download))
            }
            _ => 0,
        }
    }
}
