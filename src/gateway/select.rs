use crate::constants::EXPIRED_NODE_URIS;
use crate::error::{AppError, AppResult};
use crate::gateway::authorize::{AccessMode, Authorized};
use crate::models::{AppSettings, SubscriptionEntry};

/// The effective ordered set of entries for one request. `synthetic_expired`
/// tags the fixed placeholder substitution so downstream stages can skip
/// traffic accounting.
#[derive(Debug, Clone)]
pub struct NodeSet {
    pub entries: Vec<SubscriptionEntry>,
    pub synthetic_expired: bool,
}

/// Converter backend resolved for this request, profile override first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterBackend {
    pub endpoint: String,
    pub config: String,
}

fn expired_placeholder_entries() -> Vec<SubscriptionEntry> {
    EXPIRED_NODE_URIS
        .iter()
        .enumerate()
        .map(|(i, uri)| SubscriptionEntry {
            id: format!("expired-{}", i + 1),
            url: (*uri).to_string(),
            name: String::new(),
            enabled: true,
            user_info: None,
        })
        .collect()
}

/// Compute the node set for an authorized context.
///
/// Expired profiles get the placeholder set verbatim; real membership is
/// ignored entirely. Active profiles filter by membership and entry state;
/// direct access takes every enabled entry.
pub fn select_nodes(auth: &Authorized, entries: &[SubscriptionEntry]) -> NodeSet {
    if auth.expired {
        return NodeSet {
            entries: expired_placeholder_entries(),
            synthetic_expired: true,
        };
    }

    let selected = match &auth.mode {
        AccessMode::Direct => entries.iter().filter(|e| e.enabled).cloned().collect(),
        AccessMode::Profile(profile) => entries
            .iter()
            .filter(|e| e.enabled)
            .filter(|e| {
                if e.is_remote() {
                    profile.subscriptions.contains(&e.id)
                } else {
                    profile.manual_nodes.contains(&e.id)
                }
            })
            .cloned()
            .collect(),
    };

    NodeSet {
        entries: selected,
        synthetic_expired: false,
    }
}

/// Per-request converter resolution: a profile's non-blank override wins,
/// else the global settings value. A blank resolved backend means no output
/// can be produced for any target, so it fails the request outright.
pub fn resolve_converter(auth: &Authorized, settings: &AppSettings) -> AppResult<ConverterBackend> {
    let profile = auth.profile();

    let endpoint = profile
        .and_then(|p| p.sub_converter.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| settings.sub_converter.trim());

    if endpoint.is_empty() {
        return Err(AppError::Unconfigured);
    }

    let config = profile
        .and_then(|p| p.sub_config.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| settings.sub_config.trim());

    Ok(ConverterBackend {
        endpoint: endpoint.to_string(),
        config: config.to_string(),
    })
}
