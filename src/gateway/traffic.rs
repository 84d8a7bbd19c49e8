use crate::gateway::select::NodeSet;
use crate::models::Profile;
use crate::utils::bytes::format_bytes;

/// Sentinel address for the synthesized quota node; carries no routing
/// information, only a visible label.
const SENTINEL_NODE: &str = "trojan://00000000-0000-0000-0000-000000000000@0.0.0.0:443";

/// Aggregate remaining traffic across the selected entries.
pub fn remaining_traffic(nodes: &NodeSet) -> u64 {
    nodes
        .entries
        .iter()
        .filter(|e| e.enabled)
        .map(|e| e.remaining_quota())
        .sum()
}

/// Synthesize the decorative quota node prepended to the real list, or None
/// when the profile is expired or nothing reports a positive remainder.
pub fn traffic_banner(nodes: &NodeSet) -> Option<String> {
    if nodes.synthetic_expired {
        return None;
    }
    let remaining = remaining_traffic(nodes);
    if remaining == 0 {
        return None;
    }

    let label = format!("Remaining: {}", format_bytes(remaining));
    Some(format!(
        "{}#{}",
        SENTINEL_NODE,
        urlencoding::encode(&label)
    ))
}

/// `Subscription-Userinfo` header value aggregated over the selected entries,
/// plus the profile expiry when one is set. None when nothing reports usage
/// and no expiry applies.
pub fn usage_header(nodes: &NodeSet, profile: Option<&Profile>) -> Option<String> {
    if nodes.synthetic_expired {
        return None;
    }

    let (mut upload, mut download, mut total) = (0u64, 0u64, 0u64);
    for entry in nodes.entries.iter().filter(|e| e.enabled) {
        if let Some(info) = entry.user_info {
            upload = upload.saturating_add(info.upload);
            download = download.saturating_add(info.download);
            total = total.saturating_add(info.total);
        }
    }

    let expire = profile.and_then(|p| p.expires_at).map(|t| t.timestamp());
    if total == 0 && expire.is_none() {
        return None;
    }

    let mut value = format!("upload={}; download={}; total={}", upload, download, total);
    if let Some(expire) = expire {
        value.push_str(&format!("; expire={}", expire));
    }
    Some(value)
}
