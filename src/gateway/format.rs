use crate::gateway::token::QueryParams;

pub const FORMAT_BASE64: &str = "base64";

/// Formats that may be requested as a bare query flag (`?clash`). The v2ray
/// and trojan flags are aliases for the raw base64 list.
const BARE_FORMAT_FLAGS: [&str; 7] = [
    "clash", "singbox", "surge", "loon", "base64", "v2ray", "trojan",
];

/// Ordered client-identification keyword table, first match wins. Order
/// matters: earlier entries are deliberately more specific substrings than
/// later ones (the clash.meta family must match before generic `clash`).
const CLIENT_KEYWORD_TABLE: [(&str, &str); 16] = [
    ("flyclash", "clash"),
    ("mihomo", "clash"),
    ("clash.meta", "clash"),
    ("clash-verge", "clash"),
    ("meta", "clash"),
    ("stash", "clash"),
    ("nekoray", "clash"),
    ("sing-box", "singbox"),
    ("shadowrocket", FORMAT_BASE64),
    ("v2rayn", FORMAT_BASE64),
    ("v2rayng", FORMAT_BASE64),
    ("surge", "surge"),
    ("loon", "loon"),
    ("quantumult%20x", "quanx"),
    ("quantumult", "quanx"),
    ("clash", "clash"),
];

fn normalize_flag(flag: &str) -> &str {
    match flag {
        "v2ray" | "trojan" => FORMAT_BASE64,
        other => other,
    }
}

/// Determine the output format: explicit `target` parameter (verbatim), else
/// a recognized bare format flag, else the client-identification keyword
/// table, else base64.
pub fn negotiate_format(query: &QueryParams, user_agent: &str) -> String {
    if let Some(target) = query.get("target").map(str::trim).filter(|t| !t.is_empty()) {
        return target.to_string();
    }

    for flag in BARE_FORMAT_FLAGS {
        if query.has(flag) {
            return normalize_flag(flag).to_string();
        }
    }

    let ua = user_agent.to_ascii_lowercase();
    for (keyword, format) in CLIENT_KEYWORD_TABLE {
        if ua.contains(keyword) {
            return format.to_string();
        }
    }

    FORMAT_BASE64.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> QueryParams {
        QueryParams::parse(Some(raw))
    }

    #[test]
    fn explicit_target_wins_verbatim() {
        assert_eq!(negotiate_format(&query("target=clash"), ""), "clash");
        // Verbatim: no alias normalization, no table lookup.
        assert_eq!(negotiate_format(&query("target=v2ray"), "Surge/5"), "v2ray");
        assert_eq!(
            negotiate_format(&query("target=quanx&clash"), "clash-verge"),
            "quanx"
        );
    }

    #[test]
    fn bare_flags_override_client_identification() {
        assert_eq!(negotiate_format(&query("clash"), "Shadowrocket/1.2"), "clash");
        assert_eq!(negotiate_format(&query("surge"), ""), "surge");
    }

    #[test]
    fn v2ray_and_trojan_flags_normalize_to_base64() {
        assert_eq!(negotiate_format(&query("v2ray"), ""), FORMAT_BASE64);
        assert_eq!(negotiate_format(&query("trojan"), ""), FORMAT_BASE64);
    }

    #[test]
    fn client_keywords_resolve_in_table_order() {
        assert_eq!(negotiate_format(&query(""), "ClashMetaForAndroid/2.8"), "clash");
        assert_eq!(negotiate_format(&query(""), "clash-verge/v1.6.2"), "clash");
        assert_eq!(negotiate_format(&query(""), "Stash/2.5"), "clash");
        assert_eq!(negotiate_format(&query(""), "sing-box 1.9"), "singbox");
        assert_eq!(negotiate_format(&query(""), "Shadowrocket/1.2"), FORMAT_BASE64);
        assert_eq!(negotiate_format(&query(""), "v2rayNG/1.8.5"), FORMAT_BASE64);
        assert_eq!(negotiate_format(&query(""), "Surge/2190"), "surge");
        assert_eq!(negotiate_format(&query(""), "Loon/3.2"), "loon");
        assert_eq!(negotiate_format(&query(""), "Quantumult%20X/1.0"), "quanx");
        assert_eq!(negotiate_format(&query(""), "clash/1.0"), "clash");
    }

    #[test]
    fn specific_keywords_beat_generic_clash() {
        // "clash.meta" and "meta" both precede plain "clash" in the table.
        assert_eq!(negotiate_format(&query(""), "Clash.Meta/1.16"), "clash");
        let idx_meta = CLIENT_KEYWORD_TABLE
            .iter()
            .position(|(k, _)| *k == "clash.meta")
            .unwrap();
        let idx_clash = CLIENT_KEYWORD_TABLE
            .iter()
            .position(|(k, _)| *k == "clash")
            .unwrap();
        assert!(idx_meta < idx_clash);
    }

    #[test]
    fn unknown_everything_defaults_to_base64() {
        assert_eq!(negotiate_format(&query(""), "curl/8.4"), FORMAT_BASE64);
        assert_eq!(negotiate_format(&QueryParams::default(), ""), FORMAT_BASE64);
    }
}
