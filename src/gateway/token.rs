use crate::constants::SUB_PATH_PREFIX;

/// Decoded query string, order-preserving. Bare flags (`?clash`) parse as a
/// key with an empty value.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(raw_query: Option<&str>) -> Self {
        let Some(raw) = raw_query else {
            return Self::default();
        };
        let pairs = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self(pairs)
    }

    /// First value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }
}

/// Access credentials as presented by the request line. Absence is not an
/// error here; an empty token is rejected by the authorizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccess {
    pub token: String,
    pub profile_id: Option<String>,
}

/// Strip the fixed leading segment; remaining segment 0 is the token and
/// segment 1 (if present) the profile identifier. With no path segments the
/// token falls back to the `token` query parameter.
pub fn resolve_access(path: &str, query: &QueryParams) -> ResolvedAccess {
    let rest = path.strip_prefix(SUB_PATH_PREFIX).unwrap_or(path);
    let mut segments = rest
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).map(|c| c.into_owned()).unwrap_or_else(|_| s.to_string()));

    match segments.next() {
        Some(token) => ResolvedAccess {
            token,
            profile_id: segments.next(),
        },
        None => ResolvedAccess {
            token: query.get("token").unwrap_or_default().to_string(),
            profile_id: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_token_without_profile() {
        let access = resolve_access("/sub/abc123", &QueryParams::default());
        assert_eq!(access.token, "abc123");
        assert_eq!(access.profile_id, None);
    }

    #[test]
    fn path_token_with_profile_identifier() {
        let access = resolve_access("/sub/guest-tok/promoA", &QueryParams::default());
        assert_eq!(access.token, "guest-tok");
        assert_eq!(access.profile_id.as_deref(), Some("promoA"));
    }

    #[test]
    fn bare_path_falls_back_to_query_token() {
        let query = QueryParams::parse(Some("token=abc123&target=clash"));
        let access = resolve_access("/sub", &query);
        assert_eq!(access.token, "abc123");
        assert_eq!(access.profile_id, None);

        let access = resolve_access("/sub/", &query);
        assert_eq!(access.token, "abc123");
    }

    #[test]
    fn missing_everything_yields_empty_token() {
        let access = resolve_access("/sub", &QueryParams::default());
        assert_eq!(access.token, "");
        assert_eq!(access.profile_id, None);
    }

    #[test]
    fn percent_encoded_segments_decode() {
        let access = resolve_access("/sub/abc%20123/promo%2FA", &QueryParams::default());
        assert_eq!(access.token, "abc 123");
        assert_eq!(access.profile_id.as_deref(), Some("promo/A"));
    }

    #[test]
    fn bare_flags_parse_as_empty_valued_keys() {
        let query = QueryParams::parse(Some("clash&token=t"));
        assert!(query.has("clash"));
        assert_eq!(query.get("clash"), Some(""));
        assert_eq!(query.get("token"), Some("t"));
        assert!(!query.has("surge"));
    }
}
