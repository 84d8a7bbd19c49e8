use std::sync::LazyLock;

/// Fixed leading path segment stripped by the token resolver.
pub const SUB_PATH_PREFIX: &str = "/sub";

/// Query parameter carrying the derived callback token on converter fetch-backs.
pub const CALLBACK_TOKEN_PARAM: &str = "callback_token";

// Storage collaborator keys. The core only ever reads these three.
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_SUBSCRIPTIONS: &str = "subscriptions";
pub const KEY_PROFILES: &str = "profiles";

/// Placeholder node set substituted verbatim whenever a profile is expired.
/// Never filtered, never mixed with real entries. The credentials are inert
/// (`chacha20-ietf-poly1305:expired`); only the names are meant to be seen.
pub const EXPIRED_NODE_URIS: [&str; 4] = [
    "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpleHBpcmVk@127.0.0.1:8801#Subscription%20expired",
    "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpleHBpcmVk@127.0.0.1:8802#Please%20renew%20your%20plan",
    "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpleHBpcmVk@127.0.0.1:8803#Profile%20disabled%20after%20expiry",
    "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpleHBpcmVk@127.0.0.1:8804#Contact%20your%20provider",
];

pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    format!(
        "subgate/{} {}/{}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
});
