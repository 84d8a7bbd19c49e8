use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::constants::CALLBACK_TOKEN_PARAM;
use crate::gateway::token::QueryParams;

/// Domain-separation context for the callback token derivation; changing it
/// invalidates every callback URL in flight.
const DERIVE_CONTEXT: &[u8] = b"subgate::callback::v1";

/// Derive the callback token from the configured access secret. A pure
/// function: same secret, same token, process-wide and request-independent.
pub fn derive_callback_token(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(DERIVE_CONTEXT);
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Self-referencing URL the external converter fetches the composed list
/// from. Reuses the original access token (and profile identifier), pins
/// `target=base64`, and authenticates the fetch with the derived token.
pub fn build_callback_url(
    scheme: &str,
    host: &str,
    token: &str,
    profile_id: Option<&str>,
    callback_token: &str,
) -> String {
    let mut url = format!(
        "{}://{}/sub/{}",
        scheme,
        host,
        urlencoding::encode(token)
    );
    if let Some(profile) = profile_id {
        url.push('/');
        url.push_str(&urlencoding::encode(profile));
    }
    url.push_str(&format!(
        "?target=base64&{}={}",
        CALLBACK_TOKEN_PARAM, callback_token
    ));
    url
}

/// Exact match against the derived token authenticates a converter
/// fetch-back and short-circuits to the base64 output.
pub fn is_valid_callback(query: &QueryParams, callback_token: &str) -> bool {
    query.get(CALLBACK_TOKEN_PARAM) == Some(callback_token)
}

/// Any request carrying the parameter at all is machine-originated, matching
/// or not; it must never trigger the access notification a second time.
pub fn is_machine_callback(query: &QueryParams) -> bool {
    query.has(CALLBACK_TOKEN_PARAM)
}
