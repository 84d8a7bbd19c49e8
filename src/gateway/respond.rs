use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{AppError, AppResult};
use crate::gateway::select::ConverterBackend;

const CACHE_CONTROL_VALUE: &str = "no-store, no-cache";

/// Targets whose converter invocation carries the rule config string.
const CONFIG_TARGETS: [&str; 3] = ["clash", "loon", "surge"];

fn common_headers(update_interval_hours: u32, usage: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_VALUE),
    );
    if let Ok(value) = HeaderValue::from_str(&update_interval_hours.to_string()) {
        headers.insert("profile-update-interval", value);
    }
    if let Some(usage) = usage {
        if let Ok(value) = HeaderValue::from_str(usage) {
            headers.insert("subscription-userinfo", value);
        }
    }
    headers
}

/// The raw-encoded path: base64 of the composed text, UTF-8 safe.
pub fn base64_response(
    text: &str,
    update_interval_hours: u32,
    usage: Option<&str>,
) -> Response {
    let body = STANDARD.encode(text.as_bytes());
    (StatusCode::OK, common_headers(update_interval_hours, usage), body).into_response()
}

/// Converter invocation URL. Bare backend hosts default to https; an
/// explicit scheme is honored as written.
pub fn build_converter_url(backend: &ConverterBackend, target: &str, callback_url: &str) -> String {
    let endpoint = backend.endpoint.trim_end_matches('/');
    let base = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    };

    let mut url = format!(
        "{}/sub?target={}&url={}&new_name=true",
        base,
        urlencoding::encode(target),
        urlencoding::encode(callback_url)
    );

    if CONFIG_TARGETS.contains(&target) && !backend.config.is_empty() {
        url.push_str(&format!("&config={}", urlencoding::encode(&backend.config)));
    }

    url
}

/// Forward to the external converter and relay its response. A transport
/// error or non-success status converts directly to 502; no retry.
pub async fn relay_converted(
    converter_url: &str,
    display_name: &str,
    update_interval_hours: u32,
    usage: Option<&str>,
) -> AppResult<Response> {
    let response = crate::utils::http::get_client()
        .get(converter_url)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "converter returned {}: {}",
            status, detail
        )));
    }

    let body = response.text().await?;

    let mut headers = common_headers(update_interval_hours, usage);
    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(display_name)
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK);
    Ok((status, headers, body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(endpoint: &str, config: &str) -> ConverterBackend {
        ConverterBackend {
            endpoint: endpoint.into(),
            config: config.into(),
        }
    }

    #[test]
    fn converter_url_carries_target_callback_and_new_name() {
        let url = build_converter_url(
            &backend("api.v1.mk", ""),
            "singbox",
            "https://gw.example/sub/t?target=base64&callback_token=cb",
        );
        assert!(url.starts_with("https://api.v1.mk/sub?target=singbox&url="));
        assert!(url.contains("new_name=true"));
        assert!(url.contains(&urlencoding::encode("https://gw.example/sub/t?target=base64&callback_token=cb").into_owned()));
        assert!(!url.contains("config="));
    }

    #[test]
    fn config_only_for_rule_based_targets_with_nonblank_config() {
        let with = build_converter_url(&backend("api.v1.mk", "cfg.ini"), "clash", "u");
        assert!(with.contains("&config=cfg.ini"));

        for target in ["loon", "surge"] {
            assert!(build_converter_url(&backend("api.v1.mk", "cfg.ini"), target, "u")
                .contains("&config="));
        }

        let base64 = build_converter_url(&backend("api.v1.mk", "cfg.ini"), "base64", "u");
        assert!(!base64.contains("&config="));

        let blank = build_converter_url(&backend("api.v1.mk", ""), "clash", "u");
        assert!(!blank.contains("&config="));
    }

    #[test]
    fn explicit_scheme_is_honored() {
        let url = build_converter_url(&backend("http://127.0.0.1:8080", ""), "clash", "u");
        assert!(url.starts_with("http://127.0.0.1:8080/sub?"));

        let trailing = build_converter_url(&backend("https://conv.example/", ""), "clash", "u");
        assert!(trailing.starts_with("https://conv.example/sub?"));
    }

    #[test]
    fn base64_response_encodes_utf8_and_disables_caching() {
        let response = base64_response("ss://node#名前\n", 6, Some("upload=1; download=2; total=3"));
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), CACHE_CONTROL_VALUE);
        assert_eq!(headers.get("profile-update-interval").unwrap(), "6");
        assert_eq!(
            headers.get("subscription-userinfo").unwrap(),
            "upload=1; download=2; total=3"
        );
    }

    #[tokio::test]
    async fn unreachable_converter_is_a_bad_gateway() {
        let err = relay_converted("http://127.0.0.1:9/sub?target=clash", "name", 6, None)
            .await
            .expect_err("should fail");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
