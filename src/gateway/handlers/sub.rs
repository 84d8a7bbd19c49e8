use axum::extract::{ConnectInfo, RawQuery, State};
use axum::http::{header, HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

use crate::constants::{KEY_PROFILES, KEY_SETTINGS, KEY_SUBSCRIPTIONS};
use crate::error::{AppError, AppResult};
use crate::gateway::state::CoreServices;
use crate::gateway::{authorize, callback, format, middleware, respond, select, token, traffic};
use crate::models::{AppSettings, Profile, SubscriptionEntry};
use crate::modules::{compose, notify};

/// Resolve a subscription request into a composed node list, either raw
/// base64 or transformed by the external converter.
pub async fn handle_sub(
    State(core): State<Arc<CoreServices>>,
    uri: Uri,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    match resolve_request(core, uri, raw_query, &headers, connect_info).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn resolve_request(
    core: Arc<CoreServices>,
    uri: Uri,
    raw_query: Option<String>,
    headers: &HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> AppResult<Response> {
    let query = token::QueryParams::parse(raw_query.as_deref());
    let user_agent = header_str(headers, header::USER_AGENT);
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost")
        .to_string();
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http")
        .to_string();

    // One immutable storage snapshot per request; the three reads have no
    // ordering dependency and are awaited jointly.
    let (settings_value, entries_value, profiles_value) = tokio::join!(
        core.store.get(KEY_SETTINGS),
        core.store.get(KEY_SUBSCRIPTIONS),
        core.store.get(KEY_PROFILES),
    );

    let mut settings = AppSettings::from_stored(settings_value?);
    settings.apply_env_overrides();
    let entries = parse_list::<SubscriptionEntry>(entries_value?, KEY_SUBSCRIPTIONS)?;
    let profiles = parse_list::<Profile>(profiles_value?, KEY_PROFILES)?;

    let access = token::resolve_access(uri.path(), &query);
    let auth = authorize::authorize(
        &access.token,
        access.profile_id.as_deref(),
        &settings,
        &profiles,
        Utc::now(),
    )?;

    let target = format::negotiate_format(&query, &user_agent);
    let nodes = select::select_nodes(&auth, &entries);
    let backend = select::resolve_converter(&auth, &settings)?;

    let banner = traffic::traffic_banner(&nodes);
    let usage = traffic::usage_header(&nodes, auth.profile());
    let text = compose::compose_node_list(
        &nodes.entries,
        banner.as_deref(),
        auth.profile().and_then(|p| p.prefix.as_ref()),
    );

    let callback_token = callback::derive_callback_token(&settings.mytoken);
    let display_name = auth
        .profile()
        .map(|p| p.name.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or(settings.file_name.as_str())
        .to_string();

    let response = if target.eq_ignore_ascii_case(format::FORMAT_BASE64)
        || callback::is_valid_callback(&query, &callback_token)
    {
        // Covers both the user-facing raw path and the converter's
        // authenticated fetch-back, which pins target=base64.
        respond::base64_response(&text, settings.update_interval_hours, usage.as_deref())
    } else {
        let callback_url = callback::build_callback_url(
            &scheme,
            &host,
            &access.token,
            access.profile_id.as_deref(),
            &callback_token,
        );
        let converter_url = respond::build_converter_url(&backend, &target, &callback_url);
        debug!("Forwarding to converter: target={}", target);
        respond::relay_converted(
            &converter_url,
            &display_name,
            settings.update_interval_hours,
            usage.as_deref(),
        )
        .await?
    };

    if !callback::is_machine_callback(&query) {
        notify::schedule_access_notification(
            settings.notify.clone(),
            notify::AccessEvent {
                domain: host,
                client_ip: middleware::extract_client_ip(connect_info.as_ref()),
                user_agent,
                target,
                profile: auth
                    .profile()
                    .map(|p| (p.name.clone(), p.expires_at)),
            },
        );
    }

    Ok(response)
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn parse_list<T: serde::de::DeserializeOwned>(
    value: Option<serde_json::Value>,
    key: &str,
) -> AppResult<Vec<T>> {
    match value {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| AppError::Storage(format!("malformed {} list: {}", key, e))),
    }
}
