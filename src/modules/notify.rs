use chrono::{DateTime, Local, Utc};
use tracing::{debug, warn};

use crate::models::NotifySettings;

/// Everything the notification text needs, captured before the response is
/// sent so the spawned task owns its data.
#[derive(Debug, Clone)]
pub struct AccessEvent {
    pub domain: String,
    pub client_ip: Option<String>,
    pub user_agent: String,
    pub target: String,
    /// Profile display name and expiry, present only for profile access.
    pub profile: Option<(String, Option<DateTime<Utc>>)>,
}

/// Fire-and-forget: scheduled after the response is determined, never blocks
/// response delivery, and its failure never reaches the client.
pub fn schedule_access_notification(settings: NotifySettings, event: AccessEvent) {
    if !settings.is_usable() {
        debug!("Access notification skipped: notify target not configured");
        return;
    }

    tokio::spawn(async move {
        if let Err(e) = send_telegram(&settings, &event).await {
            warn!("Access notification delivery failed: {}", e);
        }
    });
}

fn build_message(event: &AccessEvent) -> String {
    let mut text = format!(
        "#subscription accessed\nDomain: `{}`\nIP: `{}`\nTarget: `{}`\nUA: `{}`",
        event.domain,
        event.client_ip.as_deref().unwrap_or("unknown"),
        event.target,
        event.user_agent,
    );

    if let Some((name, expires_at)) = &event.profile {
        text.push_str(&format!("\nProfile: `{}`", name));
        if let Some(expires) = expires_at {
            let local = expires.with_timezone(&Local);
            text.push_str(&format!(
                "\nExpires: `{}`",
                local.format("%Y-%m-%d %H:%M:%S")
            ));
        }
    }

    text
}

async fn send_telegram(settings: &NotifySettings, event: &AccessEvent) -> Result<(), String> {
    let url = format!(
        "https://api.telegram.org/bot{}/sendMessage",
        settings.bot_token
    );
    let body = serde_json::json!({
        "chat_id": settings.chat_id,
        "text": build_message(event),
        "parse_mode": "Markdown",
        "disable_web_page_preview": true,
    });

    let response = crate::utils::http::get_client()
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("sendMessage request failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(format!("sendMessage returned {}: {}", status, detail));
    }

    debug!("Access notification delivered");
    Ok(())
}
