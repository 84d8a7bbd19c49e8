use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::models::{AppSettings, Profile};

/// Outcome of the token check. Exactly one authorization path is active per
/// request: direct (full list) or profile.
#[derive(Debug, Clone)]
pub enum AccessMode {
    Direct,
    Profile(Profile),
}

#[derive(Debug, Clone)]
pub struct Authorized {
    pub mode: AccessMode,
    pub expired: bool,
}

impl Authorized {
    pub fn profile(&self) -> Option<&Profile> {
        match &self.mode {
            AccessMode::Profile(profile) => Some(profile),
            AccessMode::Direct => None,
        }
    }
}

fn constant_time_str_eq(left: &str, right: &str) -> bool {
    let left_bytes = left.as_bytes();
    let right_bytes = right.as_bytes();
    let max_len = left_bytes.len().max(right_bytes.len());
    let mut diff = left_bytes.len() ^ right_bytes.len();

    for i in 0..max_len {
        let l = left_bytes.get(i).copied().unwrap_or(0);
        let r = right_bytes.get(i).copied().unwrap_or(0);
        diff |= (l ^ r) as usize;
    }

    diff == 0
}

fn secret_matches(provided: &str, expected: &str) -> bool {
    !expected.is_empty() && constant_time_str_eq(provided, expected)
}

/// Validate the presented token and resolve the profile when one is named.
/// The shared-secret token is the entire trust boundary; there is no further
/// validation on purpose.
pub fn authorize(
    token: &str,
    profile_id: Option<&str>,
    settings: &AppSettings,
    profiles: &[Profile],
    now: DateTime<Utc>,
) -> AppResult<Authorized> {
    match profile_id {
        Some(identifier) => {
            if !secret_matches(token, &settings.profile_token) {
                return Err(AppError::Forbidden("profile token mismatch"));
            }

            let profile = profiles
                .iter()
                .find(|p| p.matches_identifier(identifier))
                .filter(|p| p.enabled)
                .cloned()
                .ok_or(AppError::ProfileNotFound)?;

            let expired = profile.is_expired(now);
            Ok(Authorized {
                mode: AccessMode::Profile(profile),
                expired,
            })
        }
        None => {
            if !secret_matches(token, &settings.mytoken) {
                return Err(AppError::Forbidden("direct token mismatch"));
            }
            Ok(Authorized {
                mode: AccessMode::Direct,
                expired: false,
            })
        }
    }
}
