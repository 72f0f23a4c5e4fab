//! Runtime configuration for the alliance portal.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    pub server_addr: String,
    pub redis_url: String,
    /// HMAC secret used to sign access tokens.
    pub jwt_secret: String,
    /// Access-token lifetime (minutes).
    pub access_ttl_minutes: i64,
    /// Refresh-token lifetime (seconds) in Redis.
    pub refresh_ttl: u64,
    /// Password assigned to every account created by a bulk import.
    pub default_member_password: String,
    /// Send a credential notice to each member created by a bulk import.
    pub notify_new_members: bool,
    pub send_email_url: String,
    /// Link included in credential notices.
    pub portal_url: String,
}

impl Settings {
    fn from_env() -> Self {
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());
        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_default();

        let access_ttl_minutes = env::var("ACCESS_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(15);

        let refresh_ttl = env::var("REFRESH_TOKEN_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30)
            * 24
            * 3_600;

        let default_member_password =
            env::var("DEFAULT_MEMBER_PASSWORD").unwrap_or_else(|_| "Changeme123".into());

        let notify_new_members = env::var("NOTIFY_NEW_MEMBERS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let send_email_url = env::var("SEND_EMAIL_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000/api/send-email".into());
        let portal_url = env::var("PORTAL_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".into());

        if jwt_secret.is_empty() {
            log::warn!("JWT_SECRET is not set; every authenticated request will be rejected");
        }

        Settings {
            server_addr,
            redis_url,
            jwt_secret,
            access_ttl_minutes,
            refresh_ttl,
            default_member_password,
            notify_new_members,
            send_email_url,
            portal_url,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
