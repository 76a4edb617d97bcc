use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout; a session not validated for this long is expired.
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub sendgrid_api_key: Option<String>,
    pub recipient: String,
    pub sender: String,
}

/// Out-of-band admin provisioning. No API route can set the admin flag, so
/// the only admin account is the one seeded from the environment at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub mail: MailConfig,
    pub admin: Option<AdminBootstrap>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let session = SessionConfig {
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let mail = MailConfig {
            sendgrid_api_key: std::env::var("SENDGRID_API_KEY").ok(),
            recipient: std::env::var("CONTACT_RECIPIENT")
                .unwrap_or_else(|_| "owner@portfolio.com".into()),
            sender: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@portfolio.com".into()),
        };
        let admin = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some(AdminBootstrap { username, password }),
            _ => None,
        };
        Ok(Self {
            session,
            mail,
            admin,
        })
    }
}
