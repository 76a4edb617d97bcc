use std::sync::Arc;

use axum::extract::FromRef;
use time::Duration;

use crate::auth::password::hash_password;
use crate::auth::session::{MemorySessionStore, SessionStore};
use crate::auth::users::UserStore;
use crate::config::AppConfig;
use crate::content::model::{Achievement, Project, Skill};
use crate::content::store::ContentStore;
use crate::mail::{LogMailer, Mailer, SendGridMailer};

/// Everything the routers need, built once at startup and handed around by
/// clone. Each store is owned here and only here; nothing is a process-wide
/// global, so tests can spin up as many independent states as they like.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub projects: Arc<ContentStore<Project>>,
    pub achievements: Arc<ContentStore<Achievement>>,
    pub skills: Arc<ContentStore<Skill>>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let users = Arc::new(UserStore::new());
        if let Some(admin) = &config.admin {
            let hash = hash_password(&admin.password)?;
            let user = users.create_admin(&admin.username, &hash)?;
            tracing::info!(user_id = user.id, username = %user.username, "admin account seeded");
        }

        let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(
            Duration::minutes(config.session.ttl_minutes),
        ));

        let mailer: Arc<dyn Mailer> = match &config.mail.sendgrid_api_key {
            Some(key) => Arc::new(SendGridMailer::new(
                key,
                &config.mail.recipient,
                &config.mail.sender,
            )),
            None => Arc::new(LogMailer),
        };

        Ok(Self {
            users,
            sessions,
            projects: Arc::new(ContentStore::new()),
            achievements: Arc::new(ContentStore::new()),
            skills: Arc::new(ContentStore::new()),
            mailer,
            config,
        })
    }

    /// State with empty stores, a short session ttl and the log-only mailer.
    pub fn fake() -> Self {
        use crate::config::{MailConfig, SessionConfig};

        let config = Arc::new(AppConfig {
            session: SessionConfig { ttl_minutes: 5 },
            mail: MailConfig {
                sendgrid_api_key: None,
                recipient: "owner@test.local".into(),
                sender: "noreply@test.local".into(),
            },
            admin: None,
        });

        Self {
            users: Arc::new(UserStore::new()),
            sessions: Arc::new(MemorySessionStore::new(Duration::minutes(5))),
            projects: Arc::new(ContentStore::new()),
            achievements: Arc::new(ContentStore::new()),
            skills: Arc::new(ContentStore::new()),
            mailer: Arc::new(LogMailer),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<ContentStore<Project>> {
    fn from_ref(state: &AppState) -> Self {
        state.projects.clone()
    }
}

impl FromRef<AppState> for Arc<ContentStore<Achievement>> {
    fn from_ref(state: &AppState) -> Self {
        state.achievements.clone()
    }
}

impl FromRef<AppState> for Arc<ContentStore<Skill>> {
    fn from_ref(state: &AppState) -> Self {
        state.skills.clone()
    }
}
