mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SmtpConfig};
pub use repos::{DeleteResult, IOrderRepo, Repos};
pub use services::*;
use services::mail::{IMailBackend, InMemoryMailBackend, SmtpMailBackend};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct MailerContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mail_backend: Arc<dyn IMailBackend>,
}

impl MailerContext {
    fn create_mail_backend(config: &Config) -> anyhow::Result<Arc<dyn IMailBackend>> {
        Ok(match &config.smtp {
            Some(smtp) => Arc::new(SmtpMailBackend::new(smtp)?),
            None => Arc::new(InMemoryMailBackend::new()),
        })
    }

    async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(connection_string).await?;
        let config = Config::new();
        Ok(Self {
            repos,
            mail_backend: Self::create_mail_backend(&config)?,
            config,
            sys: Arc::new(RealSys {}),
        })
    }

    /// Context with in-memory repositories and an in-memory outbox
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            mail_backend: Arc::new(InMemoryMailBackend::new()),
        }
    }

    pub fn with_mail_backend(mut self, mail_backend: Arc<dyn IMailBackend>) -> Self {
        self.mail_backend = mail_backend;
        self
    }

    pub fn with_sys(mut self, sys: Arc<dyn ISys>) -> Self {
        self.sys = sys;
        self
    }
}

/// Will setup the infrastructure context given the environment.
/// Uses in-memory repositories when no `DATABASE_URL` is set.
pub async fn setup_context() -> anyhow::Result<MailerContext> {
    match get_psql_connection_string() {
        Some(connection_string) => MailerContext::create_postgres(&connection_string).await,
        None => {
            info!("Did not find DATABASE_URL environment variable. Using in-memory repositories.");
            let mut ctx = MailerContext::create_inmemory();
            ctx.mail_backend = MailerContext::create_mail_backend(&ctx.config)?;
            Ok(ctx)
        }
    }
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .ok()
        .filter(|url| !url.is_empty())
}

/// Runs the migrations when a `DATABASE_URL` is set
pub async fn run_migration() -> Result<(), MigrateError> {
    let connection_string = match get_psql_connection_string() {
        Some(connection_string) => connection_string,
        None => return Ok(()),
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await?;

    sqlx::migrate!().run(&pool).await
}

/// In-memory context, plus a Postgres context when a database is configured
#[cfg(test)]
pub(crate) async fn create_test_contexts() -> Vec<MailerContext> {
    let mut contexts = vec![MailerContext::create_inmemory()];
    if let Some(connection_string) = get_psql_connection_string() {
        run_migration().await.expect("To run migrations");
        contexts.push(
            MailerContext::create_postgres(&connection_string)
                .await
                .expect("To connect to postgres"),
        );
    }
    contexts
}
