//! Shared application state injected into every handler.

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::{AuthService, SessionService, TodoService, UrlService};
use crate::config::Config;
use crate::domain::repositories::{ShortUrlRepository, TodoRepository, UserRepository};
use crate::infrastructure::memory::{
    MemoryShortUrlRepository, MemoryTodoRepository, MemoryUserRepository,
};
use crate::infrastructure::persistence::{
    PgShortUrlRepository, PgTodoRepository, PgUserRepository,
};

/// Where the repositories keep their data.
#[derive(Clone)]
pub enum Storage {
    Postgres(Arc<PgPool>),
    Memory,
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            Storage::Postgres(_) => "postgres",
            Storage::Memory => "memory",
        }
    }

    /// Round-trips to the backing store.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        match self {
            Storage::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool.as_ref()).await?;
                Ok(())
            }
            Storage::Memory => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub session_service: Arc<SessionService<dyn UserRepository>>,
    pub auth_service: Arc<AuthService<dyn UserRepository>>,
    pub url_service: Arc<UrlService<dyn ShortUrlRepository>>,
    pub todo_service: Arc<TodoService<dyn TodoRepository>>,
    pub cookie_secure: bool,
}

impl AppState {
    /// Wires services on top of the given repositories.
    ///
    /// # Errors
    ///
    /// Returns an error if the session or short code settings are invalid.
    pub fn new(
        storage: Storage,
        users: Arc<dyn UserRepository>,
        short_urls: Arc<dyn ShortUrlRepository>,
        todos: Arc<dyn TodoRepository>,
        config: &Config,
    ) -> anyhow::Result<Self> {
        let session_service = Arc::new(
            SessionService::new(users.clone(), config.session_config()?)
                .map_err(|e| anyhow::anyhow!("Invalid session settings: {}", e))?,
        );

        let auth_service = Arc::new(AuthService::new(
            users,
            session_service.clone(),
            config.password_min_length,
        ));

        Ok(Self {
            storage,
            session_service,
            auth_service,
            url_service: Arc::new(UrlService::new(short_urls, config.code_generator()?)),
            todo_service: Arc::new(TodoService::new(todos)),
            cookie_secure: config.cookie_secure,
        })
    }

    /// State backed by PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: Arc<PgPool>, config: &Config) -> anyhow::Result<Self> {
        Self::new(
            Storage::Postgres(pool.clone()),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgShortUrlRepository::new(pool.clone())),
            Arc::new(PgTodoRepository::new(pool)),
            config,
        )
    }

    /// State backed by in-process repositories.
    pub fn in_memory(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            Storage::Memory,
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryShortUrlRepository::new()),
            Arc::new(MemoryTodoRepository::new()),
            config,
        )
    }
}
