//! Username/password accounts and bearer sessions.
//!
//! Passwords are stored as bcrypt hashes. Sessions live in memory, expire
//! after [`DEFAULT_SESSION_TTL`] and die with the process. A session token
//! resolves to a [`RequestContext`]; unknown or expired tokens resolve to an
//! anonymous context rather than an error, so resolvers decide what anonymity
//! means.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::entity::user;
use crate::error::{Result, TaskError};
use crate::TaskStore;

pub use bcrypt::DEFAULT_COST;

/// Lowest cost bcrypt accepts (bcrypt keeps its own `MIN_COST` private).
pub const MIN_COST: u32 = 4;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A logged-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: String,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Clone)]
pub struct Accounts {
    store: TaskStore,
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    session_ttl: Duration,
    hash_cost: u32,
}

impl Accounts {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: DEFAULT_SESSION_TTL,
            hash_cost: DEFAULT_COST,
        }
    }

    /// How long a session stays valid after login.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// bcrypt cost for new password hashes, between [`MIN_COST`] and 31.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Create an account. Usernames are trimmed and must be unique.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<user::Model> {
        let username = username.trim();
        if username.is_empty() {
            return Err(TaskError::Validation("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(TaskError::Validation("password must not be empty".into()));
        }
        if self.find_by_username(username).await?.is_some() {
            return Err(TaskError::Validation(format!(
                "username {} is already taken",
                username
            )));
        }

        let password_hash = hash_password(password, self.hash_cost).await?;
        let account = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(crate::server_time()),
        };
        let created = account.insert(&self.store).await?;
        log::info!("created account {}", created.username);
        Ok(created)
    }

    /// Return the account named `username`, creating it with `password` if missing.
    /// An existing account keeps its password.
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<user::Model> {
        match self.find_by_username(username.trim()).await? {
            Some(existing) => Ok(existing),
            None => self.create_user(username, password).await,
        }
    }

    /// Check credentials and open a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let account = self
            .find_by_username(username.trim())
            .await?
            .ok_or(TaskError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash).await? {
            log::warn!("failed login for {}", account.username);
            return Err(TaskError::InvalidCredentials);
        }

        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id: account.id,
        };
        let now = Instant::now();
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|_, entry| entry.is_live(now));
            sessions.insert(
                session.token.clone(),
                SessionEntry {
                    user_id: session.user_id.clone(),
                    expires_at: now + self.session_ttl,
                },
            );
        }
        log::info!("{} logged in", account.username);
        Ok(session)
    }

    /// Close a session. Returns false if the token was not open.
    pub fn logout(&self, token: &str) -> bool {
        self.sessions
            .write()
            .map(|mut sessions| sessions.remove(token).is_some())
            .unwrap_or(false)
    }

    /// Resolve an optional bearer token into a request context.
    pub fn context_for(&self, token: Option<&str>) -> RequestContext {
        let now = Instant::now();
        let user_id = token.and_then(|token| {
            self.sessions.read().ok().and_then(|sessions| {
                sessions
                    .get(token)
                    .filter(|entry| entry.is_live(now))
                    .map(|entry| entry.user_id.clone())
            })
        });
        match user_id {
            Some(user_id) => RequestContext::for_user(user_id),
            None => RequestContext::anonymous(),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.store)
            .await?)
    }
}

// bcrypt blocks for tens of milliseconds per call; run it on the blocking pool.
async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| TaskError::PasswordHash(e.to_string()))?
        .map_err(|e| TaskError::PasswordHash(e.to_string()))
}

async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| TaskError::PasswordHash(e.to_string()))?
        .map_err(|e| TaskError::PasswordHash(e.to_string()))
}
