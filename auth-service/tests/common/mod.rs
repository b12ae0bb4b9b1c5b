#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use auth::FixedClock;
use auth::PurposeSettings;
use auth::TokenAuthority;
use auth::TokenAuthorityConfig;
use auth_service::account::errors::MailError;
use auth_service::account::errors::RepositoryError;
use auth_service::domain::account::models::MailTemplate;
use auth_service::domain::account::models::NewUser;
use auth_service::domain::account::models::User;
use auth_service::domain::account::models::UserId;
use auth_service::domain::account::ports::AccountServicePort;
use auth_service::domain::account::ports::MailDispatcher;
use auth_service::domain::account::ports::UserRepository;
use auth_service::domain::account::service::AccountService;
use auth_service::inbound::grpc::AuthGrpcService;
use auth_service::inbound::http::router::create_router;
use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;

pub const ACCESS_TTL_MINUTES: i64 = 15;
pub const GENERIC_TTL_HOURS: i64 = 24;

/// Repository backed by a map; enforces email uniqueness like the unique index.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn count_by_email(&self, email: &str) -> usize {
        self.users
            .lock()
            .unwrap()
            .values()
            .filter(|user| user.email.as_str() == email)
            .count()
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned()
    }

    pub fn remove(&self, id: &UserId) {
        self.users.lock().unwrap().remove(id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.get_by_email(email))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|existing| existing.email == user.email)
        {
            return Err(RepositoryError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            confirmed: user.confirmed,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update_confirmed(&self, id: &UserId, confirmed: bool) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        user.confirmed = confirmed;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn list_confirmed(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|user| user.confirmed)
            .cloned()
            .collect();
        users.sort_by_key(|user| user.created_at);
        Ok(users)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to_name: String,
    pub to_email: String,
    pub subject: String,
    pub template: MailTemplate,
    pub token: String,
}

/// Dispatcher that keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailDispatcher {
    sent: Mutex<Vec<SentMail>>,
    failing: AtomicBool,
}

impl RecordingMailDispatcher {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Token of the most recent mail to `email` using `template`.
    pub fn last_token(&self, email: &str, template: MailTemplate) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|mail| mail.to_email == email && mail.template == template)
            .map(|mail| mail.token.clone())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MailDispatcher for RecordingMailDispatcher {
    async fn send(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        template: MailTemplate,
        token: &str,
    ) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Rejected {
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        self.sent.lock().unwrap().push(SentMail {
            to_name: to_name.to_string(),
            to_email: to_email.to_string(),
            subject: subject.to_string(),
            template,
            token: token.to_string(),
        });
        Ok(())
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn token_authority(clock: Arc<FixedClock>) -> Arc<TokenAuthority> {
    let config = TokenAuthorityConfig::new(
        "auth-service-test",
        PurposeSettings::new(
            "test-access-secret-key-at-least-32-bytes",
            Duration::minutes(ACCESS_TTL_MINUTES),
        ),
        PurposeSettings::new(
            "test-refresh-secret-key-at-least-32-bytes",
            Duration::days(7),
        ),
        PurposeSettings::new(
            "test-generic-secret-key-at-least-32-bytes",
            Duration::hours(GENERIC_TTL_HOURS),
        ),
    )
    .expect("Invalid token authority config");

    Arc::new(TokenAuthority::with_clock(config, clock))
}

/// Account service over in-memory collaborators and a manually driven clock.
pub struct TestContext {
    pub repository: Arc<InMemoryUserRepository>,
    pub mailer: Arc<RecordingMailDispatcher>,
    pub clock: Arc<FixedClock>,
    pub authority: Arc<TokenAuthority>,
    pub service: Arc<dyn AccountServicePort>,
}

impl TestContext {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryUserRepository::default());
        let mailer = Arc::new(RecordingMailDispatcher::default());
        let clock = Arc::new(FixedClock::new(start_time()));
        let authority = token_authority(clock.clone());

        let service: Arc<dyn AccountServicePort> = Arc::new(AccountService::new(
            repository.clone(),
            mailer.clone(),
            authority.clone(),
        ));

        Self {
            repository,
            mailer,
            clock,
            authority,
            service,
        }
    }

    pub fn grpc(&self) -> AuthGrpcService {
        AuthGrpcService::new(self.service.clone())
    }
}

/// Test application that spawns a real HTTP server over a `TestContext`
pub struct TestApp {
    pub address: String,
    pub context: TestContext,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let context = TestContext::new();

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(context.service.clone(), StdDuration::from_secs(5));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            context,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }
}
