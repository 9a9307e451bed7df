//! Shared wiring for the HTTP integration tests
//!
//! Real services and handlers over the in-memory adapters from `us_infra`.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::header,
    test, web,
};
use serde_json::{json, Value};

use us_api::AppState;
use us_core::domain::entities::notification::VerificationTask;
use us_core::services::credentials::{BcryptPasswordHasher, PasswordHasher};
use us_core::services::notification::NotificationDispatcher;
use us_core::services::registration::{NoopReplicator, RegistrationService};
use us_core::services::session::SessionService;
use us_core::services::token::{TokenService, TokenServiceConfig};
use us_core::services::verification::{VerificationService, VerificationServiceConfig};
use us_infra::memory::{InMemoryAccountRepository, InMemoryTaskQueue, InMemoryTokenRepository};
use us_infra::sms::MockSmsSender;

pub const EMAIL_QUEUE: &str = "email_queue";
pub const PASSWORD: &str = "Secret123!";

pub type TestState = AppState<InMemoryAccountRepository, InMemoryTokenRepository>;

pub struct TestContext {
    pub state: web::Data<TestState>,
    pub accounts: InMemoryAccountRepository,
    pub tokens: InMemoryTokenRepository,
    pub queue: InMemoryTaskQueue,
    pub sms: Arc<MockSmsSender>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_sms(MockSmsSender::new())
    }

    pub fn with_sms(sms: MockSmsSender) -> Self {
        let accounts = InMemoryAccountRepository::new();
        let tokens = InMemoryTokenRepository::new();
        let queue = InMemoryTaskQueue::new();
        let sms = Arc::new(sms);

        let accounts_arc = Arc::new(accounts.clone());
        let tokens_arc = Arc::new(tokens.clone());
        // Lowest bcrypt cost keeps the suite fast
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new(4));
        let token_service = Arc::new(TokenService::new(TokenServiceConfig::default()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(queue.clone()),
            EMAIL_QUEUE,
        ));

        let state = web::Data::new(AppState {
            sessions: Arc::new(SessionService::new(
                Arc::clone(&accounts_arc),
                Arc::clone(&tokens_arc),
                token_service,
                Arc::clone(&hasher),
            )),
            verification: Arc::new(VerificationService::new(
                Arc::clone(&accounts_arc),
                dispatcher,
                sms.clone(),
                VerificationServiceConfig::default(),
            )),
            registration: Arc::new(RegistrationService::new(
                Arc::clone(&accounts_arc),
                hasher,
                Arc::new(NoopReplicator),
            )),
            accounts: accounts_arc,
            database: None,
        });

        Self {
            state,
            accounts,
            tokens,
            queue,
            sms,
        }
    }

    pub fn origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    /// Code carried by the most recent queued verification email
    pub fn last_email_code(&self) -> Option<String> {
        self.queue
            .drain(EMAIL_QUEUE)
            .last()
            .and_then(|payload| VerificationTask::from_bytes(payload).ok())
            .and_then(|task| task.data.get("VerificationCode").cloned())
    }

    /// Code carried by the most recent SMS to `phone`
    pub fn last_sms_code(&self, phone: &str) -> Option<String> {
        self.sms
            .last_message_to(phone)
            .and_then(|sms| sms.body.split_whitespace().last().map(str::to_string))
    }
}

pub async fn post_json<S, B>(app: &S, uri: &str, body: Value, bearer: Option<&str>) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::post().uri(uri).set_json(body);
    if let Some(token) = bearer {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
    }
    send(app, req).await
}

/// POST an arbitrary body with the given content type
pub async fn post_raw<S, B>(
    app: &S,
    uri: &str,
    content_type: &str,
    body: &'static str,
    bearer: Option<&str>,
) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body);
    if let Some(token) = bearer {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
    }
    send(app, req).await
}

pub async fn get<S, B>(app: &S, uri: &str, bearer: Option<&str>) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(token) = bearer {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
    }
    send(app, req).await
}

async fn send<S, B>(app: &S, req: test::TestRequest) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = match app.call(req.to_request()).await {
        Ok(resp) => resp,
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status().as_u16();
            let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap_or_default();
            return (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null));
        }
    };
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn register<S, B>(app: &S, email: &str, phone: Option<&str>) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = post_json(
        app,
        "/api/v1/register",
        json!({ "email": email, "password": PASSWORD, "phone": phone, "first_name": "Alice" }),
        None,
    )
    .await;
    assert_eq!(status, 201, "register failed: {}", body);
    body
}

/// Log in and return `(access_token, refresh_token)`
pub async fn login<S, B>(app: &S, email: &str) -> (String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = post_json(
        app,
        "/api/v1/login",
        json!({ "email": email, "password": PASSWORD }),
        None,
    )
    .await;
    assert_eq!(status, 200, "login failed: {}", body);
    (
        body["access_token"].as_str().unwrap_or_default().to_string(),
        body["refresh_token"].as_str().unwrap_or_default().to_string(),
    )
}
