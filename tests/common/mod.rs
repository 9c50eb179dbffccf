#![allow(dead_code, unused_macros)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fast_budget_api::domain::notification::OtpNotifier;
use fast_budget_api::domain::otp::OtpFlow;
use std::sync::{Arc, Mutex};

pub const JWT_SECRET: &str = "test-secret-key-for-integration-tests";

#[derive(Debug, Clone)]
pub struct SentOtp {
    pub to: String,
    pub code: String,
    pub flow: OtpFlow,
}

/// Captures dispatched codes instead of mailing them.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentOtp>>>,
}

impl RecordingNotifier {
    pub fn last_code(&self, to: &str, flow: OtpFlow) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.to == to && s.flow == flow)
            .map(|s| s.code.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl OtpNotifier for RecordingNotifier {
    async fn send_otp(&self, to: &str, code: &str, flow: OtpFlow) -> Result<()> {
        self.sent.lock().unwrap().push(SentOtp {
            to: to.to_string(),
            code: code.to_string(),
            flow,
        });
        Ok(())
    }
}

/// Simulates a mail server that is down.
pub struct FailingNotifier;

#[async_trait]
impl OtpNotifier for FailingNotifier {
    async fn send_otp(&self, _to: &str, _code: &str, _flow: OtpFlow) -> Result<()> {
        Err(anyhow!("smtp connection refused"))
    }
}

/// A code guaranteed to differ from `code`.
pub fn wrong_code(code: &str) -> String {
    if code == "111111" {
        "222222".to_string()
    } else {
        "111111".to_string()
    }
}

/// Builds the full app over fresh in-memory stores.
/// Evaluates to `(app, notifier, user_repository)`.
macro_rules! setup_app {
    () => {{
        let notifier = common::RecordingNotifier::default();
        let user_repository =
            ::std::sync::Arc::new(::fast_budget_api::data::user_repository::InMemoryUserRepository::new());
        let auth_service = ::fast_budget_api::application::auth_service::AuthService::new(
            user_repository.clone(),
            ::std::sync::Arc::new(notifier.clone()),
            common::JWT_SECRET.to_string(),
        );
        let expense_service = ::fast_budget_api::application::expense_service::ExpenseService::new(
            ::std::sync::Arc::new(
                ::fast_budget_api::data::expense_repository::InMemoryExpenseRepository::new(),
            ),
        );
        let state = ::actix_web::web::Data::new(::fast_budget_api::presentation::handlers::AppState {
            auth_service,
            expense_service,
        });

        let app = ::actix_web::test::init_service(
            ::actix_web::App::new()
                .app_data(state.clone())
                .wrap(::fast_budget_api::presentation::middleware::JwtAuthMiddleware::new(
                    common::JWT_SECRET.to_string(),
                ))
                .wrap(::fast_budget_api::presentation::middleware::TimingMiddleware)
                .wrap(::fast_budget_api::presentation::middleware::RequestIdMiddleware)
                .configure(::fast_budget_api::presentation::routes::configure),
        )
        .await;

        (app, notifier, user_repository)
    }};
}

/// Signs a user up over HTTP, verifies the dispatched code and evaluates to
/// the session token.
macro_rules! signup_verified {
    ($app:expr, $notifier:expr, $email:expr, $name:expr, $password:expr) => {{
        let req = ::actix_web::test::TestRequest::post()
            .uri("/api/auth/signup-send-otp")
            .set_json(::serde_json::json!({
                "email": $email,
                "password": $password,
                "name": $name,
            }))
            .to_request();
        let resp: ::serde_json::Value = ::actix_web::test::call_and_read_body_json(&$app, req).await;
        let user_id = resp["userId"].as_str().unwrap().to_string();
        let code = $notifier
            .last_code($email, ::fast_budget_api::domain::otp::OtpFlow::Signup)
            .unwrap();

        let req = ::actix_web::test::TestRequest::post()
            .uri("/api/auth/signup-verify-otp")
            .set_json(::serde_json::json!({ "userId": user_id, "otp": code }))
            .to_request();
        let resp: ::serde_json::Value = ::actix_web::test::call_and_read_body_json(&$app, req).await;
        resp["token"].as_str().unwrap().to_string()
    }};
}
