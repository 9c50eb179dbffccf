use crate::domain::user::{
    ForgotPasswordRequest, LoginRequest, PublicUser, ResetPasswordRequest, Session,
    SignupRequest, SignupVerifyRequest,
};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: PublicUser,
    pub message: String,
}

impl SessionResponse {
    fn new(session: Session, message: &str) -> Self {
        Self {
            token: session.token,
            user: session.user,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn signup_send_otp(
    state: web::Data<AppState>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Signup request received");
    let user_id = state.auth_service.signup_send_otp(req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(SignupResponse {
        user_id,
        message: "OTP sent to your email address".to_string(),
    }))
}

#[instrument(skip(state, req), fields(user_id = %req.user_id))]
pub async fn signup_verify_otp(
    state: web::Data<AppState>,
    req: web::Json<SignupVerifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state
        .auth_service
        .signup_verify_otp(req.into_inner())
        .await?;

    info!(user_id = %session.user.id, "Signup verified");
    Ok(HttpResponse::Ok().json(SessionResponse::new(
        session,
        "Email verified successfully",
    )))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn forgot_password(
    state: web::Data<AppState>,
    req: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    state.auth_service.forgot_password(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("OTP sent to your email address")))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn reset_password(
    state: web::Data<AppState>,
    req: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    state.auth_service.reset_password(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "Password reset successful. Please login.",
    )))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state.auth_service.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SessionResponse::new(session, "Login successful")))
}

#[instrument(skip(state))]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user = state.auth_service.get_user(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(MeResponse { user }))
}
