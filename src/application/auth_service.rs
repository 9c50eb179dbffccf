use crate::domain::error::DomainError;
use crate::domain::notification::OtpNotifier;
use crate::domain::otp::{OtpFlow, OtpSlot};
use crate::domain::repository::UserRepository;
use crate::domain::user::{
    ForgotPasswordRequest, LoginRequest, PublicUser, ResetPasswordRequest, Role, Session,
    SignupRequest, SignupVerifyRequest, User,
};
use crate::domain::validation::{
    RESET_PASSWORD_MIN_LEN, SIGNUP_PASSWORD_MIN_LEN, normalize_email, validate_email,
    validate_name, validate_password,
};
use crate::infrastructure::security::{
    generate_otp, generate_token, hash_password, verify_password,
};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Signup verification, password reset and login.
///
/// Each flow keeps a single pending code on the user record: issuing again
/// overwrites the previous one. Verification clears the slot on success, so
/// a code verifies at most once. Two verifications racing on the same code
/// can both pass the comparison before either write lands; the store offers
/// no compare-and-swap and this window is accepted.
pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    notifier: Arc<dyn OtpNotifier>,
    jwt_secret: String,
    token_ttl_secs: u64,
}

// Logged once, by the error response.
fn internal(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Internal(format!("{}: {}", context, e))
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, notifier: Arc<dyn OtpNotifier>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            notifier,
            jwt_secret,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn with_token_ttl(mut self, token_ttl_secs: u64) -> Self {
        self.token_ttl_secs = token_ttl_secs;
        self
    }

    /// Draws a new code, stores its hash in the flow's slot and returns the
    /// plaintext for dispatch.
    fn issue_otp(&self, user: &mut User, flow: OtpFlow) -> Result<String> {
        let otp = generate_otp().map_err(|e| internal("Failed to generate OTP", e))?;
        user.set_otp_slot(flow, Some(OtpSlot::issued_at(otp.hash, Utc::now())));
        Ok(otp.code)
    }

    /// Compares `code` against the slot's hash. `Ok(false)` means mismatch.
    fn code_matches(&self, code: &str, slot: &OtpSlot) -> Result<bool> {
        verify_password(code, &slot.hash).map_err(|e| internal("Failed to verify OTP", e).into())
    }

    fn live_slot(user: &User, flow: OtpFlow) -> Option<OtpSlot> {
        user.otp_slot(flow)
            .filter(|slot| !slot.is_expired(Utc::now()))
            .cloned()
    }

    fn session_for(&self, user: &User) -> Result<Session> {
        let token = generate_token(&user.id, user.role, &self.jwt_secret, self.token_ttl_secs)
            .map_err(|e| internal("Failed to generate token", e))?;
        Ok(Session {
            token,
            user: PublicUser::from(user),
        })
    }

    /// Creates an unverified account and mails it a signup code. Signing up
    /// again while that code is live only re-sends a fresh code; the stored
    /// password, name and role are never replaced. Returns the user id the
    /// client verifies against.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn signup_send_otp(&self, req: SignupRequest) -> Result<String> {
        trace!("Starting signup");

        let name = validate_name(&req.name)?;
        let email = validate_email(&req.email)?;
        validate_password(&req.password, &name, SIGNUP_PASSWORD_MIN_LEN)?;
        let role = req.role.unwrap_or_default();

        let existing = self.user_repository.find_user_by_email(&email).await?;
        if existing.as_ref().is_some_and(|u| u.is_email_verified) {
            warn!(email = %email, "User already exists");
            return Err(DomainError::Conflict("User already exists".to_string()).into());
        }

        let mut user = match existing {
            // only the code is refreshed; the pending profile stays as first submitted
            Some(pending) if Self::live_slot(&pending, OtpFlow::Signup).is_some() => {
                debug!(user_id = %pending.id, "Re-sending signup code for pending user");
                pending
            }
            stale => {
                if let Some(stale) = stale {
                    self.user_repository.delete_user(&stale.id).await?;
                    debug!(user_id = %stale.id, "Stale pending signup replaced");
                }
                let password_hash = hash_password(&req.password)
                    .map_err(|e| internal("Failed to hash password", e))?;
                User {
                    id: Uuid::new_v4().to_string(),
                    email,
                    password_hash,
                    name,
                    role,
                    is_email_verified: false,
                    signup_otp: None,
                    reset_otp: None,
                    created_at: Utc::now(),
                }
            }
        };

        let code = self.issue_otp(&mut user, OtpFlow::Signup)?;
        self.user_repository.save_user(user.clone()).await?;

        // the stored code survives a failed dispatch; the client can re-issue
        self.notifier
            .send_otp(&user.email, &code, OtpFlow::Signup)
            .await?;

        info!(user_id = %user.id, "Signup OTP issued");
        Ok(user.id)
    }

    #[instrument(skip(self, req), fields(user_id = %req.user_id))]
    pub async fn signup_verify_otp(&self, req: SignupVerifyRequest) -> Result<Session> {
        let user_id = req.user_id.trim();
        let code = req.otp.trim();
        if user_id.is_empty() || code.is_empty() {
            return Err(DomainError::Validation("User ID and OTP are required".to_string()).into());
        }

        let mut user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = user_id, "Signup verification for unknown user");
                DomainError::NotFound("User not found".to_string())
            })?;

        if user.is_email_verified {
            warn!(user_id = %user.id, "Email already verified");
            return Err(DomainError::Conflict("Email already verified".to_string()).into());
        }

        let Some(slot) = Self::live_slot(&user, OtpFlow::Signup) else {
            // no orphaned unverified accounts outlive their code
            self.user_repository.delete_user(&user.id).await?;
            warn!(user_id = %user.id, "Signup OTP expired; pending user removed");
            return Err(DomainError::Expired(
                "OTP has expired. Please sign up again.".to_string(),
            )
            .into());
        };

        if !self.code_matches(code, &slot)? {
            warn!(user_id = %user.id, "Invalid signup OTP");
            return Err(DomainError::InvalidCredential("Invalid OTP".to_string()).into());
        }

        user.set_otp_slot(OtpFlow::Signup, None);
        user.is_email_verified = true;
        self.user_repository.save_user(user.clone()).await?;

        let session = self.session_for(&user)?;
        info!(user_id = %user.id, "Email verified");
        Ok(session)
    }

    #[instrument(skip(self, req), fields(email = %req.email, category = %req.category))]
    pub async fn forgot_password(&self, req: ForgotPasswordRequest) -> Result<()> {
        let email = normalize_email(&req.email);
        let category = req.category.trim().to_lowercase();
        if email.is_empty() || category.is_empty() {
            return Err(
                DomainError::Validation("Email and category are required".to_string()).into(),
            );
        }

        let role = Role::from_category(&category);
        let mut user = self
            .user_repository
            .find_user_by_email_and_role(&email, role)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, role = %role, "No user for password reset");
                DomainError::NotFound("Email not found for selected category".to_string())
            })?;

        let code = self.issue_otp(&mut user, OtpFlow::Reset)?;
        self.user_repository.save_user(user.clone()).await?;
        self.notifier
            .send_otp(&user.email, &code, OtpFlow::Reset)
            .await?;

        info!(user_id = %user.id, "Password reset OTP issued");
        Ok(())
    }

    #[instrument(skip(self, req), fields(email = %req.email, category = %req.category))]
    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<()> {
        let email = normalize_email(&req.email);
        let category = req.category.trim().to_lowercase();
        let code = req.otp.trim();
        if email.is_empty() || category.is_empty() || code.is_empty() || req.new_password.is_empty()
        {
            return Err(DomainError::Validation("All fields are required".to_string()).into());
        }

        let role = Role::from_category(&category);
        let mut user = self
            .user_repository
            .find_user_by_email_and_role(&email, role)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, role = %role, "No user for password reset");
                DomainError::NotFound("Email not found for selected category".to_string())
            })?;

        // checked before the code so a rejected password does not burn it
        validate_password(&req.new_password, &user.name, RESET_PASSWORD_MIN_LEN)?;

        let Some(slot) = Self::live_slot(&user, OtpFlow::Reset) else {
            warn!(user_id = %user.id, "Password reset OTP missing or expired");
            return Err(DomainError::Expired(
                "OTP has expired. Please request a new one.".to_string(),
            )
            .into());
        };

        if !self.code_matches(code, &slot)? {
            warn!(user_id = %user.id, "Invalid password reset OTP");
            return Err(DomainError::InvalidCredential("Invalid OTP".to_string()).into());
        }

        user.password_hash = hash_password(&req.new_password)
            .map_err(|e| internal("Failed to hash password", e))?;
        user.set_otp_slot(OtpFlow::Reset, None);
        self.user_repository.save_user(user.clone()).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<Session> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::InvalidCredential("Invalid credentials".to_string())
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash)
            .map_err(|e| internal("Failed to verify password", e))?;
        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::InvalidCredential("Invalid credentials".to_string()).into());
        }

        if !user.is_email_verified {
            warn!(user_id = %user.id, "Login before email verification");
            return Err(DomainError::Unauthorized("Email not verified".to_string()).into());
        }

        let session = self.session_for(&user)?;
        info!(user_id = %user.id, "Login successful");
        Ok(session)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> Result<PublicUser> {
        let user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;
        Ok(PublicUser::from(&user))
    }
}
