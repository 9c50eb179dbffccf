use crate::domain::otp::{OtpFlow, OtpSlot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Maps the free-text category sent by clients. Anything other than
    /// "admin" falls back to a regular user.
    pub fn from_category(category: &str) -> Self {
        if category.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub is_email_verified: bool,
    pub signup_otp: Option<OtpSlot>,
    pub reset_otp: Option<OtpSlot>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn otp_slot(&self, flow: OtpFlow) -> Option<&OtpSlot> {
        match flow {
            OtpFlow::Signup => self.signup_otp.as_ref(),
            OtpFlow::Reset => self.reset_otp.as_ref(),
        }
    }

    /// Replaces whatever was pending for `flow`; there is only ever one slot.
    pub fn set_otp_slot(&mut self, flow: OtpFlow, slot: Option<OtpSlot>) {
        match flow {
            OtpFlow::Signup => self.signup_otp = slot,
            OtpFlow::Reset => self.reset_otp = slot,
        }
    }
}

/// What clients are allowed to see of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_email_verified: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            is_email_verified: user.is_email_verified,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupVerifyRequest {
    pub user_id: String,
    pub otp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A verified identity together with a freshly minted session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}
