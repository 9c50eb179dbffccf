use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How long an issued code stays valid.
pub const OTP_TTL_MINUTES: i64 = 10;

/// The two independent one-time-code flows a user can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpFlow {
    Signup,
    Reset,
}

impl fmt::Display for OtpFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpFlow::Signup => write!(f, "signup"),
            OtpFlow::Reset => write!(f, "reset"),
        }
    }
}

/// A pending code: only the hash and the absolute expiry are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpSlot {
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpSlot {
    pub fn issued_at(hash: String, now: DateTime<Utc>) -> Self {
        Self {
            hash,
            expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
        }
    }

    /// A slot whose expiry is at or before `now` is dead.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
