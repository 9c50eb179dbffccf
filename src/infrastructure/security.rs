use crate::domain::user::Role;
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

// Argon2 parameters for 50-150ms target latency
const ARGON2_M_COST: u32 = 19456; // 19 MB
const ARGON2_T_COST: u32 = 2; // 2 iterations
const ARGON2_P_COST: u32 = 1; // 1 parallelism

const OTP_LOWEST: u32 = 100_000;
const OTP_SPAN: u32 = 900_000;
// Largest multiple of OTP_SPAN below u32::MAX; draws above it are rejected.
const OTP_ACCEPT_BELOW: u32 = u32::MAX - (u32::MAX % OTP_SPAN);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// A freshly drawn code and the hash that gets stored in its place.
#[derive(Debug, Clone)]
pub struct GeneratedOtp {
    pub code: String,
    pub hash: String,
}

fn argon2() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
            .map_err(argon2::password_hash::Error::from)?,
    ))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match argon2()?.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Six digits, never starting with zero, uniform over 100000..=999999.
pub fn generate_otp_code() -> String {
    loop {
        let draw = OsRng.next_u32();
        if draw < OTP_ACCEPT_BELOW {
            return (OTP_LOWEST + draw % OTP_SPAN).to_string();
        }
    }
}

pub fn generate_otp() -> Result<GeneratedOtp, argon2::password_hash::Error> {
    let code = generate_otp_code();
    let hash = hash_password(&code)?;
    Ok(GeneratedOtp { code, hash })
}

pub fn generate_token(
    user_id: &str,
    role: Role,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp().max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: now + ttl_secs as usize,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 60; // 60 seconds leeway

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims)
}
