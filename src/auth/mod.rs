use std::collections::HashSet;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;
use crate::models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, roles: Vec<Role>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self { sub: user_id, email, roles, exp, iat: now.timestamp() }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    TokenValidation(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::TokenValidation(msg) => write!(f, "JWT validation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn decode_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::TokenValidation(e.to_string()))
}

/// Salted password digest in `salt$hexdigest` form.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// The identity a request is rendered for. Anonymous viewers still get the
/// public catalog; the roles and enrollment set only gate the lesson video
/// field.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub user: Option<ViewerUser>,
}

#[derive(Debug, Clone)]
pub struct ViewerUser {
    pub id: Uuid,
    pub roles: Vec<Role>,
    pub enrolled_course_ids: HashSet<Uuid>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_super_admin(&self) -> bool {
        self.user.as_ref().map_or(false, |u| u.roles.contains(&Role::SuperAdmin))
    }

    pub fn is_seller(&self) -> bool {
        self.user.as_ref().map_or(false, |u| u.roles.contains(&Role::Seller))
    }

    pub fn is_enrolled_in(&self, course_id: &Uuid) -> bool {
        self.user.as_ref().map_or(false, |u| u.enrolled_course_ids.contains(course_id))
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Whether this viewer may see a lesson video for a course owned by
    /// `seller_id`: super admins, the owning seller, and enrolled users.
    pub fn can_view_video(&self, course_id: &Uuid, seller_id: &Uuid) -> bool {
        if self.is_super_admin() {
            return true;
        }
        if self.is_seller() && self.user_id() == Some(*seller_id) {
            return true;
        }
        self.is_enrolled_in(course_id)
    }
}
