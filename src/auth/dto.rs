use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{lenient_string, EMAIL_RE};

/// Request body for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(regex(path = "EMAIL_RE", message = "Please include a valid email"))]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub const FIELDS: &'static [&'static str] = &["email", "password"];
}

/// Response returned after login or registration.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
