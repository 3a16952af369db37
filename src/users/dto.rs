use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::{
    users::repo_types::User,
    validation::{lenient_string, EMAIL_RE},
};

/// Request body for user registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(regex(path = "EMAIL_RE", message = "Please include a valid email"))]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
    pub password: String,
}

impl RegisterRequest {
    pub const FIELDS: &'static [&'static str] = &["name", "email", "password"];
}

/// Public part of the user returned to the client. Built field by field from
/// [`User`]; the password hash has no slot here.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            avatar: u.avatar,
            created_at: u.created_at,
        }
    }
}
