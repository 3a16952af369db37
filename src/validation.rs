use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, ErrorMsg};

pub const INVALID_BODY: &str = "Invalid request body";

lazy_static! {
    pub static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// JSON body extractor that rejects with the `{errors: [...]}` shape.
///
/// Content-Type is not checked and an empty body reads as `{}`, so missing
/// input surfaces as field errors from the validators instead.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "failed to read request body");
            ApiError::Validation(vec![ErrorMsg::new(INVALID_BODY)])
        })?;
        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice::<Value>(&bytes).map_err(|e| {
                warn!(error = %e, "malformed json body");
                ApiError::Validation(vec![ErrorMsg::new(INVALID_BODY)])
            })?
        };
        if !value.is_object() {
            warn!("json body is not an object");
            return Err(ApiError::Validation(vec![ErrorMsg::new(INVALID_BODY)]));
        }
        serde_json::from_value(value).map(JsonBody).map_err(|e| {
            warn!(error = %e, "json body does not match request type");
            ApiError::Validation(vec![ErrorMsg::new(INVALID_BODY)])
        })
    }
}

/// Reads any JSON scalar as a string: numbers and booleans are stringified,
/// `null`, arrays and objects become empty and fail the field's validator.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Runs the derived validators and flattens failures into `{msg, param}`
/// entries, ordered as `fields` lists them.
pub fn validate_body<T: Validate>(body: &T, fields: &[&'static str]) -> Result<(), ApiError> {
    match body.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(ApiError::Validation(flatten(&errors, fields))),
    }
}

fn flatten(errors: &ValidationErrors, fields: &[&'static str]) -> Vec<ErrorMsg> {
    let by_field = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| by_field.get(field).map(|errs| (*field, *errs)))
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"));
                ErrorMsg::field(field, msg)
            })
        })
        .collect()
}
