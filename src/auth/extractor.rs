//! Actix-web extractor guarding the admin API.
//!
//! The presented key is wrapped in `SecretString` as soon as it is read and is
//! never logged.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use secrecy::{ExposeSecret, SecretString};
use std::future::{ready, Ready};

use super::AdminKey;
use crate::config::ADMIN_KEY_HEADER;
use crate::error::ErrorResponse;

/// Read a header as a secret. Missing or non-UTF-8 headers yield None.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
            fields: None,
        })
    }
}

/// Proof that the request carries a valid staff key.
///
/// ```ignore
/// async fn changelist(_staff: StaffAuth) -> impl Responder { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StaffAuth;

impl FromRequest for StaffAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(admin_key) = req.app_data::<web::Data<AdminKey>>() else {
            tracing::error!("AdminKey missing from app data");
            return ready(Err(AuthError {
                message: "Internal configuration error".to_string(),
            }));
        };

        let result = match extract_secret_header(req, ADMIN_KEY_HEADER) {
            Some(provided) if admin_key.verify(provided.expose_secret()) => Ok(StaffAuth),
            Some(_) => {
                tracing::warn!(path = %req.path(), "Rejected staff request with invalid key");
                Err(AuthError {
                    message: "Invalid admin key".to_string(),
                })
            }
            None => Err(AuthError {
                message: format!("Missing admin key. Provide {} header.", ADMIN_KEY_HEADER),
            }),
        };

        ready(result)
    }
}
