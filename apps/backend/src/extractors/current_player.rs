//! Resolves the acting player from an `Authorization: Bearer <jwt>` header.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};

use crate::auth::jwt::verify_access_token;
use crate::domain::state::UserId;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// The authenticated user behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentPlayer {
    pub user_id: UserId,
}

/// Token part of a `Bearer <token>` header value.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

fn resolve(req: &HttpRequest) -> Result<CurrentPlayer, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::unauthorized_missing_bearer)?
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;
    let token = parse_bearer(value).ok_or_else(AppError::unauthorized_missing_bearer)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not configured"))?;
    let claims = verify_access_token(token, &state.security)?;

    Ok(CurrentPlayer {
        user_id: claims.user_id()?,
    })
}

impl FromRequest for CurrentPlayer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
