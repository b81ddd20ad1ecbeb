//! Requesting-user extraction

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cluezy_core::traits::Credentials;

use crate::state::AppState;

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// User id resolved by the state's identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let credentials = Credentials {
            user_id: parts
                .headers
                .get(USER_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(String::from),
        };
        Ok(CurrentUser(state.identity.current_user(&credentials)))
    }
}
