//! Bearer token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the token from the Authorization header
//! 2. Verify its signature and expiry
//! 3. Load the user it was issued to
//! 4. Inject the user into the request, or reject with HTTP 401

use crate::{app::AppState, error::AppError, models::user::User};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; handlers extract it with
/// `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user, as loaded at the start of the request
    pub user: User,
}

/// Read the token from the `Authorization` header.
///
/// The raw header value is the token. A `Bearer ` prefix is tolerated.
/// Returns `None` when the header is absent or empty; a value that is not
/// valid UTF-8 yields an empty token, which then fails validation.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION).filter(|v| !v.is_empty())?;
    let value = value.to_str().unwrap_or_default();
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}

/// Resolve a token to the user it was issued to.
///
/// Returns `Ok(None)` when the token is malformed, forged, expired, or
/// belongs to a user that no longer exists.
pub async fn user_for_token(state: &AppState, token: &str) -> Result<Option<User>, AppError> {
    let claims = match state.tokens.validate(token) {
        Ok(claims) => claims,
        Err(reason) => {
            tracing::debug!("Rejected token: {}", reason);
            return Ok(None);
        }
    };

    state.store.find_user_by_id(claims.sub).await
}

/// Token authentication middleware function.
///
/// # Flow
///
/// 1. Read the `Authorization` header
/// 2. Validate the token
/// 3. Load the user named by the token
/// 4. If found: inject `AuthContext` into request, call next handler
/// 5. Otherwise: return 401 Unauthorized
///
/// # Returns
///
/// - `Ok(Response)` if authenticated successfully (calls next handler)
/// - `Err(AppError::MissingToken)` if no token was sent
/// - `Err(AppError::InvalidToken)` if the token does not resolve to a user
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::MissingToken)?;

    let user = user_for_token(&state, token)
        .await?
        .ok_or(AppError::InvalidToken)?;

    request.extensions_mut().insert(AuthContext { user });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn reads_raw_token() {
        assert_eq!(bearer_token(&headers("abc.def")), Some("abc.def"));
    }

    #[test]
    fn strips_bearer_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn missing_or_empty_header_is_no_token() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("")), None);
    }
}
