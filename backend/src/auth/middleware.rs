//! Middleware for protecting authenticated routes.
//!
//! This module validates the session cookie on every resource request and
//! injects the decoded claims into the request extensions before any handler
//! or repository code runs. Unauthenticated requests never reach the
//! database.

use crate::utils::jwt::JwtUtils;
use axum::{
    extract::Request,
    http::{StatusCode, header::COOKIE},
    middleware::Next,
    response::Response,
};

/// Name of the session cookie set at login
pub const SESSION_COOKIE: &str = "token";

/// Session authentication middleware
pub async fn session_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let token = extract_session_token(&request).ok_or(StatusCode::UNAUTHORIZED)?;

    let jwt_utils = JwtUtils::new().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    match jwt_utils.validate_token(&token) {
        Ok(claims) => {
            // Add claims to request extensions for use in handlers
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Pulls the session token out of the request's cookie header
fn extract_session_token(request: &Request) -> Option<String> {
    let cookie_header = request.headers().get(COOKIE)?.to_str().ok()?;

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(SESSION_COOKIE) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_cookie(header: &str) -> Request {
        Request::builder()
            .uri("/notes")
            .header(COOKIE, header)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let request = request_with_cookie("theme=dark; token=abc.def.ghi; lang=en");
        assert_eq!(
            extract_session_token(&request).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn missing_or_foreign_cookies_yield_none() {
        let request = request_with_cookie("theme=dark; tokenish=nope");
        assert_eq!(extract_session_token(&request), None);

        let request = Request::builder()
            .uri("/notes")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_session_token(&request), None);
    }
}
