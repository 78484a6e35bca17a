//! Session gate: the session is an explicit value read from a signed
//! cookie, passed into gated handlers. Two states exist — anonymous (no
//! cookie, or one that fails signature verification) and authenticated.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;
use serde::{Deserialize, Serialize};
use shared::AuthResponse;

pub const SESSION_COOKIE: &str = "shelter_session";

/// The identity stored in an authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
}

/// Read the authenticated identity, if any. Cookies that fail signature
/// verification never reach this point; ones with an unreadable payload
/// read as anonymous.
pub fn current_user(jar: &SignedCookieJar) -> Option<SessionUser> {
    let cookie = jar.get(SESSION_COOKIE)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Transition to the authenticated state.
pub fn establish(jar: SignedCookieJar, user: &SessionUser) -> SignedCookieJar {
    // Serializing two plain strings cannot fail
    let value = serde_json::to_string(user).unwrap_or_default();
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Transition back to anonymous, clearing all session state.
pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
}

/// Whether the request declared it accepts JSON responses. Drives the
/// HTML-redirect-vs-JSON-body choice on gated routes.
pub fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// The response for an unauthenticated request to a gated route: a 401
/// for JSON clients, a redirect to the login page for everyone else.
pub fn denied(headers: &HeaderMap) -> Response {
    if accepts_json(headers) {
        denied_json()
    } else {
        Redirect::to("/login").into_response()
    }
}

/// The 401 body for API-only gated routes.
pub fn denied_json() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(AuthResponse::failure("Authentication required")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    fn test_key() -> Key {
        Key::from(&[7u8; 64])
    }

    fn session_user() -> SessionUser {
        SessionUser {
            id: "user-1".to_string(),
            username: "kerry".to_string(),
        }
    }

    #[test]
    fn test_empty_jar_is_anonymous() {
        let jar = SignedCookieJar::new(test_key());
        assert_eq!(current_user(&jar), None);
    }

    #[test]
    fn test_establish_then_read_back() {
        let jar = establish(SignedCookieJar::new(test_key()), &session_user());
        assert_eq!(current_user(&jar), Some(session_user()));
    }

    #[test]
    fn test_clear_returns_to_anonymous() {
        let jar = establish(SignedCookieJar::new(test_key()), &session_user());
        let jar = clear(jar);
        assert_eq!(current_user(&jar), None);
    }

    #[test]
    fn test_session_cookie_is_http_only() {
        let jar = establish(SignedCookieJar::new(test_key()), &session_user());
        let cookie = jar.get(SESSION_COOKIE).expect("cookie should be set");
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_accepts_json_reads_the_accept_header() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_json(&headers));

        headers.insert(header::ACCEPT, "text/html".parse().unwrap());
        assert!(!accepts_json(&headers));

        headers.insert(header::ACCEPT, "application/json".parse().unwrap());
        assert!(accepts_json(&headers));
    }

    #[test]
    fn test_denied_redirects_html_clients() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "text/html".parse().unwrap());

        let response = denied(&headers);
        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[test]
    fn test_denied_returns_401_to_json_clients() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "application/json".parse().unwrap());

        let response = denied(&headers);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
