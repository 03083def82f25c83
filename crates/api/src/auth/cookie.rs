//! Session cookie construction and constants.
//!
//! The session token travels in an `HttpOnly` cookie so server-rendered pages
//! are authenticated without any client-side token handling. Writes build the
//! raw `Set-Cookie` value; reads go through `axum_extra`'s `CookieJar` in the
//! auth middleware.

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Value written by logout. Not a valid token, so any request still carrying
/// it resolves to anonymous until the cookie itself expires moments later.
pub const LOGOUT_SENTINEL: &str = "loggedout";

/// Lifetime of the logout sentinel cookie in seconds.
pub const LOGOUT_MAX_AGE_SECS: i64 = 5;

/// `Set-Cookie` value carrying a fresh session token.
///
/// `HttpOnly` always; the `Secure` attribute is added only when `secure` is
/// set (production deployments behind TLS).
pub fn session_cookie(token: &str, expiry_days: i64, secure: bool) -> String {
    build(token, expiry_days * 24 * 60 * 60, secure)
}

/// `Set-Cookie` value that overwrites the session with the short-lived logout
/// sentinel.
pub fn logout_cookie(secure: bool) -> String {
    build(LOGOUT_SENTINEL, LOGOUT_MAX_AGE_SECS, secure)
}

fn build(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={value}; Max-Age={max_age_secs}; Path=/; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_shape() {
        let cookie = session_cookie("tok.en.value", 90, false);
        assert_eq!(
            cookie,
            "session=tok.en.value; Max-Age=7776000; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn secure_flag_appended_in_production() {
        let cookie = session_cookie("t", 1, true);
        assert!(cookie.ends_with("; Secure"));
        let cookie = session_cookie("t", 1, false);
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn logout_cookie_is_short_lived_sentinel() {
        let cookie = logout_cookie(false);
        assert_eq!(
            cookie,
            "session=loggedout; Max-Age=5; Path=/; HttpOnly; SameSite=Lax"
        );
    }
}
