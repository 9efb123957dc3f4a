use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::config::CookieConfig;

pub const AUTH_COOKIE: &str = "token";

/// HTTP-only auth cookie carrying the signed JWT.
///
/// SameSite=None is required in production because the SPA is served from
/// a different origin; None demands Secure, which APP_ENV=production sets.
pub fn auth_cookie(config: &CookieConfig, token: String) -> Cookie<'static> {
    let same_site = if config.secure {
        SameSite::None
    } else {
        SameSite::Lax
    };
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(same_site)
        .max_age(Duration::days(config.max_age_days))
        .build()
}

/// Expired twin of the auth cookie; setting it removes the original.
pub fn clear_cookie(config: &CookieConfig) -> Cookie<'static> {
    let mut cookie = auth_cookie(config, String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie
}
