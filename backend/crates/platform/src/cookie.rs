//! Cookie Management Infrastructure
//!
//! Cookie attribute configuration and `Set-Cookie` construction on top of
//! `axum_extra`'s cookie jar.

use std::borrow::Cow;

use axum_extra::extract::cookie::{self, Cookie, CookieJar};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSite> for cookie::SameSite {
    fn from(value: SameSite) -> Self {
        match value {
            SameSite::Strict => cookie::SameSite::Strict,
            SameSite::Lax => cookie::SameSite::Lax,
            SameSite::None => cookie::SameSite::None,
        }
    }
}

/// Cookie configuration
///
/// `http_only` is per cookie: the session cookie sets it, the CSRF cookie
/// must not (client script echoes it into a header).
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: Cow<'static, str>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: Cow<'static, str>,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("session"),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: Cow::Borrowed("/"),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Build a cookie carrying `value` with every configured attribute
    pub fn build(&self, value: impl Into<Cow<'static, str>>) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name.clone(), value.into()))
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(self.same_site.into())
            .path(self.path.clone());

        if let Some(max_age) = self.max_age_secs {
            builder = builder.max_age(time::Duration::seconds(max_age));
        }

        builder.build()
    }

    /// Build the expired counterpart used to clear this cookie
    ///
    /// Path must match the original or the browser keeps the old cookie.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.name.clone(), ""))
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(self.same_site.into())
            .path(self.path.clone())
            .build();
        cookie.make_removal();
        cookie
    }

    /// Read this cookie's value from a jar
    pub fn read<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.name).map(|c| c.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn test_cookie_config_build() {
        let config = CookieConfig {
            name: Cow::Borrowed("test"),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: Cow::Borrowed("/api"),
            max_age_secs: Some(3600),
        };

        let cookie = config.build("value123").to_string();
        assert!(cookie.contains("test=value123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/api"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_readable_cookie_has_no_http_only() {
        let config = CookieConfig {
            name: Cow::Borrowed("csrf-token"),
            http_only: false,
            secure: false,
            ..Default::default()
        };

        let cookie = config.build("abc").to_string();
        assert!(cookie.starts_with("csrf-token=abc"));
        assert!(!cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_removal_expires_on_same_path() {
        let config = CookieConfig {
            name: Cow::Borrowed("accessToken"),
            path: Cow::Borrowed("/api"),
            ..Default::default()
        };

        let cookie = config.removal();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/api"));
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }

    #[test]
    fn test_read_from_jar() {
        let config = CookieConfig {
            name: Cow::Borrowed("session"),
            ..Default::default()
        };
        let jar = CookieJar::new()
            .add(Cookie::new("foo", "bar"))
            .add(Cookie::new("session", "abc123"));

        assert_eq!(config.read(&jar), Some("abc123"));
        assert_eq!(config.read(&CookieJar::new()), None);
    }
}
