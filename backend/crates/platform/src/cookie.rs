//! Cookie helpers
//!
//! Just enough of RFC 6265 to issue and read the refresh-token cookie.

use axum::http::{HeaderMap, HeaderValue, header, header::InvalidHeaderValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes of one named cookie.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl CookieConfig {
    /// HttpOnly, `Path=/`, `SameSite=Lax`, not `Secure`, session lifetime.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secure: false,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn max_age_secs(mut self, secs: i64) -> Self {
        self.max_age_secs = Some(secs);
        self
    }

    /// `Set-Cookie` value for `value`.
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=");
        cookie.push_str(self.same_site.as_str());
        cookie.push_str("; Path=");
        cookie.push_str(&self.path);

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }

        cookie
    }

    pub fn set_cookie_header(&self, value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.build_set_cookie(value))
    }
}

/// Value of cookie `name` from the request's `Cookie` headers, if present and
/// non-empty.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            let value = value.trim().trim_matches('"');
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}
