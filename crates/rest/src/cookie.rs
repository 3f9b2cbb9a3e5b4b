//! The framework's cookie value object.
//!
//! [`NewCookie`] is what resources hand to the response to set a cookie on the client.
//! It is rendered to and parsed from a `Set-Cookie` header value through `Display` and
//! `FromStr`.

use crate::error::RestError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Version written for cookies that do not set one.
pub const DEFAULT_VERSION: i32 = 1;

/// `max-age` meaning the cookie expires with the browser session.
pub const DEFAULT_MAX_AGE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    version: i32,
    comment: Option<String>,
    max_age: i32,
    secure: bool,
    http_only: bool,
}

impl NewCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            version: DEFAULT_VERSION,
            comment: None,
            max_age: DEFAULT_MAX_AGE,
            secure: false,
            http_only: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_max_age(mut self, max_age: i32) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn max_age(&self) -> i32 {
        self.max_age
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }
}

impl Display for NewCookie {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.name)?;
        write_quoted(f, &self.value)?;
        write!(f, ";Version={}", self.version)?;
        if let Some(comment) = &self.comment {
            f.write_str(";Comment=")?;
            write_quoted(f, comment)?;
        }
        if let Some(domain) = &self.domain {
            f.write_str(";Domain=")?;
            write_quoted(f, domain)?;
        }
        if let Some(path) = &self.path {
            f.write_str(";Path=")?;
            write_quoted(f, path)?;
        }
        if self.max_age != DEFAULT_MAX_AGE {
            write!(f, ";Max-Age={}", self.max_age)?;
        }
        if self.secure {
            f.write_str(";Secure")?;
        }
        if self.http_only {
            f.write_str(";HttpOnly")?;
        }
        Ok(())
    }
}

fn write_quoted(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    let needs_quote = value.bytes().any(|b| matches!(b, b' ' | b'\t' | b',' | b';' | b'"' | b'\\' | b'='));
    if needs_quote {
        write!(f, "\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        f.write_str(value)
    }
}

/// Parses a `Set-Cookie` header value.
///
/// The first pair is the cookie itself, attribute names are matched case-insensitively
/// and unknown attributes (`Expires`, `SameSite`, ...) are skipped.
impl FromStr for NewCookie {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = split_unquoted(s).into_iter();

        let first = parts.next().unwrap_or_default();
        let Some((name, value)) = first.split_once('=') else {
            return Err(RestError::invalid_cookie(format!("missing name=value pair in {s:?}")));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(RestError::invalid_cookie(format!("empty cookie name in {s:?}")));
        }
        let mut cookie = NewCookie::new(name, unquote(value.trim()));

        for part in parts {
            let (key, value) = match part.split_once('=') {
                Some((key, value)) => (key.trim(), Some(unquote(value.trim()))),
                None => (part.trim(), None),
            };

            match (key.to_ascii_lowercase().as_str(), value) {
                ("version", Some(value)) => cookie.version = parse_number(key, &value)?,
                ("max-age", Some(value)) => cookie.max_age = parse_number(key, &value)?,
                ("comment", Some(value)) => cookie.comment = Some(value),
                ("domain", Some(value)) => cookie.domain = Some(value),
                ("path", Some(value)) => cookie.path = Some(value),
                ("secure", _) => cookie.secure = true,
                ("httponly", _) => cookie.http_only = true,
                _ => {}
            }
        }

        Ok(cookie)
    }
}

fn parse_number(key: &str, value: &str) -> Result<i32, RestError> {
    value.parse().map_err(|e| RestError::invalid_cookie(format!("{key}={value}: {e}")))
}

/// Splits on `;` outside of double quotes, dropping empty parts.
fn split_unquoted(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut escaped = false;

    for c in s.chars() {
        match c {
            _ if escaped => {
                escaped = false;
                current.push(c);
            }
            '\\' if quoted => {
                escaped = true;
                current.push(c);
            }
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            ';' if !quoted => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts.retain(|part| !part.trim().is_empty());
    parts
}

fn unquote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => {
            let mut unquoted = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => unquoted.extend(chars.next()),
                    c => unquoted.push(c),
                }
            }
            unquoted
        }
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cookie = NewCookie::new("sid", "abc");

        assert_eq!(cookie.version(), DEFAULT_VERSION);
        assert_eq!(cookie.max_age(), DEFAULT_MAX_AGE);
        assert_eq!(cookie.domain(), None);
        assert_eq!(cookie.path(), None);
        assert_eq!(cookie.comment(), None);
        assert!(!cookie.is_secure());
        assert!(!cookie.is_http_only());
        assert_eq!(cookie.to_string(), "sid=abc;Version=1");
    }

    #[test]
    fn render_all_attributes() {
        let cookie = NewCookie::new("user", "john doe")
            .with_comment("the login")
            .with_domain("example.com")
            .with_path("/")
            .with_max_age(60)
            .with_secure(true)
            .with_http_only(true);

        assert_eq!(
            cookie.to_string(),
            r#"user="john doe";Version=1;Comment="the login";Domain=example.com;Path=/;Max-Age=60;Secure;HttpOnly"#
        );
    }

    #[test]
    fn parse_set_cookie() {
        let header = concat!(
            r#"user="john \"jd\" doe"; Version=1; Path=/app; domain=Example.com; Max-Age=30; "#,
            "Expires=Wed, 21 Oct 2015 07:28:00 GMT; Secure; HttpOnly",
        );
        let cookie: NewCookie = header.parse().unwrap();

        assert_eq!(cookie.name(), "user");
        assert_eq!(cookie.value(), r#"john "jd" doe"#);
        assert_eq!(cookie.path(), Some("/app"));
        assert_eq!(cookie.domain(), Some("Example.com"));
        assert_eq!(cookie.max_age(), 30);
        assert!(cookie.is_secure());
        assert!(cookie.is_http_only());
        assert_eq!(cookie.comment(), None);
    }

    #[test]
    fn rendered_cookie_parses_back() {
        let cookie = NewCookie::new("a", "b;c").with_comment("x=y").with_max_age(0);
        assert_eq!(cookie.to_string().parse::<NewCookie>().unwrap(), cookie);
    }

    #[test]
    fn reject_malformed_cookie() {
        assert!(matches!("".parse::<NewCookie>(), Err(RestError::InvalidCookie { .. })));
        assert!(matches!("novalue".parse::<NewCookie>(), Err(RestError::InvalidCookie { .. })));
        assert!(matches!("=v".parse::<NewCookie>(), Err(RestError::InvalidCookie { .. })));
        assert!(matches!("a=b; Max-Age=soon".parse::<NewCookie>(), Err(RestError::InvalidCookie { .. })));
    }
}
