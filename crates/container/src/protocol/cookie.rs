//! The container's native cookie representation.
//!
//! A [`Cookie`] is attached to a response with
//! [`ContainerResponse::add_cookie`](crate::response::ContainerResponse::add_cookie) and
//! rendered as one `Set-Cookie` header when the response is committed.
//!
//! Optional attributes (domain, path, comment) start unset. An unset attribute is left
//! out of the rendered header, which lets the user agent apply its own defaults.

use crate::protocol::ResponseError;
use std::fmt;
use std::fmt::{Display, Formatter};

/// `max-age` value meaning "discard when the browser closes".
pub const SESSION_MAX_AGE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    max_age: i32,
    version: i32,
    domain: Option<String>,
    path: Option<String>,
    comment: Option<String>,
    secure: bool,
    http_only: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age: SESSION_MAX_AGE,
            version: 0,
            domain: None,
            path: None,
            comment: None,
            secure: false,
            http_only: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn max_age(&self) -> i32 {
        self.max_age
    }

    pub fn set_max_age(&mut self, max_age: i32) {
        self.max_age = max_age;
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Domains are case-insensitive and stored lower-cased.
    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.domain = Some(domain.into().to_ascii_lowercase());
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn set_secure(&mut self, secure: bool) {
        self.secure = secure;
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    pub fn set_http_only(&mut self, http_only: bool) {
        self.http_only = http_only;
    }

    /// Checks that the cookie renders as exactly one cookie.
    ///
    /// The name must be a token. Domain and path are written unquoted, so they must not
    /// contain `;`, `,` or control characters.
    pub fn validate(&self) -> Result<(), ResponseError> {
        if self.name.is_empty() || !self.name.bytes().all(is_token_byte) {
            return Err(ResponseError::invalid_header(format!("cookie name {:?} is not a token", self.name)));
        }
        for (attribute, value) in [("Domain", &self.domain), ("Path", &self.path)] {
            if let Some(value) = value
                && value.bytes().any(|b| matches!(b, b';' | b',') || b.is_ascii_control())
            {
                return Err(ResponseError::invalid_header(format!("cookie {} has an invalid {attribute}: {value:?}", self.name)));
            }
        }
        Ok(())
    }
}

/// Renders the cookie as a `Set-Cookie` header value.
///
/// Version 0 cookies are written in the netscape form, version 1 cookies carry the
/// `Version` attribute and may carry a `Comment`.
impl Display for Cookie {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.name)?;
        write_value(f, &self.value, self.version)?;

        if self.version > 0 {
            write!(f, "; Version={}", self.version)?;
            if let Some(comment) = &self.comment {
                f.write_str("; Comment=")?;
                write_value(f, comment, self.version)?;
            }
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if self.max_age >= 0 {
            write!(f, "; Max-Age={}", self.max_age)?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

fn write_value(f: &mut Formatter<'_>, value: &str, version: i32) -> fmt::Result {
    if version > 0 && needs_quote(value) {
        write!(f, "\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        f.write_str(value)
    }
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_graphic()
        && !matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}'
        )
}

fn needs_quote(value: &str) -> bool {
    value.is_empty() || value.bytes().any(|b| matches!(b, b' ' | b'\t' | b',' | b';' | b'"' | b'\\' | b'='))
}
