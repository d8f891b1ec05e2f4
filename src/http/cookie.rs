//! Cookie header codec.
//!
//! # Responsibilities
//! - Decode a single `Set-Cookie` value (optionally labelled) into one cookie
//! - Decode a request `Cookie` header into every cookie it carries
//! - Encode cookies for the request `Cookie` header and for `Set-Cookie`
//!
//! # Design Decisions
//! - Lenient: quoted values, any attribute order, unknown attributes ignored
//! - Attribute tokens never produce cookies of their own
//! - Decoding never fails; malformed input yields an empty result

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const COOKIE: &str = "Cookie";
pub const SET_COOKIE: &str = "Set-Cookie";

/// An HTTP cookie with the attributes the transports carry across.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Render as one `Set-Cookie` header value.
    pub fn to_set_cookie_string(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(max_age) = self.max_age {
            let _ = write!(out, "; Max-Age={}", max_age);
        }
        if let Some(path) = &self.path {
            let _ = write!(out, "; Path={}", path);
        }
        if let Some(domain) = &self.domain {
            let _ = write!(out, "; Domain={}", domain);
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if self.http_only {
            out.push_str("; HTTPOnly");
        }
        out
    }

    fn apply(&mut self, attribute: Attribute, value: Option<&str>) {
        match attribute {
            Attribute::Path => self.path = value.map(str::to_string),
            Attribute::Domain => self.domain = value.map(str::to_string),
            Attribute::MaxAge => {
                if let Some(seconds) = value.and_then(|v| v.parse().ok()) {
                    self.max_age = Some(seconds);
                }
            }
            Attribute::Secure => self.secure = true,
            Attribute::HttpOnly => self.http_only = true,
            Attribute::Version
            | Attribute::Expires
            | Attribute::Comment
            | Attribute::CommentUrl
            | Attribute::Discard
            | Attribute::Port
            | Attribute::SameSite => {}
        }
    }
}

/// Cookie attribute names recognized while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Version,
    Path,
    Domain,
    MaxAge,
    Expires,
    Secure,
    HttpOnly,
    Comment,
    CommentUrl,
    Discard,
    Port,
    SameSite,
}

impl Attribute {
    fn parse(name: &str) -> Option<Self> {
        // RFC 2965 request cookies prefix attributes with `$`
        let name = name.strip_prefix('$').unwrap_or(name);
        let attribute = match name.to_ascii_lowercase().as_str() {
            "version" => Self::Version,
            "path" => Self::Path,
            "domain" => Self::Domain,
            "max-age" => Self::MaxAge,
            "expires" => Self::Expires,
            "secure" => Self::Secure,
            "httponly" => Self::HttpOnly,
            "comment" => Self::Comment,
            "commenturl" => Self::CommentUrl,
            "discard" => Self::Discard,
            "port" => Self::Port,
            "samesite" => Self::SameSite,
            _ => return None,
        };
        Some(attribute)
    }
}

/// Split `name=value` tokens, trimming and unquoting values.
fn tokens(header: &str) -> impl Iterator<Item = (&str, Option<&str>)> {
    header
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
            None => (token, None),
        })
}

pub(crate) fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn strip_set_cookie_label(header: &str) -> &str {
    let label = "set-cookie:";
    match header.get(..label.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(label) => &header[label.len()..],
        _ => header,
    }
}

/// Decode a `Set-Cookie` style header into a map holding its cookie.
///
/// Only the first `name=value` pair becomes a cookie; recognized attributes
/// fill in its fields and any further pairs are ignored.
pub fn parse_cookie_header_string(header: &str) -> IndexMap<String, Cookie> {
    let mut map = IndexMap::new();
    let mut tokens = tokens(strip_set_cookie_label(header));
    let Some((name, Some(value))) = tokens.next() else {
        return map;
    };
    if name.is_empty() {
        return map;
    }
    let mut cookie = Cookie::new(name, value);
    for (key, value) in tokens {
        if let Some(attribute) = Attribute::parse(key) {
            cookie.apply(attribute, value);
        }
    }
    map.insert(cookie.name.clone(), cookie);
    map
}

/// Decode a request `Cookie` header into all the cookies it carries.
///
/// `$`-prefixed attributes (`$Path=/x`) and bare flags attach to the cookie
/// before them. An unprefixed pair is always a cookie, even when its name
/// matches an attribute such as `path` or `version`.
pub fn decode_cookie_request_header(header: &str) -> Vec<Cookie> {
    let mut cookies: Vec<Cookie> = Vec::new();
    for (name, value) in tokens(header) {
        let attribute = match value {
            Some(_) if !name.starts_with('$') => None,
            _ => Attribute::parse(name),
        };
        if let Some(attribute) = attribute {
            if let Some(last) = cookies.last_mut() {
                last.apply(attribute, value);
            }
            continue;
        }
        match value {
            Some(value) if !name.is_empty() => cookies.push(Cookie::new(name, value)),
            _ => tracing::trace!(token = name, "Skipping malformed cookie token"),
        }
    }
    cookies
}

/// Encode cookies as a request `Cookie` header value, attributes dropped.
pub fn create_cookie_header_value(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}
