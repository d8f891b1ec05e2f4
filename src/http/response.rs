//! Buffered response handed back to the engine.

use serde::{Deserialize, Serialize};

use crate::http::content_type::charset_of;
use crate::http::cookie::{parse_cookie_header_string, Cookie, SET_COOKIE};
use crate::http::headers::Headers;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    /// Empty when the server sent no entity.
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Charset declared by `Content-Type`, `UTF-8` when absent.
    pub fn charset(&self) -> String {
        charset_of(&self.headers)
    }

    /// Body as text. Invalid UTF-8 sequences are replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Cookies from every `Set-Cookie` value, in header order.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.headers
            .get_all(SET_COOKIE)
            .unwrap_or_default()
            .iter()
            .flat_map(|value| parse_cookie_header_string(value).into_values())
            .collect()
    }
}
