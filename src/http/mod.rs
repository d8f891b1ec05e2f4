//! HTTP message model and the backend contract.
//!
//! # Data Flow
//! ```text
//! Engine builds HttpRequest (method, url, headers, body)
//!     → client.rs (HttpClient::invoke on the chosen backend)
//!     → backend sends, copies the wire headers back, stamps start time
//!     → headers.rs (response headers normalized, multi-value preserved)
//!     → response.rs (status, headers, buffered body)
//!     → Engine reads Response; cookie.rs / content_type.rs decode details
//! ```

pub mod client;
pub mod content_type;
pub mod cookie;
pub mod headers;
pub mod request;
pub mod response;

pub use client::HttpClient;
pub use content_type::{
    charset_of, parse_content_type_charset, parse_content_type_params, CONTENT_TYPE, DEFAULT_CHARSET,
};
pub use cookie::{
    create_cookie_header_value, decode_cookie_request_header, parse_cookie_header_string, Cookie, COOKIE,
    SET_COOKIE,
};
pub use headers::Headers;
pub use request::HttpRequest;
pub use response::Response;
