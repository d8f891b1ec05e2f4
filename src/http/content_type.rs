//! `Content-Type` header parameter parsing.
//!
//! Malformed input never fails: callers get the default charset or `None`.

use indexmap::IndexMap;

use crate::http::cookie::unquote;
use crate::http::headers::Headers;

/// Charset assumed when a `Content-Type` declares none.
pub const DEFAULT_CHARSET: &str = "UTF-8";

pub const CONTENT_TYPE: &str = "Content-Type";

/// Extract the declared charset, falling back to [`DEFAULT_CHARSET`].
pub fn parse_content_type_charset(header: Option<&str>) -> String {
    let Some(header) = header.filter(|h| !h.trim().is_empty()) else {
        return DEFAULT_CHARSET.to_string();
    };
    header
        .split(';')
        .skip(1)
        .filter_map(|segment| segment.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| unquote(value.trim()).trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
}

/// Parse the `;`-separated parameters after the media type.
///
/// Returns `None` when there are no parameters at all.
pub fn parse_content_type_params(header: &str) -> Option<IndexMap<String, String>> {
    let mut segments = header.split(';');
    segments.next()?;
    let params: IndexMap<String, String> = segments
        .filter_map(|segment| segment.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect();
    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

/// Charset of a message, read from its `Content-Type` header.
pub fn charset_of(headers: &Headers) -> String {
    parse_content_type_charset(headers.get(CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_charset() {
        assert_eq!(parse_content_type_charset(Some("application/json; charset=UTF-8")), "UTF-8");
        assert_eq!(parse_content_type_charset(Some("application/json; charset = UTF-8 ")), "UTF-8");
        assert_eq!(
            parse_content_type_charset(Some("application/json; charset=UTF-8; version=1.2.3")),
            "UTF-8"
        );
        assert_eq!(
            parse_content_type_charset(Some("application/json; charset = UTF-8 ; version=1.2.3")),
            "UTF-8"
        );
    }

    #[test]
    fn test_parse_charset_defaults() {
        assert_eq!(parse_content_type_charset(None), DEFAULT_CHARSET);
        assert_eq!(parse_content_type_charset(Some("")), DEFAULT_CHARSET);
        assert_eq!(parse_content_type_charset(Some("text/plain")), DEFAULT_CHARSET);
        assert_eq!(parse_content_type_charset(Some("text/plain; Charset=ISO-8859-1")), "ISO-8859-1");
        assert_eq!(parse_content_type_charset(Some("text/plain; charset=\"\"")), DEFAULT_CHARSET);
    }

    #[test]
    fn test_quoted_values_are_unquoted() {
        assert_eq!(parse_content_type_charset(Some("text/html; charset=\"utf-8\"")), "utf-8");
        let map = parse_content_type_params("multipart/form-data; boundary=\"a b\"; charset=\"x\"").unwrap();
        assert_eq!(map["boundary"], "a b");
        assert_eq!(map["charset"], "x");

        let headers: Headers = [("Content-Type", "text/plain; charset=\"ISO-8859-1\"")]
            .into_iter()
            .collect();
        assert_eq!(charset_of(&headers), "ISO-8859-1");
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(parse_content_type_params("application/json"), None);

        let map = parse_content_type_params("application/json; charset=UTF-8").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["charset"], "UTF-8");

        let map = parse_content_type_params("application/json; charset = UTF-8 ").unwrap();
        assert_eq!(map["charset"], "UTF-8");

        let map = parse_content_type_params("application/json; charset = UTF-8 ; version=1.2.3").unwrap();
        let entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(entries, vec![("charset", "UTF-8"), ("version", "1.2.3")]);

        let map = parse_content_type_params("application/vnd.app.test+json;ton-version=1").unwrap();
        assert_eq!(map["ton-version"], "1");
    }

    #[test]
    fn test_parse_params_without_values() {
        assert_eq!(parse_content_type_params("text/plain; ; flag"), None);
    }

    #[test]
    fn test_charset_of_headers() {
        let headers: Headers = [("content-type", "text/html; charset=windows-1252")]
            .into_iter()
            .collect();
        assert_eq!(charset_of(&headers), "windows-1252");
        assert_eq!(charset_of(&Headers::new()), DEFAULT_CHARSET);
    }
}
