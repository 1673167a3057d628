//! URL templates with `:name` placeholders.
//!
//! A [`UrlTemplate`] is parsed once when a resource is built and rendered on
//! every invocation. Rendering substitutes encoded parameter values, removes
//! placeholders that have no value, and sends every leftover parameter to the
//! query string.
//!
//! # Template syntax
//!
//! - `:name` is a placeholder when `name` is a run of `[A-Za-z0-9_]` that is
//!   not all digits, so `http://host:8080/` keeps its port.
//! - `\:name` is a literal `:name`.
//! - `/\.` is a literal `/.` that survives format-suffix collapsing. Only the
//!   first occurrence is unescaped.
//! - A placeholder written after `?` as `=:name` is a query value and uses
//!   query encoding instead of path-segment encoding.
//!
//! # Example
//!
//! ```rust
//! use wp_resource::rest::UrlTemplate;
//! use serde_json::{json, Map, Value};
//!
//! let template = UrlTemplate::parse("/user/:userId/card/:cardId").unwrap();
//!
//! let mut params = Map::new();
//! params.insert("userId".to_string(), json!(123));
//! params.insert("sort".to_string(), json!("name"));
//!
//! let route = template.resolve(&params, true);
//! assert_eq!(route.url, "/user/123/card");
//! assert_eq!(route.query, vec![("sort".to_string(), "name".to_string())]);
//! ```

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Parameter name that may never be used as a placeholder or binding.
pub(crate) const RESERVED_NAME: &str = "hasOwnProperty";

/// Characters left unescaped in a path segment besides `A-Za-z0-9-_.~`.
const SEGMENT_KEEP: &[u8] = b"@:$,;+!()*'";

/// Characters left unescaped in a query value besides `A-Za-z0-9-_.~`.
const QUERY_KEEP: &[u8] = b"@:$,;!()*'";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Placeholder { name: String, query_value: bool },
}

/// A parsed URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    source: String,
    /// `scheme://[ipv6]:port` prefix kept out of placeholder scanning.
    authority: String,
    tokens: Vec<Token>,
}

/// The outcome of rendering a template against a set of parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// The rendered URL or path.
    pub url: String,
    /// Parameters that matched no placeholder, sorted by key.
    pub query: Vec<(String, String)>,
}

impl UrlTemplate {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyTemplate`] for an empty template and
    /// [`ConfigError::ReservedParameterName`] if a placeholder is named
    /// `hasOwnProperty`.
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        if template.is_empty() {
            return Err(ConfigError::EmptyTemplate);
        }

        let (authority, rest) = split_protocol_and_ipv6(template);
        let chars: Vec<char> = rest.chars().collect();
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut in_query = false;
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '\\' if chars.get(i + 1) == Some(&':') => {
                    literal.push(':');
                    i += 2;
                }
                ':' => {
                    let end = chars[i + 1..]
                        .iter()
                        .position(|c| !is_word(*c))
                        .map_or(chars.len(), |offset| i + 1 + offset);
                    let name: String = chars[i + 1..end].iter().collect();

                    if name.is_empty() || name.chars().all(|c| c.is_ascii_digit()) {
                        literal.push(':');
                        i += 1;
                        continue;
                    }
                    if name == RESERVED_NAME {
                        return Err(ConfigError::ReservedParameterName { name });
                    }

                    let query_value = in_query && i > 0 && chars[i - 1] == '=';
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(Token::Placeholder { name, query_value });
                    i = end;
                }
                c => {
                    if c == '?' {
                        in_query = true;
                    }
                    literal.push(c);
                    i += 1;
                }
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            authority: authority.to_string(),
            tokens,
        })
    }

    /// Returns the template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Placeholder { name, .. } => Some(name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// Returns `true` if the template has a placeholder with this name.
    #[must_use]
    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders().any(|p| p == name)
    }

    /// Renders the template.
    ///
    /// Parameters whose value is absent or `null` remove their placeholder
    /// (and one leading `/` when the template continues with `/`). Parameters
    /// that match no placeholder end up in [`ResolvedRoute::query`], skipping
    /// `null` values.
    #[must_use]
    pub fn resolve(&self, params: &Map<String, Value>, strip_trailing_slashes: bool) -> ResolvedRoute {
        let mut url = String::new();

        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                Token::Literal(text) => url.push_str(text),
                Token::Placeholder { name, query_value } => {
                    match params.get(name).filter(|value| !value.is_null()) {
                        Some(value) => {
                            let text = stringify(value);
                            if *query_value {
                                url.push_str(&encode_uri_query(&text));
                            } else {
                                url.push_str(&encode_uri_segment(&text));
                            }
                        }
                        None => {
                            let tail_is_slash = matches!(
                                self.tokens.get(i + 1),
                                Some(Token::Literal(next)) if next.starts_with('/')
                            );
                            if tail_is_slash && url.ends_with('/') {
                                url.pop();
                            }
                        }
                    }
                }
            }
        }

        if strip_trailing_slashes {
            let len = url.trim_end_matches('/').len();
            url.truncate(len);
            if url.is_empty() {
                url.push('/');
            }
        }

        let url = collapse_format_suffix(&url).replacen("/\\.", "/.", 1);

        let mut unmatched: Vec<(&String, &Value)> = params
            .iter()
            .filter(|(key, _)| !self.has_placeholder(key))
            .collect();
        unmatched.sort_by(|a, b| a.0.cmp(b.0));

        let mut query = Vec::new();
        for (key, value) in unmatched {
            push_query_pairs(&mut query, key, value);
        }

        ResolvedRoute {
            url: format!("{}{url}", self.authority),
            query,
        }
    }
}

const fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits a leading `http(s)://[ipv6]...` authority off the template.
fn split_protocol_and_ipv6(template: &str) -> (&str, &str) {
    for scheme in ["http://", "https://"] {
        let Some(rest) = template.strip_prefix(scheme) else {
            continue;
        };
        if !rest.starts_with('[') {
            continue;
        }
        if let Some(close) = rest.find(']') {
            let after = &rest[close + 1..];
            let host_end = after.find('/').unwrap_or(after.len());
            return template.split_at(scheme.len() + close + 1 + host_end);
        }
    }
    ("", template)
}

/// Turns the first `/.ext` at the end of the path (or before `?`) into `.ext`.
fn collapse_format_suffix(url: &str) -> String {
    let mut search = 0;
    while let Some(offset) = url[search..].find("/.") {
        let at = search + offset;
        let rest = &url[at + 2..];
        let run = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        if run > 0 && (run == rest.len() || rest.as_bytes()[run] == b'?') {
            return format!("{}.{}", &url[..at], rest);
        }
        search = at + 1;
    }
    url.to_string()
}

/// Converts a parameter value to the text substituted into a URL.
///
/// Strings are used verbatim, arrays are comma-joined, and everything else
/// uses its JSON text.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn push_query_pairs(query: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items.iter().filter(|item| !item.is_null()) {
                query.push((key.to_string(), query_text(item)));
            }
        }
        other => query.push((key.to_string(), query_text(other))),
    }
}

fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Percent-encodes a path segment.
///
/// Leaves `A-Za-z0-9 - _ . ~` and `@ : $ , ; + ! ( ) * '` as they are and
/// encodes everything else, with spaces as `%20`.
///
/// ```rust
/// use wp_resource::rest::encode_uri_segment;
///
/// assert_eq!(encode_uri_segment("a b/c@d+e"), "a%20b%2Fc@d+e");
/// ```
#[must_use]
pub fn encode_uri_segment(value: &str) -> String {
    encode_keeping(value, SEGMENT_KEEP)
}

/// Percent-encodes a value placed after `=` in a query string.
///
/// Same as [`encode_uri_segment`] except that `+` is encoded.
///
/// ```rust
/// use wp_resource::rest::encode_uri_query;
///
/// assert_eq!(encode_uri_query("a+b c"), "a%2Bb%20c");
/// ```
#[must_use]
pub fn encode_uri_query(value: &str) -> String {
    encode_keeping(value, QUERY_KEEP)
}

fn encode_keeping(value: &str, keep: &[u8]) -> String {
    let encoded = urlencoding::encode(value);
    let mut out = String::with_capacity(encoded.len());
    let mut rest: &str = &encoded;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let Some(triplet) = rest.get(pos..pos + 3) else {
            out.push_str(&rest[pos..]);
            return out;
        };
        match u8::from_str_radix(&triplet[1..], 16) {
            Ok(byte) if keep.contains(&byte) => out.push(char::from(byte)),
            _ => out.push_str(triplet),
        }
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    out
}
