// Percent-encoding and query-string decoding

use std::borrow::Cow;
use std::string::FromUtf8Error;

/// Percent-encoding policy of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Only RFC 3986 unreserved characters pass through
    Strict,
    /// Unreserved and reserved characters pass through, as do valid `%XX`
    /// escapes
    Reserved,
}

impl Encoding {
    pub fn encode(self, value: &str) -> String {
        match self {
            Encoding::Strict => encode_strict(value),
            Encoding::Reserved => encode_reserved(value),
        }
    }
}

/// Everything outside `A-Z a-z 0-9 - . _ ~` is escaped, `!'()*` included
pub fn encode_strict(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub fn encode_reserved(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut buf = [0u8; 4];

    for (i, ch) in value.char_indices() {
        if ch == '%' && is_escape_at(bytes, i) {
            out.push('%');
        } else if is_unreserved(ch) || is_reserved(ch) {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }

    out
}

pub fn decode(value: &str) -> Result<String, FromUtf8Error> {
    urlencoding::decode(value).map(Cow::into_owned)
}

fn is_escape_at(bytes: &[u8], i: usize) -> bool {
    matches!(
        (bytes.get(i + 1), bytes.get(i + 2)),
        (Some(a), Some(b)) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()
    )
}

fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~')
}

fn is_reserved(ch: char) -> bool {
    matches!(
        ch,
        ':' | '/' | '?' | '#' | '[' | ']' | '@'
            | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

/// `application/x-www-form-urlencoded` decoding: `+` is a space
pub fn decode_form(value: &str) -> Result<String, FromUtf8Error> {
    decode(&value.replace('+', " "))
}

/// `key=value&...` pairs. Keys are decoded; values stay raw so a composite
/// value can be split on its unescaped commas before decoding. Repeated keys
/// keep every value in the order seen, and keys keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParameters {
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = key.replace('+', " ");
            let key = String::from_utf8_lossy(&urlencoding::decode_binary(key.as_bytes())).into_owned();
            params.push(key, value.to_string());
        }
        params
    }

    fn push(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Raw values bound to `name`
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Decoded values bound to `name`
    pub fn decoded(&self, name: &str) -> Option<Result<Vec<String>, FromUtf8Error>> {
        self.get(name)
            .map(|values| values.iter().map(|v| decode_form(v)).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
