use serde::Serialize;
use serde_json::{Map, Value};

/// A stored record. Movie attributes beyond the key are not constrained.
pub type Item = Map<String, Value>;

#[derive(Debug, Default)]
pub struct MovieQuery {
    cast: Option<String>,
}

impl MovieQuery {
    /// Builds the query from raw pairs. A repeated key keeps every value,
    /// comma-joined in order, so `cast=true&cast=true` reads as `"true,true"`.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut cast: Option<String> = None;
        for (key, value) in pairs {
            if key != "cast" {
                continue;
            }
            cast = Some(match cast.take() {
                Some(joined) => format!("{joined},{value}"),
                None => value,
            });
        }
        Self { cast }
    }

    pub fn include_cast(&self) -> bool {
        self.cast.as_deref() == Some("true")
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub movie: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<Item>>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Parses a movie identifier from the leading integer of `raw`.
///
/// Leading whitespace and an optional sign are accepted, trailing text after
/// the digits is ignored (`"42abc"` is 42). Returns `None` when there are no
/// leading digits or the value does not fit in an `i64`.
pub fn parse_movie_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    format!("{sign}{}", &rest[..digits]).parse().ok()
}
